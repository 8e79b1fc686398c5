pub(crate) mod plan;
pub(crate) mod random;
pub(crate) mod roll;
pub(crate) mod sampling;
