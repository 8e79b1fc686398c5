pub(crate) mod builtin;
pub(crate) mod load;
pub(crate) mod model;
