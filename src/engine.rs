pub(crate) mod config;
pub(crate) mod generator;
pub(crate) mod publish;
