pub(crate) mod builder;
pub(crate) mod diag;
pub(crate) mod model;
pub(crate) mod opts;
pub(crate) mod scene;
pub(crate) mod table;
pub(crate) mod validate;
