pub(crate) mod builtin;
pub(crate) mod function;
pub(crate) mod param;
pub(crate) mod registry;
