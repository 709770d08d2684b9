pub(crate) mod cache;
pub(crate) mod manifest;
pub(crate) mod program;
pub(crate) mod sources;
pub(crate) mod template;
