pub(crate) mod buffers;
pub(crate) mod feedback;
pub(crate) mod image;
pub(crate) mod timer;
