//! GPU plumbing shared by the desktop backend.

mod gpu;

pub(crate) use gpu::GpuContext;
