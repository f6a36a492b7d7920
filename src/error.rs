//! Error types for the rasterizer, masks and renderers.
//!
//! Degenerate geometry is never an error: empty strokes produce no output
//! and out-of-range coordinates saturate. What remains are API misuse and
//! resource failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("row {y} is outside the mask rows [{min_y}, {min_y} + {height})")]
    RowOutOfRange { y: i32, min_y: i32, height: u32 },

    #[error("rasterizer has not been prepared")]
    NotPrepared,

    #[error("rasterizer is already prepared; call reset() before adding geometry")]
    AlreadyPrepared,

    #[error("pixel buffer holds {actual} pixels, {required} required")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("row stride {stride} is smaller than the row width {width}")]
    InvalidStride { stride: usize, width: usize },

    #[error("failed to build the render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
