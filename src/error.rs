use std::io;
use std::path::PathBuf;

use image::{ImageError, ImageFormat};
use thiserror::Error;

/// Error type for ellipse mask construction
///
/// This error type represents the ways an [`EllipseMask`](crate::EllipseMask)
/// can be misconfigured before any pixels are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EllipseMaskError {
    /// Mask width or height is zero
    ///
    /// An ellipse cannot be inscribed in an empty rectangle.
    #[error("Mask dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Supersampling grid size is zero
    #[error("Supersample count must be at least 1, got {0}")]
    InvalidSampleCount(u32),
}

/// Error type for fit-with-centered-crop operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Target width or height is zero
    #[error("Target dimensions must be non-zero, got {width}x{height}")]
    InvalidTargetDimensions { width: u32, height: u32 },

    /// Source image has no pixels to scale
    #[error("Source image is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },

    /// Centering fraction is outside `[0, 1]`
    ///
    /// Centering values choose where the crop window sits along each axis,
    /// 0.0 keeping the leading edge and 1.0 keeping the trailing edge.
    #[error("Centering ({x}, {y}) must lie within [0, 1] on both axes")]
    InvalidCentering { x: f32, y: f32 },
}

/// Error type for alpha mask operations
///
/// This error type covers failures that can occur when applying
/// alpha masks to images or replacing an existing alpha channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphaMaskError {
    /// Image and mask dimensions do not match
    ///
    /// This error occurs when attempting to apply an alpha mask
    /// to an image where the dimensions don't align properly.
    #[error("Image and mask dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },
}

/// Reason an output image could not be written
#[derive(Debug, Error)]
pub enum WriteFailure {
    /// The output extension does not name a known image format
    #[error("cannot infer an image format from the file extension")]
    UnknownFormat,

    /// The output format cannot store an alpha channel
    ///
    /// Writing a circular logo to such a format would silently lose
    /// the transparent surround, so it is rejected up front.
    #[error("{0:?} cannot store an alpha channel")]
    NoAlphaSupport(ImageFormat),

    /// The destination could not be created, written or renamed
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The encoder rejected the image
    #[error(transparent)]
    Encode(#[from] ImageError),
}

/// Error type for the circular crop operation
///
/// Failures are reported with the path that caused them. The operation is
/// all-or-nothing: when any variant is returned, the destination has not
/// been modified.
#[derive(Debug, Error)]
pub enum CropError {
    /// Command-line arguments were not `<input> <output>`
    #[error("usage: {program} <input> <output>")]
    Usage { program: String },

    /// The input file is missing, unreadable or not a supported image
    #[error("failed to decode image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    /// The output file could not be written
    #[error("failed to write image {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: WriteFailure,
    },

    /// The mask could not be built for the decoded image
    #[error(transparent)]
    Mask(#[from] EllipseMaskError),

    /// The source could not be fitted to the mask
    #[error(transparent)]
    Fit(#[from] FitError),

    /// The mask did not match the fitted image
    #[error(transparent)]
    AlphaMask(#[from] AlphaMaskError),
}

impl CropError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<WriteFailure>) -> Self {
        Self::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}
