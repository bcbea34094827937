//! # circular-logo
//!
//! Crop an image into a circular logo with a transparent background.
//!
//! The crop is built from small image operations that are also usable on
//! their own:
//!
//! - **Ellipse Mask**: Single-channel mask of the ellipse inscribed in a rectangle
//! - **Fit With Centered Crop**: Scale to cover a target box, then crop the overflow
//! - **Alpha Mask Application**: Attach or replace an alpha channel from a grayscale mask
//! - **Circular Crop**: Mask, fit and alpha replacement combined, in memory or file to file
//!
//! ## Example Usage
//!
//! ```no_run
//! use circular_logo::{crop_to_circle, CircularCropExt, EllipseMask, FitCenteredExt, Image};
//! use image::Rgba;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // File to file
//! crop_to_circle("brand.png", "brand_circle.png")?;
//!
//! // In memory
//! let image: Image<Rgba<u8>> = Image::new(120, 80);
//! let logo = image.circular_crop()?;
//!
//! // Individual steps
//! let mask = EllipseMask::new(64, 64)?.render();
//! let square = image.fit_centered(64, 64)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `rayon`: Renders masks in parallel and enables `rayon` in `image` and `imageproc`

mod circular_logo;
mod error;

#[cfg(test)]
mod test_utils;

pub use circular_logo::apply_alpha_mask::{ApplyAlphaMaskExt, ModifyAlphaExt};
pub use circular_logo::circular_crop::{
    crop_to_circle, supports_alpha, CircularCropExt, CircularCropper, CropConfig,
};
pub use circular_logo::ellipse_mask::{Antialiasing, EllipseMask};
pub use circular_logo::fit::{
    calculate_cover_size, calculate_crop_offset, Centering, FitCenteredExt,
};
pub use error::{AlphaMaskError, CropError, EllipseMaskError, FitError, WriteFailure};

// Re-export imageproc::definitions::Image for convenience
pub use imageproc::definitions::Image;
