use image::imageops::{self, FilterType};
use image::Pixel;
use imageproc::definitions::Image;

use crate::error::FitError;

/// Where the crop window sits inside the scaled image
///
/// Each axis is a fraction in `[0, 1]`: 0.0 keeps the leading edge (left or
/// top), 1.0 keeps the trailing edge and 0.5 crops evenly from both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centering {
    pub x: f32,
    pub y: f32,
}

impl Centering {
    /// Crop evenly from both sides on both axes.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// # Errors
    ///
    /// * `FitError::InvalidCentering` - When either fraction is outside `[0, 1]` or NaN
    pub fn new(x: f32, y: f32) -> Result<Self, FitError> {
        let centering = Self { x, y };
        centering.validate()?;
        Ok(centering)
    }

    fn validate(self) -> Result<(), FitError> {
        let unit = 0.0..=1.0;
        if unit.contains(&self.x) && unit.contains(&self.y) {
            Ok(())
        } else {
            Err(FitError::InvalidCentering {
                x: self.x,
                y: self.y,
            })
        }
    }
}

impl Default for Centering {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Size the source must be scaled to so that it covers the target
///
/// The scale factor is `max(target_w / source_w, target_h / source_h)`. One
/// axis matches the target exactly and the other is at least as large.
pub fn calculate_cover_size(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (source_width, source_height) = source;
    let (target_width, target_height) = target;

    let scale = (f64::from(target_width) / f64::from(source_width))
        .max(f64::from(target_height) / f64::from(source_height));

    let scaled = |length: u32, minimum: u32| -> u32 {
        ((f64::from(length) * scale).round() as u32).max(minimum)
    };

    (
        scaled(source_width, target_width),
        scaled(source_height, target_height),
    )
}

/// Top-left corner of the crop window inside a scaled image
pub fn calculate_crop_offset(
    scaled: (u32, u32),
    target: (u32, u32),
    centering: Centering,
) -> (u32, u32) {
    let overflow_x = scaled.0.saturating_sub(target.0);
    let overflow_y = scaled.1.saturating_sub(target.1);

    (
        (f64::from(overflow_x) * f64::from(centering.x)).floor() as u32,
        (f64::from(overflow_y) * f64::from(centering.y)).floor() as u32,
    )
}

/// Trait providing scale-to-cover followed by a centered crop
///
/// The result always has exactly the requested dimensions and the source's
/// aspect ratio is preserved; whatever overflows the target box is cropped.
pub trait FitCenteredExt<P: Pixel> {
    /// Fit into `width x height`, cropping evenly from both sides.
    ///
    /// Uses bicubic (Catmull-Rom) resampling.
    ///
    /// # Errors
    ///
    /// * `FitError::InvalidTargetDimensions` - When the target is empty
    /// * `FitError::EmptySource` - When the image is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use circular_logo::{FitCenteredExt, Image};
    /// use image::Rgba;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let banner: Image<Rgba<u8>> = Image::new(300, 100);
    /// let square = banner.fit_centered(64, 64)?;
    ///
    /// assert_eq!(square.dimensions(), (64, 64));
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn fit_centered(&self, width: u32, height: u32) -> Result<Image<P>, FitError>;

    /// Fit into `width x height` with an explicit crop position and filter.
    ///
    /// # Errors
    ///
    /// * `FitError::InvalidTargetDimensions` - When the target is empty
    /// * `FitError::EmptySource` - When the image is empty
    /// * `FitError::InvalidCentering` - When `centering` is outside `[0, 1]`
    fn fit_with_centering(
        &self,
        width: u32,
        height: u32,
        centering: Centering,
        filter: FilterType,
    ) -> Result<Image<P>, FitError>;
}

impl<P> FitCenteredExt<P> for Image<P>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    fn fit_centered(&self, width: u32, height: u32) -> Result<Image<P>, FitError> {
        self.fit_with_centering(width, height, Centering::CENTER, FilterType::CatmullRom)
    }

    fn fit_with_centering(
        &self,
        width: u32,
        height: u32,
        centering: Centering,
        filter: FilterType,
    ) -> Result<Image<P>, FitError> {
        if width == 0 || height == 0 {
            return Err(FitError::InvalidTargetDimensions { width, height });
        }
        let source = self.dimensions();
        if source.0 == 0 || source.1 == 0 {
            return Err(FitError::EmptySource {
                width: source.0,
                height: source.1,
            });
        }
        centering.validate()?;

        let target = (width, height);
        if source == target {
            return Ok(self.clone());
        }

        let scaled_size = calculate_cover_size(source, target);
        let (x, y) = calculate_crop_offset(scaled_size, target, centering);

        if scaled_size == source {
            return Ok(imageops::crop_imm(self, x, y, width, height).to_image());
        }

        let scaled = imageops::resize(self, scaled_size.0, scaled_size.1, filter);
        Ok(imageops::crop_imm(&scaled, x, y, width, height).to_image())
    }
}
