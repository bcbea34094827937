use image::{GenericImageView, Luma};
use imageproc::definitions::Image;
use itertools::iproduct;

use crate::error::EllipseMaskError;

/// Boundary policy for pixels the ellipse edge passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Hard edge: a pixel is fully opaque when its center lies inside the
    /// ellipse and fully transparent otherwise.
    #[default]
    None,
    /// Coverage estimated on an `n x n` grid of sub-pixel samples.
    ///
    /// `Supersample(1)` samples only the pixel center and therefore renders
    /// the same mask as [`Antialiasing::None`].
    Supersample(u32),
}

/// Single-channel mask holding the largest ellipse inscribed in a rectangle
///
/// The ellipse is centered at `(width / 2, height / 2)` with radii
/// `width / 2` and `height / 2`, so it touches all four edges at their
/// midpoints. On a square mask it is a circle. Pixels inside are 255,
/// pixels outside are 0.
///
/// Pixels are sampled at their centers, i.e. pixel `(x, y)` is tested at
/// `(x + 0.5, y + 0.5)`. This keeps the mask symmetric about both axes.
///
/// # Examples
///
/// ```
/// use circular_logo::EllipseMask;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mask = EllipseMask::new(100, 100)?.render();
///
/// assert_eq!(mask.get_pixel(50, 50).0, [255]);
/// assert_eq!(mask.get_pixel(0, 0).0, [0]);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EllipseMask {
    width: u32,
    height: u32,
    antialiasing: Antialiasing,
}

impl EllipseMask {
    /// Create a mask description for a `width x height` rectangle.
    ///
    /// # Errors
    ///
    /// * `EllipseMaskError::InvalidDimensions` - When either dimension is zero
    pub const fn new(width: u32, height: u32) -> Result<Self, EllipseMaskError> {
        if width == 0 || height == 0 {
            return Err(EllipseMaskError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            antialiasing: Antialiasing::None,
        })
    }

    /// Create a mask matching the dimensions of `image`.
    ///
    /// # Errors
    ///
    /// * `EllipseMaskError::InvalidDimensions` - When the image is empty
    pub fn inscribed_in<I: GenericImageView>(image: &I) -> Result<Self, EllipseMaskError> {
        let (width, height) = image.dimensions();
        Self::new(width, height)
    }

    /// Select the boundary policy.
    ///
    /// # Errors
    ///
    /// * `EllipseMaskError::InvalidSampleCount` - For `Antialiasing::Supersample(0)`
    pub const fn with_antialiasing(
        mut self,
        antialiasing: Antialiasing,
    ) -> Result<Self, EllipseMaskError> {
        if let Antialiasing::Supersample(0) = antialiasing {
            return Err(EllipseMaskError::InvalidSampleCount(0));
        }
        self.antialiasing = antialiasing;
        Ok(self)
    }

    /// Width and height of the rectangle the ellipse is inscribed in.
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The boundary policy `render` uses.
    pub const fn antialiasing(&self) -> Antialiasing {
        self.antialiasing
    }

    /// Whether the center of pixel `(x, y)` lies inside the ellipse.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.contains_point(f64::from(x) + 0.5, f64::from(y) + 0.5)
    }

    /// Opacity of pixel `(x, y)` under the configured boundary policy.
    pub fn opacity(&self, x: u32, y: u32) -> u8 {
        match self.antialiasing {
            Antialiasing::None => {
                if self.contains(x, y) {
                    u8::MAX
                } else {
                    0
                }
            }
            Antialiasing::Supersample(samples) => self.supersampled_opacity(x, y, samples),
        }
    }

    /// Draw the mask.
    ///
    /// Rendering is a pure function of the dimensions and the boundary
    /// policy; two renders of equal masks are bitwise identical.
    #[cfg(not(feature = "rayon"))]
    pub fn render(&self) -> Image<Luma<u8>> {
        Image::from_fn(self.width, self.height, |x, y| Luma([self.opacity(x, y)]))
    }

    /// Draw the mask.
    ///
    /// Rendering is a pure function of the dimensions and the boundary
    /// policy; two renders of equal masks are bitwise identical.
    #[cfg(feature = "rayon")]
    pub fn render(&self) -> Image<Luma<u8>> {
        use rayon::iter::ParallelIterator;

        let mut mask: Image<Luma<u8>> = Image::new(self.width, self.height);
        mask.par_enumerate_pixels_mut()
            .for_each(|(x, y, pixel)| *pixel = Luma([self.opacity(x, y)]));
        mask
    }

    fn contains_point(&self, px: f64, py: f64) -> bool {
        let radius_x = f64::from(self.width) / 2.0;
        let radius_y = f64::from(self.height) / 2.0;
        let dx = (px - radius_x) / radius_x;
        let dy = (py - radius_y) / radius_y;
        dx * dx + dy * dy <= 1.0
    }

    fn supersampled_opacity(&self, x: u32, y: u32, samples: u32) -> u8 {
        let step = 1.0 / f64::from(samples);
        let origin_x = f64::from(x);
        let origin_y = f64::from(y);

        let hits = iproduct!(0..samples, 0..samples)
            .filter(|&(sy, sx)| {
                self.contains_point(
                    origin_x + (f64::from(sx) + 0.5) * step,
                    origin_y + (f64::from(sy) + 0.5) * step,
                )
            })
            .count();

        let total = f64::from(samples) * f64::from(samples);
        (hits as f64 * f64::from(u8::MAX) / total).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_with_zero_dimension_returns_error() {
        assert_eq!(
            EllipseMask::new(0, 10),
            Err(EllipseMaskError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
        assert!(EllipseMask::new(10, 0).is_err());
    }

    #[test]
    fn with_antialiasing_rejects_zero_samples() {
        let mask = EllipseMask::new(4, 4).unwrap();
        assert_eq!(
            mask.with_antialiasing(Antialiasing::Supersample(0)),
            Err(EllipseMaskError::InvalidSampleCount(0))
        );
    }

    #[test]
    fn accessors_report_configuration() {
        let mask = EllipseMask::new(12, 5).unwrap();
        assert_eq!(mask.dimensions(), (12, 5));
        assert_eq!(mask.antialiasing(), Antialiasing::None);

        let mask = mask.with_antialiasing(Antialiasing::Supersample(2)).unwrap();
        assert_eq!(mask.antialiasing(), Antialiasing::Supersample(2));
    }

    #[test]
    fn render_4x4_mask_has_expected_layout() {
        let mask = EllipseMask::new(4, 4).unwrap().render();

        #[rustfmt::skip]
        let expected: [u8; 16] = [
              0, 255, 255,   0,
            255, 255, 255, 255,
            255, 255, 255, 255,
              0, 255, 255,   0,
        ];
        assert_eq!(mask.as_raw().as_slice(), &expected);
    }

    #[test]
    fn render_100x100_touches_edge_midpoints() {
        let mask = EllipseMask::new(100, 100).unwrap().render();

        assert_eq!(mask.get_pixel(50, 50).0, [255]);
        assert_eq!(mask.get_pixel(50, 0).0, [255]);
        assert_eq!(mask.get_pixel(50, 99).0, [255]);
        assert_eq!(mask.get_pixel(0, 50).0, [255]);
        assert_eq!(mask.get_pixel(99, 50).0, [255]);

        assert_eq!(mask.get_pixel(0, 0).0, [0]);
        assert_eq!(mask.get_pixel(1, 1).0, [0]);
        assert_eq!(mask.get_pixel(99, 99).0, [0]);
    }

    #[test]
    fn render_non_square_mask_is_inscribed_ellipse() {
        let mask = EllipseMask::new(20, 10).unwrap().render();

        assert_eq!(mask.dimensions(), (20, 10));
        assert_eq!(mask.get_pixel(0, 5).0, [255]);
        assert_eq!(mask.get_pixel(19, 5).0, [255]);
        assert_eq!(mask.get_pixel(10, 0).0, [255]);
        assert_eq!(mask.get_pixel(10, 9).0, [255]);
        assert_eq!(mask.get_pixel(1, 1).0, [0]);
        assert_eq!(mask.get_pixel(18, 8).0, [0]);
    }

    #[test]
    fn render_is_symmetric_about_both_axes() {
        let mask = EllipseMask::new(17, 11).unwrap().render();
        let (width, height) = mask.dimensions();

        for (x, y, pixel) in mask.enumerate_pixels() {
            assert_eq!(pixel, mask.get_pixel(width - 1 - x, y));
            assert_eq!(pixel, mask.get_pixel(x, height - 1 - y));
        }
    }

    #[test]
    fn render_hard_edge_only_uses_extreme_values() {
        let mask = EllipseMask::new(33, 21).unwrap().render();
        assert!(mask.pixels().all(|Luma([v])| *v == 0 || *v == 255));
    }

    #[test]
    fn single_sample_matches_hard_edge() {
        let hard = EllipseMask::new(15, 9).unwrap();
        let sampled = hard
            .with_antialiasing(Antialiasing::Supersample(1))
            .unwrap();

        assert_eq!(hard.render(), sampled.render());
    }

    #[test]
    fn supersampling_softens_only_the_boundary() {
        let mask = EllipseMask::new(40, 40)
            .unwrap()
            .with_antialiasing(Antialiasing::Supersample(4))
            .unwrap()
            .render();

        assert_eq!(mask.get_pixel(20, 20).0, [255]);
        assert_eq!(mask.get_pixel(0, 0).0, [0]);
        assert!(mask.pixels().any(|Luma([v])| *v > 0 && *v < 255));
    }

    #[test]
    fn inscribed_in_uses_image_dimensions() {
        let image: Image<Luma<u8>> = Image::new(7, 3);
        let mask = EllipseMask::inscribed_in(&image).unwrap();
        assert_eq!(mask.dimensions(), (7, 3));
    }
}
