//! Test utilities for circular-logo
//!
//! This module provides common functionality for testing image operations.
//! It is only compiled when running tests.

use image::{Luma, Pixel, Primitive, Rgb, Rgba};
use imageproc::definitions::Image;

/// Creates a 2x2 RGB image with known pixel values:
/// - (0,0): [200, 150, 100]
/// - (1,0): [100, 200, 150]
/// - (0,1): [150, 100, 200]
/// - (1,1): [50, 75, 25]
pub fn create_test_rgb_image() -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgb([200, 150, 100]));
    image.put_pixel(1, 0, Rgb([100, 200, 150]));
    image.put_pixel(0, 1, Rgb([150, 100, 200]));
    image.put_pixel(1, 1, Rgb([50, 75, 25]));
    image
}

/// Same colors as [`create_test_rgb_image`] with alpha 255, 128, 64 and 0.
pub fn create_test_rgba_image() -> Image<Rgba<u8>> {
    let mut image: Image<Rgba<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgba([200, 150, 100, 255]));
    image.put_pixel(1, 0, Rgba([100, 200, 150, 128]));
    image.put_pixel(0, 1, Rgba([150, 100, 200, 64]));
    image.put_pixel(1, 1, Rgba([50, 75, 25, 0]));
    image
}

/// Creates a 2x2 alpha mask: 255, 192, 128, 64 in row-major order.
pub fn create_test_alpha_mask() -> Image<Luma<u8>> {
    let mut mask: Image<Luma<u8>> = Image::new(2, 2);
    mask.put_pixel(0, 0, Luma([255]));
    mask.put_pixel(1, 0, Luma([192]));
    mask.put_pixel(0, 1, Luma([128]));
    mask.put_pixel(1, 1, Luma([64]));
    mask
}

/// Compares two pixel values with a tolerance for resampling errors.
///
/// # Returns
/// `true` if all subpixel values are within the tolerance, `false` otherwise
pub fn pixels_approx_equal<P>(expected: P, actual: P, tolerance: f32) -> bool
where
    P: Pixel,
    P::Subpixel: Primitive,
    f32: From<P::Subpixel>,
{
    expected
        .channels()
        .iter()
        .zip(actual.channels())
        .all(|(&e, &a)| (f32::from(e) - f32::from(a)).abs() <= tolerance)
}

/// Creates a checkerboard RGB image of the given size.
pub fn create_large_test_image(width: u32, height: u32) -> Image<Rgb<u8>> {
    Image::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([200, 150, 100])
        } else {
            Rgb([100, 150, 200])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_test_rgba_image_matches_rgb_colors() {
        let rgb = create_test_rgb_image();
        let rgba = create_test_rgba_image();

        for (rgb_pixel, rgba_pixel) in rgb.pixels().zip(rgba.pixels()) {
            assert_eq!(&rgb_pixel.0[..], &rgba_pixel.0[..3]);
        }
    }

    #[test]
    fn pixels_approx_equal_with_tolerant_comparison_returns_true() {
        let pixel1 = Rgb([100u8, 150u8, 200u8]);
        let pixel2 = Rgb([101u8, 149u8, 201u8]);
        let pixel3 = Rgb([105u8, 145u8, 205u8]);

        assert!(pixels_approx_equal(pixel1, pixel2, 1.5));
        assert!(!pixels_approx_equal(pixel1, pixel3, 1.5));
    }

    #[test]
    fn create_large_test_image_with_valid_input_creates_checkerboard() {
        let image = create_large_test_image(10, 10);
        assert_eq!(image.dimensions(), (10, 10));
        assert_eq!(image.get_pixel(0, 0), &Rgb([200, 150, 100]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([100, 150, 200]));
        assert_eq!(image.get_pixel(1, 1), &Rgb([200, 150, 100]));
    }
}
