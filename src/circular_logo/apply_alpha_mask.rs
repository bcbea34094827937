use image::{GenericImageView, Luma, Pixel, Primitive, Rgb, Rgba};
use imageproc::{definitions::Image, map::map_colors2};

use crate::error::AlphaMaskError;

/// Trait attaching a grayscale mask to an RGB image as its alpha channel
pub trait ApplyAlphaMaskExt {
    type Mask: GenericImageView;
    type Output;

    /// Combine the color channels of `self` with `mask` as alpha.
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - When image and mask dimensions differ
    ///
    /// # Examples
    ///
    /// ```
    /// use circular_logo::{ApplyAlphaMaskExt, EllipseMask, Image};
    /// use image::Rgb;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image: Image<Rgb<u8>> = Image::from_pixel(10, 10, Rgb([255, 0, 0]));
    /// let mask = EllipseMask::new(10, 10)?.render();
    ///
    /// let logo = image.apply_alpha_mask(&mask)?;
    /// assert_eq!(logo.get_pixel(0, 0).0, [255, 0, 0, 0]);
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn apply_alpha_mask(&self, mask: &Self::Mask) -> Result<Self::Output, AlphaMaskError>;
}

/// Trait overwriting the alpha channel of an RGBA image with a mask
///
/// The mask value is copied into alpha as is. Nothing is blended with the
/// previous alpha and the color channels are left untouched.
pub trait ModifyAlphaExt {
    type Mask: GenericImageView;

    /// Replace the alpha channel, consuming the image.
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - When image and mask dimensions differ
    fn replace_alpha(self, mask: &Self::Mask) -> Result<Self, AlphaMaskError>
    where
        Self: Sized;

    /// Replace the alpha channel in place.
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - When image and mask dimensions differ
    fn replace_alpha_mut(&mut self, mask: &Self::Mask) -> Result<&mut Self, AlphaMaskError>;
}

impl<S> ApplyAlphaMaskExt for Image<Rgb<S>>
where
    Rgb<S>: Pixel<Subpixel = S>,
    Rgba<S>: Pixel<Subpixel = S>,
    Luma<S>: Pixel<Subpixel = S>,
    S: Primitive,
{
    type Mask = Image<Luma<S>>;
    type Output = Image<Rgba<S>>;

    fn apply_alpha_mask(&self, mask: &Self::Mask) -> Result<Self::Output, AlphaMaskError> {
        validate_dimensions(self, mask)?;

        Ok(map_colors2(self, mask, |Rgb([red, green, blue]), Luma([alpha])| {
            Rgba([red, green, blue, alpha])
        }))
    }
}

impl<S> ModifyAlphaExt for Image<Rgba<S>>
where
    Rgba<S>: Pixel<Subpixel = S>,
    Luma<S>: Pixel<Subpixel = S>,
    S: Primitive,
{
    type Mask = Image<Luma<S>>;

    fn replace_alpha(mut self, mask: &Self::Mask) -> Result<Self, AlphaMaskError> {
        self.replace_alpha_mut(mask)?;
        Ok(self)
    }

    fn replace_alpha_mut(&mut self, mask: &Self::Mask) -> Result<&mut Self, AlphaMaskError> {
        validate_dimensions(self, mask)?;

        self.pixels_mut()
            .zip(mask.pixels())
            .for_each(|(pixel, &Luma([alpha]))| pixel.0[3] = alpha);

        Ok(self)
    }
}

#[inline]
fn validate_dimensions<I, M>(image: &I, mask: &M) -> Result<(), AlphaMaskError>
where
    I: GenericImageView,
    M: GenericImageView,
{
    let expected = image.dimensions();
    let actual = mask.dimensions();

    if expected == actual {
        Ok(())
    } else {
        Err(AlphaMaskError::DimensionMismatch { expected, actual })
    }
}
