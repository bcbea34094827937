use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{ImageError, ImageFormat, ImageReader, Rgba};
use imageproc::definitions::Image;
use tracing::{debug, info};

use crate::error::{CropError, WriteFailure};

use super::apply_alpha_mask::ModifyAlphaExt;
use super::ellipse_mask::{Antialiasing, EllipseMask};
use super::fit::{Centering, FitCenteredExt};

const DEFAULT_PROGRAM_NAME: &str = "crop-to-circle";

/// Everything one circular crop needs to know
///
/// Paths are explicit values rather than constants so the same cropper can
/// be pointed at any source and destination.
#[derive(Debug, Clone, PartialEq)]
pub struct CropConfig {
    /// Image to read. Any format the decoder recognises.
    pub input_path: PathBuf,
    /// Where to write the result. The extension selects the format, which
    /// must be able to store alpha.
    pub output_path: PathBuf,
    pub antialiasing: Antialiasing,
    pub centering: Centering,
}

impl CropConfig {
    /// Create a config with a hard-edged mask and an evenly centered fit.
    ///
    /// # Arguments
    ///
    /// * `input_path` - Image to read
    /// * `output_path` - Destination, whose extension selects the format
    ///
    /// # Returns
    ///
    /// A config with `Antialiasing::None` and `Centering::CENTER`
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            antialiasing: Antialiasing::default(),
            centering: Centering::default(),
        }
    }

    /// Replace the boundary policy of the mask.
    #[must_use]
    pub fn with_antialiasing(mut self, antialiasing: Antialiasing) -> Self {
        self.antialiasing = antialiasing;
        self
    }

    /// Replace the crop position used when the source is fitted.
    ///
    /// The value is validated when the crop runs, not here.
    #[must_use]
    pub fn with_centering(mut self, centering: Centering) -> Self {
        self.centering = centering;
        self
    }

    /// Build a config from `<program> <input> <output>`.
    ///
    /// # Errors
    ///
    /// * `CropError::Usage` - Unless exactly two arguments follow the program name
    pub fn from_args<I>(args: I) -> Result<Self, CropError>
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::<OsString>::into);
        let program = args
            .next()
            .and_then(|program| {
                Path::new(&program)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_owned());

        match (args.next(), args.next(), args.next()) {
            (Some(input), Some(output), None) => Ok(Self::new(input, output)),
            _ => Err(CropError::Usage { program }),
        }
    }
}

/// Trait cutting an RGBA image into a circle (an ellipse for non-square input)
pub trait CircularCropExt {
    /// Crop with a hard-edged mask and an evenly centered fit.
    ///
    /// # Errors
    ///
    /// * `CropError::Mask` - When the image is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use circular_logo::{CircularCropExt, Image};
    /// use image::Rgba;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let square: Image<Rgba<u8>> = Image::from_pixel(100, 100, Rgba([255, 0, 0, 255]));
    /// let logo = square.circular_crop()?;
    ///
    /// assert_eq!(logo.get_pixel(50, 50).0, [255, 0, 0, 255]);
    /// assert_eq!(logo.get_pixel(1, 1).0[3], 0);
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn circular_crop(&self) -> Result<Image<Rgba<u8>>, CropError>;

    /// Crop with an explicit boundary policy and crop position.
    ///
    /// # Errors
    ///
    /// * `CropError::Mask` - When the image is empty or the sample count is zero
    /// * `CropError::Fit` - When `centering` is outside `[0, 1]`
    fn circular_crop_with(
        &self,
        antialiasing: Antialiasing,
        centering: Centering,
    ) -> Result<Image<Rgba<u8>>, CropError>;
}

impl CircularCropExt for Image<Rgba<u8>> {
    fn circular_crop(&self) -> Result<Image<Rgba<u8>>, CropError> {
        self.circular_crop_with(Antialiasing::default(), Centering::default())
    }

    fn circular_crop_with(
        &self,
        antialiasing: Antialiasing,
        centering: Centering,
    ) -> Result<Image<Rgba<u8>>, CropError> {
        let mask = EllipseMask::inscribed_in(self)?.with_antialiasing(antialiasing)?;
        let (width, height) = mask.dimensions();
        debug!(width, height, ?antialiasing, "rendering ellipse mask");
        let alpha = mask.render();

        debug!(?centering, "fitting source to mask");
        let fitted = self.fit_with_centering(width, height, centering, FilterType::CatmullRom)?;

        Ok(fitted.replace_alpha(&alpha)?)
    }
}

/// Whether `format` can carry the transparent surround of a circular logo.
pub const fn supports_alpha(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::WebP
            | ImageFormat::Tiff
            | ImageFormat::Tga
            | ImageFormat::Bmp
            | ImageFormat::Ico
    )
}

/// File-to-file circular crop
///
/// Reads `input_path`, crops it into a circle and writes the result to
/// `output_path`. The destination is replaced atomically: the image is
/// encoded into a temporary file next to it and renamed into place only
/// once encoding succeeded, so a failure never leaves a truncated file.
///
/// A replaced destination keeps its permissions. A new one is created with
/// the same mode a plain `File::create` would give it under the current
/// umask.
#[derive(Debug, Clone)]
pub struct CircularCropper {
    config: CropConfig,
}

impl CircularCropper {
    /// Wrap `config` for one or more runs.
    pub const fn new(config: CropConfig) -> Self {
        Self { config }
    }

    /// The config every run uses.
    pub const fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Run the crop and return the path that was written.
    ///
    /// # Errors
    ///
    /// * `CropError::Decode` - When the input is missing or not an image
    /// * `CropError::Write` - When the output extension is unknown, names a
    ///   format without alpha, or the destination cannot be written
    /// * `CropError::Mask` / `CropError::Fit` - When the config is invalid
    pub fn run(&self) -> Result<PathBuf, CropError> {
        let CropConfig {
            input_path,
            output_path,
            antialiasing,
            centering,
        } = &self.config;

        let source = load_rgba(input_path)?;
        debug!(
            path = %input_path.display(),
            width = source.width(),
            height = source.height(),
            "decoded source image"
        );
        let format = output_format(output_path)?;

        let logo = source.circular_crop_with(*antialiasing, *centering)?;
        drop(source);

        save_atomically(&logo, output_path, format)?;
        info!(path = %output_path.display(), "created circular logo");

        Ok(output_path.clone())
    }
}

/// Crop `input_path` into a circle and write it to `output_path`.
///
/// # Errors
///
/// See [`CircularCropper::run`].
pub fn crop_to_circle(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<(), CropError> {
    let config = CropConfig::new(input_path.as_ref(), output_path.as_ref());
    CircularCropper::new(config).run().map(|_| ())
}

fn load_rgba(path: &Path) -> Result<Image<Rgba<u8>>, CropError> {
    let decode_error = |source: ImageError| CropError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| decode_error(err.into()))?
        .decode()
        .map_err(decode_error)?;

    Ok(image.into_rgba8())
}

fn output_format(path: &Path) -> Result<ImageFormat, CropError> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| CropError::write(path, WriteFailure::UnknownFormat))?;

    if supports_alpha(format) {
        Ok(format)
    } else {
        Err(CropError::write(path, WriteFailure::NoAlphaSupport(format)))
    }
}

fn save_atomically(
    image: &Image<Rgba<u8>>,
    path: &Path,
    format: ImageFormat,
) -> Result<(), CropError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".circular-logo-");
    // Mode 0666 is narrowed by the umask when the file is opened.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut staged = builder
        .tempfile_in(directory)
        .map_err(|err| CropError::write(path, err))?;
    debug!(staged = %staged.path().display(), ?format, "encoding circular logo");

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        image
            .write_to(&mut writer, format)
            .map_err(|err| CropError::write(path, err))?;
        writer.flush().map_err(|err| CropError::write(path, err))?;
    }

    if let Ok(existing) = fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(|err| CropError::write(path, err))?;
    }

    staged
        .persist(path)
        .map_err(|err| CropError::write(path, err.error))?;

    Ok(())
}
