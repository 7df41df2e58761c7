//! Fit one image onto a fixed-size canvas and write it back out.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgb, RgbImage, RgbaImage, imageops};
use serde::Deserialize;
use tracing::debug;

use crate::error::LetterboxError;
use crate::processing::decode;
use crate::processing::layout::{LetterboxPlan, plan_letterbox};
use crate::processing::resample::resize_lanczos;

/// Canvas and encoder settings shared by every job in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LetterboxSettings {
    pub width: u32,
    pub height: u32,
    /// RGB fill for the bars around the image.
    pub background: [u8; 3],
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

impl Default for LetterboxSettings {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 720,
            background: [0, 0, 0],
            quality: 95,
        }
    }
}

impl LetterboxSettings {
    /// Reject canvases that are empty or too large to allocate, and
    /// qualities the JPEG encoder does not accept.
    ///
    /// The size cap is the `image` crate's default allocation limit, applied
    /// to the RGBA working buffer (the largest one a job allocates).
    pub fn check(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "canvas must be at least 1x1, got {}x{}",
                self.width, self.height
            ));
        }
        let max_alloc = image::Limits::default().max_alloc.unwrap_or(u64::MAX);
        let bytes = u64::from(self.width)
            .checked_mul(u64::from(self.height))
            .and_then(|px| px.checked_mul(4));
        if bytes.is_none_or(|b| b > max_alloc) {
            return Err(format!(
                "canvas {}x{} exceeds the {max_alloc} byte allocation limit",
                self.width, self.height
            ));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(format!(
                "quality must be within 1..=100, got {}",
                self.quality
            ));
        }
        Ok(())
    }
}

/// Paste an already-scaled image onto a fresh canvas at the plan's offset.
///
/// The paste is opaque: source alpha is discarded, not blended.
pub fn compose(scaled: RgbaImage, plan: &LetterboxPlan, background: [u8; 3]) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(plan.canvas_width, plan.canvas_height, Rgb(background));
    let opaque = DynamicImage::ImageRgba8(scaled).into_rgb8();
    imageops::replace(
        &mut canvas,
        &opaque,
        i64::from(plan.offset_x),
        i64::from(plan.offset_y),
    );
    canvas
}

/// Resample a decoded image to the plan's size and paste it onto the canvas.
///
/// `source` may be any size; only the plan decides the geometry.
pub fn render(
    source: RgbaImage,
    plan: &LetterboxPlan,
    background: [u8; 3],
) -> anyhow::Result<RgbImage> {
    let scaled = resize_lanczos(source, plan.scaled_width, plan.scaled_height)?;
    Ok(compose(scaled, plan, background))
}

/// Read `input`, letterbox it onto the configured canvas and write `output`.
///
/// The output is encoded entirely in memory before the destination is
/// created, so a failure never leaves a partial file behind. The plan is
/// computed from the source header so that a reduced-scale JPEG decode
/// still lands on the exact same geometry.
pub fn letterbox_file(
    input: &Path,
    output: &Path,
    settings: &LetterboxSettings,
) -> Result<LetterboxPlan, LetterboxError> {
    settings.check().map_err(LetterboxError::Settings)?;
    let info = decode::probe(input).map_err(|err| LetterboxError::decode(input, err))?;
    let plan = plan_letterbox(info.width, info.height, settings.width, settings.height);
    debug!(
        path = %input.display(),
        source = ?(info.width, info.height),
        scaled = ?(plan.scaled_width, plan.scaled_height),
        offset = ?(plan.offset_x, plan.offset_y),
        scale = plan.scale,
        "planned letterbox"
    );

    let source = decode::load_rgba(input, &info, plan.scaled_width, plan.scaled_height)
        .map_err(|err| LetterboxError::decode(input, err))?;
    let canvas = render(source, &plan, settings.background)
        .map_err(|err| LetterboxError::resample(input, err))?;
    let bytes = encode(&canvas, output, settings.quality).map_err(|source| {
        LetterboxError::Encode {
            path: output.to_path_buf(),
            source,
        }
    })?;

    write_output(output, &bytes)?;
    Ok(plan)
}

/// Encode for the destination's extension; JPEG (and unknown extensions)
/// use the configured quality.
fn encode(canvas: &RgbImage, output: &Path, quality: u8) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    match ImageFormat::from_path(output) {
        Ok(ImageFormat::Jpeg) | Err(_) => {
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
            encoder.encode(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        Ok(format) => {
            canvas.write_to(&mut Cursor::new(&mut buffer), format)?;
        }
    }
    Ok(buffer)
}

fn write_output(output: &Path, bytes: &[u8]) -> Result<(), LetterboxError> {
    let io_err = |source| LetterboxError::Io {
        path: output.to_path_buf(),
        source,
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(output, bytes).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn compose_drops_alpha_and_fills_background() {
        let scaled = RgbaImage::from_pixel(2, 4, Rgba([100, 150, 200, 0]));
        let plan = plan_letterbox(1, 2, 8, 4);
        assert_eq!((plan.scaled_width, plan.scaled_height), (2, 4));

        let canvas = compose(scaled, &plan, [7, 8, 9]);
        assert_eq!(canvas.dimensions(), (8, 4));
        assert_eq!(canvas.get_pixel(0, 0).0, [7, 8, 9]);
        assert_eq!(canvas.get_pixel(3, 1).0, [100, 150, 200]);
        assert_eq!(canvas.get_pixel(4, 3).0, [100, 150, 200]);
        assert_eq!(canvas.get_pixel(5, 0).0, [7, 8, 9]);
    }

    #[test]
    fn check_rejects_empty_and_oversized_canvases() {
        let zero = LetterboxSettings {
            width: 0,
            ..Default::default()
        };
        assert!(zero.check().is_err());

        let huge = LetterboxSettings {
            width: u32::MAX,
            height: u32::MAX,
            ..Default::default()
        };
        assert!(huge.check().is_err());

        let bad_quality = LetterboxSettings {
            quality: 0,
            ..Default::default()
        };
        assert!(bad_quality.check().is_err());

        LetterboxSettings::default().check().unwrap();
    }

    #[test]
    fn oversized_canvas_fails_before_touching_the_source() {
        let settings = LetterboxSettings {
            width: 100_000,
            height: 100_000,
            ..Default::default()
        };
        let err = letterbox_file(Path::new("missing.png"), Path::new("out.jpg"), &settings)
            .unwrap_err();
        assert!(matches!(err, LetterboxError::Settings(_)), "{err:?}");
        assert_eq!(err.kind(), "settings");
    }

    #[test]
    fn render_ignores_decoded_size() {
        let plan = plan_letterbox(400, 200, 10, 10);
        // a reduced-scale decode of the same image
        let decoded = RgbaImage::from_pixel(100, 50, Rgba([0, 0, 255, 255]));
        let canvas = render(decoded, &plan, [0, 0, 0]).unwrap();
        assert_eq!(canvas.dimensions(), (10, 10));
        assert_eq!((plan.offset_x, plan.offset_y), (0, 2));
        assert_eq!(canvas.get_pixel(5, 0).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(5, 9).0, [0, 0, 0]);
        assert!(canvas.get_pixel(5, 4).0[2] >= 254);
    }

    #[test]
    fn unknown_extension_encodes_jpeg() {
        let canvas = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let bytes = encode(&canvas, Path::new("out.hero"), 95).unwrap();
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn png_extension_encodes_png() {
        let canvas = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let bytes = encode(&canvas, Path::new("out.png"), 95).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }
}
