use std::fs;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use image::{ImageFormat, ImageReader, RgbaImage};
use jpeg_decoder::{Decoder as JpegDecoder, PixelFormat};
use tracing::debug;

/// Header facts about a source image, read without decoding pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    pub format: Option<ImageFormat>,
    pub width: u32,
    pub height: u32,
}

pub fn probe(path: &Path) -> Result<SourceInfo> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()
        .context("failed to guess image format")?;
    let format = reader.format();
    anyhow::ensure!(format.is_some(), "unrecognised image format");
    let (width, height) = reader
        .into_dimensions()
        .context("failed to read image dimensions")?;
    anyhow::ensure!(
        width > 0 && height > 0,
        "image has zero-sized dimensions {width}x{height}"
    );
    Ok(SourceInfo {
        format,
        width,
        height,
    })
}

/// Decode `path` to RGBA, at least `min_w`×`min_h` pixels in size.
///
/// Large JPEGs that are about to be shrunk are decoded at a reduced DCT
/// scale; everything else goes through the generic decoder at full size.
pub fn load_rgba(path: &Path, info: &SourceInfo, min_w: u32, min_h: u32) -> Result<RgbaImage> {
    let shrinking = min_w < info.width && min_h < info.height;
    if shrinking && matches!(info.format, Some(ImageFormat::Jpeg)) {
        match decode_jpeg_scaled(path, min_w, min_h) {
            Ok(img) if img.width() >= min_w && img.height() >= min_h => return Ok(img),
            Ok(img) => {
                debug!(
                    path = %path.display(),
                    decoded = ?img.dimensions(),
                    wanted = ?(min_w, min_h),
                    "scaled JPEG decode came out too small; falling back"
                );
            }
            Err(err) => {
                debug!(
                    "failed to decode JPEG {:?} with scaled fast path: {err:#}; falling back",
                    path
                );
            }
        }
    }

    Ok(image::open(path)
        .with_context(|| format!("failed to load image at {}", path.display()))?
        .to_rgba8())
}

fn decode_jpeg_scaled(path: &Path, target_w: u32, target_h: u32) -> Result<RgbaImage> {
    let file =
        fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut decoder = JpegDecoder::new(BufReader::new(file));
    let clamp = |v: u32| v.clamp(1, u32::from(u16::MAX)) as u16;
    decoder
        .scale(clamp(target_w), clamp(target_h))
        .map_err(jpeg_error)?;
    let pixels = decoder.decode().map_err(jpeg_error)?;
    let info = decoder
        .info()
        .ok_or_else(|| anyhow!("JPEG header missing after decode"))?;
    let width = info.width as u32;
    let height = info.height as u32;

    let rgba: Vec<u8> = match info.pixel_format {
        PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        PixelFormat::L8 => pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        PixelFormat::CMYK32 => pixels.chunks_exact(4).flat_map(cmyk_to_rgba).collect(),
        PixelFormat::L16 => {
            anyhow::bail!("16-bit grayscale JPEGs are not supported by the scaled decoder");
        }
    };

    RgbaImage::from_raw(width, height, rgba).context("decoded JPEG buffer is truncated")
}

fn jpeg_error(err: jpeg_decoder::Error) -> anyhow::Error {
    match err {
        jpeg_decoder::Error::Unsupported(feature) => {
            anyhow!("unsupported JPEG feature: {feature:?}")
        }
        other => anyhow!(other),
    }
}

fn cmyk_to_rgba(chunk: &[u8]) -> [u8; 4] {
    let k = chunk[3] as f32 / 255.0;
    let channel = |v: u8| {
        let v = v as f32 / 255.0;
        let v = v * (1.0 - k) + k;
        ((1.0 - v) * 255.0).round().clamp(0.0, 255.0) as u8
    };
    [channel(chunk[0]), channel(chunk[1]), channel(chunk[2]), 255]
}
