use anyhow::{Context, Result, ensure};
use fast_image_resize as fir;
use image::RgbaImage;

/// Lanczos3 resample of `source` to exactly `target_w`×`target_h`.
///
/// The output buffer is sized with checked arithmetic and bounded by the
/// `image` crate's default allocation limit; oversized targets are errors.
pub fn resize_lanczos(source: RgbaImage, target_w: u32, target_h: u32) -> Result<RgbaImage> {
    ensure!(
        target_w > 0 && target_h > 0,
        "resize dimensions must be positive"
    );
    if source.dimensions() == (target_w, target_h) {
        return Ok(source);
    }

    let max_alloc = image::Limits::default().max_alloc.unwrap_or(u64::MAX);
    let len = u64::from(target_w)
        .checked_mul(u64::from(target_h))
        .and_then(|px| px.checked_mul(4))
        .filter(|&bytes| bytes <= max_alloc)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .with_context(|| format!("{target_w}x{target_h} RGBA buffer exceeds allocation limit"))?;

    let (src_w, src_h) = source.dimensions();
    let src = fir::images::ImageRef::new(src_w, src_h, source.as_raw(), fir::PixelType::U8x4)
        .context("source buffer does not match its dimensions")?;
    let mut pixels = vec![0u8; len];
    let mut dst =
        fir::images::Image::from_slice_u8(target_w, target_h, &mut pixels, fir::PixelType::U8x4)
            .context("destination buffer does not match its dimensions")?;
    let options = fir::ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Lanczos3));
    fir::Resizer::new()
        .resize(&src, &mut dst, Some(&options))
        .context("lanczos resize failed")?;
    drop(dst);

    RgbaImage::from_raw(target_w, target_h, pixels)
        .context("resized buffer does not match its dimensions")
}
