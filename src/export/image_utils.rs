//! 页面图片：扩展名推断、解码归一化、JPEG 编码。

use std::path::Path;

use image::{ImageError, ImageReader, RgbImage};

/// 视为“已下载页面”的图片扩展名（小写，不含点）。
pub const PAGE_EXTENSIONS: [&str; 3] = ["jpg", "png", "webp"];

/// 按 URL 推断落盘扩展名；无法判断时按 `.jpg` 保存。
pub fn page_extension(url: &str) -> &'static str {
    if url.contains(".png") {
        ".png"
    } else if url.contains(".jpg") {
        ".jpg"
    } else if url.contains(".webp") {
        ".webp"
    } else {
        ".jpg"
    }
}

pub fn is_page_file(path: &Path) -> bool {
    has_extension(path, &PAGE_EXTENSIONS)
}

pub(crate) fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| allowed.iter().any(|a| e.eq_ignore_ascii_case(a)))
}

/// 解码并统一为 RGB8：带透明通道、调色板或灰度的图片都会被展平。
pub fn decode_page(bytes: &[u8]) -> Result<RgbImage, ImageError> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// 按文件内容识别格式：页面按 URL 推断的扩展名保存，可能与实际编码不一致。
pub fn decode_page_file(path: &Path) -> Result<RgbImage, ImageError> {
    Ok(ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .to_rgb8())
}

pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut out = Vec::new();
    let q = quality.clamp(1, 100);
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, q);
    encoder.encode(
        img,
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    use std::io::Cursor;

    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
