//! Image Preprocessing
//!
//! Turns client-supplied image payloads into the tensor layout the species
//! classifier was trained on:
//! - base64 (optionally as a `data:` URL) decoded to bytes
//! - bytes decoded by the `image` crate (PNG, JPEG, WebP, BMP)
//! - bilinear resize to a square input
//! - BGR channel order, values in [0, 1], CHW layout

use base64::{engine::general_purpose, Engine as _};
use image::{imageops::FilterType, DynamicImage};

use crate::utils::error::{BotaniqError, Result};

/// Decode a base64 image payload
///
/// Accepts bare base64 as well as `data:image/...;base64,` URLs. Whitespace
/// inside the payload (line-wrapped encoders) is ignored.
pub fn decode_base64_image(data: &str) -> Result<DynamicImage> {
    let payload = strip_data_url(data.trim());
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if compact.is_empty() {
        return Err(BotaniqError::InvalidInput("image payload is empty".to_string()));
    }

    let bytes = general_purpose::STANDARD.decode(compact.as_bytes())?;
    Ok(image::load_from_memory(&bytes)?)
}

fn strip_data_url(data: &str) -> &str {
    match data.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .unwrap_or(rest),
        None => data,
    }
}

/// Resize and scale an image into a flat CHW vector of length `3 * size * size`
///
/// Channels are emitted as B, G, R: the classifier was trained on images read
/// through OpenCV, which keeps pixels in BGR order.
pub fn preprocess(image: &DynamicImage, size: u32) -> Vec<f32> {
    let resized = image.resize_exact(size, size, FilterType::Triangle);
    let rgb = resized.to_rgb8();
    let num_pixels = (size * size) as usize;

    let mut pixels = vec![0.0f32; 3 * num_pixels];

    for (i, pixel) in rgb.pixels().enumerate() {
        pixels[i] = pixel[2] as f32 / 255.0;
        pixels[num_pixels + i] = pixel[1] as f32 / 255.0;
        pixels[2 * num_pixels + i] = pixel[0] as f32 / 255.0;
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_base64(image: &DynamicImage) -> String {
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        general_purpose::STANDARD.encode(buf)
    }

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_decode_plain_base64() {
        let encoded = png_base64(&solid(20, 10, [0, 128, 0]));
        let decoded = decode_base64_image(&encoded).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (20, 10));
    }

    #[test]
    fn test_decode_data_url() {
        let encoded = format!("data:image/png;base64,{}", png_base64(&solid(4, 4, [1, 2, 3])));
        let decoded = decode_base64_image(&encoded).unwrap();
        assert_eq!(decoded.width(), 4);
    }

    #[test]
    fn test_decode_ignores_line_wrapping() {
        let encoded = png_base64(&solid(8, 8, [9, 9, 9]));
        let wrapped: String = encoded
            .as_bytes()
            .chunks(16)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(decode_base64_image(&wrapped).is_ok());
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_base64_image("   "),
            Err(BotaniqError::InvalidInput(_))
        ));
        assert!(matches!(
            decode_base64_image("not base64!"),
            Err(BotaniqError::Decode(_))
        ));
        // Valid base64 that is not an image
        let text = general_purpose::STANDARD.encode(b"hello plants");
        assert!(matches!(
            decode_base64_image(&text),
            Err(BotaniqError::Image(_))
        ));
    }

    #[test]
    fn test_preprocess_layout_and_bgr_order() {
        let red = solid(30, 50, [255, 0, 0]);
        let pixels = preprocess(&red, 16);
        let plane = 16 * 16;

        assert_eq!(pixels.len(), 3 * plane);
        // Blue plane first, red plane last
        assert!(pixels[..plane].iter().all(|&v| v == 0.0));
        assert!(pixels[plane..2 * plane].iter().all(|&v| v == 0.0));
        assert!(pixels[2 * plane..].iter().all(|&v| v > 0.99 && v <= 1.0));
    }
}
