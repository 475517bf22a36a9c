//! PNG encoding/decoding and `data:` URLs.
//!
//! Export produces `data:image/png;base64,...` the way `canvas.toDataURL`
//! does. Import accepts either raw PNG bytes or such a data URL and always
//! yields RGBA8, expanding palette, grayscale and 16-bit sources.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::consts::PNG_DATA_URL_PREFIX;
use crate::error::CanvasError;
use crate::pixels::PixelBuffer;

/// Encode pixels as an RGBA8 PNG.
///
/// # Errors
///
/// Returns [`CanvasError::ImageEncode`] if the encoder fails.
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>, CanvasError> {
    let encode_err = |e: png::EncodingError| CanvasError::ImageEncode(e.to_string());
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, pixels.width(), pixels.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(pixels.data()).map_err(encode_err)?;
        writer.finish().map_err(encode_err)?;
    }
    Ok(out)
}

/// Decode PNG bytes into RGBA8 pixels.
///
/// # Errors
///
/// Returns [`CanvasError::ImageDecode`] if the bytes are not a PNG the
/// decoder understands.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, CanvasError> {
    let decode_err = |e: png::DecodingError| CanvasError::ImageDecode(e.to_string());
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(decode_err)?;

    let (color, _) = reader.output_color_type();
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let samples = color.samples();
    let mut raw = vec![0_u8; width as usize * height as usize * samples];
    let frame = reader.next_frame(&mut raw).map_err(decode_err)?;
    raw.truncate(frame.buffer_size());

    let rgba = match color {
        png::ColorType::Rgba => raw,
        png::ColorType::Rgb => raw.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect(),
        png::ColorType::GrayscaleAlpha => raw.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect(),
        png::ColorType::Grayscale => raw.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(CanvasError::ImageDecode("palette was not expanded".to_owned()));
        }
    };
    PixelBuffer::from_rgba(width, height, rgba)
}

/// Encode pixels as a `data:image/png;base64,...` URL.
///
/// # Errors
///
/// Returns [`CanvasError::ImageEncode`] if PNG encoding fails.
pub fn to_data_url(pixels: &PixelBuffer) -> Result<String, CanvasError> {
    let png = encode_png(pixels)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png)))
}

/// Decode a base64 `data:image/png` URL.
///
/// # Errors
///
/// Returns [`CanvasError::ImageDecode`] if the URL is not a base64 PNG data
/// URL or the payload is not a valid PNG.
pub fn from_data_url(url: &str) -> Result<PixelBuffer, CanvasError> {
    let Some(payload) = url.trim().strip_prefix(PNG_DATA_URL_PREFIX) else {
        return Err(CanvasError::ImageDecode("expected a base64 image/png data URL".to_owned()));
    };
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| CanvasError::ImageDecode(e.to_string()))?;
    decode_png(&bytes)
}

/// Load an image from either a data URL or raw PNG bytes.
///
/// # Errors
///
/// Returns [`CanvasError::ImageDecode`] if neither form decodes.
pub fn load(source: &[u8]) -> Result<PixelBuffer, CanvasError> {
    match std::str::from_utf8(source) {
        Ok(text) if text.trim_start().starts_with("data:") => from_data_url(text),
        _ => decode_png(source),
    }
}
