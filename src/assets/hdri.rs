//! HDR environment image decoding.

use crate::util::Result;

/// Decoded equirectangular environment image, RGBA 32-bit float, ready for an
/// `Rgba32Float` GPU texture.
pub struct EnvImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<f32>,
}

impl EnvImage {
    /// Bytes per row when uploaded as Rgba32Float.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4 * std::mem::size_of::<f32>() as u32
    }
}

/// Decode an HDR/EXR image from raw bytes (format is sniffed from content).
pub fn decode(bytes: &[u8]) -> Result<EnvImage> {
    let img = image::load_from_memory(bytes)?;
    let rgba = img.to_rgba32f();
    let (width, height) = rgba.dimensions();

    log::debug!("decoded environment image: {}x{}", width, height);

    Ok(EnvImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::hdr::HdrEncoder;
    use image::Rgb;

    fn encode_hdr(width: usize, height: usize, pixels: &[Rgb<f32>]) -> Vec<u8> {
        let mut bytes = Vec::new();
        HdrEncoder::new(&mut bytes)
            .encode(pixels, width, height)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_radiance_hdr() {
        // 2x2 image with one pixel brighter than display range
        let pixels = [
            Rgb([0.5f32, 0.25, 0.125]),
            Rgb([4.0, 2.0, 1.0]),
            Rgb([0.0, 0.0, 0.0]),
            Rgb([1.0, 1.0, 1.0]),
        ];
        let bytes = encode_hdr(2, 2, &pixels);

        let env = decode(&bytes).unwrap();
        assert_eq!((env.width, env.height), (2, 2));
        assert_eq!(env.pixels.len(), 2 * 2 * 4);
        assert_eq!(env.bytes_per_row(), 2 * 16);

        // HDR values survive decoding (RGBE has limited precision)
        let bright_r = env.pixels[4];
        assert!((bright_r - 4.0).abs() / 4.0 < 0.02);
        // Alpha is filled in as opaque
        assert_eq!(env.pixels[3], 1.0);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode(b"definitely not an image").is_err());
    }
}
