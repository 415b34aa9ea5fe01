use crate::error::{Error, Result};
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

/// Model input edge length. The whole pipeline is fixed to square
/// 512x512 inputs; aspect ratio is deliberately ignored.
pub const IMAGE_SIZE: u32 = 512;

// ImageNet normalization constants
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Fetches and decodes the photo behind `url`.
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<DynamicImage> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::ImageLoad(format!("Failed to fetch {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(Error::ImageLoad(format!(
            "Failed to fetch {}: HTTP {}",
            url,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::ImageLoad(format!("Failed to read image body: {}", e)))?;

    decode_bytes(&bytes)
}

pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| Error::ImageLoad(format!("Failed to decode image: {}", e)))
}

/// Turns a decoded image into the model's input tensor.
///
/// Fixed algorithm: resize to IMAGE_SIZE x IMAGE_SIZE (aspect ignored),
/// drop alpha, planar CHW layout, scale to [0, 1], then per-channel
/// ImageNet standardization.
pub fn preprocess(img: &DynamicImage) -> Result<Array4<f32>> {
    let resized = img.resize_exact(IMAGE_SIZE, IMAGE_SIZE, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let raw = rgb.into_raw();
    let hw = (IMAGE_SIZE * IMAGE_SIZE) as usize;

    // Normalize in pixel order first (contiguous reads and writes), then
    // transpose HWC -> CHW in cache-friendly tiles.
    let mut interleaved = vec![0f32; 3 * hw];
    for (i, pixel) in raw.chunks_exact(3).enumerate() {
        let off = i * 3;
        interleaved[off] = (pixel[0] as f32 / 255.0 - MEAN[0]) / STD[0];
        interleaved[off + 1] = (pixel[1] as f32 / 255.0 - MEAN[1]) / STD[1];
        interleaved[off + 2] = (pixel[2] as f32 / 255.0 - MEAN[2]) / STD[2];
    }

    let mut data = vec![0f32; 3 * hw];
    const TILE: usize = 1024;
    for base in (0..hw).step_by(TILE) {
        let end = (base + TILE).min(hw);
        for i in base..end {
            let src = i * 3;
            data[i] = interleaved[src];
            data[hw + i] = interleaved[src + 1];
            data[2 * hw + i] = interleaved[src + 2];
        }
    }

    Array4::from_shape_vec((1, 3, IMAGE_SIZE as usize, IMAGE_SIZE as usize), data)
        .map_err(|e| Error::ImageLoad(format!("Failed to create tensor: {}", e)))
}

/// Inverse of [`preprocess`] for preview purposes: undoes the per-channel
/// standardization and rescales to 8-bit RGB. Out-of-range values clamp.
pub fn tensor_to_preview(tensor: &Array4<f32>) -> Result<RgbImage> {
    let shape = tensor.shape();
    if shape != [1, 3, IMAGE_SIZE as usize, IMAGE_SIZE as usize] {
        return Err(Error::ImageLoad(format!(
            "Unexpected tensor shape {:?} for preview",
            shape
        )));
    }

    let mut img = RgbImage::new(IMAGE_SIZE, IMAGE_SIZE);
    for y in 0..IMAGE_SIZE as usize {
        for x in 0..IMAGE_SIZE as usize {
            let mut pixel = [0u8; 3];
            for c in 0..3 {
                let value = (tensor[[0, c, y, x]] * STD[c] + MEAN[c]) * 255.0;
                pixel[c] = value.round().clamp(0.0, 255.0) as u8;
            }
            img.put_pixel(x as u32, y as u32, image::Rgb(pixel));
        }
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_image() -> DynamicImage {
        // Smooth ramps so minor resampling bleed stays within tolerance.
        let img = RgbImage::from_fn(IMAGE_SIZE, IMAGE_SIZE, |x, y| {
            Rgb([(x / 2) as u8, (y / 2) as u8, ((x + y) / 4) as u8])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn output_is_chw_and_normalized() {
        // A solid red image: R plane all (1 - mean)/std, G and B planes all
        // (0 - mean)/std of their channel.
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            IMAGE_SIZE,
            IMAGE_SIZE,
            Rgb([255, 0, 0]),
        ));
        let tensor = preprocess(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 512, 512]);

        let r = (1.0 - MEAN[0]) / STD[0];
        let g = (0.0 - MEAN[1]) / STD[1];
        let b = (0.0 - MEAN[2]) / STD[2];
        assert!((tensor[[0, 0, 0, 0]] - r).abs() < 1e-6);
        assert!((tensor[[0, 0, 511, 511]] - r).abs() < 1e-6);
        assert!((tensor[[0, 1, 256, 17]] - g).abs() < 1e-6);
        assert!((tensor[[0, 2, 42, 300]] - b).abs() < 1e-6);
    }

    #[test]
    fn preview_round_trips_within_rounding_error() {
        let original = gradient_image();
        let tensor = preprocess(&original).unwrap();
        let preview = tensor_to_preview(&tensor).unwrap();

        // Source is already 512x512 so resize is identity up to filtering.
        let source = original.to_rgb8();
        for (x, y, pixel) in preview.enumerate_pixels() {
            let expected = source.get_pixel(x, y);
            for c in 0..3 {
                let diff = (pixel[c] as i16 - expected[c] as i16).abs();
                assert!(
                    diff <= 1,
                    "channel {} at ({}, {}): {} vs {}",
                    c,
                    x,
                    y,
                    pixel[c],
                    expected[c]
                );
            }
        }
    }

    #[test]
    fn preview_rejects_wrong_shape() {
        let tensor = Array4::<f32>::zeros((1, 3, 16, 16));
        assert!(tensor_to_preview(&tensor).is_err());
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::ImageLoad(_)));
    }
}
