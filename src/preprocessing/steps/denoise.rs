use crate::error::OcrError;
use image::GrayImage;
use imageproc::filter::median_filter;

/// Median kernel radius: radius 1 is a 3x3 window
const KERNEL_RADIUS: u32 = 1;

/// Apply median filter to reduce noise
/// Median filter preserves edges better than Gaussian blur
pub fn apply(image: GrayImage) -> Result<GrayImage, OcrError> {
    Ok(median_filter(&image, KERNEL_RADIUS, KERNEL_RADIUS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_denoise_removes_isolated_pixels() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([128]));
        img.put_pixel(5, 5, Luma([0])); // "pepper" noise
        img.put_pixel(2, 7, Luma([255])); // "salt" noise

        let result = apply(img).unwrap();

        assert_eq!(result.get_pixel(5, 5).0[0], 128);
        assert_eq!(result.get_pixel(2, 7).0[0], 128);
    }

    #[test]
    fn test_denoise_keeps_solid_strokes() {
        // A 3-pixel-wide vertical bar survives a 3x3 median
        let img = GrayImage::from_fn(12, 12, |x, _| {
            if (4..7).contains(&x) {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        let result = apply(img).unwrap();

        assert_eq!(result.get_pixel(5, 6).0[0], 0);
        assert_eq!(result.get_pixel(1, 6).0[0], 255);
        assert_eq!(result.dimensions(), (12, 12));
    }
}
