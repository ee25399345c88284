use image::{DynamicImage, imageops::FilterType};

use crate::error::{ColpickError, Result};
use crate::kmeans::Point;

/// Working resolution for clustering; larger images are resampled to this.
pub const DEFAULT_RESIZE: (u32, u32) = (200, 200);

/// Decode an in-memory image, guessing the format from its header.
pub fn decode(input: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(input).map_err(ColpickError::image_decode)
}

/// Flatten an image into RGB points, row by row.
///
/// Alpha is dropped as-is (no compositing over a background). When `resize` is
/// given the image is stretched to exactly that size, aspect ratio ignored.
pub fn to_points(img: &DynamicImage, resize: Option<(u32, u32)>) -> Vec<Point> {
    let rgb = match resize {
        Some((w, h)) if (w, h) != (img.width(), img.height()) => {
            img.resize_exact(w, h, FilterType::CatmullRom).to_rgb8()
        }
        _ => img.to_rgb8(),
    };
    rgb.pixels().map(|p| p.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn points_are_row_major() {
        let img = RgbImage::from_fn(2, 2, |x, y| Rgb([x as u8, y as u8, 7]));
        let points = to_points(&DynamicImage::ImageRgb8(img), None);
        assert_eq!(points, vec![[0, 0, 7], [1, 0, 7], [0, 1, 7], [1, 1, 7]]);
    }

    #[test]
    fn alpha_is_dropped_not_composited() {
        let img = RgbaImage::from_pixel(3, 1, Rgba([12, 34, 56, 0]));
        let points = to_points(&DynamicImage::ImageRgba8(img), None);
        assert_eq!(points, vec![[12, 34, 56]; 3]);
    }

    #[test]
    fn resize_is_exact() {
        let img = RgbImage::from_pixel(37, 5, Rgb([90, 90, 90]));
        let points = to_points(&DynamicImage::ImageRgb8(img), Some((20, 20)));
        assert_eq!(points.len(), 400);
        assert!(points.iter().all(|&p| p == [90, 90, 90]));
    }

    #[test]
    fn decodes_png_bytes() {
        let img = RgbImage::from_pixel(4, 3, Rgb([1, 2, 3]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        let decoded = decode(&buf).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ColpickError::ImageDecode { .. }));
    }
}
