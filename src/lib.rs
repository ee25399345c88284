//! # colpick
//!
//! Pick the dominant colors of an image with a plain k-means over its RGB pixels.
//!
//! ```rust,no_run
//! use colpick::{extract_colors_bytes, ExtractOptions};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! for color in extract_colors_bytes(&bytes, &ExtractOptions::default())? {
//!     println!("{} {:.1}%", color.hex, color.share * 100.0);
//! }
//! # Ok::<(), colpick::ColpickError>(())
//! ```

use js_sys::{Array, Object, Reflect};
use log::debug;
use palette::Srgb;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod kmeans;
pub mod pixels;

pub use color::to_hex;
pub use error::{ColpickError, Result};
pub use kmeans::{
    Centroid, Clustering, DEFAULT_K, DEFAULT_MAX_ITERATIONS, KMeans, Point, cluster,
};
pub use pixels::DEFAULT_RESIZE;

/// One extracted color with its display forms.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DominantColor {
    pub rgb: Srgb<u8>,
    /// `#rrggbb`
    pub hex: String,
    /// Fraction of the sampled pixels closest to this color (0.0-1.0).
    pub share: f32,
}

/// Knobs for a full image-to-colors extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    pub k: usize,
    pub max_iterations: usize,
    /// Resample to exactly this size before clustering; `None` keeps every pixel.
    pub resize: Option<(u32, u32)>,
    /// Fixed seed for reproducible output; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            resize: Some(DEFAULT_RESIZE),
            seed: None,
        }
    }
}

/// Cluster `points` and describe each resulting color, keeping cluster order.
pub fn dominant_colors(points: &[Point], options: &ExtractOptions) -> Result<Vec<DominantColor>> {
    let mut rng = match options.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let colors = KMeans::new(options.k, options.max_iterations)
        .run(points, &mut rng)?
        .colors();

    // Shares are measured against the rounded colors actually reported.
    let reported: Vec<Centroid> = colors
        .iter()
        .map(|c| [c.red as f64, c.green as f64, c.blue as f64])
        .collect();
    let mut counts = vec![0usize; colors.len()];
    for &p in points {
        counts[kmeans::nearest(p, &reported)] += 1;
    }

    let total = points.len() as f32;
    Ok(colors
        .into_iter()
        .zip(counts)
        .map(|(rgb, n)| DominantColor {
            rgb,
            hex: to_hex(rgb),
            share: n as f32 / total,
        })
        .collect())
}

/// Decode `input`, sample its pixels and return the dominant colors.
pub fn extract_colors_bytes(input: &[u8], options: &ExtractOptions) -> Result<Vec<DominantColor>> {
    let img = pixels::decode(input)?;
    debug!(
        "decoded {}x{} image, resize = {:?}",
        img.width(),
        img.height(),
        options.resize
    );
    let points = pixels::to_points(&img, options.resize);
    dominant_colors(&points, options)
}

/// Browser entry point: extract `k` dominant colors from uploaded image bytes.
///
/// Returns `{ palette: string[], rgb: number[][], share: number[] }` with the
/// arrays in the same color order.
#[wasm_bindgen]
pub fn extract_colors(input: Vec<u8>, k: usize, seed: Option<u64>) -> std::result::Result<Object, JsValue> {
    let options = ExtractOptions {
        k,
        seed,
        ..ExtractOptions::default()
    };
    let colors = extract_colors_bytes(&input, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let palette_js = Array::new();
    let rgb_js = Array::new();
    let share_js = Array::new();
    for color in &colors {
        palette_js.push(&JsValue::from_str(&color.hex));
        let triple = Array::new();
        triple.push(&JsValue::from(color.rgb.red));
        triple.push(&JsValue::from(color.rgb.green));
        triple.push(&JsValue::from(color.rgb.blue));
        rgb_js.push(&triple);
        share_js.push(&JsValue::from_f64(color.share as f64));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("rgb"), &rgb_js)?;
    Reflect::set(&result, &JsValue::from_str("share"), &share_js)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_sum_to_one() {
        let mut points = vec![[250u8, 10, 10]; 30];
        points.extend(vec![[10u8, 10, 250]; 10]);
        let options = ExtractOptions {
            k: 2,
            seed: Some(1),
            ..ExtractOptions::default()
        };

        let colors = dominant_colors(&points, &options).unwrap();
        let total: f32 = colors.iter().map(|c| c.share).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn two_flat_colors_split_by_share() {
        let mut points = vec![[250u8, 10, 10]; 30];
        points.extend(vec![[10u8, 10, 250]; 10]);
        let options = ExtractOptions {
            k: 2,
            seed: Some(4),
            ..ExtractOptions::default()
        };

        let mut colors = dominant_colors(&points, &options).unwrap();
        colors.sort_by(|a, b| b.share.total_cmp(&a.share));
        assert_eq!(colors[0].hex, "#fa0a0a");
        assert!((colors[0].share - 0.75).abs() < 1e-6);
        assert_eq!(colors[1].hex, "#0a0afa");
    }

    #[test]
    fn default_options_match_reference_use() {
        let options = ExtractOptions::default();
        assert_eq!(options.k, 5);
        assert_eq!(options.max_iterations, 100);
        assert_eq!(options.resize, Some((200, 200)));
    }
}
