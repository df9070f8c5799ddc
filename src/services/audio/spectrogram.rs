//! Mel spectrogram rendering.
//!
//! The inference engine returns the mel as a matrix of dB values,
//! `n_mels` rows by `frames` columns. It is rendered into a PNG with time
//! on the horizontal axis and low frequencies at the bottom.

use image::{ImageBuffer, Rgb};
use std::path::Path;

use crate::errors::{AppError, AppResult};

// Anchor colors of the colormap, dark violet to bright yellow
const COLORMAP: [[f32; 3]; 5] = [
    [13.0, 8.0, 135.0],
    [126.0, 3.0, 168.0],
    [204.0, 71.0, 120.0],
    [248.0, 149.0, 64.0],
    [240.0, 249.0, 33.0],
];

/// Render a mel matrix into a PNG image at `path`
pub fn render(mel: &[Vec<f32>], path: &Path) -> AppResult<()> {
    let n_mels = mel.len();
    let frames = mel.first().map(|row| row.len()).unwrap_or(0);
    if n_mels == 0 || frames == 0 {
        return Err(AppError::Other(
            "Cannot render an empty spectrogram".to_string(),
        ));
    }
    if mel.iter().any(|row| row.len() != frames) {
        return Err(AppError::Other(
            "Spectrogram rows have inconsistent lengths".to_string(),
        ));
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for value in mel.iter().flatten() {
        min = min.min(*value);
        max = max.max(*value);
    }
    let range = if (max - min).abs() < f32::EPSILON {
        1.0
    } else {
        max - min
    };

    let mut img = ImageBuffer::new(frames as u32, n_mels as u32);
    for (band, row) in mel.iter().enumerate() {
        // Низкие частоты внизу изображения
        let y = (n_mels - 1 - band) as u32;
        for (frame, value) in row.iter().enumerate() {
            let t = (value - min) / range;
            img.put_pixel(frame as u32, y, colorize(t));
        }
    }

    img.save(path)
        .map_err(|e| AppError::Other(format!("Failed to save spectrogram: {}", e)))?;

    Ok(())
}

fn colorize(t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0) * (COLORMAP.len() - 1) as f32;
    let idx = (t as usize).min(COLORMAP.len() - 2);
    let frac = t - idx as f32;

    let lo = COLORMAP[idx];
    let hi = COLORMAP[idx + 1];
    Rgb([
        (lo[0] + (hi[0] - lo[0]) * frac) as u8,
        (lo[1] + (hi[1] - lo[1]) * frac) as u8,
        (lo[2] + (hi[2] - lo[2]) * frac) as u8,
    ])
}
