use crate::foundation::core::Canvas;
use crate::foundation::error::{ApproxError, ApproxResult};
use crate::raster::surface::Raster;

/// Number of coordinates sampled on a canvas at `stride`.
pub fn sample_count(canvas: Canvas, stride: u32) -> usize {
    axis_samples(canvas.width, stride) * axis_samples(canvas.height, stride)
}

fn axis_samples(len: u32, stride: u32) -> usize {
    let stride = stride.max(1);
    let start = stride / 2;
    if start >= len {
        return 0;
    }
    ((len - start - 1) / stride + 1) as usize
}

/// Normalized mean absolute intensity difference between two rasters.
///
/// Samples every `stride`-th pixel on both axes, starting half a stride in, and compares the
/// single intensity channel. Returns a value in `[0, 1]`: 0 is a perfect match, 1 is black
/// against white everywhere.
pub fn distance(working: &Raster, target: &Raster, stride: u32) -> ApproxResult<f64> {
    let canvas = working.canvas();
    if canvas != target.canvas() {
        return Err(ApproxError::validation(format!(
            "fitness surfaces differ in size: {}x{} vs {}x{}",
            canvas.width,
            canvas.height,
            target.canvas().width,
            target.canvas().height
        )));
    }
    let count = sample_count(canvas, stride);
    if count == 0 {
        return Err(ApproxError::validation(format!(
            "sample stride {stride} leaves no samples on a {}x{} surface",
            canvas.width, canvas.height
        )));
    }

    let stride = stride.max(1) as usize;
    let start = stride / 2;
    let width = canvas.width as usize;
    let a = working.data();
    let b = target.data();

    let mut sum = 0u64;
    for y in (start..canvas.height as usize).step_by(stride) {
        let row = y * width;
        for x in (start..width).step_by(stride) {
            let i = (row + x) * 4;
            sum += u64::from(a[i].abs_diff(b[i]));
        }
    }

    Ok(sum as f64 / (255.0 * count as f64))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/fitness.rs"]
mod tests;
