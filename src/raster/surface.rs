use crate::foundation::core::Canvas;
use crate::foundation::error::{ApproxError, ApproxResult};

/// Integer pixel rectangle `[x, x + width) x [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Region covering an entire canvas.
    pub fn full(canvas: Canvas) -> Self {
        Self {
            x: 0,
            y: 0,
            width: canvas.width,
            height: canvas.height,
        }
    }

    /// Return `true` when the region covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn fits(self, canvas: Canvas) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(canvas.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(canvas.height)
    }
}

/// Pixels previously read from a [`Raster`], ready to be written back verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionPixels {
    /// Where the pixels came from.
    pub region: Region,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

/// Opaque RGBA8 raster used for the working composition, target frames and playback output.
///
/// Alpha is always 255: sprites are blended over the existing content and the surface itself
/// never carries transparency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Raster {
    /// Create a raster filled with a flat gray `intensity`.
    pub fn new(canvas: Canvas, intensity: u8) -> Self {
        let mut raster = Self {
            canvas,
            data: vec![0u8; canvas.rgba_len()],
        };
        raster.fill(intensity);
        raster
    }

    /// Wrap tightly packed RGBA8 bytes. Alpha is forced to opaque.
    pub fn from_rgba8(canvas: Canvas, mut data: Vec<u8>) -> ApproxResult<Self> {
        if data.len() != canvas.rgba_len() {
            return Err(ApproxError::validation(format!(
                "rgba buffer length {} does not match {}x{}",
                data.len(),
                canvas.width,
                canvas.height
            )));
        }
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Ok(Self { canvas, data })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Fill the entire surface with a flat gray.
    pub fn fill(&mut self, intensity: u8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[intensity, intensity, intensity, 255]);
        }
    }

    /// Sampled single-channel intensity at `(x, y)`.
    ///
    /// Frames are monochrome, so the red channel stands in for the whole pixel.
    #[inline]
    pub fn intensity(&self, x: u32, y: u32) -> u8 {
        self.data[((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4]
    }

    /// Copy the pixels of `region` out of the surface.
    pub fn read_region(&self, region: Region) -> ApproxResult<RegionPixels> {
        if !region.fits(self.canvas) {
            return Err(ApproxError::raster(format!(
                "read region {region:?} exceeds {}x{} surface",
                self.canvas.width, self.canvas.height
            )));
        }
        let stride = self.canvas.width as usize * 4;
        let row_len = region.width as usize * 4;
        let mut data = Vec::with_capacity(row_len * region.height as usize);
        for row in 0..region.height as usize {
            let start = (region.y as usize + row) * stride + region.x as usize * 4;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Ok(RegionPixels { region, data })
    }

    /// Write back pixels obtained from [`Raster::read_region`].
    pub fn write_region(&mut self, pixels: &RegionPixels) -> ApproxResult<()> {
        let region = pixels.region;
        if !region.fits(self.canvas) {
            return Err(ApproxError::raster(format!(
                "write region {region:?} exceeds {}x{} surface",
                self.canvas.width, self.canvas.height
            )));
        }
        let row_len = region.width as usize * 4;
        if pixels.data.len() != row_len * region.height as usize {
            return Err(ApproxError::raster("region pixel buffer has the wrong length"));
        }
        let stride = self.canvas.width as usize * 4;
        for (row, src) in pixels.data.chunks_exact(row_len.max(1)).enumerate() {
            let start = (region.y as usize + row) * stride + region.x as usize * 4;
            self.data[start..start + row_len].copy_from_slice(src);
        }
        Ok(())
    }

    /// Replace the whole buffer with `other`'s pixels. Both surfaces must share a canvas.
    pub fn copy_from(&mut self, other: &Raster) -> ApproxResult<()> {
        if self.canvas != other.canvas {
            return Err(ApproxError::validation(format!(
                "surface size mismatch: {}x{} vs {}x{}",
                self.canvas.width, self.canvas.height, other.canvas.width, other.canvas.height
            )));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
