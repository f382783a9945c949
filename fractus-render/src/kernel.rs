use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use fractus_core::{Complex, FractalVariant, FrameMetrics};

use crate::buffer::{byte_len, RenderBuffer};
use crate::error::RenderError;
use crate::palette::Palette;

/// Palette offset applied when the host does not choose one.
pub const DEFAULT_COLOR_PARAM: u32 = 84;

/// Everything a kernel needs to produce one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    /// Complex-plane units per pixel.
    pub scale_factor: f64,
    /// Subtracted from the scaled pixel position to land on the plane.
    pub offset: Complex,
    /// Palette offset, in palette entries.
    pub color_param: u32,
    pub variant: FractalVariant,
}

impl RenderRequest {
    pub fn from_metrics(metrics: &FrameMetrics, color_param: u32, variant: FractalVariant) -> Self {
        Self {
            width: metrics.width(),
            height: metrics.height(),
            max_iterations: metrics.max_iterations(),
            scale_factor: metrics.scale_factor(),
            offset: metrics.plane_offset(),
            color_param,
            variant,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Check that a kernel's output covers exactly this request.
    pub fn check_output(&self, buffer: &RenderBuffer) -> crate::Result<()> {
        let expected = byte_len(self.width, self.height);
        if buffer.width != self.width
            || buffer.height != self.height
            || buffer.pixels.len() != expected
        {
            return Err(RenderError::BufferSize {
                expected,
                actual: buffer.pixels.len(),
            });
        }
        Ok(())
    }

    /// The plane point sampled by pixel `(x, y)`; rows count from the top.
    #[inline]
    pub fn point_at(&self, x: u32, y: u32) -> Complex {
        Complex::new(
            x as f64 * self.scale_factor - self.offset.re,
            (self.height - y) as f64 * self.scale_factor - self.offset.im,
        )
    }
}

/// Turns a [`RenderRequest`] into RGBA pixels.
///
/// Calls are synchronous: the caller blocks until the whole buffer exists
/// and only keeps it long enough to copy it onto its surface.
pub trait RenderKernel {
    fn render(&mut self, request: &RenderRequest) -> crate::Result<RenderBuffer>;
}

/// Escape-time kernel computing rows in parallel on the rayon pool.
#[derive(Debug, Clone, Default)]
pub struct CpuKernel {
    palette: Palette,
}

impl CpuKernel {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl RenderKernel for CpuKernel {
    fn render(&mut self, request: &RenderRequest) -> crate::Result<RenderBuffer> {
        request.validate()?;
        let start = Instant::now();
        let row_bytes = request.width as usize * 4;
        let palette = &self.palette;

        let mut pixels = vec![0u8; byte_len(request.width, request.height)];
        pixels
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let c = request.point_at(x as u32, y as u32);
                    let result = request.variant.iterate(c, request.max_iterations);
                    pixel.copy_from_slice(&palette.shade(result, request.color_param));
                }
            });

        debug!(
            elapsed_ms = start.elapsed().as_millis(),
            width = request.width,
            height = request.height,
            max_iterations = request.max_iterations,
            variant = request.variant.label(),
            "Kernel render complete"
        );
        RenderBuffer::from_pixels(request.width, request.height, pixels)
    }
}
