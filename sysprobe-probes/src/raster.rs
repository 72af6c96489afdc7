//! Raster Stages
//!
//! A software framebuffer serves as the render target: fixed-size
//! RGBA pixel storage with clipped rectangle fills and full clears. Three
//! stages draw into it: small random fills (drawing throughput), repeated
//! full clears (surface-clear throughput), and large random fills
//! (fill rate).

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use rand::Rng;
use sysprobe_core::{ProbeError, Stopwatch};

/// Fixed-size RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Framebuffer {
    /// Buffer of `width` x `height` pixels, initially black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width * height) as usize],
        }
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill a rectangle, clipped to the buffer bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(self.height)..y_end {
            let base = (row * self.width) as usize;
            for col in x..x_end {
                self.pixels[base + col as usize] = color;
            }
        }
    }

    /// Overwrite every pixel with one color.
    pub fn clear(&mut self, color: [u8; 4]) {
        self.pixels.fill(color);
    }

    /// Read one pixel. Panics outside bounds; test helper only.
    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Raster drawing stage: many small random fills.
pub fn stage_raster_drawing(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let (w, h) = (cx.framebuffer.width(), cx.framebuffer.height());
    let rects = cx.settings.raster_rects;

    let watch = Stopwatch::start();
    for _ in 0..rects {
        let color = [cx.rng.gen::<u8>(), 100, 150, 255];
        let x = cx.rng.gen_range(0..w);
        let y = cx.rng.gen_range(0..h);
        cx.framebuffer.fill_rect(x, y, 2, 2, color);
    }
    Ok(StageOutcome::timed_ms(watch.elapsed_ms()))
}

/// Surface clears stage: repeated full-surface clears with random colors.
pub fn stage_surface_clears(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let passes = cx.settings.clear_passes;

    let watch = Stopwatch::start();
    for _ in 0..passes {
        let color = [cx.rng.gen::<u8>(), cx.rng.gen::<u8>(), cx.rng.gen::<u8>(), 255];
        cx.framebuffer.clear(color);
    }
    Ok(StageOutcome::timed_ms(watch.elapsed_ms()))
}

/// Fill-rate stage: a modest number of large fills.
pub fn stage_fill_rate(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let (w, h) = (cx.framebuffer.width(), cx.framebuffer.height());
    let rects = cx.settings.fill_rects;

    let watch = Stopwatch::start();
    for _ in 0..rects {
        let color = [cx.rng.gen::<u8>(), cx.rng.gen::<u8>(), cx.rng.gen::<u8>(), 204];
        let x = cx.rng.gen_range(0..w);
        let y = cx.rng.gen_range(0..h);
        cx.framebuffer.fill_rect(x, y, 50, 50, color);
    }
    let elapsed = watch.elapsed_ms();
    Ok(StageOutcome::new(format!(
        "drew {} large rectangles in {:.2} ms",
        rects, elapsed
    ))
    .with_metric(elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_writes_color() {
        let mut fb = Framebuffer::new(10, 10);
        fb.fill_rect(2, 3, 2, 2, [9, 8, 7, 255]);

        assert_eq!(fb.pixel(2, 3), [9, 8, 7, 255]);
        assert_eq!(fb.pixel(3, 4), [9, 8, 7, 255]);
        assert_eq!(fb.pixel(5, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn fill_rect_clips_at_edges() {
        let mut fb = Framebuffer::new(10, 10);
        // Extends past both edges; must not panic.
        fb.fill_rect(8, 8, 50, 50, [1, 2, 3, 255]);
        assert_eq!(fb.pixel(9, 9), [1, 2, 3, 255]);
    }

    #[test]
    fn clear_overwrites_every_pixel() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear([10, 20, 30, 255]);
        assert_eq!(fb.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(fb.pixel(3, 3), [10, 20, 30, 255]);
    }
}
