//! The seam between the window runner and a demo

use crate::{GpuContext, Result};
use glam::Vec2;

/// Everything a scene may read while drawing one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Seconds since the window opened
    pub elapsed: f32,
    /// Surface size in physical pixels
    pub width: u32,
    pub height: u32,
    /// Physical pixels per logical pixel
    pub pixel_ratio: f32,
    /// Last pointer position in `[-1, 1]²`
    pub pointer: Vec2,
}

impl FrameContext {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn resolution(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// A demo driven by the window runner: built once, drawn every frame
pub trait Scene: Sized {
    /// Startup parameters
    type Config;

    /// Window title used when the caller does not set one
    const NAME: &'static str;

    fn create(gpu: &GpuContext, config: &Self::Config, width: u32, height: u32) -> Result<Self>;

    /// Called whenever the surface is reconfigured
    fn resize(&mut self, width: u32, height: u32);

    /// Record and submit this frame's draw calls into `target`
    fn render(&mut self, target: &wgpu::TextureView, frame: &FrameContext);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_aspect() {
        let frame = FrameContext {
            elapsed: 0.0,
            width: 1920,
            height: 1080,
            pixel_ratio: 1.0,
            pointer: Vec2::ZERO,
        };
        assert_relative_eq!(frame.aspect(), 16.0 / 9.0);
        assert_eq!(frame.resolution(), [1920.0, 1080.0]);
    }
}
