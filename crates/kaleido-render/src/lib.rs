//! Kaleido Render - WGPU renderers for the Kaleido demos
//!
//! Two scenes share one window runner:
//!
//! - [`LatticeScene`]: kaleidoscopic background behind a point field with its
//!   Delaunay edges and Voronoi cells
//! - [`BlobScene`]: a noise-warped icosphere seen from an orbiting camera
//!
//! ## Example
//!
//! ```rust,ignore
//! use kaleido_render::{window, LatticeScene, WindowConfig};
//! use kaleido_core::field::FieldConfig;
//!
//! window::run::<LatticeScene>(WindowConfig::default(), FieldConfig::default())?;
//! ```

pub mod background;
pub mod context;
pub mod frame_stats;
pub mod lattice;
pub mod scene;
pub mod sphere;
pub mod window;

mod error;

// Re-export wgpu for users who need texture formats, etc.
pub use wgpu;
pub use winit;

pub use background::{Background, BackgroundUniforms};
pub use context::{DEPTH_FORMAT, DepthTarget, GpuContext, init_with_surface};
pub use error::{RenderError, Result};
pub use frame_stats::FrameStats;
pub use lattice::{FieldRenderer, FieldUniforms, LatticeScene};
pub use scene::{FrameContext, Scene};
pub use sphere::{BlobConfig, BlobScene, SphereRenderer, SphereUniforms};
pub use window::{WindowConfig, controls_help, run};
