//! # Kaleido Core
//!
//! CPU-side geometry and camera math for the Kaleido demos.
//!
//! Everything in this crate is a pure function of fixed parameters, elapsed
//! time, or the last pointer position. The GPU side lives in `kaleido-render`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kaleido_core::prelude::*;
//!
//! // Points, Delaunay edges and Voronoi fill for the lattice demo
//! let lattice = LatticeGeometry::build(&FieldConfig::default())?;
//!
//! // Camera for the current frame
//! let camera = Camera::lattice(16.0 / 9.0, Vec2::new(0.2, -0.1));
//! let view_proj = camera.view_projection_matrix();
//! ```
//!
//! ## Conventions
//!
//! - **Coordinate system**: Right-handed, Y-up
//! - **Clip space**: wgpu conventions (depth in `[0, 1]`)
//! - **Angles**: radians

pub mod camera;
pub mod field;
pub mod lattice;
pub mod mesh;
pub mod palette;
pub mod pointer;
pub mod triangulate;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::camera::{Camera, OrbitClock};
    pub use crate::field::{FieldConfig, ScalarField, extract_points};
    pub use crate::lattice::LatticeGeometry;
    pub use crate::mesh::Mesh;
    pub use crate::palette::{BLOB_PALETTE, LATTICE_COLORS, degamma};
    pub use crate::pointer::Pointer;
    pub use crate::triangulate::{CellVertex, Delaunay, VoronoiCell, decorate};

    // Math (re-export glam)
    pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

    pub use crate::{Error, Result};
}
