//! Startup geometry of the lattice demo
//!
//! Points, Delaunay edges and decorated Voronoi triangles are generated once
//! and uploaded as-is; only uniforms change per frame.

use crate::{Error, Result};
use crate::field::{FieldConfig, extract_points};
use crate::palette::LATTICE_COLORS;
use crate::triangulate::{CellVertex, Delaunay, decorate};

/// GPU-ready buffers for the lattice demo
#[derive(Debug, Clone, Default)]
pub struct LatticeGeometry {
    /// Grid-local point positions
    pub points: Vec<[f32; 2]>,
    /// Delaunay edges as index pairs into `points`
    pub edges: Vec<[u32; 2]>,
    /// Filled Voronoi cells, three vertices per triangle
    pub cells: Vec<CellVertex>,
    /// Number of bounded Voronoi cells behind `cells`
    pub cell_count: usize,
}

impl LatticeGeometry {
    pub fn build(config: &FieldConfig) -> Result<Self> {
        let points = extract_points(config)?;
        let delaunay = Delaunay::new(&points);
        if delaunay.is_empty() {
            return Err(Error::Triangulation(format!(
                "{} extracted points do not span a triangle",
                points.len()
            )));
        }
        let voronoi = delaunay.voronoi_cells();

        Ok(Self {
            points: points.iter().map(|p| p.to_array()).collect(),
            edges: delaunay.edges(),
            cells: decorate(&voronoi, &LATTICE_COLORS),
            cell_count: voronoi.len(),
        })
    }

    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }

    /// Number of indices in the edge list
    pub fn edge_index_count(&self) -> u32 {
        (self.edges.len() * 2) as u32
    }

    pub fn cell_vertex_count(&self) -> u32 {
        self.cells.len() as u32
    }
}
