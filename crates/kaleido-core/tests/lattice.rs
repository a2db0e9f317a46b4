//! Integration tests for the field to decorated Voronoi pipeline

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use kaleido_core::prelude::*;
use kaleido_core::triangulate::CellVertex;

fn config() -> FieldConfig {
    FieldConfig::default().with_grid_size(96)
}

#[test]
fn lattice_geometry_is_deterministic() {
    let a = LatticeGeometry::build(&config()).expect("geometry should build");
    let b = LatticeGeometry::build(&config()).expect("geometry should build");

    assert_eq!(a.points, b.points);
    assert_eq!(a.edges, b.edges);
    assert_eq!(a.cells, b.cells);
}

#[test]
fn lattice_geometry_counts_are_consistent() {
    let geometry = LatticeGeometry::build(&config()).unwrap();

    assert!(geometry.point_count() > 3, "field should yield several maxima");
    assert!(!geometry.edges.is_empty());
    assert!(geometry.cell_count > 0);
    assert_eq!(geometry.cells.len() % 3, 0);
    assert_eq!(geometry.edge_index_count() as usize, geometry.edges.len() * 2);

    let max = geometry.point_count();
    assert!(geometry.edges.iter().flatten().all(|&i| i < max));
}

#[test]
fn voronoi_triangles_stay_inside_their_cells() {
    let points = extract_points(&config()).unwrap();
    let cells = Delaunay::new(&points).voronoi_cells();
    let vertices = decorate(&cells, &LATTICE_COLORS);

    let mut offset = 0;
    for cell in &cells {
        let count = 3 * (cell.len() - 2);
        let site = points[cell.site];
        for tri in vertices[offset..offset + count].chunks_exact(3) {
            let centroid = tri.iter().map(CellVertex::position).sum::<Vec2>() / 3.0;
            let own = centroid.distance(site);
            let closest = points
                .iter()
                .map(|p| centroid.distance(*p))
                .fold(f32::MAX, f32::min);
            assert!(
                own <= closest * (1.0 + 1e-4) + 1e-6,
                "triangle escaped cell of site {}",
                cell.site
            );
        }
        offset += count;
    }
    assert_eq!(offset, vertices.len());
}

#[test]
fn invalid_field_is_rejected() {
    let result = LatticeGeometry::build(&FieldConfig::default().with_waves(0));
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
}

#[test]
fn degenerate_point_set_is_rejected() {
    // A 3x3 grid has a single interior cell
    let result = LatticeGeometry::build(&FieldConfig::default().with_grid_size(3));
    assert!(matches!(result, Err(Error::Triangulation(_))));
}
