//! Delaunay triangulation and Voronoi cell decoration
//!
//! The triangulation itself is delegated to `delaunator`. Voronoi cells are
//! read off its half-edge structure: the cell of a site is the ring of
//! circumcenters of the triangles around it.

use bytemuck::{Pod, Zeroable};
use delaunator::{EMPTY, Point, next_halfedge};
use glam::{DVec2, Vec2};

/// Delaunay triangulation of a 2D point set
pub struct Delaunay {
    sites: Vec<Point>,
    inner: delaunator::Triangulation,
}

impl Delaunay {
    /// Triangulate `points`. Fewer than three points, or a collinear set,
    /// yields an empty triangulation.
    pub fn new(points: &[Vec2]) -> Self {
        let sites: Vec<Point> = points
            .iter()
            .map(|p| Point {
                x: f64::from(p.x),
                y: f64::from(p.y),
            })
            .collect();
        let inner = delaunator::triangulate(&sites);
        Self { sites, inner }
    }

    pub fn triangle_count(&self) -> usize {
        self.inner.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.inner.triangles.is_empty()
    }

    /// Triangles as index triples into the input points
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.inner
            .triangles
            .chunks_exact(3)
            .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
    }

    /// Every undirected triangle edge exactly once
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let triangles = &self.inner.triangles;
        let halfedges = &self.inner.halfedges;
        (0..triangles.len())
            .filter(|&e| halfedges[e] == EMPTY || e < halfedges[e])
            .map(|e| [triangles[e] as u32, triangles[next_halfedge(e)] as u32])
            .collect()
    }

    /// Circumcenter of triangle `t`; non-finite for degenerate triangles
    fn circumcenter(&self, t: usize) -> Vec2 {
        let [a, b, c] = [0, 1, 2].map(|k| {
            let p = &self.sites[self.inner.triangles[3 * t + k]];
            DVec2::new(p.x, p.y)
        });
        let b = b - a;
        let c = c - a;
        let bl = b.length_squared();
        let cl = c.length_squared();
        let d = 2.0 * (b.x * c.y - b.y * c.x);
        (a + DVec2::new(c.y * bl - b.y * cl, b.x * cl - c.x * bl) / d).as_vec2()
    }

    /// Bounded Voronoi cells of every site.
    ///
    /// Cells of hull sites reach the unbounded region and are discarded, as
    /// are cells with a non-finite vertex.
    pub fn voronoi_cells(&self) -> Vec<VoronoiCell> {
        let triangles = &self.inner.triangles;
        let halfedges = &self.inner.halfedges;

        // One incoming half-edge per site
        let mut incoming = vec![EMPTY; self.sites.len()];
        for e in 0..triangles.len() {
            let site = triangles[next_halfedge(e)];
            if incoming[site] == EMPTY {
                incoming[site] = e;
            }
        }

        let mut cells = Vec::new();
        'sites: for (site, &start) in incoming.iter().enumerate() {
            if start == EMPTY {
                continue;
            }

            let mut ring = Vec::new();
            let mut e = start;
            loop {
                ring.push(self.circumcenter(e / 3));

                e = halfedges[next_halfedge(e)];
                if e == EMPTY {
                    continue 'sites;
                }
                if e == start {
                    break;
                }
            }

            cells.extend(VoronoiCell::bounded(site, ring));
        }
        cells
    }
}

/// A bounded Voronoi cell
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Index of the input point this cell belongs to
    pub site: usize,
    /// Cell corners in rotational order
    pub vertices: Vec<Vec2>,
    /// Mean of the corners
    pub centroid: Vec2,
}

impl VoronoiCell {
    pub fn new(site: usize, vertices: Vec<Vec2>) -> Self {
        let centroid = vertices.iter().copied().sum::<Vec2>() / vertices.len().max(1) as f32;
        Self {
            site,
            vertices,
            centroid,
        }
    }

    /// A closed ring of circumcenters as a cell, or `None` if any corner is
    /// non-finite
    pub fn bounded(site: usize, ring: Vec<Vec2>) -> Option<Self> {
        ring.iter()
            .all(|v| v.is_finite())
            .then(|| Self::new(site, ring))
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Vertex of a filled Voronoi triangle
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CellVertex {
    /// Position relative to the cell centroid
    pub offset: [f32; 2],
    /// Cell centroid
    pub center: [f32; 2],
    pub color: [f32; 3],
}

impl CellVertex {
    /// Absolute position of the vertex
    pub fn position(&self) -> Vec2 {
        Vec2::from(self.offset) + Vec2::from(self.center)
    }
}

/// Fan-triangulate each cell from its first corner.
///
/// A cell with `k` corners gets `palette[k % palette.len()]`.
pub fn decorate(cells: &[VoronoiCell], palette: &[[f32; 3]]) -> Vec<CellVertex> {
    if palette.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for cell in cells {
        let color = palette[cell.len() % palette.len()];
        let center = cell.centroid.to_array();
        let vertex = |p: Vec2| CellVertex {
            offset: (p - cell.centroid).to_array(),
            center,
            color,
        };

        for j in 2..cell.len() {
            out.push(vertex(cell.vertices[0]));
            out.push(vertex(cell.vertices[j - 1]));
            out.push(vertex(cell.vertices[j]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 5x5 grid with the inner 3x3 sites jittered off any common circle.
    /// The border stays exact, so exactly the inner sites have bounded cells.
    fn jittered_grid() -> Vec<Vec2> {
        let mut points = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                let interior = (1..4).contains(&i) && (1..4).contains(&j);
                let jitter = if interior {
                    0.03 + 0.04 * ((i * 7 + j * 3) % 5) as f32
                } else {
                    0.0
                };
                points.push(Vec2::new(i as f32 + jitter, j as f32 - jitter * 0.5));
            }
        }
        points
    }

    fn nearest(points: &[Vec2], p: Vec2) -> usize {
        points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.distance(p).total_cmp(&b.distance(p)))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_empty_for_too_few_points() {
        let d = Delaunay::new(&[Vec2::ZERO, Vec2::X]);
        assert!(d.is_empty());
        assert!(d.edges().is_empty());
        assert!(d.voronoi_cells().is_empty());
    }

    #[test]
    fn test_square_triangulation() {
        let d = Delaunay::new(&[Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y]);
        assert_eq!(d.triangle_count(), 2);
        // Four sides plus one diagonal
        assert_eq!(d.edges().len(), 5);
        // Every site is on the hull
        assert!(d.voronoi_cells().is_empty());
    }

    #[test]
    fn test_edges_are_unique() {
        let d = Delaunay::new(&jittered_grid());
        let mut edges: Vec<[u32; 2]> = d
            .edges()
            .into_iter()
            .map(|[a, b]| [a.min(b), a.max(b)])
            .collect();
        let total = edges.len();
        edges.sort_unstable();
        edges.dedup();
        assert_eq!(edges.len(), total);

        let mut sides: Vec<[u32; 2]> = d
            .triangles()
            .flat_map(|[i, j, k]| [[i, j], [j, k], [k, i]])
            .map(|[a, b]| [a.min(b), a.max(b)])
            .collect();
        sides.sort_unstable();
        sides.dedup();
        assert_eq!(edges, sides);
    }

    #[test]
    fn test_hull_cells_discarded() {
        let points = jittered_grid();
        let cells = Delaunay::new(&points).voronoi_cells();
        assert_eq!(cells.len(), 9);
        for cell in &cells {
            let p = points[cell.site];
            assert!(p.x > 0.5 && p.x < 3.5 && p.y > 0.5 && p.y < 3.5);
        }
    }

    #[test]
    fn test_cell_vertices_equidistant_from_site() {
        let points = jittered_grid();
        for cell in Delaunay::new(&points).voronoi_cells() {
            let site = points[cell.site];
            for v in &cell.vertices {
                // A Voronoi vertex is no closer to another site than to its own
                let own = v.distance(site);
                let best = points.iter().map(|p| v.distance(*p)).fold(f32::MAX, f32::min);
                assert_relative_eq!(own, best, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_decorated_triangles_stay_in_cell() {
        let points = jittered_grid();
        let cells = Delaunay::new(&points).voronoi_cells();
        let palette = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let vertices = decorate(&cells, &palette);

        let expected: usize = cells.iter().map(|c| 3 * (c.len() - 2)).sum();
        assert_eq!(vertices.len(), expected);

        let mut offset = 0;
        for cell in &cells {
            let count = 3 * (cell.len() - 2);
            for tri in vertices[offset..offset + count].chunks_exact(3) {
                let centroid = tri.iter().map(CellVertex::position).sum::<Vec2>() / 3.0;
                assert_eq!(nearest(&points, centroid), cell.site);
                for v in tri {
                    assert!(cell.vertices.iter().any(|c| c.distance(v.position()) < 1e-5));
                    assert_eq!(v.color, palette[cell.len() % palette.len()]);
                    assert_eq!(v.center, cell.centroid.to_array());
                }
            }
            offset += count;
        }
    }

    #[test]
    fn test_non_finite_ring_dropped() {
        let ring = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
        let cell = VoronoiCell::bounded(3, ring.clone()).unwrap();
        assert_eq!(cell.site, 3);
        assert_eq!(cell.vertices, ring);

        let with_nan = vec![Vec2::ZERO, Vec2::new(f32::NAN, 1.0), Vec2::Y];
        assert!(VoronoiCell::bounded(3, with_nan).is_none());
        let with_inf = vec![Vec2::ZERO, Vec2::X, Vec2::new(0.0, f32::INFINITY)];
        assert!(VoronoiCell::bounded(3, with_inf).is_none());
    }

    #[test]
    fn test_decorate_empty_palette() {
        let cell = VoronoiCell::new(0, vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert!(decorate(&[cell], &[]).is_empty());
    }
}
