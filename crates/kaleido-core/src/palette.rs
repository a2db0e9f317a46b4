//! Fixed colour palettes
//!
//! Values are display-referred: they are written to the surface unchanged.

/// Lattice demo colours: background stripes, points, edges and Voronoi fill
pub const LATTICE_COLORS: [[f32; 3]; 5] = [
    [48.0 / 255.0, 0.0, 48.0 / 255.0],
    [72.0 / 255.0, 0.0, 72.0 / 255.0],
    [96.0 / 255.0, 24.0 / 255.0, 72.0 / 255.0],
    [192.0 / 255.0, 72.0 / 255.0, 72.0 / 255.0],
    [240.0 / 255.0, 114.0 / 255.0, 65.0 / 255.0],
];

/// Blob demo colours. Entry 0 clears the frame, entry 2 tints the surface.
pub const BLOB_PALETTE: [[f32; 4]; 5] = [
    [110.0 / 255.0, 100.0 / 255.0, 88.0 / 255.0, 1.0],
    [207.0 / 255.0, 167.0 / 255.0, 98.0 / 255.0, 1.0],
    [237.0 / 255.0, 197.0 / 255.0, 125.0 / 255.0, 1.0],
    [144.0 / 255.0, 25.0 / 255.0, 19.0 / 255.0, 1.0],
    [253.0 / 255.0, 90.0 / 255.0, 35.0 / 255.0, 1.0],
];

/// Raise every component to the power 2.2
pub fn degamma(color: [f32; 4]) -> [f32; 4] {
    color.map(|c| c.powf(2.2))
}

/// Pad RGB colours to vec4 for GPU uniform arrays
pub fn to_vec4(colors: &[[f32; 3]; 5]) -> [[f32; 4]; 5] {
    colors.map(|[r, g, b]| [r, g, b, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degamma_darkens() {
        let tint = degamma(BLOB_PALETTE[2]);
        for k in 0..3 {
            assert!(tint[k] < BLOB_PALETTE[2][k]);
        }
        assert_relative_eq!(tint[3], 1.0);
        assert_relative_eq!(degamma([0.5; 4])[0], 0.5_f32.powf(2.2));
    }
}
