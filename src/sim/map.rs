//! Static Wall Grid
//!
//! An immutable 2D grid of wall codes plus the derived list of wall boundary
//! segments the collision engine intersects movement against. Built once at
//! startup, read-only thereafter.

use serde::{Deserialize, Serialize};

use crate::geom::Line;

/// Immutable tile grid. A cell is walkable iff its code is `<= 0`; positive
/// codes are wall/texture identifiers owned by the (external) renderer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl GridMap {
    /// Build a map from row-major cell codes. Panics if the dimensions do
    /// not match the cell count; maps are embedded or loader-produced, so a
    /// mismatch is a programming error.
    pub fn new(width: usize, height: usize, cells: Vec<i32>) -> Self {
        assert_eq!(
            cells.len(),
            width * height,
            "map dimensions {}x{} do not match {} cells",
            width,
            height,
            cells.len()
        );
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Wall code at a cell, or `None` outside the grid.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Option<i32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Whether the tile containing the world point can be stood on.
    /// Out-of-bounds points are not walkable.
    pub fn is_walkable(&self, x: f64, y: f64) -> bool {
        if x < 0.0 || y < 0.0 {
            return false;
        }
        match self.cell(x as usize, y as usize) {
            Some(code) => code <= 0,
            None => false,
        }
    }

    /// Boundary segments of every wall cell, each face pushed outward by
    /// `clip` so movers stop short of the visible wall plane.
    pub fn wall_segments(&self, clip: f64) -> Vec<Line> {
        let mut segments = Vec::new();
        for cy in 0..self.height {
            for cx in 0..self.width {
                if self.cells[cy * self.width + cx] <= 0 {
                    continue;
                }
                let x1 = cx as f64 - clip;
                let y1 = cy as f64 - clip;
                let x2 = (cx + 1) as f64 + clip;
                let y2 = (cy + 1) as f64 + clip;
                segments.push(Line::new(x1, y1, x2, y1));
                segments.push(Line::new(x2, y1, x2, y2));
                segments.push(Line::new(x2, y2, x1, y2));
                segments.push(Line::new(x1, y2, x1, y1));
            }
        }
        segments
    }

    /// Bordered arena with a few interior structures, used by the demo
    /// binary and the tests.
    pub fn demo_level() -> Self {
        const W: usize = 24;
        const H: usize = 24;
        let mut cells = vec![0i32; W * H];
        for x in 0..W {
            cells[x] = 1;
            cells[(H - 1) * W + x] = 1;
        }
        for y in 0..H {
            cells[y * W] = 1;
            cells[y * W + W - 1] = 1;
        }
        // Interior pillars and a corridor wall
        for (x, y) in [(6, 6), (6, 7), (7, 6), (16, 6), (16, 7), (17, 6)] {
            cells[y * W + x] = 2;
        }
        for y in 12..18 {
            cells[y * W + 11] = 3;
        }
        Self::new(W, H, cells)
    }
}
