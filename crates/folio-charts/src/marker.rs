//! Point marker shapes
//!
//! ggplot's default shape sequence for discrete scales, drawn as SVG paths
//! centered on the origin.

use crate::chartkit::PathBuilder;

/// Marker shape strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Triangle,
    Square,
    Diamond,
    Plus,
}

impl MarkerShape {
    pub const ALL: [MarkerShape; 5] = [
        MarkerShape::Circle,
        MarkerShape::Triangle,
        MarkerShape::Square,
        MarkerShape::Diamond,
        MarkerShape::Plus,
    ];

    /// Shape for the `index`-th category, cycling when categories outnumber shapes
    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Plus is stroked, everything else filled
    pub fn is_stroked(&self) -> bool {
        matches!(self, MarkerShape::Plus)
    }

    /// Path of a marker with half-size `r` centered at the origin
    pub fn path(&self, r: f64) -> String {
        match self {
            MarkerShape::Circle => {
                // two half arcs
                format!(
                    "M{:.2},0A{:.2},{:.2} 0 1,0 {:.2},0A{:.2},{:.2} 0 1,0 {:.2},0Z",
                    -r, r, r, r, r, r, -r
                )
            }
            MarkerShape::Triangle => {
                let h = r * 3.0_f64.sqrt() / 2.0;
                PathBuilder::new()
                    .polygon(&[(0.0, -r), (h, r / 2.0), (-h, r / 2.0)])
                    .build()
            }
            MarkerShape::Square => {
                let s = r * 0.85;
                PathBuilder::new()
                    .polygon(&[(-s, -s), (s, -s), (s, s), (-s, s)])
                    .build()
            }
            MarkerShape::Diamond => PathBuilder::new()
                .polygon(&[(0.0, -r), (r, 0.0), (0.0, r), (-r, 0.0)])
                .build(),
            MarkerShape::Plus => PathBuilder::new()
                .move_to(-r, 0.0)
                .line_to(r, 0.0)
                .move_to(0.0, -r)
                .line_to(0.0, r)
                .build(),
        }
    }
}
