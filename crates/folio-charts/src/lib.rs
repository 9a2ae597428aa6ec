//! # folio-charts
//!
//! ggplot2-flavoured SVG charting built with Leptos.
//!
//! ## Architecture
//!
//! Uses Strategy pattern for:
//! - Scale computation (linear, categorical)
//! - Tick label formatting
//! - Marker shapes
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, ticks, paths
//! - `size` - Responsive width and margin negotiation
//! - `hover` - Unified hover/tap interaction state
//! - `panel` - Axis box, gridlines, labels, legend and tooltip around marks
//! - `marker` - Point shapes
//! - `publications`, `experience`, `education`, `reputation` - the charts

pub mod chartkit;
pub mod education;
pub mod experience;
pub mod hover;
pub mod marker;
pub mod panel;
pub mod publications;
pub mod reputation;
pub mod size;

pub use chartkit::*;
pub use education::*;
pub use experience::*;
pub use hover::*;
pub use marker::*;
pub use panel::*;
pub use publications::*;
pub use reputation::*;
pub use size::*;

// Re-export colors from folio-core for convenience
pub use folio_core::colors;

/// Chart margin configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// ggplot2-like margins with room for long category labels on the left
    pub const fn standard() -> Self {
        Self::new(10.0, 30.0, 50.0, 160.0)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::standard()
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Pixel span of the plot area along x
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin.left, self.margin.left + self.inner_width())
    }

    /// Pixel span of the plot area along y, top to bottom
    pub fn y_range(&self) -> (f64, f64) {
        (self.margin.top, self.margin.top + self.inner_height())
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

/// Height that fits `rows` rows of `row_height` plus margins, at least `min`
pub fn fitted_height(rows: usize, row_height: f64, margin: &ChartMargin, min: f64) -> f64 {
    (rows as f64 * row_height + margin.top + margin.bottom).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let dims = ChartDimensions::new(800.0, 300.0);
        assert_eq!(dims.inner_width(), 610.0);
        assert_eq!(dims.inner_height(), 240.0);
        assert_eq!(dims.x_range(), (160.0, 770.0));
        assert_eq!(dims.y_range(), (10.0, 250.0));
        assert_eq!(dims.viewbox(), "0 0 800 300");
    }

    #[test]
    fn test_dimensions_never_negative() {
        let dims = ChartDimensions::new(100.0, 20.0);
        assert_eq!(dims.inner_width(), 0.0);
        assert_eq!(dims.inner_height(), 0.0);
    }

    #[test]
    fn test_fitted_height() {
        let margin = ChartMargin::standard();
        assert_eq!(fitted_height(2, 28.0, &margin, 300.0), 300.0);
        assert_eq!(fitted_height(10, 40.0, &margin, 300.0), 460.0);
    }
}
