//! # chartkit
//!
//! Core chart primitives: scales, tick generation, axis tick resolution and
//! SVG path building.

use std::fmt::Write;

use folio_core::{ChartError, ChartResult, NumberFormatter};

pub use folio_core::{colors, parse_month_year};

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for continuous scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (affine map, no clamping)
///
/// Values outside the domain extrapolate; charts rely on that for padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;

        // Degenerate domain: every value sits mid-range
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }

        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;

        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }

        d0 + (value - r0) / (r1 - r0) * (d1 - d0)
    }
}

/// Linear scale from `domain` onto `range`
pub fn linear_scale(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
    LinearScale::new()
        .domain(domain.0, domain.1)
        .range(range.0, range.1)
}

// ============================================================================
// CATEGORICAL SCALE
// ============================================================================

/// Maps labels to the centers of equal-width slots
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalScale {
    labels: Vec<String>,
    range: (f64, f64),
}

impl CategoricalScale {
    /// Slots in first-appearance order from `range.0` to `range.1`.
    /// Repeated labels share their first slot.
    pub fn new<I, S>(labels: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref();
            if !unique.iter().any(|l| l == label) {
                unique.push(label.to_string());
            }
        }
        Self {
            labels: unique,
            range,
        }
    }

    /// Vertical axis in SVG space: slot order is reversed and laid out from
    /// `bottom` to `top`, so the first label renders at the top.
    pub fn vertical<I, S>(labels: I, top: f64, bottom: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scale = Self::new(labels, (bottom, top));
        scale.labels.reverse();
        scale
    }

    /// Labels in slot order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width of one slot (signed; negative when the range runs backwards)
    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        (r1 - r0) / self.labels.len().max(1) as f64
    }

    /// Center of the slot holding `label`.
    ///
    /// A label that is not on the axis is a caller error and is reported
    /// rather than mapped to an edge.
    pub fn position(&self, label: &str) -> ChartResult<f64> {
        let index = self
            .labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| ChartError::UnknownCategory {
                label: label.to_string(),
                known: self.labels.len(),
            })?;
        let step = self.step();
        Ok(self.range.0 + step * index as f64 + step / 2.0)
    }
}

/// Categorical scale over `labels`
pub fn categorical_scale<I, S>(labels: I, range: (f64, f64)) -> CategoricalScale
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CategoricalScale::new(labels, range)
}

// ============================================================================
// TICKS
// ============================================================================

/// Tolerance for floating noise in `value / step`
const STEP_EPSILON: f64 = 1e-9;

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Step from {1, 2, 5, 10} x 10^k nearest to `rough`
fn nice_step(rough: f64) -> f64 {
    let magnitude = 10.0_f64.powf(rough.log10().floor());
    let residual = rough / magnitude;

    let nice = if residual <= 1.5 {
        1.0
    } else if residual <= 3.0 {
        2.0
    } else if residual <= 7.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

/// "Nice" tick values: every multiple of a round step inside `[min, max]`.
///
/// The result is strictly increasing and rounded to 6 decimals. `min == max`
/// yields `[min]`; an inverted or non-finite interval, or `count == 0`,
/// yields no ticks.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || count == 0 || max < min {
        return Vec::new();
    }
    if max == min {
        return vec![round6(min)];
    }

    let step = nice_step((max - min) / count as f64);
    let first = (min / step - STEP_EPSILON).ceil() as i64;
    let last = (max / step + STEP_EPSILON).floor() as i64;

    let mut ticks: Vec<f64> = Vec::with_capacity((last - first + 1).max(0) as usize);
    for k in first..=last {
        let tick = round6(k as f64 * step).clamp(min, max);
        if ticks.last().is_none_or(|&prev| tick > prev) {
            ticks.push(tick);
        }
    }
    ticks
}

/// Nice ticks restricted to whole numbers (year and count axes)
pub fn whole_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    nice_ticks(min, max, count)
        .into_iter()
        .filter(|t| t.fract() == 0.0)
        .collect()
}

// ============================================================================
// AXIS TICKS
// ============================================================================

/// A tick resolved to a pixel position and its display label.
///
/// A panel receives one list per axis and draws both the gridline and the
/// label of each tick from the same entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Resolve numeric ticks through a continuous scale
pub fn resolve_ticks<S, F>(scale: &S, values: &[f64], format: &F) -> Vec<AxisTick>
where
    S: Scale + ?Sized,
    F: NumberFormatter + ?Sized,
{
    values
        .iter()
        .map(|&v| AxisTick {
            position: scale.scale(v),
            label: format.format(v),
        })
        .collect()
}

/// One tick per category, labelled with the category itself
pub fn resolve_categories(scale: &CategoricalScale) -> Vec<AxisTick> {
    scale
        .labels()
        .iter()
        .filter_map(|label| {
            scale.position(label).ok().map(|position| AxisTick {
                position,
                label: label.clone(),
            })
        })
        .collect()
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(128),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    /// Closed polygon through `points`
    pub fn polygon(self, points: &[(f64, f64)]) -> Self {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return self;
        };
        rest.iter()
            .fold(self.move_to(x0, y0), |b, &(x, y)| b.line_to(x, y))
            .close()
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{CompactNumberFormatter, IntegerFormatter};

    const TOL: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < TOL
    }

    #[test]
    fn test_linear_scale() {
        let scale = linear_scale((0.0, 10.0), (0.0, 100.0));
        assert!(approx(scale.scale(5.0), 50.0));

        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);
        assert!(approx(scale.scale(0.0), 0.0));
        assert!(approx(scale.scale(50.0), 250.0));
        assert!(approx(scale.scale(100.0), 500.0));
    }

    #[test]
    fn test_linear_scale_affinity() {
        let cases = [
            ((2018.0, 2021.0), (160.0, 770.0), 2019.5),
            ((0.0, 4.0), (350.0, 10.0), 3.0),
            ((-5.0, 5.0), (0.0, 1.0), 12.0),
        ];
        for ((d0, d1), (r0, r1), v) in cases {
            let expected = r0 + (v - d0) / (d1 - d0) * (r1 - r0);
            assert!(approx(linear_scale((d0, d1), (r0, r1)).scale(v), expected));
        }
    }

    #[test]
    fn test_linear_scale_extrapolates() {
        let scale = linear_scale((0.0, 10.0), (0.0, 100.0));
        assert!(approx(scale.scale(-1.0), -10.0));
        assert!(approx(scale.scale(11.0), 110.0));
    }

    #[test]
    fn test_linear_scale_degenerate_domain() {
        let scale = linear_scale((3.0, 3.0), (0.0, 100.0));
        assert!(approx(scale.scale(3.0), 50.0));
        assert!(scale.scale(42.0).is_finite());
    }

    #[test]
    fn test_linear_scale_invert() {
        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);
        assert!(approx(scale.invert(250.0), 50.0));
    }

    #[test]
    fn test_categorical_slot_centering() {
        let scale = categorical_scale(["a", "b", "c"], (0.0, 300.0));
        assert!(approx(scale.position("a").unwrap(), 50.0));
        assert!(approx(scale.position("b").unwrap(), 150.0));
        assert!(approx(scale.position("c").unwrap(), 250.0));
    }

    #[test]
    fn test_categorical_dedup_keeps_first_appearance() {
        let scale = categorical_scale(["b", "a", "b"], (0.0, 200.0));
        assert_eq!(scale.labels(), ["b", "a"]);
        assert!(approx(scale.position("b").unwrap(), 50.0));
    }

    #[test]
    fn test_categorical_unknown_label_is_error() {
        let scale = categorical_scale(["a", "b"], (0.0, 100.0));
        assert_eq!(
            scale.position("z"),
            Err(ChartError::UnknownCategory {
                label: "z".into(),
                known: 2
            })
        );

        let empty = categorical_scale(Vec::<String>::new(), (0.0, 100.0));
        assert!(empty.position("a").is_err());
    }

    #[test]
    fn test_vertical_first_label_on_top() {
        let scale = CategoricalScale::vertical(["newest", "middle", "oldest"], 10.0, 310.0);
        assert!(approx(scale.position("newest").unwrap(), 60.0));
        assert!(approx(scale.position("middle").unwrap(), 160.0));
        assert!(approx(scale.position("oldest").unwrap(), 260.0));
        assert_eq!(scale.labels(), ["oldest", "middle", "newest"]);
    }

    #[test]
    fn test_nice_ticks_monotonic_and_covered() {
        let cases = [
            (0.0, 1.0, 5),
            (2018.0, 2021.0, 8),
            (0.0, 5313.0 * 1.1, 5),
            (-3.7, 12.2, 6),
            (0.1, 0.35, 4),
            (1e-4, 3e-4, 3),
        ];
        for (min, max, count) in cases {
            let ticks = nice_ticks(min, max, count);
            assert!(!ticks.is_empty(), "no ticks for [{min}, {max}]");
            assert!(ticks.iter().all(|&t| t >= min && t <= max));
            assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_nice_ticks_values() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(
            nice_ticks(2018.0, 2021.0, 8),
            vec![2018.0, 2018.5, 2019.0, 2019.5, 2020.0, 2020.5, 2021.0]
        );
    }

    #[test]
    fn test_nice_ticks_degenerate() {
        assert_eq!(nice_ticks(4.0, 4.0, 5), vec![4.0]);
        assert!(nice_ticks(5.0, 4.0, 5).is_empty());
        assert!(nice_ticks(0.0, 1.0, 0).is_empty());
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
        assert!(nice_ticks(0.0, f64::INFINITY, 5).is_empty());
    }

    #[test]
    fn test_whole_ticks() {
        assert_eq!(whole_ticks(2018.0, 2021.0, 8), vec![2018.0, 2019.0, 2020.0, 2021.0]);
        assert_eq!(whole_ticks(0.0, 3.0, 5), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_resolved_ticks_share_positions() {
        let scale = linear_scale((0.0, 10.0), (0.0, 100.0));
        let values = nice_ticks(0.0, 10.0, 5);
        let ticks = resolve_ticks(&scale, &values, &IntegerFormatter);
        assert_eq!(ticks.len(), values.len());
        assert!(approx(ticks[1].position, 20.0));
        assert_eq!(ticks[1].label, "2");

        let compact = resolve_ticks(&scale, &[1500.0], &CompactNumberFormatter);
        assert_eq!(compact[0].label, "1.5k");
    }

    #[test]
    fn test_resolve_categories() {
        let scale = categorical_scale(["x", "y"], (0.0, 100.0));
        let ticks = resolve_categories(&scale);
        assert!(approx(ticks[0].position, 25.0));
        assert!(approx(ticks[1].position, 75.0));
        assert_eq!(ticks[0].label, "x");
        assert_eq!(ticks[1].label, "y");
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .close()
            .build();

        assert!(path.contains("M0.00,0.00"));
        assert!(path.contains("L100.00,100.00"));
        assert!(path.contains("Z"));
    }

    #[test]
    fn test_polygon() {
        let path = PathBuilder::new()
            .polygon(&[(0.0, -1.0), (1.0, 0.0), (0.0, 1.0)])
            .build();
        assert_eq!(path, "M0.00,-1.00L1.00,0.00L0.00,1.00Z");
        assert_eq!(PathBuilder::new().polygon(&[]).build(), "");
    }
}
