//! Employment and education records, timeline layout

use crate::{colors, dates::parse_month_year, distinct_in_order};
use serde::{Deserialize, Serialize};

// ============================================================================
// EMPLOYMENT
// ============================================================================

/// A normalized employment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affiliation {
    pub title: String,
    pub org: String,
    /// `"Mon YYYY"` or `"YYYY"`
    pub start: String,
    pub end: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub location: Option<String>,
}

impl Affiliation {
    pub fn new(title: impl Into<String>, org: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            org: org.into(),
            start: start.into(),
            end: None,
            current: false,
            location: None,
        }
    }

    pub fn ended(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self.current = false;
        self
    }

    pub fn ongoing(mut self) -> Self {
        self.end = None;
        self.current = true;
        self
    }

    /// Human-readable period ("Jan 2020 - Present")
    pub fn period_label(&self) -> String {
        let end = match (&self.end, self.current) {
            (Some(end), false) => end.as_str(),
            _ => "Present",
        };
        format!("{} \u{2013} {}", self.start, end)
    }
}

/// A timeline bar in fractional years
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBar {
    /// Index into the input slice
    pub index: usize,
    pub start_value: f64,
    /// Pinned to `now` for ongoing records
    pub end_value: f64,
    pub ongoing: bool,
}

/// Map records to `(start, end)` pairs.
///
/// `now` is the render-time fractional year used for ongoing records; it is
/// never written back. Records whose dates do not parse, or that end before
/// they start, are dropped.
pub fn layout_timeline(affiliations: &[Affiliation], now: f64) -> Vec<TimelineBar> {
    affiliations
        .iter()
        .enumerate()
        .filter_map(|(index, a)| {
            let start_value = parse_month_year(&a.start)?;
            let end_value = if a.current {
                now
            } else {
                parse_month_year(a.end.as_deref()?)?
            };
            (end_value >= start_value).then_some(TimelineBar {
                index,
                start_value,
                end_value,
                ongoing: a.current,
            })
        })
        .collect()
}

/// Derived data for the experience chart
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePlot {
    pub affiliations: Vec<Affiliation>,
    pub bars: Vec<TimelineBar>,
    /// Role titles in first-appearance order
    pub roles: Vec<String>,
    /// Organizations in first-appearance order
    pub orgs: Vec<String>,
    /// Whole-year domain enclosing every bar
    pub x_domain: (f64, f64),
}

impl TimelinePlot {
    pub fn new(affiliations: &[Affiliation], now: f64) -> Self {
        let bars = layout_timeline(affiliations, now);
        let roles = distinct_in_order(bars.iter().map(|b| affiliations[b.index].title.as_str()));
        let orgs = distinct_in_order(bars.iter().map(|b| affiliations[b.index].org.as_str()));

        let x_domain = if bars.is_empty() {
            crate::EMPTY_YEAR_DOMAIN
        } else {
            let lo = bars.iter().map(|b| b.start_value).fold(f64::INFINITY, f64::min);
            let hi = bars.iter().map(|b| b.end_value).fold(f64::NEG_INFINITY, f64::max);
            let (lo, hi) = (lo.floor(), hi.ceil());
            if hi > lo { (lo, hi) } else { (lo, lo + 1.0) }
        };

        let dropped = affiliations.len() - bars.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} affiliations with unusable dates", dropped);
        }

        Self {
            affiliations: affiliations.to_vec(),
            bars,
            roles,
            orgs,
            x_domain,
        }
    }

    pub fn affiliation(&self, bar: &TimelineBar) -> &Affiliation {
        &self.affiliations[bar.index]
    }

    pub fn color_of(&self, org: &str) -> String {
        let index = self.orgs.iter().position(|o| o == org).unwrap_or(0);
        colors::hue(self.orgs.len(), index)
    }
}

// ============================================================================
// EDUCATION
// ============================================================================

/// A normalized education record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    /// Degree or role title, already defaulted at the boundary
    pub role: String,
    pub org: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl Education {
    /// Year plotted for this record: end year, else start year
    pub fn plotted_year(&self) -> Option<i32> {
        self.end_year
            .or(self.start_year)
            .filter(|&y| y > 0)
    }
}

/// An education record positioned on the chart
#[derive(Debug, Clone, PartialEq)]
pub struct EducationPoint {
    pub index: usize,
    pub year: i32,
}

/// Derived data for the education chart
#[derive(Debug, Clone, PartialEq)]
pub struct EducationPlot {
    pub educations: Vec<Education>,
    pub points: Vec<EducationPoint>,
    /// Degree titles, colored
    pub degrees: Vec<String>,
    /// Institutions, encoded as marker shapes
    pub orgs: Vec<String>,
    /// Year domain padded by two years on each side
    pub x_domain: (f64, f64),
}

impl EducationPlot {
    pub fn new(educations: &[Education]) -> Self {
        let points: Vec<EducationPoint> = educations
            .iter()
            .enumerate()
            .filter_map(|(index, e)| e.plotted_year().map(|year| EducationPoint { index, year }))
            .collect();

        let degrees = distinct_in_order(points.iter().map(|p| educations[p.index].role.as_str()));
        let orgs = distinct_in_order(points.iter().map(|p| educations[p.index].org.as_str()));

        let x_domain = match (
            points.iter().map(|p| p.year).min(),
            points.iter().map(|p| p.year).max(),
        ) {
            (Some(lo), Some(hi)) => (f64::from(lo) - 2.0, f64::from(hi) + 2.0),
            _ => crate::EMPTY_YEAR_DOMAIN,
        };

        Self {
            educations: educations.to_vec(),
            points,
            degrees,
            orgs,
            x_domain,
        }
    }

    pub fn education(&self, point: &EducationPoint) -> &Education {
        &self.educations[point.index]
    }

    pub fn color_of(&self, degree: &str) -> String {
        let index = self.degrees.iter().position(|d| d == degree).unwrap_or(0);
        colors::hue(self.degrees.len(), index)
    }

    /// Position of an institution in the legend; selects its marker shape
    pub fn org_index(&self, org: &str) -> usize {
        self.orgs.iter().position(|o| o == org).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_layout() {
        let records = vec![
            Affiliation::new("Scientist", "Lab", "Jan 2020").ongoing(),
            Affiliation::new("Intern", "Lab", "Jul 2018").ended("Jan 2019"),
        ];
        let bars = layout_timeline(&records, 2024.5);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].start_value, 2020.0);
        assert_eq!(bars[0].end_value, 2024.5);
        assert!(bars[0].ongoing);
        assert_eq!(bars[1].start_value, 2018.5);
        assert_eq!(bars[1].end_value, 2019.0);
    }

    #[test]
    fn test_ongoing_end_is_not_persisted() {
        let records = vec![Affiliation::new("Founder", "Startup", "Feb 2026").ongoing()];
        let earlier = layout_timeline(&records, 2026.25);
        let later = layout_timeline(&records, 2027.0);
        assert_eq!(earlier[0].end_value, 2026.25);
        assert_eq!(later[0].end_value, 2027.0);
        assert_eq!(records[0].end, None);
    }

    #[test]
    fn test_unparseable_and_inverted_records_are_dropped() {
        let records = vec![
            Affiliation::new("A", "X", "someday").ended("2020"),
            Affiliation::new("B", "X", "2020"),
            Affiliation::new("C", "X", "Mar 2021").ended("Jan 2020"),
            Affiliation::new("D", "Y", "2015").ended("2016"),
        ];
        let plot = TimelinePlot::new(&records, 2025.0);

        assert_eq!(plot.bars.len(), 1);
        assert_eq!(plot.affiliation(&plot.bars[0]).title, "D");
        assert_eq!(plot.x_domain, (2015.0, 2016.0));
        assert_eq!(plot.orgs, vec!["Y"]);
    }

    #[test]
    fn test_timeline_domain_rounds_outward() {
        let records = vec![
            Affiliation::new("A", "X", "Jul 2018").ended("Mar 2020"),
            Affiliation::new("A", "Z", "Feb 2016").ended("Jul 2018"),
        ];
        let plot = TimelinePlot::new(&records, 2025.0);
        assert_eq!(plot.x_domain, (2016.0, 2021.0));
        assert_eq!(plot.roles, vec!["A"]);
        assert_eq!(plot.orgs, vec!["X", "Z"]);
    }

    #[test]
    fn test_period_label() {
        let a = Affiliation::new("A", "X", "Jan 2020").ongoing();
        assert_eq!(a.period_label(), "Jan 2020 \u{2013} Present");
    }

    #[test]
    fn test_education_plot() {
        let records = vec![
            Education { role: "PhD".into(), org: "U1".into(), start_year: Some(2019), end_year: Some(2024) },
            Education { role: "BSc".into(), org: "U2".into(), start_year: Some(2012), end_year: None },
            Education { role: "Cert".into(), org: "U2".into(), start_year: None, end_year: None },
        ];
        let plot = EducationPlot::new(&records);

        assert_eq!(plot.points.len(), 2);
        assert_eq!(plot.points[0].year, 2024);
        assert_eq!(plot.points[1].year, 2012);
        assert_eq!(plot.x_domain, (2010.0, 2026.0));
        assert_eq!(plot.degrees, vec!["PhD", "BSc"]);
        assert_eq!(plot.org_index("U2"), 1);
    }
}
