//! Publication records and dot-plot stacking

use crate::{colors, distinct_in_order};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Domain used when there is nothing to plot
pub const EMPTY_YEAR_DOMAIN: (f64, f64) = (0.0, 1.0);

/// A normalized publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// Publication year, always > 0
    pub year: i32,
    /// Work type with dashes replaced by spaces ("journal article")
    pub kind: String,
    pub title: String,
    pub journal: String,
    pub doi_url: Option<String>,
}

impl Publication {
    pub fn new(year: i32, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            year,
            kind: kind.into(),
            title: title.into(),
            journal: String::new(),
            doi_url: None,
        }
    }

    pub fn with_doi(mut self, url: impl Into<String>) -> Self {
        self.doi_url = Some(url.into());
        self
    }
}

/// A publication positioned in the dot plot
#[derive(Debug, Clone, PartialEq)]
pub struct PublicationDot {
    /// Index into the input slice
    pub index: usize,
    pub year: i32,
    /// 1-based rank among same-year publications, in input order
    pub stack_index: u32,
}

/// Assign every publication its stack index within its year.
///
/// Output follows input order; ties keep input order, nothing is re-sorted.
pub fn stack_by_year(publications: &[Publication]) -> Vec<PublicationDot> {
    let mut heights: HashMap<i32, u32> = HashMap::new();

    publications
        .iter()
        .enumerate()
        .filter(|(_, p)| p.year > 0)
        .map(|(index, p)| {
            let height = heights.entry(p.year).or_insert(0);
            *height += 1;
            PublicationDot {
                index,
                year: p.year,
                stack_index: *height,
            }
        })
        .collect()
}

/// Everything the publication chart needs, derived from the records
#[derive(Debug, Clone, PartialEq)]
pub struct PublicationPlot {
    pub publications: Vec<Publication>,
    pub dots: Vec<PublicationDot>,
    /// Work types in first-appearance order
    pub kinds: Vec<String>,
    /// Year domain padded by one year on each side
    pub x_domain: (f64, f64),
    /// Tallest stack
    pub max_stack: u32,
}

impl PublicationPlot {
    pub fn from_publications(publications: &[Publication]) -> Self {
        let dots = stack_by_year(publications);
        let kinds = distinct_in_order(
            dots.iter()
                .map(|d| publications[d.index].kind.as_str()),
        );

        let x_domain = dots
            .iter()
            .map(|d| d.year)
            .fold(None, |acc: Option<(i32, i32)>, y| match acc {
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
                None => Some((y, y)),
            })
            .map_or(EMPTY_YEAR_DOMAIN, |(lo, hi)| {
                (f64::from(lo) - 1.0, f64::from(hi) + 1.0)
            });

        let max_stack = dots.iter().map(|d| d.stack_index).max().unwrap_or(0);

        let dropped = publications.len() - dots.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} publications without a year", dropped);
        }

        Self {
            publications: publications.to_vec(),
            dots,
            kinds,
            x_domain,
            max_stack,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Publication behind a dot
    pub fn publication(&self, dot: &PublicationDot) -> &Publication {
        &self.publications[dot.index]
    }

    /// Fill color of a work type
    pub fn color_of(&self, kind: &str) -> String {
        let index = self.kinds.iter().position(|k| k == kind).unwrap_or(0);
        colors::hue(self.kinds.len(), index)
    }
}
