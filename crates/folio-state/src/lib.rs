//! # folio-state
//!
//! Reactive state for the portfolio page.
//! Each record list lives in its own signal so a chart only re-renders when
//! its own data changes.

use folio_core::{
    Affiliation, ChartResult, Education, PortfolioSnapshot, Publication, ReputationSite,
    ReputationWeights,
};
use leptos::prelude::*;

// ============================================================================
// PAGE SECTIONS
// ============================================================================

/// Portfolio page sections, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Experience,
    Education,
    Publications,
    Reputation,
    Skills,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::Publications => "Publications",
            Self::Reputation => "Stack Exchange",
            Self::Skills => "Skills",
        }
    }

    /// Fragment id used for in-page anchors
    pub fn anchor(&self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Publications => "publications",
            Self::Reputation => "stack-exchange",
            Self::Skills => "skills",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Experience,
            Self::Education,
            Self::Publications,
            Self::Reputation,
            Self::Skills,
        ]
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Record lists behind the charts
#[derive(Clone, Copy)]
pub struct PortfolioState {
    pub publications: RwSignal<Vec<Publication>>,
    pub experience: RwSignal<Vec<Affiliation>>,
    pub educations: RwSignal<Vec<Education>>,
    pub sites: RwSignal<Vec<ReputationSite>>,
    pub keywords: RwSignal<Vec<String>>,
    /// Reputation weighting policy
    pub weights: RwSignal<ReputationWeights>,
    /// Current error message
    pub error: RwSignal<Option<String>>,
    /// Loading state
    pub loading: RwSignal<bool>,
}

impl PortfolioState {
    pub fn new() -> Self {
        Self {
            publications: RwSignal::new(Vec::new()),
            experience: RwSignal::new(Vec::new()),
            educations: RwSignal::new(Vec::new()),
            sites: RwSignal::new(Vec::new()),
            keywords: RwSignal::new(Vec::new()),
            weights: RwSignal::new(ReputationWeights::default()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Normalize a snapshot and publish every record list
    pub fn load_snapshot(&self, snapshot: &PortfolioSnapshot) {
        let publications = snapshot.publications();
        let educations = snapshot.educations();
        let sites = snapshot.sites();

        tracing::debug!(
            "Snapshot loaded: {} publications, {} roles, {} degrees, {} sites, {} keywords",
            publications.len(),
            snapshot.experience.len(),
            educations.len(),
            sites.len(),
            snapshot.keywords.len()
        );

        self.publications.set(publications);
        self.experience.set(snapshot.experience.clone());
        self.educations.set(educations);
        self.sites.set(sites);
        self.keywords.set(snapshot.keywords.clone());
        self.error.set(None);
        self.loading.set(false);
    }

    /// Decode and load a JSON snapshot. On failure the previous records stay
    /// and the error is recorded.
    pub fn load_json(&self, text: &str) -> ChartResult<()> {
        self.loading.set(true);
        match PortfolioSnapshot::from_json(text) {
            Ok(snapshot) => {
                self.load_snapshot(&snapshot);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Snapshot rejected: {}", e);
                self.set_error(e.to_string());
                self.loading.set(false);
                Err(e)
            }
        }
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    pub fn set_error(&self, msg: impl Into<String>) {
        self.error.set(Some(msg.into()));
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether a section has anything to show
    pub fn has_content(&self, section: Section) -> bool {
        match section {
            Section::Experience => self.experience.with(|v| !v.is_empty()),
            Section::Education => self.educations.with(|v| !v.is_empty()),
            Section::Publications => self.publications.with(|v| !v.is_empty()),
            Section::Reputation => self.sites.with(|v| !v.is_empty()),
            Section::Skills => self.keywords.with(|v| !v.is_empty()),
        }
    }
}

impl Default for PortfolioState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide portfolio state to the component tree
pub fn provide_portfolio_state() -> PortfolioState {
    let state = PortfolioState::new();
    provide_context(state);
    state
}

/// Use portfolio state from context
pub fn use_portfolio_state() -> PortfolioState {
    expect_context::<PortfolioState>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::reactive::owner::Owner;

    const SNAPSHOT: &str = r#"{
        "works": [
            {"type": "journal-article", "title": {"title": {"value": "A"}},
             "publication-date": {"year": {"value": "2020"}}},
            {"type": "book", "title": {"title": {"value": "B"}}}
        ],
        "experience": [
            {"title": "Engineer", "org": "Lab", "start": "Jan 2021", "end": null, "current": true}
        ],
        "keywords": ["rust", "statistics"]
    }"#;

    #[test]
    fn test_sections_in_page_order() {
        let labels: Vec<&str> = Section::all().iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            ["Experience", "Education", "Publications", "Stack Exchange", "Skills"]
        );
        assert_eq!(Section::Reputation.anchor(), "stack-exchange");
    }

    #[test]
    fn test_load_json() {
        let owner = Owner::new();
        owner.with(|| {
            let state = PortfolioState::new();
            assert!(state.load_json(SNAPSHOT).is_ok());

            assert_eq!(state.publications.with_untracked(Vec::len), 1);
            assert_eq!(state.experience.with_untracked(Vec::len), 1);
            assert_eq!(state.keywords.get_untracked(), vec!["rust", "statistics"]);
            assert!(!state.loading.get_untracked());
            assert!(state.error.get_untracked().is_none());
        });
    }

    #[test]
    fn test_bad_json_keeps_records() {
        let owner = Owner::new();
        owner.with(|| {
            let state = PortfolioState::new();
            state.load_json(SNAPSHOT).ok();
            assert!(state.load_json("{not json").is_err());

            assert_eq!(state.publications.with_untracked(Vec::len), 1);
            assert!(state.error.get_untracked().is_some());
            assert!(!state.loading.get_untracked());
        });
    }
}
