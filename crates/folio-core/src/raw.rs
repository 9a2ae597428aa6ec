//! Normalization boundary for upstream JSON
//!
//! The registry and the Q&A service return deeply nested objects where any
//! field may be missing. The `Raw*` types mirror those shapes with every field
//! optional; the conversions below resolve all of that optionality once and
//! produce the strict records the shapers consume.

use crate::{
    dates::leading_int, Affiliation, ChartResult, Education, Post, Publication, ReputationSite,
};
use serde::{Deserialize, Serialize};

const DOI_RESOLVER: &str = "https://doi.org/";

/// `{ "value": ... }` wrapper used throughout the registry payloads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Valued<T> {
    pub value: Option<T>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDate {
    pub year: Option<Valued<String>>,
}

impl RawDate {
    fn year(&self) -> Option<i32> {
        let text = self.year.as_ref()?.value.as_deref()?;
        leading_int(text).and_then(|y| i32::try_from(y).ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTitle {
    pub title: Option<Valued<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawExternalId {
    pub external_id_type: Option<String>,
    pub external_id_value: Option<String>,
    pub external_id_url: Option<Valued<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawExternalIds {
    #[serde(rename = "external-id", default)]
    pub external_id: Vec<RawExternalId>,
}

impl RawExternalIds {
    /// DOI link if present, else the first external URL
    pub fn doi_url(&self) -> Option<String> {
        let doi = self
            .external_id
            .iter()
            .find(|e| e.external_id_type.as_deref() == Some("doi"))
            .and_then(|e| e.external_id_value.as_deref());

        if let Some(value) = doi {
            return Some(if value.starts_with("http") {
                value.to_string()
            } else {
                format!("{}{}", DOI_RESOLVER, value)
            });
        }

        self.external_id
            .iter()
            .find_map(|e| e.external_id_url.as_ref()?.value.clone())
    }
}

// ============================================================================
// WORKS
// ============================================================================

/// A registry work summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawWork {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<RawTitle>,
    pub journal_title: Option<Valued<String>>,
    pub publication_date: Option<RawDate>,
    pub external_ids: Option<RawExternalIds>,
}

impl RawWork {
    /// Strict record, or `None` when the year is missing or not positive
    pub fn normalize(&self) -> Option<Publication> {
        let year = self.publication_date.as_ref()?.year().filter(|&y| y > 0)?;

        let kind = self
            .kind
            .as_deref()
            .map(|k| k.replace('-', " "))
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| "other".to_string());

        let title = self
            .title
            .as_ref()
            .and_then(|t| t.title.as_ref())
            .and_then(|t| t.value.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled")
            .to_string();

        let journal = self
            .journal_title
            .as_ref()
            .and_then(|j| j.value.clone())
            .unwrap_or_default();

        Some(Publication {
            year,
            kind,
            title,
            journal,
            doi_url: self.external_ids.as_ref().and_then(RawExternalIds::doi_url),
        })
    }
}

// ============================================================================
// EDUCATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOrganization {
    pub name: Option<String>,
}

/// A registry education summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawEducation {
    pub role_title: Option<String>,
    pub department_name: Option<String>,
    pub organization: Option<RawOrganization>,
    pub start_date: Option<RawDate>,
    pub end_date: Option<RawDate>,
}

impl RawEducation {
    pub fn normalize(&self) -> Education {
        let role = [&self.role_title, &self.department_name]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("Student")
            .to_string();

        Education {
            role,
            org: self
                .organization
                .as_ref()
                .and_then(|o| o.name.clone())
                .unwrap_or_default(),
            start_year: self.start_date.as_ref().and_then(RawDate::year),
            end_year: self.end_date.as_ref().and_then(RawDate::year),
        }
    }
}

// ============================================================================
// Q&A SITES
// ============================================================================

/// A question or answer as the Q&A service returns it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPost {
    pub title: Option<String>,
    pub question_title: Option<String>,
    pub link: Option<String>,
    pub score: Option<i64>,
    pub up_vote_count: Option<i64>,
    pub down_vote_count: Option<i64>,
    pub is_accepted: Option<bool>,
}

impl RawPost {
    pub fn normalize(&self) -> Post {
        Post {
            title: self.title.clone().or_else(|| self.question_title.clone()),
            link: self.link.clone(),
            score: self.score.unwrap_or(0),
            up_votes: self.up_vote_count,
            down_votes: self.down_vote_count,
            accepted: self.is_accepted.unwrap_or(false),
        }
    }
}

/// A site with the user's top posts attached
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSite {
    pub site_url: Option<String>,
    pub reputation: Option<i64>,
    #[serde(default)]
    pub questions: Vec<RawPost>,
    #[serde(default)]
    pub answers: Vec<RawPost>,
}

impl RawSite {
    /// Strict record, or `None` without a site URL
    pub fn normalize(&self) -> Option<ReputationSite> {
        let site_url = self.site_url.clone().filter(|u| !u.is_empty())?;
        Some(ReputationSite {
            site_url,
            reputation: self.reputation.unwrap_or(0).max(0) as u64,
            questions: self.questions.iter().map(RawPost::normalize).collect(),
            answers: self.answers.iter().map(RawPost::normalize).collect(),
        })
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Everything the page renders, as delivered by the fetching layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub works: Vec<RawWork>,
    #[serde(default)]
    pub educations: Vec<RawEducation>,
    #[serde(default)]
    pub experience: Vec<Affiliation>,
    #[serde(default)]
    pub sites: Vec<RawSite>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PortfolioSnapshot {
    pub fn from_json(text: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn publications(&self) -> Vec<Publication> {
        self.works.iter().filter_map(RawWork::normalize).collect()
    }

    pub fn educations(&self) -> Vec<Education> {
        self.educations.iter().map(RawEducation::normalize).collect()
    }

    pub fn sites(&self) -> Vec<ReputationSite> {
        self.sites.iter().filter_map(RawSite::normalize).collect()
    }
}
