//! Q&A reputation records and segmentation
//!
//! Each site's reputation is split into one segment per question or answer
//! (weighted by its votes) plus an "other" residual for whatever the listed
//! posts do not explain.

use serde::{Deserialize, Serialize};

// ============================================================================
// POLICY
// ============================================================================

/// Reputation weighting policy.
///
/// Vote counts are preferred when known:
/// `up * upvote - down * downvote (+ accepted_bonus for accepted answers)`.
/// Without vote counts the post score is used: `score * score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReputationWeights {
    pub upvote: i64,
    pub downvote: i64,
    pub accepted_bonus: i64,
    pub score: i64,
}

impl Default for ReputationWeights {
    fn default() -> Self {
        Self {
            upvote: 10,
            downvote: 2,
            accepted_bonus: 15,
            score: 10,
        }
    }
}

impl ReputationWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upvote(mut self, weight: i64) -> Self {
        self.upvote = weight;
        self
    }

    pub fn downvote(mut self, weight: i64) -> Self {
        self.downvote = weight;
        self
    }

    pub fn accepted_bonus(mut self, bonus: i64) -> Self {
        self.accepted_bonus = bonus;
        self
    }

    pub fn score(mut self, weight: i64) -> Self {
        self.score = weight;
        self
    }

    /// Weight of one post
    pub fn weigh(&self, post: &Post, is_answer: bool) -> i64 {
        match post.up_votes {
            Some(up) => {
                let bonus = if is_answer && post.accepted {
                    self.accepted_bonus
                } else {
                    0
                };
                up.saturating_mul(self.upvote)
                    .saturating_sub(post.down_votes.unwrap_or(0).saturating_mul(self.downvote))
                    .saturating_add(bonus)
            }
            None => post.score.saturating_mul(self.score),
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// A question or answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Question title; for answers, the title of the answered question
    pub title: Option<String>,
    pub link: Option<String>,
    pub score: i64,
    pub up_votes: Option<i64>,
    pub down_votes: Option<i64>,
    #[serde(default)]
    pub accepted: bool,
}

impl Post {
    pub fn scored(title: impl Into<String>, score: i64) -> Self {
        Self {
            title: Some(title.into()),
            link: None,
            score,
            up_votes: None,
            down_votes: None,
            accepted: false,
        }
    }

    pub fn with_votes(mut self, up: i64, down: i64) -> Self {
        self.up_votes = Some(up);
        self.down_votes = Some(down);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn accepted(mut self) -> Self {
        self.accepted = true;
        self
    }
}

/// A normalized reputation site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationSite {
    pub site_url: String,
    pub reputation: u64,
    pub questions: Vec<Post>,
    pub answers: Vec<Post>,
}

impl ReputationSite {
    /// Short display name: `https://stackoverflow.com` becomes
    /// `stackoverflow`, `https://biology.stackexchange.com` becomes
    /// `biology SE`.
    pub fn display_name(&self) -> String {
        let without_scheme = self
            .site_url
            .split_once("://")
            .map_or(self.site_url.as_str(), |(_, rest)| rest);
        let host = without_scheme.split('/').next().unwrap_or(without_scheme);
        host.replacen(".com", "", 1).replacen(".stackexchange", " SE", 1)
    }
}

// ============================================================================
// SEGMENTS
// ============================================================================

/// One post's share of a site's reputation
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub label: String,
    /// Weight units, always > 0
    pub value: u64,
    pub link: Option<String>,
    pub is_answer: bool,
    pub accepted: bool,
}

/// A site split into segments and residual
#[derive(Debug, Clone, PartialEq)]
pub struct SiteBreakdown {
    pub site_name: String,
    pub total_reputation: u64,
    pub segments: Vec<Segment>,
    /// `max(0, total_reputation - sum(segments))`
    pub other_residual: u64,
}

impl SiteBreakdown {
    /// Sum of all segment values
    pub fn accounted(&self) -> u64 {
        self.segments
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.value))
    }

    /// Running start offset of each segment along the bar
    pub fn offsets(&self) -> Vec<u64> {
        self.segments
            .iter()
            .scan(0u64, |cursor, seg| {
                let start = *cursor;
                *cursor = cursor.saturating_add(seg.value);
                Some(start)
            })
            .collect()
    }
}

/// Split one site into weighted segments.
///
/// Questions come first, then answers, each in input order. Posts with a
/// non-positive weight are dropped.
pub fn segment_site(site: &ReputationSite, weights: &ReputationWeights) -> SiteBreakdown {
    let questions = site.questions.iter().map(|q| (q, false));
    let answers = site.answers.iter().map(|a| (a, true));

    let segments: Vec<Segment> = questions
        .chain(answers)
        .filter_map(|(post, is_answer)| {
            let weight = weights.weigh(post, is_answer);
            if weight <= 0 {
                return None;
            }
            let label = post
                .title
                .as_deref()
                .map(decode_entities)
                .unwrap_or_else(|| if is_answer { "Answer" } else { "Question" }.to_string());
            Some(Segment {
                label,
                value: weight as u64,
                link: post.link.clone(),
                is_answer,
                accepted: is_answer && post.accepted,
            })
        })
        .collect();

    let accounted = segments
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.value));

    SiteBreakdown {
        site_name: site.display_name(),
        total_reputation: site.reputation,
        other_residual: site.reputation.saturating_sub(accounted),
        segments,
    }
}

/// Segment every site, ordered by ascending total reputation (stable)
pub fn segment_sites(sites: &[ReputationSite], weights: &ReputationWeights) -> Vec<SiteBreakdown> {
    let mut breakdowns: Vec<SiteBreakdown> =
        sites.iter().map(|s| segment_site(s, weights)).collect();
    breakdowns.sort_by_key(|b| b.total_reputation);
    breakdowns
}

/// Decode the handful of HTML entities the Q&A API leaves in titles
pub fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, &str); 6] = [
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&apos;", "'"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&amp;", "&"),
    ];
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(reputation: u64, questions: Vec<Post>, answers: Vec<Post>) -> ReputationSite {
        ReputationSite {
            site_url: "https://stackoverflow.com".into(),
            reputation,
            questions,
            answers,
        }
    }

    #[test]
    fn test_residual_floors_at_zero() {
        // 15 * 10 = 150 > 100
        let s = site(100, vec![Post::scored("q", 15)], vec![]);
        let b = segment_site(&s, &ReputationWeights::default());
        assert_eq!(b.accounted(), 150);
        assert_eq!(b.other_residual, 0);
    }

    #[test]
    fn test_residual_absorbs_gap() {
        let s = site(500, vec![Post::scored("q", 20)], vec![]);
        let b = segment_site(&s, &ReputationWeights::default());
        assert_eq!(b.accounted(), 200);
        assert_eq!(b.other_residual, 300);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let weights = ReputationWeights::default();
        let huge = i64::MAX / 5;
        assert_eq!(weights.weigh(&Post::scored("q", huge), false), i64::MAX);
        // 0 up, saturated down weight
        assert_eq!(
            weights.weigh(&Post::scored("q", 0).with_votes(0, i64::MAX), false),
            -i64::MAX
        );

        let posts = vec![
            Post::scored("a", huge),
            Post::scored("b", huge),
            Post::scored("c", huge),
        ];
        let b = segment_site(&site(100, posts, vec![]), &weights);
        let each = i64::MAX as u64;
        assert_eq!(b.segments.len(), 3);
        assert_eq!(b.accounted(), u64::MAX);
        assert_eq!(b.offsets(), vec![0, each, each * 2]);
        assert_eq!(b.other_residual, 0);
    }

    #[test]
    fn test_vote_formula_preferred() {
        let weights = ReputationWeights::default();
        let q = Post::scored("q", 99).with_votes(5, 3);
        assert_eq!(weights.weigh(&q, false), 44);

        let a = Post::scored("a", 99).with_votes(5, 3).accepted();
        assert_eq!(weights.weigh(&a, true), 59);
        // acceptance bonus only applies to answers
        assert_eq!(weights.weigh(&a, false), 44);
    }

    #[test]
    fn test_weights_are_injectable() {
        let weights = ReputationWeights::new().upvote(5).downvote(0).accepted_bonus(0).score(1);
        let s = site(1000, vec![Post::scored("q", 7)], vec![Post::scored("a", 1).with_votes(4, 1).accepted()]);
        let b = segment_site(&s, &weights);
        let values: Vec<u64> = b.segments.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![7, 20]);
    }

    #[test]
    fn test_non_positive_weights_dropped() {
        let s = site(
            300,
            vec![Post::scored("zero", 0), Post::scored("down", 1).with_votes(0, 4)],
            vec![Post::scored("ok", 2)],
        );
        let b = segment_site(&s, &ReputationWeights::default());
        assert_eq!(b.segments.len(), 1);
        assert!(b.segments[0].is_answer);
        assert_eq!(b.other_residual, 280);
    }

    #[test]
    fn test_labels_and_offsets() {
        let s = site(
            1000,
            vec![Post::scored("Why &quot;x&quot;?", 3)],
            vec![Post { title: None, ..Post::scored("", 2) }],
        );
        let b = segment_site(&s, &ReputationWeights::default());
        assert_eq!(b.segments[0].label, "Why \"x\"?");
        assert_eq!(b.segments[1].label, "Answer");
        assert_eq!(b.offsets(), vec![0, 30]);
    }

    #[test]
    fn test_sites_sorted_by_reputation() {
        let mut big = site(900, vec![], vec![]);
        big.site_url = "https://biology.stackexchange.com".into();
        let small = site(600, vec![], vec![]);
        let sorted = segment_sites(&[big, small], &ReputationWeights::default());
        assert_eq!(sorted[0].site_name, "stackoverflow");
        assert_eq!(sorted[1].site_name, "biology SE");
        assert_eq!(sorted[1].other_residual, 900);
    }
}
