//! Multi-factor importance scoring of candidate sections.

use crate::config::AnalysisConfig;
use crate::keywords::KeywordSet;
use crate::sections::CandidateSection;

/// Factor weights. They sum to 1.0, so the composite score stays in [0, 1]
/// without further normalization.
pub const KEYWORD_WEIGHT: f64 = 0.40;
pub const LENGTH_WEIGHT: f64 = 0.25;
pub const POSITION_WEIGHT: f64 = 0.20;
pub const TITLE_WEIGHT: f64 = 0.15;

/// Per-occurrence boost applied to keyword coverage for repeated mentions.
const REPEAT_BOOST: f64 = 0.1;

/// A candidate section with its importance score attached. Never mutated
/// after creation; ranking only reads the score.
#[derive(Debug, Clone)]
pub struct ScoredSection {
    pub section: CandidateSection,
    pub score: f64,
}

/// Scores candidate sections against one run's keyword set.
pub struct ImportanceScorer<'a> {
    keywords: &'a KeywordSet,
    config: &'a AnalysisConfig,
}

impl<'a> ImportanceScorer<'a> {
    pub fn new(keywords: &'a KeywordSet, config: &'a AnalysisConfig) -> Self {
        Self { keywords, config }
    }

    /// Combine the four weighted components. Deterministic, and finite for
    /// any input including empty titles, empty bodies, and an empty
    /// keyword set.
    pub fn score(&self, section: CandidateSection, total_pages: u32) -> ScoredSection {
        let title_lower = section.title.to_lowercase();
        let body_lower = section.body.to_lowercase();
        let combined = format!("{} {}", title_lower, body_lower);

        let score = KEYWORD_WEIGHT * self.keyword_density(&combined)
            + LENGTH_WEIGHT * self.length_suitability(section.body.len())
            + POSITION_WEIGHT * positional(section.page_number, total_pages, self.config.positional_decay)
            + TITLE_WEIGHT * self.title_bonus(&title_lower);

        ScoredSection { section, score }
    }

    /// Fraction of keyword-set members matched in the section text, with a
    /// capped boost for repeated occurrences. Empty set means no keyword
    /// signal, never a division error.
    fn keyword_density(&self, text_lower: &str) -> f64 {
        if self.keywords.is_empty() {
            return 0.0;
        }
        let mut matched = 0usize;
        let mut occurrences = 0usize;
        for keyword in self.keywords.iter() {
            let count = count_occurrences(text_lower, &keyword.surface)
                .max(count_occurrences(text_lower, &keyword.stem));
            if count > 0 {
                matched += 1;
                occurrences += count;
            }
        }
        if matched == 0 {
            return 0.0;
        }
        let coverage = matched as f64 / self.keywords.len() as f64;
        let repeat = 1.0 + REPEAT_BOOST * (occurrences - matched) as f64;
        (coverage * repeat).min(1.0)
    }

    /// Linear ramp up to the configured optimal body length, saturating at
    /// 1.0 beyond it. Empty bodies contribute nothing.
    fn length_suitability(&self, body_len: usize) -> f64 {
        if self.config.optimal_body_chars == 0 {
            return 0.0;
        }
        (body_len as f64 / self.config.optimal_body_chars as f64).min(1.0)
    }

    fn title_bonus(&self, title_lower: &str) -> f64 {
        if self.keywords.any_match(title_lower) {
            1.0
        } else {
            0.0
        }
    }
}

/// Earlier pages score higher: 1 − (page / total) · decay, clamped at 0.
/// Front-loaded content (tables of contents, overviews) tends to matter
/// most for the target personas.
fn positional(page_number: u32, total_pages: u32, decay: f64) -> f64 {
    let total = total_pages.max(1) as f64;
    (1.0 - (page_number as f64 / total) * decay).max(0.0)
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
