//! Top-N selection and refined-excerpt production.

use crate::config::AnalysisConfig;
use crate::models::{ExtractedSection, SubsectionAnalysis};
use crate::scoring::ScoredSection;

/// Ranked output of one collection run: the top sections with dense ranks,
/// plus refined excerpts drawn from the same pool.
#[derive(Debug, Default)]
pub struct RankedOutput {
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

pub struct Ranker<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> Ranker<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Select the top-N sections across all documents. Ordering is total:
    /// descending score, then input-list document order, then page number,
    /// then position ordinal, so repeated runs produce identical output.
    pub fn select(&self, mut pool: Vec<ScoredSection>) -> RankedOutput {
        pool.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.section.doc_index.cmp(&b.section.doc_index))
                .then_with(|| a.section.page_number.cmp(&b.section.page_number))
                .then_with(|| a.section.ordinal.cmp(&b.section.ordinal))
        });
        pool.truncate(self.config.max_sections);

        let extracted_sections = pool
            .iter()
            .enumerate()
            .map(|(i, scored)| ExtractedSection {
                document: scored.section.document.clone(),
                section_title: scored.section.title.clone(),
                importance_rank: (i + 1) as u32,
                page_number: scored.section.page_number,
            })
            .collect();

        // Excerpts come from the same ranked pool, in rank order; sections
        // whose body refines to nothing are skipped.
        let subsection_analysis = pool
            .iter()
            .filter_map(|scored| {
                let refined = refine_text(&scored.section.body, self.config.refined_text_max_chars);
                if refined.is_empty() {
                    return None;
                }
                Some(SubsectionAnalysis {
                    document: scored.section.document.clone(),
                    refined_text: refined,
                    page_number: scored.section.page_number,
                })
            })
            .take(self.config.max_subsections)
            .collect();

        RankedOutput {
            extracted_sections,
            subsection_analysis,
        }
    }
}

/// Whitespace-normalize and bound text to `max_chars`, cutting at a
/// sentence boundary where feasible, else a word boundary, never mid-word.
pub fn refine_text(text: &str, max_chars: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.len() <= max_chars {
        return normalized;
    }

    // Whole sentences first.
    let mut out = String::new();
    for sentence in normalized.split_inclusive(['.', '!', '?']) {
        if out.len() + sentence.len() > max_chars {
            break;
        }
        out.push_str(sentence);
    }
    let out = out.trim().to_string();
    if !out.is_empty() {
        return out;
    }

    // A single overlong sentence: fall back to whole words.
    let mut out = String::new();
    for word in normalized.split(' ') {
        let extra = if out.is_empty() { word.len() } else { word.len() + 1 };
        if out.len() + extra > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
