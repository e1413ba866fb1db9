//! Heuristic section/header detection over extracted page text.

use regex::Regex;

use crate::config::AnalysisConfig;
use crate::extract::PageText;

/// A detected section: a header plus the body text that follows it, up to
/// the next header or the end of the page.
#[derive(Debug, Clone)]
pub struct CandidateSection {
    pub document: String,
    /// Index of the owning document in the input descriptor's list.
    pub doc_index: usize,
    pub page_number: u32,
    pub title: String,
    pub body: String,
    /// Monotonic position across the whole document, page-then-line order.
    pub ordinal: usize,
}

/// One header-recognition rule: a predicate regex plus a title extractor.
struct HeaderPattern {
    name: &'static str,
    regex: Regex,
    extract: fn(&str) -> String,
}

fn title_verbatim(line: &str) -> String {
    line.to_string()
}

fn title_without_colon(line: &str) -> String {
    line.trim_end_matches(':').trim_end().to_string()
}

/// Line classifier applying the header patterns in priority order; the
/// first match wins, anything else is body content.
pub struct SectionDetector {
    patterns: Vec<HeaderPattern>,
    max_title_chars: usize,
}

impl SectionDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        // Priority order matters: ALL CAPS beats Title Case beats numbered
        // beats trailing-colon. Patterns are anchored to the whole line.
        let patterns = vec![
            HeaderPattern {
                name: "all-caps",
                regex: Regex::new(r"^[A-Z][A-Z &]{2,}$").unwrap(),
                extract: title_verbatim,
            },
            HeaderPattern {
                name: "title-case",
                regex: Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+$").unwrap(),
                extract: title_verbatim,
            },
            HeaderPattern {
                name: "numbered",
                regex: Regex::new(r"^\d+\.\s+[A-Z][^.]*$").unwrap(),
                extract: title_verbatim,
            },
            HeaderPattern {
                name: "trailing-colon",
                regex: Regex::new(r"^[A-Z][^.:]*:$").unwrap(),
                extract: title_without_colon,
            },
        ];
        Self {
            patterns,
            max_title_chars: config.max_title_chars,
        }
    }

    /// Classify a trimmed line; returns the extracted title if it is a
    /// header. Overlong lines are never headers.
    fn match_header(&self, line: &str) -> Option<(&'static str, String)> {
        if line.len() > self.max_title_chars {
            return None;
        }
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(line))
            .map(|p| (p.name, (p.extract)(line)))
    }

    /// Detect candidate sections across all pages of one document.
    /// Pages with empty text yield no sections; a page with text but no
    /// recognized header yields a single fallback section, so no page with
    /// content is silently dropped.
    pub fn detect(&self, document: &str, doc_index: usize, pages: &[PageText]) -> Vec<CandidateSection> {
        let mut sections = Vec::new();
        let mut ordinal = 0usize;

        for page in pages {
            if page.text.trim().is_empty() {
                continue;
            }

            let mut current: Option<(String, Vec<&str>)> = None;
            let mut found_header = false;

            for raw in page.text.lines() {
                let line = raw.trim();
                if line.is_empty() {
                    continue;
                }
                if let Some((pattern, title)) = self.match_header(line) {
                    tracing::debug!(document, page = page.page_number, pattern, %title, "header");
                    if let Some((prev_title, body)) = current.take() {
                        sections.push(Self::finish(
                            document, doc_index, page.page_number, prev_title, &body, &mut ordinal,
                        ));
                    }
                    current = Some((title, Vec::new()));
                    found_header = true;
                } else if let Some((_, body)) = current.as_mut() {
                    body.push(line);
                }
                // Text before the first header on a page that has headers
                // belongs to no section.
            }

            if let Some((title, body)) = current.take() {
                sections.push(Self::finish(
                    document, doc_index, page.page_number, title, &body, &mut ordinal,
                ));
            }

            if !found_header {
                let title = fallback_title(&page.text, page.page_number, self.max_title_chars);
                let body = page
                    .text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect::<Vec<_>>();
                sections.push(Self::finish(
                    document, doc_index, page.page_number, title, &body, &mut ordinal,
                ));
            }
        }

        sections
    }

    fn finish(
        document: &str,
        doc_index: usize,
        page_number: u32,
        title: String,
        body: &[&str],
        ordinal: &mut usize,
    ) -> CandidateSection {
        let section = CandidateSection {
            document: document.to_string(),
            doc_index,
            page_number,
            title,
            body: body.join("\n"),
            ordinal: *ordinal,
        };
        *ordinal += 1;
        section
    }
}

/// Synthesize a title for a page with no recognized header: the first
/// non-empty line, cut at a word boundary, or "Page N Content" when the
/// page has no usable line.
fn fallback_title(text: &str, page_number: u32, max_chars: usize) -> String {
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty());
    match first_line {
        Some(line) if line.len() <= max_chars => line.to_string(),
        Some(line) => {
            let mut title = String::new();
            for word in line.split_whitespace() {
                let extra = if title.is_empty() { word.len() } else { word.len() + 1 };
                if title.len() + extra > max_chars {
                    break;
                }
                if !title.is_empty() {
                    title.push(' ');
                }
                title.push_str(word);
            }
            if title.is_empty() {
                format!("Page {} Content", page_number)
            } else {
                title
            }
        }
        None => format!("Page {} Content", page_number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> SectionDetector {
        SectionDetector::new(&AnalysisConfig::default())
    }

    fn page(n: u32, text: &str) -> PageText {
        PageText {
            page_number: n,
            text: text.to_string(),
        }
    }

    #[test]
    fn detects_caps_headers_with_bodies() {
        let pages = [page(
            1,
            "OVERVIEW\nThis is a test section about travel and hotels.\nDETAILS\nMore content here.",
        )];
        let sections = detector().detect("guide.pdf", 0, &pages);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "OVERVIEW");
        assert_eq!(sections[0].body, "This is a test section about travel and hotels.");
        assert_eq!(sections[1].title, "DETAILS");
        assert_eq!(sections[1].body, "More content here.");
    }

    #[test]
    fn pattern_priority_is_fixed() {
        let d = detector();
        assert_eq!(d.match_header("SAFETY FIRST").unwrap().0, "all-caps");
        assert_eq!(d.match_header("Getting Started").unwrap().0, "title-case");
        assert_eq!(d.match_header("3. Packing List").unwrap().0, "numbered");
        assert_eq!(d.match_header("Things to remember:").unwrap().0, "trailing-colon");
        assert!(d.match_header("plain body text").is_none());
    }

    #[test]
    fn trailing_colon_header_drops_the_colon() {
        let pages = [page(1, "Checklist before departure:\npassport\ntickets")];
        let sections = detector().detect("guide.pdf", 0, &pages);
        assert_eq!(sections[0].title, "Checklist before departure");
    }

    #[test]
    fn single_word_title_case_is_body() {
        // Title Case requires two or more words; a lone capitalized word is
        // far more likely to be a sentence fragment.
        assert!(detector().match_header("Introduction").is_none());
    }

    #[test]
    fn overlong_lines_are_never_headers() {
        let line = format!("Heading {}", "Word ".repeat(40));
        assert!(detector().match_header(line.trim()).is_none());
    }

    #[test]
    fn page_without_header_becomes_fallback_section() {
        let pages = [page(3, "just some body text\nspread over lines")];
        let sections = detector().detect("guide.pdf", 0, &pages);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "just some body text");
        assert_eq!(sections[0].page_number, 3);
    }

    #[test]
    fn blank_page_title_synthesized_from_page_number() {
        assert_eq!(fallback_title("   \n  ", 7, 100), "Page 7 Content");
    }

    #[test]
    fn fallback_title_truncates_at_word_boundary() {
        let line = "alpha beta gamma delta epsilon";
        let title = fallback_title(line, 1, 16);
        assert_eq!(title, "alpha beta gamma");
    }

    #[test]
    fn empty_pages_yield_no_sections() {
        let pages = [page(1, ""), page(2, "   ")];
        assert!(detector().detect("guide.pdf", 0, &pages).is_empty());
    }

    #[test]
    fn ordinals_increase_across_pages() {
        let pages = [
            page(1, "OVERVIEW\nfirst body"),
            page(2, "DETAILS\nsecond body\nNOTES\nthird body"),
        ];
        let sections = detector().detect("guide.pdf", 0, &pages);
        let ordinals: Vec<_> = sections.iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(sections[2].page_number, 2);
    }

    #[test]
    fn header_with_no_body_is_still_a_section() {
        let pages = [page(1, "intro line ignored\nSUMMARY")];
        let sections = detector().detect("guide.pdf", 0, &pages);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "SUMMARY");
        assert_eq!(sections[0].body, "");
    }
}
