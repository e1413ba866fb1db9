//! Keyword extraction from persona and task text.
//!
//! The extracted set drives all relevance scoring: base tokens come from the
//! free text, persona-category expansions are unioned in when the role or
//! task matches a known category, and every keyword carries its English stem
//! so matching tolerates inflection ("hotels" matches "hotel").

use rust_stemmers::{Algorithm, Stemmer};

/// Words carrying no task signal, dropped during tokenization.
const STOP_WORDS: &[&str] = &[
    "all", "and", "any", "are", "both", "but", "can", "each", "else", "few",
    "for", "from", "has", "how", "its", "just", "more", "most", "nor", "not",
    "now", "only", "other", "own", "same", "should", "some", "such", "than",
    "that", "the", "them", "then", "these", "they", "this", "those", "too",
    "very", "was", "when", "where", "why", "will", "with", "you", "your",
];

/// Generic action words unioned in whenever the task text is non-empty, so
/// a bare task like "Do the thing" still yields a usable set.
const GENERAL_TASK_WORDS: &[&str] = &["plan", "prepare", "create", "manage", "organize", "arrange"];

/// Closed set of persona categories with expansion vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaCategory {
    Travel,
    Hr,
    Research,
    Food,
    Investment,
    Student,
}

/// Substring cues that map a free-text role or task onto a category.
/// Classification is separate from the expansion table below so the table
/// stays pure data.
const CATEGORY_CUES: &[(PersonaCategory, &[&str])] = &[
    (
        PersonaCategory::Travel,
        &["travel", "trip", "tour", "vacation", "holiday", "itinerary"],
    ),
    (
        PersonaCategory::Hr,
        &["hr", "human resources", "onboarding", "recruiter", "talent"],
    ),
    (
        PersonaCategory::Research,
        &["research", "scientist", "phd", "academic", "literature review"],
    ),
    (
        PersonaCategory::Food,
        &["food", "chef", "caterer", "catering", "menu", "cook"],
    ),
    (
        PersonaCategory::Investment,
        &["investment", "investor", "financial", "finance", "portfolio"],
    ),
    (
        PersonaCategory::Student,
        &["student", "undergraduate", "exam", "coursework", "study"],
    ),
];

/// Expansion vocabulary per category. Tunable data, not a behavior contract.
const CATEGORY_EXPANSIONS: &[(PersonaCategory, &[&str])] = &[
    (
        PersonaCategory::Travel,
        &[
            "travel", "trip", "visit", "explore", "tour", "vacation", "holiday",
            "city", "restaurant", "hotel", "activity", "attraction", "culture",
            "beach", "coast", "adventure", "nightlife", "entertainment",
        ],
    ),
    (
        PersonaCategory::Hr,
        &[
            "form", "fillable", "onboarding", "compliance", "document",
            "signature", "pdf", "acrobat", "create", "manage", "workflow",
            "employee", "process", "automation",
        ],
    ),
    (
        PersonaCategory::Research,
        &[
            "method", "methodology", "result", "dataset", "benchmark",
            "literature", "experiment", "analysis", "conclusion", "abstract",
            "citation", "finding",
        ],
    ),
    (
        PersonaCategory::Food,
        &[
            "menu", "recipe", "cooking", "food", "meal", "dinner", "buffet",
            "vegetarian", "gluten-free", "corporate", "gathering", "ingredient",
            "preparation", "serving", "nutrition",
        ],
    ),
    (
        PersonaCategory::Investment,
        &[
            "revenue", "profit", "growth", "margin", "earnings", "forecast",
            "risk", "market", "valuation", "dividend", "balance", "equity",
        ],
    ),
    (
        PersonaCategory::Student,
        &[
            "definition", "example", "summary", "exercise", "chapter",
            "concept", "formula", "exam", "review", "glossary",
        ],
    ),
];

/// A normalized keyword: the lowercase surface form plus its stem.
#[derive(Debug, Clone)]
pub struct Keyword {
    pub surface: String,
    pub stem: String,
}

/// Deduplicated keyword set derived from persona + task text. Immutable
/// after construction; shared read-only across all documents in a run.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    words: Vec<Keyword>,
}

impl KeywordSet {
    /// Derive the keyword set for one analysis run.
    pub fn extract(persona_role: &str, task: &str) -> Self {
        let stemmer = Stemmer::create(Algorithm::English);
        let mut surfaces: Vec<String> = Vec::new();

        let combined = format!("{} {}", persona_role, task);
        for token in tokenize(&combined) {
            if token.len() < 3 || STOP_WORDS.contains(&token.as_str()) {
                continue;
            }
            surfaces.push(token);
        }

        for category in classify(persona_role, task) {
            if let Some(expansion) = expansion_for(category) {
                surfaces.extend(expansion.iter().map(|w| w.to_string()));
            }
        }

        if !task.trim().is_empty() {
            surfaces.extend(GENERAL_TASK_WORDS.iter().map(|w| w.to_string()));
        }

        surfaces.sort();
        surfaces.dedup();

        let words = surfaces
            .into_iter()
            .map(|surface| {
                // Stemming only makes sense for single tokens; phrase
                // keywords like "gluten-free" keep their surface as stem.
                let stem = if surface.chars().all(|c| c.is_alphanumeric()) {
                    stemmer.stem(&surface).to_string()
                } else {
                    surface.clone()
                };
                Keyword { surface, stem }
            })
            .collect();

        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn contains(&self, surface: &str) -> bool {
        self.words.iter().any(|k| k.surface == surface)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> + '_ {
        self.words.iter()
    }

    /// True if any keyword (surface or stem) occurs as a substring of the
    /// given lowercase text.
    pub fn any_match(&self, text_lower: &str) -> bool {
        self.words
            .iter()
            .any(|k| text_lower.contains(&k.surface) || text_lower.contains(&k.stem))
    }
}

/// Lowercase tokens split on non-alphanumeric boundaries.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// Map role/task free text onto zero or more persona categories by
/// case-insensitive substring cues. No match is not an error; the caller
/// degrades to the base tokenization.
pub fn classify(persona_role: &str, task: &str) -> Vec<PersonaCategory> {
    let haystack = format!("{} {}", persona_role, task).to_lowercase();
    CATEGORY_CUES
        .iter()
        .filter(|(_, cues)| cues.iter().any(|cue| haystack.contains(cue)))
        .map(|(category, _)| *category)
        .collect()
}

fn expansion_for(category: PersonaCategory) -> Option<&'static [&'static str]> {
    CATEGORY_EXPANSIONS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, words)| *words)
}
