//! docsieve — persona-driven section extraction and ranking for PDF
//! collections.
//!
//! Given a collection directory holding an input descriptor (persona,
//! job-to-be-done, document list) and a `pdfs/` folder, the pipeline
//! extracts page text, detects section headers heuristically, scores each
//! section against keywords derived from the persona and task, and writes
//! a ranked JSON artifact of top sections plus refined excerpts.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extract;
pub mod keywords;
pub mod models;
pub mod ranking;
pub mod scoring;
pub mod sections;

pub use analyzer::{BatchSummary, CollectionAnalyzer, CollectionReport};
pub use config::{AnalysisConfig, CollectionLayout};
pub use error::{Error, Result};
pub use extract::{PageText, PdfTextSource, TextSource};
pub use keywords::KeywordSet;
pub use models::{AnalysisResult, CollectionInput};
