//! Input descriptor and output artifact types.

use serde::{Deserialize, Serialize};

/// One document listed in a collection's input descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

/// A collection's input descriptor: persona, task, and the documents to
/// analyze. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInput {
    /// Extra descriptor metadata some producers include. Tolerated, unused.
    #[serde(default)]
    pub challenge_info: Option<serde_json::Value>,
    pub documents: Vec<DocumentRef>,
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: u32,
    pub page_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

/// Terminal artifact of a collection run. Written once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metadata: Metadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}
