//! Collection orchestration: descriptor in, ranked analysis out.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::config::{AnalysisConfig, CollectionLayout};
use crate::error::{Error, Result};
use crate::extract::TextSource;
use crate::keywords::KeywordSet;
use crate::models::{AnalysisResult, CollectionInput, Metadata};
use crate::ranking::Ranker;
use crate::scoring::ImportanceScorer;
use crate::sections::SectionDetector;

/// A document that could not be processed. Recorded alongside the result,
/// never mixed into it.
#[derive(Debug, Clone)]
pub struct DocumentFailure {
    pub document: String,
    pub error: String,
}

/// Outcome of one collection run: the output artifact plus any per-document
/// failures that were skipped over.
#[derive(Debug)]
pub struct CollectionReport {
    pub result: AnalysisResult,
    pub failures: Vec<DocumentFailure>,
}

/// Outcome of a batch run over all collections under a base path.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Facts about a collection directory, for listing and validation.
#[derive(Debug)]
pub struct CollectionInfo {
    pub path: PathBuf,
    pub has_descriptor: bool,
    pub has_pdfs_dir: bool,
    pub pdf_count: usize,
    pub persona: Option<String>,
}

impl CollectionInfo {
    pub fn is_complete(&self) -> bool {
        self.has_descriptor && self.has_pdfs_dir && self.pdf_count > 0
    }
}

/// Runs the full pipeline for collections. Generic over the text source so
/// tests can feed synthetic pages.
pub struct CollectionAnalyzer<S: TextSource> {
    config: AnalysisConfig,
    detector: SectionDetector,
    source: S,
}

impl<S: TextSource> CollectionAnalyzer<S> {
    pub fn new(config: AnalysisConfig, source: S) -> Self {
        let detector = SectionDetector::new(&config);
        Self {
            config,
            detector,
            source,
        }
    }

    /// Load and validate a collection's input descriptor.
    pub fn load_input(&self, collection: &Path) -> Result<CollectionInput> {
        if !collection.is_dir() {
            return Err(Error::CollectionNotFound(collection.to_path_buf()));
        }
        let input_path = CollectionLayout::input_path(collection);
        let raw = std::fs::read_to_string(&input_path).map_err(|e| Error::InputDescriptorInvalid {
            path: input_path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| Error::InputDescriptorInvalid {
            path: input_path,
            reason: e.to_string(),
        })
    }

    /// Run the pipeline for one collection without writing anything.
    ///
    /// A document that cannot be read is recorded as a failure and the run
    /// continues; zero successfully processed documents still produces a
    /// well-formed result with empty section lists.
    pub fn process_collection(&self, collection: &Path) -> Result<CollectionReport> {
        let input = self.load_input(collection)?;

        let keywords = KeywordSet::extract(&input.persona.role, &input.job_to_be_done.task);
        info!(
            collection = %collection.display(),
            documents = input.documents.len(),
            keywords = keywords.len(),
            "processing collection"
        );

        let scorer = ImportanceScorer::new(&keywords, &self.config);
        let mut pool = Vec::new();
        let mut failures = Vec::new();

        for (doc_index, doc) in input.documents.iter().enumerate() {
            let pdf_path = CollectionLayout::pdf_path(collection, &doc.filename);
            let pages = match self.source.extract(&pdf_path) {
                Ok(pages) => pages,
                Err(e) => {
                    warn!(document = %doc.filename, error = %e, "skipping document");
                    failures.push(DocumentFailure {
                        document: doc.filename.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let total_pages = pages.iter().map(|p| p.page_number).max().unwrap_or(1);
            let sections = self.detector.detect(&doc.filename, doc_index, &pages);
            info!(document = %doc.filename, pages = pages.len(), sections = sections.len(), "detected sections");
            pool.extend(
                sections
                    .into_iter()
                    .map(|section| scorer.score(section, total_pages)),
            );
        }

        let ranked = Ranker::new(&self.config).select(pool);
        let result = AnalysisResult {
            metadata: Metadata {
                input_documents: input.documents.iter().map(|d| d.filename.clone()).collect(),
                persona: input.persona.role.clone(),
                job_to_be_done: input.job_to_be_done.task.clone(),
                processing_timestamp: Utc::now().to_rfc3339(),
            },
            extracted_sections: ranked.extracted_sections,
            subsection_analysis: ranked.subsection_analysis,
        };

        info!(
            collection = %collection.display(),
            sections = result.extracted_sections.len(),
            subsections = result.subsection_analysis.len(),
            failed_documents = failures.len(),
            "collection processed"
        );
        Ok(CollectionReport { result, failures })
    }

    /// Process a collection and write the output artifact into the
    /// collection directory. Returns the output path.
    pub fn analyze_collection(&self, collection: &Path) -> Result<PathBuf> {
        let report = self.process_collection(collection)?;
        let output_path = CollectionLayout::output_path(collection);
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&output_path, serde_json::to_string_pretty(&report.result)?)?;
        info!(output = %output_path.display(), "output written");
        Ok(output_path)
    }

    /// Process every collection under a base path, isolating failures: one
    /// bad collection never halts the batch.
    pub fn analyze_all(&self, base: &Path) -> Result<BatchSummary> {
        if !base.is_dir() {
            return Err(Error::CollectionNotFound(base.to_path_buf()));
        }
        let collections = CollectionLayout::discover(base)?;
        info!(base = %base.display(), count = collections.len(), "batch run");

        let mut summary = BatchSummary {
            total: collections.len(),
            ..Default::default()
        };
        for collection in collections {
            match self.analyze_collection(&collection) {
                Ok(_) => summary.succeeded.push(collection),
                Err(e) => {
                    warn!(collection = %collection.display(), error = %e, "collection failed");
                    summary.failed.push((collection, e.to_string()));
                }
            }
        }
        info!(
            total = summary.total,
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "batch complete"
        );
        Ok(summary)
    }
}

/// Inspect a collection directory without processing it.
pub fn survey_collection(collection: &Path) -> Result<CollectionInfo> {
    if !collection.is_dir() {
        return Err(Error::CollectionNotFound(collection.to_path_buf()));
    }
    let descriptor = CollectionLayout::input_path(collection);
    let pdfs_dir = collection.join(CollectionLayout::PDFS_DIR);

    let pdf_count = if pdfs_dir.is_dir() {
        std::fs::read_dir(&pdfs_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
            })
            .count()
    } else {
        0
    };

    let persona = std::fs::read_to_string(&descriptor)
        .ok()
        .and_then(|raw| serde_json::from_str::<CollectionInput>(&raw).ok())
        .map(|input| input.persona.role);

    Ok(CollectionInfo {
        path: collection.to_path_buf(),
        has_descriptor: descriptor.is_file(),
        has_pdfs_dir: pdfs_dir.is_dir(),
        pdf_count,
        persona,
    })
}

/// Inspect every immediate subdirectory of a base path.
pub fn survey_collections(base: &Path) -> Result<Vec<CollectionInfo>> {
    if !base.is_dir() {
        return Err(Error::CollectionNotFound(base.to_path_buf()));
    }
    let mut infos = Vec::new();
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(base)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    for dir in dirs {
        infos.push(survey_collection(&dir)?);
    }
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PageText;
    use std::collections::HashMap;

    /// In-memory text source keyed by file name.
    struct FakeSource {
        pages: HashMap<String, Vec<PageText>>,
    }

    impl TextSource for FakeSource {
        fn extract(&self, path: &Path) -> Result<Vec<PageText>> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.pages
                .get(&name)
                .cloned()
                .ok_or(Error::DocumentUnreadable {
                    document: name,
                    reason: "no such fixture".to_string(),
                })
        }
    }

    fn write_descriptor(collection: &Path, documents: &[&str], role: &str, task: &str) {
        std::fs::create_dir_all(collection.join(CollectionLayout::PDFS_DIR)).unwrap();
        let docs: Vec<serde_json::Value> = documents
            .iter()
            .map(|d| serde_json::json!({"filename": d, "title": d}))
            .collect();
        let descriptor = serde_json::json!({
            "documents": docs,
            "persona": {"role": role},
            "job_to_be_done": {"task": task},
        });
        std::fs::write(
            CollectionLayout::input_path(collection),
            serde_json::to_string_pretty(&descriptor).unwrap(),
        )
        .unwrap();
    }

    fn travel_pages() -> Vec<PageText> {
        vec![PageText {
            page_number: 1,
            text: "OVERVIEW\nThis is a test section about travel and hotels.\nDETAILS\nMore content here."
                .to_string(),
        }]
    }

    #[test]
    fn missing_collection_is_reported() {
        let analyzer = CollectionAnalyzer::new(
            AnalysisConfig::default(),
            FakeSource {
                pages: HashMap::new(),
            },
        );
        let err = analyzer
            .process_collection(Path::new("/nonexistent/collection"))
            .unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound(_)));
    }

    #[test]
    fn malformed_descriptor_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let collection = dir.path().join("broken");
        std::fs::create_dir_all(&collection).unwrap();
        std::fs::write(CollectionLayout::input_path(&collection), "{\"documents\": []").unwrap();

        let analyzer = CollectionAnalyzer::new(
            AnalysisConfig::default(),
            FakeSource {
                pages: HashMap::new(),
            },
        );
        let err = analyzer.process_collection(&collection).unwrap_err();
        assert!(matches!(err, Error::InputDescriptorInvalid { .. }));
    }

    #[test]
    fn unreadable_document_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let collection = dir.path().join("trip");
        write_descriptor(
            &collection,
            &["good.pdf", "broken.pdf", "also-good.pdf"],
            "Travel Planner",
            "Plan a trip and book hotels",
        );

        let mut pages = HashMap::new();
        pages.insert("good.pdf".to_string(), travel_pages());
        pages.insert(
            "also-good.pdf".to_string(),
            vec![PageText {
                page_number: 1,
                text: "ITINERARY\nDay trips along the coast with beach time.".to_string(),
            }],
        );

        let analyzer = CollectionAnalyzer::new(AnalysisConfig::default(), FakeSource { pages });
        let report = analyzer.process_collection(&collection).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].document, "broken.pdf");
        assert!(!report.result.extracted_sections.is_empty());
        for section in &report.result.extracted_sections {
            assert_ne!(section.document, "broken.pdf");
        }
    }

    #[test]
    fn all_documents_unreadable_still_yields_well_formed_result() {
        let dir = tempfile::tempdir().unwrap();
        let collection = dir.path().join("empty");
        write_descriptor(&collection, &["gone.pdf"], "Student", "study for exams");

        let analyzer = CollectionAnalyzer::new(
            AnalysisConfig::default(),
            FakeSource {
                pages: HashMap::new(),
            },
        );
        let report = analyzer.process_collection(&collection).unwrap();
        assert!(report.result.extracted_sections.is_empty());
        assert!(report.result.subsection_analysis.is_empty());
        assert_eq!(report.result.metadata.input_documents, vec!["gone.pdf"]);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn batch_isolates_bad_collections() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("alpha");
        write_descriptor(&good, &["good.pdf"], "Travel Planner", "Plan a trip");

        let bad = dir.path().join("beta");
        std::fs::create_dir_all(bad.join(CollectionLayout::PDFS_DIR)).unwrap();
        std::fs::write(CollectionLayout::input_path(&bad), "not json at all").unwrap();

        let mut pages = HashMap::new();
        pages.insert("good.pdf".to_string(), travel_pages());

        let analyzer = CollectionAnalyzer::new(AnalysisConfig::default(), FakeSource { pages });
        let summary = analyzer.analyze_all(dir.path()).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded.len(), 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(CollectionLayout::output_path(&good).is_file());
    }

    #[test]
    fn survey_reports_layout_problems() {
        let dir = tempfile::tempdir().unwrap();
        let collection = dir.path().join("incomplete");
        std::fs::create_dir_all(&collection).unwrap();

        let info = survey_collection(&collection).unwrap();
        assert!(!info.has_descriptor);
        assert!(!info.has_pdfs_dir);
        assert_eq!(info.pdf_count, 0);
        assert!(!info.is_complete());
    }
}
