//! Pipeline configuration and collection directory layout.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Tunables for one analysis run. Constructed once and passed into the
/// pipeline; nothing reads these from globals.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Maximum number of extracted sections in the output (top N).
    pub max_sections: usize,
    /// Maximum number of refined subsection excerpts (top M, M <= N).
    pub max_subsections: usize,
    /// Character budget for a refined excerpt.
    pub refined_text_max_chars: usize,
    /// Body length at which the length-suitability component saturates.
    pub optimal_body_chars: usize,
    /// Decay constant for the positional component.
    pub positional_decay: f64,
    /// Lines longer than this are never treated as section headers.
    pub max_title_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_sections: 10,
            max_subsections: 5,
            refined_text_max_chars: 500,
            optimal_body_chars: 600,
            positional_decay: 0.5,
            max_title_chars: 100,
        }
    }
}

/// File layout of a collection directory: an input descriptor, a `pdfs/`
/// subdirectory, and the output artifact written next to them.
#[derive(Debug, Clone)]
pub struct CollectionLayout;

impl CollectionLayout {
    pub const INPUT_FILE: &'static str = "input.json";
    pub const OUTPUT_FILE: &'static str = "output.json";
    pub const PDFS_DIR: &'static str = "pdfs";

    pub fn input_path(collection: &Path) -> PathBuf {
        collection.join(Self::INPUT_FILE)
    }

    pub fn output_path(collection: &Path) -> PathBuf {
        collection.join(Self::OUTPUT_FILE)
    }

    pub fn pdf_path(collection: &Path, filename: &str) -> PathBuf {
        collection.join(Self::PDFS_DIR).join(filename)
    }

    /// Scan a base directory for collection directories, i.e. immediate
    /// subdirectories carrying an input descriptor and a pdfs dir.
    /// Returned in path order so batch runs are reproducible.
    pub fn discover(base: &Path) -> Result<Vec<PathBuf>> {
        let mut collections = Vec::new();
        for entry in WalkDir::new(base)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let path = entry.into_path();
            if Self::input_path(&path).is_file() && path.join(Self::PDFS_DIR).is_dir() {
                collections.push(path);
            }
        }
        Ok(collections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_sections, 10);
        assert_eq!(config.max_subsections, 5);
        assert_eq!(config.refined_text_max_chars, 500);
        assert!(config.max_subsections <= config.max_sections);
    }

    #[test]
    fn discover_finds_only_complete_collections() {
        let base = tempfile::tempdir().unwrap();

        let complete = base.path().join("trip-planning");
        std::fs::create_dir_all(complete.join(CollectionLayout::PDFS_DIR)).unwrap();
        std::fs::write(CollectionLayout::input_path(&complete), "{}").unwrap();

        // missing pdfs dir
        let partial = base.path().join("no-pdfs");
        std::fs::create_dir_all(&partial).unwrap();
        std::fs::write(CollectionLayout::input_path(&partial), "{}").unwrap();

        // stray file at the top level
        std::fs::write(base.path().join("notes.txt"), "n/a").unwrap();

        let found = CollectionLayout::discover(base.path()).unwrap();
        assert_eq!(found, vec![complete]);
    }
}
