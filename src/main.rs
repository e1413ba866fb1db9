use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docsieve::analyzer::{survey_collection, survey_collections};
use docsieve::{AnalysisConfig, CollectionAnalyzer, PdfTextSource};

#[derive(Parser)]
#[command(
    name = "docsieve",
    about = "Persona-driven section extraction and ranking for PDF collections"
)]
struct Cli {
    /// Analyze a single collection directory
    #[arg(long, conflicts_with_all = ["all", "list", "validate"])]
    collection: Option<PathBuf>,

    /// Analyze every collection under the base path
    #[arg(long, conflicts_with_all = ["list", "validate"])]
    all: bool,

    /// List collections under the base path
    #[arg(long, conflicts_with = "validate")]
    list: bool,

    /// Check that a collection directory has the expected layout
    #[arg(long)]
    validate: Option<PathBuf>,

    /// Base directory scanned for collections
    #[arg(long, default_value = "collections")]
    base_path: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.list {
        return list_collections(&cli.base_path);
    }

    if let Some(path) = &cli.validate {
        return validate_collection(path);
    }

    let analyzer = CollectionAnalyzer::new(AnalysisConfig::default(), PdfTextSource);

    if cli.all {
        let summary = analyzer.analyze_all(&cli.base_path)?;
        println!(
            "Processed {} collections: {} succeeded, {} failed",
            summary.total,
            summary.succeeded.len(),
            summary.failed.len()
        );
        for (collection, error) in &summary.failed {
            println!("  failed: {}: {}", collection.display(), error);
        }
        if !summary.failed.is_empty() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Some(collection) = &cli.collection {
        let output_path = analyzer.analyze_collection(collection)?;
        println!("Analysis written to {}", output_path.display());
        return Ok(());
    }

    // No action selected; mirror the behavior of `--help`.
    <Cli as clap::CommandFactory>::command().print_help()?;
    Ok(())
}

fn list_collections(base: &std::path::Path) -> Result<()> {
    let infos = survey_collections(base)?;
    if infos.is_empty() {
        println!("No collections found under {}", base.display());
        return Ok(());
    }
    println!("Collections under {}:", base.display());
    for info in infos {
        let marker = if info.is_complete() { "ok " } else { "!! " };
        let name = info
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| info.path.display().to_string());
        println!("  {}{}", marker, name);
        if let Some(persona) = &info.persona {
            println!("      persona: {}", persona);
        }
        println!("      pdfs: {}", info.pdf_count);
    }
    Ok(())
}

fn validate_collection(path: &std::path::Path) -> Result<()> {
    let info = survey_collection(path)?;
    println!("{}", path.display());
    println!("  descriptor: {}", if info.has_descriptor { "present" } else { "missing" });
    println!("  pdfs dir:   {}", if info.has_pdfs_dir { "present" } else { "missing" });
    println!("  pdf files:  {}", info.pdf_count);
    if !info.is_complete() {
        anyhow::bail!("collection layout is incomplete");
    }
    println!("  layout ok");
    Ok(())
}
