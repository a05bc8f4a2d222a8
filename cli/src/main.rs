//! hocrextract CLI - writes one hOCR file per page of a layout file

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use hocrextract::{
    extract_document, write_document, Document, ExtractOptions, JsonLayoutSource,
    LayoutSource, MissingRasterPolicy, PageSelection,
};

#[derive(Parser, Debug)]
#[command(name = "hocrextract")]
#[command(version)]
#[command(about = "Write hOCR pages from the layout analysis of a scanned PDF", long_about = None)]
struct Cli {
    /// Layout file produced by the upstream layout analysis
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output directory (default: directory named after the input)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Offset added to page numbers in output file names
    #[arg(short = 'p', long, default_value_t = 0, allow_negative_numbers = true)]
    page_offset: i64,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// What to do with pages that have no background raster
    #[arg(long, value_enum, default_value = "skip")]
    missing_raster: RasterMode,

    /// Abort on content overflow instead of skipping the page
    #[arg(long)]
    strict: bool,

    /// Render pages in parallel
    #[arg(long)]
    parallel: bool,

    /// Suppress progress and summary output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RasterMode {
    /// Leave the page out
    Skip,
    /// Keep layout units as pixels
    Unscaled,
    /// Abort the run
    Fail,
}

impl From<RasterMode> for MissingRasterPolicy {
    fn from(mode: RasterMode) -> Self {
        match mode {
            RasterMode::Skip => MissingRasterPolicy::Skip,
            RasterMode::Unscaled => MissingRasterPolicy::Unscaled,
            RasterMode::Fail => MissingRasterPolicy::Fail,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = cmd_extract(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(cli)?;
    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&cli.input));

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(3)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading layout...");
    let source = JsonLayoutSource::open(&cli.input)?;
    pb.inc(1);

    pb.set_message(format!("Rendering {} pages...", source.page_count()));
    let document = extract_document(&source, &options)?;
    pb.inc(1);

    pb.set_message("Writing pages...");
    let written = write_document(&document, &output_dir, options.page_offset)?;
    pb.inc(1);

    pb.finish_with_message("Done!");
    log::info!(
        "Wrote {} of {} pages to {}",
        written.len(),
        document.page_count(),
        output_dir.display()
    );

    if !cli.quiet {
        print_summary(&document, &output_dir, &written);
    }

    Ok(())
}

fn build_options(cli: &Cli) -> Result<ExtractOptions, String> {
    let pages = match cli.pages.as_deref() {
        Some(p) => PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?,
        None => PageSelection::All,
    };

    let mut options = ExtractOptions::new()
        .with_page_offset(cli.page_offset)
        .with_pages(pages)
        .with_missing_raster(cli.missing_raster.into())
        .with_parallel(cli.parallel);
    if cli.strict {
        options = options.strict();
    }
    Ok(options)
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(stem.into_owned())
}

fn print_summary(document: &Document, output_dir: &Path, written: &[PathBuf]) {
    println!(
        "\n{} {}",
        "Output files in".green().bold(),
        output_dir.display()
    );
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("  {} {}", branch.dimmed(), name);
    }

    let skipped: Vec<_> = document.skipped().collect();
    if !skipped.is_empty() {
        println!("\n{}", "Skipped pages:".yellow().bold());
        for (page_num, reason) in skipped {
            println!("  {} page {}: {}", "-".dimmed(), page_num, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["hocrextract", "scan.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("scan.json"));
        assert_eq!(cli.page_offset, 0);
        assert_eq!(cli.missing_raster, RasterMode::Skip);
        assert!(!cli.strict);

        let options = build_options(&cli).unwrap();
        assert_eq!(options.pages, PageSelection::All);
        assert_eq!(options.missing_raster, MissingRasterPolicy::Skip);
    }

    #[test]
    fn test_parse_negative_offset_and_flags() {
        let cli = Cli::try_parse_from([
            "hocrextract",
            "scan.json",
            "-p",
            "-3",
            "--pages",
            "2-4",
            "--missing-raster",
            "unscaled",
            "--strict",
            "--parallel",
        ])
        .unwrap();
        let options = build_options(&cli).unwrap();
        assert_eq!(options.page_offset, -3);
        assert_eq!(options.pages, PageSelection::Range(2..=4));
        assert_eq!(options.missing_raster, MissingRasterPolicy::Unscaled);
        assert!(options.parallel);
    }

    #[test]
    fn test_invalid_page_range() {
        let cli = Cli::try_parse_from(["hocrextract", "scan.json", "--pages", "x"]).unwrap();
        assert!(build_options(&cli).is_err());
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("/data/scan.json")),
            PathBuf::from("scan")
        );
    }

    #[test]
    fn test_extract_writes_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.json");
        std::fs::write(
            &input,
            r#"{"source": "book.pdf", "pages": [
                {"status": "ok", "width": 100, "height": 100},
                {"status": "failed", "error": "overflow", "message": "too large"}
            ]}"#,
        )
        .unwrap();
        let out = dir.path().join("out");

        let cli = Cli::try_parse_from([
            "hocrextract",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--missing-raster",
            "unscaled",
            "-q",
        ])
        .unwrap();
        cmd_extract(&cli).unwrap();

        assert!(out.join("book-0001_HOCR.shtml").exists());
        assert!(!out.join("book-0002_HOCR.shtml").exists());
    }
}
