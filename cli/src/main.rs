//! partscan CLI - parts-manual extraction tool

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use partscan::model::{PageKind, PageVerdict};
use partscan::{collect_inputs, ExtractOptions, JsonFormat, Partscan, ProcessingResult};

#[derive(Parser)]
#[command(name = "partscan")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract spare parts, part tables and diagrams from PDF parts manuals", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Input PDF files or directories
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    output: PathBuf,

    #[command(flatten)]
    tuning: Tuning,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process manuals and write images, CSV sheets and results.json
    Process {
        /// Input PDF files or directories
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Show how every page of a manual is classified
    Classify {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Show version information
    Version,
}

/// Options shared by every command that runs the extractor.
#[derive(Args, Clone, Default)]
struct Tuning {
    /// JSON file with extraction options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Drawing count above which diagram pages are rendered
    #[arg(long, value_name = "N")]
    dense_threshold: Option<usize>,

    /// Magnification for rendered diagram pages (minimum 2.0)
    #[arg(long, value_name = "SCALE")]
    render_scale: Option<f32>,

    /// Minimum embedded image width and height in pixels
    #[arg(long, value_name = "PX")]
    min_image_size: Option<u32>,

    /// Phrase marking the suggested spare-parts page
    #[arg(long, value_name = "TEXT")]
    marker: Option<String>,

    /// Do not write any image artifacts
    #[arg(long)]
    no_images: bool,
}

impl Tuning {
    /// Config file first, then flag overrides.
    fn options(&self) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => ExtractOptions::from_json_file(path)?,
            None => ExtractOptions::default(),
        };

        if let Some(threshold) = self.dense_threshold {
            options = options.with_dense_threshold(threshold);
        }
        if let Some(scale) = self.render_scale {
            options = options.with_render_scale(scale);
        }
        if let Some(pixels) = self.min_image_size {
            options = options.with_min_image_size(pixels);
        }
        if let Some(marker) = &self.marker {
            options = options.with_marker(marker.as_str());
        }
        if self.no_images {
            options = options.with_images(false);
        }

        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Process {
            inputs,
            output,
            compact,
            tuning,
        }) => cmd_process(&inputs, &output, compact, &tuning),
        Some(Commands::Classify {
            input,
            json,
            tuning,
        }) => cmd_classify(&input, json, &tuning),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: process if inputs are provided
            if cli.inputs.is_empty() {
                println!("{}", "Usage: partscan <INPUT>... [-o DIR]".yellow());
                println!("       partscan --help for more information");
                Ok(())
            } else {
                cmd_process(&cli.inputs, &cli.output, false, &cli.tuning)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_process(
    inputs: &[PathBuf],
    output: &Path,
    compact: bool,
    tuning: &Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let paths = collect_inputs(inputs)?;
    if paths.is_empty() {
        return Err("no PDF files found in the given inputs".into());
    }

    let scan = Partscan::new(output).with_options(tuning.options()?);

    println!(
        "{} {} manual(s) into {}",
        "Processing".cyan().bold(),
        paths.len(),
        output.display()
    );

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results = scan.process_all_with(&paths, |result| {
        pb.set_message(result.model.clone());
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let written = scan.write_outputs(&results, format)?;

    print_summary(&results);

    println!("\n{}", "Output files:".green().bold());
    println!("  {} images/", "├─".dimmed());
    for path in &written {
        let shown = path.strip_prefix(output).unwrap_or(path);
        println!("  {} {}", "├─".dimmed(), shown.display());
    }
    println!("  {} {} files", "└─".dimmed(), written.len());

    Ok(())
}

fn print_summary(results: &[ProcessingResult]) {
    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for result in results {
        let summary = result.summary();
        if result.status.is_error() {
            println!("{} {}: {}", "✗".red(), summary.model.bold(), summary.status.red());
            continue;
        }

        println!(
            "{} {}: {} spare parts, {} tables, {} images",
            "✓".green(),
            summary.model.bold(),
            summary.spare_parts_count,
            summary.tables_count,
            summary.images_count
        );
        let faults = result.fault_count();
        if faults > 0 {
            println!("    {} {} page(s) could not be read", "!".yellow(), faults);
        }
    }

    let failed = results.iter().filter(|r| r.status.is_error()).count();
    let tables: usize = results.iter().map(|r| r.tables.len()).sum();
    let images: usize = results.iter().map(|r| r.images.len()).sum();
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {}  {}: {}  {}: {}  {}: {}",
        "Manuals".bold(),
        results.len(),
        "Failed".bold(),
        failed,
        "Tables".bold(),
        tables,
        "Images".bold(),
        images
    );
}

fn cmd_classify(input: &Path, json: bool, tuning: &Tuning) -> Result<(), Box<dyn std::error::Error>> {
    let report = partscan::classify_file_with_options(input, tuning.options()?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Page Classification".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Model".bold(), report.model);
    match report.anchor {
        Some(page) => println!("{}: page {}", "Spare parts".bold(), page),
        None => println!("{}: {}", "Spare parts".bold(), "marker not found".yellow()),
    }
    println!();

    for page in &report.pages {
        let line = match &page.verdict {
            PageVerdict::Anchor { entries } => {
                format!("{} ({} entries)", "spare parts".magenta(), entries)
            }
            PageVerdict::Classified { classification } => {
                let e = &classification.evidence;
                let kind = match classification.kind {
                    PageKind::Table => "table".green(),
                    PageKind::Diagram => "diagram".blue(),
                    PageKind::Skip => "skip".dimmed(),
                };
                format!(
                    "{} {}",
                    kind,
                    format!(
                        "headers={} rows={} drawings={} chars={}",
                        e.header_hits, e.data_row_hits, e.drawing_count, e.text_length
                    )
                    .dimmed()
                )
            }
            PageVerdict::Fault { detail } => format!("{} {}", "fault".red(), detail),
        };
        println!("{:>4}  {}", page.page, line);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "partscan".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Parts-manual extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/partscan".dimmed());
    println!("License: MIT");
}
