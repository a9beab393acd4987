//! pdfscene CLI - reconciles extracted PDF page streams into layered JSON

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfscene::{
    DiscardStorage, ElementStats, FontResolver, JsonFormat, LocalStorage, Processor, RawDocument,
    RefineOptions, SkipReason, StorageSink,
};

#[derive(Parser)]
#[command(name = "pdfscene")]
#[command(version)]
#[command(about = "Reconcile extracted PDF page streams into layered JSON", long_about = None)]
struct Cli {
    /// Extracted document (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    tuning: Tuning,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every processing command.
#[derive(clap::Args, Clone, Default)]
struct Tuning {
    /// Refinement thresholds (JSON; missing keys keep their defaults)
    #[arg(long, value_name = "FILE", env = "PDFSCENE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Common fonts to match span fonts against (JSON array)
    #[arg(long, value_name = "FILE", env = "PDFSCENE_FONTS", global = true)]
    fonts: Option<PathBuf>,

    /// Process pages one after another
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a document and write its page JSON and assets
    Convert {
        /// Extracted document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show per-page element counts before and after refinement
    Info {
        /// Extracted document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let tuning = cli.tuning;

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            compact,
        }) => cmd_convert(&input, output.as_deref(), compact, &tuning),
        Some(Commands::Info { input, json }) => cmd_info(&input, json, &tuning),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), false, &tuning)
            } else {
                println!("{}", "Usage: pdfscene <FILE> [OUTPUT]".yellow());
                println!("       pdfscene --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_processor<S: StorageSink>(
    storage: S,
    tuning: &Tuning,
) -> Result<Processor<S>, Box<dyn std::error::Error>> {
    let refine = match &tuning.config {
        Some(path) => RefineOptions::from_json_file(path)?,
        None => RefineOptions::default(),
    };

    let mut processor = Processor::new(storage).with_refine(refine);
    if let Some(path) = &tuning.fonts {
        let fonts = FontResolver::load_common_fonts(path)?;
        log::debug!("Loaded {} common font(s) from {}", fonts.len(), path.display());
        processor = processor.with_common_fonts(fonts);
    }
    if tuning.sequential {
        processor = processor.sequential();
    }
    Ok(processor)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    tuning: &Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| PathBuf::from("output"));

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Loading document...");
    let document = RawDocument::load_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let processor =
        build_processor(LocalStorage::new(&output_dir), tuning)?.with_json_format(format);

    pb.set_message(format!("Reconciling {}...", document.name));
    let result = processor.process(&document)?;
    pb.finish_with_message("Done!");

    let after = ElementStats::from_pages(&result.document.pages);
    let intake = &result.document.intake;

    println!("\n{}", "Output:".green().bold());
    println!("  {} {}", "├─".dimmed(), result.reference);
    println!("  {} fonts/", "├─".dimmed());
    println!("  {} images/", "└─".dimmed());
    println!();
    println!(
        "{} page(s), {} element(s), {} skipped at intake",
        after.page_count,
        after.element_count(),
        intake.skipped_total()
    );

    Ok(())
}

fn cmd_info(input: &Path, json: bool, tuning: &Tuning) -> Result<(), Box<dyn std::error::Error>> {
    let document = RawDocument::load_file(input)?;
    let processor = build_processor(DiscardStorage, tuning)?;
    let reconciled = processor.reconcile_document(&document)?;
    let after = reconciled.after();

    if json {
        let rows: Vec<serde_json::Value> = reconciled
            .before
            .iter()
            .map(|(number, before)| {
                serde_json::json!({
                    "number": number,
                    "before": before,
                    "after": after.get(number).cloned().unwrap_or_default(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(52).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Name".bold(), document.name);
    println!("{}: {}", "Pages".bold(), reconciled.pages.len());
    println!("{}: {}", "Embedded fonts".bold(), document.fonts.len());

    println!();
    println!("{}", "Elements per Page (before -> after)".cyan().bold());
    println!("{}", "─".repeat(52).dimmed());
    println!(
        "{:>6}  {:>9}  {:>9}  {:>9}  {:>9}",
        "page".bold(),
        "text".bold(),
        "image".bold(),
        "rect".bold(),
        "path".bold()
    );

    for (number, before) in &reconciled.before {
        let after = after.get(number).cloned().unwrap_or_default();
        println!(
            "{:>6}  {:>9}  {:>9}  {:>9}  {:>9}",
            number,
            format!("{}->{}", before.text_count, after.text_count),
            format!("{}->{}", before.image_count, after.image_count),
            format!("{}->{}", before.rect_count, after.rect_count),
            format!("{}->{}", before.path_count, after.path_count),
        );
    }

    let totals = after.values().fold(ElementStats::new(), |mut acc, s| {
        acc.merge(s);
        acc
    });
    println!();
    println!("{}: {}", "Decorated texts".bold(), totals.decorated_count);

    let intake = &reconciled.intake;
    if intake.skipped_total() > 0 {
        println!();
        println!("{}", "Skipped at Intake".yellow().bold());
        for reason in [
            SkipReason::MalformedGeometry,
            SkipReason::EmptyText,
            SkipReason::DuplicateImage,
            SkipReason::MaskOnlyImage,
        ] {
            let count = intake.skipped_for(reason);
            if count > 0 {
                println!("  {}: {}", reason, count);
            }
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfscene".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layered page reconciliation for extracted PDF content");
    println!();
    println!("License: MIT");
}
