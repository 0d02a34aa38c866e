use anyhow::{Context, Result, bail};
use clap::Parser;
use log::LevelFilter;
use pdfooter::{FooterConfig, Orchestrator, PdfDocument, RunOutcome, TerminalPrompter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pdfooter")]
#[command(
    about = "Add a footer annotation to every bookmarked page of a PDF",
    version,
    long_about = "Stamps a read-only footer text annotation, showing the bookmark title,\n\
                  on the page each top-level bookmark points to.\n\
                  \n\
                  A preview is placed on the first bookmark's page before anything else\n\
                  is changed; the batch only runs after you confirm.\n\
                  \n\
                  Examples:\n\
                  • Interactive:  pdfooter book.pdf\n\
                  • Unattended:   pdfooter book.pdf -y -o stamped.pdf\n\
                  • Inspect:      pdfooter book.pdf -p preview.pdf --delay-ms 0"
)]
struct Cli {
    input: PathBuf,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also save the document with only the preview footer.
    #[arg(short, long)]
    preview: Option<PathBuf>,

    /// Pause between the preview and the confirmation prompt.
    #[arg(long, default_value_t = 5000)]
    delay_ms: u64,

    /// Answer yes to every prompt.
    #[arg(short, long)]
    yes: bool,

    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let is_pdf = cli
        .input
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !cli.input.is_file() {
        bail!("Input file does not exist: {}", cli.input.display());
    }
    if !is_pdf {
        bail!("Non-PDF file provided: {}", cli.input.display());
    }

    let output = cli.output.clone().unwrap_or_else(|| {
        let stem = cli
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        cli.input.with_file_name(format!("{}_footers.pdf", stem))
    });
    let Some(output) = resolve_output_conflict(&output, cli.yes)? else {
        return Ok(());
    };

    let document = PdfDocument::load(&cli.input)
        .with_context(|| format!("Failed to load PDF: {}", cli.input.display()))?;

    let prompter = TerminalPrompter::new().assume_yes(cli.yes);
    let mut orchestrator = Orchestrator::new(prompter)
        .with_config(FooterConfig::DEFAULT)
        .with_delay(Duration::from_millis(cli.delay_ms));

    let preview_path = cli.preview.clone();
    let outcome = orchestrator.run(Some(document), |doc: &PdfDocument| {
        if let Some(path) = &preview_path {
            doc.save_copy(path)?;
            println!("✓ Preview saved: {}", path.display());
        }
        Ok(())
    });

    match outcome {
        RunOutcome::Completed {
            mut document,
            result,
        } => {
            document
                .save(&output)
                .with_context(|| format!("Failed to save: {}", output.display()))?;
            println!(
                "✓ Footers added: {}/{} bookmark(s), saved to {}",
                result.success,
                result.processed(),
                output.display()
            );
            Ok(())
        }
        RunOutcome::Cancelled { .. } => {
            println!("Aborted.");
            Ok(())
        }
        // the orchestrator has already reported the error
        RunOutcome::Failed(_) => std::process::exit(1),
    }
}

fn resolve_output_conflict(output: &Path, overwrite: bool) -> Result<Option<PathBuf>> {
    let current_output = match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => output.to_path_buf(),
        _ => output.with_extension("pdf"),
    };

    if !current_output.exists() || overwrite {
        return Ok(Some(current_output));
    }

    print!(
        "⚠️ Output file '{}' already exists. Action? (Y=overwrite, R=rename, N=abort): ",
        current_output.display()
    );
    io::stdout().flush()?;
    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;
    match choice.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(Some(current_output)),
        "n" | "no" => {
            println!("Aborted.");
            Ok(None)
        }
        "r" | "rename" => {
            print!("Enter a new filename or folder (e.g., stamped.pdf or C:\\output): ");
            io::stdout().flush()?;
            let mut new_path = String::new();
            io::stdin().read_line(&mut new_path)?;
            let trimmed = new_path.trim();
            if trimmed.is_empty() {
                println!("Empty path. Aborted.");
                return Ok(None);
            }
            let mut new_output = PathBuf::from(trimmed);
            if new_output.is_dir() {
                if let Some(filename) = current_output.file_name() {
                    new_output.push(filename);
                }
            }

            if new_output.exists() {
                println!(
                    "❌ Output '{}' already exists. Aborted to prevent overwrite.",
                    new_output.display()
                );
                return Ok(None);
            }
            Ok(Some(new_output))
        }
        _ => {
            println!("Invalid choice. Aborted.");
            Ok(None)
        }
    }
}
