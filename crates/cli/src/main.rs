//! CLI tool for extracting speaker notes from OpenDocument presentations.

use anyhow::{Context, Result};
use clap::Parser;
use odp_notes_core::OutputMode;
use odp_notes_odp::{ExtractedNotes, OdpParser};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Printed when the input is a valid package but not a presentation.
const UNSUPPORTED_MESSAGE: &str = "Unsupported file format";

/// Exit status for inputs that are not presentations.
const EXIT_UNSUPPORTED: u8 = 2;

/// Extract notes text from ODP files.
#[derive(Parser, Debug)]
#[command(name = "odp-notes")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input ODP file (.odp or .otp)
    #[arg(value_name = "input.odp")]
    input: PathBuf,

    /// Wrap the output in a single SSML <speak> document instead of per-page markers
    #[arg(short, long)]
    speech: bool,

    /// Print notes grouped per page as JSON
    #[arg(long, conflicts_with = "speech")]
    json: bool,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn mode(&self) -> OutputMode {
        if self.speech {
            OutputMode::SpeechMarkup
        } else {
            OutputMode::Bracketed
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.verbose {
        eprintln!("Processing: {}", args.input.display());
    }

    let parser = OdpParser::new(args.mode());
    let notes = match parser.parse_file(&args.input) {
        Ok(notes) => notes,
        Err(e) if e.is_unsupported_format() => {
            log::debug!("{}", e);
            eprintln!("{}", UNSUPPORTED_MESSAGE);
            return Ok(ExitCode::from(EXIT_UNSUPPORTED));
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to extract notes from {}", args.input.display()))
        }
    };

    if args.verbose {
        eprintln!(
            "  Extracted {} notes paragraphs from {} pages",
            notes.document.all_paragraphs().len(),
            notes.document.slides.len()
        );
    }

    let output = render_output(&notes, args.json)?;

    match &args.output {
        Some(path) => {
            write_output(path, &output)?;
            if args.verbose {
                eprintln!("Written to: {}", path.display());
            }
        }
        None => {
            let mut stdout = BufWriter::new(io::stdout().lock());
            stdout
                .write_all(output.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Turn extracted notes into the final output text.
fn render_output(notes: &ExtractedNotes, json: bool) -> Result<String> {
    if json {
        let mut output = serde_json::to_string_pretty(&notes.document)
            .context("Failed to serialize notes")?;
        output.push('\n');
        return Ok(output);
    }

    Ok(notes.lines.iter().map(|line| format!("{}\n", line)).collect())
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
