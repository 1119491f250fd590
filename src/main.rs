//! docpix: extract embedded images from Word documents
//!
//! Each input document gets an export directory named after its stem,
//! populated with the embedded images renamed to the export convention.
//! Legacy `.doc` inputs are converted with the external office converter
//! first; the converted package is removed again after extraction.

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use docpix::config::Config;
use docpix::convert;
use docpix::pipeline::{self, BatchSummary, DocumentFailure, PipelineOptions};

const SEPARATOR_WIDTH: usize = 64;

#[derive(Parser)]
#[command(name = "docpix", version, about = "Extract embedded images from Word documents")]
struct Cli {
    /// Word documents (.doc or .docx) to process
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Create export directories under this directory instead of next to each input
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,

    /// Skip the author and topic title lookup
    #[arg(long)]
    no_metadata: bool,

    /// Exit without waiting for a keypress
    #[arg(long)]
    no_pause: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(failures) if failures == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<usize> {
    let config = Config::load()?;

    match convert::locate_converter(&config.converter) {
        Some(path) => println!("{}", path.display()),
        None => println!(
            "warning: converter '{}' not found in {} or on PATH",
            config.converter.executable,
            config.converter.search_dir.display()
        ),
    }
    println!("{}", "=".repeat(SEPARATOR_WIDTH));

    let options = PipelineOptions {
        export_root: cli.export_dir.clone(),
        read_metadata: !cli.no_metadata,
    };

    let mut summary = BatchSummary::default();
    for file in &cli.files {
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        let parent = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        println!("Input file: {} in {}", name, parent.display());

        match pipeline::process_document(file, &config, &options) {
            Ok(report) => {
                for warning in &report.warnings {
                    eprintln!("\twarning: {warning}");
                }
                if let Some(author) = &report.author {
                    println!("\tAuthor: \"{author}\"");
                }
                if let Some(title) = &report.topic_title {
                    println!("\tTopic title: \"{title}\"");
                }
                for image in &report.images {
                    println!("\t{image}");
                }
                summary.processed.push(report);
            }
            Err(err) => {
                eprintln!("error: {}: {err:#}", file.display());
                summary.failures.push(DocumentFailure {
                    source: file.clone(),
                    error: format!("{err:#}"),
                });
            }
        }
    }

    println!("{}", "=".repeat(SEPARATOR_WIDTH));
    println!("{} Word documents processed.", summary.processed.len());
    if !summary.failures.is_empty() {
        println!("{} failed.", summary.failures.len());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if !cli.no_pause {
        pause()?;
    }

    Ok(summary.failures.len())
}

fn pause() -> Result<()> {
    print!("Press Enter to exit...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
