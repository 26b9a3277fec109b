// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bindwerk — merge and split PDFs, with searchable-page OCR.
//
// Entry point. Initialises logging, loads the configuration and dispatches the
// requested subcommand.

mod cli;
mod services;

use bindwerk_core::error::Result;
use bindwerk_core::human_errors::humanize_error;
use bindwerk_core::types::{InputList, PageSelection};
use bindwerk_core::PageRangeResolver;
use clap::Parser;
use serde::Serialize;

use cli::{Cli, Commands};
use services::app_services::AppServices;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Bindwerk starting");

    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "Operation failed");
        let human = humanize_error(&err);
        eprintln!("Error: {}", human.message);
        eprintln!("{}", human.suggestion);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;

    if let Commands::Range { expression, total } = &cli.command {
        let pages: Vec<usize> = PageRangeResolver::resolve(expression, *total)
            .into_iter()
            .map(|index| index + 1)
            .collect();
        return if json {
            print_json(&pages)
        } else {
            let listed: Vec<String> = pages.iter().map(usize::to_string).collect();
            println!("{}", listed.join(","));
            Ok(())
        };
    }

    let svc = AppServices::init(cli.config.as_deref(), !json)?;

    match cli.command {
        Commands::Merge {
            files,
            folder,
            output,
            moves,
            ocr,
        } => {
            let mut inputs = match folder {
                Some(dir) => InputList::from_folder(dir)?,
                None => InputList::new(files),
            };
            for (from, to) in moves {
                inputs.move_item(from - 1, to - 1)?;
            }
            let settings = if ocr.ocr {
                Some(svc.ocr_settings(ocr.lang, ocr.dpi)?)
            } else {
                None
            };

            let report = svc.merge(inputs, output, settings).await?;
            if json {
                return print_json(&report);
            }
            println!(
                "Merged {} documents ({} pages) into {}",
                report.documents,
                report.pages,
                report.output.display()
            );
        }

        Commands::Split {
            files,
            output_dir,
            pages,
            ocr,
        } => {
            let settings = if ocr.ocr {
                Some(svc.ocr_settings(ocr.lang, ocr.dpi)?)
            } else {
                None
            };

            let report = svc
                .split(files, output_dir, PageSelection::from_input(&pages), settings)
                .await?;
            if json {
                return print_json(&report);
            }
            println!(
                "Wrote {} files to {}",
                report.outputs.len(),
                report.output_dir.display()
            );
        }

        Commands::Ocr {
            file,
            output,
            lang,
            dpi,
        } => {
            let settings = svc.ocr_settings(lang, dpi)?;
            let report = svc.searchable_copy(file, output, settings).await?;
            if json {
                return print_json(&report);
            }
            println!(
                "Searchable copy ({} pages) written to {}",
                report.pages,
                report.output.display()
            );
        }

        Commands::Range { .. } => {}
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
