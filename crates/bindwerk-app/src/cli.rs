// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bindwerk")]
#[command(version)]
#[command(about = "Merge and split PDFs, optionally turning scanned pages into searchable pages", long_about = None)]
pub struct Cli {
    /// JSON configuration file (defaults to the one in the config directory, if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge PDFs into one file, in the order given
    Merge {
        /// Input PDFs
        #[arg(value_name = "FILE", required_unless_present = "folder")]
        files: Vec<PathBuf>,

        /// Merge every PDF in this folder, sorted by name
        #[arg(long, value_name = "DIR", conflicts_with = "files")]
        folder: Option<PathBuf>,

        /// Output PDF
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Move an input before merging, e.g. `--move 3:1` (1-based, repeatable)
        #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
        moves: Vec<(usize, usize)>,

        #[command(flatten)]
        ocr: OcrArgs,
    },

    /// Write selected pages of each PDF as separate files
    Split {
        /// Input PDFs
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Directory for `<name>_<page>.pdf` files
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Pages to extract, e.g. `1,3,5-7` (all pages when omitted or blank)
        #[arg(short, long, value_name = "RANGES", default_value = "")]
        pages: String,

        #[command(flatten)]
        ocr: OcrArgs,
    },

    /// Make a searchable copy of a scanned PDF
    Ocr {
        /// Input PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output PDF (default: `<name>_ocr.pdf` next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Recognition language, e.g. `eng` or `jpn+eng`
        #[arg(short, long, value_name = "LANG")]
        lang: Option<String>,

        /// Rasterisation resolution
        #[arg(long, value_name = "DPI")]
        dpi: Option<u32>,
    },

    /// Show which pages a range expression selects
    Range {
        /// Range expression, e.g. `1,3,5-7`
        #[arg(value_name = "RANGES")]
        expression: String,

        /// Number of pages in the document
        #[arg(short, long, value_name = "N")]
        total: usize,
    },
}

/// OCR switches shared by `merge` and `split`.
#[derive(Args, Debug, Clone)]
pub struct OcrArgs {
    /// Replace every page with a searchable page
    #[arg(long)]
    pub ocr: bool,

    /// Recognition language, e.g. `eng` or `jpn+eng`
    #[arg(short, long, value_name = "LANG", requires = "ocr")]
    pub lang: Option<String>,

    /// Rasterisation resolution
    #[arg(long, value_name = "DPI", requires = "ocr")]
    pub dpi: Option<u32>,
}

/// Parse `FROM:TO` with 1-based positions.
fn parse_move(value: &str) -> Result<(usize, usize), String> {
    let (from, to) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got `{value}`"))?;
    let position = |text: &str| -> Result<usize, String> {
        match text.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(format!("`{text}` is not a position (positions start at 1)")),
        }
    };
    Ok((position(from)?, position(to)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_positions_are_one_based() {
        assert_eq!(parse_move("3:1"), Ok((3, 1)));
        assert_eq!(parse_move(" 2 : 4 "), Ok((2, 4)));
        assert!(parse_move("0:1").is_err());
        assert!(parse_move("3").is_err());
        assert!(parse_move("a:b").is_err());
    }

    #[test]
    fn merge_accepts_files_or_a_folder() {
        let cli = Cli::try_parse_from([
            "bindwerk", "merge", "a.pdf", "b.pdf", "-o", "out.pdf", "--move", "2:1",
        ])
        .unwrap();
        match cli.command {
            Commands::Merge {
                files, moves, ocr, ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(moves, vec![(2, 1)]);
                assert!(!ocr.ocr);
            }
            other => panic!("parsed {other:?}"),
        }

        let cli =
            Cli::try_parse_from(["bindwerk", "merge", "--folder", "scans", "-o", "out.pdf"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Merge { folder: Some(_), .. }));

        assert!(Cli::try_parse_from(["bindwerk", "merge", "-o", "out.pdf"]).is_err());
    }

    #[test]
    fn language_requires_ocr() {
        assert!(
            Cli::try_parse_from(["bindwerk", "split", "a.pdf", "-d", "out", "--lang", "eng"])
                .is_err()
        );
        let cli = Cli::try_parse_from([
            "bindwerk", "split", "a.pdf", "-d", "out", "--ocr", "--lang", "eng", "-p", "1-2",
        ])
        .unwrap();
        match cli.command {
            Commands::Split { pages, ocr, .. } => {
                assert_eq!(pages, "1-2");
                assert_eq!(ocr.lang.as_deref(), Some("eng"));
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli =
            Cli::try_parse_from(["bindwerk", "range", "1-3", "--total", "2", "-vv", "--json"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }
}
