//! font-line command line tool
//!
//! Prints vertical metrics reports for a set of fonts, or writes copies of
//! them with the line spacing normalized to a percentage of the em.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use clap::Parser;
use font_line::{font_report, normalize_font_file, Error, LineSpacing};
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print a vertical metrics report for each font
    Report {
        /// The font files to report on
        #[arg(required = true)]
        fonts: Vec<PathBuf>,
    },
    /// Write a copy of each font with the line spacing set to a percentage of the em
    Percent {
        /// Line spacing in percent of units per em, e.g. 20
        percent: String,
        /// The font files to normalize
        #[arg(required = true)]
        fonts: Vec<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let ok = match args.command {
        Command::Report { fonts } => report(&fonts),
        Command::Percent { percent, fonts } => match percent.parse::<LineSpacing>() {
            Ok(spacing) => normalize(spacing, &fonts),
            Err(e) => {
                print_error(&e);
                false
            }
        },
    };
    if !ok {
        std::process::exit(1);
    }
}

/// Reports are computed in parallel but printed in argument order.
fn report(fonts: &[PathBuf]) -> bool {
    let reports: Vec<_> = fonts.par_iter().map(font_report).collect();
    let mut ok = true;
    for report in reports {
        match report {
            Ok(report) => println!("{report}"),
            Err(e) => {
                print_error(&e);
                ok = false;
            }
        }
    }
    ok
}

fn normalize(spacing: LineSpacing, fonts: &[PathBuf]) -> bool {
    let ok = AtomicBool::new(true);
    fonts.par_iter().for_each(|font_path| {
        if let Err(e) = normalize_font_file(font_path, spacing) {
            print_error(&e);
            ok.store(false, Ordering::Release);
        }
    });
    ok.load(Ordering::Acquire)
}

fn print_error(error: &Error) {
    eprintln!("[font-line] ERROR: {error}");
}
