//! Evaluate virtual-screening prediction files into one metrics table.
//!
//! Each input file is scored independently on the rayon worker pool; one
//! writer thread drains finished rows into the output CSV as they arrive.
//! A file that cannot be parsed or evaluated is logged and skipped, so a
//! single bad run never aborts the batch.
//!
//! ```bash
//! vseval --output results.eval.csv predictions/*.out
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rayon::prelude::*;

use vseval::{evaluate_file, EvalParams, EvalRow, EvalWriter};
use vseval::report::JsonReport;

#[derive(Parser, Debug)]
#[command(name = "vseval")]
#[command(about = "Score virtual-screening prediction files into an evaluation table")]
struct Args {
    /// Prediction files to evaluate (headerless CSV: fold,ligand,target,score,tp)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output CSV table
    #[arg(short, long)]
    output: PathBuf,

    /// Optional JSON dump of every evaluated row
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Ranking cutoff L for P(L) / R(L)
    #[arg(long, default_value_t = 20)]
    at: usize,

    /// BEDROC early-recognition parameter
    #[arg(long, default_value_t = 20.0)]
    alpha: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let params = EvalParams {
        at: args.at,
        alpha: args.alpha,
    };

    let progress = ProgressBar::new(args.inputs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let output = File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let keep_rows = args.out_json.is_some();

    let (tx, rx) = mpsc::channel::<Vec<EvalRow>>();
    let writer_params = params;
    let writer = thread::spawn(move || -> Result<(usize, Vec<EvalRow>)> {
        let mut table = EvalWriter::new(output, &writer_params);
        let mut written = 0usize;
        let mut retained = Vec::new();
        for rows in rx {
            for row in &rows {
                table.write_row(row)?;
                written += 1;
            }
            if keep_rows {
                retained.extend(rows);
            }
        }
        table.flush()?;
        Ok((written, retained))
    });

    args.inputs.par_iter().for_each_with(tx, |tx, path| {
        match evaluate_file(path, &params) {
            Ok(rows) => {
                // The writer only disappears on a write failure, which is
                // reported through its join below.
                let _ = tx.send(rows);
            }
            Err(err) => error!("skipping {}: {err}", path.display()),
        }
        progress.inc(1);
    });

    let (written, rows) = writer
        .join()
        .expect("writer thread panicked")
        .context("writing evaluation table")?;
    progress.finish();
    info!(
        "wrote {written} rows from {} files to {}",
        args.inputs.len(),
        args.output.display()
    );

    if let Some(json_path) = &args.out_json {
        let report = JsonReport::new(&params, &rows);
        let content = serde_json::to_string_pretty(&report)?;
        std::fs::write(json_path, content)
            .with_context(|| format!("cannot write {}", json_path.display()))?;
        info!("wrote {}", json_path.display());
    }

    Ok(())
}
