use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use osa_phenotyper_lib::config::ReportConfig;
use osa_phenotyper_lib::phenotype::{DefaultPhenotypeEngine, PhenotypeEngine, RawInput};

/// Classify OSA phenotypes from a JSON object of sleep-study and exam fields
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input JSON file, or "-" to read from stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Report settings file (JSON); defaults apply when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the referral notes instead of the full JSON report
    #[arg(long)]
    referrals: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    osa_phenotyper_lib::init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ReportConfig::default(),
    };

    let input = read_input(&args.input)?;
    info!(fields = input.len(), source = %args.input, "Input loaded");

    let engine = DefaultPhenotypeEngine::new(config);
    let report = engine.evaluate(&input);

    if args.referrals {
        for note in report.referrals.iter() {
            println!("== {} ==", note.title);
            println!("{}\n", note.body);
        }
    } else {
        let json = report.to_json_pretty()?;
        println!("{json}");
    }

    Ok(())
}

fn read_input(source: &str) -> Result<RawInput> {
    if source == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .context("reading input from stdin")?;
        return Ok(RawInput::from_json_str("stdin", &json)?);
    }
    let path = PathBuf::from(source);
    RawInput::load(&path).with_context(|| format!("loading input from {source}"))
}
