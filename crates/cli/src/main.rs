use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use csv2ofx_convert::{ConversionConfig, ConversionOrchestrator, RawRow};

/// Convert a delimited bank-statement export into an OFX 1.0.2 file.
#[derive(Debug, Parser)]
#[command(name = "csv2ofx", version, about)]
struct Cli {
    /// Input CSV file. The first row must name the columns.
    input: PathBuf,

    /// Output OFX file.
    #[arg(short, long)]
    output: PathBuf,

    /// Conversion profile (TOML): field mapping, separators, account
    /// metadata, date policy.
    #[arg(short, long)]
    profile: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let profile = std::fs::read_to_string(&cli.profile)
        .with_context(|| format!("reading profile {}", cli.profile.display()))?;
    let config: ConversionConfig =
        toml::from_str(&profile).with_context(|| format!("parsing profile {}", cli.profile.display()))?;

    let rows = read_rows(&cli.input, config.delimiter)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    tracing::info!(rows = rows.len(), input = %cli.input.display(), "input loaded");

    // BufWriter is flushed by the engine on success; the file handle closes
    // on every exit path when it drops.
    let out = BufWriter::new(
        File::create(&cli.output)
            .with_context(|| format!("creating {}", cli.output.display()))?,
    );

    let result = ConversionOrchestrator::new(config).run(rows, out);

    if result.success {
        println!(
            "wrote {} transaction(s) ({} excluded), final balance {} -> {}",
            result.transactions_written,
            result.transactions_excluded,
            result.final_balance,
            cli.output.display(),
        );
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "conversion failed: {}",
            result.error_detail.as_deref().unwrap_or("unknown error")
        );
        Ok(ExitCode::FAILURE)
    }
}

fn read_rows(path: &PathBuf, delimiter: char) -> anyhow::Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_path(path)?;

    let headers = RawRow::headers(reader.headers()?.iter().map(str::trim));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(RawRow::new(
            headers.clone(),
            record.iter().map(str::to_string).collect(),
        ));
    }
    Ok(rows)
}
