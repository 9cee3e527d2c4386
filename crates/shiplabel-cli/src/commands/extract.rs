//! Extract command - fetch label PDFs and extract their data.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use futures_util::future::join_all;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use shiplabel_core::{DocumentInput, DocumentResult, LabelProcessor, process_batch};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Label PDF URLs, files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Company identifier echoed in the response
    #[arg(long)]
    company_id: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a per-document summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of parallel workers (default: batch.max_workers)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    fn key(&self) -> String {
        match self {
            Source::Url(url) => url.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Response envelope: the documents in input order.
#[derive(Serialize)]
struct BatchResponse<'a> {
    company_id: Option<&'a str>,
    data: &'a [DocumentResult],
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let workers = args.jobs.unwrap_or(config.batch.max_workers);
    let processor = Arc::new(LabelProcessor::from_config(&config)?);

    let sources = resolve_sources(&args.inputs)?;
    info!("Extracting {} documents with {} workers", sources.len(), workers);

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));

    progress.set_message(format!("Fetching {} documents", sources.len()));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.batch.fetch_timeout_secs))
        .build()?;
    let inputs = join_all(sources.iter().map(|source| retrieve(&client, source))).await;

    progress.set_message(format!("Extracting {} documents", inputs.len()));
    let results = process_batch(processor, inputs, workers).await;
    progress.finish_and_clear();

    let response = BatchResponse {
        company_id: args.company_id.as_deref(),
        data: &results,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };

    if let Some(ref output_path) = args.output {
        fs::write(output_path, &json)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    if let Some(ref summary_path) = args.summary {
        write_summary(summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<&DocumentResult> = results.iter().filter(|r| !r.is_success()).collect();
    eprintln!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} not extracted",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );
    for result in &failed {
        eprintln!("  - {}: {}", result.key, result.status);
    }

    Ok(())
}

/// Turn command-line inputs into sources, expanding glob patterns in place.
fn resolve_sources(inputs: &[String]) -> anyhow::Result<Vec<Source>> {
    let mut sources = Vec::with_capacity(inputs.len());

    for input in inputs {
        if input.starts_with("http://") || input.starts_with("https://") {
            sources.push(Source::Url(input.clone()));
        } else if input.contains(['*', '?', '[']) {
            let mut matches: Vec<PathBuf> = glob(input)?.filter_map(|r| r.ok()).collect();
            if matches.is_empty() {
                anyhow::bail!("No matching files found for pattern: {}", input);
            }
            matches.sort();
            sources.extend(matches.into_iter().map(Source::File));
        } else {
            sources.push(Source::File(PathBuf::from(input)));
        }
    }

    Ok(sources)
}

/// Fetch or read one document. Failures become unavailable inputs.
async fn retrieve(client: &reqwest::Client, source: &Source) -> DocumentInput {
    let key = source.key();
    match source {
        Source::Url(url) => match download(client, url).await {
            Ok(bytes) => DocumentInput::bytes(key, bytes),
            Err(e) => {
                debug!("Download of {} failed: {}", url, e);
                DocumentInput::unavailable(key, e.to_string())
            }
        },
        Source::File(path) => match tokio::fs::read(path).await {
            Ok(bytes) => DocumentInput::bytes(key, bytes),
            Err(e) => DocumentInput::unavailable(key, format!("cannot read {}: {}", path.display(), e)),
        },
    }
}

async fn download(client: &reqwest::Client, url: &str) -> reqwest::Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

fn write_summary(path: &Path, results: &[DocumentResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["key", "status", "processing_time_ms"])?;
    for result in results {
        wtr.write_record([
            result.key.as_str(),
            &result.status.to_string(),
            &result.processing_time_ms.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
