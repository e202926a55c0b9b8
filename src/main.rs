mod cli;
mod download;
mod html_meta;
mod io;
mod json_walk;
mod logging;
mod outside;
mod platform;
mod resolver;
mod result;
mod settings;
mod slug;
#[cfg(test)]
mod testing;
mod types;

use std::{path::Path, process::ExitCode};

use clap::Parser;
use owo_colors::OwoColorize;
use tracing::{debug, info};

use crate::{
    cli::Args,
    download::Downloader,
    outside::HttpClient,
    resolver::Resolver,
    result::{Error, Result},
    settings::Settings,
    types::DownloadResult,
};

fn main() -> miette::Result<ExitCode> {
    let args = Args::parse();
    logging::init_logging(args.log_level)?;

    let settings = Settings::load(args.config.as_deref())?;
    debug!("Settings: {settings:?}");
    let output_dir = args.output.as_deref().unwrap_or(settings.output_dir.as_path());

    let client = HttpClient::new(&settings.client_config())?;
    let resolver = Resolver::new(&client);
    let downloader = Downloader::new(&client, settings.chunk_size);

    let outcome = run_urls(&resolver, &downloader, output_dir, &args);

    println!();
    print_summary(&outcome);
    info!(
        "{} succeeded, {} failed",
        outcome.successes.len(),
        outcome.failures.len()
    );

    Ok(outcome.exit_code())
}

/// What happened to every URL of a run
#[derive(Debug, Default)]
struct Outcome {
    successes: Vec<DownloadResult>,
    failures: Vec<(String, Error)>,
}

impl Outcome {
    /// Failure as soon as one URL failed, skipped ones included
    fn exit_code(&self) -> ExitCode {
        if self.failures.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Handle the URLs one after the other, a failure never stops the next ones
fn run_urls(
    resolver: &Resolver<'_>,
    downloader: &Downloader<'_>,
    output_dir: &Path,
    args: &Args,
) -> Outcome {
    let mut outcome = Outcome::default();

    for url in &args.urls {
        println!("{} {url}", "Processing".bold());

        match process_url(resolver, downloader, url, output_dir, args) {
            Ok(Some(result)) => {
                println!("{} {}", "Saved to".green(), result.output_path.display());
                outcome.successes.push(result);
            }
            Ok(None) => {}
            Err(err) => {
                if err.is_skip() {
                    println!("{} {}", "Skipping:".yellow(), err.report_line());
                } else {
                    println!("{} {}", "Error:".red(), err.report_line());
                }
                debug!("{url} failed: {err:?}");
                outcome.failures.push((url.clone(), err));
            }
        }
    }

    outcome
}

/// Resolve a single URL and download its video unless in dry-run mode
fn process_url(
    resolver: &Resolver<'_>,
    downloader: &Downloader<'_>,
    url: &str,
    output_dir: &Path,
    args: &Args,
) -> Result<Option<DownloadResult>> {
    let metadata = resolver.fetch_metadata(url)?;

    if args.dry_run || args.show_metadata {
        println!("{metadata}");
    }
    if args.dry_run {
        return Ok(None);
    }

    downloader
        .download(metadata, output_dir, args.overwrite)
        .map(Some)
}

fn print_summary(outcome: &Outcome) {
    if !outcome.successes.is_empty() {
        let rows: Vec<(String, &str)> = outcome
            .successes
            .iter()
            .map(|r| {
                (
                    r.output_path.display().to_string(),
                    r.metadata.source_url.as_str(),
                )
            })
            .collect();
        let width = rows
            .iter()
            .map(|(file, _)| file.chars().count())
            .max()
            .unwrap_or(0)
            .max("File".len());

        println!("{}", format!("{:<width$}  {}", "File", "Source").bold());
        for (file, source) in rows {
            println!("{file:<width$}  {source}");
        }
        println!();
    }

    if outcome.failures.is_empty() {
        println!("{}", "All downloads completed successfully.".green());
        return;
    }

    println!("{}", "Failed:".red().bold());
    for (url, err) in &outcome.failures {
        println!("  {url}: {}", err.report_line());
    }
    println!(
        "{}",
        format!("{} download(s) failed.", outcome.failures.len()).red()
    );
}
