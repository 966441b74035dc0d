//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `vhost_probe` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Reading the domain list (file or stdin)
//! - Printing results as JSON on stdout
//!
//! All core functionality is implemented in the library crate.

use std::io::Read;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use vhost_probe::initialization::init_logger_with;
use vhost_probe::{parse_manual_list, Crawler, CrawlerConfig, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let input = if opt.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read domains from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&opt.file)
            .with_context(|| format!("Failed to read {}", opt.file.display()))?
    };

    let domains = parse_manual_list(&input).context("Invalid domain list")?;
    if domains.is_empty() {
        eprintln!("vhost_probe error: no domains to crawl");
        process::exit(1);
    }

    let mut crawler = Crawler::new(CrawlerConfig::from(&opt)).context("Failed to set up crawler")?;

    match crawler.crawl(domains).await {
        Ok(results) => {
            println!(
                "{}",
                serde_json::to_string_pretty(results).context("Failed to serialize results")?
            );
            if let Some(summary) = crawler.summary() {
                eprintln!(
                    "Crawled {} domain{} ({} succeeded, {} failed) in {}ms",
                    summary.total,
                    if summary.total == 1 { "" } else { "s" },
                    summary.successful,
                    summary.failed,
                    summary.elapsed.milli
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("vhost_probe error: {:#}", e);
            process::exit(1);
        }
    }
}
