//! Run one web-research step from the command line and print the sources.
//!
//! Tracing goes to stderr so stdout carries only the formatted sources
//! (or JSON with `--json`), ready to paste into a prompt.

use std::path::PathBuf;

use anyhow::Context;
use researcher::{ResearcherConfig, WebResearch};

const USAGE: &str = "usage: researcher-sources [--config <path>] [--provider searxng|perplexity] \
[--max-tokens <n>] [--loop <n>] [--raw|--no-raw] [--all] [--json] <query>...";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    provider: Option<String>,
    max_tokens: Option<usize>,
    loop_index: usize,
    include_raw_content: Option<bool>,
    all_providers: bool,
    json: bool,
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };
    if args.query.is_empty() {
        anyhow::bail!("missing query\n{USAGE}");
    }

    let mut config =
        ResearcherConfig::load(args.config.as_deref()).context("failed to load config")?;
    if let Some(ref provider) = args.provider {
        config.search.provider = provider.parse()?;
    }
    if let Some(max_tokens) = args.max_tokens {
        config.research.max_tokens_per_source = max_tokens;
    }
    if args.include_raw_content.is_some() {
        config.research.include_raw_content = args.include_raw_content;
    }

    let research = WebResearch::new(config)?;
    let query = args.query.join(" ");
    let step = if args.all_providers {
        research.run_all(&query, args.loop_index).await
    } else {
        research.run(&query, args.loop_index).await
    }
    .map_err(|e| {
        tracing::error!(error = %e, "web research failed");
        anyhow::anyhow!("web research failed: {e}")
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&step)?);
    } else {
        println!("{}\n\n{}", step.sources_gathered, step.web_research_results);
    }
    Ok(())
}

/// Parse command-line arguments. Returns `None` when help was requested.
fn parse_args(mut raw: impl Iterator<Item = String>) -> anyhow::Result<Option<Args>> {
    let mut args = Args::default();

    while let Some(arg) = raw.next() {
        let mut value = |flag: &str| {
            raw.next()
                .with_context(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--provider" => args.provider = Some(value("--provider")?),
            "--max-tokens" => {
                let raw_value = value("--max-tokens")?;
                args.max_tokens = Some(
                    raw_value
                        .parse()
                        .with_context(|| format!("invalid --max-tokens `{raw_value}`"))?,
                );
            }
            "--loop" => {
                let raw_value = value("--loop")?;
                args.loop_index = raw_value
                    .parse()
                    .with_context(|| format!("invalid --loop `{raw_value}`"))?;
            }
            "--raw" => args.include_raw_content = Some(true),
            "--no-raw" => args.include_raw_content = Some(false),
            "--all" => args.all_providers = true,
            "--json" => args.json = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown option `{flag}`\n{USAGE}"),
            _ => args.query.push(arg),
        }
    }

    Ok(Some(args))
}
