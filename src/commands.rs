use anyhow::{Context, Result};
use console::style;
use tracing::info;

use crate::cache::SemanticCache;
use crate::client::MarqoClient;
use crate::config::Config;

/// Make sure the configured cache index exists
#[inline]
pub fn init_index(config: &Config) -> Result<()> {
    let cache = SemanticCache::connect(config).context("Failed to initialize semantic cache")?;

    println!(
        "Index {} is ready on {}",
        style(cache.index_name()).cyan(),
        cache.client().base_url()
    );
    Ok(())
}

/// Store a single question/answer pair
#[inline]
pub fn store_entry(
    config: &Config,
    question: &str,
    answer: &str,
    rephrased_query: &str,
) -> Result<()> {
    let cache = SemanticCache::connect(config).context("Failed to initialize semantic cache")?;

    cache
        .store(question, answer, rephrased_query)
        .context("Failed to store cache entry")?;

    info!("Stored cache entry in index {}", cache.index_name());
    println!("{}", style("✓ Answer cached").green());
    Ok(())
}

/// Look up a cached answer, printing it or a miss notice.
///
/// Unset `score_threshold` and `top_k` fall back to the configured values.
#[inline]
pub fn lookup_answer(
    config: &Config,
    question: &str,
    score_threshold: Option<f64>,
    top_k: Option<usize>,
) -> Result<Option<String>> {
    let cache = SemanticCache::connect(config).context("Failed to initialize semantic cache")?;
    let threshold = score_threshold.unwrap_or_else(|| cache.score_threshold());

    let answer = cache
        .lookup(question, threshold, top_k)
        .context("Failed to search semantic cache")?;

    match &answer {
        Some(answer) => println!("{}", answer),
        None => eprintln!(
            "{}",
            style(format!("No cached answer scored at least {}", threshold)).yellow()
        ),
    }

    Ok(answer)
}

/// Show whether the Marqo service is reachable and how the cache is set up
#[inline]
pub fn show_status(config: &Config) -> Result<()> {
    let client = MarqoClient::new(&config.marqo).context("Failed to create Marqo client")?;

    println!("{}", style("Semantic Cache Status").bold().cyan());
    println!("  Marqo URL: {}", client.base_url());

    match client.health() {
        Ok(health) => {
            println!(
                "  Service: {} ({})",
                style("reachable").green(),
                health.version.as_deref().unwrap_or("unknown version")
            );
        }
        Err(e) => {
            println!("  Service: {} ({})", style("unreachable").red(), e);
        }
    }

    println!("  Index: {}", config.cache.index_name);
    println!("  Top K: {}", config.cache.top_k);
    println!("  Score threshold: {}", config.cache.score_threshold);

    Ok(())
}
