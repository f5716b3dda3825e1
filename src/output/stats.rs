//! Session statistics display
//!
//! Renders the counters collected by a [`Scraper`](crate::Scraper) in the
//! same plain-text layout the CLI prints with `--stats`.

use crate::scraper::ScraperStats;
use std::fmt;

impl fmt::Display for ScraperStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limiter = &self.rate_limiter;

        writeln!(f, "=== Scraper Statistics ===\n")?;

        writeln!(f, "Session:")?;
        writeln!(f, "  Engine: {}", self.engine)?;
        writeln!(
            f,
            "  Browser running: {}",
            if self.browser_running { "yes" } else { "no" }
        )?;
        writeln!(f, "  Pages scraped: {}", self.pages_scraped)?;
        writeln!(f, "  Cache hits: {}", self.cache_hits)?;
        writeln!(f, "  Failed: {}", self.failed)?;
        writeln!(f)?;

        writeln!(f, "Rate Limiter:")?;
        writeln!(f, "  Requests made: {}", limiter.requests_made)?;
        writeln!(f, "  Requests per minute: {}", limiter.requests_per_minute)?;
        writeln!(f, "  Failures: {}", limiter.failures)?;
        writeln!(f, "  Current backoff: {:.2}x", limiter.current_backoff)?;
        match limiter.last_request {
            Some(at) => writeln!(f, "  Last request: {}", at.to_rfc3339())?,
            None => writeln!(f, "  Last request: never")?,
        }
        writeln!(f)?;

        match &self.cache {
            Some(cache) => {
                writeln!(f, "Cache:")?;
                writeln!(f, "  Entries: {}", cache.total_entries)?;
                writeln!(f, "  TTL: {}h", cache.default_ttl_hours)?;
                writeln!(f, "  Age: {}s", cache.age_seconds)?;
            }
            None => writeln!(f, "Cache: disabled")?,
        }

        let attempts = self.pages_scraped + self.failed;
        let success_rate = if attempts > 0 {
            (self.pages_scraped as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };
        write!(
            f,
            "\nSuccess Rate: {:.1}% ({} / {} fetches succeeded)",
            success_rate, self.pages_scraped, attempts
        )
    }
}

/// Formats statistics as a human-readable block
pub fn format_statistics(stats: &ScraperStats) -> String {
    stats.to_string()
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ScraperStats) {
    println!("{}", stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::limiter::RateLimiterStats;

    fn sample_stats(cache: Option<CacheStats>) -> ScraperStats {
        ScraperStats {
            engine: "http".to_string(),
            browser_running: false,
            pages_scraped: 3,
            cache_hits: 2,
            failed: 1,
            rate_limiter: RateLimiterStats {
                requests_made: 4,
                requests_per_minute: 30,
                failures: 1,
                current_backoff: 1.5,
                last_request: None,
            },
            cache,
        }
    }

    #[test]
    fn test_format_statistics() {
        let text = format_statistics(&sample_stats(Some(CacheStats {
            total_entries: 3,
            default_ttl_hours: 24,
            age_seconds: 12,
        })));

        assert!(text.contains("Engine: http"));
        assert!(text.contains("Current backoff: 1.50x"));
        assert!(text.contains("Last request: never"));
        assert!(text.contains("Entries: 3"));
        assert!(text.contains("TTL: 24h"));
        assert!(text.ends_with("Success Rate: 75.0% (3 / 4 fetches succeeded)"));
    }

    #[test]
    fn test_format_statistics_without_cache() {
        let text = format_statistics(&sample_stats(None));
        assert!(text.contains("Cache: disabled"));
    }
}
