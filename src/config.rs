// region:    --- Imports
use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

// endregion: --- Imports

// region:    --- Config

/// Increment added to the starting bid when seeding the bid input of an
/// auction that has no bids yet.
pub const DEFAULT_BID_INCREMENT: i64 = 100_000;
pub const DEFAULT_QUICK_BID_PRESETS: [i64; 4] = [100_000, 500_000, 1_000_000, 5_000_000];
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidderSettings {
    pub bid_increment: i64,
    pub quick_bid_presets: Vec<i64>,
    pub tick_interval: Duration,
}

impl Default for BidderSettings {
    fn default() -> Self {
        Self {
            bid_increment: DEFAULT_BID_INCREMENT,
            quick_bid_presets: DEFAULT_QUICK_BID_PRESETS.to_vec(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Terminal front end configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub auction_id: String,
    pub token: Option<String>,
    pub http_timeout: Duration,
    pub settings: BidderSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("AUCTION_API_URL").context("AUCTION_API_URL must be set")?;
        let auction_id = env::var("AUCTION_ID").context("AUCTION_ID must be set")?;
        let token = env::var("AUCTION_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let mut settings = BidderSettings::default();
        if let Ok(raw) = env::var("BID_INCREMENT") {
            settings.bid_increment = parse_bid_increment(&raw)?;
        }
        if let Ok(raw) = env::var("QUICK_BID_PRESETS") {
            let presets = parse_presets(&raw);
            if !presets.is_empty() {
                settings.quick_bid_presets = presets;
            }
        }
        if let Ok(raw) = env::var("TICK_INTERVAL_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("TICK_INTERVAL_MS is not a number: {}", raw))?;
            anyhow::ensure!(millis > 0, "TICK_INTERVAL_MS must be positive");
            settings.tick_interval = Duration::from_millis(millis);
        }

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {}", raw))?,
            ),
            Err(_) => DEFAULT_HTTP_TIMEOUT,
        };

        Ok(Self {
            api_url,
            auction_id,
            token,
            http_timeout,
            settings,
        })
    }
}

fn parse_bid_increment(raw: &str) -> Result<i64> {
    let increment: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("BID_INCREMENT is not a number: {}", raw))?;
    anyhow::ensure!(increment > 0, "BID_INCREMENT must be positive, got {}", increment);
    Ok(increment)
}

fn parse_presets(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|preset| {
            let trimmed = preset.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<i64>() {
                Ok(value) if value > 0 => Some(value),
                Ok(value) => {
                    tracing::warn!(value, "ignoring non-positive QUICK_BID_PRESETS entry");
                    None
                }
                Err(err) => {
                    tracing::warn!(value = trimmed, error = %err, "invalid QUICK_BID_PRESETS entry");
                    None
                }
            }
        })
        .collect()
}

// endregion: --- Config

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_increment_must_be_a_positive_number() {
        assert_eq!(parse_bid_increment(" 250000 ").unwrap(), 250_000);
        assert!(parse_bid_increment("0").is_err());
        assert!(parse_bid_increment("-100000").is_err());
        assert!(parse_bid_increment("lots").is_err());
    }

    #[test]
    fn parses_valid_presets() {
        assert_eq!(parse_presets("100000, 250000 ,1000000"), vec![100_000, 250_000, 1_000_000]);
    }

    #[test]
    fn skips_invalid_and_non_positive_presets() {
        assert_eq!(parse_presets("5000,abc,-10,0, 7000"), vec![5_000, 7_000]);
    }

    #[test]
    fn empty_input_yields_no_presets() {
        assert!(parse_presets("").is_empty());
    }

    #[test]
    fn default_settings_match_marketplace_controls() {
        let settings = BidderSettings::default();
        assert_eq!(settings.bid_increment, 100_000);
        assert_eq!(settings.quick_bid_presets, vec![100_000, 500_000, 1_000_000, 5_000_000]);
        assert_eq!(settings.tick_interval, Duration::from_secs(1));
    }
}
