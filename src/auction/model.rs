// region:    --- Imports
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Number;

// endregion: --- Imports

// region:    --- Auction Model

/// Auction status as assigned by the server.
///
/// Anything the server reports besides `LIVE` and `SCHEDULED`
/// (`COMPLETED`, `CANCELLED`, ...) is closed for bidding and decodes as `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionStatus {
    Live,
    Scheduled,
    #[serde(other)]
    Ended,
}

/// Auction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub status: AuctionStatus,
    #[serde(deserialize_with = "amount")]
    pub starting_bid: i64,
    #[serde(default, deserialize_with = "optional_amount")]
    pub current_bid: Option<i64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub buy_now_price: Option<i64>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub weight_unit: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bids_count: Option<u64>,
}

impl Auction {
    /// The value a new bid has to exceed.
    pub fn effective_current_bid(&self) -> i64 {
        self.current_bid.unwrap_or(self.starting_bid)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.status, AuctionStatus::Live)
    }
}

// endregion: --- Auction Model

// region:    --- Bid Model

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bidder {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Bidder {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Accepted bid, newest first in every list the server returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    #[serde(deserialize_with = "amount")]
    pub amount: i64,
    pub bidder: Bidder,
    pub created_at: DateTime<Utc>,
}

// endregion: --- Bid Model

// region:    --- Amount Decoding

// Prices are stored as floats server-side, so `1000000` and `1000000.0` both show up.
fn amount_from_number(number: &Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    let value = number.as_f64()?;
    if value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

fn amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    amount_from_number(&number)
        .ok_or_else(|| de::Error::custom(format!("amount is not a whole number: {}", number)))
}

fn optional_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(number) => amount_from_number(&number).map(Some).ok_or_else(|| {
            de::Error::custom(format!("amount is not a whole number: {}", number))
        }),
    }
}

// endregion: --- Amount Decoding
