/// Test doubles for the bidder's collaborators.
// region:    --- Modules
pub mod api;
pub mod clock;
pub mod notify;

pub use api::{ApiCall, MockAuctionApi, Reply};
pub use clock::{MockClock, TokioClock};
pub use notify::{RecordingNotifier, Toast};
// endregion: --- Modules

// region:    --- Imports
use crate::auction::{Auction, AuctionStatus, Bid, Bidder};
use chrono::{DateTime, Utc};

// endregion: --- Imports

// region:    --- Fixtures

/// Live copper lot ending at `ends_at`.
pub fn live_auction(
    id: &str,
    starting_bid: i64,
    current_bid: Option<i64>,
    ends_at: Option<DateTime<Utc>>,
) -> Auction {
    Auction {
        id: id.to_string(),
        title: "خردة نحاس".to_string(),
        status: AuctionStatus::Live,
        starting_bid,
        current_bid,
        buy_now_price: None,
        ends_at,
        category: "copper".to_string(),
        weight: 1.5,
        weight_unit: "ton".to_string(),
        location: "Damascus".to_string(),
        bids_count: None,
    }
}

pub fn bid(id: &str, amount: i64, bidder_name: &str, created_at: DateTime<Utc>) -> Bid {
    Bid {
        id: id.to_string(),
        amount,
        bidder: Bidder {
            id: format!("user_{}", bidder_name),
            name: Some(bidder_name.to_string()),
        },
        created_at,
    }
}

// endregion: --- Fixtures
