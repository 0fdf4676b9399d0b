// region:    --- Imports
use crate::auction::{Auction, Bid};
use crate::error::ApiResult;
use async_trait::async_trait;

// endregion: --- Imports

// region:    --- Modules
pub mod http;

pub use http::HttpAuctionApi;
// endregion: --- Modules

// region:    --- Auction Api Trait

/// How the server answered a bid or join request that reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Accepted { message: Option<String> },
    Rejected { reason: String },
}

/// Remote auction service. The server is the only authority on bid order.
#[async_trait]
pub trait AuctionApi: Send + Sync {
    async fn fetch_auction(&self, auction_id: &str) -> ApiResult<Auction>;

    /// Bids newest first.
    async fn fetch_bids(&self, auction_id: &str) -> ApiResult<Vec<Bid>>;

    async fn place_bid(&self, auction_id: &str, amount: i64) -> ApiResult<RemoteOutcome>;

    async fn join_auction(&self, auction_id: &str) -> ApiResult<RemoteOutcome>;
}

// endregion: --- Auction Api Trait
