pub mod api;
pub mod auction;
pub mod bidding;
pub mod clock;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod services;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use api::{AuctionApi, HttpAuctionApi, RemoteOutcome};
pub use auction::{Auction, AuctionStatus, Bid, Bidder, CountdownPhase, CountdownState, Remaining};
pub use bidding::{AuctionCountdownBidder, BidPanel, BidRejection, BidderView, LoadStatus, SubmitOutcome};
pub use clock::{Clock, SystemClock};
pub use config::{BidderSettings, Config};
pub use error::{ApiError, ApiResult};
pub use services::{AuthProvider, NotificationSink, Severity, StaticAuth, TracingNotifier};
