pub mod bidder;
pub mod validation;

pub use bidder::{AuctionCountdownBidder, BidPanel, BidderView, LoadStatus, SubmitOutcome};
pub use validation::{validate_bid, BidRejection};
