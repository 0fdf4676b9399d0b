pub mod countdown;
pub mod display;
pub mod model;

pub use countdown::{CountdownPhase, CountdownState, Remaining};
pub use model::{Auction, AuctionStatus, Bid, Bidder};
