/// In-memory auction service that behaves like the marketplace server.
// region:    --- Imports
use crate::api::{AuctionApi, RemoteOutcome};
use crate::auction::{Auction, Bid, Bidder};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

// endregion: --- Imports

// region:    --- Mock Auction Api

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FetchAuction(String),
    FetchBids(String),
    PlaceBid { auction_id: String, amount: i64 },
    Join(String),
}

/// How the mock answers bid and join requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reply {
    /// Apply server rules: a bid must beat the current highest.
    #[default]
    Accept,
    Reject(String),
    /// Transport failure.
    Fail,
}

#[derive(Default)]
struct MockState {
    auctions: HashMap<String, Auction>,
    bids: HashMap<String, Vec<Bid>>,
    bid_reply: Reply,
    join_reply: Reply,
    fail_auction_fetch: bool,
    fail_bid_fetch: bool,
    fail_loads_after_accept: bool,
    latency: Option<Duration>,
    calls: Vec<ApiCall>,
    next_bid_id: u64,
}

pub struct MockAuctionApi {
    state: Mutex<MockState>,
    bidder: Bidder,
}

impl Default for MockAuctionApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuctionApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            bidder: Bidder {
                id: "user_self".to_string(),
                name: Some("أنا".to_string()),
            },
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    pub fn with_auction(self, auction: Auction) -> Self {
        self.state().auctions.insert(auction.id.clone(), auction);
        self
    }

    pub fn with_bids(self, auction_id: &str, bids: Vec<Bid>) -> Self {
        self.state().bids.insert(auction_id.to_string(), bids);
        self
    }

    /// Every request sleeps this long before answering.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state().latency = Some(latency);
        self
    }

    pub fn set_bid_reply(&self, reply: Reply) {
        self.state().bid_reply = reply;
    }

    pub fn set_join_reply(&self, reply: Reply) {
        self.state().join_reply = reply;
    }

    pub fn fail_auction_fetch(&self, fail: bool) {
        self.state().fail_auction_fetch = fail;
    }

    pub fn fail_bid_fetch(&self, fail: bool) {
        self.state().fail_bid_fetch = fail;
    }

    /// After the next accepted bid every fetch fails.
    pub fn fail_loads_after_accept(&self) {
        self.state().fail_loads_after_accept = true;
    }

    pub fn update_auction(&self, auction_id: &str, update: impl FnOnce(&mut Auction)) {
        if let Some(auction) = self.state().auctions.get_mut(auction_id) {
            update(auction);
        }
    }

    /// Lands a bid from another client directly on the "server".
    pub fn insert_competing_bid(&self, auction_id: &str, amount: i64, bidder_name: &str) {
        let bidder = Bidder {
            id: format!("user_{}", bidder_name),
            name: Some(bidder_name.to_string()),
        };
        Self::record_bid(&mut self.state(), auction_id, amount, bidder);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    pub fn place_bid_calls(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, ApiCall::PlaceBid { .. }))
            .count()
    }

    fn record_bid(state: &mut MockState, auction_id: &str, amount: i64, bidder: Bidder) {
        state.next_bid_id += 1;
        let bid = Bid {
            id: format!("bid_{}", state.next_bid_id),
            amount,
            bidder,
            created_at: Utc::now(),
        };
        state
            .bids
            .entry(auction_id.to_string())
            .or_default()
            .insert(0, bid);
        if let Some(auction) = state.auctions.get_mut(auction_id) {
            auction.current_bid = Some(amount);
            auction.bids_count = Some(auction.bids_count.unwrap_or(0) + 1);
        }
    }

    async fn enter(&self, call: ApiCall) {
        let latency = {
            let mut state = self.state();
            state.calls.push(call);
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: message.to_string(),
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: "المزاد غير موجود".to_string(),
    }
}

#[async_trait]
impl AuctionApi for MockAuctionApi {
    async fn fetch_auction(&self, auction_id: &str) -> ApiResult<Auction> {
        self.enter(ApiCall::FetchAuction(auction_id.to_string())).await;
        let state = self.state();
        if state.fail_auction_fetch {
            return Err(server_error("حدث خطأ أثناء جلب المزاد"));
        }
        state.auctions.get(auction_id).cloned().ok_or_else(not_found)
    }

    async fn fetch_bids(&self, auction_id: &str) -> ApiResult<Vec<Bid>> {
        self.enter(ApiCall::FetchBids(auction_id.to_string())).await;
        let state = self.state();
        if state.fail_bid_fetch {
            return Err(server_error("حدث خطأ أثناء جلب المزايدات"));
        }
        Ok(state.bids.get(auction_id).cloned().unwrap_or_default())
    }

    async fn place_bid(&self, auction_id: &str, amount: i64) -> ApiResult<RemoteOutcome> {
        self.enter(ApiCall::PlaceBid {
            auction_id: auction_id.to_string(),
            amount,
        })
        .await;
        let mut state = self.state();
        match state.bid_reply.clone() {
            Reply::Fail => Err(server_error("connection reset")),
            Reply::Reject(reason) => Ok(RemoteOutcome::Rejected { reason }),
            Reply::Accept => {
                let Some(current) = state.auctions.get(auction_id).map(Auction::effective_current_bid)
                else {
                    return Err(not_found());
                };
                if amount <= current {
                    return Ok(RemoteOutcome::Rejected {
                        reason: format!("الحد الأدنى للمزايدة هو {}", current + 1),
                    });
                }
                Self::record_bid(&mut state, auction_id, amount, self.bidder.clone());
                if state.fail_loads_after_accept {
                    state.fail_auction_fetch = true;
                    state.fail_bid_fetch = true;
                }
                Ok(RemoteOutcome::Accepted {
                    message: Some("تم تقديم مزايدتك بنجاح".to_string()),
                })
            }
        }
    }

    async fn join_auction(&self, auction_id: &str) -> ApiResult<RemoteOutcome> {
        self.enter(ApiCall::Join(auction_id.to_string())).await;
        match self.state().join_reply.clone() {
            Reply::Fail => Err(server_error("connection reset")),
            Reply::Reject(reason) => Ok(RemoteOutcome::Rejected { reason }),
            Reply::Accept => Ok(RemoteOutcome::Accepted {
                message: Some("Joined auction".to_string()),
            }),
        }
    }
}

// endregion: --- Mock Auction Api
