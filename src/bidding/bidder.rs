/// Live auction view: countdown plus bid submission.
/// 1. Load (auction record, then bid list)
/// 2. Countdown ticks
/// 3. Quick-bid presets
/// 4. Bid submission followed by a full resync
// region:    --- Imports
use crate::api::{AuctionApi, RemoteOutcome};
use crate::auction::{Auction, AuctionStatus, Bid, CountdownState};
use crate::bidding::validation::{sanitize_amount_input, validate_bid, BidRejection};
use crate::clock::Clock;
use crate::config::BidderSettings;
use crate::scheduler::{CountdownTicker, Tick, TickFlow};
use crate::services::{AuthProvider, NotificationSink, Severity};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Messages

pub const BID_PLACED_MESSAGE: &str = "تم تقديم المزايدة بنجاح!";
pub const BID_FAILED_MESSAGE: &str = "فشل تقديم المزايدة";
pub const JOIN_LOGIN_REQUIRED_MESSAGE: &str = "يجب تسجيل الدخول للمشاركة";
pub const JOINED_MESSAGE: &str = "تم الانضمام للمزاد";
pub const JOIN_FAILED_MESSAGE: &str = "فشل الانضمام للمزاد";

// endregion: --- Messages

// region:    --- View Model

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Last load did not complete; data from an earlier load is kept.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to bid on, bidding closed, or a submission already in flight.
    Ignored,
    Rejected(BidRejection),
    Accepted { amount: i64 },
    Failed { reason: String },
}

/// What the bid controls at the bottom of the view should offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidPanel {
    Hidden,
    LoginPrompt,
    Open {
        presets: Vec<i64>,
        submit_enabled: bool,
    },
}

/// Point-in-time copy of everything the view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct BidderView {
    pub auction_id: Option<String>,
    pub load_status: LoadStatus,
    pub auction: Option<Auction>,
    pub bids: Vec<Bid>,
    pub pending_amount: String,
    pub in_flight: bool,
    pub countdown: CountdownState,
    pub timer_active: bool,
    pub authenticated: bool,
    pub quick_bid_presets: Vec<i64>,
}

impl BidderView {
    pub fn effective_current_bid(&self) -> Option<i64> {
        self.auction.as_ref().map(Auction::effective_current_bid)
    }

    /// Most recent bid, i.e. the one currently winning.
    pub fn leading_bid(&self) -> Option<&Bid> {
        self.bids.first()
    }

    pub fn bid_panel(&self) -> BidPanel {
        let Some(auction) = &self.auction else {
            return BidPanel::Hidden;
        };
        match auction.status {
            AuctionStatus::Live if !self.authenticated => BidPanel::LoginPrompt,
            AuctionStatus::Live => BidPanel::Open {
                presets: self.quick_bid_presets.clone(),
                submit_enabled: !self.in_flight && !self.pending_amount.is_empty(),
            },
            AuctionStatus::Scheduled | AuctionStatus::Ended => BidPanel::Hidden,
        }
    }
}

// endregion: --- View Model

// region:    --- View State

#[derive(Default)]
struct ViewState {
    generation: u64,
    auction_id: Option<String>,
    load_status: LoadStatus,
    auction: Option<Auction>,
    bids: Vec<Bid>,
    pending_amount: String,
    in_flight: bool,
    countdown: CountdownState,
    deadline: Option<DateTime<Utc>>,
    ticker: Option<CountdownTicker>,
}

impl ViewState {
    /// Starts a new generation; the old ticker is cancelled when dropped here.
    fn begin(&mut self, auction_id: Option<String>) -> u64 {
        let generation = self.generation + 1;
        *self = ViewState {
            generation,
            auction_id,
            ..ViewState::default()
        };
        generation
    }
}

// endregion: --- View State

// region:    --- Inner

struct Inner {
    api: Arc<dyn AuctionApi>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    settings: BidderSettings,
    shutdown: CancellationToken,
    state: Mutex<ViewState>,
}

impl Inner {
    /// Runs `f` only while `generation` is still the one being viewed.
    async fn with_current<R>(
        &self,
        generation: u64,
        f: impl FnOnce(&mut ViewState) -> R,
    ) -> Option<R> {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(
                "{:<12} --> dropping result for stale view {}",
                "Bidder", generation
            );
            return None;
        }
        Some(f(&mut *state))
    }

    async fn is_current(&self, generation: u64) -> bool {
        self.state.lock().await.generation == generation
    }

    async fn current_view(&self) -> Option<(u64, String)> {
        let state = self.state.lock().await;
        state
            .auction_id
            .clone()
            .map(|auction_id| (state.generation, auction_id))
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifier.add_toast(message, severity);
    }

    /// Fetches the auction record, then its bids. Failures only mark the load
    /// as failed; whatever was loaded before stays on screen.
    async fn load(self: &Arc<Self>, generation: u64, auction_id: &str) {
        if self
            .with_current(generation, |state| state.load_status = LoadStatus::Loading)
            .await
            .is_none()
        {
            return;
        }
        let mut failed = false;

        match self.api.fetch_auction(auction_id).await {
            Ok(auction) => {
                let target = Arc::downgrade(self);
                let applied = self
                    .with_current(generation, |state| {
                        self.apply_auction(state, auction, target)
                    })
                    .await;
                if applied.is_none() {
                    return;
                }
            }
            Err(e) => {
                warn!(
                    "{:<12} --> failed to load auction {}: {}",
                    "Bidder", auction_id, e
                );
                failed = true;
            }
        }

        match self.api.fetch_bids(auction_id).await {
            Ok(bids) => {
                if self
                    .with_current(generation, |state| state.bids = bids)
                    .await
                    .is_none()
                {
                    return;
                }
            }
            Err(e) => {
                warn!(
                    "{:<12} --> failed to load bids for {}: {}",
                    "Bidder", auction_id, e
                );
                failed = true;
            }
        }

        let status = if failed {
            LoadStatus::Failed
        } else {
            LoadStatus::Loaded
        };
        self.with_current(generation, |state| state.load_status = status)
            .await;
        debug!(
            "{:<12} --> auction {} load finished: {:?}",
            "Bidder", auction_id, status
        );
    }

    fn apply_auction(&self, state: &mut ViewState, auction: Auction, target: Weak<Inner>) {
        state.pending_amount = match auction.current_bid {
            Some(current_bid) => current_bid.to_string(),
            None => auction
                .starting_bid
                .saturating_add(self.settings.bid_increment)
                .to_string(),
        };

        state.countdown = CountdownState::for_auction(&auction, self.clock.now());
        if state.countdown.is_running() {
            let keep_ticker = state.deadline == auction.ends_at
                && state.ticker.as_ref().is_some_and(CountdownTicker::is_active);
            if !keep_ticker {
                state.deadline = auction.ends_at;
                state.ticker = Some(CountdownTicker::start(
                    target,
                    state.generation,
                    self.settings.tick_interval,
                    self.shutdown.child_token(),
                ));
                debug!(
                    "{:<12} --> countdown started for {} until {:?}",
                    "Bidder", auction.id, auction.ends_at
                );
            }
        } else {
            state.deadline = None;
            state.ticker = None;
        }

        state.auction = Some(auction);
    }
}

#[async_trait]
impl Tick for Inner {
    async fn tick(&self, generation: u64) -> TickFlow {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            return TickFlow::Stop;
        }
        let Some(deadline) = state.deadline else {
            return TickFlow::Stop;
        };

        state.countdown = CountdownState::at(deadline, self.clock.now());
        if state.countdown.is_running() {
            return TickFlow::Continue;
        }

        info!(
            "{:<12} --> auction {:?} countdown expired",
            "Bidder", state.auction_id
        );
        state.ticker = None;
        TickFlow::Stop
    }
}

// endregion: --- Inner

// region:    --- In-Flight Guard

/// Clears the in-flight flag even when the submitting future is dropped
/// before it completes.
struct InFlightGuard {
    inner: Weak<Inner>,
    generation: u64,
    armed: bool,
}

impl InFlightGuard {
    fn new(inner: &Arc<Inner>, generation: u64) -> Self {
        Self {
            inner: Arc::downgrade(inner),
            generation,
            armed: true,
        }
    }

    async fn release(mut self) {
        self.armed = false;
        if let Some(inner) = self.inner.upgrade() {
            inner
                .with_current(self.generation, |state| state.in_flight = false)
                .await;
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let (Some(inner), Ok(runtime)) = (
            self.inner.upgrade(),
            tokio::runtime::Handle::try_current(),
        ) else {
            return;
        };
        let generation = self.generation;
        runtime.spawn(async move {
            inner
                .with_current(generation, |state| state.in_flight = false)
                .await;
        });
    }
}

// endregion: --- In-Flight Guard

// region:    --- Auction Countdown Bidder

/// Tracks one live auction at a time. The server decides which bid wins;
/// after every accepted bid the whole view is reloaded from it.
pub struct AuctionCountdownBidder {
    inner: Arc<Inner>,
}

impl AuctionCountdownBidder {
    pub fn new(
        api: Arc<dyn AuctionApi>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        settings: BidderSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                auth,
                notifier,
                clock,
                settings,
                shutdown: CancellationToken::new(),
                state: Mutex::new(ViewState::default()),
            }),
        }
    }

    /// Starts viewing `auction_id`, dropping whatever was viewed before.
    pub async fn view(&self, auction_id: &str) {
        let generation = self
            .inner
            .state
            .lock()
            .await
            .begin(Some(auction_id.to_string()));
        info!("{:<12} --> viewing auction {}", "Bidder", auction_id);
        self.inner.load(generation, auction_id).await;
    }

    /// Cancels the countdown; responses still in the air are discarded.
    pub async fn stop_viewing(&self) {
        let mut state = self.inner.state.lock().await;
        if let Some(auction_id) = &state.auction_id {
            info!("{:<12} --> stopped viewing auction {}", "Bidder", auction_id);
        }
        state.begin(None);
    }

    /// Manual reload of the current auction and its bids.
    pub async fn refresh(&self) {
        if let Some((generation, auction_id)) = self.inner.current_view().await {
            self.inner.load(generation, &auction_id).await;
        }
    }

    /// Recomputes the countdown now. The ticker calls this once per interval.
    pub async fn tick(&self) -> TickFlow {
        let generation = self.inner.state.lock().await.generation;
        self.inner.tick(generation).await
    }

    /// Replaces the pending amount, keeping digits only.
    pub async fn set_pending_amount(&self, input: &str) {
        self.inner.state.lock().await.pending_amount = sanitize_amount_input(input);
    }

    /// Pre-fills `effective current bid + preset` without submitting.
    pub async fn quick_bid(&self, preset: i64) -> Option<i64> {
        if preset <= 0 {
            return None;
        }
        let mut state = self.inner.state.lock().await;
        if state.in_flight {
            return None;
        }
        let amount = state
            .auction
            .as_ref()?
            .effective_current_bid()
            .checked_add(preset)?;
        state.pending_amount = amount.to_string();
        Some(amount)
    }

    pub async fn submit_bid(&self) -> SubmitOutcome {
        let inner = &self.inner;

        let checked = {
            let mut state = inner.state.lock().await;
            let (Some(auction_id), Some(auction)) = (state.auction_id.clone(), state.auction.as_ref())
            else {
                return SubmitOutcome::Ignored;
            };
            if state.in_flight || !auction.is_live() {
                return SubmitOutcome::Ignored;
            }
            let current_bid = auction.effective_current_bid();
            match validate_bid(
                inner.auth.is_authenticated(),
                &state.pending_amount,
                current_bid,
            ) {
                Ok(amount) => {
                    state.in_flight = true;
                    Ok((state.generation, auction_id, amount))
                }
                Err(rejection) => Err(rejection),
            }
        };

        let (generation, auction_id, amount) = match checked {
            Ok(checked) => checked,
            Err(rejection) => {
                info!("{:<12} --> bid rejected locally: {:?}", "Bidder", rejection);
                inner.notify(&rejection.to_string(), Severity::Error);
                return SubmitOutcome::Rejected(rejection);
            }
        };

        let guard = InFlightGuard::new(inner, generation);
        info!(
            "{:<12} --> submitting bid {} on auction {}",
            "Bidder", amount, auction_id
        );

        let outcome = match inner.api.place_bid(&auction_id, amount).await {
            Ok(RemoteOutcome::Accepted { message }) => {
                debug!("{:<12} --> bid accepted: {:?}", "Bidder", message);
                if inner.is_current(generation).await {
                    inner.notify(BID_PLACED_MESSAGE, Severity::Success);
                    inner.load(generation, &auction_id).await;
                }
                SubmitOutcome::Accepted { amount }
            }
            Ok(RemoteOutcome::Rejected { reason }) => {
                warn!("{:<12} --> bid rejected by server: {}", "Bidder", reason);
                if inner.is_current(generation).await {
                    inner.notify(&reason, Severity::Error);
                }
                SubmitOutcome::Failed { reason }
            }
            Err(e) => {
                warn!("{:<12} --> bid request failed: {}", "Bidder", e);
                let reason = e
                    .server_message()
                    .unwrap_or(BID_FAILED_MESSAGE)
                    .to_string();
                if inner.is_current(generation).await {
                    inner.notify(&reason, Severity::Error);
                }
                SubmitOutcome::Failed { reason }
            }
        };

        guard.release().await;
        outcome
    }

    /// Registers the user as a participant of the viewed auction.
    pub async fn join(&self) -> bool {
        let inner = &self.inner;
        let Some((generation, auction_id)) = inner.current_view().await else {
            return false;
        };
        if !inner.auth.is_authenticated() {
            inner.notify(JOIN_LOGIN_REQUIRED_MESSAGE, Severity::Error);
            return false;
        }

        let (joined, message) = match inner.api.join_auction(&auction_id).await {
            Ok(RemoteOutcome::Accepted { message }) => (
                true,
                message.unwrap_or_else(|| JOINED_MESSAGE.to_string()),
            ),
            Ok(RemoteOutcome::Rejected { reason }) => (false, reason),
            Err(e) => {
                warn!("{:<12} --> join request failed: {}", "Bidder", e);
                (false, JOIN_FAILED_MESSAGE.to_string())
            }
        };

        if inner.is_current(generation).await {
            let severity = if joined {
                Severity::Success
            } else {
                Severity::Error
            };
            inner.notify(&message, severity);
        }
        joined
    }

    pub async fn snapshot(&self) -> BidderView {
        let state = self.inner.state.lock().await;
        BidderView {
            auction_id: state.auction_id.clone(),
            load_status: state.load_status,
            auction: state.auction.clone(),
            bids: state.bids.clone(),
            pending_amount: state.pending_amount.clone(),
            in_flight: state.in_flight,
            countdown: state.countdown,
            timer_active: state
                .ticker
                .as_ref()
                .is_some_and(CountdownTicker::is_active),
            authenticated: self.inner.auth.is_authenticated(),
            quick_bid_presets: self.inner.settings.quick_bid_presets.clone(),
        }
    }
}

impl Drop for AuctionCountdownBidder {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}

// endregion: --- Auction Countdown Bidder
