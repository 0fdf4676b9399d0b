/// Countdown ticker
/// One repeating task per viewed auction. It owns nothing but a weak
/// reference to its target, and stops on cancellation, on the target's
/// request, or once the target is gone.
// region:    --- Imports
use async_trait::async_trait;
use std::sync::Weak;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

// endregion: --- Imports

// region:    --- Tick Target

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

#[async_trait]
pub trait Tick: Send + Sync + 'static {
    /// Called once per period with the generation the ticker was started for.
    async fn tick(&self, generation: u64) -> TickFlow;
}

// endregion: --- Tick Target

// region:    --- Countdown Ticker

pub struct CountdownTicker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Starts ticking one `period` from now.
    pub fn start<T: Tick>(
        target: Weak<T>,
        generation: u64,
        period: Duration,
        token: CancellationToken,
    ) -> Self {
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => {
                        debug!("{:<12} --> ticker {} cancelled", "Scheduler", generation);
                        break;
                    }
                    _ = interval.tick() => {
                        let Some(target) = target.upgrade() else {
                            break;
                        };
                        if target.tick(generation).await == TickFlow::Stop {
                            debug!("{:<12} --> ticker {} finished", "Scheduler", generation);
                            break;
                        }
                    }
                }
            }
        });
        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// endregion: --- Countdown Ticker
