/// Countdown state derived from an auction's deadline
// region:    --- Imports
use std::fmt;
use chrono::{DateTime, Utc};
use super::model::{Auction, AuctionStatus};

// endregion: --- Imports

// region:    --- Countdown

/// Whole hours, minutes and seconds left until an auction closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub const ZERO: Remaining = Remaining {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Splits a positive millisecond difference, truncating partial seconds.
    /// Hours are not wrapped into days.
    pub fn from_millis(millis: i64) -> Self {
        if millis <= 0 {
            return Self::ZERO;
        }
        let total_seconds = millis / 1000;
        Self {
            hours: total_seconds / 3600,
            minutes: (total_seconds % 3600) / 60,
            seconds: total_seconds % 60,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    /// No deadline known yet, or the auction has not opened.
    NotStarted,
    Running,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub phase: CountdownPhase,
    pub remaining: Remaining,
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::not_started()
    }
}

impl CountdownState {
    pub fn not_started() -> Self {
        Self {
            phase: CountdownPhase::NotStarted,
            remaining: Remaining::ZERO,
        }
    }

    pub fn expired() -> Self {
        Self {
            phase: CountdownPhase::Expired,
            remaining: Remaining::ZERO,
        }
    }

    /// Running while the deadline lies in the future, expired the moment it doesn't.
    pub fn at(ends_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let millis = (ends_at - now).num_milliseconds();
        if millis <= 0 {
            return Self::expired();
        }
        Self {
            phase: CountdownPhase::Running,
            remaining: Remaining::from_millis(millis),
        }
    }

    pub fn for_auction(auction: &Auction, now: DateTime<Utc>) -> Self {
        match auction.status {
            AuctionStatus::Live => match auction.ends_at {
                Some(ends_at) => Self::at(ends_at, now),
                None => Self::not_started(),
            },
            AuctionStatus::Scheduled => Self::not_started(),
            AuctionStatus::Ended => Self::expired(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == CountdownPhase::Running
    }
}

// endregion: --- Countdown

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn splits_remaining_time() {
        let ends_at = base() + Duration::seconds(2 * 3600 + 5 * 60 + 9) + Duration::milliseconds(750);
        let state = CountdownState::at(ends_at, base());
        assert_eq!(state.phase, CountdownPhase::Running);
        assert_eq!(
            state.remaining,
            Remaining {
                hours: 2,
                minutes: 5,
                seconds: 9
            }
        );
        assert_eq!(state.remaining.to_string(), "02:05:09");
    }

    #[test]
    fn hours_are_not_wrapped_into_days() {
        let state = CountdownState::at(base() + Duration::hours(30), base());
        assert_eq!(state.remaining.to_string(), "30:00:00");
    }

    #[test]
    fn deadline_reached_is_expired() {
        assert_eq!(CountdownState::at(base(), base()), CountdownState::expired());
        assert_eq!(
            CountdownState::at(base() - Duration::minutes(3), base()),
            CountdownState::expired()
        );
        assert_eq!(CountdownState::expired().remaining.to_string(), "00:00:00");
    }

    #[test]
    fn sub_second_remainder_is_still_running() {
        let state = CountdownState::at(base() + Duration::milliseconds(400), base());
        assert!(state.is_running());
        assert!(state.remaining.is_zero());
    }

    #[test]
    fn phase_follows_auction_status() {
        let mut auction = Auction {
            id: "a".into(),
            title: String::new(),
            status: AuctionStatus::Scheduled,
            starting_bid: 1,
            current_bid: None,
            buy_now_price: None,
            ends_at: Some(base() + Duration::minutes(1)),
            category: String::new(),
            weight: 0.0,
            weight_unit: String::new(),
            location: String::new(),
            bids_count: None,
        };
        assert_eq!(
            CountdownState::for_auction(&auction, base()).phase,
            CountdownPhase::NotStarted
        );

        auction.status = AuctionStatus::Live;
        assert!(CountdownState::for_auction(&auction, base()).is_running());

        auction.ends_at = None;
        assert_eq!(
            CountdownState::for_auction(&auction, base()).phase,
            CountdownPhase::NotStarted
        );

        auction.status = AuctionStatus::Ended;
        assert_eq!(
            CountdownState::for_auction(&auction, base()),
            CountdownState::expired()
        );
    }
}
