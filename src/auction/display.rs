/// Display-only derivations: nothing here is stored.
// region:    --- Imports
use chrono::{DateTime, Utc};

// endregion: --- Imports

// region:    --- Formatting

/// Local currency suffix (Syrian pound)
pub const CURRENCY_SUFFIX: &str = "ل.س";

/// Fixed exchange rate used for the approximate USD hint.
pub const SYP_PER_USD: i64 = 14_500;

/// Groups digits in threes: `1500000` -> `1,500,000`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_price(amount: i64) -> String {
    format!("{} {}", format_amount(amount), CURRENCY_SUFFIX)
}

/// Rounded USD equivalent of a local-currency amount.
pub fn approx_usd(amount: i64) -> i64 {
    (amount as f64 / SYP_PER_USD as f64).round() as i64
}

/// Button label for a quick-bid preset: `500000` -> `+500K`.
pub fn preset_label(preset: i64) -> String {
    format!("+{}K", preset / 1000)
}

/// Relative age of a bid: seconds, then minutes, then hours.
pub fn format_time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if seconds < 60 {
        "منذ ثوانٍ".to_string()
    } else if minutes < 60 {
        format!("منذ {} دقيقة", minutes)
    } else {
        format!("منذ {} ساعة", hours)
    }
}

// endregion: --- Formatting

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn groups_amounts() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(1_500_000), "1,500,000");
        assert_eq!(format_amount(-25_000), "-25,000");
        assert_eq!(format_price(100_000), "100,000 ل.س");
    }

    #[test]
    fn approximates_usd() {
        assert_eq!(approx_usd(1_000_000), 69);
        assert_eq!(approx_usd(14_500), 1);
        assert_eq!(approx_usd(0), 0);
    }

    #[test]
    fn labels_presets() {
        assert_eq!(preset_label(100_000), "+100K");
        assert_eq!(preset_label(5_000_000), "+5000K");
    }

    #[test]
    fn relative_time_thresholds() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago(now - Duration::seconds(59), now), "منذ ثوانٍ");
        assert_eq!(format_time_ago(now - Duration::seconds(60), now), "منذ 1 دقيقة");
        assert_eq!(format_time_ago(now - Duration::minutes(59), now), "منذ 59 دقيقة");
        assert_eq!(format_time_ago(now - Duration::minutes(60), now), "منذ 1 ساعة");
        assert_eq!(format_time_ago(now - Duration::hours(27), now), "منذ 27 ساعة");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago(now + Duration::seconds(5), now), "منذ ثوانٍ");
    }
}
