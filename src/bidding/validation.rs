/// Client-side bid checks, run in order before anything reaches the server.
// region:    --- Imports
use crate::auction::display::format_price;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Bid Rejection

/// Why a bid never left the client. `Display` is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BidRejection {
    #[error("يجب تسجيل الدخول للمزايدة")]
    AuthenticationRequired,

    #[error("يرجى إدخال مبلغ صحيح")]
    InvalidAmount,

    #[error("يجب أن تكون المزايدة أعلى من {}", format_price(*.0))]
    MustExceedCurrentBid(i64),
}

// endregion: --- Bid Rejection

// region:    --- Validation

/// Returns the parsed amount when the bid may be sent.
pub fn validate_bid(
    authenticated: bool,
    pending_amount: &str,
    effective_current_bid: i64,
) -> Result<i64, BidRejection> {
    if !authenticated {
        return Err(BidRejection::AuthenticationRequired);
    }

    let amount = pending_amount
        .trim()
        .parse::<i64>()
        .map_err(|_| BidRejection::InvalidAmount)?;

    if amount <= effective_current_bid {
        return Err(BidRejection::MustExceedCurrentBid(effective_current_bid));
    }

    Ok(amount)
}

/// Keeps only ASCII digits, the way the bid input field filters keystrokes.
pub fn sanitize_amount_input(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

// endregion: --- Validation
