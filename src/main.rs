// region:    --- Imports
use anyhow::Result;
use auction_bidder::auction::display::{
    approx_usd, format_price, format_time_ago, preset_label,
};
use auction_bidder::{
    AuctionCountdownBidder, BidPanel, BidderView, Clock, Config, CountdownPhase, HttpAuctionApi,
    StaticAuth, SystemClock, TracingNotifier,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands

#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Submit the pending amount, optionally replacing it first.
    Bid(Option<String>),
    Quick(i64),
    Join,
    Refresh,
    Show,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let command = match parts.next()? {
        "bid" | "b" => Command::Bid(parts.next().map(str::to_string)),
        "quick" | "q" => Command::Quick(parts.next()?.parse().ok()?),
        "join" => Command::Join,
        "refresh" | "r" => Command::Refresh,
        "show" | "s" => Command::Show,
        "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

// endregion: --- Commands

// region:    --- Rendering

fn render(view: &BidderView, clock: &dyn Clock) {
    let Some(auction) = &view.auction else {
        info!("{:<12} --> auction not loaded ({:?})", "View", view.load_status);
        return;
    };
    let current_bid = auction.effective_current_bid();
    info!(
        "{:<12} --> {} [{:?}] {} {} {}",
        "View", auction.title, auction.status, auction.weight, auction.weight_unit, auction.location
    );
    info!(
        "{:<12} --> current bid {} (~${} USD), starting {}",
        "View",
        format_price(current_bid),
        approx_usd(current_bid),
        format_price(auction.starting_bid)
    );
    if let Some(buy_now_price) = auction.buy_now_price {
        info!("{:<12} --> buy now {}", "View", format_price(buy_now_price));
    }
    if auction.is_live() {
        info!("{:<12} --> time left {}", "View", view.countdown.remaining);
    }

    let now = clock.now();
    info!("{:<12} --> {} bids", "View", view.bids.len());
    for (rank, bid) in view.bids.iter().enumerate() {
        info!(
            "{:<12} --> #{} {} {} {}",
            "View",
            rank + 1,
            bid.bidder.display_name(),
            format_price(bid.amount),
            format_time_ago(bid.created_at, now)
        );
    }

    match view.bid_panel() {
        BidPanel::Hidden => {}
        BidPanel::LoginPrompt => info!("{:<12} --> set AUCTION_TOKEN to take part", "View"),
        BidPanel::Open {
            presets,
            submit_enabled,
        } => {
            let labels: Vec<String> = presets.iter().map(|preset| preset_label(*preset)).collect();
            info!(
                "{:<12} --> pending bid {} | quick {} | submit {}",
                "View",
                view.pending_amount,
                labels.join(" "),
                if submit_enabled { "ready" } else { "locked" }
            );
        }
    }
}

// endregion: --- Rendering

// region:    --- Main
#[tokio::main]
async fn main() -> Result<()> {
    auction_bidder::telemetry::init()?;
    let config = Config::from_env()?;
    info!(
        "{:<12} --> api={} auction={} authenticated={}",
        "Main",
        config.api_url,
        config.auction_id,
        config.token.is_some()
    );

    let api = HttpAuctionApi::new(&config.api_url, config.token.clone(), config.http_timeout)?;
    let clock = Arc::new(SystemClock);
    let bidder = AuctionCountdownBidder::new(
        Arc::new(api),
        Arc::new(StaticAuth::new(config.token.is_some())),
        Arc::new(TracingNotifier),
        clock.clone(),
        config.settings.clone(),
    );

    bidder.view(&config.auction_id).await;
    render(&bidder.snapshot().await, clock.as_ref());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut status = interval(Duration::from_secs(1));
    let mut last_phase = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(command) = parse_command(&line) else {
                    if !line.trim().is_empty() {
                        warn!("{:<12} --> unknown command: {}", "Main", line.trim());
                    }
                    continue;
                };
                match command {
                    Command::Bid(amount) => {
                        if let Some(amount) = amount {
                            bidder.set_pending_amount(&amount).await;
                        }
                        let outcome = bidder.submit_bid().await;
                        info!("{:<12} --> {:?}", "Main", outcome);
                    }
                    Command::Quick(preset) => {
                        if let Some(amount) = bidder.quick_bid(preset).await {
                            info!("{:<12} --> pending bid {}", "Main", format_price(amount));
                        }
                    }
                    Command::Join => {
                        bidder.join().await;
                    }
                    Command::Refresh => bidder.refresh().await,
                    Command::Show => render(&bidder.snapshot().await, clock.as_ref()),
                    Command::Quit => break,
                }
            }
            _ = status.tick() => {
                let view = bidder.snapshot().await;
                let phase = view.countdown.phase;
                if phase == CountdownPhase::Running && view.countdown.remaining.seconds % 10 == 0 {
                    info!("{:<12} --> {}", "Countdown", view.countdown.remaining);
                }
                if phase == CountdownPhase::Expired && last_phase == Some(CountdownPhase::Running) {
                    info!("{:<12} --> auction time is up", "Countdown");
                }
                last_phase = Some(phase);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    bidder.stop_viewing().await;
    info!("{:<12} --> bye", "Main");
    Ok(())
}
// endregion: --- Main

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("bid"), Some(Command::Bid(None)));
        assert_eq!(
            parse_command("bid 1500000"),
            Some(Command::Bid(Some("1500000".to_string())))
        );
        assert_eq!(parse_command("q 500000"), Some(Command::Quick(500_000)));
        assert_eq!(parse_command("  refresh "), Some(Command::Refresh));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn rejects_unknown_or_incomplete_commands() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("quick"), None);
        assert_eq!(parse_command("quick lots"), None);
        assert_eq!(parse_command("dance"), None);
    }
}
