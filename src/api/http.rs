// region:    --- Imports
use super::{AuctionApi, RemoteOutcome};
use crate::auction::{Auction, Bid};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

// endregion: --- Imports

/// Bids per page the marketplace returns by default
pub const BID_LIST_LIMIT: u32 = 20;

// region:    --- Response Envelopes

#[derive(Deserialize)]
struct AuctionEnvelope {
    auction: Auction,
}

#[derive(Deserialize)]
struct BidListEnvelope {
    #[serde(default)]
    bids: Vec<Bid>,
}

// endregion: --- Response Envelopes

// region:    --- Http Auction Api

/// `AuctionApi` over the marketplace's `/api/auctions` endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuctionApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpAuctionApi {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ApiResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// `{base}/api/auctions/{auction_id}[/{action}]`, with the id encoded as a
    /// single path segment.
    fn url(&self, auction_id: &str, action: Option<&str>) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "auctions", auction_id])
            .extend(action);
        Ok(url)
    }

    /// Sends the request and reads the body as JSON. Error responses with a
    /// non-JSON body (proxy pages and the like) come back as `Value::Null`.
    async fn send(&self, request: RequestBuilder) -> ApiResult<(StatusCode, Value)> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if text.trim().is_empty() {
            return Ok((status, Value::Null));
        }
        match serde_json::from_str(&text) {
            Ok(body) => Ok((status, body)),
            Err(_) if !status.is_success() => Ok((status, Value::Null)),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }
}

fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn expect_success<T: DeserializeOwned>(status: StatusCode, body: Value) -> ApiResult<T> {
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: server_message(&body).unwrap_or_default(),
        });
    }
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Any reply the server produced is a verdict; only transport failures are errors.
fn outcome_from(status: StatusCode, body: &Value) -> RemoteOutcome {
    let succeeded =
        status.is_success() && body.get("success").and_then(Value::as_bool).unwrap_or(true);
    if succeeded {
        RemoteOutcome::Accepted {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    } else {
        RemoteOutcome::Rejected {
            reason: server_message(body).unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        }
    }
}

#[async_trait]
impl AuctionApi for HttpAuctionApi {
    async fn fetch_auction(&self, auction_id: &str) -> ApiResult<Auction> {
        let url = self.url(auction_id, None)?;
        debug!("{:<12} --> GET {}", "Api", url);
        let (status, body) = self.send(self.client.get(url)).await?;
        let envelope: AuctionEnvelope = expect_success(status, body)?;
        Ok(envelope.auction)
    }

    async fn fetch_bids(&self, auction_id: &str) -> ApiResult<Vec<Bid>> {
        let mut url = self.url(auction_id, Some("bid"))?;
        url.query_pairs_mut()
            .append_pair("limit", &BID_LIST_LIMIT.to_string());
        debug!("{:<12} --> GET {}", "Api", url);
        let (status, body) = self.send(self.client.get(url)).await?;
        let envelope: BidListEnvelope = expect_success(status, body)?;
        Ok(envelope.bids)
    }

    async fn place_bid(&self, auction_id: &str, amount: i64) -> ApiResult<RemoteOutcome> {
        let url = self.url(auction_id, Some("bid"))?;
        debug!("{:<12} --> POST {} amount={}", "Api", url, amount);
        let request = self.client.post(url).json(&json!({ "amount": amount }));
        let (status, body) = self.send(request).await?;
        Ok(outcome_from(status, &body))
    }

    async fn join_auction(&self, auction_id: &str) -> ApiResult<RemoteOutcome> {
        let url = self.url(auction_id, Some("join"))?;
        debug!("{:<12} --> POST {}", "Api", url);
        let (status, body) = self.send(self.client.post(url)).await?;
        Ok(outcome_from(status, &body))
    }
}

// endregion: --- Http Auction Api

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_reply_is_accepted() {
        let body = json!({ "success": true, "message": "تم تقديم المزايدة بنجاح" });
        assert_eq!(
            outcome_from(StatusCode::OK, &body),
            RemoteOutcome::Accepted {
                message: Some("تم تقديم المزايدة بنجاح".to_string())
            }
        );
    }

    #[test]
    fn error_reply_carries_server_reason() {
        let body = json!({ "error": "انتهى وقت المزاد" });
        assert_eq!(
            outcome_from(StatusCode::BAD_REQUEST, &body),
            RemoteOutcome::Rejected {
                reason: "انتهى وقت المزاد".to_string()
            }
        );
    }

    #[test]
    fn human_message_wins_over_error_code() {
        let body = json!({ "error": "DEPOSIT_REQUIRED", "message": "رصيد المحفظة غير كافٍ" });
        assert_eq!(server_message(&body).as_deref(), Some("رصيد المحفظة غير كافٍ"));
    }

    #[test]
    fn explicit_failure_flag_is_rejected() {
        let body = json!({ "success": false });
        assert_eq!(
            outcome_from(StatusCode::OK, &body),
            RemoteOutcome::Rejected {
                reason: "HTTP 200".to_string()
            }
        );
    }

    #[test]
    fn status_error_keeps_server_message() {
        let result: ApiResult<Value> =
            expect_success(StatusCode::NOT_FOUND, json!({ "error": "المزاد غير موجود" }));
        match result {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "المزاد غير موجود");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    fn local_api(base_url: &str) -> HttpAuctionApi {
        HttpAuctionApi::new(base_url, None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = local_api("http://localhost:3000/");
        assert_eq!(
            api.url("a1", Some("bid")).unwrap().as_str(),
            "http://localhost:3000/api/auctions/a1/bid"
        );
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let api = local_api("http://localhost:3000/market");
        assert_eq!(
            api.url("a1", None).unwrap().as_str(),
            "http://localhost:3000/market/api/auctions/a1"
        );
    }

    #[test]
    fn auction_id_is_encoded_as_one_segment() {
        let api = local_api("http://localhost:3000");
        assert_eq!(
            api.url("a1/join?x=1", Some("bid")).unwrap().as_str(),
            "http://localhost:3000/api/auctions/a1%2Fjoin%3Fx=1/bid"
        );
    }

    #[test]
    fn unusable_base_url_is_rejected() {
        assert!(matches!(
            HttpAuctionApi::new("not a url", None, Duration::from_secs(5)),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            HttpAuctionApi::new("mailto:ops@example.com", None, Duration::from_secs(5)),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }
}
