use async_trait::async_trait;
use serde::Deserialize;

use crate::external::quote_provider::{QuoteError, QuoteProvider};

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn from_env() -> Result<Self, QuoteError> {
        let api_key = std::env::var("ALPHAVANTAGE_API_KEY")
            .map_err(|_| QuoteError::BadResponse("ALPHAVANTAGE_API_KEY not set".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AvQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<AvQuote>,

    // When rate-limited Alpha Vantage returns:
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    // When invalid:
    // { "Error Message": "Invalid API call. ..." }
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvQuote {
    #[serde(rename = "05. price")]
    price: String,
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, QuoteError> {
        let url = "https://www.alphavantage.co/query";

        let resp = self
            .client
            .get(url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        let body = resp
            .json::<AvQuoteResponse>()
            .await
            .map_err(|e| QuoteError::Parse(e.to_string()))?;

        if body.note.is_some() {
            // This is the throttle response
            return Err(QuoteError::RateLimited);
        }

        if let Some(msg) = body.error_message {
            return Err(QuoteError::BadResponse(msg));
        }

        let quote = body
            .global_quote
            .ok_or_else(|| QuoteError::BadResponse(format!("no quote for {symbol}")))?;

        quote
            .price
            .parse::<f64>()
            .map_err(|e| QuoteError::Parse(e.to_string()))
    }
}
