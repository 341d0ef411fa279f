//! Google Translate web endpoint

use crate::error::{ClientError, ClientResult};
use serde_json::Value;

pub const TRANSLATE_URL: &str = "https://translate.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Detected source language
    pub src: String,
    pub dest: String,
    pub text: String,
}

#[derive(Clone)]
pub struct Translator {
    client: reqwest::Client,
    base_url: String,
}

impl Translator {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, TRANSLATE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Translate `text` into `dest`, auto-detecting the source language
    pub async fn translate(&self, text: &str, dest: &str) -> ClientResult<Translation> {
        if text.trim().is_empty() {
            return Err(ClientError::InvalidInput("nothing to translate".into()));
        }
        if dest.trim().is_empty() {
            return Err(ClientError::InvalidInput("missing target language".into()));
        }

        tracing::debug!("Translating {} chars to {}", text.len(), dest);

        // The text goes in the form body, long messages overflow a query string
        let body: Value = self
            .client
            .post(format!("{}/translate_a/single", self.base_url))
            .query(&[("client", "gtx"), ("sl", "auto"), ("tl", dest), ("dt", "t")])
            .form(&[("q", text)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(&body, dest)
    }
}

fn parse_response(body: &Value, dest: &str) -> ClientResult<Translation> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::UnexpectedResponse("missing translation segments".into()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let src = body
        .get(2)
        .and_then(Value::as_str)
        .unwrap_or("auto")
        .to_string();

    Ok(Translation {
        src,
        dest: dest.to_string(),
        text,
    })
}
