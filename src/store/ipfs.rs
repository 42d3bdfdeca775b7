//! IPFS HTTP RPC transport.
//!
//! # Responsibilities
//! - `block/put` raw blocks hashed with keccak-256
//! - `block/get` raw blocks by CID
//! - Map HTTP failures onto `NotFound` / `Network`

use alloy::primitives::Bytes;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::store::cid::ContentId;
use crate::store::transport::BlobTransport;
use crate::store::{StoreError, StoreResult};

#[derive(Debug, Deserialize)]
struct BlockPutResponse {
    #[serde(rename = "Key")]
    key: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "Message", default)]
    message: String,
}

/// Transport backed by an IPFS node's HTTP RPC API.
#[derive(Debug, Clone)]
pub struct IpfsHttpTransport {
    client: Client,
    api_url: String,
    pin: bool,
}

impl IpfsHttpTransport {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            pin: config.pin,
        })
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/api/v0/{}", self.api_url, command)
    }
}

#[async_trait]
impl BlobTransport for IpfsHttpTransport {
    async fn put(&self, bytes: Bytes) -> StoreResult<ContentId> {
        let form = Form::new().part("file", Part::bytes(bytes.to_vec()));
        let pin = if self.pin { "true" } else { "false" };

        let response = self
            .client
            .post(self.endpoint("block/put"))
            .query(&[
                ("cid-codec", "raw"),
                ("mhtype", "keccak-256"),
                ("mhlen", "32"),
                ("pin", pin),
            ])
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Network(format!("block/put returned {}: {}", status, body)));
        }

        let reply: BlockPutResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Network(format!("Invalid block/put reply: {}", e)))?;

        reply
            .key
            .parse()
            .map_err(|e| StoreError::Network(format!("Store returned unparsable CID '{}': {}", reply.key, e)))
    }

    async fn get(&self, cid: &ContentId) -> StoreResult<Bytes> {
        let response = self
            .client
            .post(self.endpoint("block/get"))
            .query(&[("arg", cid.to_string())])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .bytes()
                .await
                .map(Bytes::from)
                .map_err(|e| StoreError::Network(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        if is_not_found(status, &body) {
            return Err(StoreError::NotFound(cid.digest()));
        }
        Err(StoreError::Network(format!("block/get returned {}: {}", status, body)))
    }
}

/// Kubo reports missing blocks as HTTP 500 with a "not found" message.
fn is_not_found(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    let message = serde_json::from_str::<ApiError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string());
    status == StatusCode::INTERNAL_SERVER_ERROR && message.to_lowercase().contains("not found")
}
