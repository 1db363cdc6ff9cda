// SMS service - fans messages out to the Bizgo send endpoint
use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use serde::Serialize;

use crate::config::BizgoConfig;
use crate::utils::mask_phone;

#[derive(Debug, thiserror::Error)]
pub enum SmsSendError {
    #[error("SMS send request failed: {0}")]
    Request(String),

    #[error("SMS vendor rejected message: {status} - {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SmsSendRequest<'a> {
    phone: &'a str,
    message: &'a str,
    send_time: &'a str,
}

/// Outcome of a fan-out; every attempt is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub success_count: usize,
    pub failed_count: usize,
}

#[derive(Clone)]
pub struct SmsService {
    api_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl SmsService {
    pub fn new(http_client: reqwest::Client, config: &BizgoConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            http_client,
        }
    }

    /// Send one message to one phone number.
    pub async fn send(&self, phone: &str, message: &str, send_time: &str) -> Result<(), SmsSendError> {
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&SmsSendRequest {
                phone,
                message,
                send_time,
            })
            .send()
            .await
            .map_err(|e| SmsSendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsSendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Send `message` to every phone concurrently and wait for all attempts
    /// to settle. Individual failures are logged and counted, never returned.
    pub async fn dispatch(&self, phones: &[String], message: &str) -> DispatchSummary {
        let send_time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let results = join_all(
            phones
                .iter()
                .map(|phone| self.send(phone, message, &send_time)),
        )
        .await;

        let mut summary = DispatchSummary {
            success_count: 0,
            failed_count: 0,
        };

        for (phone, result) in phones.iter().zip(results) {
            match result {
                Ok(()) => summary.success_count += 1,
                Err(e) => {
                    tracing::warn!(phone = %mask_phone(phone), "SMS dispatch failed: {}", e);
                    summary.failed_count += 1;
                }
            }
        }

        summary
    }
}
