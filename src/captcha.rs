use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

const VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
const VERIFY_TIMEOUT_SECS: u64 = 5;

/// Thin client for the reCAPTCHA server-side verification endpoint.
#[derive(Clone)]
pub struct CaptchaClient {
    http: Client,
    secret: Option<String>,
}

#[derive(Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    success: bool,
}

impl CaptchaClient {
    pub fn new(secret: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(VERIFY_TIMEOUT_SECS))
            .build()
            .context("failed to build captcha HTTP client")?;

        Ok(Self { http, secret })
    }

    /// Fail-closed: a missing secret, a transport failure, a timeout, or a
    /// malformed response body all count as a failed verification.
    pub async fn verify(&self, token: &str, remote_ip: &str) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            return false;
        };

        let params = [
            ("secret", secret),
            ("response", token),
            ("remoteip", remote_ip),
        ];

        let response = match self.http.post(VERIFY_URL).form(&params).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(?err, "captcha verification request failed");
                return false;
            }
        };

        match response.json::<VerifyResponse>().await {
            Ok(body) => body.success,
            Err(err) => {
                warn!(?err, "captcha verification returned a malformed body");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_secret_fails_closed() {
        let client = CaptchaClient::new(None).unwrap();
        assert!(!client.verify("token", "127.0.0.1").await);
    }
}
