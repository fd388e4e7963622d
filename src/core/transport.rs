use crate::config::ProoferConfig;
use crate::domain::model::{RawResponse, VerificationRequest};
use crate::domain::ports::{HttpTransport, TransportFailure, TransportFailureKind};
use crate::utils::error::{ProoferError, Result};
use crate::utils::retry::with_retries;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// 首次發送加上一次立即重試
pub const MAX_ATTEMPTS: u32 = 2;

/// 只有逾時與連線失敗會重試，TLS 或 URL 等其他錯誤直接回傳
pub fn is_transient(failure: &TransportFailure) -> bool {
    matches!(
        failure.kind,
        TransportFailureKind::Timeout | TransportFailureKind::ConnectionFailed
    )
}

pub fn classify_reqwest_error(err: reqwest::Error) -> TransportFailure {
    let kind = if err.is_timeout() {
        TransportFailureKind::Timeout
    } else if err.is_connect() {
        TransportFailureKind::ConnectionFailed
    } else {
        TransportFailureKind::Other
    };
    TransportFailure::new(kind, err.to_string())
}

/// 以單一 `reqwest::Client` 實作的 HTTPS 傳輸
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// 連線逾時與讀取逾時使用同一個值
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ProoferConfig) -> Result<Self> {
        Self::new(config.verification_timeout())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        request: &VerificationRequest,
    ) -> std::result::Result<RawResponse, TransportFailure> {
        let mut builder = self.client.post(&request.url).body(request.body.clone());
        // 添加 SOAP 標頭
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        Ok(RawResponse { status, body })
    }
}

/// 依重試規則發送請求，並把傳輸失敗轉為 [`ProoferError`]
pub struct TransportClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    max_attempts: u32,
}

impl<T: HttpTransport> TransportClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn send(&self, request: &VerificationRequest) -> Result<RawResponse> {
        let transport = &self.transport;
        let max_attempts = self.max_attempts;

        let outcome = with_retries(max_attempts, is_transient, move |attempt| async move {
            tracing::debug!(
                "📡 POST {} (attempt {}/{}, {} bytes)",
                request.url,
                attempt,
                max_attempts,
                request.body.len()
            );

            let result = transport.post(request).await;
            match &result {
                Ok(response) => {
                    tracing::debug!("📡 Verification service answered {}", response.status)
                }
                Err(failure) if is_transient(failure) && attempt < max_attempts => {
                    tracing::warn!(
                        "Transient {} on attempt {}/{}: {}",
                        failure.kind,
                        attempt,
                        max_attempts,
                        failure.message
                    )
                }
                Err(failure) => {
                    tracing::error!("Verification request failed with {}: {}", failure.kind, failure.message)
                }
            }
            result
        })
        .await;

        // 重試用盡的暫時性錯誤一律回報為逾時
        outcome.map_err(|failure| {
            if is_transient(&failure) {
                ProoferError::TransportTimeout {
                    message: format!(
                        "Verification service raised {} waiting for verification response: {}",
                        failure.kind, failure.message
                    ),
                }
            } else {
                ProoferError::Transport {
                    message: format!("{}: {}", failure.kind, failure.message),
                }
            }
        })
    }
}
