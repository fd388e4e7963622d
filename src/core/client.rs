use crate::config::ProoferConfig;
use crate::core::request::RequestBuilder;
use crate::core::response::ResponseParser;
use crate::core::transport::{ReqwestTransport, TransportClient};
use crate::domain::model::{ApplicantRecord, VerificationResult};
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::Arc;

/// 一次完整的驗證呼叫：建構請求、發送、檢查並解析回應
pub struct VerificationClient<T: HttpTransport = ReqwestTransport> {
    config: Arc<ProoferConfig>,
    builder: RequestBuilder,
    transport: TransportClient<T>,
}

impl VerificationClient<ReqwestTransport> {
    /// 先驗證配置再建立 HTTP 客戶端
    pub fn new(config: Arc<ProoferConfig>) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> VerificationClient<T> {
    pub fn with_transport(config: Arc<ProoferConfig>, transport: T) -> Self {
        Self {
            builder: RequestBuilder::new(Arc::clone(&config)),
            transport: TransportClient::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &ProoferConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.transport.transport()
    }

    pub async fn send_verification_request(
        &self,
        applicant: &ApplicantRecord,
        auth_token: &str,
    ) -> Result<VerificationResult> {
        let request = self.builder.build(applicant, auth_token)?;
        tracing::debug!(
            "Built verification request {} for {}",
            request.correlation_id,
            request.url
        );

        // 傳輸層已處理重試，這裡只解析最後一次的回應
        let response = self.transport.send(&request).await?;
        let result = ResponseParser::parse(&response)?;

        tracing::info!(
            "✅ Verification {} finished: success={}, unverified={}",
            result.transaction_locator_id(),
            result.success(),
            result.reasons().len()
        );

        Ok(result)
    }
}
