use crate::domain::model::{
    ApplicantRecord, ProofingOutcome, ProofingStage, RawResponse, VerificationRequest,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    Timeout,
    ConnectionFailed,
    Other,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportFailureKind::Timeout => "Timeout",
            TransportFailureKind::ConnectionFailed => "ConnectionFailed",
            TransportFailureKind::Other => "TransportError",
        };
        f.write_str(name)
    }
}

/// 傳輸失敗，已從 HTTP 客戶端的錯誤型別轉換
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: TransportFailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// 送出單一 POST 請求，實作本身不可自行重試
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(
        &self,
        request: &VerificationRequest,
    ) -> std::result::Result<RawResponse, TransportFailure>;
}

#[async_trait]
pub trait AuthTokenProvider: Send + Sync {
    async fn auth_token(&self) -> Result<String>;
}

/// 主系統 pipeline 註冊並呼叫的驗證步驟
#[async_trait]
pub trait Proofer: Send + Sync {
    fn vendor_name(&self) -> &'static str;
    fn stage(&self) -> ProofingStage;
    fn required_attributes(&self) -> &'static [&'static str];
    fn optional_attributes(&self) -> &'static [&'static str];
    async fn verify(&self, applicant: &ApplicantRecord) -> Result<ProofingOutcome>;
}
