use crate::domain::ports::AuthTokenProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;

/// 直接回傳外部取得的 token (例如主系統的憑證服務)
#[derive(Clone, Default)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl AuthTokenProvider for StaticTokenProvider {
    async fn auth_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
