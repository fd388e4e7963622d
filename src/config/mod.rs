#[cfg(feature = "cli")]
pub mod cli;
pub mod secret;

use crate::utils::error::{ProoferError, Result};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use regex::Regex;
use secret::KeyMaterial;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_VERIFICATION_URL: &str =
    "https://verificationservices2-cert.aamva.org:18449/dldv/2.1/valuefree";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// 驗證服務配置，建立後以 `Arc` 唯讀共享給所有驗證請求
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProoferConfig {
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub auth_request_timeout: Option<u64>,
    #[serde(default)]
    pub auth_url: Option<String>,
    /// 啟用時請求送往認證測試用的管轄區 (P6)
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub cert_enabled: bool,
    #[serde(default)]
    pub(crate) private_key: Option<KeyMaterial>,
    #[serde(default)]
    pub(crate) public_key: Option<KeyMaterial>,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub verification_request_timeout: Option<u64>,
    #[serde(default)]
    pub verification_url: Option<String>,
}

impl ProoferConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProoferError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ProoferError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AAMVA_PRIVATE_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 設定簽章用金鑰，設定後無法再讀回
    pub fn with_signing_keys(
        mut self,
        private_key: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        self.private_key = Some(KeyMaterial::new(private_key));
        self.public_key = Some(KeyMaterial::new(public_key));
        self
    }

    pub fn has_signing_keys(&self) -> bool {
        let present = |key: &Option<KeyMaterial>| key.as_ref().is_some_and(|k| !k.is_empty());
        present(&self.private_key) && present(&self.public_key)
    }

    /// 取得驗證端點，未設定時使用預設的認證環境端點
    pub fn verification_endpoint(&self) -> &str {
        self.verification_url
            .as_deref()
            .unwrap_or(DEFAULT_VERIFICATION_URL)
    }

    /// 取得驗證請求逾時 (連線與讀取共用)
    pub fn verification_timeout(&self) -> Duration {
        Duration::from_secs(
            self.verification_request_timeout
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

}

impl Validate for ProoferConfig {
    fn validate(&self) -> Result<()> {
        // 驗證端點 URL
        if let Some(url) = &self.verification_url {
            validate_url("verification_url", url)?;
        }
        if let Some(url) = &self.auth_url {
            validate_url("auth_url", url)?;
        }
        // 驗證逾時秒數，0 秒會讓每個請求立即逾時
        if let Some(timeout) = self.verification_request_timeout {
            validate_positive_number("verification_request_timeout", timeout, 1)?;
        }
        if let Some(timeout) = self.auth_request_timeout {
            validate_positive_number("auth_request_timeout", timeout, 1)?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

/// 接受布林值 `true` 或字串 `"true"`，其餘一律視為關閉
fn deserialize_truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(value) => value == "true",
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Seconds {
    Whole(u64),
    Fractional(f64),
    Text(String),
}

/// 接受整數、浮點數與數字字串，小數部分直接捨去
fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let truncate = |value: f64| {
        if value.is_finite() && value >= 0.0 {
            Ok(value.trunc() as u64)
        } else {
            Err(D::Error::custom(format!("invalid timeout: {}", value)))
        }
    };

    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Whole(value)) => Ok(Some(value)),
        Some(Seconds::Fractional(value)) => truncate(value).map(Some),
        Some(Seconds::Text(text)) => {
            let value = text
                .trim()
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid timeout: {:?}", text)))?;
            truncate(value).map(Some)
        }
    }
}
