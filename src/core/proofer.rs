use crate::config::ProoferConfig;
use crate::core::auth::StaticTokenProvider;
use crate::core::client::VerificationClient;
use crate::core::transport::ReqwestTransport;
use crate::domain::model::{ApplicantRecord, ProofingOutcome, ProofingStage};
use crate::domain::ports::{AuthTokenProvider, HttpTransport, Proofer};
use crate::utils::error::{ProoferError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;

pub const VENDOR_NAME: &str = "aamva:state_id";

pub const REQUIRED_ATTRIBUTES: &[&str] = &[
    "uuid",
    "message_originator_id",
    "first_name",
    "last_name",
    "dob",
    "state_id_number",
    "state_id_type",
    "state_id_jurisdiction",
];

pub const OPTIONAL_ATTRIBUTES: &[&str] = &[
    "middle_name",
    "suffix",
    "issue_date",
    "expiration_date",
    "city",
    "state",
    "zip_code",
];

/// State ID proofer，向 DLDV 服務比對申請人資料
pub struct StateIdProofer<T: HttpTransport = ReqwestTransport, P: AuthTokenProvider = StaticTokenProvider> {
    client: VerificationClient<T>,
    tokens: P,
}

impl StateIdProofer<ReqwestTransport, StaticTokenProvider> {
    /// 配置不合法時直接回傳錯誤，不會建立客戶端
    pub fn new(config: Arc<ProoferConfig>, auth_token: impl Into<String>) -> Result<Self> {
        Ok(Self::with_parts(
            VerificationClient::new(config)?,
            StaticTokenProvider::new(auth_token),
        ))
    }
}

impl<T: HttpTransport, P: AuthTokenProvider> StateIdProofer<T, P> {
    pub fn with_parts(client: VerificationClient<T>, tokens: P) -> Self {
        Self { client, tokens }
    }

    pub fn client(&self) -> &VerificationClient<T> {
        &self.client
    }
}

#[async_trait]
impl<T: HttpTransport, P: AuthTokenProvider> Proofer for StateIdProofer<T, P> {
    fn vendor_name(&self) -> &'static str {
        VENDOR_NAME
    }

    fn stage(&self) -> ProofingStage {
        ProofingStage::StateId
    }

    fn required_attributes(&self) -> &'static [&'static str] {
        REQUIRED_ATTRIBUTES
    }

    fn optional_attributes(&self) -> &'static [&'static str] {
        OPTIONAL_ATTRIBUTES
    }

    async fn verify(&self, applicant: &ApplicantRecord) -> Result<ProofingOutcome> {
        // 驗證申請人資料
        applicant.validate()?;

        let auth_token = self.tokens.auth_token().await?;
        let result = self
            .client
            .send_verification_request(applicant, &auth_token)
            .await?;

        Ok(ProofingOutcome::from_verification(VENDOR_NAME, &result))
    }
}

/// 主系統端的 proofer 註冊表，啟動時逐一註冊
#[derive(Default)]
pub struct ProoferRegistry {
    proofers: Vec<Arc<dyn Proofer>>,
}

impl ProoferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, proofer: Arc<dyn Proofer>) -> Result<()> {
        if self.get(proofer.vendor_name()).is_some() {
            return Err(ProoferError::ConfigError {
                message: format!("Proofer '{}' is already registered", proofer.vendor_name()),
            });
        }

        tracing::debug!(
            "Registered proofer {} for stage {:?}",
            proofer.vendor_name(),
            proofer.stage()
        );
        self.proofers.push(proofer);
        Ok(())
    }

    pub fn get(&self, vendor_name: &str) -> Option<Arc<dyn Proofer>> {
        self.proofers
            .iter()
            .find(|proofer| proofer.vendor_name() == vendor_name)
            .cloned()
    }

    pub fn for_stage(&self, stage: ProofingStage) -> Vec<Arc<dyn Proofer>> {
        self.proofers
            .iter()
            .filter(|proofer| proofer.stage() == stage)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.proofers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proofers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{
        modify_match_indicator, ok, sample_applicant, ScriptedTransport, VERIFICATION_RESPONSE,
    };
    use crate::domain::model::{AttributeOutcome, CanonicalAttribute};

    fn proofer(body: &str) -> StateIdProofer<ScriptedTransport, StaticTokenProvider> {
        let client = VerificationClient::with_transport(
            Arc::new(ProoferConfig::default()),
            ScriptedTransport::new(vec![ok(body)]),
        );
        StateIdProofer::with_parts(client, StaticTokenProvider::new("token"))
    }

    #[tokio::test]
    async fn test_verify_maps_outcomes_to_status_codes() {
        let body = modify_match_indicator(VERIFICATION_RESPONSE, "AddressCityMatchIndicator", "false");
        let outcome = proofer(&body).verify(&sample_applicant()).await.unwrap();

        assert_eq!(outcome.vendor_name, VENDOR_NAME);
        assert_eq!(outcome.transaction_id, "1234-abcd-efgh");
        assert!(!outcome.success);
        assert_eq!(outcome.reasons, vec!["Failed to verify city"]);
        assert_eq!(outcome.attributes.len(), 9);
        assert_eq!(outcome.outcome(CanonicalAttribute::City), AttributeOutcome::Unverified);
        assert_eq!(outcome.outcome(CanonicalAttribute::City).status_code(), "UNVERIFIED");
        assert_eq!(outcome.outcome(CanonicalAttribute::Dob).status_code(), "VERIFIED");
    }

    #[tokio::test]
    async fn test_invalid_applicant_never_reaches_transport() {
        let proofer = proofer(VERIFICATION_RESPONSE);
        let mut applicant = sample_applicant();
        applicant.dob = "10/29/1942".to_string();

        let err = proofer.verify(&applicant).await.unwrap_err();

        assert!(matches!(err, ProoferError::ValidationError { .. }));
        assert_eq!(proofer.client().transport().calls(), 0);
    }

    #[test]
    fn test_attribute_declarations() {
        let proofer = proofer(VERIFICATION_RESPONSE);

        assert_eq!(proofer.stage(), ProofingStage::StateId);
        assert!(proofer.required_attributes().contains(&"state_id_jurisdiction"));
        assert!(proofer.optional_attributes().contains(&"zip_code"));
        assert!(!proofer.required_attributes().contains(&"zip_code"));
    }

    #[test]
    fn test_registry() {
        let mut registry = ProoferRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(proofer(VERIFICATION_RESPONSE))).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(VENDOR_NAME).is_some());
        assert!(registry.get("lexisnexis:instant_verify").is_none());
        assert_eq!(registry.for_stage(ProofingStage::StateId).len(), 1);
        assert!(registry.for_stage(ProofingStage::Address).is_empty());

        let duplicate = registry.register(Arc::new(proofer(VERIFICATION_RESPONSE)));
        assert!(matches!(duplicate, Err(ProoferError::ConfigError { .. })));
    }
}
