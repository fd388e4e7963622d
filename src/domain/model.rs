use crate::utils::error::Result;
use crate::utils::validation::{
    validate_alphanumeric, validate_non_empty_string, validate_optional_iso_date, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 申請人提供的證件種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateIdType {
    DriversLicense,
    DriversPermit,
    StateIdCard,
}

impl StateIdType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "drivers_license" => Some(StateIdType::DriversLicense),
            "drivers_permit" => Some(StateIdType::DriversPermit),
            "state_id_card" => Some(StateIdType::StateIdCard),
            _ => None,
        }
    }

    /// 對應請求中 `DocumentCategoryCode` 的代碼
    pub fn document_category_code(self) -> &'static str {
        match self {
            StateIdType::DriversLicense => "1",
            StateIdType::DriversPermit => "2",
            StateIdType::StateIdCard => "3",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateIdData {
    pub state_id_number: String,
    pub state_id_jurisdiction: String,
    pub state_id_type: String,
}

impl StateIdData {
    pub fn id_type(&self) -> Option<StateIdType> {
        StateIdType::from_code(&self.state_id_type)
    }
}

/// 由主系統正規化後傳入的申請人資料
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicantRecord {
    pub uuid: String,
    pub message_originator_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    /// `YYYY-MM-DD`，無法解析時為空字串
    pub dob: String,
    pub state_id_data: StateIdData,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl Validate for ApplicantRecord {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("uuid", &self.uuid)?;
        validate_non_empty_string("message_originator_id", &self.message_originator_id)?;
        validate_non_empty_string("first_name", &self.first_name)?;
        validate_non_empty_string("last_name", &self.last_name)?;
        validate_optional_iso_date("dob", &self.dob)?;

        let id = &self.state_id_data;
        validate_non_empty_string("state_id_number", &id.state_id_number)?;
        validate_alphanumeric("state_id_number", &id.state_id_number)?;
        validate_non_empty_string("state_id_jurisdiction", &id.state_id_jurisdiction)?;
        validate_non_empty_string("state_id_type", &id.state_id_type)?;

        Ok(())
    }
}

/// 決定整體驗證結果的九個屬性
///
/// 宣告順序即為固定的迭代順序，`Ord` 依此排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalAttribute {
    StateIdNumber,
    StateIdType,
    Dob,
    LastName,
    FirstName,
    Address1,
    City,
    State,
    Zipcode,
}

impl CanonicalAttribute {
    pub const ALL: [CanonicalAttribute; 9] = [
        CanonicalAttribute::StateIdNumber,
        CanonicalAttribute::StateIdType,
        CanonicalAttribute::Dob,
        CanonicalAttribute::LastName,
        CanonicalAttribute::FirstName,
        CanonicalAttribute::Address1,
        CanonicalAttribute::City,
        CanonicalAttribute::State,
        CanonicalAttribute::Zipcode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalAttribute::StateIdNumber => "state_id_number",
            CanonicalAttribute::StateIdType => "state_id_type",
            CanonicalAttribute::Dob => "dob",
            CanonicalAttribute::LastName => "last_name",
            CanonicalAttribute::FirstName => "first_name",
            CanonicalAttribute::Address1 => "address1",
            CanonicalAttribute::City => "city",
            CanonicalAttribute::State => "state",
            CanonicalAttribute::Zipcode => "zipcode",
        }
    }

    /// 回應中對應此屬性的 match indicator 元素名稱 (不含命名空間前綴)
    pub fn indicator_element(self) -> &'static str {
        match self {
            CanonicalAttribute::StateIdNumber => "DriverLicenseNumberMatchIndicator",
            CanonicalAttribute::StateIdType => "DocumentCategoryMatchIndicator",
            CanonicalAttribute::Dob => "PersonBirthDateMatchIndicator",
            CanonicalAttribute::LastName => "PersonLastNameExactMatchIndicator",
            CanonicalAttribute::FirstName => "PersonFirstNameExactMatchIndicator",
            CanonicalAttribute::Address1 => "AddressLine1MatchIndicator",
            CanonicalAttribute::City => "AddressCityMatchIndicator",
            CanonicalAttribute::State => "AddressStateCodeMatchIndicator",
            CanonicalAttribute::Zipcode => "AddressZIP5MatchIndicator",
        }
    }
}

impl fmt::Display for CanonicalAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeOutcome {
    Verified,
    Unverified,
    /// 不完整的回應在解析階段就會被拒絕，目前不會出現在解析結果中
    Missing,
}

impl AttributeOutcome {
    pub fn status_code(self) -> &'static str {
        match self {
            AttributeOutcome::Verified => "VERIFIED",
            AttributeOutcome::Unverified => "UNVERIFIED",
            AttributeOutcome::Missing => "MISSING",
        }
    }
}

impl From<Option<bool>> for AttributeOutcome {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => AttributeOutcome::Verified,
            Some(false) => AttributeOutcome::Unverified,
            None => AttributeOutcome::Missing,
        }
    }
}

/// 可直接送出的驗證請求，重試時原封不動重送
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
    /// 每個請求隨機產生的 message id，寫入 SOAP header
    pub correlation_id: String,
}

impl VerificationRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// 通過所有檢查後的驗證回應
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    transaction_locator_id: String,
    verification_results: BTreeMap<CanonicalAttribute, bool>,
}

impl VerificationResult {
    pub(crate) fn new(
        transaction_locator_id: String,
        verification_results: BTreeMap<CanonicalAttribute, bool>,
    ) -> Self {
        Self {
            transaction_locator_id,
            verification_results,
        }
    }

    pub fn transaction_locator_id(&self) -> &str {
        &self.transaction_locator_id
    }

    pub fn verification_results(&self) -> &BTreeMap<CanonicalAttribute, bool> {
        &self.verification_results
    }

    pub fn outcome(&self, attribute: CanonicalAttribute) -> AttributeOutcome {
        self.verification_results.get(&attribute).copied().into()
    }

    /// 依固定順序列出每個屬性的三態結果
    pub fn outcomes(&self) -> Vec<(CanonicalAttribute, AttributeOutcome)> {
        CanonicalAttribute::ALL
            .iter()
            .map(|attribute| (*attribute, self.outcome(*attribute)))
            .collect()
    }

    /// 只有明確為 false 的屬性才會產生失敗原因
    pub fn reasons(&self) -> Vec<String> {
        CanonicalAttribute::ALL
            .iter()
            .filter(|attribute| self.verification_results.get(*attribute) == Some(&false))
            .map(|attribute| format!("Failed to verify {}", attribute))
            .collect()
    }

    pub fn success(&self) -> bool {
        self.reasons().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofingStage {
    Resolution,
    StateId,
    Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeResult {
    pub attribute: CanonicalAttribute,
    pub outcome: AttributeOutcome,
}

/// 回傳給主系統 pipeline 的驗證結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofingOutcome {
    pub vendor_name: String,
    pub transaction_id: String,
    pub success: bool,
    pub reasons: Vec<String>,
    pub attributes: Vec<AttributeResult>,
}

impl ProofingOutcome {
    pub fn from_verification(vendor_name: &str, result: &VerificationResult) -> Self {
        Self {
            vendor_name: vendor_name.to_string(),
            transaction_id: result.transaction_locator_id().to_string(),
            success: result.success(),
            reasons: result.reasons(),
            attributes: result
                .outcomes()
                .into_iter()
                .map(|(attribute, outcome)| AttributeResult { attribute, outcome })
                .collect(),
        }
    }

    pub fn outcome(&self, attribute: CanonicalAttribute) -> AttributeOutcome {
        self.attributes
            .iter()
            .find(|result| result.attribute == attribute)
            .map(|result| result.outcome)
            .unwrap_or(AttributeOutcome::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant() -> ApplicantRecord {
        ApplicantRecord {
            uuid: "1234-abcd".to_string(),
            message_originator_id: "GSA_MOI".to_string(),
            first_name: "Testy".to_string(),
            last_name: "McTesterson".to_string(),
            dob: "1942-10-29".to_string(),
            state_id_data: StateIdData {
                state_id_number: "123456789".to_string(),
                state_id_jurisdiction: "CA".to_string(),
                state_id_type: "drivers_license".to_string(),
            },
            ..Default::default()
        }
    }

    fn all_verified() -> BTreeMap<CanonicalAttribute, bool> {
        CanonicalAttribute::ALL.iter().map(|a| (*a, true)).collect()
    }

    #[test]
    fn test_document_category_codes() {
        assert_eq!(StateIdType::from_code("drivers_license").map(|t| t.document_category_code()), Some("1"));
        assert_eq!(StateIdType::from_code("drivers_permit").map(|t| t.document_category_code()), Some("2"));
        assert_eq!(StateIdType::from_code("state_id_card").map(|t| t.document_category_code()), Some("3"));
        assert_eq!(StateIdType::from_code("passport"), None);
    }

    #[test]
    fn test_applicant_validation() {
        assert!(applicant().validate().is_ok());

        let mut bad_dob = applicant();
        bad_dob.dob = "10/29/1942".to_string();
        assert!(bad_dob.validate().is_err());

        let mut bad_number = applicant();
        bad_number.state_id_data.state_id_number = "123-456".to_string();
        assert!(bad_number.validate().is_err());
    }

    #[test]
    fn test_applicant_rejects_unknown_keys() {
        let json = serde_json::json!({
            "uuid": "1234",
            "message_originator_id": "GSA_MOI",
            "first_name": "Testy",
            "last_name": "McTesterson",
            "dob": "1942-10-29",
            "state_id_data": {
                "state_id_number": "123",
                "state_id_jurisdiction": "CA",
                "state_id_type": "drivers_license"
            },
            "ssn": "900-12-3456"
        });

        assert!(serde_json::from_value::<ApplicantRecord>(json).is_err());
    }

    #[test]
    fn test_canonical_attribute_serializes_to_name() {
        for attribute in CanonicalAttribute::ALL {
            let json = serde_json::to_string(&attribute).unwrap();
            assert_eq!(json, format!("\"{}\"", attribute.name()));
        }
    }

    #[test]
    fn test_all_verified_result() {
        let result = VerificationResult::new("tx".to_string(), all_verified());
        assert!(result.success());
        assert!(result.reasons().is_empty());
        assert!(result
            .outcomes()
            .iter()
            .all(|(_, outcome)| *outcome == AttributeOutcome::Verified));
    }

    #[test]
    fn test_reasons_follow_canonical_order() {
        let mut results = all_verified();
        results.insert(CanonicalAttribute::Zipcode, false);
        results.insert(CanonicalAttribute::StateIdNumber, false);

        let result = VerificationResult::new("tx".to_string(), results);
        assert_eq!(
            result.reasons(),
            vec!["Failed to verify state_id_number", "Failed to verify zipcode"]
        );
        assert!(!result.success());
    }

    #[test]
    fn test_absent_attribute_is_missing() {
        let mut results = all_verified();
        results.remove(&CanonicalAttribute::City);

        let result = VerificationResult::new("tx".to_string(), results);
        assert_eq!(result.outcome(CanonicalAttribute::City), AttributeOutcome::Missing);

        let outcome = ProofingOutcome::from_verification("aamva:state_id", &result);
        assert_eq!(outcome.outcome(CanonicalAttribute::City).status_code(), "MISSING");
        assert_eq!(outcome.attributes.len(), 9);
    }
}
