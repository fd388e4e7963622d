use crate::core::xml::XmlDocument;
use crate::domain::model::{CanonicalAttribute, RawResponse, VerificationResult};
use crate::utils::error::{ProoferError, Result};
use std::collections::BTreeMap;

pub const TRANSACTION_LOCATOR_ELEMENT: &str = "TransactionLocatorId";
const FAULT_ELEMENT: &str = "Fault";

/// 檢查原始回應並解析為 [`VerificationResult`]
///
/// 依序檢查 HTTP 狀態碼、SOAP fault、indicator 完整性，最後才擷取結果，
/// 任一步驟失敗即停止。九個屬性以外的 indicator 一律忽略。
pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response: &RawResponse) -> Result<VerificationResult> {
        // 狀態碼必須是 200，不看內容
        Self::check_status(response)?;

        let document = XmlDocument::parse(&response.body)?;
        Self::check_fault(&document)?;
        Self::check_completeness(&document)?;

        let verification_results = Self::extract_indicators(&document);
        // 回應未帶交易編號時以空字串表示
        let transaction_locator_id = document
            .first_text(TRANSACTION_LOCATOR_ELEMENT)
            .unwrap_or_default()
            .to_string();

        tracing::debug!(
            "Parsed verification response for transaction {}",
            transaction_locator_id
        );

        Ok(VerificationResult::new(
            transaction_locator_id,
            verification_results,
        ))
    }

    fn check_status(response: &RawResponse) -> Result<()> {
        if response.status != 200 {
            return Err(ProoferError::UnexpectedStatus {
                status: response.status,
            });
        }
        Ok(())
    }

    fn check_fault(document: &XmlDocument) -> Result<()> {
        if !document.contains(FAULT_ELEMENT) {
            return Ok(());
        }

        Err(ProoferError::SoapFault {
            reason: Self::fault_reason(document),
        })
    }

    /// 先找 SOAP 1.2 的 `Fault/Reason/Text`，找不到再用 SOAP 1.1 的 `faultstring`
    fn fault_reason(document: &XmlDocument) -> String {
        let nodes = document.nodes();
        let soap12 = nodes.iter().find(|node| {
            node.name == "Text" && node.is_within("Reason") && node.is_within(FAULT_ELEMENT)
        });
        let soap11 = || {
            nodes
                .iter()
                .find(|node| node.name == "faultstring" && node.is_within(FAULT_ELEMENT))
        };

        soap12
            .or_else(soap11)
            .map(|node| node.text.clone())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "Verification service returned a SOAP fault".to_string())
    }

    /// 每個屬性的 indicator 必須剛好出現一次
    fn check_completeness(document: &XmlDocument) -> Result<()> {
        let mut missing: Vec<String> = CanonicalAttribute::ALL
            .iter()
            .filter(|attribute| !document.contains(attribute.indicator_element()))
            .map(|attribute| attribute.name().to_string())
            .collect();

        if !missing.is_empty() {
            // 依名稱排序，與缺漏的先後順序無關
            missing.sort();
            return Err(ProoferError::MissingAttributes { missing });
        }

        let mut duplicated: Vec<&str> = CanonicalAttribute::ALL
            .iter()
            .filter(|attribute| document.count(attribute.indicator_element()) > 1)
            .map(|attribute| attribute.name())
            .collect();

        if !duplicated.is_empty() {
            duplicated.sort();
            return Err(ProoferError::MalformedResponse {
                message: format!(
                    "duplicate match indicators for {}",
                    duplicated.join(", ")
                ),
            });
        }

        Ok(())
    }

    /// 只有文字內容為 `true` 才算通過
    fn extract_indicators(document: &XmlDocument) -> BTreeMap<CanonicalAttribute, bool> {
        CanonicalAttribute::ALL
            .iter()
            .filter_map(|attribute| {
                document
                    .first_text(attribute.indicator_element())
                    .map(|text| (*attribute, text == "true"))
            })
            .collect()
    }
}
