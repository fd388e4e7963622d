use crate::config::ProoferConfig;
use crate::core::xml::XmlElement;
use crate::domain::model::{ApplicantRecord, VerificationRequest};
use crate::utils::error::Result;
use std::sync::Arc;
use uuid::Uuid;

pub const CONTENT_TYPE: &str = "application/soap+xml;charset=UTF-8";
pub const SOAP_ACTION: &str =
    "\"http://aamva.org/dldv/wsdl/2.1/IDLDVService21/VerifyDriverLicenseData\"";
/// 認證測試環境的目的地代碼
pub const CERT_DESTINATION_ID: &str = "P6";

const SOAP_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const ADDRESSING_NS: &str = "http://www.w3.org/2005/08/addressing";
const ANONYMOUS_REPLY_ADDRESS: &str = "http://www.w3.org/2005/08/addressing/anonymous";
const SOAP_ACTION_URI: &str = "http://aamva.org/dldv/wsdl/2.1/IDLDVService21/VerifyDriverLicenseData";
const DLDV_NS: &str = "http://aamva.org/dldv/wsdl/2.1";
/// 訊息路由與駕照欄位
const EXTENSIONS_NS: &str = "http://aamva.org/niem/extensions/1.0";
/// 個人與地址欄位
const NIEM_CORE_NS: &str = "http://niem.gov/niem/niem-core/2.0";

/// 將申請人資料組成可直接送出的驗證請求
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: Arc<ProoferConfig>,
}

impl RequestBuilder {
    pub fn new(config: Arc<ProoferConfig>) -> Self {
        Self { config }
    }

    /// 每次建構都產生新的隨機 correlation id
    pub fn build(&self, applicant: &ApplicantRecord, auth_token: &str) -> Result<VerificationRequest> {
        self.build_with_correlation_id(applicant, auth_token, &Uuid::new_v4().to_string())
    }

    pub fn build_with_correlation_id(
        &self,
        applicant: &ApplicantRecord,
        auth_token: &str,
        correlation_id: &str,
    ) -> Result<VerificationRequest> {
        let url = self.config.verification_endpoint().to_string();
        let body = self
            .envelope(applicant, auth_token, correlation_id, &url)
            .to_document()?;

        // Content-Length 以位元組計算
        let headers = vec![
            ("SOAPAction".to_string(), SOAP_ACTION.to_string()),
            ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ("Content-Length".to_string(), body.len().to_string()),
        ];

        Ok(VerificationRequest {
            url,
            body,
            headers,
            correlation_id: correlation_id.to_string(),
        })
    }

    /// 無法對應的證件種類回傳空字串
    pub fn document_category_code(applicant: &ApplicantRecord) -> &'static str {
        applicant
            .state_id_data
            .id_type()
            .map(|id_type| id_type.document_category_code())
            .unwrap_or("")
    }

    /// 認證模式一律送往 P6，否則送往申請人的發證州
    pub fn message_destination_id<'a>(&self, applicant: &'a ApplicantRecord) -> &'a str {
        if self.config.cert_enabled {
            CERT_DESTINATION_ID
        } else {
            &applicant.state_id_data.state_id_jurisdiction
        }
    }

    fn envelope(
        &self,
        applicant: &ApplicantRecord,
        auth_token: &str,
        correlation_id: &str,
        url: &str,
    ) -> XmlElement {
        let header = XmlElement::parent(
            "soap-envelope:Header",
            vec![
                XmlElement::text("a:Action", SOAP_ACTION_URI)
                    .attr("xmlns:a", ADDRESSING_NS)
                    .attr("soap-envelope:mustUnderstand", "1"),
                XmlElement::text("b:MessageID", format!("urn:uuid:{}", correlation_id))
                    .attr("xmlns:b", ADDRESSING_NS),
                XmlElement::parent(
                    "c:ReplyTo",
                    vec![XmlElement::text("c:Address", ANONYMOUS_REPLY_ADDRESS)],
                )
                .attr("xmlns:c", ADDRESSING_NS),
                XmlElement::text("d:To", url)
                    .attr("xmlns:d", ADDRESSING_NS)
                    .attr("soap-envelope:mustUnderstand", "1"),
            ],
        );

        let body = XmlElement::parent(
            "soap-envelope:Body",
            vec![XmlElement::parent(
                "dldv:VerifyDriverLicenseData",
                vec![
                    XmlElement::text("dldv:token", auth_token),
                    self.request_element(applicant),
                ],
            )
            .attr("xmlns:dldv", DLDV_NS)],
        );

        XmlElement::parent("soap-envelope:Envelope", vec![header, body])
            .attr("xmlns:soap-envelope", SOAP_ENVELOPE_NS)
    }

    fn request_element(&self, applicant: &ApplicantRecord) -> XmlElement {
        // 選填欄位未提供時仍保留空元素
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();

        XmlElement::parent(
            "dldv:request",
            vec![
                XmlElement::parent(
                    "ns1:MessageAddress",
                    vec![
                        XmlElement::text(
                            "ns1:MessageDestinationId",
                            self.message_destination_id(applicant),
                        ),
                        XmlElement::text(
                            "ns1:MessageOriginatorId",
                            applicant.message_originator_id.as_str(),
                        ),
                    ],
                ),
                XmlElement::text("ns1:TransactionLocatorId", applicant.uuid.as_str()),
                XmlElement::parent(
                    "ns1:DriverLicenseIdentification",
                    vec![XmlElement::text(
                        "ns2:IdentificationID",
                        applicant.state_id_data.state_id_number.as_str(),
                    )],
                ),
                XmlElement::text(
                    "ns1:DocumentCategoryCode",
                    Self::document_category_code(applicant),
                ),
                XmlElement::text("ns1:DriverLicenseIssueDate", optional(&applicant.issue_date)),
                XmlElement::text(
                    "ns1:DriverLicenseExpirationDate",
                    optional(&applicant.expiration_date),
                ),
                XmlElement::text("ns1:PersonBirthDate", applicant.dob.as_str()),
                XmlElement::parent(
                    "ns2:PersonName",
                    vec![
                        XmlElement::text("ns2:PersonGivenName", applicant.first_name.as_str()),
                        XmlElement::text("ns2:PersonMiddleName", optional(&applicant.middle_name)),
                        XmlElement::text("ns2:PersonSurName", applicant.last_name.as_str()),
                        XmlElement::text("ns2:PersonNameSuffixText", optional(&applicant.suffix)),
                    ],
                ),
                XmlElement::parent(
                    "ns1:Address",
                    vec![
                        XmlElement::text("ns2:LocationCityName", optional(&applicant.city)),
                        XmlElement::text(
                            "ns2:LocationStateUsPostalServiceCode",
                            optional(&applicant.state),
                        ),
                        XmlElement::text("ns2:LocationPostalCode", optional(&applicant.zip_code)),
                    ],
                ),
            ],
        )
        .attr("xmlns:ns1", EXTENSIONS_NS)
        .attr("xmlns:ns2", NIEM_CORE_NS)
    }
}
