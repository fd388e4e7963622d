//! `core` 單元測試共用的 fixture 與假的傳輸實作

use crate::domain::model::{ApplicantRecord, RawResponse, StateIdData, VerificationRequest};
use crate::domain::ports::{HttpTransport, TransportFailure, TransportFailureKind};
use async_trait::async_trait;
use regex::Regex;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const VERIFICATION_RESPONSE: &str =
    include_str!("../../tests/fixtures/verification_response.xml");
pub const SOAP_FAULT_RESPONSE: &str = include_str!("../../tests/fixtures/soap_fault_response.xml");

fn indicator_pattern(name: &str) -> Regex {
    Regex::new(&format!(r"<(\w+:)?{name}>[^<]*</(\w+:)?{name}>")).unwrap()
}

pub fn delete_match_indicator(xml: &str, name: &str) -> String {
    indicator_pattern(name).replace_all(xml, "").into_owned()
}

pub fn modify_match_indicator(xml: &str, name: &str, value: &str) -> String {
    indicator_pattern(name)
        .replace_all(xml, |caps: &regex::Captures| {
            let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            format!("<{prefix}{name}>{value}</{prefix}{name}>")
        })
        .into_owned()
}

pub fn sample_applicant() -> ApplicantRecord {
    ApplicantRecord {
        uuid: "1234-abcd-efgh".to_string(),
        message_originator_id: "GSA_MOI".to_string(),
        first_name: "Testy".to_string(),
        last_name: "McTesterson".to_string(),
        middle_name: None,
        suffix: None,
        dob: "1942-10-29".to_string(),
        state_id_data: StateIdData {
            state_id_number: "123456789".to_string(),
            state_id_jurisdiction: "CA".to_string(),
            state_id_type: "drivers_license".to_string(),
        },
        issue_date: None,
        expiration_date: None,
        city: Some("Sacramento".to_string()),
        state: Some("CA".to_string()),
        zip_code: Some("95814".to_string()),
    }
}

pub fn ok(body: &str) -> Result<RawResponse, TransportFailure> {
    Ok(RawResponse {
        status: 200,
        body: body.to_string(),
    })
}

pub fn failure(kind: TransportFailureKind) -> Result<RawResponse, TransportFailure> {
    Err(TransportFailure::new(kind, "scripted failure"))
}

/// 依序回放預先設定的結果，並記錄收到的每個請求
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<RawResponse, TransportFailure>>>,
    seen: Mutex<Vec<VerificationRequest>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<Result<RawResponse, TransportFailure>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen(&self) -> Vec<VerificationRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post(&self, request: &VerificationRequest) -> Result<RawResponse, TransportFailure> {
        self.seen.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| failure(TransportFailureKind::Other))
    }
}

#[test]
fn test_fixture_helpers() {
    let deleted = delete_match_indicator(VERIFICATION_RESPONSE, "AddressZIP5MatchIndicator");
    assert!(!deleted.contains("AddressZIP5MatchIndicator"));

    let modified =
        modify_match_indicator(VERIFICATION_RESPONSE, "PersonBirthDateMatchIndicator", "false");
    assert!(modified
        .contains("<b:PersonBirthDateMatchIndicator>false</b:PersonBirthDateMatchIndicator>"));
}
