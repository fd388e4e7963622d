pub mod auth;
pub mod client;
pub mod proofer;
pub mod request;
pub mod response;
pub mod transport;
pub(crate) mod xml;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{
    ApplicantRecord, AttributeOutcome, CanonicalAttribute, ProofingOutcome, ProofingStage,
    RawResponse, VerificationRequest, VerificationResult,
};
pub use crate::domain::ports::{AuthTokenProvider, HttpTransport, Proofer};
pub use crate::utils::error::Result;
