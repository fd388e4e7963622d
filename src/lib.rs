pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::config::ProoferConfig;
pub use crate::core::{
    auth::StaticTokenProvider,
    client::VerificationClient,
    proofer::{ProoferRegistry, StateIdProofer},
    request::RequestBuilder,
    response::ResponseParser,
    transport::{ReqwestTransport, TransportClient},
};
pub use crate::domain::model::{
    ApplicantRecord, AttributeOutcome, CanonicalAttribute, ProofingOutcome, ProofingStage,
    StateIdData, VerificationResult,
};
pub use crate::domain::ports::Proofer;
pub use crate::utils::error::{ProoferError, Result};
