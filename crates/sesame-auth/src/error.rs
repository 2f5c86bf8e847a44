//! Error types.

use sesame_api::AccountId;
use thiserror::Error;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the verification pipeline.
///
/// Every variant aborts the pipeline at the step that produced it; no
/// partial account resolution or session state survives a failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Token or referrer missing from the request.
    #[error("the request could not be processed")]
    BadRequest,

    /// Token does not have the expected structure.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The `site` claim does not cover the requesting host.
    #[error("token payload does not match the request host")]
    SiteMismatch,

    /// The identity provider rejected the token.
    #[error("token is invalid: provider returned status {0}")]
    TokenInvalid(u16),

    /// The identity provider could not be reached.
    #[error("verification unavailable: {0}")]
    VerificationUnavailable(String),

    /// The verified email is outside the trusted provider domain.
    #[error("identity {0} is not from the trusted provider domain")]
    UntrustedIdentity(String),

    /// Mapping is enforced and no account carries the verified email.
    #[error("no account mapped to {0}")]
    NoMappedAccount(String),

    /// The configured default account does not exist in the store.
    #[error("default account {0} is missing from the account store")]
    DefaultAccountMissing(AccountId),
}
