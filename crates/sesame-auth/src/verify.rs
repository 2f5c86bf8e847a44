//! Token verification and account mapping.
//!
//! Trust is anchored in the identity provider's own verification endpoint: a
//! token is accepted only after the provider re-confirms it over HTTP. No
//! signature is checked locally.

use std::time::Duration;

use async_trait::async_trait;
use sesame_api::{Account, AccountStore, FALLBACK_ACCOUNT_ID, MappingPolicy};

use crate::token::{TokenPayload, decode_payload};
use crate::{Error, Result};

/// Path appended to the referrer base URL to reach the provider's
/// verification endpoint.
pub const VERIFY_PATH: &str = "api/verify";

/// Options for the verification pipeline.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Suffix the verified email must end with.
    pub trusted_email_suffix: String,

    /// Timeout for the outbound verification call.
    pub request_timeout: Duration,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            trusted_email_suffix: "@mellenger.com".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Outcome of asking the identity provider about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    /// 200 response; the body is the verified email address.
    Verified(String),
    /// Any non-200 status.
    Rejected(u16),
}

/// Remote re-verification call against the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Ask the provider whether `token` is live.
    ///
    /// Implementations return [`Error::VerificationUnavailable`] for
    /// transport failures and must not retry.
    async fn verify(&self, referrer: &str, token: &str) -> Result<ProviderResponse>;
}

/// [`IdentityProvider`] backed by a reqwest client.
#[cfg(feature = "fetch-reqwest")]
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
}

#[cfg(feature = "fetch-reqwest")]
impl HttpIdentityProvider {
    /// Build a provider client with a bounded request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::VerificationUnavailable(e.to_string()))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "fetch-reqwest")]
#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, referrer: &str, token: &str) -> Result<ProviderResponse> {
        // The referrer is used verbatim as the base URL.
        let url = format!("{referrer}{VERIFY_PATH}");
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| Error::VerificationUnavailable(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Ok(ProviderResponse::Rejected(status.as_u16()));
        }

        let email = response
            .text()
            .await
            .map_err(|e| Error::VerificationUnavailable(e.to_string()))?;
        Ok(ProviderResponse::Verified(email))
    }
}

/// Runs the verification pipeline end to end.
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    opts: VerifyOptions,
}

impl Verifier {
    /// Build a verifier with explicit options.
    pub fn new(opts: VerifyOptions) -> Self {
        Self { opts }
    }

    /// Verify `token` and resolve the local account it signs in.
    ///
    /// Steps run strictly in order, the first failure aborting the call:
    /// input presence, payload decoding, site binding, remote
    /// re-verification, email domain allow-listing, account resolution.
    pub async fn verify_and_resolve<P, S>(
        &self,
        token: &str,
        referrer: &str,
        request_host: &str,
        policy: &MappingPolicy,
        provider: &P,
        store: &S,
    ) -> Result<Account>
    where
        P: IdentityProvider + ?Sized,
        S: AccountStore + ?Sized,
    {
        let email = self
            .verify_token(token, referrer, request_host, provider)
            .await?;
        resolve_account(&email, policy, store)
    }

    /// Verify `token` and return the provider-confirmed email address.
    pub async fn verify_token<P>(
        &self,
        token: &str,
        referrer: &str,
        request_host: &str,
        provider: &P,
    ) -> Result<String>
    where
        P: IdentityProvider + ?Sized,
    {
        if token.is_empty() || referrer.is_empty() {
            return Err(Error::BadRequest);
        }

        let payload = decode_payload(token)?;
        ensure_site_binding(&payload, request_host)?;

        let email = match provider.verify(referrer, token).await? {
            ProviderResponse::Verified(body) => body.trim().to_string(),
            ProviderResponse::Rejected(status) => return Err(Error::TokenInvalid(status)),
        };

        if !email.ends_with(&self.opts.trusted_email_suffix) {
            return Err(Error::UntrustedIdentity(email));
        }

        Ok(email)
    }
}

/// The `site` claim must contain the requesting host; equality is not
/// required. Runs before any network traffic.
fn ensure_site_binding(payload: &TokenPayload, request_host: &str) -> Result<()> {
    match payload.site() {
        Some(site) if site.contains(request_host) => Ok(()),
        _ => Err(Error::SiteMismatch),
    }
}

/// Map a verified email onto exactly one local account.
pub fn resolve_account<S>(email: &str, policy: &MappingPolicy, store: &S) -> Result<Account>
where
    S: AccountStore + ?Sized,
{
    if policy.user_mapping {
        // First match wins when several accounts share the email.
        if let Some(account) = store.accounts_by_email(email).into_iter().next() {
            return Ok(account);
        }
        if policy.enforce_user_mapping {
            return Err(Error::NoMappedAccount(email.to_string()));
        }
    }

    let id = policy
        .default_user
        .clone()
        .unwrap_or_else(|| FALLBACK_ACCOUNT_ID.to_string());
    store
        .account_by_id(&id)
        .ok_or(Error::DefaultAccountMissing(id))
}
