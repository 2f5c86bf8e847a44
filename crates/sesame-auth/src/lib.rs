//! sesame-auth
//!
//! The verification-and-mapping core of the Sesame SSO bridge. It covers
//! three recurring problems:
//!
//! - **Decoding the bearer token payload** (compact three-part format,
//!   base64url, no local signature check)
//! - **Verifying a token against the identity provider and mapping the
//!   verified identity onto a local account** (site binding, remote
//!   re-verification, email domain allow-listing, mapping policy)
//! - **Building the session cookie** (`__Host-` semantics, SameSite, etc.)
//!
//! The core API is `Verifier`, which runs the whole pipeline against an
//! `IdentityProvider` (HTTP-backed with the `fetch-reqwest` feature, or any
//! test double) and a read-only `AccountStore`.
//!
//! ## Quick start
//! ```no_run
//! use sesame_auth::{HttpIdentityProvider, Verifier, VerifyOptions};
//! use sesame_api::MappingPolicy;
//! use std::time::Duration;
//!
//! # async fn demo(store: &impl sesame_api::AccountStore) -> Result<(), Box<dyn std::error::Error>> {
//! let verifier = Verifier::new(VerifyOptions::default());
//! let provider = HttpIdentityProvider::new(Duration::from_secs(5))?;
//! let account = verifier.verify_and_resolve(
//!     "h.eyJ...",
//!     "https://id.example/",
//!     "relying.example.com",
//!     &MappingPolicy::default(),
//!     &provider,
//!     store,
//! ).await?;
//!
//! println!("signed in as {}", account.id);
//! # Ok(()) }
//! ```

#![forbid(unsafe_code)]

mod error;
mod session;
mod token;
mod verify;

pub use error::{Error, Result};
pub use session::{SameSite, SessionCookie};
pub use token::{TokenPayload, decode_payload};
#[cfg(feature = "fetch-reqwest")]
pub use verify::HttpIdentityProvider;
pub use verify::{
    IdentityProvider, ProviderResponse, VERIFY_PATH, Verifier, VerifyOptions, resolve_account,
};
