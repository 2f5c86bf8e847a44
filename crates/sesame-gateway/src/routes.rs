//! HTTP surface of the bridge.
//!
//! Both endpoints are thin wrappers around the pipeline in `sesame-auth`.
//! The verify endpoint always answers with a redirect to the site root;
//! failures are logged, never rendered.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use sesame_api::{Account, AccountStore, MappingPolicy};
use sesame_auth::{
    HttpIdentityProvider, IdentityProvider, SessionCookie, Verifier, VerifyOptions,
};
use sesame_connectors::InMemoryAccountStore;
use sesame_core::Settings;

use crate::session::SessionRegistry;

pub struct AppState {
    verifier: Verifier,
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn AccountStore>,
    policy: MappingPolicy,
    public_host: Option<String>,
    cookie: SessionCookie,
    sessions: SessionRegistry,
}

/// Build the router from validated settings.
pub fn app(settings: &Settings) -> anyhow::Result<Router> {
    let timeout = Duration::from_millis(settings.provider.request_timeout_ms);
    let provider = HttpIdentityProvider::new(timeout)?;
    let store = InMemoryAccountStore::new(
        settings
            .accounts
            .iter()
            .map(|seed| Account {
                id: seed.id.clone(),
                email: seed.email.clone(),
            })
            .collect(),
    );

    let state = AppState {
        verifier: Verifier::new(VerifyOptions {
            trusted_email_suffix: settings.provider.trusted_email_suffix.clone(),
            request_timeout: timeout,
        }),
        provider: Arc::new(provider),
        store: Arc::new(store),
        policy: settings.mapping.clone(),
        public_host: settings.public_host.clone(),
        cookie: SessionCookie::default(),
        sessions: SessionRegistry::default(),
    };

    Ok(Router::new()
        .route("/sesame/check", get(check))
        .route("/sesame/verify", get(verify))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state)))
}

/// Liveness probe; succeeds whenever the service is up.
async fn check() -> &'static str {
    "Sesame enabled"
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(default)]
    token: String,
}

/// Verify the provider token and sign the browser in.
///
/// Always redirects to the site root: a failed attempt looks exactly like a
/// successful one from the outside.
async fn verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
    headers: HeaderMap,
) -> Response {
    let referrer = header_value(&headers, header::REFERER);
    let request_host = state
        .public_host
        .clone()
        .unwrap_or_else(|| header_value(&headers, header::HOST));

    match state
        .verifier
        .verify_and_resolve(
            &params.token,
            &referrer,
            &request_host,
            &state.policy,
            state.provider.as_ref(),
            state.store.as_ref(),
        )
        .await
    {
        Ok(account) => {
            let session_id = state.sessions.start(account.id.clone());
            info!(account = %account.id, email = %account.email, "signed in");
            (
                [(header::SET_COOKIE, state.cookie.issue(&session_id))],
                Redirect::to("/"),
            )
                .into_response()
        }
        Err(err) => {
            error!(%err, "verification failed");
            Redirect::to("/").into_response()
        }
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
