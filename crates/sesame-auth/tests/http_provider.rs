//! HTTP provider round-trips against a mock identity provider.

#![cfg(feature = "fetch-reqwest")]

use std::time::Duration;

use sesame_auth::{Error, HttpIdentityProvider, IdentityProvider, ProviderResponse};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "h.eyJzaXRlIjoiZXhhbXBsZS5jb20ifQ.sig";

fn provider() -> HttpIdentityProvider {
    HttpIdentityProvider::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn verified_token_returns_the_body_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verify"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("user@mellenger.com"))
        .mount(&server)
        .await;

    let referrer = format!("{}/", server.uri());
    let response = provider().verify(&referrer, TOKEN).await.unwrap();
    assert_eq!(
        response,
        ProviderResponse::Verified("user@mellenger.com".to_string())
    );
}

#[tokio::test]
async fn non_200_status_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verify"))
        .respond_with(ResponseTemplate::new(404).set_body_string("ignored body"))
        .mount(&server)
        .await;

    let referrer = format!("{}/", server.uri());
    let response = provider().verify(&referrer, TOKEN).await.unwrap();
    assert_eq!(response, ProviderResponse::Rejected(404));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_failure() {
    // Nothing listens on this port.
    let err = provider()
        .verify("http://127.0.0.1:9/", TOKEN)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::VerificationUnavailable(_)));
}
