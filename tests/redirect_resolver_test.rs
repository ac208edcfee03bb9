// Redirect resolver integration tests
//
// Copyright (C) 2025 Marc Rivero López
// Licensed under the GNU General Public License v3.0

mod common;

use trustharvest::config::NetworkSettings;
use trustharvest::http::RedirectResolver;
use trustharvest::tls::TlsProtocol;
use trustharvest::{ErrorPolicy, HarvestError};
use url::Url;

fn resolver() -> RedirectResolver {
    RedirectResolver::new(TlsProtocol::default(), &NetworkSettings::default()).unwrap()
}

fn url(base: &str, path: &str) -> Url {
    Url::parse(&format!("{}{}", base, path)).unwrap()
}

#[tokio::test]
async fn test_chain_of_redirects_is_followed_to_the_end() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let _a = server
        .mock("GET", "/a")
        .with_status(302)
        .with_header("location", &format!("{}/b", base))
        .create_async()
        .await;
    let _b = server
        .mock("GET", "/b")
        .with_status(301)
        .with_header("location", &format!("{}/c", base))
        .create_async()
        .await;
    let _c = server.mock("GET", "/c").with_status(200).create_async().await;

    let chain = resolver().resolve(&url(&base, "/a")).await.unwrap();

    assert_eq!(
        chain,
        vec![url(&base, "/a"), url(&base, "/b"), url(&base, "/c")]
    );
}

#[tokio::test]
async fn test_redirect_cycle_stops_without_repeating() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let _a = server
        .mock("GET", "/a")
        .with_status(302)
        .with_header("location", &format!("{}/b", base))
        .create_async()
        .await;
    let _b = server
        .mock("GET", "/b")
        .with_status(302)
        .with_header("location", &format!("{}/a", base))
        .create_async()
        .await;

    let chain = resolver().resolve(&url(&base, "/a")).await.unwrap();

    assert_eq!(chain, vec![url(&base, "/a"), url(&base, "/b")]);
}

#[tokio::test]
async fn test_relative_location_is_resolved_against_current_url() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let _a = server
        .mock("GET", "/dir/a")
        .with_status(307)
        .with_header("location", "b")
        .create_async()
        .await;
    let _b = server.mock("GET", "/dir/b").with_status(204).create_async().await;

    let chain = resolver().resolve(&url(&base, "/dir/a")).await.unwrap();

    assert_eq!(chain, vec![url(&base, "/dir/a"), url(&base, "/dir/b")]);
}

#[tokio::test]
async fn test_missing_location_header_is_technical_error() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let _a = server.mock("GET", "/a").with_status(302).create_async().await;

    let err = resolver().resolve(&url(&base, "/a")).await.unwrap_err();

    assert!(matches!(
        err,
        HarvestError::MissingRedirectLocation { status: 302, .. }
    ));
}

#[tokio::test]
async fn test_non_http_redirect_target_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let _a = server
        .mock("GET", "/a")
        .with_status(302)
        .with_header("location", "ftp://files.example.com/pub")
        .create_async()
        .await;

    let err = resolver().resolve(&url(&base, "/a")).await.unwrap_err();

    assert!(matches!(err, HarvestError::UnsupportedRedirectScheme { .. }));
}

#[tokio::test]
async fn test_redirect_limit_is_enforced() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let mut mocks = Vec::new();
    for (from, to) in [("/1", "/2"), ("/2", "/3"), ("/3", "/4")] {
        mocks.push(
            server
                .mock("GET", from)
                .with_status(302)
                .with_header("location", &format!("{}{}", base, to))
                .create_async()
                .await,
        );
    }

    let settings = NetworkSettings {
        max_redirects: 2,
        ..NetworkSettings::default()
    };
    let resolver = RedirectResolver::new(TlsProtocol::default(), &settings).unwrap();
    let err = resolver.resolve(&url(&base, "/1")).await.unwrap_err();

    assert!(matches!(err, HarvestError::TooManyRedirects { limit: 2, .. }));
}

#[tokio::test]
async fn test_continue_policy_keeps_reachable_hops() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let dead = common::closed_port().await;

    let _a = server
        .mock("GET", "/a")
        .with_status(302)
        .with_header("location", &format!("http://127.0.0.1:{}/gone", dead.port()))
        .create_async()
        .await;

    let policy = ErrorPolicy::continue_on_error();
    let chain = resolver()
        .resolve_with(&url(&base, "/a"), &policy)
        .await
        .unwrap();

    assert_eq!(chain, vec![url(&base, "/a")]);
    assert_eq!(policy.skipped(), 1);
}

#[tokio::test]
async fn test_abort_policy_propagates_connection_failure() {
    let dead = common::closed_port().await;
    let start = Url::parse(&format!("http://127.0.0.1:{}/", dead.port())).unwrap();

    let err = resolver()
        .resolve_with(&start, &ErrorPolicy::abort())
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Connection { .. }));
}
