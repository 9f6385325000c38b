//! Integration test: local HTTP server standing in for the GitHub API and the
//! release download host; resolver, curl fetcher and renderer run for real.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use brewgen_core::checksum::sha256_hex;
use brewgen_core::coordinator::{fetch_all, FailurePolicy};
use brewgen_core::error::{BrewError, FetchError, ResolveError};
use brewgen_core::fetch::{CurlFetcher, DigestFetcher, HttpOptions};
use brewgen_core::formula::{render_formula, DEFAULT_TEMPLATE};
use brewgen_core::pipeline::{FormulaRequest, Pipeline};
use brewgen_core::release::{GithubResolver, ReleaseAsset, ReleaseResolver};
use common::asset_server::{self, Route};

fn listing_json(base: &str, tag: &str, names: &[&str]) -> Vec<u8> {
    let assets: Vec<String> = names
        .iter()
        .map(|n| {
            format!(
                r#"{{"name": "{n}", "browser_download_url": "{base}/download/{tag}/{n}"}}"#
            )
        })
        .collect();
    format!(r#"[{{"tag_name": "{tag}", "assets": [{}]}}]"#, assets.join(",")).into_bytes()
}

fn request() -> FormulaRequest {
    FormulaRequest {
        owner: "acme".to_string(),
        repo: "tool".to_string(),
        name: "tool".to_string(),
        binary: "tool".to_string(),
        description: "Acme tool".to_string(),
        homepage: None,
    }
}

fn pipeline(base: &str, policy: FailurePolicy) -> Pipeline {
    Pipeline::new(
        Arc::new(GithubResolver::new(base, HttpOptions::default())),
        Arc::new(CurlFetcher::default()),
        policy,
    )
}

#[tokio::test]
async fn end_to_end_two_platforms() {
    let linux = b"linux tool bytes".to_vec();
    let mac: Vec<u8> = (0u8..=255).cycle().take(200 * 1024).collect();

    // First start a server for the assets, then one for the API that points at it.
    let mut asset_routes = HashMap::new();
    asset_routes.insert(
        "/download/v1.4.0/tool.amd64-linux.zip".to_string(),
        Route::Body(linux.clone()),
    );
    asset_routes.insert(
        "/download/v1.4.0/tool.arm64-macos.zip".to_string(),
        Route::Body(mac.clone()),
    );
    let assets = asset_server::start(asset_routes);

    let mut api_routes = HashMap::new();
    api_routes.insert(
        "/repos/acme/tool/releases".to_string(),
        Route::Body(listing_json(
            &assets.base_url,
            "v1.4.0",
            &["tool.amd64-linux.zip", "tool.arm64-macos.zip"],
        )),
    );
    let api = asset_server::start(api_routes);

    let p = pipeline(&api.base_url, FailurePolicy::Abort);
    let meta = p.collect(&request()).await.unwrap();
    assert_eq!(meta.version, "1.4.0");
    assert_eq!(meta.homepage, "https://github.com/acme/tool");
    assert_eq!(
        meta.assets.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["amd64-linux", "arm64-macos"]
    );
    assert_eq!(meta.assets["amd64-linux"].sha256(), Some(sha256_hex(&linux).as_str()));
    assert_eq!(meta.assets["arm64-macos"].sha256(), Some(sha256_hex(&mac).as_str()));
    assert_eq!(assets.requests(), 2);

    let out = render_formula(DEFAULT_TEMPLATE, &meta).unwrap();
    assert!(out.contains(&format!("sha256 \"{}\"", sha256_hex(&mac))));
    assert!(out.contains(&assets.url("/download/v1.4.0/tool.amd64-linux.zip")));
}

#[tokio::test]
async fn no_releases_fails_without_downloads() {
    let mut routes = HashMap::new();
    routes.insert(
        "/repos/acme/tool/releases".to_string(),
        Route::Body(b"[]".to_vec()),
    );
    let api = asset_server::start(routes);

    let err = pipeline(&api.base_url, FailurePolicy::Abort)
        .collect(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, BrewError::Resolution(ResolveError::NoReleases { .. })));
    assert_eq!(api.requests(), 1);
}

#[test]
fn listing_http_error() {
    let api = asset_server::start(HashMap::new());
    let err = GithubResolver::new(&api.base_url, HttpOptions::default())
        .latest_release("acme", "missing")
        .unwrap_err();
    assert!(matches!(err, ResolveError::Http { status: 404, .. }), "{err}");
}

#[tokio::test]
async fn one_of_three_fails_aborts_or_skips() {
    let mut routes = HashMap::new();
    routes.insert("/a/tool.amd64-linux.zip".to_string(), Route::Body(b"a".to_vec()));
    routes.insert("/a/tool.arm64-linux.zip".to_string(), Route::Status(500));
    routes.insert("/a/tool.arm64-macos.zip".to_string(), Route::Body(b"c".to_vec()));
    let server = asset_server::start(routes);
    let names = ["tool.amd64-linux.zip", "tool.arm64-linux.zip", "tool.arm64-macos.zip"];
    let assets: Vec<ReleaseAsset> = names
        .iter()
        .map(|n| ReleaseAsset {
            name: n.to_string(),
            download_url: server.url(&format!("/a/{}", n)),
        })
        .collect();
    let fetcher: Arc<dyn DigestFetcher> = Arc::new(CurlFetcher::default());

    let err = fetch_all(&assets, Arc::clone(&fetcher), FailurePolicy::Abort)
        .await
        .unwrap_err();
    match err {
        BrewError::Fetch {
            classifier, source, ..
        } => {
            assert_eq!(classifier, "arm64-linux");
            assert!(matches!(source, FetchError::Http { status: 500 }));
        }
        other => panic!("expected Fetch, got {other:?}"),
    }

    let map = fetch_all(&assets, fetcher, FailurePolicy::Skip).await.unwrap();
    assert_eq!(map.len(), 2);
    assert!(!map.contains_key("arm64-linux"));
}

#[tokio::test]
async fn failed_asset_means_no_formula() {
    let path = |n: &str| format!("/download/v3.0.0/{}", n);
    let mut asset_routes = HashMap::new();
    asset_routes.insert(path("tool.amd64-linux.zip"), Route::Body(b"a".to_vec()));
    asset_routes.insert(path("tool.arm64-linux.zip"), Route::Status(502));
    asset_routes.insert(path("tool.arm64-macos.zip"), Route::Body(b"c".to_vec()));
    let assets = asset_server::start(asset_routes);

    let mut api_routes = HashMap::new();
    api_routes.insert(
        "/repos/acme/tool/releases".to_string(),
        Route::Body(listing_json(
            &assets.base_url,
            "v3.0.0",
            &["tool.amd64-linux.zip", "tool.arm64-linux.zip", "tool.arm64-macos.zip"],
        )),
    );
    let api = asset_server::start(api_routes);

    let err = pipeline(&api.base_url, FailurePolicy::Abort)
        .render(&request(), DEFAULT_TEMPLATE)
        .await
        .unwrap_err();
    assert!(
        matches!(err, BrewError::Fetch { ref classifier, .. } if classifier == "arm64-linux"),
        "{err:?}"
    );
    assert_eq!(assets.requests(), 3);

    let formula = pipeline(&api.base_url, FailurePolicy::Skip)
        .render(&request(), DEFAULT_TEMPLATE)
        .await
        .unwrap();
    assert_eq!(formula.skipped.len(), 1);
    assert!(matches!(formula.skipped[0].error, FetchError::Http { status: 502 }));
    assert!(formula.text.contains(&assets.url(&path("tool.arm64-macos.zip"))));
}

#[test]
fn truncated_body_is_read_error() {
    let mut routes = HashMap::new();
    routes.insert(
        "/tool.amd64-linux.zip".to_string(),
        Route::Truncated {
            body: vec![7u8; 100],
            announced: 1000,
        },
    );
    let server = asset_server::start(routes);
    let err = CurlFetcher::default()
        .fetch_digest(&server.url("/tool.amd64-linux.zip"))
        .unwrap_err();
    assert!(matches!(err, FetchError::Read { .. }), "{err}");
}

#[test]
fn redirect_is_followed_and_hashed() {
    let body = b"object storage bytes".to_vec();
    let mut routes = HashMap::new();
    routes.insert(
        "/download/tool.amd64-linux.zip".to_string(),
        Route::Redirect("/objects/123".to_string()),
    );
    routes.insert("/objects/123".to_string(), Route::Body(body.clone()));
    let server = asset_server::start(routes);
    let digest = CurlFetcher::default()
        .fetch_digest(&server.url("/download/tool.amd64-linux.zip"))
        .unwrap();
    assert_eq!(digest, sha256_hex(&body));
}
