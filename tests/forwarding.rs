//! End-to-end forwarding behaviour through a real listener.

use std::time::Duration;

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_no_trigger_passes_through_to_downstream() {
    let downstream = common::start_mock_upstream().await;
    let upstream = common::start_mock_upstream().await;

    let mut config = common::config_with_headers(&[("X-Api-Key", "secret")]);
    config.downstream.url = Some(downstream.url(""));
    let proxy = common::start_proxy(config).await;

    let res = common::client()
        .post(proxy.url("/local/path?q=1"))
        .header("x-client", "abc")
        .body("plain")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "plain");

    let seen = downstream.recorded();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].uri.path(), "/local/path");
    assert_eq!(seen[0].uri.query(), Some("q=1"));
    assert_eq!(seen[0].headers.get("x-client").unwrap(), "abc");
    // Overrides only apply to forwarded requests.
    assert!(seen[0].headers.get("x-api-key").is_none());

    assert!(upstream.recorded().is_empty());
}

#[tokio::test]
async fn test_no_trigger_without_downstream_is_404() {
    let proxy = common::start_proxy(common::config_with_headers(&[])).await;

    let res = common::client().get(proxy.url("/")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_forward_overrides_and_deletes_headers() {
    let upstream = common::start_mock_upstream().await;
    let proxy = common::start_proxy(common::config_with_headers(&[
        ("X-Api-Key", "secret"),
        ("X-Client", ""),
    ]))
    .await;

    let res = common::client()
        .get(proxy.url("/"))
        .header("location", upstream.url("/resource"))
        .header("x-client", "abc")
        .header("x-keep", "kept")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let seen = upstream.recorded();
    assert_eq!(seen.len(), 1);
    let outbound = &seen[0];
    assert_eq!(outbound.method, "GET");
    assert_eq!(outbound.uri.path(), "/resource");
    assert_eq!(outbound.headers.get("x-api-key").unwrap(), "secret");
    assert!(outbound.headers.get("x-client").is_none());
    assert_eq!(outbound.headers.get("x-keep").unwrap(), "kept");
    assert_eq!(
        outbound.headers.get("host").unwrap().to_str().unwrap(),
        upstream.addr.to_string()
    );
}

#[tokio::test]
async fn test_forwarded_request_carries_request_id() {
    let upstream = common::start_mock_upstream().await;
    let proxy = common::start_proxy(common::config_with_headers(&[])).await;

    let res = common::client()
        .get(proxy.url("/"))
        .header("location", upstream.url("/"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers().get("x-request-id").unwrap(), "req-42");
    assert_eq!(upstream.recorded()[0].headers.get("x-request-id").unwrap(), "req-42");
}

#[tokio::test]
async fn test_body_fidelity() {
    let upstream = common::start_mock_upstream().await;
    let proxy = common::start_proxy(common::config_with_headers(&[])).await;

    let payload: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    let res = common::client()
        .put(proxy.url("/"))
        .header("location", upstream.url("/upload"))
        .body(payload.clone())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(&res.bytes().await.unwrap()[..], &payload[..]);

    let seen = upstream.recorded();
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(&seen[0].body[..], &payload[..]);
}

#[tokio::test]
async fn test_response_fidelity() {
    let upstream = common::start_mock_upstream().await;
    let proxy = common::start_proxy(common::config_with_headers(&[])).await;

    let res = common::client()
        .post(proxy.url("/"))
        .header("location", upstream.url("/echo"))
        .body("response body from upstream")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers().get("x-upstream").unwrap(), "mock");
    assert_eq!(res.headers().get("x-empty").unwrap(), "");
    assert_eq!(res.text().await.unwrap(), "response body from upstream");
}

#[tokio::test]
async fn test_upstream_error_status_is_relayed_not_mapped() {
    let upstream = common::start_mock_upstream().await;
    let proxy = common::start_proxy(common::config_with_headers(&[])).await;

    for code in [404u16, 503] {
        let res = common::client()
            .get(proxy.url("/"))
            .header("location", upstream.url(&format!("/status/{code}")))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), code);
        assert_eq!(
            res.headers().get("x-upstream-status").unwrap(),
            code.to_string().as_str()
        );
        assert_eq!(res.text().await.unwrap(), format!("status {code}"));
    }
}

#[tokio::test]
async fn test_override_reload_applies_to_next_request() {
    let upstream = common::start_mock_upstream().await;
    let proxy = common::start_proxy(common::config_with_headers(&[("X-Api-Key", "old")])).await;

    proxy
        .config_updates
        .send(common::config_with_headers(&[("X-Api-Key", "new")]))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    common::client()
        .get(proxy.url("/"))
        .header("location", upstream.url("/"))
        .send()
        .await
        .unwrap();

    assert_eq!(upstream.recorded()[0].headers.get("x-api-key").unwrap(), "new");
}
