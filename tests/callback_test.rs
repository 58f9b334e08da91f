//! Tests for the local OAuth callback listener.

use std::net::SocketAddr;
use std::time::Duration;

use drive_copy::callback::AuthorizationResponse;
use drive_copy::{CallbackListener, DriveError, Env, OAuthFlow};
use tokio::time::Instant;

async fn get(addr: SocketAddr, query: &str) -> (u16, String) {
    let url = format!("http://{}/{}", addr, query);
    let response = reqwest::get(&url).await.unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

fn soon() -> Instant {
    Instant::now() + Duration::from_millis(200)
}

fn flow() -> OAuthFlow {
    OAuthFlow::new(&Env {
        client_id: "client-id".to_string(),
        client_secret: "secret".to_string(),
        redirect_url: "http://127.0.0.1/".to_string(),
        cookie_key: "cookie".to_string(),
        listen_port: 0,
    })
}

#[tokio::test]
async fn forwards_code_and_state() {
    let mut listener = CallbackListener::bind(0).await.unwrap();
    let addr = listener.local_addr();

    let (status, body) = get(addr, "?code=abc&state=xyz").await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");

    let response = listener.next_response(soon()).await;
    assert_eq!(
        response,
        Some(AuthorizationResponse {
            code: "abc".to_string(),
            state: "xyz".to_string(),
        })
    );
    listener.shutdown().await;
}

#[tokio::test]
async fn serves_callback_on_any_path() {
    let mut listener = CallbackListener::bind(0).await.unwrap();
    let addr = listener.local_addr();

    let (status, body) = get(addr, "oauth2callback?code=abc&state=xyz").await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");

    let response = listener.next_response(soon()).await;
    assert_eq!(
        response,
        Some(AuthorizationResponse {
            code: "abc".to_string(),
            state: "xyz".to_string(),
        })
    );
    listener.shutdown().await;
}

#[tokio::test]
async fn ignores_requests_without_code_or_state() {
    let mut listener = CallbackListener::bind(0).await.unwrap();
    let addr = listener.local_addr();

    for query in ["", "?code=abc", "?state=xyz", "?code=&state=xyz"] {
        let (status, body) = get(addr, query).await;
        assert_eq!(status, 200);
        assert_eq!(body, "OK");
    }

    assert!(listener.next_response(soon()).await.is_none());
    listener.shutdown().await;
}

#[tokio::test]
async fn holds_only_one_pending_response() {
    let mut listener = CallbackListener::bind(0).await.unwrap();
    let addr = listener.local_addr();

    get(addr, "?code=first&state=s").await;
    let (status, _) = get(addr, "?code=second&state=s").await;
    assert_eq!(status, 200);

    let response = listener.next_response(soon()).await.unwrap();
    assert_eq!(response.code, "first");
    assert!(listener.next_response(soon()).await.is_none());
    listener.shutdown().await;
}

#[tokio::test]
async fn wait_for_code_skips_foreign_state() {
    let flow = flow();
    let state = flow.new_state().unwrap();
    let mut listener = CallbackListener::bind(0).await.unwrap();
    let addr = listener.local_addr();

    let valid = format!("?code=good&state={}", state);
    let callbacks = async {
        get(addr, "?code=evil&state=forged").await;
        // The forged response must be consumed before the slot frees up.
        tokio::time::sleep(Duration::from_millis(100)).await;
        get(addr, &valid).await;
    };
    let (code, ()) = tokio::join!(
        listener.wait_for_code(&flow, &state, Duration::from_secs(5)),
        callbacks
    );

    assert_eq!(code.unwrap(), "good");
    listener.shutdown().await;
}

#[tokio::test]
async fn wait_for_code_times_out() {
    let flow = flow();
    let state = flow.new_state().unwrap();
    let mut listener = CallbackListener::bind(0).await.unwrap();

    let err = listener
        .wait_for_code(&flow, &state, Duration::from_millis(100))
        .await
        .unwrap_err();

    assert!(matches!(err, DriveError::AuthTimeout(_)));
    listener.shutdown().await;
}
