//! Client registration and authorization integration tests
//!
//! These tests exercise the registry and validator together, then drive the
//! same scenarios through the axum router end-to-end.

use authfront::config::Config;
use authfront::errors::{AuthorizationError, RegistrationError, RejectionReason};
use authfront::http::{AppState, build_router};
use authfront::oauth::{
    AuthorizationParams, AuthorizationValidator, ClientRegistry, ClientSecret,
    hashing::{Argon2SecretHasher, HashCost},
};
use authfront::storage::{ClientStore, inmemory::MemoryClientStore};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const REDIRECT_URL: &str = "https://app.example/cb";

fn test_cost() -> HashCost {
    HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

fn test_registry() -> (Arc<ClientRegistry>, Arc<MemoryClientStore>) {
    let storage = Arc::new(MemoryClientStore::new());
    let hasher =
        Arc::new(Argon2SecretHasher::new(test_cost(), Some(b"pepper".to_vec())).unwrap());
    let registry = Arc::new(ClientRegistry::new(storage.clone(), hasher));
    (registry, storage)
}

fn test_router(registry: Arc<ClientRegistry>) -> Router {
    let config = Arc::new(Config {
        version: "test".to_string(),
        http_port: "3000".to_string().try_into().unwrap(),
        http_static_path: format!("{}/static", env!("CARGO_MANIFEST_DIR")),
        storage_backend: "memory".to_string(),
        database_url: None,
        secret_hash_cost: test_cost().into(),
        secret_hash_pepper: Some("pepper".to_string()).into(),
    });

    build_router(AppState {
        config,
        client_registry: registry,
        validator: AuthorizationValidator::new(),
    })
}

fn params(client_id: &str, redirect_url: &str, scopes: &str) -> AuthorizationParams {
    AuthorizationParams {
        client_id: Some(client_id.to_string()),
        redirect_url: Some(redirect_url.to_string()),
        response_type: Some("code".to_string()),
        scopes: Some(scopes.to_string()),
    }
}

async fn rejection(registry: &ClientRegistry, params: &AuthorizationParams) -> RejectionReason {
    match AuthorizationValidator::new().validate(params, registry).await {
        Err(AuthorizationError::Rejected(reason)) => reason,
        other => panic!("expected rejection, got {:?}", other),
    }
}

fn register_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/clients")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authorize_request(query: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/authorize?{}", query))
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_registration_and_authorization_scenarios() {
    let (registry, _) = test_registry();
    let client_id = registry
        .register(&ClientSecret::new("s3cret"), REDIRECT_URL)
        .await
        .unwrap()
        .to_string();

    // Accepted
    let accepted = AuthorizationValidator::new()
        .validate(&params(&client_id, REDIRECT_URL, "openid profile"), &*registry)
        .await
        .unwrap();
    assert_eq!(accepted.client.client_id.to_string(), client_id);
    assert_eq!(accepted.client.redirect_url, REDIRECT_URL);

    // Missing openid
    assert_eq!(
        rejection(&registry, &params(&client_id, REDIRECT_URL, "profile")).await,
        RejectionReason::ScopeNotSupported
    );

    // Trailing slash on the redirect URL
    assert_eq!(
        rejection(&registry, &params(&client_id, "https://app.example/cb/", "openid")).await,
        RejectionReason::RedirectMismatch
    );

    // Unknown client
    assert_eq!(
        rejection(
            &registry,
            &params("00000000-0000-4000-8000-000000000000", REDIRECT_URL, "openid")
        )
        .await,
        RejectionReason::UnknownClient
    );
}

#[tokio::test]
async fn test_duplicate_registration_keeps_first_client() {
    let (registry, storage) = test_registry();

    let first = registry
        .register(&ClientSecret::new("first"), REDIRECT_URL)
        .await
        .unwrap();
    let second = registry
        .register(&ClientSecret::new("second"), REDIRECT_URL)
        .await;

    assert!(matches!(second, Err(RegistrationError::DuplicateRedirectUrl)));
    assert_eq!(storage.count_clients().await.unwrap(), 1);

    let client = registry
        .find_by_id(&first.to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(
        registry
            .verify_secret(&client, &ClientSecret::new("first"))
            .await
            .unwrap()
    );
    assert!(
        !registry
            .verify_secret(&client, &ClientSecret::new("second"))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_http_register_then_authorize() {
    let (registry, _) = test_registry();
    let router = test_router(registry);

    let response = router
        .clone()
        .oneshot(register_request(json!({
            "client_secret": "s3cret",
            "redirect_url": REDIRECT_URL,
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let client_id = body["client_id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(authorize_request(&format!(
            "client_id={}&redirect_url=https%3A%2F%2Fapp.example%2Fcb&response_type=code&scopes=openid%20profile",
            client_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<html"));

    let response = router
        .oneshot(authorize_request(&format!(
            "client_id={}&redirect_url=https%3A%2F%2Fapp.example%2Fcb%2F&response_type=code&scopes=openid",
            client_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid redirect_url");
}

#[tokio::test]
async fn test_http_duplicate_registration_is_conflict() {
    let (registry, _) = test_registry();
    let router = test_router(registry);
    let body = json!({
        "client_secret": "s3cret",
        "redirect_url": REDIRECT_URL,
    });

    let first = router
        .clone()
        .oneshot(register_request(body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router.oneshot(register_request(body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let error: Value = serde_json::from_str(&body_text(second).await).unwrap();
    assert_eq!(error, json!({ "error": "already exists" }));
}

#[tokio::test]
async fn test_http_invalid_registration_requests() {
    let (registry, storage) = test_registry();
    let router = test_router(registry);

    let invalid_bodies = [
        json!({ "redirect_url": REDIRECT_URL }),
        json!({ "client_secret": "", "redirect_url": REDIRECT_URL }),
        json!({ "client_secret": "s3cret" }),
        json!({ "client_secret": "s3cret", "redirect_url": "/relative/cb" }),
    ];

    for body in invalid_bodies {
        let response = router
            .clone()
            .oneshot(register_request(body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);

        let error: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(error["error"], "invalid_request");
    }

    let response = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/clients")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(storage.count_clients().await.unwrap(), 0);
}

#[tokio::test]
async fn test_http_authorize_rejection_messages() {
    let (registry, _) = test_registry();
    let client_id = registry
        .register(&ClientSecret::new("s3cret"), REDIRECT_URL)
        .await
        .unwrap();
    let router = test_router(registry);
    let redirect = "https%3A%2F%2Fapp.example%2Fcb";

    let cases = [
        (
            format!("client_id={}&redirect_url={}&response_type=code", client_id, redirect),
            "Missing required query parameters",
        ),
        (
            format!(
                "client_id=not-a-uuid&redirect_url={}&response_type=code&scopes=openid",
                redirect
            ),
            "Invalid client_id",
        ),
        (
            format!(
                "client_id={}&redirect_url={}&response_type=token&scopes=openid",
                client_id, redirect
            ),
            "Response type not supported",
        ),
        (
            format!(
                "client_id={}&redirect_url={}&response_type=code&scopes=profile",
                client_id, redirect
            ),
            "Not an openid request",
        ),
    ];

    for (query, expected) in cases {
        let response = router
            .clone()
            .oneshot(authorize_request(&query))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {}", query);
        assert_eq!(body_text(response).await, expected);
    }
}
