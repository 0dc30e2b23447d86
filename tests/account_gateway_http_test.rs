use serde_json::json;
use socios_ddd::adapters::http::HttpAccountStatusGateway;
use socios_ddd::domain::{AccountId, MemberId};
use socios_ddd::ports::{AccountStatusGateway, GatewayError};
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// ヘルパー関数
// ============================================================================

fn gateway_for(server: &MockServer) -> HttpAccountStatusGateway {
    HttpAccountStatusGateway::new(server.uri(), Duration::from_millis(500))
        .expect("Failed to build gateway")
}

async fn mount_member_accounts(
    server: &MockServer,
    member_id: MemberId,
    response: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path(format!("/cuentas/socio/{}", member_id)))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// has_active_accounts
// ============================================================================

#[tokio::test]
async fn test_only_cancelled_accounts_are_not_active() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(
        &server,
        member_id,
        ResponseTemplate::new(200).set_body_json(json!([
            { "id": Uuid::new_v4(), "numeroCuenta": "001-123456789", "estado": "CANCELADA" },
            { "id": Uuid::new_v4(), "numeroCuenta": "001-987654321", "estado": "cancelada" },
        ])),
    )
    .await;

    let result = gateway_for(&server).has_active_accounts(member_id).await;

    assert!(!result.unwrap());
}

#[tokio::test]
async fn test_any_non_cancelled_account_is_active() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(
        &server,
        member_id,
        ResponseTemplate::new(200).set_body_json(json!([
            { "estado": "CANCELADA" },
            { "estado": "SUSPENDIDA" },
        ])),
    )
    .await;

    let result = gateway_for(&server).has_active_accounts(member_id).await;

    assert!(result.unwrap());
}

#[tokio::test]
async fn test_no_accounts_is_not_active() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(
        &server,
        member_id,
        ResponseTemplate::new(200).set_body_json(json!([])),
    )
    .await;

    assert!(
        !gateway_for(&server)
            .has_active_accounts(member_id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_null_body_is_not_active() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(
        &server,
        member_id,
        ResponseTemplate::new(200).set_body_raw("null", "application/json"),
    )
    .await;

    assert!(
        !gateway_for(&server)
            .has_active_accounts(member_id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_server_error_is_surfaced() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(&server, member_id, ResponseTemplate::new(500)).await;

    let result = gateway_for(&server).has_active_accounts(member_id).await;

    assert!(matches!(result, Err(GatewayError::UnexpectedStatus(500))));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(
        &server,
        member_id,
        ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"),
    )
    .await;

    let result = gateway_for(&server).has_active_accounts(member_id).await;

    assert!(matches!(result, Err(GatewayError::Decode(_))));
}

#[tokio::test]
async fn test_account_without_status_is_active() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(
        &server,
        member_id,
        ResponseTemplate::new(200).set_body_json(json!([
            { "estado": "CANCELADA" },
            { "saldo": 10.0 },
        ])),
    )
    .await;

    let result = gateway_for(&server).has_active_accounts(member_id).await;

    assert!(result.unwrap());
}

#[tokio::test]
async fn test_account_with_null_status_is_active() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(
        &server,
        member_id,
        ResponseTemplate::new(200).set_body_json(json!([{ "estado": null }])),
    )
    .await;

    let result = gateway_for(&server).has_active_accounts(member_id).await;

    assert!(result.unwrap());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    let member_id = MemberId::new();
    mount_member_accounts(
        &server,
        member_id,
        ResponseTemplate::new(200)
            .set_body_json(json!([]))
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let gateway = HttpAccountStatusGateway::new(server.uri(), Duration::from_millis(100))
        .expect("Failed to build gateway");
    let result = gateway.has_active_accounts(member_id).await;

    assert!(matches!(result, Err(GatewayError::Timeout)));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // 何も待ち受けていないポート
    let gateway = HttpAccountStatusGateway::new("http://127.0.0.1:9", Duration::from_millis(500))
        .expect("Failed to build gateway");

    let result = gateway.has_active_accounts(MemberId::new()).await;

    assert!(matches!(
        result,
        Err(GatewayError::Transport(_)) | Err(GatewayError::Timeout)
    ));
}

// ============================================================================
// is_account_active
// ============================================================================

#[tokio::test]
async fn test_account_is_active_only_when_exactly_activa() {
    let server = MockServer::start().await;
    let active = AccountId::from_uuid(Uuid::new_v4());
    let suspended = AccountId::from_uuid(Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path(format!("/cuentas/{}", active)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "estado": "Activa" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/cuentas/{}", suspended)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "estado": "SUSPENDIDA" })),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);

    assert!(gateway.is_account_active(active).await.unwrap());
    assert!(!gateway.is_account_active(suspended).await.unwrap());
}

#[tokio::test]
async fn test_unknown_account_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .is_account_active(AccountId::from_uuid(Uuid::new_v4()))
        .await;

    assert!(matches!(result, Err(GatewayError::UnexpectedStatus(404))));
}
