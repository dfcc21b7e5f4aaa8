// src/handlers/relay.rs
//
// Função de relay para o Telegram: o navegador chama esta rota (sem
// autenticação) e ela repassa a mensagem para a Bot API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use utoipa::ToSchema;

use crate::services::telegram::TelegramClient;

pub const RELAY_PATH: &str = "/functions/telegram-test";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    #[schema(example = "123456:ABC-DEF")]
    pub bot_token: Option<String>,
    /// Texto ou número, repassado como veio
    #[schema(value_type = Option<String>, example = "-1001234567890")]
    pub chat_id: Option<Value>,
    pub message: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

// Aceita chat como texto não vazio ou como número
fn present_chat_id(chat_id: Option<Value>) -> Option<Value> {
    chat_id.filter(|v| match v {
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
        _ => false,
    })
}

// POST /functions/telegram-test
#[utoipa::path(
    post,
    path = "/functions/telegram-test",
    tag = "Relay",
    request_body = RelayRequest,
    responses(
        (status = 200, description = "Resposta do Telegram, sem alterações"),
        (status = 400, description = "Token do bot e chat são obrigatórios"),
        (status = 500, description = "Corpo inválido ou falha de rede")
    )
)]
pub async fn telegram_test(
    State(client): State<TelegramClient>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, rejection.body_text());
        }
    };

    let bot_token = request.bot_token.filter(|t| !t.is_empty());
    let (bot_token, chat_id) = match (bot_token, present_chat_id(request.chat_id)) {
        (Some(token), Some(chat)) => (token, chat),
        _ => return error_response(StatusCode::BAD_REQUEST, "Bot token and chat ID are required"),
    };

    match client
        .send_message(&bot_token, &chat_id, request.message.as_deref())
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::warn!("Relay do Telegram falhou: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Router próprio do relay, com CORS liberado para qualquer origem.
pub fn router(client: TelegramClient) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .route(
            RELAY_PATH,
            post(telegram_test).options(|| async { StatusCode::OK }),
        )
        .layer(cors)
        .with_state(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::OriginalUri, http::HeaderValue};
    use axum_test::TestServer;
    use tokio::net::TcpListener;

    // Bot API falsa: devolve o caminho e o corpo recebidos
    async fn fake_telegram() -> String {
        async fn echo(OriginalUri(uri): OriginalUri, Json(body): Json<Value>) -> Json<Value> {
            Json(json!({ "ok": true, "path": uri.path(), "received": body }))
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().fallback(echo)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn relay_server(api_base: String) -> TestServer {
        TestServer::try_new(router(TelegramClient::new(api_base))).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn forwards_message_and_returns_upstream_body() {
        let server = relay_server(fake_telegram().await).await;

        let response = server
            .post(RELAY_PATH)
            .json(&json!({ "botToken": "123:abc", "chatId": -1001, "message": "<b>Oi</b>" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["ok"], true);
        assert_eq!(body["path"], "/bot123:abc/sendMessage");
        assert_eq!(body["received"]["chat_id"], -1001);
        assert_eq!(body["received"]["text"], "<b>Oi</b>");
        assert_eq!(body["received"]["parse_mode"], "HTML");
    }

    #[tokio::test]
    async fn empty_message_falls_back_to_default_text() {
        let server = relay_server(fake_telegram().await).await;

        let response = server
            .post(RELAY_PATH)
            .json(&json!({ "botToken": "123:abc", "chatId": "42" }))
            .await;

        let body: Value = response.json();
        assert_eq!(body["received"]["chat_id"], "42");
        assert_eq!(body["received"]["text"], "Test notification from your app!");
    }

    #[tokio::test]
    async fn token_and_chat_are_required() {
        let server = relay_server("http://127.0.0.1:1".into()).await;

        for body in [json!({ "chatId": "42" }), json!({ "botToken": "x", "chatId": "" }), json!({})] {
            let response = server.post(RELAY_PATH).json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["error"], "Bot token and chat ID are required");
        }
    }

    #[tokio::test]
    async fn unreadable_body_and_network_failure_are_500() {
        let server = relay_server("http://127.0.0.1:1".into()).await;

        let response = server.post(RELAY_PATH).text("não é json").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.json::<Value>()["error"].is_string());

        let response = server
            .post(RELAY_PATH)
            .json(&json!({ "botToken": "x", "chatId": "42" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let server = relay_server("http://127.0.0.1:1".into()).await;

        let response = server
            .method(Method::OPTIONS, RELAY_PATH)
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .add_header(
                header::ACCESS_CONTROL_REQUEST_METHOD,
                HeaderValue::from_static("POST"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
    }
}
