//! Dialog integration tests over both API surfaces

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method, Request, StatusCode},
};
use serde_json::{json, Value};

use crate::common::{
    body_text, parse_body, plain_request, public_request, CapturedLogs, TestApp, ANN, ANN_TOKEN,
    BOB, BOB_TOKEN, CARL, CARL_TOKEN,
};

const DIALOG_CONTENT_TYPE: &str = "application/json; utf-8";
const ERROR_CONTENT_TYPE: &str = "application/json; charset=utf-8";

fn public_send(token: &str, peer: &str, text: &str) -> Request<Body> {
    public_request(
        Method::POST,
        &format!("/dialog/{}/send", peer),
        token,
        Some(json!({ "text": text })),
    )
}

fn public_list(token: &str, peer: &str) -> Request<Body> {
    public_request(Method::GET, &format!("/dialog/{}/list", peer), token, None)
}

fn internal_send(body: Value) -> Request<Body> {
    plain_request(Method::POST, "/int/dialog/send", Some(body))
}

fn internal_list(from: &str, to: &str) -> Request<Body> {
    plain_request(
        Method::GET,
        &format!("/int/dialog/list?from={}&to={}", from, to),
        None,
    )
}

mod test_public_surface {
    use super::*;

    #[tokio::test]
    async fn test_send_then_list_from_both_sides() {
        let app = TestApp::new();

        let resp = app.call(public_send(ANN_TOKEN, BOB, "hi bob")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], DIALOG_CONTENT_TYPE);
        assert_eq!(body_text(resp).await, "");

        let resp = app.call(public_send(BOB_TOKEN, ANN, "hi ann")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let expected = json!([
            {"from": ANN, "to": BOB, "text": "hi bob"},
            {"from": BOB, "to": ANN, "text": "hi ann"},
        ]);

        let resp = app.call(public_list(ANN_TOKEN, BOB)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], DIALOG_CONTENT_TYPE);
        assert_eq!(parse_body(resp).await, expected);

        let resp = app.call(public_list(BOB_TOKEN, ANN)).await;
        assert_eq!(parse_body(resp).await, expected);
    }

    #[tokio::test]
    async fn test_list_only_shows_the_pair() {
        let app = TestApp::new();

        app.call(public_send(ANN_TOKEN, BOB, "to bob")).await;
        app.call(public_send(ANN_TOKEN, CARL, "to carl")).await;
        app.call(public_send(CARL_TOKEN, BOB, "carl to bob")).await;

        let resp = app.call(public_list(CARL_TOKEN, ANN)).await;
        assert_eq!(
            parse_body(resp).await,
            json!([{"from": ANN, "to": CARL, "text": "to carl"}])
        );
    }

    #[tokio::test]
    async fn test_empty_conversation_is_empty_array() {
        let app = TestApp::new();

        let resp = app.call(public_list(ANN_TOKEN, BOB)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "[]");
    }

    #[tokio::test]
    async fn test_empty_text_is_invalid_request() {
        let app = TestApp::new();

        let resp = app.call(public_send(ANN_TOKEN, BOB, "")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[CONTENT_TYPE], ERROR_CONTENT_TYPE);
        assert_eq!(
            parse_body(resp).await,
            json!({"message": "required parameter \"text\" is missing", "code": 100})
        );
        assert!(app.store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_authorization_is_missing_token() {
        let app = TestApp::new();

        for header in ["", "Token abc", "bearer abc", "Bearer a Bearer b"] {
            let req = Request::builder()
                .method(Method::POST)
                .uri(format!("/dialog/{}/send", BOB))
                .header(AUTHORIZATION, header)
                .body(Body::from(json!({"text": "hi"}).to_string()))
                .unwrap();

            let resp = app.call(req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);
            assert_eq!(
                parse_body(resp).await,
                json!({"message": "bearer token is missing", "code": 104})
            );
        }
        assert!(app.store.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_token_is_invalid_token() {
        let app = TestApp::new();

        let resp = app.call(public_send("unknown-token", BOB, "hi")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            parse_body(resp).await,
            json!({"message": "invalid token", "code": 104})
        );
    }

    #[tokio::test]
    async fn test_token_is_trimmed() {
        let app = TestApp::new();

        let req = Request::builder()
            .uri(format!("/dialog/{}/list", BOB))
            .header(AUTHORIZATION, format!("Bearer   {}  ", ANN_TOKEN))
            .body(Body::empty())
            .unwrap();

        let resp = app.call(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_resolver_outage_is_opaque_server_error() {
        let app = TestApp::new();
        app.resolver.fail_with("connection refused by identity service");

        let resp = app.call(public_send(ANN_TOKEN, BOB, "hi")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            parse_body(resp).await,
            json!({"message": "internal server error", "code": 101})
        );
        assert!(app.store.is_empty());
    }

    #[tokio::test]
    async fn test_peer_must_be_lowercase_uuid() {
        let app = TestApp::new();

        let upper = BOB.to_uppercase();
        for peer in ["bob", "22222222-2222-4222-8222-22222222222", upper.as_str()] {
            let resp = app.call(public_send(ANN_TOKEN, peer, "hi")).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "peer {:?}", peer);
        }
        assert!(app.store.is_empty());
    }
}

mod test_internal_surface {
    use super::*;

    #[tokio::test]
    async fn test_send_then_list() {
        let app = TestApp::new();

        let resp = app
            .call(internal_send(json!({"from": ANN, "to": BOB, "text": "hi"})))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], DIALOG_CONTENT_TYPE);
        assert_eq!(body_text(resp).await, "");

        let resp = app.call(internal_list(ANN, BOB)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], DIALOG_CONTENT_TYPE);

        let body = parse_body(resp).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);

        let id = items[0]["id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
        assert_eq!(
            items[0],
            json!({"id": id, "from": ANN, "to": BOB, "text": "hi"})
        );
    }

    #[tokio::test]
    async fn test_messages_sent_internally_show_up_publicly() {
        let app = TestApp::new();

        app.call(internal_send(json!({"from": BOB, "to": ANN, "text": "ping"})))
            .await;
        app.call(public_send(ANN_TOKEN, BOB, "pong")).await;

        let resp = app.call(internal_list(BOB, ANN)).await;
        let body = parse_body(resp).await;
        let texts: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["text"].as_str().unwrap())
            .collect();
        assert_eq!(texts, vec!["ping", "pong"]);

        let resp = app.call(public_list(BOB_TOKEN, ANN)).await;
        let body = parse_body(resp).await;
        assert!(body[0].get("id").is_none());
    }

    #[tokio::test]
    async fn test_send_validation_order() {
        let app = TestApp::new();
        let ghost = "99999999-9999-4999-8999-999999999999";

        let cases = vec![
            (json!({"from": "x", "to": "y"}), r#"required parameter "text" is missing"#),
            (json!({"to": BOB, "text": "hi"}), r#"required parameter "from" is missing"#),
            (json!({"from": "ann", "to": BOB, "text": "hi"}), r#"invalid request parameter "from""#),
            (json!({"from": ghost, "text": "hi"}), r#"invalid request parameter "from""#),
            (json!({"from": ANN, "text": "hi"}), r#"required parameter "to" is missing"#),
            (json!({"from": ANN, "to": "bob", "text": "hi"}), r#"invalid request parameter "to""#),
            (json!({"from": ANN, "to": ghost, "text": "hi"}), r#"invalid request parameter "to""#),
        ];

        for (body, description) in cases {
            let resp = app.call(internal_send(body.clone())).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(resp.headers()[CONTENT_TYPE], ERROR_CONTENT_TYPE);
            assert_eq!(
                parse_body(resp).await,
                json!({"error": "invalid_request", "error_description": description}),
                "body {}",
                body
            );
        }
        assert!(app.store.is_empty());
    }

    #[tokio::test]
    async fn test_resolver_outage_is_server_error() {
        let app = TestApp::new();
        app.resolver.fail_with("identity service down");

        let resp = app
            .call(internal_send(json!({"from": ANN, "to": BOB, "text": "hi"})))
            .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            parse_body(resp).await,
            json!({"error": "server_error", "error_description": "internal server error"})
        );
    }

    #[tokio::test]
    async fn test_list_validation_and_case_insensitive_keys() {
        let app = TestApp::new();

        let resp = app.call(internal_list("", BOB)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            parse_body(resp).await["error_description"],
            r#"required parameter "from" is missing"#
        );

        let resp = app.call(internal_list(ANN, "nope")).await;
        assert_eq!(
            parse_body(resp).await["error_description"],
            r#"invalid request parameter "to""#
        );

        let upper = "A3BB189E-8BF9-4888-9912-ACE4E6543002";
        let resp = app.call(internal_list(upper, BOB)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "[]");
    }

    #[tokio::test]
    async fn test_concurrent_sends_are_all_stored() {
        let app = TestApp::new();

        let sends = (0..20).map(|i| {
            app.call(internal_send(
                json!({"from": ANN, "to": BOB, "text": format!("message {}", i)}),
            ))
        });
        let responses = futures::future::join_all(sends).await;
        assert!(responses.iter().all(|r| r.status() == StatusCode::OK));

        let resp = app.call(internal_list(BOB, ANN)).await;
        assert_eq!(parse_body(resp).await.as_array().unwrap().len(), 20);
        assert_eq!(app.store.len(), 20);
    }
}

mod test_audit {
    use super::*;

    #[tokio::test]
    async fn test_audit_logs_exchange_without_the_token() {
        let app = TestApp::new();
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let resp = app.call(public_send(ANN_TOKEN, BOB, "audited text")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], DIALOG_CONTENT_TYPE);
        assert_eq!(body_text(resp).await, "");

        let resp = app.call(public_list(ANN_TOKEN, BOB)).await;
        assert_eq!(
            parse_body(resp).await,
            json!([{"from": ANN, "to": BOB, "text": "audited text"}])
        );

        let output = logs.contents();
        assert!(output.contains("Request/response exchange"));
        assert!(output.contains(&format!("/dialog/{}/send", BOB)));
        assert!(output.contains("audited text"));
        assert!(!output.contains(ANN_TOKEN));
    }

    #[tokio::test]
    async fn test_audit_relays_error_responses_unchanged() {
        let app = TestApp::new();
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let resp = app.call(public_send("unknown-token", BOB, "hi")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[CONTENT_TYPE], ERROR_CONTENT_TYPE);
        assert_eq!(
            parse_body(resp).await,
            json!({"message": "invalid token", "code": 104})
        );

        let output = logs.contents();
        assert!(output.contains("InvalidToken: invalid token"));
        assert!(output.contains("status=401"));
    }
}
