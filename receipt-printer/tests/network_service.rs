// receipt-printer/tests/network_service.rs
// Print service client against a local HTTP server

use std::sync::{Arc, Mutex};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use receipt_printer::{NetworkPrintService, PrintError};
use serde_json::Value;
use tokio::net::TcpListener;

type Captured = Arc<Mutex<Vec<Value>>>;

async fn accept(State(captured): State<Captured>, Json(body): Json<Value>) -> StatusCode {
    captured.lock().unwrap().push(body);
    StatusCode::OK
}

async fn reject() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn(app: Router) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

#[tokio::test]
async fn test_accepted_job_posts_payload() {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/print", post(accept))
        .with_state(captured.clone());
    let port = spawn(app).await;

    let service = NetworkPrintService::new("127.0.0.1", port).unwrap();
    service.send("TOTAL 19.00 SAR\n", 2, 58).await.unwrap();

    let bodies = captured.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        serde_json::json!({"text": "TOTAL 19.00 SAR\n", "copies": 2, "width": 58})
    );
}

#[tokio::test]
async fn test_zero_copies_sends_one() {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/print", post(accept))
        .with_state(captured.clone());
    let port = spawn(app).await;

    let service = NetworkPrintService::new("127.0.0.1", port).unwrap();
    service.send("x", 0, 80).await.unwrap();

    assert_eq!(captured.lock().unwrap()[0]["copies"], 1);
}

#[tokio::test]
async fn test_server_error_is_service_unavailable() {
    let port = spawn(Router::new().route("/print", post(reject))).await;

    let service = NetworkPrintService::new("127.0.0.1", port).unwrap();
    let err = service.send("x", 1, 58).await.unwrap_err();

    assert!(matches!(err, PrintError::ServiceUnavailable(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_unreachable_service() {
    // Reserve a port, then free it so nothing is listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let service = NetworkPrintService::new("127.0.0.1", port).unwrap();
    let err = service.send("x", 1, 58).await.unwrap_err();

    assert!(matches!(err, PrintError::ServiceUnavailable(_)));
    assert!(!err.is_transport());
}
