//! HTTP surface tests, driving the router with `tower::ServiceExt::oneshot`.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use barber_booking::application::RegisterClientCommand;
use common::{phone, TestApp};

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn booking(phone_number: &str, name: Option<&str>, time: &str) -> Value {
    json!({
        "phone": phone_number,
        "name": name,
        "service": "Corte",
        "date": "2024-01-10",
        "time": time,
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn booking_registers_new_client_and_returns_created() {
    let app = TestApp::new();
    let (status, body) = send(
        &app,
        json_request("POST", "/api/bookings", booking("11987650000", Some("Ana Souza"), "10:00")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["appointment"]["service"], "Corte");
    assert_eq!(body["appointment"]["date"], "2024-01-10");
    assert_eq!(body["appointment"]["time"], "10:00");
    assert_eq!(body["appointment"]["status"], "scheduled");
    assert!(body["confirmation_message"].as_str().unwrap().contains("Ana"));
    assert_eq!(app.clients.len().await, 1);
}

#[tokio::test]
async fn unknown_client_without_name_is_not_found() {
    let app = TestApp::new();
    let (status, body) = send(
        &app,
        json_request("POST", "/api/bookings", booking("11987650000", None, "10:00")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(app.appointments.all().await.is_empty());
}

#[tokio::test]
async fn taken_slot_returns_conflict_with_next_available() {
    let app = TestApp::new();
    let first = json_request("POST", "/api/bookings", booking("11987650000", Some("Ana Souza"), "10:00"));
    assert_eq!(send(&app, first).await.0, StatusCode::CREATED);

    let second = json_request("POST", "/api/bookings", booking("11987650001", Some("Bruno Lima"), "10:00"));
    let (status, body) = send(&app, second).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "SLOT_UNAVAILABLE");
    assert_eq!(body["error"]["details"]["next_available"], "10:30");
}

#[tokio::test]
async fn malformed_time_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = send(
        &app,
        json_request("POST", "/api/bookings", booking("11987650000", Some("Ana"), "25:99")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["field"], "time");
}

#[tokio::test]
async fn sunday_is_flagged_closed() {
    let app = TestApp::new();
    let (status, body) = send(&app, get("/api/availability?date=2024-01-14&service=Corte")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["closed"], true);
    assert!(body["slots"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, get("/api/conflicts?date=2024-01-14&time=10:00&service=Corte")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["weekday"], "domingo");
}

#[tokio::test]
async fn availability_marks_booked_slots() {
    let app = TestApp::new();
    let request = json_request("POST", "/api/bookings", booking("11987650000", Some("Ana Souza"), "10:00"));
    assert_eq!(send(&app, request).await.0, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/availability?date=2024-01-10&service=Corte")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["closed"], false);

    let slots = body["slots"].as_array().unwrap();
    let slot = |time: &str| slots.iter().find(|s| s["time"] == time).cloned().unwrap();
    assert_eq!(slot("09:00")["available"], true);
    assert_eq!(slot("09:45")["available"], false);
    assert_eq!(slot("10:00")["available"], false);
    assert_eq!(slot("10:15")["available"], false);
    assert_eq!(slot("10:30")["available"], true);
    assert_eq!(body["work_intervals"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_service_is_not_found() {
    let app = TestApp::new();
    let (status, body) = send(&app, get("/api/availability?date=2024-01-10&service=Luzes")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SERVICE_NOT_FOUND");
}

#[tokio::test]
async fn conflict_check_suggests_next_slot() {
    let app = TestApp::new();
    let request = json_request("POST", "/api/bookings", booking("11987650000", Some("Ana Souza"), "10:00"));
    send(&app, request).await;

    let (status, body) = send(&app, get("/api/conflicts?date=2024-01-10&time=10:15&service=Corte")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_conflict"], true);
    assert_eq!(body["next_available"], "10:30");

    let (_, free) = send(&app, get("/api/conflicts?date=2024-01-10&time=11:00&service=Corte")).await;
    assert_eq!(free["has_conflict"], false);
}

#[tokio::test]
async fn client_appointments_and_status_update() {
    let app = TestApp::new();
    let request = json_request("POST", "/api/bookings", booking("11987650000", Some("Ana Souza"), "10:00"));
    let (_, created) = send(&app, request).await;
    let id = created["appointment"]["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, get("/api/clients/11987650000/appointments")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["name"], "Ana Souza");
    assert_eq!(listed["appointments"].as_array().unwrap().len(), 1);

    let uri = format!("/api/appointments/{}/status", id);
    let (status, cancelled) =
        send(&app, json_request("PATCH", &uri, json!({ "status": "cancelled" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    // Cancelled appointments free their window
    let (_, check) = send(&app, get("/api/conflicts?date=2024-01-10&time=10:00&service=Corte")).await;
    assert_eq!(check["has_conflict"], false);

    let (status, _) =
        send(&app, json_request("PATCH", &uri, json!({ "status": "scheduled" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_update_for_unknown_id_is_not_found() {
    let app = TestApp::new();
    let uri = format!("/api/appointments/{}/status", uuid::Uuid::new_v4());
    let (status, _) = send(&app, json_request("PATCH", &uri, json!({ "status": "completed" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_messages_walk_through_a_booking() {
    let app = TestApp::new();
    app.register
        .handle(RegisterClientCommand {
            name: "Ana Souza".to_string(),
            phone: phone(0),
        })
        .await
        .unwrap();

    let say = |text: &str| {
        json_request(
            "POST",
            "/api/chat/messages",
            json!({ "phone": phone(0).as_str(), "text": text }),
        )
    };

    let (status, first) = send(&app, say("quero um corte hoje às 10h")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["state"], "confirm");
    assert_eq!(first["intent"], "book");

    let (_, done) = send(&app, say("sim")).await;
    assert_eq!(done["state"], "done");
    assert_eq!(done["appointment"]["time"], "10:00");
    assert_eq!(app.appointments.all().await.len(), 1);
}

#[tokio::test]
async fn chat_accepts_structured_actions() {
    let app = TestApp::new();
    let request = json_request(
        "POST",
        "/api/chat/messages",
        json!({ "phone": "11987650000", "action": { "action": "list_services" } }),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "list_services");
    assert!(body["reply"].as_str().unwrap().contains("Corte e Barba"));
}

#[tokio::test]
async fn chat_requires_exactly_one_input() {
    let app = TestApp::new();
    let both = json_request(
        "POST",
        "/api/chat/messages",
        json!({ "phone": "11987650000", "text": "oi", "action": { "action": "list_services" } }),
    );
    assert_eq!(send(&app, both).await.0, StatusCode::BAD_REQUEST);

    let neither = json_request("POST", "/api/chat/messages", json!({ "phone": "11987650000" }));
    assert_eq!(send(&app, neither).await.0, StatusCode::BAD_REQUEST);
}
