mod common;

use chrono::NaiveDate;
use melniz_client::db::Registration;
use melniz_client::navigation::{self, Route};
use melniz_client::{ApiClient, AppError, SessionContext};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn profile_body() -> serde_json::Value {
    json!({ "id": 42, "name": "Анна", "email": "anna@example.com", "appointments": [] })
}

#[actix_web::test]
async fn login_persists_session_and_authorizes_next_calls() {
    let (url, mock) = common::start(&[
        ("POST", "/login", 200, json!({ "token": "abc", "user": { "id": 42 } })),
        ("GET", "/profile", 200, profile_body()),
    ]);
    let session = SessionContext::in_memory();
    let api = ApiClient::new(&url, session.clone()).unwrap();

    let response = assert_ok!(api.login("anna@example.com", "secret").await);
    assert_eq!(response.user.id, 42);
    assert_eq!(assert_ok!(session.token().await).as_deref(), Some("abc"));
    assert_eq!(assert_ok!(session.user_id().await), Some(42));

    let profile = assert_ok!(api.get_profile().await);
    assert_eq!(profile.name, "Анна");

    let requests = mock.requests();
    assert_eq!(requests[0].authorization, None);
    assert_eq!(
        requests[0].body,
        json!({ "email": "anna@example.com", "password": "secret" })
    );
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer abc"));
    assert!(requests.iter().all(|r| r.request_id.is_some()));
}

#[actix_web::test]
async fn register_persists_session() {
    let (url, mock) = common::start(&[(
        "POST",
        "/register",
        200,
        json!({ "token": "new", "user": { "id": 7, "name": "Ольга" } }),
    )]);
    let session = SessionContext::in_memory();
    let api = ApiClient::new(&url, session.clone()).unwrap();

    let registration = Registration {
        name: "Ольга".into(),
        phone: "+79990000000".into(),
        email: "olga@example.com".into(),
        password: "secret".into(),
    };
    assert_ok!(api.register(&registration).await);

    assert_eq!(assert_ok!(session.user_id().await), Some(7));
    assert_eq!(
        mock.last().body,
        json!({ "name": "Ольга", "phone": "+79990000000", "email": "olga@example.com", "password": "secret" })
    );
}

#[actix_web::test]
async fn failed_login_leaves_session_empty() {
    let (url, _mock) = common::start(&[("POST", "/login", 401, json!({ "error": "invalid" }))]);
    let session = SessionContext::in_memory();
    let api = ApiClient::new(&url, session.clone()).unwrap();

    let err = assert_err!(api.login("anna@example.com", "wrong").await);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert_eq!(assert_ok!(session.current().await), None);
}

#[actix_web::test]
async fn schedule_is_requested_with_iso_date() {
    let (url, mock) = common::start(&[(
        "GET",
        "/employee/7/schedule",
        200,
        json!([
            { "id": 1, "employeeId": 7, "startTime": "2024-06-01T10:00:00.000Z", "isBooked": false },
            { "id": 2, "employeeId": 7, "startTime": "2024-06-01T11:00:00.000Z", "isBooked": true }
        ]),
    )]);
    let api = ApiClient::new(&url, SessionContext::in_memory()).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let slots = assert_ok!(api.get_schedule(7, date).await);
    assert_eq!(slots.len(), 2);
    assert!(slots[1].is_booked);
    assert_eq!(mock.last().query, "date=2024-06-01");
}

#[actix_web::test]
async fn catalog_and_appointment_endpoints() {
    let appointment = json!({
        "id": 10,
        "date": "2024-06-01T10:00:00Z",
        "procedure": { "id": 5, "name": "Массаж", "price": 3500 },
        "employee": { "id": 3, "name": "Мария" }
    });
    let (url, mock) = common::start(&[
        ("GET", "/procedures", 200, json!([{ "id": 5, "name": "Массаж", "description": "", "price": 3500, "image": "", "categoryId": 1 }])),
        ("GET", "/employee", 200, json!([{ "id": 3, "name": "Мария", "email": "m@example.com", "phone": "+7" }])),
        ("GET", "/appointment/", 200, json!([appointment.clone()])),
        ("GET", "/appointment/10", 200, appointment),
        ("POST", "/schedule/book", 200, json!({ "ok": true })),
    ]);
    let api = ApiClient::new(&url, SessionContext::in_memory()).unwrap();

    let procedures = assert_ok!(api.list_procedures().await);
    assert_eq!(procedures[0].category_id, Some(1));

    let employees = assert_ok!(api.list_employees().await);
    assert_eq!(employees[0].photo, None);

    assert_eq!(assert_ok!(api.list_appointments().await).len(), 1);
    assert_eq!(assert_ok!(api.get_appointment(10).await).procedure.price, 3500);

    assert_ok!(api.book_slot(12).await);
    assert_eq!(mock.last().body, json!({ "scheduleId": 12 }));
}

#[actix_web::test]
async fn server_errors_propagate_unchanged() {
    let (url, _mock) = common::start(&[("GET", "/procedures", 500, json!({ "error": "boom" }))]);
    let api = ApiClient::new(&url, SessionContext::in_memory()).unwrap();

    match assert_err!(api.list_procedures().await) {
        AppError::Http { status, body, operation } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(operation, "list_procedures");
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[actix_web::test]
async fn sign_out_calls_server_then_clears_session() {
    let (url, mock) = common::start(&[("POST", "/logout", 200, json!(null))]);
    let session = SessionContext::in_memory();
    assert_ok!(session.begin("abc", 42).await);
    let api = ApiClient::new(&url, session.clone()).unwrap();

    assert_eq!(assert_ok!(navigation::sign_out(&api).await), Route::Auth);
    assert_eq!(mock.last().authorization.as_deref(), Some("Bearer abc"));
    assert_eq!(assert_ok!(session.current().await), None);
}
