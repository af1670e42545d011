//! End-to-end booking flow over HTTP: login, café/staff/shift setup,
//! self-booking, manager reassignment, bot dialog.

use chrono::{Duration, NaiveTime, Utc};
use serde_json::{Value, json};

use roster_server::auth::hash_password;
use roster_server::db::repository::staff;
use roster_server::utils::time::local_to_millis;
use roster_server::{Config, ServerState, build_app};
use shared::models::StaffRole;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    state: ServerState,
    _work_dir: tempfile::TempDir,
}

async fn spawn_server() -> TestServer {
    let work_dir = tempfile::tempdir().expect("temp dir");
    let config = Config::with_overrides(work_dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config)
        .await
        .expect("state initializes");

    let app = build_app(&state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        client: reqwest::Client::new(),
        state,
        _work_dir: work_dir,
    }
}

impl TestServer {
    async fn seed_admin(&self, chat_id: i64, password: &str) {
        let mut conn = self.state.pool().acquire().await.unwrap();
        staff::create(
            &mut conn,
            "Admin",
            "+10000000000",
            chat_id,
            StaffRole::Admin,
            Some(hash_password(password).unwrap()),
            None,
        )
        .await
        .expect("seed admin");
    }

    async fn login(&self, chat_id: i64, password: &str) -> String {
        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "chat_id": chat_id, "password": password }))
            .send()
            .await
            .expect("login request");
        assert!(response.status().is_success(), "login should succeed");
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().expect("token").to_string()
    }

    async fn post(&self, token: &str, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("request");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, token: &str, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .expect("request");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}

#[tokio::test]
async fn full_booking_flow() {
    let server = spawn_server().await;
    server.seed_admin(1000, "espresso-secret").await;
    let token = server.login(1000, "espresso-secret").await;

    // Unauthenticated requests bounce off
    let bare = reqwest::Client::new()
        .get(format!("{}/api/cafes", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bare.status().as_u16(), 401);

    // Café with 08:00-20:00 hours
    let (status, cafe) = server
        .post(
            &token,
            "/api/cafes",
            json!({
                "name": "Aroma",
                "city": "Lisbon",
                "address": "1 Roast Street",
                "open_time": "08:00",
                "close_time": "20:00",
                "phone": "+10000000001",
            }),
        )
        .await;
    assert_eq!(status, 201);
    let cafe_id = cafe["id"].as_i64().unwrap();

    // Two baristas; they start unconfirmed
    let mut barista_ids = Vec::new();
    for (name, chat_id) in [("Mia", 2001), ("Lee", 2002)] {
        let (status, barista) = server
            .post(
                &token,
                "/api/staff",
                json!({
                    "name": name,
                    "phone": "+10000000002",
                    "chat_id": chat_id,
                    "role": "BARISTA",
                    "cafe_id": cafe_id,
                }),
            )
            .await;
        assert_eq!(status, 201);
        assert_eq!(barista["is_active"], Value::Bool(false));
        let id = barista["id"].as_i64().unwrap();
        let (status, confirmed) = server
            .post(&token, &format!("/api/staff/{id}/confirm"), json!({}))
            .await;
        assert_eq!(status, 200);
        assert_eq!(confirmed["is_active"], Value::Bool(true));
        barista_ids.push(id);
    }

    // Tomorrow 09:00-13:00 (inside the café's hours)
    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    let start = local_to_millis(tomorrow, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 0);
    let end = local_to_millis(tomorrow, NaiveTime::from_hms_opt(13, 0, 0).unwrap(), 0);
    let (status, shift) = server
        .post(
            &token,
            "/api/shifts",
            json!({
                "cafe_id": cafe_id,
                "start_time": start,
                "end_time": end,
                "capacity": 1,
            }),
        )
        .await;
    assert_eq!(status, 201);
    let shift_id = shift["id"].as_i64().unwrap();

    // A shift outside operating hours is refused
    let bad_start = local_to_millis(tomorrow, NaiveTime::from_hms_opt(7, 0, 0).unwrap(), 0);
    let bad_end = local_to_millis(tomorrow, NaiveTime::from_hms_opt(21, 0, 0).unwrap(), 0);
    let (status, _) = server
        .post(
            &token,
            "/api/shifts",
            json!({
                "cafe_id": cafe_id,
                "start_time": bad_start,
                "end_time": bad_end,
                "capacity": 1,
            }),
        )
        .await;
    assert_eq!(status, 400);

    // Manager books Mia in; the shift fills up
    let (status, reservation) = server
        .post(
            &token,
            "/api/reservations",
            json!({ "shift_id": shift_id, "staff_id": barista_ids[0] }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(reservation["status"], "RESERVED");

    let (status, summary) = server
        .get(&token, &format!("/api/shifts/{shift_id}/summary"))
        .await;
    assert_eq!(status, 200);
    assert_eq!(summary["free_slots"].as_i64(), Some(0));

    // Booking Lee too would exceed the headcount
    let (status, _) = server
        .post(
            &token,
            "/api/reservations",
            json!({ "shift_id": shift_id, "staff_id": barista_ids[1] }),
        )
        .await;
    assert_eq!(status, 422);

    // Reassign the slot to Lee instead
    let (status, pending) = server
        .post(
            &token,
            &format!("/api/shifts/{shift_id}/change-booking"),
            json!({ "old_staff_id": barista_ids[0], "new_staff_id": barista_ids[1] }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(pending["status"], "ONCONFIRM");

    let (_, summary) = server
        .get(&token, &format!("/api/shifts/{shift_id}/summary"))
        .await;
    assert_eq!(summary["onconfirm"].as_i64(), Some(1));
    assert_eq!(summary["cancelled"].as_i64(), Some(1));

    // Lee sees the pending assignment in the bot and accepts it
    let (status, reply) = server
        .post(&token, "/api/bot/update", json!({ "chat_id": 2002, "text": "my" }))
        .await;
    assert_eq!(status, 200);
    assert!(reply["text"].as_str().unwrap().contains("awaiting your confirmation"));

    let (status, reply) = server
        .post(
            &token,
            "/api/bot/update",
            json!({ "chat_id": 2002, "text": "accept 1" }),
        )
        .await;
    assert_eq!(status, 200);
    assert!(reply["text"].as_str().unwrap().contains("confirmed"));

    let (_, summary) = server
        .get(&token, &format!("/api/shifts/{shift_id}/summary"))
        .await;
    assert_eq!(summary["reserved"].as_i64(), Some(1));
    assert_eq!(summary["onconfirm"].as_i64(), Some(0));
}
