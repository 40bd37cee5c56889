use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use serde_json::json;
use serial_test::serial;
use std::env;

use shift_scheduler::config::Config;
use shift_scheduler::routes::{configure, json_config};
use shift_scheduler::solve::AppState;
use shift_scheduler::{DoctorId, ScheduleResponse};

struct TestServer {
    handle: ServerHandle,
    port: u16,
}

impl TestServer {
    fn start() -> Self {
        let state = web::Data::new(AppState::new(Config::default()));
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .app_data(json_config(64 * 1024))
                .configure(configure)
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind test server");

        let port = server.addrs()[0].port();
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        TestServer { handle, port }
    }

    fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn post_schedule(server: &TestServer, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/schedule", server.base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

async fn error_message(response: reqwest::Response) -> String {
    let body: serde_json::Value = response
        .json()
        .await
        .expect("Failed to parse JSON response");
    body["error"]
        .as_str()
        .expect("error should be a string")
        .to_string()
}

#[actix_web::test]
async fn test_health_endpoint() {
    let server = TestServer::start();

    let response = reqwest::get(format!("{}/health", server.base_url()))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("Failed to read response body");
    assert_eq!(body, "OK");

    server.stop().await;
}

#[actix_web::test]
async fn test_schedule_range_request() {
    let server = TestServer::start();

    let response = post_schedule(
        &server,
        json!({
            "firstDay": "2024-01-01",
            "lastDay": "2024-01-04",
            "doctors": ["ann", 2],
            "numShifts": [2, 2],
            "dailyShifts": [1, 1, 1, 1],
            "availabilityMatrix": [[5, 0, 5, 0], [0, 5, 0, 5]]
        }),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: ScheduleResponse = response.json().await.expect("Failed to parse response");

    let ann = DoctorId::Text("ann".into());
    let two = DoctorId::Number(2);
    let days: Vec<(&String, &Vec<DoctorId>)> = body.schedule.iter().collect();
    assert_eq!(
        days,
        vec![
            (&"1 January 2024 Monday".to_string(), &vec![ann.clone()]),
            (&"2 January 2024 Tuesday".to_string(), &vec![two.clone()]),
            (&"3 January 2024 Wednesday".to_string(), &vec![ann]),
            (&"4 January 2024 Thursday".to_string(), &vec![two]),
        ]
    );

    server.stop().await;
}

#[actix_web::test]
async fn test_schedule_leap_month_request() {
    let server = TestServer::start();

    let response = post_schedule(
        &server,
        json!({
            "year": 2024,
            "month": 2,
            "doctors": ["A", "B"],
            "numShifts": [15, 14],
            "dailyShifts": vec![1; 29],
            "availabilityMatrix": [vec![1; 29], vec![1; 29]]
        }),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: ScheduleResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.schedule.len(), 29);

    let rosters: Vec<&Vec<DoctorId>> = body.schedule.values().collect();
    assert!(rosters.iter().all(|r| !r.is_empty()));
    for (name, quota) in [("A", 15), ("B", 14)] {
        let doctor = DoctorId::Text(name.into());
        let worked: Vec<bool> = rosters.iter().map(|r| r.contains(&doctor)).collect();
        assert_eq!(worked.iter().filter(|w| **w).count(), quota);
        assert!(!worked.windows(2).any(|w| w[0] && w[1]));
    }

    server.stop().await;
}

#[actix_web::test]
async fn test_schedule_invalid_json() {
    let server = TestServer::start();

    let response = reqwest::Client::new()
        .post(format!("{}/schedule", server.base_url()))
        .header("content-type", "application/json")
        .body("invalid json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    assert!(!error_message(response).await.is_empty());

    server.stop().await;
}

#[actix_web::test]
async fn test_schedule_mismatched_lengths() {
    let server = TestServer::start();

    let response = post_schedule(
        &server,
        json!({
            "firstDay": "2024-01-01",
            "lastDay": "2024-01-03",
            "doctors": ["ann"],
            "numShifts": [1],
            "dailyShifts": [1, 1],
            "availabilityMatrix": [[1, 1, 1]]
        }),
    )
    .await;

    assert_eq!(response.status(), 400);
    assert!(error_message(response).await.contains("dailyShifts"));

    server.stop().await;
}

#[actix_web::test]
async fn test_schedule_inverted_range() {
    let server = TestServer::start();

    let response = post_schedule(
        &server,
        json!({
            "firstDay": "2024-01-05",
            "lastDay": "2024-01-01",
            "doctors": ["ann"],
            "numShifts": [1],
            "dailyShifts": [],
            "availabilityMatrix": [[]]
        }),
    )
    .await;

    assert_eq!(response.status(), 400);
    assert!(error_message(response).await.contains("precedes"));

    server.stop().await;
}

#[actix_web::test]
async fn test_schedule_infeasible() {
    let server = TestServer::start();

    let response = post_schedule(
        &server,
        json!({
            "firstDay": "2024-01-01",
            "lastDay": "2024-01-02",
            "doctors": ["ann"],
            "numShifts": [3],
            "dailyShifts": [1, 1],
            "availabilityMatrix": [[1, 1]]
        }),
    )
    .await;

    assert_eq!(response.status(), 422);
    assert!(error_message(response).await.contains("feasible"));

    server.stop().await;
}

#[actix_web::test]
async fn test_nonexistent_endpoint() {
    let server = TestServer::start();

    let response = reqwest::get(format!("{}/nonexistent", server.base_url()))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    server.stop().await;
}

#[actix_web::test]
async fn test_docs_endpoint_and_root_redirect() {
    let server = TestServer::start();

    let response = reqwest::get(format!("{}/docs", server.base_url()))
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("Failed to read response body");
    assert!(body.contains("Shift Scheduler API Documentation"));
    assert!(body.contains("<!DOCTYPE html"));

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client");
    let response = client
        .get(format!("{}/", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 302);
    assert_eq!(response.headers()["location"], "/docs");

    server.stop().await;
}

#[test]
#[serial]
fn test_config_from_env() {
    env::set_var("PORT", "9123");
    env::set_var("SOLVE_TIMEOUT_SECS", "7");
    env::set_var("SCHEDULE_CACHE_SIZE", "3");

    let config = Config::from_env();
    assert_eq!(config.port, 9123);
    assert_eq!(config.solve_timeout_secs, 7);
    assert_eq!(config.cache_size, 3);

    env::remove_var("PORT");
    env::remove_var("SOLVE_TIMEOUT_SECS");
    env::remove_var("SCHEDULE_CACHE_SIZE");
}

#[test]
#[serial]
fn test_config_from_env_ignores_malformed_values() {
    env::set_var("PORT", "not-a-port");
    env::set_var("SOLVER", "nope");

    let config = Config::from_env();
    assert_eq!(config.port, Config::default().port);
    assert_eq!(config.solver, Config::default().solver);

    env::remove_var("PORT");
    env::remove_var("SOLVER");
}
