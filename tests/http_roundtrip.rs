use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use reminders::{
    client::{ClientError, HttpReminderApi, ReminderApi, ReminderCoordinator, TracingNotifier},
    config::DatabaseConfig,
    db::connection,
    models::{NewReminder, Priority},
    test_helpers::test_router,
};

async fn serve() -> String {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..Default::default()
    };
    let db = connection::connect(&cfg).await.unwrap();
    let app = test_router(db);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn new_reminder(name: &str, day: u32, time: &str) -> NewReminder {
    NewReminder {
        name: name.to_string(),
        description: format!("{name} notes"),
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        time: time.to_string(),
        priority: Priority::Medium,
        category: None,
    }
}

#[tokio::test]
async fn server_lists_reminders_by_due_time() {
    let base = serve().await;
    let api = HttpReminderApi::with_client(reqwest::Client::new(), &base);

    api.create(&new_reminder("later", 2, "09:00")).await.unwrap();
    api.create(&new_reminder("evening", 1, "18:30")).await.unwrap();
    api.create(&new_reminder("morning", 1, "07:15")).await.unwrap();

    let names: Vec<String> = api
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|reminder| reminder.name)
        .collect();
    assert_eq!(names, ["morning", "evening", "later"]);
}

#[tokio::test]
async fn created_reminders_always_start_pending() {
    let base = serve().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/reminders"))
        .json(&json!({
            "name": "X",
            "description": "Y",
            "date": "2024-03-01",
            "time": "09:00",
            "priority": "MEDIUM",
            "completed": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["completed"], json!(false));

    let api = HttpReminderApi::with_client(client, &base);
    assert!(api.list().await.unwrap().iter().all(|r| !r.completed));
}

#[tokio::test]
async fn server_errors_reach_the_client_as_status() {
    let base = serve().await;
    let api = HttpReminderApi::with_client(reqwest::Client::new(), &base);

    let err = api.delete(uuid::Uuid::new_v4()).await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Failed to delete reminder");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn coordinator_round_trip_against_live_server() {
    let base = serve().await;
    let api = Arc::new(HttpReminderApi::with_client(reqwest::Client::new(), &base));
    let coordinator = ReminderCoordinator::new(api.clone(), Arc::new(TracingNotifier));

    coordinator.load().await.unwrap();
    assert!(coordinator.reminders().is_empty());

    let created = coordinator
        .create(new_reminder("Pay rent", 1, "08:00"))
        .await
        .unwrap();
    assert_eq!(created.category, "general");

    coordinator.toggle_complete(created.id, true).await.unwrap();
    assert!(coordinator.reminders()[0].completed);

    let token = coordinator.delete(created.id).await.unwrap();
    assert!(api.list().await.unwrap().is_empty());

    let restored = coordinator.undo(token).await.unwrap();
    assert_ne!(restored.id, created.id);
    assert!(!restored.completed);
    assert_eq!(restored.name, "Pay rent");
    assert_eq!(coordinator.reminders().len(), 1);
}
