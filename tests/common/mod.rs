//! JSON fixtures and client setup shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use questline::ProgressionClient;
use questline::remote::{Call, MockResponse, MockTransport};
use serde_json::{Value, json};

pub fn client() -> (Arc<MockTransport>, ProgressionClient) {
    let mock = Arc::new(MockTransport::new());
    let client = ProgressionClient::with_defaults(mock.clone());
    (mock, client)
}

pub fn ok(value: Value) -> MockResponse {
    MockResponse::Ok(value)
}

pub fn rejected(message: &str) -> MockResponse {
    MockResponse::rejected(message)
}

/// Queue one response per call, in order.
pub fn script(mock: &MockTransport, responses: Vec<(Call, MockResponse)>) {
    for (call, response) in responses {
        mock.push(call, response);
    }
}

pub fn character(level: i32, experience: i64) -> Value {
    json!({
        "id": 1,
        "level": level,
        "experience": experience,
        "character_class": "Warrior",
        "attributes": {
            "strength": 10, "intelligence": 10, "charisma": 10,
            "dexterity": 10, "wisdom": 10, "constitution": 10
        },
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000
    })
}

pub fn task(id: i32, title: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "completed": completed,
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000
    })
}

pub fn habit(id: i32, streak: i32) -> Value {
    json!({
        "id": id,
        "title": format!("habit {id}"),
        "habit_type": "Boolean",
        "target_value": null,
        "current_streak": streak,
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000
    })
}

pub fn counter_habit(id: i32, target: Option<i32>) -> Value {
    json!({
        "id": id,
        "title": format!("counter {id}"),
        "habit_type": "Counter",
        "target_value": target,
        "current_streak": 0,
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000
    })
}

pub fn entry(id: i32, habit_id: i32, date: &str, completed: bool, value: i32) -> Value {
    json!({
        "id": id,
        "habit_id": habit_id,
        "date": date,
        "completed": completed,
        "value": value,
        "created_at": 1_700_000_000
    })
}

pub fn quest(id: i32, status: &str) -> Value {
    json!({
        "id": id,
        "title": format!("quest {id}"),
        "description": "Complete 5 tasks",
        "quest_type": "Task",
        "target_value": 5,
        "current_progress": 2,
        "category": null,
        "habit_id": null,
        "status": status,
        "reward_exp": 100,
        "deadline": null,
        "week": "2026-42",
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000
    })
}

pub fn achievement(id: i32, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("achievement {id}"),
        "description": "",
        "achievement_type": "TaskCount",
        "required_value": 10,
        "icon": "trophy",
        "status": status,
        "earned_at": null,
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000
    })
}
