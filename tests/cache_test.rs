//! Integration tests for the domain caches.

mod common;

use std::time::Duration;

use common::*;
use questline::cache::{ErrorCode, Phase, Provisioning};
use questline::model::*;
use questline::remote::{Call, MockResponse, RemoteError};
use serde_json::json;

// ---------------------------------------------------------------------------
// Tasks: confirm-then-apply
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_load_replaces_cache() {
    let (mock, client) = client();
    mock.push(
        Call::GetAllTasks,
        ok(json!([task(1, "a", false), task(2, "b", true)])),
    );

    assert!(client.tasks().load().await);

    let tasks = client.tasks().tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(client.tasks().cache().phase(), Phase::Success);
    assert!(client.tasks().cache().error().is_none());
}

#[tokio::test]
async fn added_task_goes_to_front() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (Call::GetAllTasks, ok(json!([task(1, "old", false)]))),
            (Call::AddTask, ok(task(2, "new", false))),
        ],
    );
    client.tasks().load().await;

    let added = client.tasks().add("  new  ").await.unwrap();

    assert_eq!(added.id, 2);
    let ids: Vec<i32> = client.tasks().tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(mock.payloads(Call::AddTask), vec![json!({"title": "new"})]);
}

#[tokio::test]
async fn toggle_and_delete_apply_confirmed_results() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (
                Call::GetAllTasks,
                ok(json!([task(1, "a", false), task(2, "b", false)])),
            ),
            (Call::ToggleTaskStatus, ok(task(1, "a", true))),
            (Call::DeleteTask, ok(json!(null))),
        ],
    );
    client.tasks().load().await;

    client.tasks().toggle(1).await.unwrap();
    assert_eq!(client.tasks().completed().len(), 1);
    assert_eq!(client.tasks().pending().len(), 1);

    assert!(client.tasks().delete(2).await);
    let ids: Vec<i32> = client.tasks().tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(
        mock.payloads(Call::ToggleTaskStatus),
        vec![json!({"taskId": 1})]
    );
}

#[tokio::test]
async fn empty_title_fails_locally() {
    let (mock, client) = client();

    assert!(client.tasks().add("   ").await.is_none());

    assert_eq!(mock.call_count(Call::AddTask), 0);
    let error = client.tasks().cache().error().unwrap();
    assert_eq!(error.code, ErrorCode::EmptyTitle);
    assert_eq!(error.message, "Task title cannot be empty");
    assert_eq!(client.tasks().cache().phase(), Phase::Idle);
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_load_keeps_data_and_records_error() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (Call::GetAllTasks, ok(json!([task(1, "a", false)]))),
            (Call::GetAllTasks, rejected("database is locked")),
        ],
    );
    client.tasks().load().await;

    assert!(!client.tasks().load().await);

    assert_eq!(client.tasks().tasks().len(), 1);
    assert_eq!(client.tasks().cache().phase(), Phase::Error);
    let error = client.tasks().cache().error().unwrap();
    assert_eq!(error.code, ErrorCode::LoadTasksError);
    assert_eq!(error.message, "database is locked");
}

#[tokio::test]
async fn blank_rejection_uses_default_message() {
    let (mock, client) = client();
    mock.push(Call::GetAllHabits, rejected(""));

    client.habits().load().await;

    let error = client.habits().cache().error().unwrap();
    assert_eq!(error.code, ErrorCode::LoadHabitsError);
    assert_eq!(error.message, "Failed to load habits");
}

#[tokio::test]
async fn structured_rejection_keeps_its_message() {
    let (mock, client) = client();
    mock.push(
        Call::GetActiveQuests,
        MockResponse::Err(RemoteError::Structured {
            message: "quest table missing".into(),
            code: Some("E_SCHEMA".into()),
        }),
    );

    assert!(!client.quests().load_active().await);

    let error = client.quests().cache().error().unwrap();
    assert_eq!(error.code, ErrorCode::LoadActiveQuestsError);
    assert_eq!(error.message, "quest table missing");
}

#[tokio::test]
async fn clear_error_keeps_data_and_phase() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (Call::GetAllTasks, ok(json!([task(1, "a", false)]))),
            (Call::GetAllTasks, rejected("boom")),
        ],
    );
    client.tasks().load().await;
    client.tasks().load().await;

    client.tasks().clear_error();

    assert!(client.tasks().cache().error().is_none());
    assert_eq!(client.tasks().cache().phase(), Phase::Error);
    assert_eq!(client.tasks().tasks().len(), 1);
}

#[tokio::test]
async fn reset_returns_to_initial_state() {
    let (mock, client) = client();
    mock.push(Call::GetAllTasks, ok(json!([task(1, "a", false)])));
    client.tasks().load().await;

    client.reset();

    assert!(client.tasks().tasks().is_empty());
    assert_eq!(client.tasks().cache().phase(), Phase::Idle);
}

#[tokio::test]
async fn unparsable_response_is_recorded_as_failure() {
    let (mock, client) = client();
    mock.push(Call::GetAllTasks, ok(json!({"not": "a list"})));

    assert!(!client.tasks().load().await);

    let error = client.tasks().cache().error().unwrap();
    assert_eq!(error.code, ErrorCode::LoadTasksError);
    assert!(error.message.contains("unexpected response shape"));
}

// ---------------------------------------------------------------------------
// Concurrency and observation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn concurrent_loads_apply_in_completion_order() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (
                Call::GetAllTasks,
                MockResponse::delayed(Duration::from_millis(100), ok(json!([task(1, "slow", false)]))),
            ),
            (
                Call::GetAllTasks,
                MockResponse::delayed(Duration::from_millis(10), ok(json!([task(2, "fast", false)]))),
            ),
        ],
    );

    let tasks = client.tasks();
    let (first, second) = tokio::join!(tasks.load(), tasks.load());
    assert!(first && second);

    // The first-issued call resolved last, so its result wins.
    let ids: Vec<i32> = tasks.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn subscribers_see_every_applied_change() {
    let (mock, client) = client();
    mock.push(Call::GetAllTasks, ok(json!([task(1, "a", false)])));
    let mut rx = client.tasks().cache().subscribe();

    client.tasks().load().await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.data.len(), 1);
    assert_eq!(state.phase, Phase::Success);
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

#[tokio::test]
async fn character_initialize_loads_existing() {
    let (mock, client) = client();
    mock.push(Call::GetCharacter, ok(character(2, 150)));

    let result = client.character().initialize().await;

    assert!(matches!(result, Provisioning::Loaded(ref c) if c.level == 2));
    assert_eq!(mock.call_count(Call::CreateCharacter), 0);
}

#[tokio::test]
async fn character_initialize_creates_default_when_missing() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (Call::GetCharacter, rejected("no character")),
            (Call::CreateCharacter, ok(character(1, 0))),
        ],
    );

    let result = client.character().initialize().await;

    assert!(matches!(result, Provisioning::Created(_)));
    assert_eq!(client.character().level(), Some(1));
    assert_eq!(
        mock.payloads(Call::CreateCharacter),
        vec![json!({"request": {"character_class": "Warrior"}})]
    );
}

#[tokio::test]
async fn character_initialize_keeps_cached_character_on_failure() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (Call::GetCharacter, ok(character(3, 450))),
            (Call::GetCharacter, rejected("offline")),
        ],
    );
    client.character().load().await;

    let result = client.character().initialize().await;

    assert_eq!(result, Provisioning::Failed);
    assert_eq!(mock.call_count(Call::CreateCharacter), 0);
    assert_eq!(client.character().level(), Some(3));
}

#[tokio::test]
async fn add_attribute_points_sends_lowercase_name() {
    let (mock, client) = client();
    mock.push(Call::AddAttributePoints, ok(character(1, 0)));

    client
        .character()
        .add_attribute_points(Attribute::Wisdom, 2)
        .await
        .unwrap();

    assert_eq!(
        mock.payloads(Call::AddAttributePoints),
        vec![json!({"attribute": "wisdom", "points": 2})]
    );
}

#[tokio::test]
async fn add_experience_accepts_tuple_response() {
    let (mock, client) = client();
    mock.push(Call::AddExperience, ok(json!([character(2, 120), true])));

    let result = client.character().add_experience(120).await.unwrap();

    assert!(result.level_up);
    assert_eq!(client.character().level(), Some(2));
    assert_eq!(
        mock.payloads(Call::AddExperience),
        vec![json!({"expPoints": 120})]
    );
}

// ---------------------------------------------------------------------------
// Habits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn habit_add_sends_request_payload() {
    let (mock, client) = client();
    mock.push(Call::AddHabit, ok(counter_habit(7, Some(8))));

    let habit = client
        .habits()
        .add("Water", HabitType::Counter, Some(8))
        .await
        .unwrap();

    assert_eq!(habit.id, 7);
    assert_eq!(
        mock.payloads(Call::AddHabit),
        vec![json!({"request": {"title": "Water", "habit_type": "Counter", "target_value": 8}})]
    );
}

#[tokio::test]
async fn habit_delete_drops_its_entries() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (Call::GetAllHabits, ok(json!([habit(1, 0), habit(2, 0)]))),
            (
                Call::GetHabitEntriesForDate,
                ok(json!([
                    entry(10, 1, "2026-10-18", true, 0),
                    entry(11, 2, "2026-10-18", true, 0)
                ])),
            ),
            (Call::DeleteHabit, ok(json!(null))),
        ],
    );
    client.habits().load().await;
    client.habits().load_entries_for_date("2026-10-18").await;

    assert!(client.habits().delete(1).await);

    assert_eq!(client.habits().habits().len(), 1);
    let entries = client.habits().today_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].habit_id, 2);
    assert_eq!(mock.payloads(Call::DeleteHabit), vec![json!({"id": 1})]);
}

#[tokio::test(start_paused = true)]
async fn habit_initialize_keeps_entries_error_when_habits_finish_last() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (
                Call::GetAllHabits,
                MockResponse::delayed(Duration::from_millis(50), ok(json!([habit(1, 0)]))),
            ),
            (Call::GetHabitEntriesForDate, rejected("entries unavailable")),
        ],
    );

    client.habits().initialize().await;

    assert_eq!(client.habits().habits().len(), 1);
    assert_eq!(client.habits().cache().phase(), Phase::Success);
    let error = client.habits().cache().error().unwrap();
    assert_eq!(error.code, ErrorCode::LoadEntriesError);
}

#[tokio::test]
async fn entries_for_habit_are_not_cached() {
    let (mock, client) = client();
    mock.push(
        Call::GetHabitEntriesForHabit,
        ok(json!([entry(1, 3, "2026-10-17", true, 0)])),
    );

    let history = client.habits().entries_for_habit(3).await;

    assert_eq!(history.len(), 1);
    assert!(client.habits().today_entries().is_empty());
}

// ---------------------------------------------------------------------------
// Quests and achievements
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_for_current_week_sends_null_week() {
    let (mock, client) = client();
    mock.push(Call::GetQuestsForWeek, ok(json!([quest(1, "Active")])));

    assert!(client.quests().load_for_week(None).await);

    assert_eq!(
        mock.payloads(Call::GetQuestsForWeek),
        vec![json!({"week": null})]
    );
    assert_eq!(client.quests().quests().len(), 1);
}

#[tokio::test]
async fn update_progress_replaces_returned_quests() {
    let (mock, client) = client();
    let mut advanced = quest(1, "Active");
    advanced["current_progress"] = json!(4);
    script(
        &mock,
        vec![
            (
                Call::GetActiveQuests,
                ok(json!([quest(1, "Active"), quest(2, "Active")])),
            ),
            (Call::UpdateQuestProgress, ok(json!([advanced]))),
        ],
    );
    client.quests().load_active().await;

    client.quests().update_progress().await.unwrap();

    let quests = client.quests().quests();
    assert_eq!(quests.len(), 2);
    assert_eq!(quests[0].current_progress, 4);
    assert_eq!(quests[1].current_progress, 2);
}

#[tokio::test]
async fn achievement_status_never_regresses() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (
                Call::GetAllAchievements,
                ok(json!([achievement(1, "Earned"), achievement(2, "Locked")])),
            ),
            (
                Call::GetAllAchievements,
                ok(json!([achievement(1, "Available"), achievement(2, "Available")])),
            ),
        ],
    );
    client.achievements().load().await;

    client.achievements().load().await;

    let achievements = client.achievements().achievements();
    assert_eq!(achievements[0].status, AchievementStatus::Earned);
    assert_eq!(achievements[1].status, AchievementStatus::Available);
}

#[tokio::test]
async fn achievement_check_never_regresses_earned_status() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (
                Call::GetAllAchievements,
                ok(json!([achievement(1, "Earned"), achievement(2, "Locked")])),
            ),
            (
                Call::CheckAndUpdateAchievements,
                ok(json!([achievement(1, "Available"), achievement(2, "Available")])),
            ),
            (
                Call::CheckAndUpdateAchievements,
                ok(json!([achievement(1, "Locked"), achievement(2, "Locked")])),
            ),
        ],
    );
    client.achievements().load().await;

    client.achievements().check_and_update().await.unwrap();
    client.achievements().check_and_update().await.unwrap();

    let achievements = client.achievements().achievements();
    assert_eq!(achievements[0].status, AchievementStatus::Earned);
    assert_eq!(achievements[1].status, AchievementStatus::Available);
}

#[tokio::test]
async fn earn_never_regresses_earned_status() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (Call::GetAllAchievements, ok(json!([achievement(1, "Earned")]))),
            (Call::EarnAchievement, ok(achievement(1, "Available"))),
        ],
    );
    client.achievements().load().await;

    client.achievements().earn(1).await.unwrap();

    assert_eq!(
        client.achievements().achievements()[0].status,
        AchievementStatus::Earned
    );
}

#[tokio::test]
async fn earn_replaces_by_id() {
    let (mock, client) = client();
    script(
        &mock,
        vec![
            (
                Call::GetAllAchievements,
                ok(json!([achievement(1, "Available"), achievement(2, "Locked")])),
            ),
            (Call::EarnAchievement, ok(achievement(1, "Earned"))),
        ],
    );
    client.achievements().load().await;

    client.achievements().earn(1).await.unwrap();

    let stats = client.achievements().stats();
    assert_eq!(stats.earned, 1);
    assert_eq!(stats.locked, 1);
    assert_eq!(stats.earned_percentage, 50.0);
    assert_eq!(
        mock.payloads(Call::EarnAchievement),
        vec![json!({"achievementId": 1})]
    );
}

#[tokio::test]
async fn remote_stats_decode_tuple() {
    let (mock, client) = client();
    mock.push(Call::GetAchievementStats, ok(json!([3, 2, 1])));

    assert_eq!(client.achievements().remote_stats().await, Some((3, 2, 1)));
}

#[tokio::test]
async fn by_status_failure_lands_in_error_slot() {
    let (mock, client) = client();
    mock.push(Call::GetAchievementsByStatus, rejected("nope"));

    let list = client.achievements().by_status(AchievementStatus::Earned).await;

    assert!(list.is_empty());
    assert_eq!(
        client.achievements().cache().error().unwrap().code,
        ErrorCode::AchievementsByStatusError
    );
    assert_eq!(
        mock.payloads(Call::GetAchievementsByStatus),
        vec![json!({"status": "Earned"})]
    );
}
