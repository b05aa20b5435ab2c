//! The authoritative remote call boundary.
//!
//! Every game rule runs behind this boundary. A [`Transport`] carries a named
//! call and a JSON payload and resolves to a JSON result or a rejection;
//! [`Remote`] wraps it with one typed method per call.

pub mod mock;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::model::*;
use crate::telemetry::metrics;

pub use mock::{MockResponse, MockTransport};

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// Every operation the client consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    GetCharacter,
    CreateCharacter,
    UpdateCharacter,
    AddExperience,
    AddAttributePoints,
    GetAllHabits,
    GetHabitEntriesForDate,
    AddHabit,
    UpdateHabit,
    DeleteHabit,
    AddHabitEntry,
    GetHabitEntriesForHabit,
    GetAllTasks,
    AddTask,
    ToggleTaskStatus,
    DeleteTask,
    GenerateWeeklyQuests,
    GetQuestsForWeek,
    GetActiveQuests,
    UpdateQuestProgress,
    CompleteQuest,
    ExpireOverdueQuests,
    GetAllAchievements,
    GetAchievementsByStatus,
    CheckAndUpdateAchievements,
    EarnAchievement,
    GetAchievementStats,
}

impl Call {
    /// Wire name of the call.
    pub fn name(self) -> &'static str {
        match self {
            Call::GetCharacter => "get_character",
            Call::CreateCharacter => "create_character",
            Call::UpdateCharacter => "update_character",
            Call::AddExperience => "add_experience",
            Call::AddAttributePoints => "add_attribute_points",
            Call::GetAllHabits => "get_all_habits",
            Call::GetHabitEntriesForDate => "get_habit_entries_for_date",
            Call::AddHabit => "add_habit",
            Call::UpdateHabit => "update_habit",
            Call::DeleteHabit => "delete_habit",
            Call::AddHabitEntry => "add_habit_entry",
            Call::GetHabitEntriesForHabit => "get_habit_entries_for_habit",
            Call::GetAllTasks => "get_all_tasks",
            Call::AddTask => "add_task",
            Call::ToggleTaskStatus => "toggle_task_status",
            Call::DeleteTask => "delete_task",
            Call::GenerateWeeklyQuests => "generate_weekly_quests",
            Call::GetQuestsForWeek => "get_quests_for_week",
            Call::GetActiveQuests => "get_active_quests",
            Call::UpdateQuestProgress => "update_quest_progress",
            Call::CompleteQuest => "complete_quest",
            Call::ExpireOverdueQuests => "expire_overdue_quests",
            Call::GetAllAchievements => "get_all_achievements",
            Call::GetAchievementsByStatus => "get_achievements_by_status",
            Call::CheckAndUpdateAchievements => "check_and_update_achievements",
            Call::EarnAchievement => "earn_achievement",
            Call::GetAchievementStats => "get_achievement_stats",
        }
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A rejected or undecodable remote call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    /// The backend rejected the call with a plain message.
    #[error("{0}")]
    Rejected(String),

    /// The backend rejected the call with a structured error.
    #[error("{message}")]
    Structured {
        message: String,
        code: Option<String>,
    },

    /// The call resolved but its result did not match the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Carries one named call to the backend. Implementations own the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, call: Call, payload: Value) -> Result<Value, RemoteError>;
}

/// Typed client over a [`Transport`].
#[derive(Clone)]
pub struct Remote {
    transport: Arc<dyn Transport>,
}

impl Remote {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn call<T: DeserializeOwned>(&self, call: Call, payload: Value) -> Result<T, RemoteError> {
        debug!(call = call.name(), "remote call");
        let result = self
            .transport
            .invoke(call, payload)
            .await
            .and_then(|value| {
                serde_json::from_value(value)
                    .map_err(|e| RemoteError::Decode(format!("{call}: {e}")))
            });
        metrics::record_remote_call(call.name(), result.is_ok());
        result
    }

    // --- Character ---

    pub async fn get_character(&self) -> Result<Character, RemoteError> {
        self.call(Call::GetCharacter, json!({})).await
    }

    pub async fn create_character(
        &self,
        request: &CreateCharacterRequest,
    ) -> Result<Character, RemoteError> {
        self.call(Call::CreateCharacter, json!({ "request": request }))
            .await
    }

    pub async fn update_character(
        &self,
        request: &UpdateCharacterRequest,
    ) -> Result<Character, RemoteError> {
        self.call(Call::UpdateCharacter, json!({ "request": request }))
            .await
    }

    /// Accepts both `{character, levelUp}` and the `[character, bool]` tuple
    /// some backends return.
    pub async fn add_experience(&self, exp_points: i64) -> Result<ExperienceResult, RemoteError> {
        let value: Value = self
            .call(Call::AddExperience, json!({ "expPoints": exp_points }))
            .await?;
        decode_experience_result(value)
    }

    pub async fn add_attribute_points(
        &self,
        attribute: Attribute,
        points: i32,
    ) -> Result<Character, RemoteError> {
        self.call(
            Call::AddAttributePoints,
            json!({ "attribute": attribute, "points": points }),
        )
        .await
    }

    // --- Habits ---

    pub async fn get_all_habits(&self) -> Result<Vec<Habit>, RemoteError> {
        self.call(Call::GetAllHabits, json!({})).await
    }

    pub async fn get_habit_entries_for_date(
        &self,
        date: &str,
    ) -> Result<Vec<HabitEntry>, RemoteError> {
        self.call(Call::GetHabitEntriesForDate, json!({ "date": date }))
            .await
    }

    pub async fn add_habit(&self, request: &CreateHabitRequest) -> Result<Habit, RemoteError> {
        self.call(Call::AddHabit, json!({ "request": request })).await
    }

    pub async fn update_habit(
        &self,
        habit_id: i32,
        request: &UpdateHabitRequest,
    ) -> Result<Habit, RemoteError> {
        self.call(
            Call::UpdateHabit,
            json!({ "habit_id": habit_id, "request": request }),
        )
        .await
    }

    pub async fn delete_habit(&self, id: i32) -> Result<(), RemoteError> {
        self.call::<Value>(Call::DeleteHabit, json!({ "id": id }))
            .await
            .map(drop)
    }

    pub async fn add_habit_entry(
        &self,
        request: &CreateHabitEntryRequest,
    ) -> Result<HabitEntry, RemoteError> {
        self.call(Call::AddHabitEntry, json!({ "request": request }))
            .await
    }

    pub async fn get_habit_entries_for_habit(
        &self,
        habit_id: i32,
    ) -> Result<Vec<HabitEntry>, RemoteError> {
        self.call(Call::GetHabitEntriesForHabit, json!({ "habit_id": habit_id }))
            .await
    }

    // --- Tasks ---

    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, RemoteError> {
        self.call(Call::GetAllTasks, json!({})).await
    }

    pub async fn add_task(&self, title: &str) -> Result<Task, RemoteError> {
        self.call(Call::AddTask, json!({ "title": title })).await
    }

    pub async fn toggle_task_status(&self, task_id: i32) -> Result<Task, RemoteError> {
        self.call(Call::ToggleTaskStatus, json!({ "taskId": task_id }))
            .await
    }

    pub async fn delete_task(&self, task_id: i32) -> Result<(), RemoteError> {
        self.call::<Value>(Call::DeleteTask, json!({ "taskId": task_id }))
            .await
            .map(drop)
    }

    // --- Quests ---

    pub async fn generate_weekly_quests(&self) -> Result<Vec<Quest>, RemoteError> {
        self.call(Call::GenerateWeeklyQuests, json!({})).await
    }

    pub async fn get_quests_for_week(&self, week: Option<&str>) -> Result<Vec<Quest>, RemoteError> {
        self.call(Call::GetQuestsForWeek, json!({ "week": week }))
            .await
    }

    pub async fn get_active_quests(&self) -> Result<Vec<Quest>, RemoteError> {
        self.call(Call::GetActiveQuests, json!({})).await
    }

    pub async fn update_quest_progress(&self) -> Result<Vec<Quest>, RemoteError> {
        self.call(Call::UpdateQuestProgress, json!({})).await
    }

    pub async fn complete_quest(&self, quest_id: i32) -> Result<Quest, RemoteError> {
        self.call(Call::CompleteQuest, json!({ "questId": quest_id }))
            .await
    }

    pub async fn expire_overdue_quests(&self) -> Result<i32, RemoteError> {
        self.call(Call::ExpireOverdueQuests, json!({})).await
    }

    // --- Achievements ---

    pub async fn get_all_achievements(&self) -> Result<Vec<Achievement>, RemoteError> {
        self.call(Call::GetAllAchievements, json!({})).await
    }

    pub async fn get_achievements_by_status(
        &self,
        status: AchievementStatus,
    ) -> Result<Vec<Achievement>, RemoteError> {
        self.call(Call::GetAchievementsByStatus, json!({ "status": status }))
            .await
    }

    pub async fn check_and_update_achievements(&self) -> Result<Vec<Achievement>, RemoteError> {
        self.call(Call::CheckAndUpdateAchievements, json!({})).await
    }

    pub async fn earn_achievement(&self, achievement_id: i32) -> Result<Achievement, RemoteError> {
        self.call(
            Call::EarnAchievement,
            json!({ "achievementId": achievement_id }),
        )
        .await
    }

    /// `(earned, available, locked)` as counted by the backend.
    pub async fn get_achievement_stats(&self) -> Result<(i32, i32, i32), RemoteError> {
        self.call(Call::GetAchievementStats, json!({})).await
    }
}

fn decode_experience_result(value: Value) -> Result<ExperienceResult, RemoteError> {
    if value.is_array() {
        let (character, level_up): (Character, bool) = serde_json::from_value(value)
            .map_err(|e| RemoteError::Decode(format!("add_experience: {e}")))?;
        return Ok(ExperienceResult {
            character,
            level_up,
        });
    }
    serde_json::from_value(value).map_err(|e| RemoteError::Decode(format!("add_experience: {e}")))
}
