//! Habits and their per-day entries.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// How a habit is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitType {
    /// Done or not done (e.g. "meditated today?").
    Boolean,
    /// Counted towards an optional target (e.g. glasses of water).
    Counter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i32,
    pub title: String,
    pub habit_type: HabitType,
    pub target_value: Option<i32>,
    /// Computed by the backend. Never derived client-side.
    pub current_streak: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One habit's record for one day. At most one per (habit_id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitEntry {
    pub id: i32,
    pub habit_id: i32,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub completed: bool,
    pub value: i32,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub title: String,
    pub habit_type: HabitType,
    pub target_value: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHabitRequest {
    pub title: Option<String>,
    pub target_value: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHabitEntryRequest {
    pub habit_id: i32,
    pub date: String,
    pub completed: Option<bool>,
    pub value: Option<i32>,
}
