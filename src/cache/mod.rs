//! Domain caches: the client-side confirmed-state mirror of each entity type.
//!
//! Every cache is a [`DomainCache`] holding `{data, phase, error}` inside a
//! `tokio::sync::watch` channel. Updates are whole-value modifications made
//! synchronously after a remote call resolves (confirm-then-apply), so a
//! failed call never leaves partial data behind. Subscribers are woken on
//! every change.
//!
//! Concurrent operations on one cache are not serialized: responses are
//! applied in the order they complete, not the order they were issued.

pub mod achievement;
pub mod character;
pub mod habit;
pub mod quest;
pub mod task;

use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::sync::watch;
use tracing::warn;

use crate::remote::RemoteError;
use crate::telemetry::metrics;

pub use achievement::AchievementStore;
pub use character::{CharacterStore, Provisioning};
pub use habit::{HabitData, HabitStore};
pub use quest::QuestStore;
pub use task::TaskStore;

// ---------------------------------------------------------------------------
// Phase / errors
// ---------------------------------------------------------------------------

/// Loading phase of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Which entity domain a cache mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Character,
    Task,
    Habit,
    Quest,
    Achievement,
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Domain::Character => "character",
            Domain::Task => "task",
            Domain::Habit => "habit",
            Domain::Quest => "quest",
            Domain::Achievement => "achievement",
        };
        write!(f, "{s}")
    }
}

/// Fixed enumeration of failure codes, one per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Character
    GetCharacterError,
    CreateCharacterError,
    UpdateCharacterError,
    AddExperienceError,
    AddAttributePointsError,
    // Tasks
    LoadTasksError,
    AddTaskError,
    ToggleTaskError,
    DeleteTaskError,
    // Habits
    LoadHabitsError,
    LoadEntriesError,
    AddHabitError,
    UpdateHabitError,
    DeleteHabitError,
    MarkHabitError,
    GetEntriesError,
    // Quests
    LoadActiveQuestsError,
    LoadQuestsError,
    GenerateQuestsError,
    UpdateProgressError,
    CompleteQuestError,
    ExpireQuestsError,
    // Achievements
    LoadAchievementsError,
    AchievementsByStatusError,
    CheckAchievementsError,
    EarnAchievementError,
    AchievementStatsError,
    // Local validation
    EmptyTitle,
}

impl ErrorCode {
    /// Message used when the backend rejection carries no text.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::GetCharacterError => "Failed to get character",
            ErrorCode::CreateCharacterError => "Failed to create character",
            ErrorCode::UpdateCharacterError => "Failed to update character",
            ErrorCode::AddExperienceError => "Failed to add experience",
            ErrorCode::AddAttributePointsError => "Failed to add attribute points",
            ErrorCode::LoadTasksError => "Failed to load tasks",
            ErrorCode::AddTaskError => "Failed to add task",
            ErrorCode::ToggleTaskError => "Failed to toggle task status",
            ErrorCode::DeleteTaskError => "Failed to delete task",
            ErrorCode::LoadHabitsError => "Failed to load habits",
            ErrorCode::LoadEntriesError => "Failed to load today entries",
            ErrorCode::AddHabitError => "Failed to add habit",
            ErrorCode::UpdateHabitError => "Failed to update habit",
            ErrorCode::DeleteHabitError => "Failed to delete habit",
            ErrorCode::MarkHabitError => "Failed to mark habit",
            ErrorCode::GetEntriesError => "Failed to get habit entries",
            ErrorCode::LoadActiveQuestsError => "Failed to load active quests",
            ErrorCode::LoadQuestsError => "Failed to load quests for week",
            ErrorCode::GenerateQuestsError => "Failed to generate weekly quests",
            ErrorCode::UpdateProgressError => "Failed to update quest progress",
            ErrorCode::CompleteQuestError => "Failed to complete quest",
            ErrorCode::ExpireQuestsError => "Failed to expire overdue quests",
            ErrorCode::LoadAchievementsError => "Failed to load achievements",
            ErrorCode::AchievementsByStatusError => "Failed to load achievements by status",
            ErrorCode::CheckAchievementsError => "Failed to check and update achievements",
            ErrorCode::EarnAchievementError => "Failed to earn achievement",
            ErrorCode::AchievementStatsError => "Failed to get achievement stats",
            ErrorCode::EmptyTitle => "Title cannot be empty",
        }
    }
}

/// The structured error slot of a cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheError {
    pub message: String,
    pub code: ErrorCode,
}

impl CacheError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Normalize a remote rejection under `code`.
    pub fn from_remote(code: ErrorCode, error: &RemoteError) -> Self {
        let message = error.to_string();
        if message.trim().is_empty() {
            Self::new(code, code.default_message())
        } else {
            Self::new(code, message)
        }
    }
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = serde_json::to_value(self.code)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        write!(f, "{code}: {}", self.message)
    }
}

// ---------------------------------------------------------------------------
// DomainCache
// ---------------------------------------------------------------------------

/// Snapshot of a cache.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CacheState<S> {
    pub data: S,
    pub phase: Phase,
    pub error: Option<CacheError>,
}

impl<S> CacheState<S> {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

/// A single mutable slot of confirmed state for one domain.
pub struct DomainCache<S> {
    domain: Domain,
    state: watch::Sender<CacheState<S>>,
}

impl<S: Clone + Default> DomainCache<S> {
    pub fn new(domain: Domain) -> Self {
        let (state, _) = watch::channel(CacheState::default());
        Self { domain, state }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> CacheState<S> {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&CacheState<S>) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn error(&self) -> Option<CacheError> {
        self.state.borrow().error.clone()
    }

    /// Receiver woken on every change to this cache.
    pub fn subscribe(&self) -> watch::Receiver<CacheState<S>> {
        self.state.subscribe()
    }

    /// Dismiss the error without touching data or phase.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|st| st.error.take().is_some());
    }

    /// Back to empty and idle.
    pub fn reset(&self) {
        self.state.send_replace(CacheState::default());
    }

    /// Record an error without touching data or phase. Used for local
    /// validation failures and side calls that do not feed the cache.
    pub fn set_error(&self, error: CacheError) {
        self.log_failure(&error);
        self.state.send_modify(|st| st.error = Some(error));
    }

    /// Run one confirm-then-apply round trip.
    ///
    /// Enters `Loading` and clears the error, awaits `call`, then either
    /// applies the result with `apply` and enters `Success`, or records the
    /// failure under `code` and enters `Error` with data untouched.
    pub async fn run<T, R>(
        &self,
        code: ErrorCode,
        call: impl Future<Output = Result<T, RemoteError>>,
        apply: impl FnOnce(&mut S, T) -> R,
    ) -> Option<R> {
        self.state.send_modify(|st| {
            st.phase = Phase::Loading;
            st.error = None;
        });

        match call.await {
            Ok(value) => {
                let mut out = None;
                self.state.send_modify(|st| {
                    out = Some(apply(&mut st.data, value));
                    st.phase = Phase::Success;
                });
                out
            }
            Err(e) => {
                let error = CacheError::from_remote(code, &e);
                self.log_failure(&error);
                self.state.send_modify(|st| {
                    st.phase = Phase::Error;
                    st.error = Some(error);
                });
                None
            }
        }
    }

    /// Run a remote call whose result is returned to the caller but not
    /// cached. Only a failure is recorded.
    pub async fn attempt<T>(
        &self,
        code: ErrorCode,
        call: impl Future<Output = Result<T, RemoteError>>,
    ) -> Option<T> {
        match call.await {
            Ok(value) => Some(value),
            Err(e) => {
                self.set_error(CacheError::from_remote(code, &e));
                None
            }
        }
    }

    /// Modify data after a confirmed call already resolved elsewhere.
    pub fn apply(&self, f: impl FnOnce(&mut S)) {
        self.state.send_modify(|st| f(&mut st.data));
    }

    fn log_failure(&self, error: &CacheError) {
        warn!(domain = %self.domain, code = ?error.code, message = %error.message, "cache operation failed");
        metrics::record_cache_failure(&self.domain.to_string(), &format!("{:?}", error.code));
    }
}

/// Trimmed title, or the `EMPTY_TITLE` error if nothing is left.
pub(crate) fn validate_title(title: &str, what: &str) -> Result<String, CacheError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(CacheError::new(
            ErrorCode::EmptyTitle,
            format!("{what} title cannot be empty"),
        ))
    } else {
        Ok(trimmed.to_string())
    }
}
