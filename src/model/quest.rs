//! Weekly quests and achievements.

use serde::{Deserialize, Serialize};

use super::Timestamp;

// ---------------------------------------------------------------------------
// Quest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub quest_type: QuestType,
    pub target_value: i32,
    pub current_progress: i32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub habit_id: Option<i32>,
    pub status: QuestStatus,
    pub reward_exp: i64,
    pub deadline: Option<Timestamp>,
    /// `YYYY-WW`.
    pub week: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Which domain a quest measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestType {
    Task,
    Habit,
    Character,
}

/// Lifecycle state of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestStatus {
    Active,
    Completed,
    Expired,
}

impl QuestStatus {
    /// Can transition from self to `to`?
    pub fn can_transition_to(self, to: QuestStatus) -> bool {
        use QuestStatus::*;
        self == to || matches!((self, to), (Active, Completed) | (Active, Expired))
    }
}

impl std::fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuestStatus::Active => "Active",
            QuestStatus::Completed => "Completed",
            QuestStatus::Expired => "Expired",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Achievement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub achievement_type: AchievementType,
    pub required_value: i32,
    #[serde(default)]
    pub icon: String,
    pub status: AchievementStatus,
    pub earned_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementType {
    HabitStreak,
    TaskCount,
    CharacterLevel,
    QuestCount,
}

/// Achievement status. Ordered by progress: a status only ever moves up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AchievementStatus {
    /// Requirements not met.
    Locked,
    /// Requirements met, not yet claimed.
    Available,
    /// Claimed.
    Earned,
}

impl AchievementStatus {
    /// Can transition from self to `to`? Staying put is allowed; regressing
    /// never is.
    pub fn can_transition_to(self, to: AchievementStatus) -> bool {
        to >= self
    }
}

impl std::fmt::Display for AchievementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AchievementStatus::Locked => "Locked",
            AchievementStatus::Available => "Available",
            AchievementStatus::Earned => "Earned",
        };
        write!(f, "{s}")
    }
}
