//! Derived views: pure projections over cache snapshots.
//!
//! Nothing here performs a remote call or touches a cache. Stores expose
//! convenience accessors that run these over their current state, and
//! subscribers can rerun them on every change notification.

use serde::Serialize;

use crate::model::*;
use crate::progression;

/// Attribute value that fills the radar chart to 100%.
pub const DEFAULT_ATTRIBUTE_CAP: i32 = 50;

/// `part / total × 100`, or 0 for an empty total.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_rate: f64,
}

pub fn completed_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|t| t.completed).cloned().collect()
}

pub fn pending_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|t| !t.completed).cloned().collect()
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    TaskStats {
        total,
        completed,
        pending: total - completed,
        completion_rate: percentage(completed, total),
    }
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuestStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub expired: usize,
    pub completion_rate: f64,
}

pub fn quests_with_status(quests: &[Quest], status: QuestStatus) -> Vec<Quest> {
    quests.iter().filter(|q| q.status == status).cloned().collect()
}

pub fn quest_stats(quests: &[Quest]) -> QuestStats {
    let count = |status| quests.iter().filter(|q| q.status == status).count();
    let total = quests.len();
    let completed = count(QuestStatus::Completed);
    QuestStats {
        total,
        active: count(QuestStatus::Active),
        completed,
        expired: count(QuestStatus::Expired),
        completion_rate: percentage(completed, total),
    }
}

/// Progress towards the target as a percentage, capped at 100.
pub fn quest_progress_percent(quest: &Quest) -> f64 {
    if quest.target_value == 0 {
        return 0.0;
    }
    (quest.current_progress as f64 / quest.target_value as f64 * 100.0).min(100.0)
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AchievementStats {
    pub total: usize,
    pub earned: usize,
    pub available: usize,
    pub locked: usize,
    pub earned_percentage: f64,
}

pub fn achievements_with_status(
    achievements: &[Achievement],
    status: AchievementStatus,
) -> Vec<Achievement> {
    achievements
        .iter()
        .filter(|a| a.status == status)
        .cloned()
        .collect()
}

pub fn achievement_stats(achievements: &[Achievement]) -> AchievementStats {
    let count = |status| achievements.iter().filter(|a| a.status == status).count();
    let total = achievements.len();
    let earned = count(AchievementStatus::Earned);
    AchievementStats {
        total,
        earned,
        available: count(AchievementStatus::Available),
        locked: count(AchievementStatus::Locked),
        earned_percentage: percentage(earned, total),
    }
}

// ---------------------------------------------------------------------------
// Habits
// ---------------------------------------------------------------------------

/// A habit joined with its entry for the tracked day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitWithEntry {
    pub habit: Habit,
    pub today_entry: Option<HabitEntry>,
    pub completed_today: bool,
    /// Counter value for the day; 0 for Boolean habits.
    pub today_value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HabitStats {
    pub total: usize,
    pub with_streak: usize,
    /// Mean streak, rounded to two decimals.
    pub average_streak: f64,
    pub longest_streak: i32,
}

/// Did `entry` complete `habit`? Boolean habits read `completed`; Counter
/// habits compare `value` with the target, or require `value > 0` without one.
pub fn entry_completes(habit: &Habit, entry: &HabitEntry) -> bool {
    match habit.habit_type {
        HabitType::Boolean => entry.completed,
        HabitType::Counter => match habit.target_value {
            Some(target) => entry.value >= target,
            None => entry.value > 0,
        },
    }
}

pub fn habit_with_entry(habit: &Habit, entries: &[HabitEntry]) -> HabitWithEntry {
    let today_entry = entries.iter().find(|e| e.habit_id == habit.id).cloned();
    let (completed_today, today_value) = match &today_entry {
        Some(entry) => {
            let value = match habit.habit_type {
                HabitType::Boolean => 0,
                HabitType::Counter => entry.value,
            };
            (entry_completes(habit, entry), value)
        }
        None => (false, 0),
    };
    HabitWithEntry {
        habit: habit.clone(),
        today_entry,
        completed_today,
        today_value,
    }
}

pub fn habits_with_entries(habits: &[Habit], entries: &[HabitEntry]) -> Vec<HabitWithEntry> {
    habits
        .iter()
        .map(|habit| habit_with_entry(habit, entries))
        .collect()
}

pub fn habit_stats(habits: &[Habit]) -> HabitStats {
    let total = habits.len();
    let sum: i64 = habits.iter().map(|h| h.current_streak as i64).sum();
    let average = if total == 0 {
        0.0
    } else {
        sum as f64 / total as f64
    };
    HabitStats {
        total,
        with_streak: habits.iter().filter(|h| h.current_streak > 0).count(),
        average_streak: (average * 100.0).round() / 100.0,
        longest_streak: habits.iter().map(|h| h.current_streak).max().unwrap_or(0),
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterStats {
    pub current_level: i32,
    pub current_experience: i64,
    pub experience_to_next_level: i64,
    /// In `[0, 1]`.
    pub level_progress: f64,
    pub total_attribute_points: i32,
    pub class_name: String,
    pub class_description: &'static str,
}

pub fn character_stats(character: &Character) -> CharacterStats {
    CharacterStats {
        current_level: character.level,
        current_experience: character.experience,
        experience_to_next_level: progression::experience_to_next_level(
            character.level,
            character.experience,
        ),
        level_progress: progression::level_progress(character.level, character.experience),
        total_attribute_points: progression::total_attribute_points(&character.attributes),
        class_name: character.character_class.to_string(),
        class_description: character.character_class.description(),
    }
}

/// Experience within the current level band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExperienceInfo {
    /// Earned since the current level started.
    pub current: i64,
    /// Width of the current level band.
    pub needed: i64,
    pub total: i64,
    /// Total experience at which the next level starts.
    pub next_level: i64,
    pub percentage: f64,
}

pub fn experience_info(character: &Character) -> ExperienceInfo {
    let lo = progression::experience_for_level(character.level.saturating_sub(1));
    let hi = progression::experience_for_level(character.level);
    let current = character.experience.saturating_sub(lo);
    let needed = hi - lo;
    ExperienceInfo {
        current,
        needed,
        total: character.experience,
        next_level: hi,
        percentage: if needed > 0 {
            current as f64 / needed as f64 * 100.0
        } else {
            0.0
        },
    }
}

/// Attributes normalized for the radar chart, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeRadar {
    pub total: i32,
    pub strength: f64,
    pub intelligence: f64,
    pub charisma: f64,
    pub dexterity: f64,
    pub wisdom: f64,
    pub constitution: f64,
}

impl AttributeRadar {
    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Intelligence => self.intelligence,
            Attribute::Charisma => self.charisma,
            Attribute::Dexterity => self.dexterity,
            Attribute::Wisdom => self.wisdom,
            Attribute::Constitution => self.constitution,
        }
    }
}

/// `min(100, value / cap × 100)` per attribute. A non-positive cap yields 0.
pub fn attribute_radar(attributes: &CharacterAttributes, cap: i32) -> AttributeRadar {
    let pct = |value: i32| {
        if cap <= 0 {
            0.0
        } else {
            (value as f64 / cap as f64 * 100.0).min(100.0)
        }
    };
    AttributeRadar {
        total: progression::total_attribute_points(attributes),
        strength: pct(attributes.strength),
        intelligence: pct(attributes.intelligence),
        charisma: pct(attributes.charisma),
        dexterity: pct(attributes.dexterity),
        wisdom: pct(attributes.wisdom),
        constitution: pct(attributes.constitution),
    }
}
