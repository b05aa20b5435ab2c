//! Core data model.
//!
//! These are the confirmed shapes returned by the authoritative backend. The
//! client never fabricates them; it only caches what a remote call returned.

pub mod character;
pub mod habit;
pub mod quest;
pub mod task;

pub use character::{
    Attribute, Character, CharacterAttributes, CharacterClass, CreateCharacterRequest,
    ExperienceResult, UpdateCharacterRequest,
};
pub use habit::{
    CreateHabitEntryRequest, CreateHabitRequest, Habit, HabitEntry, HabitType,
    UpdateHabitRequest,
};
pub use quest::{Achievement, AchievementStatus, AchievementType, Quest, QuestStatus, QuestType};
pub use task::Task;

/// Seconds since the Unix epoch, as used by every timestamp on the wire.
pub type Timestamp = i64;

/// Identity shared by every cached entity, used for replace-by-id and
/// filter-out-by-id updates.
pub trait Identified {
    fn id(&self) -> i32;
}

impl Identified for Task {
    fn id(&self) -> i32 {
        self.id
    }
}

impl Identified for Habit {
    fn id(&self) -> i32 {
        self.id
    }
}

impl Identified for Quest {
    fn id(&self) -> i32 {
        self.id
    }
}

impl Identified for Achievement {
    fn id(&self) -> i32 {
        self.id
    }
}

/// Replace the element with `item`'s id in place. Returns false if absent.
pub fn replace_by_id<T: Identified>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}
