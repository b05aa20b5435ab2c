//! Habit cache: habits plus the entries for the tracked day.

use tracing::debug;

use super::{DomainCache, Domain, ErrorCode, validate_title};
use crate::dates;
use crate::model::*;
use crate::remote::Remote;
use crate::views::{self, HabitStats, HabitWithEntry};

/// Cached habit state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HabitData {
    pub habits: Vec<Habit>,
    /// Entries for [`HabitData::entries_date`], at most one per habit.
    pub today_entries: Vec<HabitEntry>,
    /// Day the cached entries belong to, once known.
    pub entries_date: Option<String>,
}

impl HabitData {
    /// Insert `entry`, replacing any cached entry for the same habit. Entries
    /// for a day other than the tracked one are ignored. With no day tracked
    /// yet, only an entry for today starts tracking.
    pub fn merge_entry(&mut self, entry: HabitEntry) -> bool {
        match &self.entries_date {
            Some(day) if *day != entry.date => return false,
            Some(_) => {}
            None if entry.date == dates::today() => {
                self.entries_date = Some(entry.date.clone());
            }
            None => return false,
        }
        self.today_entries.retain(|e| e.habit_id != entry.habit_id);
        self.today_entries.push(entry);
        true
    }
}

pub struct HabitStore {
    remote: Remote,
    cache: DomainCache<HabitData>,
}

impl HabitStore {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            cache: DomainCache::new(Domain::Habit),
        }
    }

    pub fn cache(&self) -> &DomainCache<HabitData> {
        &self.cache
    }

    pub fn habits(&self) -> Vec<Habit> {
        self.cache.read(|st| st.data.habits.clone())
    }

    pub fn today_entries(&self) -> Vec<HabitEntry> {
        self.cache.read(|st| st.data.today_entries.clone())
    }

    pub async fn load(&self) -> bool {
        self.cache
            .run(
                ErrorCode::LoadHabitsError,
                self.remote.get_all_habits(),
                |data, habits| data.habits = habits,
            )
            .await
            .is_some()
    }

    /// Replace the tracked day's entries with those for `date`.
    pub async fn load_entries_for_date(&self, date: &str) -> bool {
        let day = date.to_string();
        self.cache
            .run(
                ErrorCode::LoadEntriesError,
                self.remote.get_habit_entries_for_date(date),
                |data, entries| {
                    data.today_entries = entries;
                    data.entries_date = Some(day);
                },
            )
            .await
            .is_some()
    }

    pub async fn load_today_entries(&self) -> bool {
        self.load_entries_for_date(&dates::today()).await
    }

    /// Load habits and today's entries concurrently.
    pub async fn initialize(&self) {
        tokio::join!(self.load(), self.load_today_entries());
    }

    pub async fn add(
        &self,
        title: &str,
        habit_type: HabitType,
        target_value: Option<i32>,
    ) -> Option<Habit> {
        let title = match validate_title(title, "Habit") {
            Ok(t) => t,
            Err(e) => {
                self.cache.set_error(e);
                return None;
            }
        };
        let request = CreateHabitRequest {
            title,
            habit_type,
            target_value,
        };
        self.cache
            .run(
                ErrorCode::AddHabitError,
                self.remote.add_habit(&request),
                |data, habit: Habit| {
                    data.habits.insert(0, habit.clone());
                    habit
                },
            )
            .await
    }

    pub async fn update(&self, habit_id: i32, request: UpdateHabitRequest) -> Option<Habit> {
        self.cache
            .run(
                ErrorCode::UpdateHabitError,
                self.remote.update_habit(habit_id, &request),
                |data, habit: Habit| {
                    replace_by_id(&mut data.habits, habit.clone());
                    habit
                },
            )
            .await
    }

    /// Delete a habit and drop its cached entries.
    pub async fn delete(&self, habit_id: i32) -> bool {
        self.cache
            .run(
                ErrorCode::DeleteHabitError,
                self.remote.delete_habit(habit_id),
                |data, ()| {
                    data.habits.retain(|h| h.id != habit_id);
                    data.today_entries.retain(|e| e.habit_id != habit_id);
                },
            )
            .await
            .is_some()
    }

    /// Write an entry on the backend. The confirmed entry is returned but not
    /// merged; merging is a separate step so it can follow the habit reload.
    pub async fn write_entry(
        &self,
        habit_id: i32,
        date: &str,
        completed: Option<bool>,
        value: Option<i32>,
    ) -> Option<HabitEntry> {
        let request = CreateHabitEntryRequest {
            habit_id,
            date: date.to_string(),
            completed,
            value,
        };
        self.cache
            .run(
                ErrorCode::MarkHabitError,
                self.remote.add_habit_entry(&request),
                |_, entry| entry,
            )
            .await
    }

    /// Merge a confirmed entry into the tracked day's entries.
    pub fn merge_entry(&self, entry: HabitEntry) {
        let habit_id = entry.habit_id;
        let mut merged = false;
        self.cache.apply(|data| merged = data.merge_entry(entry));
        if !merged {
            debug!(habit_id, "entry is not for the tracked day, not merged");
        }
    }

    /// Full entry history for one habit. Not cached.
    pub async fn entries_for_habit(&self, habit_id: i32) -> Vec<HabitEntry> {
        self.cache
            .attempt(
                ErrorCode::GetEntriesError,
                self.remote.get_habit_entries_for_habit(habit_id),
            )
            .await
            .unwrap_or_default()
    }

    pub fn with_entries(&self) -> Vec<HabitWithEntry> {
        self.cache
            .read(|st| views::habits_with_entries(&st.data.habits, &st.data.today_entries))
    }

    pub fn stats(&self) -> HabitStats {
        self.cache.read(|st| views::habit_stats(&st.data.habits))
    }

    pub fn clear_error(&self) {
        self.cache.clear_error();
    }

    pub fn reset(&self) {
        self.cache.reset();
    }
}
