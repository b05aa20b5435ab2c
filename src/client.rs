//! The client context: one explicitly constructed owner of every store.
//!
//! Build one [`ProgressionClient`] per backend connection and hand clones
//! of it (or of individual stores) to whatever renders the UI. Separate
//! clients are fully isolated from each other.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{AchievementStore, CharacterStore, HabitStore, QuestStore, TaskStore};
use crate::cascade::Cascade;
use crate::config::Config;
use crate::event::EventBus;
use crate::notify::NotificationQueue;
use crate::remote::{Remote, Transport};

#[derive(Clone)]
pub struct ProgressionClient {
    remote: Remote,
    character: Arc<CharacterStore>,
    tasks: Arc<TaskStore>,
    habits: Arc<HabitStore>,
    quests: Arc<QuestStore>,
    achievements: Arc<AchievementStore>,
    notifications: NotificationQueue,
    events: EventBus,
    cascade: Cascade,
}

impl ProgressionClient {
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        let remote = Remote::new(transport);
        let character = Arc::new(
            CharacterStore::new(remote.clone(), config.default_class)
                .with_attribute_cap(config.attribute_cap),
        );
        let tasks = Arc::new(TaskStore::new(remote.clone()));
        let habits = Arc::new(HabitStore::new(remote.clone()));
        let quests = Arc::new(QuestStore::new(remote.clone()));
        let achievements = Arc::new(AchievementStore::new(remote.clone()));
        let notifications =
            NotificationQueue::new(Duration::from_millis(config.notification_ttl_ms));
        let events = EventBus::default();

        let cascade = Cascade::new(
            character.clone(),
            tasks.clone(),
            habits.clone(),
            quests.clone(),
            achievements.clone(),
            notifications.clone(),
            events.clone(),
        );

        Self {
            remote,
            character,
            tasks,
            habits,
            quests,
            achievements,
            notifications,
            events,
            cascade,
        }
    }

    /// Client with default configuration.
    pub fn with_defaults(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, &Config::default())
    }

    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    pub fn character(&self) -> &CharacterStore {
        &self.character
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn habits(&self) -> &HabitStore {
        &self.habits
    }

    pub fn quests(&self) -> &QuestStore {
        &self.quests
    }

    pub fn achievements(&self) -> &AchievementStore {
        &self.achievements
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// Return every cache to its initial state and drop notifications,
    /// e.g. on logout.
    pub fn reset(&self) {
        self.character.reset();
        self.tasks.reset();
        self.habits.reset();
        self.quests.reset();
        self.achievements.reset();
        self.notifications.clear();
    }
}
