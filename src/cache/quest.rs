//! Quest cache.

use tracing::warn;

use super::{DomainCache, Domain, ErrorCode};
use crate::model::{Quest, QuestStatus, replace_by_id};
use crate::remote::Remote;
use crate::views::{self, QuestStats};

pub struct QuestStore {
    remote: Remote,
    cache: DomainCache<Vec<Quest>>,
}

impl QuestStore {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            cache: DomainCache::new(Domain::Quest),
        }
    }

    pub fn cache(&self) -> &DomainCache<Vec<Quest>> {
        &self.cache
    }

    pub fn quests(&self) -> Vec<Quest> {
        self.cache.read(|st| st.data.clone())
    }

    pub async fn load_active(&self) -> bool {
        self.cache
            .run(
                ErrorCode::LoadActiveQuestsError,
                self.remote.get_active_quests(),
                |quests, fresh| *quests = fresh,
            )
            .await
            .is_some()
    }

    /// Replace the cache with one week's quests (`None` = current week).
    pub async fn load_for_week(&self, week: Option<&str>) -> bool {
        self.cache
            .run(
                ErrorCode::LoadQuestsError,
                self.remote.get_quests_for_week(week),
                |quests, fresh| *quests = fresh,
            )
            .await
            .is_some()
    }

    /// Ask the backend to generate this week's quests. The new quests are
    /// returned; the cache is refreshed by reloading afterwards.
    pub async fn generate_weekly(&self) -> Option<Vec<Quest>> {
        self.cache
            .run(
                ErrorCode::GenerateQuestsError,
                self.remote.generate_weekly_quests(),
                |_, generated| generated,
            )
            .await
    }

    /// Ask the backend to recompute progress. Updated quests already cached
    /// are replaced in place.
    pub async fn update_progress(&self) -> Option<Vec<Quest>> {
        self.cache
            .run(
                ErrorCode::UpdateProgressError,
                self.remote.update_quest_progress(),
                |quests, updated: Vec<Quest>| {
                    for quest in &updated {
                        apply_quest(quests, quest.clone());
                    }
                    updated
                },
            )
            .await
    }

    pub async fn complete(&self, quest_id: i32) -> Option<Quest> {
        self.cache
            .run(
                ErrorCode::CompleteQuestError,
                self.remote.complete_quest(quest_id),
                |quests, quest: Quest| {
                    apply_quest(quests, quest.clone());
                    quest
                },
            )
            .await
    }

    /// Expire quests past their deadline. Returns how many expired.
    pub async fn expire_overdue(&self) -> Option<i32> {
        self.cache
            .run(
                ErrorCode::ExpireQuestsError,
                self.remote.expire_overdue_quests(),
                |_, count| count,
            )
            .await
    }

    pub fn with_status(&self, status: QuestStatus) -> Vec<Quest> {
        self.cache
            .read(|st| views::quests_with_status(&st.data, status))
    }

    pub fn stats(&self) -> QuestStats {
        self.cache.read(|st| views::quest_stats(&st.data))
    }

    pub fn clear_error(&self) {
        self.cache.clear_error();
    }

    pub fn reset(&self) {
        self.cache.reset();
    }
}

/// Replace a cached quest by id. The backend is authoritative, so an
/// unexpected transition is applied but logged.
fn apply_quest(quests: &mut [Quest], quest: Quest) {
    let cached = quests.iter().find(|q| q.id == quest.id);
    if let Some(cached) = cached.filter(|c| !c.status.can_transition_to(quest.status)) {
        warn!(
            quest_id = quest.id,
            from = %cached.status,
            to = %quest.status,
            "unexpected quest status transition"
        );
    }
    replace_by_id(quests, quest);
}
