//! Achievement cache.
//!
//! Achievement status is monotonic (Locked → Available → Earned). A reload
//! that would move a cached achievement backwards keeps the cached entry.

use tracing::warn;

use super::{DomainCache, Domain, ErrorCode};
use crate::model::{Achievement, AchievementStatus};
use crate::remote::Remote;
use crate::views::{self, AchievementStats};

pub struct AchievementStore {
    remote: Remote,
    cache: DomainCache<Vec<Achievement>>,
}

impl AchievementStore {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            cache: DomainCache::new(Domain::Achievement),
        }
    }

    pub fn cache(&self) -> &DomainCache<Vec<Achievement>> {
        &self.cache
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        self.cache.read(|st| st.data.clone())
    }

    pub async fn load(&self) -> bool {
        self.cache
            .run(
                ErrorCode::LoadAchievementsError,
                self.remote.get_all_achievements(),
                |cached, fresh| *cached = merge_monotonic(cached, fresh),
            )
            .await
            .is_some()
    }

    /// Backend-side filter by status. Not cached.
    pub async fn by_status(&self, status: AchievementStatus) -> Vec<Achievement> {
        self.cache
            .attempt(
                ErrorCode::AchievementsByStatusError,
                self.remote.get_achievements_by_status(status),
            )
            .await
            .unwrap_or_default()
    }

    /// Ask the backend to re-evaluate eligibility. Returned achievements
    /// already cached are updated in place; callers reload for the full set.
    pub async fn check_and_update(&self) -> Option<Vec<Achievement>> {
        self.cache
            .run(
                ErrorCode::CheckAchievementsError,
                self.remote.check_and_update_achievements(),
                |cached, updated: Vec<Achievement>| {
                    for achievement in &updated {
                        apply_achievement(cached, achievement.clone());
                    }
                    updated
                },
            )
            .await
    }

    pub async fn earn(&self, achievement_id: i32) -> Option<Achievement> {
        self.cache
            .run(
                ErrorCode::EarnAchievementError,
                self.remote.earn_achievement(achievement_id),
                |cached, achievement: Achievement| {
                    apply_achievement(cached, achievement.clone());
                    achievement
                },
            )
            .await
    }

    /// `(earned, available, locked)` as counted by the backend. Not cached.
    pub async fn remote_stats(&self) -> Option<(i32, i32, i32)> {
        self.cache
            .attempt(
                ErrorCode::AchievementStatsError,
                self.remote.get_achievement_stats(),
            )
            .await
    }

    pub fn with_status(&self, status: AchievementStatus) -> Vec<Achievement> {
        self.cache
            .read(|st| views::achievements_with_status(&st.data, status))
    }

    pub fn stats(&self) -> AchievementStats {
        self.cache.read(|st| views::achievement_stats(&st.data))
    }

    pub fn clear_error(&self) {
        self.cache.clear_error();
    }

    pub fn reset(&self) {
        self.cache.reset();
    }
}

/// Replace by id unless that would regress the cached status.
fn apply_achievement(cached: &mut [Achievement], achievement: Achievement) {
    if let Some(slot) = cached.iter_mut().find(|a| a.id == achievement.id) {
        if let Some(kept) = keep_cached(slot, &achievement) {
            *slot = kept;
        } else {
            *slot = achievement;
        }
    }
}

/// Take the fresh list, substituting cached entries wherever the fresh one
/// would move backwards.
fn merge_monotonic(cached: &[Achievement], fresh: Vec<Achievement>) -> Vec<Achievement> {
    fresh
        .into_iter()
        .map(|incoming| {
            cached
                .iter()
                .find(|a| a.id == incoming.id)
                .and_then(|old| keep_cached(old, &incoming))
                .unwrap_or(incoming)
        })
        .collect()
}

fn keep_cached(old: &Achievement, incoming: &Achievement) -> Option<Achievement> {
    if old.status.can_transition_to(incoming.status) {
        return None;
    }
    warn!(
        achievement_id = old.id,
        from = %old.status,
        to = %incoming.status,
        "ignoring achievement status regression"
    );
    Some(old.clone())
}
