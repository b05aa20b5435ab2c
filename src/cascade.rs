//! Cross-store workflows.
//!
//! A single user action often changes several entities on the backend:
//! marking a habit can move its streak, award experience and level the
//! character up. The stores never call each other; the workflows here
//! sequence the dependent reloads instead, each inside a tracing span and
//! announced on the [`EventBus`].
//!
//! Two failure styles coexist. Habit and quest completion hard-abort when
//! their first (writing) step fails. Initialization is best-effort: every
//! step runs and failures are collected into an [`InitReport`].

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{Instrument, Span, info};

use crate::cache::{
    AchievementStore, CharacterStore, Domain, ErrorCode, HabitStore, Provisioning, QuestStore,
    TaskStore,
};
use crate::dates;
use crate::event::{EventBus, EventKind};
use crate::model::{Achievement, ExperienceResult, HabitEntry, Quest};
use crate::notify::NotificationQueue;
use crate::telemetry::{metrics, workflow};

/// A step of a best-effort workflow that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStep {
    pub step: &'static str,
    pub domain: Domain,
}

/// Outcome of [`Cascade::initialize_quest_system`] or
/// [`Cascade::initialize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InitReport {
    pub failed: Vec<FailedStep>,
    /// Quests expired by the backend, when that step succeeded.
    pub expired_quests: Option<i32>,
}

impl InitReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_steps(&self) -> Vec<&'static str> {
        self.failed.iter().map(|f| f.step).collect()
    }
}

/// One workflow execution: span, timing and failed-step bookkeeping.
struct Run<'a> {
    name: &'static str,
    events: &'a EventBus,
    span: Span,
    started: Instant,
    failed: Vec<FailedStep>,
}

impl<'a> Run<'a> {
    fn start(name: &'static str, events: &'a EventBus) -> Self {
        events.publish(EventKind::WorkflowStarted {
            workflow: name.to_string(),
        });
        Self {
            name,
            events,
            span: workflow::start_workflow_span(name),
            started: Instant::now(),
            failed: Vec::new(),
        }
    }

    /// Note a step's outcome; a failure is published and kept.
    fn step(&mut self, step: &'static str, domain: Domain, ok: bool) {
        workflow::record_step(&self.span, step, ok);
        if !ok {
            self.events.publish(EventKind::StepFailed {
                workflow: self.name.to_string(),
                step: step.to_string(),
                domain,
            });
            self.failed.push(FailedStep { step, domain });
        }
    }

    fn abort(self, step: &'static str, code: ErrorCode) {
        workflow::record_step(&self.span, step, false);
        workflow::record_outcome(&self.span, "aborted");
        self.events.publish(EventKind::WorkflowAborted {
            workflow: self.name.to_string(),
            step: step.to_string(),
            code,
        });
        self.record_duration();
    }

    fn finish(self) -> Vec<FailedStep> {
        let outcome = if self.failed.is_empty() { "ok" } else { "partial" };
        workflow::record_outcome(&self.span, outcome);
        self.events.publish(EventKind::WorkflowFinished {
            workflow: self.name.to_string(),
            duration_ms: self.started.elapsed().as_millis() as u64,
            failed_steps: self.failed.len(),
        });
        self.record_duration();
        self.failed
    }

    fn record_duration(&self) {
        let ms = self.started.elapsed().as_secs_f64() * 1000.0;
        metrics::record_workflow_duration(self.name, ms);
    }
}

/// The cascade orchestrator. Cheap to clone; clones share every store.
#[derive(Clone)]
pub struct Cascade {
    character: Arc<CharacterStore>,
    tasks: Arc<TaskStore>,
    habits: Arc<HabitStore>,
    quests: Arc<QuestStore>,
    achievements: Arc<AchievementStore>,
    notifications: NotificationQueue,
    events: EventBus,
}

impl Cascade {
    pub fn new(
        character: Arc<CharacterStore>,
        tasks: Arc<TaskStore>,
        habits: Arc<HabitStore>,
        quests: Arc<QuestStore>,
        achievements: Arc<AchievementStore>,
        notifications: NotificationQueue,
        events: EventBus,
    ) -> Self {
        Self {
            character,
            tasks,
            habits,
            quests,
            achievements,
            notifications,
            events,
        }
    }

    // -----------------------------------------------------------------------
    // Habit completion
    // -----------------------------------------------------------------------

    /// Record today's entry for a habit and propagate the consequences.
    pub async fn mark_habit_today(
        &self,
        habit_id: i32,
        completed: Option<bool>,
        value: Option<i32>,
    ) -> Option<HabitEntry> {
        self.mark_habit_for_date(habit_id, &dates::today(), completed, value)
            .await
    }

    /// Record an entry, then reload habits (streaks), merge the entry,
    /// reload the character (experience) and announce a level-up.
    ///
    /// If the write fails nothing beyond the habit store's error slot
    /// changes. Once it succeeds every later step runs regardless of the
    /// others' outcome.
    pub async fn mark_habit_for_date(
        &self,
        habit_id: i32,
        date: &str,
        completed: Option<bool>,
        value: Option<i32>,
    ) -> Option<HabitEntry> {
        let mut run = Run::start("mark_habit", &self.events);
        let span = run.span.clone();

        async {
            let level_before = self.character.level();

            let Some(entry) = self
                .habits
                .write_entry(habit_id, date, completed, value)
                .await
            else {
                run.abort("write_entry", ErrorCode::MarkHabitError);
                return None;
            };
            run.step("write_entry", Domain::Habit, true);

            let reloaded = self.habits.load().await;
            run.step("reload_habits", Domain::Habit, reloaded);

            self.habits.merge_entry(entry.clone());

            let reloaded = self.character.load().await.is_some();
            run.step("reload_character", Domain::Character, reloaded);

            self.announce_level_up(level_before, self.character.level());
            run.finish();
            Some(entry)
        }
        .instrument(span)
        .await
    }

    // -----------------------------------------------------------------------
    // Quest completion
    // -----------------------------------------------------------------------

    /// Complete a quest, then let the backend re-evaluate achievements and
    /// reload them. The reload runs even if the check fails.
    pub async fn complete_quest(&self, quest_id: i32) -> Option<Quest> {
        let mut run = Run::start("complete_quest", &self.events);
        let span = run.span.clone();

        async {
            let Some(quest) = self.quests.complete(quest_id).await else {
                run.abort("complete_quest", ErrorCode::CompleteQuestError);
                return None;
            };
            run.step("complete_quest", Domain::Quest, true);

            let checked = self.achievements.check_and_update().await.is_some();
            run.step("check_achievements", Domain::Achievement, checked);

            let reloaded = self.achievements.load().await;
            run.step("reload_achievements", Domain::Achievement, reloaded);

            run.finish();
            Some(quest)
        }
        .instrument(span)
        .await
    }

    // -----------------------------------------------------------------------
    // Initialization
    // -----------------------------------------------------------------------

    /// Bring quests and achievements up to date: expire, reload, recompute
    /// progress, reload, then load, check and reload achievements. Every
    /// step runs; failures are reported, not propagated.
    pub async fn initialize_quest_system(&self) -> InitReport {
        let mut run = Run::start("initialize_quest_system", &self.events);
        let span = run.span.clone();

        async {
            let expired = self.quests.expire_overdue().await;
            run.step("expire_overdue", Domain::Quest, expired.is_some());

            self.quest_system_steps(&mut run).await;

            InitReport {
                failed: run.finish(),
                expired_quests: expired,
            }
        }
        .instrument(span)
        .await
    }

    async fn quest_system_steps(&self, run: &mut Run<'_>) {
        let ok = self.quests.load_active().await;
        run.step("load_active_quests", Domain::Quest, ok);

        let ok = self.quests.update_progress().await.is_some();
        run.step("update_quest_progress", Domain::Quest, ok);

        let ok = self.quests.load_active().await;
        run.step("reload_active_quests", Domain::Quest, ok);

        let ok = self.achievements.load().await;
        run.step("load_achievements", Domain::Achievement, ok);

        let ok = self.achievements.check_and_update().await.is_some();
        run.step("check_achievements", Domain::Achievement, ok);

        let ok = self.achievements.load().await;
        run.step("reload_achievements", Domain::Achievement, ok);
    }

    /// Application start-up: provision the character, load tasks and
    /// habits, then run the quest-system steps. Best-effort throughout.
    pub async fn initialize(&self) -> InitReport {
        let mut run = Run::start("initialize", &self.events);
        let span = run.span.clone();

        async {
            let provisioned = match self.character.initialize().await {
                Provisioning::Loaded(c) => Some(c),
                Provisioning::Created(c) => {
                    self.events
                        .publish(EventKind::CharacterProvisioned { level: c.level });
                    Some(c)
                }
                Provisioning::Failed => None,
            };
            run.step("initialize_character", Domain::Character, provisioned.is_some());

            let ok = self.tasks.load().await;
            run.step("load_tasks", Domain::Task, ok);

            self.habits.initialize().await;
            let ok = self.habits.cache().error().is_none();
            run.step("initialize_habits", Domain::Habit, ok);

            let expired = self.quests.expire_overdue().await;
            run.step("expire_overdue", Domain::Quest, expired.is_some());

            self.quest_system_steps(&mut run).await;

            let report = InitReport {
                failed: run.finish(),
                expired_quests: expired,
            };
            info!(failed = report.failed.len(), "initialization finished");
            report
        }
        .instrument(span)
        .await
    }

    // -----------------------------------------------------------------------
    // Single-store actions with side effects
    // -----------------------------------------------------------------------

    /// Award experience. A level-up reported by the backend is announced
    /// even when no level was cached beforehand.
    pub async fn award_experience(&self, exp_points: i64) -> Option<ExperienceResult> {
        let level_before = self.character.level();
        let result = self.character.add_experience(exp_points).await?;
        if result.level_up {
            self.push_level_up(level_before, result.character.level);
        }
        Some(result)
    }

    /// Generate this week's quests and reload the active set.
    pub async fn generate_weekly_quests(&self) -> Option<Vec<Quest>> {
        let mut run = Run::start("generate_weekly_quests", &self.events);
        let span = run.span.clone();

        async {
            let Some(generated) = self.quests.generate_weekly().await else {
                run.abort("generate_weekly", ErrorCode::GenerateQuestsError);
                return None;
            };
            run.step("generate_weekly", Domain::Quest, true);

            let ok = self.quests.load_active().await;
            run.step("load_active_quests", Domain::Quest, ok);

            run.finish();
            Some(generated)
        }
        .instrument(span)
        .await
    }

    pub async fn earn_achievement(&self, achievement_id: i32) -> Option<Achievement> {
        self.achievements.earn(achievement_id).await
    }

    /// Enqueue one notification when `after` is strictly above `before`.
    /// A jump over several levels yields a single notification for the
    /// final level. Nothing happens if no level was known beforehand.
    fn announce_level_up(&self, before: Option<i32>, after: Option<i32>) {
        let (Some(before), Some(after)) = (before, after) else {
            return;
        };
        if after > before {
            self.push_level_up(Some(before), after);
        }
    }

    fn push_level_up(&self, from: Option<i32>, to: i32) {
        info!(?from, to, "level up");
        metrics::record_level_up(to);
        self.notifications.add(to);
        self.events.publish(EventKind::LevelUp { from, to });
    }
}
