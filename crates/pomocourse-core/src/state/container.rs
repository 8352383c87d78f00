use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::{
    export_document, import_document, redistribute_schedule, regenerate_schedule,
    update_settings, AppState, Settings, SettingsPatch,
};
use crate::course::CourseConfig;
use crate::error::Result;
use crate::gamification::{apply_completion, CompletionAward, GamificationRules};
use crate::schedule::RedistributionSummary;
use crate::storage::StateStore;

/// Owner of the live document.
///
/// Every mutation builds the next document, saves it, and only then swaps
/// it in. A failed save leaves both the in-memory and stored document as
/// they were.
pub struct StateContainer<S: StateStore> {
    store: S,
    course: CourseConfig,
    rules: GamificationRules,
    state: AppState,
}

impl<S: StateStore> StateContainer<S> {
    /// Load the stored document (or start a fresh one), bring the plan up
    /// to date for `today`, and persist the result.
    ///
    /// # Errors
    /// Returns an error if the stored document cannot be read or parsed, or
    /// if the refreshed document cannot be saved.
    pub fn open(
        store: S,
        course: CourseConfig,
        rules: GamificationRules,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let loaded = match store.load()? {
            Some(state) => {
                debug!(entries = state.schedule.len(), "loaded document");
                state.normalized(&rules)
            }
            None => {
                info!("starting a new document");
                AppState::new(now)
            }
        };
        let state = regenerate_schedule(&loaded, &course, today);

        let mut container = Self {
            store,
            course,
            rules,
            state: loaded,
        };
        container.commit(state)?;
        Ok(container)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn course(&self) -> &CourseConfig {
        &self.course
    }

    pub fn rules(&self) -> &GamificationRules {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record `minutes` of completed work for `today`.
    ///
    /// # Errors
    /// Returns an error if the updated document cannot be saved.
    pub fn log_pomodoro(
        &mut self,
        minutes: u32,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CompletionAward> {
        let outcome = apply_completion(&self.state, minutes, today, now, &self.rules, &self.course);
        self.commit(outcome.state)?;
        for id in &outcome.award.new_badges {
            info!(badge = %id, "badge earned");
        }
        Ok(outcome.award)
    }

    /// Record several completions for `today` in order, saved as one change.
    ///
    /// Each completion sees the document left by the one before it, so a
    /// daily goal crossed by the second of three pays its bonus once.
    ///
    /// # Errors
    /// Returns an error if the updated document cannot be saved, in which
    /// case none of the completions are kept.
    pub fn log_pomodoros(
        &mut self,
        minutes: &[u32],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<CompletionAward>> {
        if minutes.is_empty() {
            return Ok(Vec::new());
        }
        let mut next = self.state.clone();
        let mut awards = Vec::with_capacity(minutes.len());
        for m in minutes {
            let outcome = apply_completion(&next, *m, today, now, &self.rules, &self.course);
            next = outcome.state;
            awards.push(outcome.award);
        }
        self.commit(next)?;
        for id in awards.iter().flat_map(|a| &a.new_badges) {
            info!(badge = %id, "badge earned");
        }
        Ok(awards)
    }

    /// Merge a partial settings update.
    ///
    /// # Errors
    /// Returns a validation error if a merged value is zero, or an error if
    /// the document cannot be saved.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<&Settings> {
        let next = update_settings(&self.state, patch)?;
        self.commit(next)?;
        Ok(&self.state.settings)
    }

    /// Run the full generator for `today`.
    ///
    /// # Errors
    /// Returns an error if the document cannot be saved.
    pub fn regenerate(&mut self, today: NaiveDate) -> Result<&AppState> {
        let next = regenerate_schedule(&self.state, &self.course, today);
        self.commit(next)?;
        Ok(&self.state)
    }

    /// Run only the redistributor for `today`.
    ///
    /// # Errors
    /// Returns an error if the document cannot be saved.
    pub fn redistribute(&mut self, today: NaiveDate) -> Result<RedistributionSummary> {
        let (next, summary) = redistribute_schedule(&self.state, today);
        self.commit(next)?;
        Ok(summary)
    }

    /// Replace the whole document with an imported one.
    ///
    /// On any error the current document is kept as is.
    ///
    /// # Errors
    /// Returns an `ImportError` for a rejected payload, or an error if the
    /// imported document cannot be saved.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let next = match import_document(json, &self.rules) {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "import rejected");
                return Err(e.into());
            }
        };
        self.commit(next)
    }

    /// The current document as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        Ok(export_document(&self.state)?)
    }

    fn commit(&mut self, next: AppState) -> Result<()> {
        self.store.save(&next)?;
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_iso;
    use crate::error::{CoreError, ImportError};
    use crate::storage::MemoryStateStore;
    use chrono::TimeZone;

    fn d(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 6, 8, 0, 0).unwrap()
    }

    fn open(store: MemoryStateStore) -> StateContainer<MemoryStateStore> {
        StateContainer::open(
            store,
            CourseConfig::default(),
            GamificationRules::default(),
            d("2025-11-06"),
            now(),
        )
        .unwrap()
    }

    /// Store whose saves always fail.
    #[derive(Default)]
    struct FailingStore {
        inner: MemoryStateStore,
        fail: bool,
    }

    impl StateStore for FailingStore {
        fn load(&self) -> Result<Option<AppState>> {
            self.inner.load()
        }

        fn save(&mut self, state: &AppState) -> Result<()> {
            if self.fail {
                return Err(CoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.save(state)
        }
    }

    #[test]
    fn first_open_generates_and_persists_a_plan() {
        let container = open(MemoryStateStore::new());
        assert_eq!(container.state().schedule.len(), 57);
        assert_eq!(container.state().gamification.level, 1);
        let stored = container.store().load().unwrap().unwrap();
        assert_eq!(&stored, container.state());
    }

    #[test]
    fn reopen_keeps_progress() {
        let mut container = open(MemoryStateStore::new());
        container.log_pomodoro(25, d("2025-11-06"), now()).unwrap();
        let store = container.store().clone();

        let reopened = open(store);
        assert_eq!(reopened.state().schedule[0].completed_minutes, 25);
        assert_eq!(reopened.state().gamification.points, 10);
    }

    #[test]
    fn log_pomodoro_updates_and_saves() {
        let mut container = open(MemoryStateStore::new());
        let planned = container.state().schedule[0].planned_minutes;
        let award = container.log_pomodoro(planned, d("2025-11-06"), now()).unwrap();
        assert!(award.goal_crossed);
        assert_eq!(award.points_awarded, 30);
        assert_eq!(container.state().gamification.streak_current, 1);
        assert_eq!(
            container.store().load().unwrap().unwrap().gamification.points,
            30
        );
    }

    #[test]
    fn rejected_import_leaves_document_byte_for_byte() {
        let mut container = open(MemoryStateStore::new());
        container.log_pomodoro(25, d("2025-11-06"), now()).unwrap();
        let raw_before = container.store().raw().unwrap().to_string();
        let state_before = container.state().clone();

        let mut json = serde_json::to_value(container.state()).unwrap();
        json.as_object_mut().unwrap().remove("schedule");
        let err = container.import_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, CoreError::Import(ImportError::MissingKey("schedule"))));
        assert!(container.import_json("not json").is_err());

        assert_eq!(container.store().raw().unwrap(), raw_before);
        assert_eq!(container.state(), &state_before);
    }

    #[test]
    fn export_then_import_roundtrips() {
        let mut container = open(MemoryStateStore::new());
        container.log_pomodoro(25, d("2025-11-06"), now()).unwrap();
        let exported = container.export_json().unwrap();

        let mut fresh = open(MemoryStateStore::new());
        fresh.import_json(&exported).unwrap();
        assert_eq!(fresh.state(), container.state());
    }

    #[test]
    fn invalid_settings_are_refused() {
        let mut container = open(MemoryStateStore::new());
        let patch = SettingsPatch {
            work_min: Some(0),
            ..SettingsPatch::default()
        };
        assert!(container.update_settings(&patch).is_err());
        assert_eq!(container.state().settings.work_min, 25);

        let patch = SettingsPatch {
            work_min: Some(45),
            ..SettingsPatch::default()
        };
        assert_eq!(container.update_settings(&patch).unwrap().work_min, 45);
    }

    #[test]
    fn failed_save_keeps_previous_document() {
        let mut container = StateContainer::open(
            FailingStore::default(),
            CourseConfig::default(),
            GamificationRules::default(),
            d("2025-11-06"),
            now(),
        )
        .unwrap();
        let before = container.state().clone();

        container.store.fail = true;
        assert!(container.log_pomodoro(25, d("2025-11-06"), now()).is_err());
        assert_eq!(container.state(), &before);
    }

    #[test]
    fn import_with_bad_settings_keeps_document() {
        let mut container = open(MemoryStateStore::new());
        container.log_pomodoro(25, d("2025-11-06"), now()).unwrap();
        let raw_before = container.store().raw().unwrap().to_string();
        let state_before = container.state().clone();

        let mut json = serde_json::to_value(container.state()).unwrap();
        json["settings"]["longBreakAfter"] = serde_json::json!(0);
        let err = container.import_json(&json.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Import(ImportError::InvalidSettings(_))
        ));

        assert_eq!(container.store().raw().unwrap(), raw_before);
        assert_eq!(container.state(), &state_before);
    }

    #[test]
    fn batched_completions_apply_in_order() {
        let today = d("2025-11-06");
        let mut container = open(MemoryStateStore::new());
        let planned = container.state().schedule[0].planned_minutes;

        let awards = container
            .log_pomodoros(&[planned - 5, 25, 25], today, now())
            .unwrap();
        let crossed: Vec<bool> = awards.iter().map(|a| a.goal_crossed).collect();
        assert_eq!(crossed, vec![false, true, false]);
        assert_eq!(container.state().gamification.points, 10 + 30 + 10);
        assert_eq!(
            container.state().schedule[0].completed_minutes,
            planned - 5 + 50
        );
        assert_eq!(&container.store().load().unwrap().unwrap(), container.state());

        assert!(container.log_pomodoros(&[], today, now()).unwrap().is_empty());
    }

    #[test]
    fn failed_batch_keeps_none_of_it() {
        let mut container = StateContainer::open(
            FailingStore::default(),
            CourseConfig::default(),
            GamificationRules::default(),
            d("2025-11-06"),
            now(),
        )
        .unwrap();
        let before = container.state().clone();

        container.store.fail = true;
        let err = container
            .log_pomodoros(&[25, 25], d("2025-11-06"), now())
            .unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
        assert_eq!(container.state(), &before);
        assert_eq!(container.store.inner.load().unwrap().unwrap(), before);
    }

    #[test]
    fn redistribute_moves_past_deficit_forward() {
        let mut container = open(MemoryStateStore::new());
        let total_before: u64 = container
            .state()
            .schedule
            .iter()
            .map(|e| u64::from(e.planned_minutes))
            .sum();
        let summary = container.redistribute(d("2025-11-08")).unwrap();
        assert_eq!(summary.future_days, 55);
        assert!(summary.carried_minutes > 0);

        let total_after: u64 = container
            .state()
            .schedule
            .iter()
            .map(|e| u64::from(e.planned_minutes))
            .sum();
        assert_eq!(total_before, total_after);
    }
}
