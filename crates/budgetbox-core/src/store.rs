//! Load/validate/persist of the whole application state.

use std::sync::Arc;

use budgetbox_domain::AppState;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    sanitize::{sanitize, sanitize_value},
    IdGenerator, KeyValueStore,
};

/// Key the serialized state lives under in the medium.
pub const STATE_KEY: &str = "budgetbox.state";

/// Result of a write that is never allowed to fail outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Persisted,
    Failed,
}

impl SaveOutcome {
    pub fn is_persisted(self) -> bool {
        matches!(self, SaveOutcome::Persisted)
    }
}

/// Owns the persisted blob and guarantees callers only ever see sanitized state.
#[derive(Clone)]
pub struct StateStore {
    medium: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
    key: String,
}

impl StateStore {
    pub fn new(medium: Arc<dyn KeyValueStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self::with_key(medium, ids, STATE_KEY)
    }

    pub fn with_key(
        medium: Arc<dyn KeyValueStore>,
        ids: Arc<dyn IdGenerator>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            medium,
            ids,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn sanitize(&self, state: AppState) -> AppState {
        sanitize(state, self.ids.as_ref())
    }

    /// Reads the persisted state, degrading every failure to the empty state.
    ///
    /// An entry that is not valid JSON is removed so it cannot fail again.
    pub fn load(&self) -> AppState {
        let raw = match self.medium.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no persisted state, starting empty");
                return AppState::default();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read persisted state");
                return AppState::default();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding unparseable state");
                if let Err(err) = self.medium.remove(&self.key) {
                    warn!(key = %self.key, error = %err, "failed to remove corrupted state");
                }
                return AppState::default();
            }
        };

        let Some(state) = sanitize_value(&value, self.ids.as_ref()) else {
            warn!(key = %self.key, "persisted state is not an object, starting empty");
            return AppState::default();
        };
        // Repairs such as regenerated ids must be stable across loads.
        if serde_json::to_value(&state).ok().as_ref() != Some(&value) {
            debug!(key = %self.key, "writing back repaired state");
            self.save(&state);
        }
        state
    }

    /// Sanitizes and writes `state`. Medium failures are logged, never propagated.
    pub fn save(&self, state: &AppState) -> SaveOutcome {
        let sanitized = self.sanitize(state.clone());
        let json = match serde_json::to_string(&sanitized) {
            Ok(json) => json,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to serialize state");
                return SaveOutcome::Failed;
            }
        };
        match self.medium.set(&self.key, &json) {
            Ok(()) => {
                debug!(key = %self.key, boxes = sanitized.boxes.len(), "state persisted");
                SaveOutcome::Persisted
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to persist state");
                SaveOutcome::Failed
            }
        }
    }

    /// Wipes the whole medium.
    pub fn reset(&self) -> SaveOutcome {
        match self.medium.clear() {
            Ok(()) => {
                info!("all boxes and expenses erased");
                SaveOutcome::Persisted
            }
            Err(err) => {
                warn!(error = %err, "failed to clear storage");
                SaveOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, SequentialIds};
    use budgetbox_domain::{BudgetBox, Expense, Period};

    fn store_with(medium: Arc<MemoryStore>) -> StateStore {
        StateStore::new(medium, Arc::new(SequentialIds::new()))
    }

    fn sample_state() -> AppState {
        let mut food = BudgetBox::new("a", "Food", Period::Daily, 100.0, "2024-03-15");
        food.expenses.push(Expense::new(30.0));
        let rent = BudgetBox::new("b", "Rent", Period::Monthly, 1200.0, "2024-03");
        AppState {
            active_box_id: Some("b".into()),
            boxes: vec![food, rent],
        }
    }

    #[test]
    fn load_of_absent_entry_is_empty() {
        let store = store_with(Arc::new(MemoryStore::new()));
        assert_eq!(store.load(), AppState::default());
    }

    #[test]
    fn save_then_load_roundtrips_sanitized_state() {
        let store = store_with(Arc::new(MemoryStore::new()));
        let state = sample_state();
        assert_eq!(store.save(&state), SaveOutcome::Persisted);
        assert_eq!(store.load(), store.sanitize(state));
    }

    #[test]
    fn unparseable_entry_is_removed() {
        let medium = Arc::new(MemoryStore::new());
        medium.set(STATE_KEY, "{not json").unwrap();
        let store = store_with(medium.clone());
        assert_eq!(store.load(), AppState::default());
        assert_eq!(medium.get(STATE_KEY).unwrap(), None);
    }

    #[test]
    fn structurally_invalid_entry_is_kept_but_ignored() {
        let medium = Arc::new(MemoryStore::new());
        medium.set(STATE_KEY, "[1,2,3]").unwrap();
        let store = store_with(medium.clone());
        assert_eq!(store.load(), AppState::default());
        assert!(medium.get(STATE_KEY).unwrap().is_some());
    }

    #[test]
    fn quota_failure_is_swallowed_and_previous_blob_survives() {
        let medium = Arc::new(MemoryStore::with_quota(400));
        let store = store_with(medium.clone());
        let small = AppState {
            active_box_id: None,
            boxes: vec![BudgetBox::new("a", "Food", Period::Daily, 10.0, "2024-03-15")],
        };
        assert_eq!(store.save(&small), SaveOutcome::Persisted);

        let mut large = small.clone();
        large.boxes[0].expenses = vec![Expense::new(1.0); 200];
        assert!(!store.save(&large).is_persisted());
        assert_eq!(store.load(), small);
    }

    #[test]
    fn custom_keys_share_one_medium() {
        let medium = Arc::new(MemoryStore::new());
        let ids = Arc::new(SequentialIds::new());
        let primary = StateStore::new(medium.clone(), ids.clone());
        let sandbox = StateStore::with_key(medium.clone(), ids, "budgetbox.sandbox");
        assert_eq!(sandbox.key(), "budgetbox.sandbox");

        assert!(primary.save(&sample_state()).is_persisted());
        assert_eq!(sandbox.load(), AppState::default());
        assert_eq!(medium.len(), 1);
    }

    #[test]
    fn repaired_ids_are_written_back_on_load() {
        let medium = Arc::new(MemoryStore::new());
        medium
            .set(
                STATE_KEY,
                r#"{"activeBoxId":null,"boxes":[{"name":"Loose","period":"daily",
                   "amountPerPeriod":10,"currentPeriod":"2024-03-15","expenses":[]}]}"#,
            )
            .unwrap();
        let store = store_with(medium.clone());

        let first = store.load();
        let second = store.load();
        assert!(!first.boxes[0].id.is_empty());
        assert_eq!(first.boxes[0].id, second.boxes[0].id);
        let raw = medium.get(STATE_KEY).unwrap().unwrap();
        assert!(raw.contains(&first.boxes[0].id));
    }

    #[test]
    fn clean_state_is_not_rewritten_on_load() {
        let medium = Arc::new(MemoryStore::new());
        let store = store_with(medium.clone());
        store.save(&sample_state());
        let before = medium.get(STATE_KEY).unwrap();
        store.load();
        assert_eq!(medium.get(STATE_KEY).unwrap(), before);
    }

    #[test]
    fn reset_clears_everything() {
        let medium = Arc::new(MemoryStore::new());
        medium.set("unrelated", "1").unwrap();
        let store = store_with(medium.clone());
        store.save(&sample_state());
        assert_eq!(store.reset(), SaveOutcome::Persisted);
        assert!(medium.is_empty());
        assert_eq!(store.load(), AppState::default());
    }
}
