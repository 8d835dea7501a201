//! Facade running every operation as one load → rollover → mutate → save cycle.

use std::sync::{Arc, Mutex, MutexGuard};

use budgetbox_domain::{AppState, BudgetBox};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    box_service::{BoxDraft, BoxPatch, BoxService},
    expense_service::ExpenseService,
    summary_service::{BoxDetail, Dashboard, SummaryService},
    Clock, CoreError, IdGenerator, SaveOutcome, StateStore,
};

/// Coordinates the state store, the clock and the services.
///
/// Each operation reloads from the store so hand edits of the medium are picked up
/// (and sanitized) immediately. When a write is rejected the session keeps working
/// from the unsaved state until a later write reaches the medium again.
pub struct BoxManager {
    store: StateStore,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    unsaved: Mutex<Option<AppState>>,
}

impl BoxManager {
    pub fn new(store: StateStore, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            clock,
            ids,
            unsaved: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// True while the session holds changes the medium rejected.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_state().is_some()
    }

    /// The state as this session sees it, without rolling over or persisting.
    pub fn snapshot(&self) -> AppState {
        self.current()
    }

    /// Read path: loads, rolls every box over and persists the result.
    pub fn state(&self) -> AppState {
        let mut state = self.current();
        let rolled = BoxService::rollover_all(&mut state, self.now());
        if rolled > 0 {
            debug!(rolled, "boxes rolled over on read");
        }
        self.persist(&state);
        state
    }

    pub fn dashboard(&self) -> Dashboard {
        SummaryService::dashboard(&self.state())
    }

    /// Detail of the box currently open, if any.
    pub fn active_box(&self) -> Option<BoxDetail> {
        self.state().active_box().map(SummaryService::detail)
    }

    pub fn open_box(&self, id: &str) -> Result<BoxDetail, CoreError> {
        let mut state = self.state();
        BoxService::open(&mut state, id, self.now())?;
        self.persist(&state);
        Self::detail_of(&state, id)
    }

    pub fn create_box(&self, draft: BoxDraft) -> Result<BoxDetail, CoreError> {
        self.mutate(|state, now, ids| {
            let id = BoxService::create(state, draft, now, ids)?;
            Self::detail_of(state, &id)
        })
    }

    pub fn edit_box(&self, id: &str, patch: BoxPatch) -> Result<BoxDetail, CoreError> {
        self.mutate(|state, now, _| {
            BoxService::edit(state, id, patch, now)?;
            Self::detail_of(state, id)
        })
    }

    pub fn delete_box(&self, id: &str) -> Result<BudgetBox, CoreError> {
        self.mutate(|state, _, _| BoxService::remove(state, id))
    }

    pub fn add_expense(&self, box_id: &str, amount: f64) -> Result<BoxDetail, CoreError> {
        self.mutate(|state, now, _| {
            ExpenseService::add(state, box_id, amount, now)?;
            Self::detail_of(state, box_id)
        })
    }

    pub fn edit_expense(
        &self,
        box_id: &str,
        index: usize,
        amount: f64,
    ) -> Result<BoxDetail, CoreError> {
        self.mutate(|state, now, _| {
            ExpenseService::edit(state, box_id, index, amount, now)?;
            Self::detail_of(state, box_id)
        })
    }

    pub fn delete_expense(&self, box_id: &str, index: usize) -> Result<BoxDetail, CoreError> {
        self.mutate(|state, now, _| {
            ExpenseService::remove(state, box_id, index, now)?;
            Self::detail_of(state, box_id)
        })
    }

    /// Erases every box and expense.
    pub fn reset(&self) -> SaveOutcome {
        let outcome = self.store.reset();
        *self.unsaved_state() = (!outcome.is_persisted()).then(AppState::default);
        outcome
    }

    /// Write path: nothing is persisted when `op` fails.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut AppState, DateTime<Utc>, &dyn IdGenerator) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut state = self.current();
        let value = op(&mut state, self.now(), self.ids.as_ref())?;
        self.persist(&state);
        Ok(value)
    }

    /// The unsaved session state if a write was rejected, else the medium's.
    fn current(&self) -> AppState {
        if let Some(state) = self.unsaved_state().as_ref() {
            return state.clone();
        }
        self.store.load()
    }

    fn persist(&self, state: &AppState) -> SaveOutcome {
        let outcome = self.store.save(state);
        let mut unsaved = self.unsaved_state();
        if outcome.is_persisted() {
            if unsaved.take().is_some() {
                debug!("unsaved changes reached the medium");
            }
        } else {
            if unsaved.is_none() {
                warn!("storage rejected the write, keeping changes for this session");
            }
            *unsaved = Some(self.store.sanitize(state.clone()));
        }
        outcome
    }

    fn unsaved_state(&self) -> MutexGuard<'_, Option<AppState>> {
        self.unsaved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn detail_of(state: &AppState, id: &str) -> Result<BoxDetail, CoreError> {
        BoxService::get(state, id).map(SummaryService::detail)
    }
}
