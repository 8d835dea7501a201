use serde::{Deserialize, Serialize};

use crate::budget_box::BudgetBox;

/// Top-level aggregate persisted as a single blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub active_box_id: Option<String>,
    #[serde(default)]
    pub boxes: Vec<BudgetBox>,
}

impl AppState {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn find_box(&self, id: &str) -> Option<&BudgetBox> {
        self.boxes.iter().find(|budget| budget.id == id)
    }

    pub fn find_box_mut(&mut self, id: &str) -> Option<&mut BudgetBox> {
        self.boxes.iter_mut().find(|budget| budget.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.boxes.iter().position(|budget| budget.id == id)
    }

    pub fn active_box(&self) -> Option<&BudgetBox> {
        self.active_box_id
            .as_deref()
            .and_then(|id| self.find_box(id))
    }

    /// Points `active_box_id` at an existing box: a dangling id falls back to the
    /// first box, or to none when there are no boxes.
    pub fn repair_active(&mut self) {
        let dangling = match self.active_box_id.as_deref() {
            Some(id) => self.find_box(id).is_none(),
            None => false,
        };
        if dangling {
            self.active_box_id = self.boxes.first().map(|budget| budget.id.clone());
        }
    }
}
