//! Autosave of the in-progress application.
//!
//! The snapshot is a JSON object stored under [`SNAPSHOT_KEY`]:
//!
//! ```json
//! {
//!   "dealType": "buy_hold",
//!   "titleInfo": { "companyName": "...", ... },
//!   "experienceInfo": { "yearsOfExperience": 3, ... },
//!   "formData": { "estimatedMonthlyRent": 2000, ... },
//!   "currentStep": 2
//! }
//! ```
//!
//! Derived values are never written. A snapshot that cannot be read back is
//! logged and otherwise treated as absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{SnapshotStore, StoreError};
use crate::models::{DealDetails, DealType, ExperienceInfo, TitleInfo};
use crate::wizard::{FormState, Step};

/// Fixed key of the single in-progress application.
pub const SNAPSHOT_KEY: &str = "dekacapital-intake-form";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot step {0} is outside 1-4")]
    InvalidStep(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub deal_type: DealType,
    #[serde(default)]
    pub title_info: TitleInfo,
    #[serde(default)]
    pub experience_info: ExperienceInfo,
    #[serde(default)]
    pub form_data: Value,
    pub current_step: u8,
}

impl Snapshot {
    /// `None` while no deal type is chosen, and once submitted.
    pub fn capture(state: &FormState) -> Result<Option<Self>, serde_json::Error> {
        let Some(deal) = state.deal() else {
            return Ok(None);
        };
        if state.is_submitted() {
            return Ok(None);
        }
        Ok(Some(Self {
            deal_type: deal.deal_type(),
            title_info: state.title().clone(),
            experience_info: state.experience().clone(),
            form_data: deal.to_form_data()?,
            current_step: state.step().number(),
        }))
    }

    pub fn parse(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn into_state(self) -> Result<FormState, SnapshotError> {
        let step =
            Step::from_number(self.current_step).ok_or(SnapshotError::InvalidStep(self.current_step))?;
        let form_data = match self.form_data {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let deal = DealDetails::from_form_data(self.deal_type, form_data)?;
        Ok(FormState::from_parts(
            step,
            deal,
            self.title_info,
            self.experience_info,
        ))
    }
}

/// Saves the form after every change and restores it on start-up.
pub struct Autosave {
    store: Box<dyn SnapshotStore>,
    key: String,
}

impl Autosave {
    pub fn new(store: Box<dyn SnapshotStore>) -> Self {
        Self::with_key(store, SNAPSHOT_KEY)
    }

    pub fn with_key(
        store: Box<dyn SnapshotStore>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The saved form, if there is one and it parses.
    pub async fn restore(&self) -> Option<FormState> {
        let raw = match self.store.load(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, "failed to load saved form: {}", e);
                return None;
            }
        };

        match Snapshot::parse(&raw).and_then(Snapshot::into_state) {
            Ok(state) => {
                debug!(key = %self.key, step = state.step().number(), "restored saved form");
                Some(state)
            }
            Err(e) => {
                warn!(key = %self.key, "ignoring saved form: {}", e);
                None
            }
        }
    }

    /// Writes the current state. Does nothing until a deal type is chosen.
    pub async fn observe(
        &self,
        state: &FormState,
    ) -> Result<(), StoreError> {
        let Some(snapshot) = Snapshot::capture(state)? else {
            return Ok(());
        };
        self.store.save(&self.key, &snapshot.to_json()?).await?;
        debug!(key = %self.key, step = snapshot.current_step, "form saved");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.delete(&self.key).await?;
        debug!(key = %self.key, "saved form cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::models::BuyHoldDetails;
    use crate::store::MemoryStore;
    use crate::wizard::FieldInput;

    fn buy_hold_state() -> FormState {
        let mut state = FormState::new();
        state.select_deal_type(DealType::BuyHold).unwrap();
        state
            .set_field("estimatedMonthlyRent", FieldInput::text("200000"))
            .unwrap();
        state
            .set_field("currentMonthlyPayment", FieldInput::text("90000"))
            .unwrap();
        state
            .set_field("companyName", FieldInput::text("Acme Title"))
            .unwrap();
        state
    }

    fn autosave() -> (Autosave, MemoryStore) {
        let store = MemoryStore::new();
        (Autosave::new(Box::new(store.clone())), store)
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    #[test]
    fn capture_skips_state_without_deal_type() {
        assert!(Snapshot::capture(&FormState::new()).unwrap().is_none());
    }

    #[test]
    fn capture_skips_submitted_state() {
        let mut state = buy_hold_state();
        state.mark_submitted();

        assert!(Snapshot::capture(&state).unwrap().is_none());
    }

    #[test]
    fn snapshot_never_contains_derived_values() {
        let snapshot = Snapshot::capture(&buy_hold_state()).unwrap().unwrap();
        let json = snapshot.to_json().unwrap();

        assert!(!json.contains("calculatedNOI"));
        assert!(!json.contains("calculatedDSCR"));
        assert_eq!(snapshot.current_step, 1);
        assert_eq!(snapshot.form_data["estimatedMonthlyRent"], json!(2000.0));
    }

    #[test]
    fn snapshot_restores_equal_state() {
        let state = buy_hold_state();
        let json = Snapshot::capture(&state).unwrap().unwrap().to_json().unwrap();

        let restored = Snapshot::parse(&json).unwrap().into_state().unwrap();

        assert_eq!(restored, state);
        assert_eq!(restored.coverage(), state.coverage());
    }

    #[test]
    fn snapshot_rejects_unknown_deal_type() {
        let raw = json!({
            "dealType": "timeshare",
            "formData": {},
            "currentStep": 2
        })
        .to_string();

        assert!(matches!(Snapshot::parse(&raw), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn snapshot_rejects_step_out_of_range() {
        let raw = json!({
            "dealType": "emd",
            "formData": {},
            "currentStep": 7
        })
        .to_string();

        let err = Snapshot::parse(&raw).unwrap().into_state().unwrap_err();

        assert!(matches!(err, SnapshotError::InvalidStep(7)));
    }

    #[test]
    fn snapshot_tolerates_missing_sections() {
        let raw = json!({
            "dealType": "buy_hold",
            "formData": { "estimatedMonthlyRent": 1500 },
            "currentStep": 3
        })
        .to_string();

        let state = Snapshot::parse(&raw).unwrap().into_state().unwrap();

        assert_eq!(state.step(), Step::TitleInfo);
        assert_eq!(state.title(), &TitleInfo::default());
        let Some(DealDetails::BuyHold(BuyHoldDetails {
            estimated_monthly_rent,
            ..
        })) = state.deal()
        else {
            panic!("expected buy and hold details");
        };
        assert_eq!(*estimated_monthly_rent, dec!(1500));
    }

    // =========================================================================
    // Autosave
    // =========================================================================

    #[tokio::test]
    async fn observe_then_restore_round_trips() {
        let (autosave, store) = autosave();
        let state = buy_hold_state();

        autosave.observe(&state).await.unwrap();

        assert!(store.get(SNAPSHOT_KEY).is_some());
        assert_eq!(autosave.restore().await, Some(state));
    }

    #[tokio::test]
    async fn observe_without_deal_type_writes_nothing() {
        let (autosave, store) = autosave();

        autosave.observe(&FormState::new()).await.unwrap();

        assert_eq!(store.get(SNAPSHOT_KEY), None);
    }

    #[tokio::test]
    async fn restore_ignores_garbage() {
        let (autosave, store) = autosave();
        store.insert(SNAPSHOT_KEY, "{not json");

        assert_eq!(autosave.restore().await, None);
        // left in place; only submit or reset removes it
        assert!(store.get(SNAPSHOT_KEY).is_some());
    }

    #[tokio::test]
    async fn clear_removes_snapshot() {
        let (autosave, store) = autosave();
        autosave.observe(&buy_hold_state()).await.unwrap();

        autosave.clear().await.unwrap();

        assert_eq!(store.get(SNAPSHOT_KEY), None);
        assert_eq!(autosave.restore().await, None);
    }
}
