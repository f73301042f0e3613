//! One borrower's application: the form state plus its autosave.
//!
//! Every successful mutation is followed by a snapshot write, so a front end
//! that exits between actions picks up where it left off.

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::DealType;
use crate::store::{Autosave, SnapshotStore, StoreError};
use crate::submission::{
    DocumentStorage, SubmissionError, SubmissionPipeline, SubmissionReceipt, WebhookSink,
};
use crate::wizard::{FieldInput, FieldInputError, FormState, Step, StepError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Field(#[from] FieldInputError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("failed to save the form: {0}")]
    Store(#[from] StoreError),
}

pub struct IntakeSession {
    state: FormState,
    autosave: Autosave,
}

impl IntakeSession {
    /// Opens a session over `store`, resuming a saved form when one exists.
    pub async fn open(store: Box<dyn SnapshotStore>) -> Self {
        let autosave = Autosave::new(store);
        let state = autosave.restore().await.unwrap_or_default();
        Self { state, autosave }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub async fn select_deal_type(
        &mut self,
        deal_type: DealType,
    ) -> Result<(), SessionError> {
        self.state.select_deal_type(deal_type)?;
        self.save().await
    }

    pub async fn set_field(
        &mut self,
        field: &str,
        value: FieldInput,
    ) -> Result<(), SessionError> {
        self.state.set_field(field, value)?;
        self.save().await
    }

    pub async fn attach_file(
        &mut self,
        field: &str,
        path: &Path,
    ) -> Result<(), SessionError> {
        self.state.attach_file(field, path)?;
        self.save().await
    }

    pub async fn detach_file(
        &mut self,
        field: &str,
    ) -> Result<(), SessionError> {
        self.state.detach_file(field)?;
        self.save().await
    }

    pub async fn next(&mut self) -> Result<Step, SessionError> {
        let step = self.state.next()?;
        self.save().await?;
        Ok(step)
    }

    pub async fn back(&mut self) -> Result<Step, SessionError> {
        let step = self.state.back()?;
        self.save().await?;
        Ok(step)
    }

    /// Validates step 4, then runs the pipeline.
    ///
    /// On success the snapshot is removed and the form becomes `Submitted`.
    /// On failure the form stays on step 4 with its errors and snapshot
    /// untouched.
    pub async fn submit<D, W>(
        &mut self,
        pipeline: &SubmissionPipeline<D, W>,
    ) -> Result<SubmissionReceipt, SessionError>
    where
        D: DocumentStorage,
        W: WebhookSink,
    {
        self.state.validate_for_submit()?;
        let receipt = pipeline.run(&self.state).await?;

        if let Err(e) = self.autosave.clear().await {
            warn!("submitted, but the saved form could not be removed: {}", e);
        }
        self.state.mark_submitted();
        info!(files = receipt.files.len(), "submission complete");
        Ok(receipt)
    }

    /// Discards the current form and its snapshot.
    pub async fn reset(&mut self) -> Result<(), SessionError> {
        self.state.reset();
        self.autosave.clear().await?;
        info!("started a new application");
        Ok(())
    }

    async fn save(&self) -> Result<(), SessionError> {
        self.autosave.observe(&self.state).await?;
        Ok(())
    }
}
