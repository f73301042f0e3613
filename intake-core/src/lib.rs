//! Lead-intake wizard for real-estate funding requests.
//!
//! A borrower picks a transaction type, fills in its deal-specific fields,
//! names a title company, describes their experience and submits. Submission
//! uploads the attached documents and posts a tagged JSON payload to an
//! automation webhook. The in-progress form is autosaved through a
//! [`SnapshotStore`].

pub mod calculations;
pub mod models;
pub mod session;
pub mod store;
pub mod submission;
pub mod template;
pub mod validation;
pub mod wizard;

pub use models::*;
pub use session::{IntakeSession, SessionError};
pub use store::{Autosave, MemoryStore, SnapshotStore, StoreError};
pub use submission::{
    DocumentStorage, GENERIC_FAILURE_NOTICE, SubmissionError, SubmissionPipeline,
    SubmissionReceipt, TransportError, WebhookSink,
};
pub use validation::FieldErrors;
pub use wizard::{FieldInput, FieldInputError, FormState, Step, StepError};
