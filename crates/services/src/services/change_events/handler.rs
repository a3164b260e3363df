use std::sync::Arc;

use async_trait::async_trait;
use strum_macros::Display;
use thiserror::Error;

use super::ChangeEvent;
use crate::services::{
    directory::{DirectoryError, UserDirectory},
    push::{PushError, PushSender},
};

/// Error type for event handler failures.
///
/// These propagate to the invocation framework. Skips are not errors; they
/// are reported through `DispatchOutcome` instead.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Directory lookup failed: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Push delivery failed: {0}")]
    Delivery(#[from] PushError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a handler chose not to send anything for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// The event shape or status transition is not one this handler reacts to.
    NotApplicable,
    /// The document carries no target user reference.
    MissingReference,
    /// The referenced user does not exist in the directory.
    UnknownUser,
    /// The user exists but has no registered device token.
    MissingToken,
}

/// What a handler did with an event.
///
/// At most one send happens per invocation; every skip is a success from the
/// invocation framework's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent { user_id: String },
    Skipped(SkipReason),
}

/// Context provided to event handlers, containing the shared service handles.
#[derive(Clone)]
pub struct HandlerContext {
    pub directory: Arc<dyn UserDirectory>,
    pub push: Arc<dyn PushSender>,
}

impl HandlerContext {
    pub fn new(directory: Arc<dyn UserDirectory>, push: Arc<dyn PushSender>) -> Self {
        Self { directory, push }
    }
}

/// Trait for document-change event handlers.
///
/// Implement this trait to create handlers that react to document changes.
/// Handlers filter which events they process via the `handles` method.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Returns the name of this handler (for logging and debugging).
    fn name(&self) -> &'static str;

    /// Returns true if this handler should process the given event.
    fn handles(&self, event: &ChangeEvent) -> bool;

    /// Handles the event. Called only if `handles` returned true.
    async fn handle(
        &self,
        event: ChangeEvent,
        ctx: &HandlerContext,
    ) -> Result<DispatchOutcome, HandlerError>;
}
