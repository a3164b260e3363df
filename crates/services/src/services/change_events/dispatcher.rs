//! Change-event dispatcher for routing events to registered handlers.
//!
//! The dispatcher manages handler registration and event routing. Matching
//! handlers run sequentially within the invocation; concurrency across
//! events belongs to the hosting platform.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{ChangeEvent, DispatchOutcome, EventHandler, HandlerContext, HandlerError};

/// Result of running one handler against one event.
#[derive(Debug)]
pub struct HandlerRun {
    pub handler: &'static str,
    pub result: Result<DispatchOutcome, HandlerError>,
}

/// Dispatches document-change events to registered handlers.
///
/// Handlers are sorted by name for deterministic ordering. A failing handler
/// does not stop the remaining ones; every handler's result is reported back
/// so the embedding invocation framework observes failures.
pub struct ChangeEventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
    ctx: Arc<HandlerContext>,
}

impl ChangeEventDispatcher {
    /// Dispatches an event to all handlers that accept it, sequentially.
    pub async fn dispatch(&self, event: ChangeEvent) -> Vec<HandlerRun> {
        let mut runs = Vec::new();

        for handler in &self.handlers {
            if !handler.handles(&event) {
                continue;
            }

            debug!(
                handler = handler.name(),
                collection = event.collection(),
                "Dispatching event to handler"
            );

            let result = handler.handle(event.clone(), &self.ctx).await;
            match &result {
                Ok(DispatchOutcome::Sent { user_id }) => {
                    debug!(
                        handler = handler.name(),
                        user = %user_id,
                        "Notification sent"
                    );
                }
                Ok(DispatchOutcome::Skipped(reason)) => {
                    debug!(
                        handler = handler.name(),
                        reason = %reason,
                        "Handler skipped event"
                    );
                }
                Err(e) => {
                    warn!(
                        handler = handler.name(),
                        error = %e,
                        "Handler failed"
                    );
                }
            }

            runs.push(HandlerRun {
                handler: handler.name(),
                result,
            });
        }

        runs
    }
}

/// Builder for constructing a `ChangeEventDispatcher`.
pub struct DispatcherBuilder {
    handlers: Vec<Arc<dyn EventHandler>>,
    ctx: Option<HandlerContext>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            ctx: None,
        }
    }

    /// Adds a handler to the dispatcher.
    pub fn with_handler<H: EventHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Sets the handler context.
    pub fn with_context(mut self, ctx: HandlerContext) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Builds the dispatcher.
    ///
    /// # Panics
    /// Panics if no context was provided.
    pub fn build(mut self) -> ChangeEventDispatcher {
        let ctx = self
            .ctx
            .expect("HandlerContext is required to build ChangeEventDispatcher");

        // Sort handlers by name for deterministic ordering
        self.handlers.sort_by_key(|h| h.name());

        ChangeEventDispatcher {
            handlers: self.handlers,
            ctx: Arc::new(ctx),
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
