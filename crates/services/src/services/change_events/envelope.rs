//! Wire envelope for document-change deliveries.
//!
//! The hosting platform invokes this layer with a serialized description of
//! the change: which collection, what kind of change, and the before/after
//! document bodies. Decoding it is the only place the raw payload is touched.

use models::documents::{chat_message::ChatMessage, task::Task};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::ChangeEvent;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Change on '{collection}' is missing its '{side}' document")]
    MissingDocument {
        collection: String,
        side: &'static str,
    },

    #[error("Failed to decode '{collection}' document: {source}")]
    Decode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The kind of document change the platform observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOperation {
    Create,
    Update,
    Delete,
}

/// A document-change delivery as supplied by the hosting platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChange {
    /// Platform-assigned id of the triggering event. Redeliveries reuse it;
    /// this layer does not deduplicate on it.
    pub event_id: String,
    pub collection: String,
    pub operation: ChangeOperation,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
}

impl DocumentChange {
    /// Decodes the envelope into a `ChangeEvent`.
    ///
    /// Changes no handler subscribes to (unknown collections, deletes,
    /// message updates) decode to `None`. A subscribed change with a missing
    /// or undecodable document is an error.
    pub fn into_event(self) -> Result<Option<ChangeEvent>, EnvelopeError> {
        let DocumentChange {
            event_id,
            collection,
            operation,
            before,
            after,
        } = self;

        match (collection.as_str(), operation) {
            ("tasks", ChangeOperation::Create) => {
                let task: Task = decode(&collection, after, "after")?;
                Ok(Some(ChangeEvent::TaskCreated { task }))
            }
            ("tasks", ChangeOperation::Update) => {
                let before: Task = decode(&collection, before, "before")?;
                let after: Task = decode(&collection, after, "after")?;
                Ok(Some(ChangeEvent::TaskUpdated { before, after }))
            }
            ("messages", ChangeOperation::Create) => {
                let message: ChatMessage = decode(&collection, after, "after")?;
                Ok(Some(ChangeEvent::ChatMessageCreated { message }))
            }
            _ => {
                tracing::debug!(
                    event = %event_id,
                    collection = %collection,
                    "No handler subscribed to this change"
                );
                Ok(None)
            }
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    collection: &str,
    document: Option<Value>,
    side: &'static str,
) -> Result<T, EnvelopeError> {
    let value = document.ok_or_else(|| EnvelopeError::MissingDocument {
        collection: collection.to_string(),
        side,
    })?;
    serde_json::from_value(value).map_err(|source| EnvelopeError::Decode {
        collection: collection.to_string(),
        source,
    })
}
