use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle status of a task document.
///
/// Statuses are written by the mobile app. Anything we do not recognize is
/// preserved as `Other` so a new app-side status never breaks decoding.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Open,
    Completed,
    #[serde(other)]
    Other,
}

/// A task document from the `tasks` collection.
///
/// Owned and mutated by the mobile app; this subsystem only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// User the task was assigned to.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// User who made the assignment.
    #[serde(default)]
    pub assigned_by: Option<String>,
}

impl Task {
    /// Title as shown in notification bodies, with the fallback for
    /// untitled tasks.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("No Title")
    }
}
