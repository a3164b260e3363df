use serde::{Deserialize, Serialize};

/// A user document from the `users` collection.
///
/// `device_token` is the push gateway's opaque handle for the user's
/// installed app instance; absent until the app registers one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub device_token: Option<String>,
}
