use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Portfolio profile document.
///
/// Only the fields the backend itself reads or writes are typed; everything
/// else the client sends (experience, education, social links, ...) is kept
/// verbatim in `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_template: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Profile {
    pub fn new(username: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            username: username.into(),
            ..Default::default()
        }
    }

    /// Current profile photo URL, ignoring empty strings.
    pub fn current_photo(&self) -> Option<&str> {
        self.profile_photo
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Take the server-owned fields (username, user id, profile photo) from
    /// the stored document. Only the upload path ever sets the photo.
    pub fn inherit_from(&mut self, existing: &Profile) {
        self.username = existing.username.clone();
        if existing.user_id.is_some() {
            self.user_id = existing.user_id.clone();
        }
        self.profile_photo = existing.profile_photo.clone();
    }

    /// Partial update: every field present (and non-null) in `updates` wins,
    /// everything else is kept. Username, user id and profile photo never
    /// change here.
    pub fn apply_update(&mut self, updates: Profile) {
        if updates.selected_template.is_some() {
            self.selected_template = updates.selected_template;
        }
        for (field, value) in updates.fields {
            if !value.is_null() {
                self.fields.insert(field, value);
            }
        }
    }
}
