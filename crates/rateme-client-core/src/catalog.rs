use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::UserModel;

/// Built-in models as (display label, backend key) pairs, in menu order.
pub const BUILTIN_MODELS: [(&str, &str); 4] = [
    ("Товары", "goods"),
    ("Одежда", "clothes"),
    ("Фильмы", "films"),
    ("Товары и одежда", "goods-and-clothes"),
];

/// Identifier the backend uses to pick a prediction model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelKey(String);

impl ModelKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelOrigin {
    Builtin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    pub label: String,
    pub key: ModelKey,
    pub origin: ModelOrigin,
}

impl ModelOption {
    pub fn builtin(label: &str, key: &str) -> Self {
        Self {
            label: label.to_string(),
            key: ModelKey::new(key),
            origin: ModelOrigin::Builtin,
        }
    }

    /// User models are shown by name but addressed by their remote id.
    pub fn from_user_model(model: &UserModel) -> Self {
        Self {
            label: model.name.clone(),
            key: ModelKey::new(model.id.to_string()),
            origin: ModelOrigin::User,
        }
    }
}

pub fn builtin_models() -> Vec<ModelOption> {
    BUILTIN_MODELS
        .iter()
        .map(|(label, key)| ModelOption::builtin(label, key))
        .collect()
}

/// The backend lists models oldest first.
pub fn most_recent_user_model(models: &[UserModel]) -> Option<&UserModel> {
    models.last()
}
