use serde::Deserialize;
use validator::Validate;

use super::not_blank;

/// Body of `POST /todos/{todo_id}/items`, also used for items nested in a new Todo
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl CreateItemRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            is_completed: false,
        }
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }
}

/// Body of `PATCH /todos/{todo_id}/items/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

/// Query string of `GET /todos/{todo_id}/items`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}
