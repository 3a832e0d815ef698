//! Todos model
//!
//! Custom behaviour for the `todos` entity defined in `entities/todos.rs`.

pub use super::entities::todos::*;

use super::items;
use sea_orm::entity::prelude::*;
use serde::Serialize;

impl ActiveModelBehavior for ActiveModel {}

impl TodoStatus {
    pub fn is_deleted(self) -> bool {
        self == TodoStatus::Deleted
    }
}

impl Model {
    /// Whether the row has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A Todo together with its Items, ordered by item id
///
/// Serializes as the Todo's own fields plus an `items` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoWithItems {
    #[serde(flatten)]
    pub todo: Model,
    pub items: Vec<items::Model>,
}

impl TodoWithItems {
    pub fn id(&self) -> i32 {
        self.todo.id
    }
}
