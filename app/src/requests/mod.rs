//! Inbound request bodies and query strings
//!
//! Field rules are declared with `validator` derives and checked by the
//! services before anything touches the database.

pub mod item;
pub mod todo;

pub use item::{CreateItemRequest, ItemQuery, UpdateItemRequest};
pub use todo::{CreateTodoRequest, TodoQuery, UpdateTodoRequest};

use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use validator::ValidationError;

/// Reads an explicit `null` list as empty
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rejects strings that are empty or only whitespace
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("must not be empty"));
        return Err(error);
    }
    Ok(())
}
