use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{not_blank, null_as_empty, CreateItemRequest};
use crate::models::TodoStatus;
use crate::repositories::todo_repository::{SortOrder, TodoFilter};

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_OFFSET: u64 = 0;

/// Body of `POST /todos`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[validate(
        required(message = "title is required"),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,
    #[serde(alias = "subTitle")]
    pub subtitle: Option<String>,
    #[validate(custom(function = "not_deleted"))]
    pub status: Option<TodoStatus>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(nested)]
    pub items: Vec<CreateItemRequest>,
}

/// Body of `PATCH /todos/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(alias = "subTitle")]
    pub subtitle: Option<String>,
    pub status: Option<TodoStatus>,
}

/// Query string of `GET /todos`
///
/// Values arrive raw; [`TodoQuery::into_filter`] applies the paging defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoQuery {
    pub title: Option<String>,
    pub status: Option<TodoStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order: Option<String>,
}

impl TodoQuery {
    /// Normalize paging and ordering
    ///
    /// A non-positive or missing limit becomes 10, a negative or missing
    /// offset becomes 0 and anything but `ASC`/`DESC` sorts ascending.
    pub fn into_filter(self) -> TodoFilter {
        let limit = match self.limit {
            Some(limit) if limit > 0 => limit as u64,
            _ => DEFAULT_LIMIT,
        };
        let offset = match self.offset {
            Some(offset) if offset >= 0 => offset as u64,
            _ => DEFAULT_OFFSET,
        };

        TodoFilter {
            title: self.title.filter(|t| !t.is_empty()),
            status: self.status,
            limit,
            offset,
            order: SortOrder::parse(self.order.as_deref()),
        }
    }
}

/// New Todos start out ACTIVE or INACTIVE; DELETED is only reachable by deleting
fn not_deleted(status: &TodoStatus) -> Result<(), ValidationError> {
    if status.is_deleted() {
        let mut error = ValidationError::new("status");
        error.message = Some("a new todo cannot be created as DELETED".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn query(limit: Option<i64>, offset: Option<i64>, order: Option<&str>) -> TodoQuery {
        TodoQuery {
            limit,
            offset,
            order: order.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let filter = TodoQuery::default().into_filter();
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.order, SortOrder::Asc);
    }

    #[test]
    fn test_non_positive_limit_resets() {
        assert_eq!(query(Some(0), None, None).into_filter().limit, 10);
        assert_eq!(query(Some(-3), None, None).into_filter().limit, 10);
        assert_eq!(query(Some(5), None, None).into_filter().limit, 5);
    }

    #[test]
    fn test_negative_offset_resets() {
        assert_eq!(query(None, Some(-1), None).into_filter().offset, 0);
        assert_eq!(query(None, Some(20), None).into_filter().offset, 20);
    }

    #[test]
    fn test_order_falls_back_to_asc() {
        assert_eq!(query(None, None, Some("DESC")).into_filter().order, SortOrder::Desc);
        assert_eq!(query(None, None, Some("ASC")).into_filter().order, SortOrder::Asc);
        assert_eq!(query(None, None, Some("sideways")).into_filter().order, SortOrder::Asc);
    }

    #[test]
    fn test_create_requires_title() {
        let errors = CreateTodoRequest::default().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_create_rejects_blank_title_and_deleted_status() {
        let request = CreateTodoRequest {
            title: Some("   ".to_string()),
            status: Some(TodoStatus::Deleted),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("status"));
    }

    #[test]
    fn test_create_validates_nested_items() {
        let request = CreateTodoRequest {
            title: Some("Groceries".to_string()),
            items: vec![
                CreateItemRequest::new("milk"),
                CreateItemRequest::new(""),
            ],
            ..Default::default()
        };
        let errors = kit::ValidationErrors::from_validator(request.validate().unwrap_err());
        assert!(errors.errors.contains_key("items[1].description"));
        assert!(!errors.errors.contains_key("items[0].description"));
    }

    #[test]
    fn test_null_items_read_as_empty() {
        for body in [
            r#"{"title":"Groceries","items":null}"#,
            r#"{"title":"Groceries"}"#,
        ] {
            let parsed: CreateTodoRequest = serde_json::from_str(body).unwrap();
            assert!(parsed.items.is_empty(), "{}", body);
            assert!(parsed.validate().is_ok());
        }

        let parsed: CreateTodoRequest =
            serde_json::from_str(r#"{"title":"Groceries","items":[{"description":"milk"}]}"#)
                .unwrap();
        assert_eq!(parsed.items.len(), 1);
    }

    #[test]
    fn test_update_accepts_empty_body() {
        assert!(UpdateTodoRequest::default().validate().is_ok());
    }

    #[test]
    fn test_query_parses_from_query_string() {
        let parsed: TodoQuery =
            kit::http::parse_query("title=groc&status=INACTIVE&limit=5&order=DESC").unwrap();
        assert_eq!(parsed.title.as_deref(), Some("groc"));
        assert_eq!(parsed.status, Some(TodoStatus::Inactive));
        assert_eq!(parsed.limit, Some(5));
    }
}
