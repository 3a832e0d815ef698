use kit::FrameworkError;
use validator::Validate;

use crate::models::{TodoStatus, TodoWithItems};
use crate::repositories::todo_repository::{NewItem, NewTodo, TodoChanges};
use crate::repositories::{Page, TodoRepository};
use crate::requests::{CreateTodoRequest, TodoQuery, UpdateTodoRequest};

#[derive(Clone)]
pub struct TodoService {
    todos: TodoRepository,
}

impl TodoService {
    pub fn new(todos: TodoRepository) -> Self {
        Self { todos }
    }

    /// Validate and insert a Todo together with its Items in one transaction
    pub async fn create_todo(&self, request: CreateTodoRequest) -> Result<TodoWithItems, FrameworkError> {
        request.validate()?;

        let CreateTodoRequest {
            title,
            subtitle,
            status,
            items,
        } = request;
        let title = title.ok_or_else(|| FrameworkError::bad_request("Title is required"))?;
        let items = items
            .into_iter()
            .map(|item| NewItem {
                description: item.description,
                is_completed: item.is_completed,
            })
            .collect::<Vec<_>>();
        let item_count = items.len();

        let todo = self
            .todos
            .create_todo_with_items(
                NewTodo {
                    title,
                    subtitle,
                    status: status.unwrap_or_default(),
                },
                items,
            )
            .await?;

        tracing::info!(todo_id = todo.id(), items = item_count, "todo created");
        Ok(todo)
    }

    pub async fn list_todos(&self, query: TodoQuery) -> Result<Page<TodoWithItems>, FrameworkError> {
        let filter = query.into_filter();
        tracing::debug!(?filter, "listing todos");
        Ok(self.todos.find_todos(&filter).await?)
    }

    pub async fn get_todo_by_id(&self, id: i32) -> Result<TodoWithItems, FrameworkError> {
        self.todos
            .find_todo_by_id(id)
            .await?
            .ok_or_else(|| FrameworkError::not_found("Todo"))
    }

    /// Apply a partial update; callers re-fetch to see the result
    pub async fn update_todo_by_id(&self, id: i32, request: UpdateTodoRequest) -> Result<(), FrameworkError> {
        request.validate()?;
        self.get_todo_by_id(id).await?;

        self.todos
            .update_todo_by_id(
                id,
                TodoChanges {
                    title: request.title,
                    subtitle: request.subtitle,
                    status: request.status,
                },
            )
            .await?;

        tracing::info!(todo_id = id, "todo updated");
        Ok(())
    }

    pub async fn delete_todo_by_id(&self, id: i32) -> Result<(), FrameworkError> {
        self.get_todo_by_id(id).await?;
        self.todos.soft_delete_todo_by_id(id).await?;

        tracing::info!(todo_id = id, status = ?TodoStatus::Deleted, "todo soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::Migrator;
    use crate::requests::CreateItemRequest;
    use kit::expect;
    use kit::testing::TestDatabase;

    async fn service() -> TodoService {
        let db = TestDatabase::new::<Migrator>().await.unwrap();
        TodoService::new(TodoRepository::new(db.connection()))
    }

    fn create(title: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_items() {
        let service = service().await;
        let todo = service
            .create_todo(CreateTodoRequest {
                items: vec![CreateItemRequest::new("milk"), CreateItemRequest::new("eggs").completed()],
                ..create("Groceries")
            })
            .await
            .unwrap();

        expect!(todo.todo.status).to_equal(TodoStatus::Active);
        expect!(todo.items.len()).to_equal(2);
        expect!(todo.items[1].completed_at).to_be_some();
    }

    #[tokio::test]
    async fn test_create_rejects_missing_title() {
        let service = service().await;
        let err = service.create_todo(CreateTodoRequest::default()).await.unwrap_err();
        expect!(err.status_code()).to_equal(400);
        expect!(err.to_json()["error"]["details"]["title"].is_array()).to_be_true();
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let service = service().await;
        let err = service.get_todo_by_id(42).await.unwrap_err();
        expect!(err.status_code()).to_equal(404);
        expect!(err.to_string()).to_equal("Todo not found".to_string());
    }

    #[tokio::test]
    async fn test_update_and_delete_require_existing_todo() {
        let service = service().await;
        let update = service.update_todo_by_id(7, UpdateTodoRequest::default()).await;
        expect!(update.unwrap_err().status_code()).to_equal(404);
        let delete = service.delete_todo_by_id(7).await;
        expect!(delete.unwrap_err().status_code()).to_equal(404);
    }

    #[tokio::test]
    async fn test_list_reports_effective_paging() {
        let service = service().await;
        service.create_todo(create("one")).await.unwrap();

        let page = service
            .list_todos(TodoQuery {
                limit: Some(-1),
                offset: Some(-5),
                ..Default::default()
            })
            .await
            .unwrap();
        expect!(page.limit).to_equal(10);
        expect!(page.offset).to_equal(0);
        expect!(page.total).to_equal(1);
    }

    #[tokio::test]
    async fn test_delete_is_soft() {
        let service = service().await;
        let todo = service.create_todo(create("Temporary")).await.unwrap();

        service.delete_todo_by_id(todo.id()).await.unwrap();

        let page = service.list_todos(TodoQuery::default()).await.unwrap();
        expect!(page.data).to_be_empty();
        let fetched = service.get_todo_by_id(todo.id()).await.unwrap();
        expect!(fetched.todo.deleted_at).to_be_some();
    }
}
