use kit::FrameworkError;
use validator::Validate;

use crate::models::items;
use crate::repositories::item_repository::{ItemChanges, ItemFilter};
use crate::repositories::{ItemRepository, TodoRepository};
use crate::requests::{CreateItemRequest, ItemQuery, UpdateItemRequest};

/// Item operations, always scoped to the owning Todo
#[derive(Clone)]
pub struct ItemService {
    todos: TodoRepository,
    items: ItemRepository,
}

impl ItemService {
    pub fn new(todos: TodoRepository, items: ItemRepository) -> Self {
        Self { todos, items }
    }

    async fn ensure_todo_exists(&self, todo_id: i32) -> Result<(), FrameworkError> {
        match self.todos.find_todo_by_id(todo_id).await? {
            Some(_) => Ok(()),
            None => Err(FrameworkError::not_found("Todo")),
        }
    }

    async fn ensure_item_exists(&self, todo_id: i32, id: i32) -> Result<items::Model, FrameworkError> {
        self.get_item(todo_id, id)
            .await?
            .ok_or_else(|| FrameworkError::not_found("Item"))
    }

    pub async fn create_item(
        &self,
        todo_id: i32,
        request: CreateItemRequest,
    ) -> Result<items::Model, FrameworkError> {
        request.validate()?;
        self.ensure_todo_exists(todo_id).await?;

        let item = self
            .items
            .create_item(todo_id, request.description, request.is_completed)
            .await?;

        tracing::info!(todo_id, item_id = item.id, "item created");
        Ok(item)
    }

    /// Items of an existing Todo; an unknown Todo is NotFound rather than an empty list
    pub async fn list_items(
        &self,
        todo_id: i32,
        query: ItemQuery,
    ) -> Result<Vec<items::Model>, FrameworkError> {
        self.ensure_todo_exists(todo_id).await?;

        let filter = ItemFilter {
            todo_id,
            description: query.description.filter(|d| !d.is_empty()),
            is_completed: query.is_completed,
        };
        Ok(self.items.find_items(&filter).await?)
    }

    /// `None` when the Item does not exist under `todo_id`
    pub async fn get_item(&self, todo_id: i32, id: i32) -> Result<Option<items::Model>, FrameworkError> {
        Ok(self.items.find_item_by_todo_and_id(todo_id, id).await?)
    }

    pub async fn update_item(
        &self,
        todo_id: i32,
        id: i32,
        request: UpdateItemRequest,
    ) -> Result<(), FrameworkError> {
        request.validate()?;
        self.ensure_item_exists(todo_id, id).await?;

        self.items
            .update_item_by_todo_and_id(
                todo_id,
                id,
                ItemChanges {
                    description: request.description,
                    is_completed: request.is_completed,
                },
            )
            .await?;

        tracing::info!(todo_id, item_id = id, "item updated");
        Ok(())
    }

    pub async fn delete_item(&self, todo_id: i32, id: i32) -> Result<(), FrameworkError> {
        self.ensure_item_exists(todo_id, id).await?;
        self.items.delete_item_by_todo_and_id(todo_id, id).await?;

        tracing::info!(todo_id, item_id = id, "item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::Migrator;
    use crate::models::TodoStatus;
    use crate::repositories::todo_repository::NewTodo;
    use kit::expect;
    use kit::testing::TestDatabase;

    async fn setup() -> (ItemService, i32, i32) {
        let db = TestDatabase::new::<Migrator>().await.unwrap();
        let todos = TodoRepository::new(db.connection());
        let mut ids = Vec::new();
        for title in ["first", "second"] {
            let todo = todos
                .create_todo_with_items(
                    NewTodo {
                        title: title.to_string(),
                        subtitle: None,
                        status: TodoStatus::Active,
                    },
                    vec![],
                )
                .await
                .unwrap();
            ids.push(todo.id());
        }
        let service = ItemService::new(todos, ItemRepository::new(db.connection()));
        (service, ids[0], ids[1])
    }

    #[tokio::test]
    async fn test_create_requires_owner() {
        let (service, _, _) = setup().await;
        let err = service
            .create_item(404, CreateItemRequest::new("milk"))
            .await
            .unwrap_err();
        expect!(err.status_code()).to_equal(404);
        expect!(err.to_string()).to_equal("Todo not found".to_string());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_description() {
        let (service, todo_id, _) = setup().await;
        let err = service
            .create_item(todo_id, CreateItemRequest::new(""))
            .await
            .unwrap_err();
        expect!(err.status_code()).to_equal(400);
    }

    #[tokio::test]
    async fn test_wrong_owner_is_not_found() {
        let (service, mine, theirs) = setup().await;
        let item = service
            .create_item(mine, CreateItemRequest::new("milk"))
            .await
            .unwrap();

        expect!(service.get_item(theirs, item.id).await.unwrap()).to_be_none();

        let update = service
            .update_item(theirs, item.id, UpdateItemRequest::default())
            .await
            .unwrap_err();
        expect!(update.status_code()).to_equal(404);
        expect!(update.to_string()).to_equal("Item not found".to_string());

        let delete = service.delete_item(theirs, item.id).await.unwrap_err();
        expect!(delete.status_code()).to_equal(404);

        expect!(service.get_item(mine, item.id).await.unwrap()).to_be_some();
    }

    #[tokio::test]
    async fn test_list_unknown_todo_is_not_found() {
        let (service, todo_id, _) = setup().await;
        expect!(service.list_items(todo_id, ItemQuery::default()).await.unwrap()).to_be_empty();

        let err = service.list_items(999, ItemQuery::default()).await.unwrap_err();
        expect!(err.status_code()).to_equal(404);
    }

    #[tokio::test]
    async fn test_completion_round_trip() {
        let (service, todo_id, _) = setup().await;
        let item = service
            .create_item(todo_id, CreateItemRequest::new("milk"))
            .await
            .unwrap();

        service
            .update_item(
                todo_id,
                item.id,
                UpdateItemRequest {
                    is_completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let done = service.get_item(todo_id, item.id).await.unwrap().unwrap();
        expect!(done.completed_at).to_be_some();

        service
            .update_item(
                todo_id,
                item.id,
                UpdateItemRequest {
                    is_completed: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let reopened = service.get_item(todo_id, item.id).await.unwrap().unwrap();
        expect!(reopened.completed_at).to_be_none();
    }
}
