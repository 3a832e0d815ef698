use kit::DbConnection;

use crate::repositories::{ItemRepository, TodoRepository};
use crate::services::{ItemService, TodoService};

/// Everything a handler needs, cloned into each request
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
    pub items: ItemService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        let todo_repository = TodoRepository::new(db.clone());
        let item_repository = ItemRepository::new(db);

        Self {
            todos: TodoService::new(todo_repository.clone()),
            items: ItemService::new(todo_repository, item_repository),
        }
    }
}
