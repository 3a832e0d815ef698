use kit::{DbConnection, Router};

use crate::controllers;
use crate::state::AppState;

/// Build the router and its state on top of a database connection
pub fn register(db: DbConnection) -> Router<AppState> {
    Router::new(AppState::new(db))
        .get("/todos", controllers::todo::index)
        .post("/todos", controllers::todo::store)
        .get("/todos/{todo_id}", controllers::todo::show)
        .patch("/todos/{todo_id}", controllers::todo::update)
        .delete("/todos/{todo_id}", controllers::todo::destroy)
        .get("/todos/{todo_id}/items", controllers::item::index)
        .post("/todos/{todo_id}/items", controllers::item::store)
        .get("/todos/{todo_id}/items/{id}", controllers::item::show)
        .patch("/todos/{todo_id}/items/{id}", controllers::item::update)
        .delete("/todos/{todo_id}/items/{id}", controllers::item::destroy)
}
