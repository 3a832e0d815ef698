use kit::{HttpResponse, Request, Response};

use crate::requests::{CreateTodoRequest, TodoQuery, UpdateTodoRequest};
use crate::state::AppState;

/// GET /todos
pub async fn index(state: AppState, req: Request) -> Response {
    let query: TodoQuery = req.query()?;
    let page = state.todos.list_todos(query).await?;
    Ok(HttpResponse::serialize(&page)?)
}

/// POST /todos
pub async fn store(state: AppState, req: Request) -> Response {
    let request: CreateTodoRequest = req.json()?;
    let todo = state.todos.create_todo(request).await?;
    Ok(HttpResponse::serialize(&todo)?.status(201))
}

/// GET /todos/{todo_id}
pub async fn show(state: AppState, req: Request) -> Response {
    let id: i32 = req.param_as("todo_id")?;
    let todo = state.todos.get_todo_by_id(id).await?;
    Ok(HttpResponse::serialize(&todo)?)
}

/// PATCH /todos/{todo_id}
pub async fn update(state: AppState, req: Request) -> Response {
    let id: i32 = req.param_as("todo_id")?;
    let request: UpdateTodoRequest = req.json()?;
    state.todos.update_todo_by_id(id, request).await?;

    let todo = state.todos.get_todo_by_id(id).await?;
    Ok(HttpResponse::serialize(&todo)?)
}

/// DELETE /todos/{todo_id}
pub async fn destroy(state: AppState, req: Request) -> Response {
    let id: i32 = req.param_as("todo_id")?;
    state.todos.delete_todo_by_id(id).await?;
    Ok(HttpResponse::no_content())
}
