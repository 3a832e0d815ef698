use kit::{FrameworkError, HttpResponse, Request, Response};

use crate::requests::{CreateItemRequest, ItemQuery, UpdateItemRequest};
use crate::state::AppState;

fn ids(req: &Request) -> Result<(i32, i32), FrameworkError> {
    Ok((req.param_as("todo_id")?, req.param_as("id")?))
}

/// GET /todos/{todo_id}/items
pub async fn index(state: AppState, req: Request) -> Response {
    let todo_id: i32 = req.param_as("todo_id")?;
    let query: ItemQuery = req.query()?;
    let items = state.items.list_items(todo_id, query).await?;
    Ok(HttpResponse::serialize(&items)?)
}

/// POST /todos/{todo_id}/items
pub async fn store(state: AppState, req: Request) -> Response {
    let todo_id: i32 = req.param_as("todo_id")?;
    let request: CreateItemRequest = req.json()?;
    let item = state.items.create_item(todo_id, request).await?;
    Ok(HttpResponse::serialize(&item)?.status(201))
}

/// GET /todos/{todo_id}/items/{id}
pub async fn show(state: AppState, req: Request) -> Response {
    let (todo_id, id) = ids(&req)?;
    match state.items.get_item(todo_id, id).await? {
        Some(item) => Ok(HttpResponse::serialize(&item)?),
        None => Err(FrameworkError::not_found("Item").into()),
    }
}

/// PATCH /todos/{todo_id}/items/{id}
pub async fn update(state: AppState, req: Request) -> Response {
    let (todo_id, id) = ids(&req)?;
    let request: UpdateItemRequest = req.json()?;
    state.items.update_item(todo_id, id, request).await?;

    let item = state
        .items
        .get_item(todo_id, id)
        .await?
        .ok_or_else(|| FrameworkError::not_found("Item"))?;
    Ok(HttpResponse::serialize(&item)?)
}

/// DELETE /todos/{todo_id}/items/{id}
pub async fn destroy(state: AppState, req: Request) -> Response {
    let (todo_id, id) = ids(&req)?;
    state.items.delete_item(todo_id, id).await?;
    Ok(HttpResponse::no_content())
}
