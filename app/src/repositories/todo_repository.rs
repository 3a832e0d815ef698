use std::collections::HashMap;

use chrono::Utc;
use kit::DbConnection;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, DbBackend,
    DbErr, EntityTrait, IsolationLevel, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::{contains, Page};
use crate::models::{items, todos, TodoStatus, TodoWithItems};

/// Sort direction on `todos.id`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `ASC` or `DESC`; anything else sorts ascending
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("DESC") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Normalized list filter; soft-deleted rows are always excluded
#[derive(Debug, Clone, PartialEq)]
pub struct TodoFilter {
    pub title: Option<String>,
    pub status: Option<TodoStatus>,
    pub limit: u64,
    pub offset: u64,
    pub order: SortOrder,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub subtitle: Option<String>,
    pub status: TodoStatus,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub description: String,
    pub is_completed: bool,
}

/// Partial update; `None` leaves a column untouched
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub status: Option<TodoStatus>,
}

#[derive(Clone)]
pub struct TodoRepository {
    db: DbConnection,
}

impl TodoRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn backend(&self) -> DbBackend {
        self.db.get_database_backend()
    }

    fn condition(&self, filter: &TodoFilter) -> Condition {
        let mut condition = Condition::all().add(todos::Column::DeletedAt.is_null());
        if let Some(title) = &filter.title {
            condition = condition.add(contains(self.backend(), todos::Column::Title, title));
        }
        if let Some(status) = filter.status {
            condition = condition.add(todos::Column::Status.eq(status));
        }
        condition
    }

    /// Search live Todos
    ///
    /// `total` counts every match regardless of paging. The count and the
    /// page query share one condition and run concurrently.
    pub async fn find_todos(&self, filter: &TodoFilter) -> Result<Page<TodoWithItems>, DbErr> {
        let db = self.db.inner();
        let select = todos::Entity::find().filter(self.condition(filter));

        let count = select.clone().count(db);
        let page = select
            .order_by(todos::Column::Id, filter.order.into())
            .limit(filter.limit)
            .offset(filter.offset)
            .all(db);
        let (total, rows) = tokio::try_join!(count, page)?;

        Ok(Page {
            data: attach_items(db, rows).await?,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })
    }

    /// Primary key lookup with Items attached
    ///
    /// Soft-deleted Todos are returned as well.
    pub async fn find_todo_by_id(&self, id: i32) -> Result<Option<TodoWithItems>, DbErr> {
        let db = self.db.inner();
        match todos::Entity::find_by_id(id).one(db).await? {
            Some(todo) => Ok(attach_items(db, vec![todo]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Insert a Todo and its Items atomically
    ///
    /// Either every row becomes visible or none does. On failure the
    /// transaction is rolled back and the original error is returned.
    pub async fn create_todo_with_items(
        &self,
        todo: NewTodo,
        items: Vec<NewItem>,
    ) -> Result<TodoWithItems, DbErr> {
        // SQLite transactions are already serializable
        let isolation = match self.backend() {
            DbBackend::Sqlite => None,
            _ => Some(IsolationLevel::ReadCommitted),
        };
        let txn = self.db.inner().begin_with_config(isolation, None).await?;

        match insert_todo_with_items(&txn, todo, items).await {
            Ok(created) => {
                txn.commit().await?;
                Ok(created)
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    tracing::error!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Apply a partial update and bump `updated_at`
    ///
    /// Moving to DELETED stamps `deleted_at`, moving anywhere else clears it.
    pub async fn update_todo_by_id(&self, id: i32, changes: TodoChanges) -> Result<(), DbErr> {
        let now = Utc::now();
        let mut active = todos::ActiveModel {
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(subtitle) = changes.subtitle {
            active.subtitle = Set(Some(subtitle));
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
            active.deleted_at = Set(status.is_deleted().then_some(now));
        }

        todos::Entity::update_many()
            .set(active)
            .filter(todos::Column::Id.eq(id))
            .exec(self.db.inner())
            .await?;
        Ok(())
    }

    /// Flag a Todo as DELETED; the row and its Items stay in place
    pub async fn soft_delete_todo_by_id(&self, id: i32) -> Result<(), DbErr> {
        let now = Utc::now();
        let active = todos::ActiveModel {
            status: Set(TodoStatus::Deleted),
            deleted_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        todos::Entity::update_many()
            .set(active)
            .filter(todos::Column::Id.eq(id))
            .exec(self.db.inner())
            .await?;
        Ok(())
    }
}

async fn insert_todo_with_items(
    txn: &DatabaseTransaction,
    todo: NewTodo,
    items: Vec<NewItem>,
) -> Result<TodoWithItems, DbErr> {
    let now = Utc::now();
    let todo = todos::ActiveModel {
        title: Set(todo.title),
        subtitle: Set(todo.subtitle),
        status: Set(todo.status),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(todo.status.is_deleted().then_some(now)),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
        let item = items::ActiveModel {
            todo_id: Set(todo.id),
            description: Set(item.description),
            is_completed: Set(item.is_completed),
            completed_at: Set(item.is_completed.then_some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        inserted.push(item);
    }

    Ok(TodoWithItems {
        todo,
        items: inserted,
    })
}

/// Upper bound on ids bound into one `todo_id IN (...)` lookup
const ITEM_LOOKUP_CHUNK: usize = 500;

/// Load the Items of every given Todo
///
/// Ids are bound in chunks of [`ITEM_LOOKUP_CHUNK`] so a large page never
/// exceeds the backend's bind parameter limit.
async fn attach_items<C: ConnectionTrait>(
    db: &C,
    todos: Vec<todos::Model>,
) -> Result<Vec<TodoWithItems>, DbErr> {
    if todos.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = todos.iter().map(|todo| todo.id).collect();
    let mut by_todo: HashMap<i32, Vec<items::Model>> = HashMap::new();
    for chunk in ids.chunks(ITEM_LOOKUP_CHUNK) {
        for item in items::Entity::find()
            .filter(items::Column::TodoId.is_in(chunk.iter().copied()))
            .order_by_asc(items::Column::Id)
            .all(db)
            .await?
        {
            by_todo.entry(item.todo_id).or_default().push(item);
        }
    }

    Ok(todos
        .into_iter()
        .map(|todo| {
            let items = by_todo.remove(&todo.id).unwrap_or_default();
            TodoWithItems { todo, items }
        })
        .collect())
}
