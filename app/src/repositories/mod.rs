//! Data access
//!
//! Repositories translate filters and mutations into SeaORM queries. They
//! never raise domain errors: a missing row is `None`, a write that matches
//! nothing is a no-op and store failures come back as `DbErr`.

pub mod item_repository;
pub mod todo_repository;

pub use item_repository::ItemRepository;
pub use todo_repository::TodoRepository;

use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, DbBackend};
use serde::Serialize;

/// One page of results plus the total number of matches
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Case-sensitive substring match on a text column
///
/// SQLite's `LIKE` ignores ASCII case, so `instr()` is used there instead.
pub(crate) fn contains<C: ColumnTrait>(backend: DbBackend, column: C, needle: &str) -> SimpleExpr {
    match backend {
        DbBackend::Sqlite => Expr::expr(
            Func::cust(Alias::new("instr"))
                .arg(Expr::col(column))
                .arg(needle),
        )
        .gt(0),
        _ => column.contains(needle),
    }
}
