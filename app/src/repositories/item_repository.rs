use chrono::Utc;
use kit::DbConnection;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::contains;
use crate::models::items;

/// Items of one Todo, optionally narrowed further
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFilter {
    pub todo_id: i32,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Clone)]
pub struct ItemRepository {
    db: DbConnection,
}

impl ItemRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn scoped(todo_id: i32, id: i32) -> Condition {
        Condition::all()
            .add(items::Column::TodoId.eq(todo_id))
            .add(items::Column::Id.eq(id))
    }

    pub async fn find_items(&self, filter: &ItemFilter) -> Result<Vec<items::Model>, DbErr> {
        let mut condition = Condition::all().add(items::Column::TodoId.eq(filter.todo_id));
        if let Some(description) = &filter.description {
            condition = condition.add(contains(
                self.db.get_database_backend(),
                items::Column::Description,
                description,
            ));
        }
        if let Some(is_completed) = filter.is_completed {
            condition = condition.add(items::Column::IsCompleted.eq(is_completed));
        }

        items::Entity::find()
            .filter(condition)
            .order_by_asc(items::Column::Id)
            .all(self.db.inner())
            .await
    }

    /// An Item only matches when it belongs to `todo_id`
    pub async fn find_item_by_todo_and_id(
        &self,
        todo_id: i32,
        id: i32,
    ) -> Result<Option<items::Model>, DbErr> {
        items::Entity::find()
            .filter(Self::scoped(todo_id, id))
            .one(self.db.inner())
            .await
    }

    pub async fn create_item(
        &self,
        todo_id: i32,
        description: String,
        is_completed: bool,
    ) -> Result<items::Model, DbErr> {
        let now = Utc::now();
        items::ActiveModel {
            todo_id: Set(todo_id),
            description: Set(description),
            is_completed: Set(is_completed),
            completed_at: Set(is_completed.then_some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.inner())
        .await
    }

    /// Scoped partial update
    ///
    /// Completing an Item stamps `completed_at` unless it is already set;
    /// un-completing clears it.
    pub async fn update_item_by_todo_and_id(
        &self,
        todo_id: i32,
        id: i32,
        changes: ItemChanges,
    ) -> Result<(), DbErr> {
        let now = Utc::now();
        let mut active = items::ActiveModel {
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(description) = changes.description {
            active.description = Set(description);
        }

        let mut update = items::Entity::update_many();
        match changes.is_completed {
            Some(true) => {
                active.is_completed = Set(true);
                update = update.col_expr(
                    items::Column::CompletedAt,
                    Func::coalesce([Expr::col(items::Column::CompletedAt).into(), Expr::value(now)])
                        .into(),
                );
            }
            Some(false) => {
                active.is_completed = Set(false);
                active.completed_at = Set(None);
            }
            None => {}
        }

        update
            .set(active)
            .filter(Self::scoped(todo_id, id))
            .exec(self.db.inner())
            .await?;
        Ok(())
    }

    pub async fn delete_item_by_todo_and_id(&self, todo_id: i32, id: i32) -> Result<(), DbErr> {
        items::Entity::delete_many()
            .filter(Self::scoped(todo_id, id))
            .exec(self.db.inner())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::Migrator;
    use crate::repositories::todo_repository::{NewTodo, TodoRepository};
    use crate::models::TodoStatus;
    use kit::expect;
    use kit::testing::TestDatabase;

    struct Fixture {
        items: ItemRepository,
        todo_id: i32,
        other_todo_id: i32,
        _db: TestDatabase,
    }

    async fn fixture() -> Fixture {
        let db = TestDatabase::new::<Migrator>().await.unwrap();
        let todos = TodoRepository::new(db.connection());
        let mut ids = Vec::new();
        for title in ["mine", "theirs"] {
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
        Fixture {
            items: ItemRepository::new(db.connection()),
            todo_id: ids[0],
            other_todo_id: ids[1],
            _db: db,
        }
    }

    #[tokio::test]
    async fn test_create_stamps_completed_at_only_when_completed() {
        let f = fixture().await;
        let open = f.items.create_item(f.todo_id, "milk".into(), false).await.unwrap();
        let done = f.items.create_item(f.todo_id, "eggs".into(), true).await.unwrap();

        expect!(open.completed_at).to_be_none();
        expect!(done.completed_at).to_be_some();
        expect!(done.todo_id).to_equal(f.todo_id);
    }

    #[tokio::test]
    async fn test_find_items_filters_within_todo() {
        let f = fixture().await;
        f.items.create_item(f.todo_id, "Buy milk".into(), false).await.unwrap();
        f.items.create_item(f.todo_id, "Buy bread".into(), true).await.unwrap();
        f.items.create_item(f.other_todo_id, "Buy milk".into(), false).await.unwrap();

        let all = f
            .items
            .find_items(&ItemFilter {
                todo_id: f.todo_id,
                description: None,
                is_completed: None,
            })
            .await
            .unwrap();
        expect!(all.len()).to_equal(2);

        let milk = f
            .items
            .find_items(&ItemFilter {
                todo_id: f.todo_id,
                description: Some("milk".into()),
                is_completed: None,
            })
            .await
            .unwrap();
        expect!(milk.len()).to_equal(1);

        let done = f
            .items
            .find_items(&ItemFilter {
                todo_id: f.todo_id,
                description: None,
                is_completed: Some(true),
            })
            .await
            .unwrap();
        expect!(done.len()).to_equal(1);
        expect!(done[0].description.clone()).to_equal("Buy bread".to_string());
    }

    #[tokio::test]
    async fn test_description_match_is_case_sensitive() {
        let f = fixture().await;
        let upper = f.items.create_item(f.todo_id, "Milk".into(), false).await.unwrap();
        let lower = f.items.create_item(f.todo_id, "oat milk".into(), false).await.unwrap();

        let by = |needle: &str| ItemFilter {
            todo_id: f.todo_id,
            description: Some(needle.to_string()),
            is_completed: None,
        };

        let found = f.items.find_items(&by("milk")).await.unwrap();
        let ids: Vec<i32> = found.iter().map(|item| item.id).collect();
        expect!(ids).to_equal(vec![lower.id]);

        let found = f.items.find_items(&by("Milk")).await.unwrap();
        let ids: Vec<i32> = found.iter().map(|item| item.id).collect();
        expect!(ids).to_equal(vec![upper.id]);
    }

    #[tokio::test]
    async fn test_lookup_is_scoped_to_owner() {
        let f = fixture().await;
        let item = f.items.create_item(f.todo_id, "milk".into(), false).await.unwrap();

        expect!(f.items.find_item_by_todo_and_id(f.todo_id, item.id).await.unwrap()).to_be_some();
        expect!(f
            .items
            .find_item_by_todo_and_id(f.other_todo_id, item.id)
            .await
            .unwrap())
        .to_be_none();
    }

    #[tokio::test]
    async fn test_completion_stamps_once_and_clears() {
        let f = fixture().await;
        let item = f.items.create_item(f.todo_id, "milk".into(), false).await.unwrap();

        let complete = ItemChanges {
            is_completed: Some(true),
            ..Default::default()
        };
        f.items
            .update_item_by_todo_and_id(f.todo_id, item.id, complete.clone())
            .await
            .unwrap();
        let first = f
            .items
            .find_item_by_todo_and_id(f.todo_id, item.id)
            .await
            .unwrap()
            .unwrap();
        expect!(first.is_completed).to_be_true();
        expect!(first.completed_at).to_be_some();

        f.items
            .update_item_by_todo_and_id(f.todo_id, item.id, complete)
            .await
            .unwrap();
        let again = f
            .items
            .find_item_by_todo_and_id(f.todo_id, item.id)
            .await
            .unwrap()
            .unwrap();
        expect!(again.completed_at).to_equal(first.completed_at);

        f.items
            .update_item_by_todo_and_id(
                f.todo_id,
                item.id,
                ItemChanges {
                    is_completed: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let reopened = f
            .items
            .find_item_by_todo_and_id(f.todo_id, item.id)
            .await
            .unwrap()
            .unwrap();
        expect!(reopened.is_completed).to_be_false();
        expect!(reopened.completed_at).to_be_none();
    }

    #[tokio::test]
    async fn test_scoped_writes_ignore_other_todos() {
        let f = fixture().await;
        let item = f.items.create_item(f.todo_id, "milk".into(), false).await.unwrap();

        f.items
            .update_item_by_todo_and_id(
                f.other_todo_id,
                item.id,
                ItemChanges {
                    description: Some("hijacked".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        f.items
            .delete_item_by_todo_and_id(f.other_todo_id, item.id)
            .await
            .unwrap();

        let untouched = f
            .items
            .find_item_by_todo_and_id(f.todo_id, item.id)
            .await
            .unwrap()
            .unwrap();
        expect!(untouched.description).to_equal("milk".to_string());

        f.items.delete_item_by_todo_and_id(f.todo_id, item.id).await.unwrap();
        expect!(f.items.find_item_by_todo_and_id(f.todo_id, item.id).await.unwrap()).to_be_none();
    }
}
