//! Items model

pub use super::entities::items::*;

use sea_orm::entity::prelude::*;

impl ActiveModelBehavior for ActiveModel {}
