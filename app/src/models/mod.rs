pub mod entities;
pub mod items;
pub mod todos;

pub use todos::{TodoStatus, TodoWithItems};
