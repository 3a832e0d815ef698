pub mod item;
pub mod todo;
