//! Table definitions. Behaviour and helpers live in the sibling `models::*` files.

pub mod items;
pub mod todos;
