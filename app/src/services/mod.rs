//! Orchestration
//!
//! Services validate input, check that the rows they touch exist and turn
//! absence into `NotFound`. Repository writes that match nothing are silent,
//! so these checks are the only place a missing Todo or Item is reported.

pub mod item_service;
pub mod todo_service;

pub use item_service::ItemService;
pub use todo_service::TodoService;
