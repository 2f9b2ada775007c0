pub mod batch;
pub mod dispatch;
pub mod extract;
pub mod patterns;
pub mod roster;
pub mod schema;
pub mod shared;
