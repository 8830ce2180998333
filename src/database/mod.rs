pub mod activities;
pub mod employees;
pub mod manager;
pub mod models;
pub mod products;
pub mod repository;
pub mod users;

pub use manager::{Database, DatabaseError};
pub use repository::{Repository, SoftDeletable};
