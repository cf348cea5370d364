#![forbid(unsafe_code)]

pub mod defaults;
pub mod repository;
pub mod sqlite;

pub use repository::{
    AdminRepository, InMemoryRepository, PromptRepository, ResponseLogRepository, Storage,
    StorageError,
};
