#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;
pub mod sqlite;

pub use repository::{
    ContentRepository, InMemoryRepository, LearnerRepository, Storage, StorageError,
};
