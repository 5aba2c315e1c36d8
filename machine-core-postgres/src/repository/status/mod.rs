pub mod status_history_repository;
pub mod status_type_repository;

pub use status_history_repository::StatusHistoryRepositoryImpl;
pub use status_type_repository::StatusTypeRepositoryImpl;
