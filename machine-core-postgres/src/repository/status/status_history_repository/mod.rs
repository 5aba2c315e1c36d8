pub mod repo_impl;
pub mod append;
pub mod list_in_scope;

pub use repo_impl::StatusHistoryRepositoryImpl;
