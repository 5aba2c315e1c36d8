pub mod repo_impl;
pub mod create;
pub mod delete;
pub mod list_ordered;
pub mod update;

pub use repo_impl::StatusTypeRepositoryImpl;
