pub mod repo_impl;
pub mod create;
pub mod delete;

pub use repo_impl::LeaderAssignmentRepositoryImpl;
