pub mod repo_impl;
pub mod create;
pub mod delete;
pub mod list_all;
pub mod update;

pub use repo_impl::DepartmentRepositoryImpl;
