pub mod repo_impl;
pub mod list_visible;
pub mod set_role;
pub mod update;
pub mod upsert;

pub use repo_impl::ProfileRepositoryImpl;
