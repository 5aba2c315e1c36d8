pub mod repo_impl;
pub mod create;
pub mod delete;
pub mod find_by_code;
pub mod list_in_scope;
pub mod update;

pub use repo_impl::MachineRepositoryImpl;
