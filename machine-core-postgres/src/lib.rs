pub mod access;
pub mod executor;
pub mod listener;
pub mod postgres_repositories;
pub mod repository;
pub mod utils;

pub use access::{MachineCoreService, PgScopeResolver};
pub use executor::Executor;
pub use listener::{ChangeEvent, ChangeListener};
pub use postgres_repositories::{PostgresRepositories, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helper;
