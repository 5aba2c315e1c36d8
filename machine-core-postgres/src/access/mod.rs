pub mod directory;
pub mod machine;
pub mod resolver;
pub mod service;
pub mod status;

pub use resolver::PgScopeResolver;
pub use service::MachineCoreService;
