pub mod create;
pub mod delete;
pub mod load;
pub mod update;

// Re-exports
pub use create::*;
pub use delete::*;
pub use load::*;
pub use update::*;
