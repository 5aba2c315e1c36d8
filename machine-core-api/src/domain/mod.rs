pub mod actor;
pub mod commands;
pub mod entities;
pub mod scope;

pub use actor::*;
pub use commands::*;
pub use entities::*;
pub use scope::*;
