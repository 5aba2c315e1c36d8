pub mod identifiable;

pub mod directory;
pub mod machine;
pub mod status;

// Re-exports
pub use identifiable::*;

pub use directory::*;
pub use machine::*;
pub use status::*;
