pub mod directory;
pub mod machine;
pub mod resolver;
pub mod status;

pub use directory::*;
pub use machine::*;
pub use resolver::*;
pub use status::*;
