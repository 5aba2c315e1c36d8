pub mod status_history;
pub mod status_type;

pub use status_history::*;
pub use status_type::*;
