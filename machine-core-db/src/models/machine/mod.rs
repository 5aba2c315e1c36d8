pub mod machine;
pub mod operator_assignment;

pub use machine::*;
pub use operator_assignment::*;
