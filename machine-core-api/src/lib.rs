pub mod domain;
pub mod error;
pub mod guard;
pub mod service;

pub use domain::*;
pub use error::*;
pub use guard::*;
pub use service::*;
