pub mod department;
pub mod leader_assignment;
pub mod profile;

pub use department::*;
pub use leader_assignment::*;
pub use profile::*;
