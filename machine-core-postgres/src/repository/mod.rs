pub mod directory;
pub mod machine;
pub mod status;

pub use directory::{
    DepartmentRepositoryImpl, LeaderAssignmentRepositoryImpl, ProfileRepositoryImpl,
};
pub use machine::{MachineRepositoryImpl, OperatorAssignmentRepositoryImpl};
pub use status::{StatusHistoryRepositoryImpl, StatusTypeRepositoryImpl};
