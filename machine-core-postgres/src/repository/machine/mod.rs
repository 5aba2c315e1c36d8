pub mod machine_repository;
pub mod operator_assignment_repository;

pub use machine_repository::MachineRepositoryImpl;
pub use operator_assignment_repository::OperatorAssignmentRepositoryImpl;
