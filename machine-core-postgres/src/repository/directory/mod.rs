pub mod department_repository;
pub mod leader_assignment_repository;
pub mod profile_repository;

pub use department_repository::DepartmentRepositoryImpl;
pub use leader_assignment_repository::LeaderAssignmentRepositoryImpl;
pub use profile_repository::ProfileRepositoryImpl;
