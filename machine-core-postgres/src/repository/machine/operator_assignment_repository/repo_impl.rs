use crate::executor::Executor;

pub struct OperatorAssignmentRepositoryImpl {
    pub executor: Executor,
}

impl OperatorAssignmentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}
