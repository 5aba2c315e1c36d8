use crate::executor::Executor;

pub struct LeaderAssignmentRepositoryImpl {
    pub executor: Executor,
}

impl LeaderAssignmentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}
