use crate::domain::JobState;

/// A compare-and-set state change: applies only if the job is still in
/// `expected` and, when `owner` is set, still claimed by that instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTransition {
    pub expected: JobState,
    pub next: JobState,
    pub result: Option<String>,
    pub error_message: Option<String>,
    /// Recorded as the job's `claimed_by` when applied.
    pub claim: Option<String>,
    pub owner: Option<String>,
}

impl JobTransition {
    fn between(expected: JobState, next: JobState) -> Self {
        Self {
            expected,
            next,
            result: None,
            error_message: None,
            claim: None,
            owner: None,
        }
    }

    pub fn start(instance_id: impl Into<String>) -> Self {
        Self {
            claim: Some(instance_id.into()),
            ..Self::between(JobState::Pending, JobState::InProgress)
        }
    }

    pub fn complete(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            ..Self::between(JobState::InProgress, JobState::Complete)
        }
    }

    pub fn fail(error_message: impl Into<String>) -> Self {
        Self {
            error_message: Some(error_message.into()),
            ..Self::between(JobState::InProgress, JobState::Failed)
        }
    }

    /// Restricts the transition to jobs claimed by `instance_id`.
    pub fn owned_by(mut self, instance_id: impl Into<String>) -> Self {
        self.owner = Some(instance_id.into());
        self
    }
}
