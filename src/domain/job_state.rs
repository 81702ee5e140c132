use std::fmt;
use std::str::FromStr;

/// Lifecycle of a tracked job: `Pending -> InProgress -> Complete | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "PENDING",
            JobState::InProgress => "IN_PROGRESS",
            JobState::Complete => "COMPLETE",
            JobState::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Complete | JobState::Failed)
    }

    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Pending, JobState::InProgress)
                | (JobState::InProgress, JobState::Complete)
                | (JobState::InProgress, JobState::Failed)
        )
    }
}

impl FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(JobState::Pending),
            "IN_PROGRESS" => Ok(JobState::InProgress),
            "COMPLETE" => Ok(JobState::Complete),
            "FAILED" => Ok(JobState::Failed),
            _ => Err(format!("Invalid job state: {}", s)),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
