use serde::Serialize;

/// Output produced by a paid job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    pub output: String,
}
