use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("could not fetch {uri}: {reason}")]
    Fetch { uri: String, reason: String },
    #[error("malformed dataset{}: {reason}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse { line: Option<u64>, reason: String },
    #[error("dataframe operation failed: {0}")]
    Frame(#[from] PolarsError),
    #[error("inconsistent aggregate table: {0}")]
    Aggregate(String),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chart serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn fetch(uri: &str, reason: impl ToString) -> Self {
        PipelineError::Fetch {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(line: Option<u64>, reason: impl ToString) -> Self {
        PipelineError::Parse {
            line,
            reason: reason.to_string(),
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Fetch { .. } => 2,
            PipelineError::Parse { .. } => 3,
            _ => 1,
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line());
        PipelineError::parse(line, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_mentions_line() {
        let err = PipelineError::parse(Some(4), "bad sex code 7");
        assert_eq!(err.to_string(), "malformed dataset at line 4: bad sex code 7");

        let err = PipelineError::parse(None, "missing column `edad`");
        assert_eq!(err.to_string(), "malformed dataset: missing column `edad`");
    }

    #[test]
    fn exit_codes_distinguish_fetch_and_parse() {
        assert_eq!(PipelineError::fetch("x.csv", "gone").exit_code(), 2);
        assert_eq!(PipelineError::parse(None, "bad").exit_code(), 3);
        assert_eq!(PipelineError::Aggregate("x".into()).exit_code(), 1);
    }
}
