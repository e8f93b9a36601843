use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// CLI usage error (missing args, invalid flags).
    Usage = 1,
    /// Input error (missing file, invalid circuit JSON, failed validation).
    Input = 2,
    /// Processing error (failure while writing outputs).
    Processing = 3,
}

#[derive(Debug)]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Input,
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Processing,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<bb_core::persist::LoadError> for CliError {
    fn from(e: bb_core::persist::LoadError) -> Self {
        match e {
            bb_core::persist::LoadError::Storage(inner) => Self::processing(inner.to_string()),
            other => Self::input(other.to_string()),
        }
    }
}

impl From<bb_core::persist::StorageError> for CliError {
    fn from(e: bb_core::persist::StorageError) -> Self {
        Self::processing(e.to_string())
    }
}
