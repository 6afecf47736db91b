use serde::{Deserialize, Serialize};

/// The `{data, error}` shape shared by every endpoint and client call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Success without a payload, as returned by deletes.
    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Turns the envelope into a `Result`, treating any `error` as failure.
    pub fn into_result(self) -> Result<Option<T>, String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}
