use std::fmt;

/// A message the front end must show the user before continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn success(msg: impl Into<String>) -> Self {
        Notice::Success(msg.into())
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Notice::Failure(msg.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Failure(m) => m,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
