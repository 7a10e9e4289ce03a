use std::fmt;

/// Recoverable condition noticed while building. The build carries on with a default.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Warning {
    /// Slash-separated location inside the declaration, e.g. `ambient/background`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered warning collector. Every pushed warning is also logged.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let w = Warning {
            path: path.into(),
            message: message.into(),
        };
        tracing::warn!(path = %w.path, "{}", w.message);
        self.warnings.push(w);
    }

    pub(crate) fn len(&self) -> usize {
        self.warnings.len()
    }

    pub(crate) fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
