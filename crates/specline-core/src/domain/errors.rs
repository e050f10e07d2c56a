use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SpeclineResult<T> = Result<T, SpeclineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeclineErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl SpeclineErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }
}

/// Workspace-level error carried across the library boundary.
///
/// `placeholder` is a stable machine-readable code (e.g. `INPUT.MODEL_CONFIG`)
/// that callers and tests can match on without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeclineError {
    category: SpeclineErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl SpeclineError {
    pub fn new(
        category: SpeclineErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            SpeclineErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SpeclineErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SpeclineErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SpeclineErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> SpeclineErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }
}

impl Display for SpeclineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for SpeclineError {}

#[cfg(test)]
mod tests {
    use super::{SpeclineError, SpeclineErrorCategory};

    #[test]
    fn category_exit_mapping_is_stable() {
        let cases = [
            (
                SpeclineErrorCategory::InputValidationError,
                2,
                "InputValidationError",
            ),
            (SpeclineErrorCategory::IoSystemError, 3, "IoSystemError"),
            (SpeclineErrorCategory::ComputationError, 4, "ComputationError"),
            (SpeclineErrorCategory::InternalError, 5, "InternalError"),
        ];

        for (category, exit_code, name) in cases {
            assert_eq!(category.exit_code(), exit_code);
            assert_eq!(category.as_str(), name);
        }
    }

    #[test]
    fn error_renders_placeholder_and_message() {
        let error = SpeclineError::input_validation(
            "INPUT.MODEL_CONFIG",
            "either a native flux or an initial state record is required",
        );

        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.placeholder(), "INPUT.MODEL_CONFIG");
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.MODEL_CONFIG] either a native flux or an initial state record is required"
        );
        assert_eq!(
            error.to_string(),
            "InputValidationError [INPUT.MODEL_CONFIG] either a native flux or an initial state record is required"
        );
    }
}
