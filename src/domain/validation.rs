use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidUrl { input: String, reason: String },
    InvalidInstanceName { input: String },
    CoordinateOutOfRange { field: &'static str, min: f64, max: f64, actual: f64 },
    SelectableCountOutOfRange { max: usize, actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidUrl { input, reason } => write!(f, "invalid base url {input}: {reason}"),
            Self::InvalidInstanceName { input } => write!(f, "invalid instance name: {input}"),
            Self::CoordinateOutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                write!(f, "{field} out of range: {actual} (expected {min}..={max})")
            }
            Self::SelectableCountOutOfRange { max, actual } => {
                write!(f, "selectable count out of range: {actual} (expected 1..={max})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "number" };
        assert_eq!(err.to_string(), "number must not be empty");

        let err = ValidationError::InvalidInstanceName {
            input: "a/b".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid instance name: a/b");

        let err = ValidationError::CoordinateOutOfRange {
            field: "latitude",
            min: -90.0,
            max: 90.0,
            actual: 91.5,
        };
        assert_eq!(
            err.to_string(),
            "latitude out of range: 91.5 (expected -90..=90)"
        );

        let err = ValidationError::SelectableCountOutOfRange { max: 2, actual: 3 };
        assert_eq!(
            err.to_string(),
            "selectable count out of range: 3 (expected 1..=2)"
        );
    }
}
