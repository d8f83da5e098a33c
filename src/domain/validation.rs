use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    ContainsComma { field: &'static str, value: String },
    BinaryTooLong { max: usize, actual: usize },
    InvalidPhoneNumber { input: String },
    InvalidHeaderValue { field: &'static str },
    InvalidEndpoint { input: String, reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::ContainsComma { field, value } => {
                write!(f, "{field} value must not contain a comma: {value:?}")
            }
            Self::BinaryTooLong { max, actual } => {
                write!(f, "udh and body too long: {actual} bytes (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidHeaderValue { field } => {
                write!(f, "{field} contains characters not allowed in an HTTP header")
            }
            Self::InvalidEndpoint { input, reason } => {
                write!(f, "invalid endpoint {input:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject values that would corrupt a comma-joined query parameter or tag list.
pub(crate) fn reject_commas<'a, I>(field: &'static str, values: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a String>,
{
    match values.into_iter().find(|value| value.contains(',')) {
        Some(value) => Err(ValidationError::ContainsComma {
            field,
            value: value.clone(),
        }),
        None => Ok(()),
    }
}
