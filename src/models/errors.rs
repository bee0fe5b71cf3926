use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed record: {reason}")]
    MalformedRecord {
        reason: String
    }
}

impl ParseError {
    //NOTE: Every rejection collapses into the same variant, the factories only exist to keep the reasons consistent.

    pub fn empty() -> Self {
        Self::MalformedRecord { reason: "record is empty".to_string() }
    }

    pub fn multiple_lines() -> Self {
        Self::MalformedRecord { reason: "record spans more than one line".to_string() }
    }

    pub fn unreadable(error: csv::Error) -> Self {
        Self::MalformedRecord { reason: format!("record could not be read: {error}") }
    }

    pub fn field_count(expected: usize, found: usize) -> Self {
        Self::MalformedRecord { reason: format!("expected {expected} fields, found {found}") }
    }

    pub fn invalid_field(field: &str, value: &str) -> Self {
        Self::MalformedRecord { reason: format!("field [{field}] has an invalid value [{value}]") }
    }

    pub fn negative_amount(value: &str) -> Self {
        Self::MalformedRecord { reason: format!("amount [{value}] is negative") }
    }
}
