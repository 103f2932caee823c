use thiserror::Error;

pub type PlayerValueResult<T> = Result<T, PlayerValueError>;

#[derive(Error, Debug)]
pub enum PlayerValueError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input source not found: {0}")]
    MissingInput(String),

    #[error("Invalid input in field `{field}`{}: {reason}", row_suffix(.row))]
    InvalidInput {
        field: String,
        row: Option<usize>,
        reason: String,
    },

    #[error("Unknown segment: {0}")]
    UnknownSegment(String),

    #[error("Empty {0} selection: select at least one segment")]
    EmptySelection(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlayerValueError {
    pub fn invalid_input(
        field: impl Into<String>,
        row: Option<usize>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field: field.into(),
            row,
            reason: reason.into(),
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {r}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message_names_field_and_row() {
        let err = PlayerValueError::invalid_input("player_value", Some(3), "not a number: \"N/A\"");
        assert_eq!(
            err.to_string(),
            "Invalid input in field `player_value` at row 3: not a number: \"N/A\""
        );
    }

    #[test]
    fn test_invalid_input_message_without_row() {
        let err = PlayerValueError::invalid_input("month", None, "column missing");
        assert_eq!(err.to_string(), "Invalid input in field `month`: column missing");
    }
}
