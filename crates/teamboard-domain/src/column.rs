use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four fixed workflow stages a card can sit in. Column membership is
/// the only partition the server persists; ordering inside a column is a
/// client-side projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Backlog,
    Todo,
    Doing,
    Done,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Backlog,
        Column::Todo,
        Column::Doing,
        Column::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(Self::Backlog),
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(format!("Invalid column: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_columns() {
        assert_eq!("backlog".parse::<Column>().unwrap(), Column::Backlog);
        assert_eq!("todo".parse::<Column>().unwrap(), Column::Todo);
        assert_eq!("doing".parse::<Column>().unwrap(), Column::Doing);
        assert_eq!("done".parse::<Column>().unwrap(), Column::Done);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!("archived".parse::<Column>().is_err());
        assert!("TODO".parse::<Column>().is_err());
        assert!("".parse::<Column>().is_err());
        assert!(" done".parse::<Column>().is_err());
    }

    #[test]
    fn test_wire_form_is_lowercase() {
        assert_eq!(serde_json::to_string(&Column::Doing).unwrap(), "\"doing\"");
        let parsed: Column = serde_json::from_str("\"backlog\"").unwrap();
        assert_eq!(parsed, Column::Backlog);
        assert!(serde_json::from_str::<Column>("\"Backlog\"").is_err());
    }

    #[test]
    fn test_display_matches_wire_form() {
        for column in Column::ALL {
            assert_eq!(column.to_string(), column.as_str());
        }
    }
}
