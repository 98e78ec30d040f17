use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    EndedCheckmate,
    EndedStalemate,
}

impl Status {
    pub fn is_ended(&self) -> bool {
        matches!(self, Status::EndedCheckmate | Status::EndedStalemate)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::NotStarted => "NOT_STARTED",
            Status::InProgress => "IN_PROGRESS",
            Status::EndedCheckmate => "ENDED_CHECKMATE",
            Status::EndedStalemate => "ENDED_STALEMATE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ended_variants_are_terminal() {
        assert!(!Status::NotStarted.is_ended());
        assert!(!Status::InProgress.is_ended());
        assert!(Status::EndedCheckmate.is_ended());
        assert!(Status::EndedStalemate.is_ended());
        assert_eq!(Status::default(), Status::NotStarted);
        assert_eq!(Status::EndedStalemate.to_string(), "ENDED_STALEMATE");
    }
}
