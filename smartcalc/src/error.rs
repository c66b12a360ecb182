//! Error kinds surfaced to the user.
//!
//! Every failure the calculator can report on a single input line maps to one
//! of these variants.  The [`Display`](std::fmt::Display) text is exactly what
//! gets printed, so callers never format their own messages.

/// A per-line failure.  None of these are fatal; the session always returns
/// to the input loop afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    /// Malformed `name=value` syntax, or `value` names an unknown variable.
    InvalidAssignment,
    /// A name that is not purely alphabetic, or letters glued to digits.
    InvalidIdentifier,
    /// Letters remain in an expression after substitution.
    UnknownVariable,
    /// Doubled operators, or anything the evaluator rejects.
    InvalidExpression,
    /// A `/`-prefixed line other than `/help` or `/exit`.
    UnknownCommand,
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            CalcError::InvalidAssignment => "Invalid assignment",
            CalcError::InvalidIdentifier => "Invalid identifier",
            CalcError::UnknownVariable => "Unknown variable",
            CalcError::InvalidExpression => "Invalid expression",
            CalcError::UnknownCommand => "Unknown command",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CalcError {}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_output_contract() {
        assert_eq!(CalcError::InvalidAssignment.to_string(), "Invalid assignment");
        assert_eq!(CalcError::InvalidIdentifier.to_string(), "Invalid identifier");
        assert_eq!(CalcError::UnknownVariable.to_string(), "Unknown variable");
        assert_eq!(CalcError::InvalidExpression.to_string(), "Invalid expression");
        assert_eq!(CalcError::UnknownCommand.to_string(), "Unknown command");
    }
}
