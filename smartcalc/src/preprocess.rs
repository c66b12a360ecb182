//! Expression preprocessing: variable substitution and operator rewriting.
//!
//! Raw input goes through two passes before it reaches the evaluator:
//!
//! | Pass | Function | Output |
//! |------|----------|--------|
//! | Variable resolution | [`resolve_variables`] | digits, operators, parens, spaces |
//! | Operator normalization | [`normalize_operators`] | canonical form (`//`, `**`) |
//!
//! Both passes are text-level; neither builds a syntax tree.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CalcError;
use crate::symbol::SymbolTable;

/// Letters glued to digits (optionally across spaces), e.g. `a2`, `2 a`.
static ADJACENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z][ \t]*[0-9]|[0-9][ \t]*[A-Za-z]").expect("adjacency pattern")
});

/// Word runs, single operators, paren runs, whitespace runs, then any other
/// single character.  Every input character lands in exactly one token.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\w+|[-+*/^]|[()]+|\s+|.").expect("token pattern")
});

static LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]").expect("letter pattern"));

/// Runs of two or more `*` or `/` in user input.
static DOUBLED_OP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*+|//+").expect("doubled operator pattern"));

/// Canonical integer-division operator handed to the evaluator.
pub const INT_DIV: &str = "//";
/// Canonical power operator handed to the evaluator.
pub const POW: &str = "**";

// ── Variable resolution ───────────────────────────────────────────────────────

/// Replace every known variable in `expr` with its stored digits.
///
/// Fails with [`CalcError::InvalidIdentifier`] when letters touch digits and
/// with [`CalcError::UnknownVariable`] when letters survive substitution.
pub fn resolve_variables(expr: &str, symbols: &SymbolTable) -> Result<String, CalcError> {
    if ADJACENT_RE.is_match(expr) {
        return Err(CalcError::InvalidIdentifier);
    }

    let resolved: String = TOKEN_RE
        .find_iter(expr)
        .map(|m| symbols.get(m.as_str()).unwrap_or(m.as_str()))
        .collect();

    if LETTER_RE.is_match(&resolved) {
        return Err(CalcError::UnknownVariable);
    }
    Ok(resolved)
}

// ── Operator normalization ────────────────────────────────────────────────────

/// Rewrite `/` to integer division and `^` to power.
///
/// The doubled forms (`**`, `//`) are reserved for the canonical output, so
/// seeing them in the input is an [`CalcError::InvalidExpression`].
pub fn normalize_operators(expr: &str) -> Result<String, CalcError> {
    if DOUBLED_OP_RE.is_match(expr) {
        return Err(CalcError::InvalidExpression);
    }

    let mut out = String::with_capacity(expr.len() + 4);
    for ch in expr.chars() {
        match ch {
            '/' => out.push_str(INT_DIV),
            '^' => out.push_str(POW),
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Run both passes in order.
pub fn preprocess(expr: &str, symbols: &SymbolTable) -> Result<String, CalcError> {
    let resolved = resolve_variables(expr, symbols)?;
    normalize_operators(&resolved)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table(assignments: &[&str]) -> SymbolTable {
        let mut t = SymbolTable::new();
        for a in assignments {
            t.assign(a).unwrap();
        }
        t
    }

    // -- resolve_variables ------------------------------------------------------

    #[test]
    fn substitutes_known_variables() {
        let t = table(&["a=4", "b=10"]);
        assert_eq!(resolve_variables("a + b", &t).unwrap(), "4 + 10");
    }

    #[test]
    fn multi_letter_names() {
        let t = table(&["count=3", "c=9"]);
        assert_eq!(resolve_variables("count*c", &t).unwrap(), "3*9");
    }

    #[test]
    fn parens_and_caret_survive() {
        let t = table(&["x=2"]);
        assert_eq!(resolve_variables("(x^3)", &t).unwrap(), "(2^3)");
    }

    #[test]
    fn digits_only_pass_through() {
        let t = SymbolTable::new();
        assert_eq!(resolve_variables("7 / 2", &t).unwrap(), "7 / 2");
    }

    #[test]
    fn letter_digit_adjacency_rejected() {
        let t = table(&["a=1"]);
        assert_eq!(resolve_variables("2a", &t), Err(CalcError::InvalidIdentifier));
        assert_eq!(resolve_variables("a2", &t), Err(CalcError::InvalidIdentifier));
        assert_eq!(resolve_variables("a 2", &t), Err(CalcError::InvalidIdentifier));
        assert_eq!(resolve_variables("1 + n22", &t), Err(CalcError::InvalidIdentifier));
    }

    #[test]
    fn unknown_variable_rejected() {
        let t = table(&["a=1"]);
        assert_eq!(resolve_variables("a + b", &t), Err(CalcError::UnknownVariable));
        assert_eq!(resolve_variables("ghost", &t), Err(CalcError::UnknownVariable));
    }

    #[test]
    fn name_prefix_is_not_substituted() {
        let t = table(&["a=1"]);
        assert_eq!(resolve_variables("ab", &t), Err(CalcError::UnknownVariable));
    }

    // -- normalize_operators ----------------------------------------------------

    #[test]
    fn rewrites_division_and_power() {
        assert_eq!(normalize_operators("7/2").unwrap(), "7//2");
        assert_eq!(normalize_operators("4^2").unwrap(), "4**2");
        assert_eq!(normalize_operators("1 + 2 * 3").unwrap(), "1 + 2 * 3");
    }

    #[test]
    fn doubled_operators_rejected() {
        assert_eq!(normalize_operators("5**2"), Err(CalcError::InvalidExpression));
        assert_eq!(normalize_operators("6//2"), Err(CalcError::InvalidExpression));
        assert_eq!(normalize_operators("1 + 6///2"), Err(CalcError::InvalidExpression));
    }

    #[test]
    fn preprocess_chains_both_passes() {
        let t = table(&["n=9"]);
        assert_eq!(preprocess("n / 2 ^ 2", &t).unwrap(), "9 // 2 ** 2");
    }
}
