//! Variable store and the `name = value` assignment parser.
//!
//! Names are one or more ASCII letters (case-sensitive); values are one or
//! more ASCII digits.  Assigning one variable from another copies the current
//! value, so later changes to the source do not propagate.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CalcError;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("identifier pattern"));
static VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("value pattern"));

/// Returns `true` if `name` is a well-formed variable name.
pub fn is_identifier(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Returns `true` if `value` is a well-formed stored value.
pub fn is_value(value: &str) -> bool {
    VALUE_RE.is_match(value)
}

// ── SymbolTable ───────────────────────────────────────────────────────────────

/// Session-scoped variable table.
///
/// Every key satisfies [`is_identifier`] and every value satisfies
/// [`is_value`]; [`SymbolTable::assign`] is the only way entries get in.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    vars: HashMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stored digit string for a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns `true` if the variable has been assigned.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Iterate over all `(name, value)` bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Parse and apply an assignment line such as `a = 12` or `b = a`.
    ///
    /// Whitespace anywhere in the line is ignored.  On error the table is
    /// left untouched.
    pub fn assign(&mut self, line: &str) -> Result<(), CalcError> {
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();

        let mut parts = compact.split('=');
        let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CalcError::InvalidAssignment);
        };

        if !is_identifier(name) {
            return Err(CalcError::InvalidIdentifier);
        }

        let resolved = if is_value(value) {
            value.to_owned()
        } else {
            // Snapshot of the source variable, not a live alias.
            self.get(value)
                .ok_or(CalcError::InvalidAssignment)?
                .to_owned()
        };

        self.vars.insert(name.to_owned(), resolved);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
