//! Calculator session: line routing, output buffering, and the input loop.
//!
//! A [`Calculator`] owns the [`SymbolTable`] for the whole session.  Each
//! input line is classified and routed:
//!
//! | Line | Route |
//! |------|-------|
//! | starts with `/` | command (`/help`, `/exit`) |
//! | contains `=` | assignment |
//! | blank | ignored |
//! | anything else | preprocess → evaluate |
//!
//! Output is collected in [`Calculator::output`] and side-effects that need
//! the caller (only exiting, for now) are queued in [`Calculator::actions`],
//! so the session itself never touches stdout or the process.

use std::io::{self, BufRead, Write};

use crate::error::CalcError;
use crate::expr;
use crate::preprocess;
use crate::symbol::SymbolTable;

/// Usage text printed by `/help`.
pub const HELP_TEXT: &str = "\
This program evaluates mathematical expressions.
Expressions are combinations of numbers (e.g. 1, 2, 3) and operators (e.g. +, -, *, /). For example: 1 + 2 - 3 * 4.
Supported operators include:
+: addition
-: subtraction
*: multiplication
/: integer division
^: power
To evaluate an expression, simply type it and press the Enter or Return key on your keyboard.
The program also supports variables. To create a variable, type [variable name] = [variable value] (without brackets). Once created, variables can be used in any expression.";

/// Farewell printed by `/exit`.
pub const FAREWELL: &str = "Bye!";

/// Greeting printed before the first prompt in interactive mode.
pub const BANNER: [&str; 3] = [
    "Enter an expression to calculate it.",
    "To exit, enter /exit.",
    "For help, enter /help.",
];

// ── LineKind ──────────────────────────────────────────────────────────────────

/// How an input line will be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Command,
    Assignment,
    Blank,
    Expression,
}

impl LineKind {
    /// Classify a raw line.  The leading `/` check looks at the untrimmed
    /// first character.
    pub fn of(line: &str) -> Self {
        if line.starts_with('/') {
            LineKind::Command
        } else if line.contains('=') {
            LineKind::Assignment
        } else if line.trim().is_empty() {
            LineKind::Blank
        } else {
            LineKind::Expression
        }
    }
}

// ── CalcAction ────────────────────────────────────────────────────────────────

/// A side-effect the session cannot perform itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcAction {
    /// Terminate the session with a zero exit status.
    Exit,
}

// ── Calculator ────────────────────────────────────────────────────────────────

/// One calculator session.
#[derive(Debug, Default)]
pub struct Calculator {
    symbols: SymbolTable,
    /// Lines ready to be printed, blank separators included.
    pub output: Vec<String>,
    /// Side-effects queued for the caller.
    pub actions: Vec<CalcAction>,
    /// Trace every pipeline stage to stderr.
    pub debug: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with pre-populated variables (e.g. from a startup file).
    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Calculator {
            symbols,
            ..Self::default()
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Drain and return all queued [`CalcAction`]s.
    pub fn take_actions(&mut self) -> Vec<CalcAction> {
        std::mem::take(&mut self.actions)
    }

    /// Drain and return all pending output lines.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn trace(&self, stage: &str, text: &str) {
        if self.debug {
            eprintln!("smartcalc: debug: {stage}: {text}");
        }
    }

    /// Push a message followed by the blank separator line.
    fn emit(&mut self, msg: impl Into<String>) {
        self.output.push(msg.into());
        self.output.push(String::new());
    }

    // ── Execution ─────────────────────────────────────────────────────────────

    /// Handle one input line, appending whatever it prints to `output`.
    pub fn exec_line(&mut self, line: &str) {
        let kind = LineKind::of(line);
        self.trace("route", &format!("{kind:?} {line:?}"));

        let result = match kind {
            LineKind::Command => self.exec_command(line),
            LineKind::Assignment => self.symbols.assign(line),
            LineKind::Blank => Ok(()),
            LineKind::Expression => self.evaluate(line).map(|n| self.emit(n.to_string())),
        };

        if let Err(e) = result {
            self.trace("error", &format!("{e:?}"));
            self.emit(e.to_string());
        }
    }

    fn exec_command(&mut self, line: &str) -> Result<(), CalcError> {
        match line {
            "/help" => {
                self.output.extend(HELP_TEXT.lines().map(str::to_owned));
                self.output.push(String::new());
                Ok(())
            }
            "/exit" => {
                self.output.push(FAREWELL.to_owned());
                self.actions.push(CalcAction::Exit);
                Ok(())
            }
            _ => Err(CalcError::UnknownCommand),
        }
    }

    /// Run an expression through variable resolution, operator
    /// normalization, and evaluation.  Does not touch `output`.
    pub fn evaluate(&self, line: &str) -> Result<i64, CalcError> {
        let resolved = preprocess::resolve_variables(line, &self.symbols)?;
        self.trace("resolved", &resolved);

        let canonical = preprocess::normalize_operators(&resolved)?;
        self.trace("normalized", &canonical);

        let value = expr::eval_str(&canonical).map_err(|e| {
            self.trace("evaluator", &e.to_string());
            CalcError::from(e)
        })?;
        self.trace("result", &value.to_string());
        Ok(value)
    }

    // ── Input loop ────────────────────────────────────────────────────────────

    /// Write pending output lines to `out`.
    pub fn flush_output(&mut self, out: &mut impl Write) -> io::Result<()> {
        for line in self.output.drain(..) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    /// Execute one line, print its output, and report whether the session
    /// should end.
    pub fn step(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        self.exec_line(line);
        self.flush_output(out)?;
        Ok(self
            .take_actions()
            .iter()
            .any(|a| matches!(a, CalcAction::Exit)))
    }

    /// Read lines from `input` until `/exit` or end of input.
    ///
    /// Returns `true` if the session ended through `/exit`.
    ///
    /// Lines are read as bytes; invalid UTF-8 becomes U+FFFD, which then fails
    /// as an ordinary bad line instead of ending the session.
    pub fn run(&mut self, mut input: impl BufRead, out: &mut impl Write) -> io::Result<bool> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(false);
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            if self.step(&String::from_utf8_lossy(&buf), out)? {
                return Ok(true);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
