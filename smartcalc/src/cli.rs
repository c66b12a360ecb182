//! Command-line argument parsing.
//!
//! Usage:
//!   smartcalc [-qd] [-f[<file>]] [-c<line>]...

use std::path::PathBuf;

pub const USAGE: &str = "Usage: smartcalc [-qd] [-f[<file>]] [-c<line>]...";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Startup-file specification.
    pub config: ConfigFile,
    /// Lines to execute after the startup file (`-c<line>`, repeatable).
    pub commands: Vec<String>,
    /// Suppress the welcome banner (`-q`).
    pub quiet: bool,
    /// Trace pipeline stages to stderr (`-d`).
    pub debug: bool,
}

/// How to choose the startup file.
#[derive(Debug, Default)]
pub enum ConfigFile {
    /// Search `$SMARTCALCRC`, the config dir, then `~/.smartcalcrc` (default).
    #[default]
    Search,
    /// `-f` with no file argument: skip the startup file.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        if arg == "--" {
            if let Some(extra) = argv.get(i + 1) {
                return Err(format!("unexpected argument: {extra}"));
            }
            break;
        }

        let Some(flags) = arg.strip_prefix('-').filter(|f| !f.is_empty()) else {
            return Err(format!("unexpected argument: {arg}"));
        };

        // Iterate over characters after the leading `-`.
        let chars: Vec<char> = flags.chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'q' => args.quiet = true,
                'd' => args.debug = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.config = ConfigFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else if i + 1 < argv.len() && !argv[i + 1].starts_with('-') {
                        i += 1;
                        args.config = ConfigFile::Explicit(PathBuf::from(&argv[i]));
                    } else {
                        args.config = ConfigFile::Skip;
                    }
                }

                // -c<line>
                'c' => {
                    let line = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-c requires a line argument".to_owned());
                    };
                    args.commands.push(line);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    Ok(args)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
