use std::io;
use std::process::ExitCode;

use smartcalc::calc::{Calculator, BANNER};
use smartcalc::cli::{self, ConfigFile, USAGE};
use smartcalc::config::{self, Config};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("smartcalc: {e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    // ── Startup file ──────────────────────────────────────────────────────────
    let path = match args.config {
        ConfigFile::Skip => None,
        ConfigFile::Explicit(path) => Some(path),
        ConfigFile::Search => config::find_startup_file(),
    };
    let symbols = match path {
        Some(path) => match Config::load_file(&path) {
            Ok((cfg, errors)) => {
                for e in errors {
                    eprintln!("smartcalc: warning: {}: {e}", path.display());
                }
                cfg.symbols
            }
            Err(e) => {
                eprintln!("smartcalc: warning: {}: {e}", path.display());
                Default::default()
            }
        },
        None => Default::default(),
    };

    let mut calc = Calculator::with_symbols(symbols);
    calc.debug = args.debug;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // ── Banner (interactive sessions only) ────────────────────────────────────
    let is_tty = unsafe {
        libc::isatty(libc::STDIN_FILENO) != 0 && libc::isatty(libc::STDOUT_FILENO) != 0
    };
    if is_tty && !args.quiet {
        calc.output.extend(BANNER.iter().map(|&l| l.to_owned()));
        calc.output.push(String::new());
    }

    // ── Startup lines (-c<line>) ──────────────────────────────────────────────
    for line in &args.commands {
        match calc.step(line, &mut out) {
            Ok(true) => return ExitCode::SUCCESS,
            Ok(false) => {}
            Err(e) => {
                eprintln!("smartcalc: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    // ── Main loop ─────────────────────────────────────────────────────────────
    let result = calc
        .flush_output(&mut out)
        .and_then(|()| calc.run(io::stdin().lock(), &mut out));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("smartcalc: {e}");
            ExitCode::FAILURE
        }
    }
}
