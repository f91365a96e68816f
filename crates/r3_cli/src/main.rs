/* 📖 # What does `r3` report through its exit code?

Only whether the run could start:

- 0: the run completed, including runs where individual entries could not be searched or
  renamed, runs with nothing to rename, dry runs, and declined confirmations
- 1: bad arguments, `<dir>` is not a directory, or `<find>` is empty or invalid

Per-entry problems are reported on standard error and never change the exit code.
*/

mod cli;
mod prompt;
mod run;

use std::io;
use std::process::ExitCode;

use clap::Parser;

use r3_base::tracing::init_tracing;

use crate::cli::Cli;

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Warning: {}", e);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help goes to stdout; if that is closed, still show it on stderr.
            if e.print().is_err() {
                eprintln!("{}", e);
            }
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = cli.into_config();
    let pal = config.real_pal();
    let stdin = io::stdin();

    match run::run(
        &config,
        &pal,
        &mut stdin.lock(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
