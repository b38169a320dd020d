//! Segflora CLI entry point.

#![allow(clippy::print_stderr)]

use segflora::Error;

fn main() {
    match segflora::run() {
        Ok(()) => {}
        Err(Error::Interrupted) => {
            eprintln!("interrupted");
            std::process::exit(130); // 128 + SIGINT(2)
        }
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}
