//! Routegen Binary

use routegen::{EnhancedCli, GeneratorError};
use std::process;

fn main() {
    let mut cli = EnhancedCli::new();

    match cli.run() {
        Ok(()) => {}
        Err(GeneratorError::Io(e)) => {
            eprintln!("IO Error: {}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            process::exit(1);
        }
    }
}
