//! CLI entry point for the stereogram generator

use clap::Parser;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use stereogram::io::cli::{Cli, FileProcessor};

fn main() -> stereogram::Result<()> {
    let cli = Cli::parse();
    // Logging is best effort
    let _ = TermLogger::init(
        cli.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
