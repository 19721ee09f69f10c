use clap::Parser;
use finchart::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
