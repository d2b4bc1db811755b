pub mod aggregate;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod generate;
pub mod graph;
pub mod inference;
pub mod ir;
pub mod namespace;
pub mod naming;
pub mod registry;
pub mod value;

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over the flags when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    setup_logging(command_line_interface.verbose, command_line_interface.quiet);
    command_line_interface.run()
}
