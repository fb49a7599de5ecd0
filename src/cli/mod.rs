// CLI module
// Command-line arguments and the interactive menu

mod args;
pub mod menu;

pub use args::{CliArgs, LogLevel, StrategyType};
pub use menu::{Menu, MenuOption};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
