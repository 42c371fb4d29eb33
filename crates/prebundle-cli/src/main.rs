//! Prebundle CLI: the `prebundle` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { dir, package, json } => commands::show::run(dir, package, json),

        Commands::Check {
            dir,
            package,
            strict,
            json,
        } => commands::check::run(dir, package, strict, json),

        Commands::Set {
            dir,
            main,
            module,
            umd_main,
            umd_name,
            clear_umd_name,
            source,
            package,
            json,
        } => commands::set::run(commands::set::Args {
            dir,
            main,
            module,
            umd_main,
            umd_name,
            clear_umd_name,
            source,
            package,
            json,
        }),

        Commands::Source { dir, package } => commands::source::run(dir, package),
    }
}
