use clap::{CommandFactory, Parser};
use datetidy::cli::{Cli, run_cli};
use datetidy::file_organizer::OrganizeError;
use datetidy::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match run_cli(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            if matches!(e, OrganizeError::InvalidInputPath { .. }) {
                eprintln!("{}", Cli::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}
