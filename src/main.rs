use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use skelter::{
    args::Args,
    config::ConfigStore,
    error::Error,
    generator::ExecGenerator,
    prompt::ConsolePrompt,
    registry::StaticRegistry,
    runner::{Outcome, SessionRunner},
};

/// The program spawned to do the actual rendering. Overridable so the front
/// end can drive any generator that speaks `-q -t <template> [tokens...]`.
fn generator_program() -> PathBuf {
    std::env::var_os("SKELTER_GENERATOR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("skelgen"))
}

fn app(args: &Args) -> Result<Outcome> {
    let mut runner = SessionRunner::builder()
        .name("skelter")
        .dotfile(ConfigStore::dotfile_path()?)
        .versions(vec![(
            env!("CARGO_PKG_NAME").to_owned(),
            env!("CARGO_PKG_VERSION").to_owned(),
        )])
        .registry(Box::new(StaticRegistry::builtin()))
        .generator(Box::new(ExecGenerator::new(generator_program())))
        .prompt(Box::new(ConsolePrompt))
        .build()?;

    if args.help {
        runner.show_help();
        return Ok(Outcome::Completed);
    }

    if args.make_config_file {
        runner.make_config_file();
        return Ok(Outcome::Completed);
    }

    if args.list {
        runner.list_verbose();
        return Ok(Outcome::Completed);
    }

    if args.version {
        runner.show_version();
        return Ok(Outcome::Completed);
    }

    if args.tokens.is_empty() {
        runner.usage();
        return Ok(Outcome::Completed);
    }

    match runner.run(&args.tokens, args.list_variables) {
        Err(e) if usage_worthy(&e) => {
            // usage first, then the diagnostic
            runner.usage();
            Err(e)
        }
        other => other,
    }
}

/// Failures where showing the usage block helps: the operator got the
/// invocation itself wrong, rather than hitting a config or generator
/// problem.
fn usage_worthy(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<Error>(),
        Some(
            Error::MissingTemplate
                | Error::MalformedArgument(_)
                | Error::UnsupportedArgument(_)
                | Error::TemplateNotFound(_)
        )
    )
}

fn main() -> ExitCode {
    let args = Args::parse();

    match app(&args) {
        Ok(Outcome::Completed | Outcome::Cancelled) => ExitCode::SUCCESS,
        Err(e) => {
            skelter::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
