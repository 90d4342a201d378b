//! CLI command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{
    FailurePolicy, Interpreter, ScriptReport, StatementReport, StatementStatus,
};
use crate::application::{parse_statement, split_statements, Registry};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::ServiceContainer;

/// Execute the parsed CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.continue_on_error {
        settings.on_error = FailurePolicy::Continue;
    }
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Run { file, history }) => cmd_run(&container, file, *history),
        Some(Commands::Exec {
            statements,
            history,
        }) => cmd_exec(&container, statements, *history),
        Some(Commands::Check { file }) => cmd_check(&container, file),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Err(CliError::Usage(
            "no command given, see 'dsinterp --help'".into(),
        )),
    }
}

#[instrument(skip(container))]
fn cmd_run(container: &ServiceContainer, file: &Path, history: bool) -> CliResult<()> {
    let script = container.read_script(file)?;
    run(container, &script, history)
}

#[instrument(skip(container))]
fn cmd_exec(container: &ServiceContainer, statements: &[String], history: bool) -> CliResult<()> {
    if statements.iter().all(|s| s.trim().is_empty()) {
        return Err(CliError::InvalidArgs("no statements to execute".into()));
    }
    run(container, &statements.join("\n"), history)
}

fn run(container: &ServiceContainer, script: &str, history: bool) -> CliResult<()> {
    let settings = &container.settings;
    let mut interpreter = container.interpreter();
    let show_structure = settings.show_structure;

    let report = interpreter.run_script_with(script, |statement, registry| {
        print_statement(statement);
        if show_structure {
            print_touched_structure(statement, registry);
        }
    });

    if history {
        print_history(&interpreter, &settings.time_format);
    }
    summarize(&report)
}

fn print_statement(report: &StatementReport) {
    match &report.status {
        StatementStatus::Done(outcome) => output::success(&format!("{}: {}", report.text, outcome)),
        StatementStatus::Failed(e) => {
            output::failure(&format!("line {}: {}", report.line, report.text));
            output::error(&format!("{} ({})", e, e.kind()));
        }
        StatementStatus::Skipped => output::skipped(&format!("{} (skipped)", report.text)),
    }
}

fn print_touched_structure(report: &StatementReport, registry: &Registry) {
    if !matches!(report.status, StatementStatus::Done(_)) {
        return;
    }
    let touched = parse_statement(&report.text)
        .ok()
        .and_then(|command| command.structure())
        .and_then(|kind| registry.get(kind));
    if let Some(structure) = touched {
        for line in output::render_structure(structure).lines() {
            output::detail(&line);
        }
    }
}

fn print_history(interpreter: &Interpreter, time_format: &str) {
    output::header("History");
    for line in interpreter.recorder().render_merged(time_format) {
        output::detail(&line);
    }
}

fn summarize(report: &ScriptReport) -> CliResult<()> {
    debug!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        skipped = report.skipped(),
        "run complete"
    );
    if report.skipped() > 0 {
        output::warning(&format!(
            "{} statement(s) skipped after failure (use --continue-on-error to run them)",
            report.skipped()
        ));
    }
    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::ScriptFailed {
            failed: report.failed(),
            total: report.statements.len(),
        })
    }
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let script = container.read_script(file)?;
    let statements = split_statements(&script);
    let mut failed = 0;
    for statement in &statements {
        match parse_statement(&statement.text) {
            Ok(command) => output::success(&format!("line {}: {}", statement.line, command)),
            Err(e) => {
                failed += 1;
                output::failure(&format!("line {}: {}", statement.line, e));
            }
        }
    }
    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::ScriptFailed {
            failed,
            total: statements.len(),
        })
    }
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::info(&format!("global: {} ({})", path.display(), state));
                }
                None => output::warning("cannot determine config directory"),
            }
            Ok(())
        }
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
