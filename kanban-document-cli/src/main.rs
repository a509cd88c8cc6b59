//! kanban-doc - inspect and repair kanban board documents.
//!
//! Commands:
//! - `kanban-doc check <file>`: report the repairs a board file needs
//! - `kanban-doc normalize <file> [-o out]`: write the repaired document
//! - `kanban-doc template <name>`: print a new board from a column template
//! - `kanban-doc relatives <file> <task>`: show a task's ancestry
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error, or `check` found problems

mod cli;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use kanban_document::{
    normalize::{check_invariants, from_value, NormalizationReport},
    relationships::{find_ancestors, find_descendants, subtask_candidates},
    template, BoardDocument, EngineConfig, EngineContext, TaskId,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.debug, cli.quiet);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn configure_logging(verbose: bool, debug: bool, quiet: bool) {
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let log_level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    }
    .context("loading engine configuration")?;
    let ctx = EngineContext::new(config);

    match cli.command {
        Commands::Check { file, json } => check(&file, json, &ctx),
        Commands::Normalize { file, output } => {
            normalize(&file, output.as_deref(), &ctx)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Template { name, list } => {
            print_template(name.as_deref(), list, &ctx)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Relatives { file, task_id } => {
            relatives(&file, &task_id, &ctx)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Read a board file, unwrapping a stored board envelope if present
fn load_board(path: &Path, ctx: &EngineContext) -> Result<(BoardDocument, NormalizationReport)> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let value = match value {
        Value::Object(mut envelope)
            if !envelope.contains_key("columns") && envelope.contains_key("data") =>
        {
            debug!("Unwrapping stored board envelope");
            envelope.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    let loaded = from_value(value, ctx.ids())
        .with_context(|| format!("reading board document from {}", path.display()))?;
    Ok(loaded)
}

fn check(path: &Path, as_json: bool, ctx: &EngineContext) -> Result<ExitCode> {
    let (doc, report) = load_board(path, ctx)?;
    // repairs must leave nothing behind; anything here is an engine bug
    let violations = check_invariants(&doc);

    if as_json {
        let out = json!({
            "clean": report.is_clean() && violations.is_empty(),
            "columns": doc.column_order.len(),
            "liveTasks": doc.live_task_count(),
            "archivedTasks": doc.archived_task_count(),
            "repairs": report.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "violations": violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "{}: {} columns, {} live tasks, {} archived",
            path.display(),
            doc.column_order.len(),
            doc.live_task_count(),
            doc.archived_task_count()
        );
        if report.is_clean() {
            println!("clean");
        } else {
            print!("{report}");
        }
        for violation in &violations {
            println!("violation: {violation}");
        }
    }

    if report.is_clean() && violations.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn normalize(path: &Path, output: Option<&Path>, ctx: &EngineContext) -> Result<()> {
    let (doc, report) = load_board(path, ctx)?;
    let json = serde_json::to_string_pretty(&doc)?;

    match output {
        Some(out) => {
            fs::write(out, format!("{json}\n"))
                .with_context(|| format!("writing {}", out.display()))?;
            info!(
                repairs = report.len(),
                output = %out.display(),
                "Wrote normalized board"
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_template(name: Option<&str>, list: bool, ctx: &EngineContext) -> Result<()> {
    if list {
        for name in template::TEMPLATE_NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(name) = name else {
        bail!("a template name is required");
    };
    if !template::is_template(name) {
        bail!(
            "unknown template '{name}', expected one of: {}",
            template::TEMPLATE_NAMES.join(", ")
        );
    }
    let doc = BoardDocument::from_template(name, ctx);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn relatives(path: &Path, task_id: &str, ctx: &EngineContext) -> Result<()> {
    let (doc, _) = load_board(path, ctx)?;
    let id = TaskId::from_string(task_id);
    let Some(task) = doc.find_task(&id) else {
        bail!("task '{task_id}' is not on the board");
    };

    let mut ancestors: Vec<_> = find_ancestors(&id, doc.live_tasks()).into_iter().collect();
    let mut descendants: Vec<_> = find_descendants(&id, doc.live_tasks()).into_iter().collect();
    ancestors.sort();
    descendants.sort();
    let candidates: Vec<_> = subtask_candidates(&id, doc.live_tasks(), &task.subtasks)
        .into_iter()
        .map(|t| t.id)
        .collect();

    let out = json!({
        "id": id,
        "content": task.content,
        "parentId": task.parent_id,
        "subtasks": task.subtasks,
        "ancestors": ancestors,
        "descendants": descendants,
        "subtaskCandidates": candidates,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
