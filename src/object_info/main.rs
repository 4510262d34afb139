use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use object_info::api::{
    CmdMessage, ConfigAction, MessageLevel, ObjectInfoApi, ObjectInfoPaths, ProjectOverrides,
    Scope,
};
use object_info::columns::{ColumnDeclaration, OperationColumnOptions};
use object_info::config::{ObjectInfoConfig, CONFIG_KEYS};
use object_info::error::{ObjectInfoError, Result};
use object_info::soft_delete::DeleteOptions;
use object_info::value::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

/// Overrides the global configuration directory.
const HOME_ENV: &str = "OBJINFO_HOME";
/// Log filter directives, e.g. `OBJINFO_LOG=object_info=debug`.
const LOG_ENV: &str = "OBJINFO_LOG";
const PROJECT_DIR: &str = ".objinfo";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: ObjectInfoApi,
    scope: Scope,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Project {
            record,
            config,
            only,
            except,
            datetime_format,
        } => handle_project(
            &ctx,
            record,
            config,
            ProjectOverrides {
                only,
                except,
                datetime_format,
            },
        ),
        Commands::SoftDelete {
            record,
            user_id,
            refresh_updated,
            strict,
        } => handle_soft_delete(&ctx, record, user_id, refresh_updated, strict),
        Commands::Columns { operations, json } => handle_columns(&ctx, operations, json),
        Commands::OperationColumns {
            stems,
            no_operator,
            no_timestamp,
            operator_prefix,
            operator_suffix,
            timestamp_prefix,
            timestamp_suffix,
            json,
        } => {
            let options = OperationColumnOptions {
                with_operator: !no_operator,
                with_timestamp: !no_timestamp,
                operator_prefix,
                operator_suffix,
                timestamp_prefix,
                timestamp_suffix,
            };
            handle_operation_columns(&ctx, stems, options, json)
        }
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let project_dir = cwd.join(PROJECT_DIR);
    let global_dir = global_config_dir()?;

    let scope = if cli.global {
        Scope::Global
    } else {
        Scope::Project
    };

    let config_dir = match scope {
        Scope::Project => &project_dir,
        Scope::Global => &global_dir,
    };
    let config = match ObjectInfoConfig::load(config_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(dir = %config_dir.display(), error = %e, "ignoring unreadable config");
            ObjectInfoConfig::default()
        }
    };
    tracing::debug!(dir = %config_dir.display(), ?config, "configuration loaded");

    let paths = ObjectInfoPaths {
        project: Some(project_dir),
        global: global_dir,
    };
    Ok(AppContext {
        api: ObjectInfoApi::new(paths, config),
        scope,
    })
}

fn global_config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "objinfo", "objinfo")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ObjectInfoError::Config("Could not determine config dir".into()))
}

fn handle_project(
    ctx: &AppContext,
    record: PathBuf,
    projection: Option<PathBuf>,
    overrides: ProjectOverrides,
) -> Result<()> {
    let result = ctx
        .api
        .project(&record, projection.as_deref(), overrides)?;
    if let Some(info) = &result.info {
        println!("{}", serde_json::to_string_pretty(info)?);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_soft_delete(
    ctx: &AppContext,
    record: PathBuf,
    user_id: Option<String>,
    refresh_updated: bool,
    strict: bool,
) -> Result<()> {
    let mut options = DeleteOptions::by(parse_user_id(user_id));
    if refresh_updated {
        options = options.refresh_updated(true);
    }
    let result = ctx.api.soft_delete(&record, &options, strict)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_columns(ctx: &AppContext, operations: Vec<String>, json: bool) -> Result<()> {
    let result = ctx.api.generate_operations(&operations)?;
    print_columns(&result.columns, json)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_operation_columns(
    ctx: &AppContext,
    stems: Vec<String>,
    options: OperationColumnOptions,
    json: bool,
) -> Result<()> {
    let result = ctx.api.operation_columns(&stems, &options)?;
    print_columns(&result.columns, json)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let show_all = matches!(action, ConfigAction::ShowAll);
    let result = ctx.api.config(ctx.scope, action)?;
    if show_all {
        if let Some(config) = &result.config {
            for key in CONFIG_KEYS {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

/// Numeric ids become integers, anything else stays text.
fn parse_user_id(raw: Option<String>) -> Value {
    match raw {
        None => Value::Null,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(id) => Value::Int(id),
            Err(_) => Value::Str(raw),
        },
    }
}

fn print_columns(columns: &[ColumnDeclaration], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(columns)?);
    } else {
        for column in columns {
            println!("{}", column);
        }
    }
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}
