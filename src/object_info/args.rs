use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "objinfo", version)]
#[command(about = "Project, soft-delete and audit-column helpers for records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use the global configuration instead of the project one
    #[arg(short, long, global = true)]
    pub global: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the projection of a JSON record
    #[command(alias = "p")]
    Project {
        /// Path to the record (a JSON object)
        record: PathBuf,

        /// Projection configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Restrict output to these attributes
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<String>>,

        /// Exclude these attributes (replaces the deletion columns default)
        #[arg(long, value_delimiter = ',')]
        except: Option<Vec<String>>,

        /// Date/time format: standard, full, min, date, year or a strftime pattern
        #[arg(long)]
        datetime_format: Option<String>,
    },

    /// Soft-delete a JSON record and write it back
    #[command(alias = "rm")]
    SoftDelete {
        /// Path to the record (a JSON object)
        record: PathBuf,

        /// Id of the user performing the deletion
        #[arg(short, long)]
        user_id: Option<String>,

        /// Also stamp updated_by and refresh updated_at
        #[arg(long)]
        refresh_updated: bool,

        /// Fail when the record cannot be written back
        #[arg(long)]
        strict: bool,
    },

    /// Print the audit columns of whole operations (default: created updated deleted)
    Columns {
        operations: Vec<String>,

        /// Print declarations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print operator/timestamp columns for the given stems
    OperationColumns {
        #[arg(required = true, num_args = 1..)]
        stems: Vec<String>,

        /// Skip the operator (`_by`) columns
        #[arg(long)]
        no_operator: bool,

        /// Skip the timestamp (`_at`) columns
        #[arg(long)]
        no_timestamp: bool,

        #[arg(long, default_value = "")]
        operator_prefix: String,

        #[arg(long, default_value = "_by")]
        operator_suffix: String,

        #[arg(long, default_value = "")]
        timestamp_prefix: String,

        #[arg(long, default_value = "_at")]
        timestamp_suffix: String,

        /// Print declarations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (delete-column, datetime-format, deleted-field)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
