use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use clap::Parser;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;
use daycare_gen::batch::DEFAULT_BATCH_SIZE;
use daycare_gen::loader;
use daycare_gen::loader::DEFAULT_EVENTS_PER_CHILD;
use daycare_gen::loader::DEFAULT_NUM_CHILDREN;
use daycare_gen::loader::DEFAULT_NUM_STAFF;
use daycare_gen::store::Connection;
use daycare_gen::store::Credentials;
use serde_derive::Deserialize;

use crate::error::Error;
use crate::error::Result;
use crate::tracing::LogLevel;

pub const DEFAULT_DB_NAME: &str = "daycare_db";
pub const DEFAULT_DB_USER: &str = "root";
pub const DEFAULT_DB_PASSWORD: &str = "password";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 27017;

/// Generate daycare data
#[derive(Parser, Debug, Clone, Default)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML file with settings; environment and flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Number of events per child
    #[arg(long)]
    pub events_per_child: Option<usize>,
    /// Name of the database
    #[arg(long)]
    pub db_name: Option<String>,
    #[arg(long)]
    pub num_children: Option<usize>,
    #[arg(long)]
    pub num_staff: Option<usize>,
    /// Events per bulk insert, at most 10000
    #[arg(long)]
    pub batch_size: Option<usize>,
    /// Also generate events older than 30 days
    #[arg(long)]
    pub generate_old_events: bool,
    /// Seed for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,
    /// Generate into memory without connecting to the database
    #[arg(long)]
    pub dry_run: bool,
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

/// Flat settings as read from file, environment (`DB_NAME`, `DB_PORT`, ...) and flags.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_host: String,
    pub db_port: u16,
    pub generate_old_events: bool,
    pub events_per_child: usize,
    pub num_children: usize,
    pub num_staff: usize,
    pub batch_size: usize,
    pub seed: Option<u64>,
    pub dry_run: bool,
    pub log_level: LogLevel,
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>> {
    Ok(builder
        .set_default("db_name", DEFAULT_DB_NAME)?
        .set_default("db_user", DEFAULT_DB_USER)?
        .set_default("db_password", DEFAULT_DB_PASSWORD)?
        .set_default("db_host", DEFAULT_DB_HOST)?
        .set_default("db_port", DEFAULT_DB_PORT as i64)?
        .set_default("generate_old_events", false)?
        .set_default("events_per_child", DEFAULT_EVENTS_PER_CHILD as i64)?
        .set_default("num_children", DEFAULT_NUM_CHILDREN as i64)?
        .set_default("num_staff", DEFAULT_NUM_STAFF as i64)?
        .set_default("batch_size", DEFAULT_BATCH_SIZE as i64)?
        .set_default("dry_run", false)?
        .set_default("log_level", LogLevel::Info.as_str())?)
}

fn with_args(
    builder: ConfigBuilder<DefaultState>,
    args: &Args,
) -> Result<ConfigBuilder<DefaultState>> {
    let mut builder = builder
        .set_override_option("db_name", args.db_name.clone())?
        .set_override_option("events_per_child", args.events_per_child.map(|v| v as i64))?
        .set_override_option("num_children", args.num_children.map(|v| v as i64))?
        .set_override_option("num_staff", args.num_staff.map(|v| v as i64))?
        .set_override_option("batch_size", args.batch_size.map(|v| v as i64))?
        .set_override_option("log_level", args.log_level.map(|l| l.as_str()))?;

    // flags can only switch these on
    if args.generate_old_events {
        builder = builder.set_override("generate_old_events", true)?;
    }
    if args.dry_run {
        builder = builder.set_override("dry_run", true)?;
    }
    if let Some(seed) = args.seed {
        builder = builder.set_override("seed", seed.to_string())?;
    }

    Ok(builder)
}

impl Settings {
    /// Defaults, then the config file, then the environment, then flags.
    pub fn load(args: &Args) -> Result<Self> {
        let mut builder = with_defaults(config::Config::builder())?;
        if let Some(path) = &args.config {
            builder = builder.add_source(config::File::from(path.clone()));
        }
        builder = builder.add_source(Environment::default());

        Ok(with_args(builder, args)?.build()?.try_deserialize()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub loader: loader::Config,
    pub connection: Connection,
    pub seed: Option<u64>,
    pub dry_run: bool,
    pub log_level: LogLevel,
}

impl Config {
    pub fn try_new(settings: Settings, now: DateTime<Utc>) -> Result<Self> {
        if settings.batch_size == 0 {
            return Err(Error::BadRequest("batch size must be positive".to_string()));
        }
        if settings.batch_size > DEFAULT_BATCH_SIZE {
            return Err(Error::BadRequest(format!(
                "batch size {} is above the bulk insert limit of {DEFAULT_BATCH_SIZE}",
                settings.batch_size
            )));
        }
        if settings.db_name.is_empty() {
            return Err(Error::BadRequest("database name is empty".to_string()));
        }

        Ok(Config {
            loader: loader::Config {
                num_children: settings.num_children,
                num_staff: settings.num_staff,
                events_per_child: settings.events_per_child,
                batch_size: settings.batch_size,
                generate_old_events: settings.generate_old_events,
                now,
            },
            connection: Connection {
                database: settings.db_name,
                credentials: Credentials {
                    user: settings.db_user,
                    password: settings.db_password,
                    host: settings.db_host,
                    port: settings.db_port,
                },
            },
            seed: settings.seed,
            dry_run: settings.dry_run,
            log_level: settings.log_level,
        })
    }
}

impl TryFrom<Settings> for Config {
    type Error = Error;

    fn try_from(settings: Settings) -> Result<Self> {
        Config::try_new(settings, Utc::now())
    }
}
