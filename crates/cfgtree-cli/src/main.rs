//! cfgtree - read and edit YAML configuration files by path.

mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cfgtree::{Configuration, FileStore};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cfgtree", version)]
#[command(about = "Read and edit YAML configuration files by path")]
struct Cli {
    /// Character separating path segments
    #[arg(long, default_value_t = '.')]
    separator: char,

    /// Spaces per nesting level when saving (2-9)
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// File supplying values for paths the configuration does not set
    #[arg(long, value_name = "FILE")]
    defaults: Option<PathBuf>,

    /// Include defaults when listing keys
    #[arg(long)]
    copy_defaults: bool,

    /// Configuration file (created on the first write if missing)
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value at a path.
    Get { path: String },

    /// Store a value at a path and save the file.
    ///
    /// The value is read like an unquoted YAML scalar, so `8080` is stored as
    /// an integer and `true` as a boolean.
    Set { path: String, value: String },

    /// Remove the value or section at a path and save the file.
    Unset { path: String },

    /// List keys of the root section.
    Keys {
        /// Include nested keys as full paths.
        #[arg(long)]
        deep: bool,
    },

    /// Print the whole file as it would be saved.
    Dump,
}

fn open_configuration(cli: &Cli) -> Result<Configuration> {
    let store = FileStore::new(&cli.file);
    let exists = store.path().exists();
    let mut config = Configuration::with_store(store);
    config
        .options_mut()
        .set_path_separator(cli.separator)?
        .set_indent(cli.indent)?
        .set_copy_defaults(cli.copy_defaults);

    if exists {
        config
            .load()
            .with_context(|| format!("failed to load {}", cli.file.display()))?;
    } else {
        debug!(file = %cli.file.display(), "configuration file does not exist yet");
    }

    if let Some(path) = &cli.defaults {
        let mut defaults = Configuration::with_store(FileStore::new(path));
        defaults.options_mut().set_path_separator(cli.separator)?;
        defaults
            .load()
            .with_context(|| format!("failed to load defaults from {}", path.display()))?;
        config.set_defaults(defaults);
    }

    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cfgtree=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = open_configuration(&cli)?;
    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Get { path } => commands::get(&config, path, &mut out),
        Command::Set { path, value } => commands::set(&mut config, path, value),
        Command::Unset { path } => commands::unset(&mut config, path),
        Command::Keys { deep } => commands::keys(&config, *deep, &mut out),
        Command::Dump => commands::dump(&config, &mut out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_options_before_file() {
        let cli = Cli::try_parse_from([
            "cfgtree",
            "--separator",
            "/",
            "--indent",
            "4",
            "app.yml",
            "keys",
            "--deep",
        ])
        .unwrap();
        assert_eq!(cli.separator, '/');
        assert_eq!(cli.indent, 4);
        assert_eq!(cli.file, PathBuf::from("app.yml"));
        assert!(matches!(cli.command, Command::Keys { deep: true }));
    }

    #[test]
    fn test_open_configuration_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.yml");
        let defaults = dir.path().join("defaults.yml");
        std::fs::write(&file, "name: app\n").unwrap();
        std::fs::write(&defaults, "name: base\nport: 80\n").unwrap();

        let cli = Cli::try_parse_from([
            "cfgtree".into(),
            "--defaults".into(),
            defaults.into_os_string(),
            "--copy-defaults".into(),
            file.into_os_string(),
            "dump".into(),
        ])
        .unwrap();
        let config = open_configuration(&cli).unwrap();

        assert_eq!(config.get_string("name").as_deref(), Some("app"));
        assert_eq!(config.get_i64("port"), Some(80));
        let keys: Vec<_> = config.keys(false).into_iter().collect();
        assert_eq!(keys, vec!["name", "port"]);
    }

    #[test]
    fn test_open_configuration_rejects_bad_indent() {
        let cli = Cli::try_parse_from(["cfgtree", "--indent", "12", "app.yml", "dump"]).unwrap();
        assert!(open_configuration(&cli).is_err());
    }
}
