use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(version, about = "Martin: a terminal personal CRM backed by Google Contacts")]
pub struct Cli {
    /// Config file to use instead of `$MARTIN_HOME/config.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter (e.g. `debug` or `martin_core=trace`). `RUST_LOG` wins
    /// when set.
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}
