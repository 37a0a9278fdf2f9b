use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which admission service the client talks to
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ServiceKind {
    /// JOSAA preference generator (JEE counselling)
    Josaa,
    /// MHTCET college finder (Maharashtra CET counselling)
    Mhtcet,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Josaa => "josaa",
            Self::Mhtcet => "mhtcet",
        }
    }

    /// Human-readable title, used in the header line
    pub fn title(&self) -> &'static str {
        match self {
            Self::Josaa => "JOSAA Preference Generator",
            Self::Mhtcet => "MHTCET College Finder",
        }
    }

    /// Path of the search endpoint for this service
    pub fn search_path(&self) -> &'static str {
        match self {
            Self::Josaa => "/predict",
            Self::Mhtcet => "/search",
        }
    }
}

/// Command-line arguments for admitui
#[derive(Parser, Debug)]
#[command(version, about = "admitui")]
pub struct Args {
    /// Admission service to search (josaa, mhtcet)
    #[arg(value_enum)]
    pub service: ServiceKind,

    /// Base URL of the backend service
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Directory where exported files are saved
    #[arg(long = "download-dir")]
    pub download_dir: Option<PathBuf>,

    /// Enable debug mode (writes a log file to the config directory)
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Write the default configuration file and exit
    #[arg(long = "write-default-config", action)]
    pub write_default_config: bool,

    /// Overwrite an existing configuration file (with --write-default-config)
    #[arg(long = "force", action)]
    pub force: bool,

    /// Remove the saved session and exit
    #[arg(long = "clear-session", action)]
    pub clear_session: bool,
}
