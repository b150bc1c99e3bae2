//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tamperguard::CheckPreset;

use crate::output::OutputFormat;

/// Binary integrity checks
///
/// Hashes the running executable, loaded modules and the provisioning
/// artifact, and compares them with trusted reference values.
#[derive(Parser, Debug)]
#[command(name = "tamperguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(short, long, env = "TAMPERGUARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Reference URL template containing {key}
    #[arg(long, env = "TAMPERGUARD_URL_TEMPLATE", global = true)]
    pub url_template: Option<String>,

    /// Application identity reported for the bundle
    #[arg(long, env = "TAMPERGUARD_BUNDLE_ID", global = true)]
    pub bundle_id: Option<String>,

    /// Use static reference values from the config instead of fetching
    #[arg(long, global = true)]
    pub offline: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run integrity checks and report a verdict
    Check(CheckArgs),

    /// Load and show reference values
    References(ReferencesArgs),

    /// Show the application identity
    BundleId,

    /// Hash the provisioning artifact
    ProvisionHash(ProvisionHashArgs),

    /// Hash the main executable or a loaded module
    ImageHash(ImageHashArgs),

    /// Hash any file
    HashFile(HashFileArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Check command
// ============================================================================

/// Check sets selectable on the command line
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PresetArg {
    /// Bundle identity, provisioning artifact and module image
    #[default]
    Tamper,
    /// Module image and main executable
    App,
    /// All four checks
    All,
}

impl From<PresetArg> for CheckPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Tamper => Self::Tamper,
            PresetArg::App => Self::App,
            PresetArg::All => Self::All,
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Which checks to run
    #[arg(short, long, value_enum, default_value_t)]
    pub preset: PresetArg,

    /// Module to hash for the image check (default from config)
    #[arg(short, long)]
    pub module: Option<String>,
}

// ============================================================================
// References command
// ============================================================================

#[derive(Args, Debug)]
pub struct ReferencesArgs {
    /// Module whose image hash reference to load (default from config)
    #[arg(short, long)]
    pub module: Option<String>,
}

// ============================================================================
// Hash commands
// ============================================================================

#[derive(Args, Debug)]
pub struct ProvisionHashArgs {
    /// Provisioning artifact (default: from the bundle)
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImageHashArgs {
    /// Loaded module to hash (default: the main executable)
    #[arg(short, long)]
    pub module: Option<String>,
}

#[derive(Args, Debug)]
pub struct HashFileArgs {
    /// File to hash
    pub path: PathBuf,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., url_template, bundle.identifier)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}
