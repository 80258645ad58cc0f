//! Clap derive structures for the `trasua` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace crates so `build.rs` can render man pages from it.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// trasua -- address lookup for the storefront checkout
#[derive(Debug, Parser)]
#[command(
    name = "trasua",
    version,
    about = "Search, parse, and geocode Vietnamese delivery addresses",
    long_about = "Command-line front end of the storefront address pipeline.\n\n\
        Lists provinces, districts and wards, runs the place autocomplete,\n\
        resolves a suggestion label into the administrative cascade, and\n\
        geocodes the assembled address.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Endpoint profile to use
    #[arg(long, short = 'p', env = "TRASUA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Division directory base URL (overrides profile)
    #[arg(long, env = "TRASUA_DIVISIONS_URL", global = true)]
    pub divisions_url: Option<String>,

    /// Places proxy base URL (overrides profile)
    #[arg(long, env = "TRASUA_PLACES_URL", global = true)]
    pub places_url: Option<String>,

    /// Keyword table used to read suggestion labels (overrides profile)
    #[arg(long, short = 'l', env = "TRASUA_LOCALE", global = true)]
    pub locale: Option<LocaleArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TRASUA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TRASUA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LocaleArg {
    /// tỉnh / quận / phường / đường
    #[value(alias = "vi")]
    Vietnamese,
    /// city / district / ward / street
    #[value(alias = "en")]
    English,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all provinces
    #[command(alias = "prov")]
    Provinces,

    /// List the districts of a province
    #[command(alias = "dist")]
    Districts {
        /// Province code (see `trasua provinces`)
        province: String,
    },

    /// List the wards of a district
    Wards {
        /// District code (see `trasua districts <PROVINCE>`)
        district: String,
    },

    /// Free-text place search
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Search, take one suggestion, and resolve it into province/district/ward
    #[command(alias = "r")]
    Resolve(ResolveArgs),

    /// Split a suggestion label into tier fragments (offline)
    Parse {
        /// Comma-separated label, e.g. "184 Lê Đại Hành, Phường 15, Quận 11, TP HCM"
        label: String,
    },

    /// Geocode an address assembled from unit codes and a street
    #[command(alias = "geo")]
    Geocode(GeocodeArgs),

    /// Interactive address picker
    Pick,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text typed into the address field
    pub query: String,

    /// Show at most this many suggestions
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Text typed into the address field
    pub query: String,

    /// Index of the suggestion to resolve (0 = first)
    #[arg(long, default_value = "0")]
    pub pick: usize,

    /// Also geocode the resolved address
    #[arg(long, short = 'g')]
    pub geocode: bool,
}

#[derive(Debug, Args)]
pub struct GeocodeArgs {
    /// Province code
    #[arg(long)]
    pub province: Option<String>,

    /// District code (requires --province)
    #[arg(long, requires = "province")]
    pub district: Option<String>,

    /// Ward code (requires --district)
    #[arg(long, requires = "district")]
    pub ward: Option<String>,

    /// Street and house number
    #[arg(long)]
    pub street: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file (guided unless --defaults)
    Init {
        /// Write the built-in profile without prompting
        #[arg(long)]
        defaults: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key, e.g. "places_url" or "search_debounce_ms"
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
