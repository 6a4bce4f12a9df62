use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::form::graph::ScanConfig;
use crate::selector::RandomnessHeuristic;
use crate::task::codegen::CodegenConfig;
use crate::watch::WatchConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "formscout",
    version,
    about = "Find form fields, build stable selectors and generate replay scripts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: formscout.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Where to read a page from. Exactly one of `file`/`url` is expected.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Saved HTML file
    #[arg(long)]
    pub file: Option<String>,

    /// Page URL to fetch
    #[arg(long)]
    pub url: Option<String>,

    /// Same-origin iframe content as INDEX=PATH (repeatable)
    #[arg(long = "frame", value_name = "INDEX=PATH")]
    pub frames: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a page into classified form groups (JSON)
    Scan {
        #[command(flatten)]
        page: PageArgs,

        /// JSON bounding boxes exported by a browser-side measurement pass
        #[arg(long)]
        layout: Option<String>,

        /// Leave out the bucket of elements outside any form
        #[arg(long)]
        hide_non_form: bool,

        /// Drop elements with an all-zero bounding box
        #[arg(long)]
        drop_hidden: bool,

        /// Print a `formElementsUpdated` message instead of bare groups
        #[arg(long)]
        message: bool,

        /// Also save the snapshot into this store file
        #[arg(long)]
        store: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Build a stable selector for the first element matching a CSS query
    Selector {
        #[command(flatten)]
        page: PageArgs,

        /// CSS query picking the target element
        #[arg(long)]
        target: String,

        /// CSS query of the scope element (default: document root)
        #[arg(long)]
        within: Option<String>,

        /// Look inside this iframe's document
        #[arg(long)]
        iframe: Option<usize>,

        /// Print as `document.querySelector(...)`
        #[arg(long)]
        copy: bool,
    },

    /// Classify the first element matching a CSS query
    Classify {
        #[command(flatten)]
        page: PageArgs,

        /// CSS query picking the target element
        #[arg(long)]
        target: String,

        /// Look inside this iframe's document
        #[arg(long)]
        iframe: Option<usize>,
    },

    /// Generate a replay script from a task config (JSON)
    Generate {
        /// Task config file
        #[arg(long)]
        task: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check that a stored selector still finds its element
    Locate {
        #[command(flatten)]
        page: PageArgs,

        /// Selector, plain or wrapped as document.querySelector(...)
        #[arg(long)]
        selector: String,

        /// Selector of the owning form
        #[arg(long)]
        parent: Option<String>,

        /// Iframe index the element lives in
        #[arg(long)]
        iframe: Option<usize>,

        /// Keep re-reading the page until found or this many ms pass
        #[arg(long, default_value_t = 0)]
        timeout_ms: u64,
    },

    /// Replay clicks/scrolls against a saved page and emit click records
    Record {
        /// Saved HTML file
        #[arg(long)]
        file: String,

        /// JSON list of interactions ({"type":"click","selector":...} / {"type":"scroll",...})
        #[arg(long)]
        events: String,

        /// Page URL stored with each record
        #[arg(long, default_value = "about:blank")]
        page_url: String,

        /// Also append the records to this store file
        #[arg(long)]
        store: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Re-scan a saved page whenever it changes
    Watch {
        /// Saved HTML file
        #[arg(long)]
        file: String,

        /// JSONL parse-pass trace log
        #[arg(long, default_value = "formscout_trace.jsonl")]
        trace: String,

        /// Save each changed snapshot into this store file
        #[arg(long)]
        store: Option<String>,

        /// Stop after this many parse passes
        #[arg(long)]
        max_passes: Option<u64>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `formscout.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub heuristics: RandomnessHeuristic,
    #[serde(default)]
    pub codegen: CodegenConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("formscout.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config; using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}
