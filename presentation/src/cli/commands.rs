//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for followed messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored `speaker: message` lines
    #[default]
    Text,
    /// One JSON object per message
    Json,
}

/// Generator backend selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Offline sentence builder
    Babble,
    /// OpenAI-compatible completions endpoint
    Openai,
}

/// CLI arguments for colloquy
#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(author, version, about = "Two chatbots talking to each other, forever")]
#[command(long_about = r#"
Colloquy runs an endless conversation between two agents and prints it as it
grows. Each tick the first agent asks about a topic, the second answers, the
second asks a follow-up, and the first answers. Only the most recent
messages are kept in memory; a reader that falls behind is told how many it
missed.

Configuration files are loaded from (in priority order):
1. COLLOQUY_<SECTION>__<KEY>               Environment overrides
2. --config <path>                         Explicit config file
3. ./colloquy.toml                         Project-level config
4. ~/.config/colloquy/config.toml          Global config

Example:
  colloquy
  colloquy --tick-interval 0 --ticks 5 --topic "deep sea creatures"
  colloquy --provider openai --base-url http://localhost:8080/v1 --model distilgpt2
"#)]
pub struct Cli {
    /// Number of messages kept in memory
    #[arg(long, value_name = "N")]
    pub capacity: Option<usize>,

    /// Seconds to pause between ticks
    #[arg(long, value_name = "SECS")]
    pub tick_interval: Option<u64>,

    /// Stop after this many ticks (runs until Ctrl-C when omitted)
    #[arg(long, value_name = "N")]
    pub ticks: Option<u64>,

    /// Topic for opening questions (can be specified multiple times)
    #[arg(long, value_name = "TEXT")]
    pub topic: Vec<String>,

    /// Agent name (specify exactly twice; asker first)
    #[arg(long, value_name = "NAME")]
    pub agent: Vec<String>,

    /// Text generator backend
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name sent to the completions endpoint
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of the completions endpoint
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Publish each tick's four messages together
    #[arg(long)]
    pub atomic_ticks: bool,

    /// Items each agent remembers (0 = unbounded)
    #[arg(long, value_name = "N")]
    pub memory_limit: Option<usize>,

    /// Append a JSONL transcript of every message to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Milliseconds between polls of the conversation
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub poll_interval: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not print the conversation or progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
