use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "logsift", about = "Log clustering and AI-assisted summarization")]
pub struct Cli {
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full pipeline: discover logs, embed, cluster, summarize.
    Analyze {
        logs: String,
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        eps: Option<f32>,
        #[arg(long)]
        min_samples: Option<usize>,
        #[arg(long, default_value_t = false)]
        disable_ai: bool,
        #[arg(long, default_value_t = false)]
        debug: bool,
    },
    /// Embed and cluster one log file, exporting the cluster interchange.
    Cluster {
        input: String,
        #[arg(long, default_value = "clustered_logs.json")]
        output: String,
        #[arg(long)]
        eps: Option<f32>,
        #[arg(long)]
        min_samples: Option<usize>,
    },
    /// Summarize a previously exported cluster file.
    Summarize {
        clusters: String,
        #[arg(long)]
        output: Option<String>,
        #[arg(long, default_value_t = false)]
        disable_ai: bool,
        #[arg(long, default_value_t = false)]
        debug: bool,
    },
    /// Search logs for a term and report pattern heuristics, no AI involved.
    Scan {
        logs: String,
        #[arg(long, default_value = "error")]
        term: String,
        #[arg(long)]
        output: Option<String>,
    },
}
