use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "artistgraph")]
#[command(about = "Query cached artist co-occurrence graphs")]
#[command(version)]
pub struct Args {
    /// Id of a cached graph (the 64 character hash printed by the server)
    pub graph_id: String,

    /// Directory holding graph records [default: ~/.artistgraph/graphs]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show search statistics
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Shortest chain of co-occurring artists between two artists
    Path { from: String, to: String },

    /// Artists ranked by total connection weight
    Popular {
        #[arg(short = 'n', long, default_value_t = 4)]
        top_n: usize,
    },

    /// Genres, connections and shared playlists of an artist
    Artist { name: String },

    /// Degree and betweenness centrality of an artist
    Influence { name: String },

    /// First and second degree connections of an artist
    Extended { name: String },

    /// Find artists by name
    Search {
        query: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}
