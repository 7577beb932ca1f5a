//! CLI argument definitions using clap
//!
//! Commands:
//! - access-map query [--area NAME | --area-id N] [--timeout SECS] [--resolve]
//! - access-map fetch [--area NAME | --area-id N] [--query-file PATH] [-o PATH|-]
//! - access-map check <FILE>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Export wheelchair accessibility data from OpenStreetMap via the Overpass API
#[derive(Parser, Debug)]
#[command(name = "access-map")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to settings.json in the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the Overpass QL query without submitting it
    Query {
        #[command(flatten)]
        target: QueryTarget,

        /// Expand the geocodeArea shortcut through Nominatim
        #[arg(long)]
        resolve: bool,
    },

    /// Submit the query and save the CSV it returns
    Fetch {
        #[command(flatten)]
        target: QueryTarget,

        /// Overpass interpreter URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Submit this query file instead of the built-in accessibility query
        #[arg(long, conflicts_with_all = ["area", "area_id", "timeout"])]
        query_file: Option<PathBuf>,

        /// Output file, or - for stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a saved CSV export and print a summary
    Check {
        /// CSV file to check
        file: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryTarget {
    /// Area name to geocode
    #[arg(long, conflicts_with = "area_id")]
    pub area: Option<String>,

    /// Overpass area id (skips geocoding)
    #[arg(long)]
    pub area_id: Option<u64>,

    /// Server-side timeout in seconds
    #[arg(long)]
    pub timeout: Option<u32>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
