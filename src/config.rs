//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::age_group::AgeGroup;
use crate::source::DEFAULT_CSV_URL;

/// Mean hypertension risk by sex and age group
///
/// Fetches the survey CSV, buckets every record into an age group and
/// writes the raw, silver and gold tables plus a chart description.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV source: http(s) URL, file:// URI or local path
    #[arg(short, long, value_name = "URI", env = "CSV_URL", default_value = DEFAULT_CSV_URL)]
    pub source: String,

    /// Directory receiving the raw/, silver/ and gold/ outputs
    #[arg(short, long, value_name = "DIR", default_value = "data/output")]
    pub output_dir: PathBuf,

    /// Age groups to include (comma-separated, default all)
    ///
    /// Example: --groups children,older-adults
    #[arg(short, long, value_name = "GROUPS", value_delimiter = ',')]
    pub groups: Vec<AgeGroup>,

    /// Print the gold table without writing any files
    #[arg(long)]
    pub no_write: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: String,
    pub output_dir: Option<PathBuf>,
    pub groups: Vec<AgeGroup>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut groups = args.groups;
        groups.sort();
        groups.dedup();

        Config {
            source: args.source,
            output_dir: (!args.no_write).then_some(args.output_dir),
            groups,
        }
    }
}
