use crate::domain::{HashAlgorithm, ScanConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HashAlgorithmChoice {
    #[value(help = "SHA-256, the default")]
    Sha256,
    #[value(help = "Fast cryptographic hash")]
    Blake3,
    #[value(help = "Slow legacy hash")]
    Sha1,
    #[value(help = "Slow legacy hash")]
    Md5,
}

impl From<HashAlgorithmChoice> for HashAlgorithm {
    fn from(choice: HashAlgorithmChoice) -> Self {
        match choice {
            HashAlgorithmChoice::Sha256 => HashAlgorithm::Sha256,
            HashAlgorithmChoice::Blake3 => HashAlgorithm::Blake3,
            HashAlgorithmChoice::Sha1 => HashAlgorithm::Sha1,
            HashAlgorithmChoice::Md5 => HashAlgorithm::Md5,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Parser)]
#[command(name = "dupescan")]
#[command(about = "Find duplicate files by content checksum")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Paths to scan for duplicates (defaults to the current directory)")]
    pub paths: Vec<PathBuf>,

    #[arg(
        short = 'n',
        long = "no-recurse",
        help = "Do not descend into subdirectories"
    )]
    pub no_recurse: bool,

    #[arg(
        short = 'f',
        long = "filter",
        help = "Only consider files matching this glob pattern"
    )]
    pub filter: Option<String>,

    #[arg(
        short = 's',
        long = "min-size",
        help = "Minimum file size in bytes to consider",
        default_value = "0"
    )]
    pub min_size: u64,

    #[arg(
        short = 'd',
        long = "max-depth",
        help = "Maximum directory depth to scan"
    )]
    pub max_depth: Option<usize>,

    #[arg(short = 'L', long = "follow-symlinks", help = "Follow symbolic links")]
    pub follow_symlinks: bool,

    #[arg(
        long = "partial-hash-size",
        help = "Number of leading bytes hashed by the cheap first pass",
        default_value = "4096"
    )]
    pub partial_hash_size: u64,

    #[arg(
        short = 'a',
        long = "algorithm",
        help = "Checksum algorithm to use",
        value_enum,
        default_value = "sha256"
    )]
    pub hash_algorithm: HashAlgorithmChoice,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress progress and summary output"
    )]
    pub quiet: bool,

    #[arg(
        short = 'F',
        long = "format",
        help = "Output format",
        value_enum,
        default_value = "text"
    )]
    pub output_format: OutputFormat,

    #[arg(
        short = 'o',
        long = "output",
        help = "Output file path (stdout if not specified)"
    )]
    pub output_file: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase log verbosity"
    )]
    pub verbose: u8,
}

impl Cli {
    pub fn to_scan_config(&self) -> ScanConfig {
        let paths = if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        };

        let mut config = ScanConfig::new()
            .with_paths(paths)
            .with_recursive(!self.no_recurse)
            .with_min_size(self.min_size)
            .with_partial_hash_size(self.partial_hash_size)
            .with_hash_algorithm(self.hash_algorithm.into());

        if let Some(filter) = &self.filter {
            config = config.with_filter(filter.clone());
        }
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth);
        }
        config.follow_symlinks = self.follow_symlinks;

        config
    }
}
