use clap::Parser;
use console::style;
use dupescan::adapters::{
    CsvReportAdapter, JsonReportAdapter, PipeReportAdapter, ProgressBarAdapter, StreamingHasher,
    WalkEnumerator,
};
use dupescan::cli::{Cli, OutputFormat};
use dupescan::ports::ReportPort;
use dupescan::services::ScanService;
use std::process;

fn main() {
    let args = Cli::parse();
    let log_level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = args.to_scan_config();
    let enumerator = WalkEnumerator::new();
    let hasher = StreamingHasher::new();
    let progress = ProgressBarAdapter::new().with_quiet(args.quiet);

    let mut report: Box<dyn ReportPort> = match args.output_format {
        OutputFormat::Text => {
            if let Some(ref path) = args.output_file {
                Box::new(PipeReportAdapter::with_file(path).unwrap_or_else(|e| {
                    eprintln!("Error creating output file: {}", e);
                    process::exit(1);
                }))
            } else {
                Box::new(PipeReportAdapter::with_stdout())
            }
        }
        OutputFormat::Csv => {
            if let Some(ref path) = args.output_file {
                Box::new(CsvReportAdapter::with_file(path).unwrap_or_else(|e| {
                    eprintln!("Error creating output file: {}", e);
                    process::exit(1);
                }))
            } else {
                Box::new(CsvReportAdapter::with_stdout())
            }
        }
        OutputFormat::Json => {
            if let Some(ref path) = args.output_file {
                Box::new(JsonReportAdapter::with_file(path).unwrap_or_else(|e| {
                    eprintln!("Error creating output file: {}", e);
                    process::exit(1);
                }))
            } else {
                Box::new(JsonReportAdapter::with_stdout())
            }
        }
    };

    let scanner = ScanService::new(enumerator, hasher, progress);
    match scanner.run(&config, report.as_mut()) {
        Ok(summary) => {
            if !args.quiet {
                eprintln!(
                    "{} {} files scanned, {} duplicates in {} groups",
                    style("Done:").green().bold(),
                    summary.files_scanned,
                    summary.duplicate_files,
                    summary.duplicate_groups
                );
                if summary.read_errors > 0 {
                    eprintln!(
                        "{} {} files could not be read",
                        style("Warning:").yellow().bold(),
                        summary.read_errors
                    );
                }
            }
        }
        Err(e) => {
            eprintln!("{} {}", style("Error during scan:").red().bold(), e);
            process::exit(1);
        }
    }
}
