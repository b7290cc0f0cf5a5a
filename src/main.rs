mod error;
mod prober;
mod scanner;
mod stats;
mod types;
mod xlsx_renderer;

use chrono::Local;
use clap::Parser;
use colored::Colorize;
use error::AuditError;
use prober::FfprobeProbe;
use std::path::PathBuf;

const REPORT_FILE_NAME: &str = "video_report.xlsx";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Root folder to scan for videos
    root: PathBuf,

    /// Minimum subfolder level to include (0 for root, 1 for subfolders, etc.)
    #[arg(long, short = 'l', default_value_t = 0)]
    level: usize,

    /// Folders to exclude, separated by commas
    #[arg(long, short = 'e', value_delimiter = ',')]
    exclude: Vec<String>,

    /// Write the Excel report to <ROOT>/video_report.xlsx
    #[arg(long, short = 'r')]
    report: bool,

    /// Write the Excel report to this path instead (implies --report)
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// ffprobe executable used to read video durations
    #[arg(long, default_value = "ffprobe", value_name = "PROGRAM")]
    ffprobe: PathBuf,
}

impl Args {
    fn report_path(&self) -> Option<PathBuf> {
        match &self.output {
            Some(path) => Some(path.clone()),
            None if self.report => Some(self.root.join(REPORT_FILE_NAME)),
            None => None,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{} {e}", "Error:".red());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AuditError> {
    println!(
        "{}",
        format!(
            "=== Video Report: {} ({}) ===",
            args.root.display(),
            Local::now().format("%Y-%m-%d %H:%M")
        )
        .cyan()
    );

    let probe = FfprobeProbe::new(&args.ffprobe);
    let records = scanner::collect_records(&args.root, &args.exclude, args.level, &probe)?;
    let report = stats::build_report(records);

    println!("\n{}", "Results Report:".cyan());
    stats::print_report_table(&report);
    stats::print_summary(&report.global);

    if let Some(path) = args.report_path() {
        xlsx_renderer::render(&report, &path)?;
        println!("{}", format!("Report saved to: {}", path.display()).green());
    }

    Ok(())
}
