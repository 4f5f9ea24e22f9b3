use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use hris_app::audit::verify::{verify_audit_trail_file, ChainStatus};

fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("verify-audit-trail")
        .version("1.0.0")
        .about("Verify the checksum chain of an HRIS audit trail export")
        .arg(
            Arg::new("log-path")
                .short('l')
                .long("log-path")
                .value_name("PATH")
                .help("Path to the JSONL audit trail export (newest entry first)")
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress output except errors"),
        )
        .get_matches();

    let log_path = matches.get_one::<String>("log-path").expect("required arg");
    let verbose = matches.get_flag("verbose");
    let quiet = matches.get_flag("quiet");

    // Set log level based on flags
    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let report = verify_audit_trail_file(log_path)?;

    if !quiet {
        println!("{}", report.summary());
        println!(
            "Entries: {} | Links checked: {} | Links skipped: {}",
            report.entry_count, report.checked_links, report.skipped_links
        );
        if let Some(index) = report.break_at {
            println!("First break at entry index: {}", index);
        }
    }

    if report.status == ChainStatus::Broken {
        std::process::exit(1);
    }

    Ok(())
}
