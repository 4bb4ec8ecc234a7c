use clap::{Parser, ValueEnum};
use razor::{frame_channel, CsvPrinter, RazorConfig, RazorReader};
use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Critical | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

/// Interface for razor sensors: prints decoded frames as CSV.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Serial port used
    #[arg(short, long, default_value = razor::config::DEFAULT_PORT)]
    port: String,

    /// ID of sensor, in case of multiple units
    #[arg(short, long, default_value = razor::config::DEFAULT_SENSOR_NAME)]
    name: String,

    /// Log file to be used
    #[arg(long, default_value = "razor.log")]
    log: String,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Device baud rate
    #[arg(short, long, default_value_t = razor::config::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Seconds to read before shutting down; 0 reads until the device stops
    #[arg(short, long, default_value_t = 10)]
    duration: u64,
}

fn init_logging(args: &Args) -> io::Result<()> {
    let level = LevelFilter::from(args.log_level);
    let file = File::create(&args.log)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_thread_names(true)
                .with_filter(level),
        )
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_filter(level),
        )
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Failed to create log file {}: {}", args.log, e);
        return ExitCode::FAILURE;
    }

    let config = RazorConfig::new(&args.port, args.baud).with_sensor_name(&args.name);
    let (sink, queue) = frame_channel();

    let mut reader = match RazorReader::open(&config, sink) {
        Ok(reader) => reader,
        Err(e) => {
            error!("{}", e);
            println!("Not able to begin device properly... check logfile");
            return ExitCode::FAILURE;
        }
    };

    let stop_printer = Arc::new(AtomicBool::new(false));
    let printer_flag = Arc::clone(&stop_printer);
    let printer = thread::Builder::new()
        .name("printData".to_string())
        .spawn(move || -> Result<u64, csv::Error> {
            let mut printer = CsvPrinter::new(io::stdout())?;
            printer.drain(&queue, &printer_flag)
        });

    if args.duration > 0 {
        thread::sleep(Duration::from_secs(args.duration));
    } else {
        while reader.is_running() {
            thread::sleep(Duration::from_millis(100));
        }
    }

    let mut status = ExitCode::SUCCESS;
    if let Err(e) = reader.stop() {
        error!("Decoder stopped with error: {}", e);
        status = ExitCode::FAILURE;
    }

    stop_printer.store(true, Ordering::Relaxed);
    match printer.map(|handle| handle.join()) {
        Ok(Ok(Ok(rows))) => info!("Printed {} frames", rows),
        Ok(Ok(Err(e))) => error!("Printer failed: {}", e),
        Ok(Err(_)) => error!("Printer thread panicked"),
        Err(e) => error!("Failed to start printer thread: {}", e),
    }

    println!("Exiting now");
    status
}
