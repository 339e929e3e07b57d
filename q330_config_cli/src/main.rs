use clap::{value_parser, Arg, ArgAction, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread::JoinHandle;

use libq330_config::config::Config;
use libq330_config::error::ProcessorError;
use libq330_config::inventory::Inventory;
use libq330_config::process::{create_subsets, process_subset, BatchReport};
use libq330_config::worker_status::WorkerStatus;

const LOG_FILE: &str = "q330_config.log";

fn make_template_config(path: &Path) -> ExitCode {
    log::info!("Making a template config at {}...", path.to_string_lossy());
    match Config::default().write_config_file(path) {
        Ok(()) => {
            log::info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Could not create template config file: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(pb_manager: &MultiProgress) -> Result<(), String> {
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];
    match File::create(LOG_FILE) {
        Ok(file) => loggers.push(simplelog::WriteLogger::new(
            simplelog::LevelFilter::Info,
            simplelog::Config::default(),
            file,
        )),
        Err(e) => eprintln!("Could not create log file {LOG_FILE}: {e}"),
    }

    LogWrapper::new(pb_manager.clone(), simplelog::CombinedLogger::new(loggers))
        .try_init()
        .map_err(|e| e.to_string())?;
    log::set_max_level(simplelog::LevelFilter::Info);
    Ok(())
}

fn main() -> ExitCode {
    // Create a cli
    let matches = Command::new("q330_config_cli")
        .about("Generate Q330 supplemental configurations for a station inventory")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("makechans")
                .long("makechans")
                .action(ArgAction::SetTrue)
                .help("Also synchronize the channel table of each unit"),
        )
        .get_matches();

    // Initialize feedback
    let pb_manager = MultiProgress::new();
    if let Err(e) = init_logging(&pb_manager) {
        eprintln!("Could not create logging/progress: {e}");
        return ExitCode::FAILURE;
    }

    // Parse the cli
    let Some(config_path) = matches.get_one::<PathBuf>("path") else {
        log::error!("A configuration path is required (-p/--path)");
        return ExitCode::FAILURE;
    };

    if let Some(("new", _)) = matches.subcommand() {
        return make_template_config(config_path);
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let mut config = match Config::read_config_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if matches.get_flag("makechans") {
        config.make_chans = true;
    }
    if !config.is_n_threads_valid() {
        log::error!("n_threads must be at least 1, found {}", config.n_threads);
        return ExitCode::FAILURE;
    }
    log::info!("Config successfully loaded.");
    log::info!("Inventory Path: {}", config.inventory_path.to_string_lossy());
    log::info!("Output Path: {}", config.output_path.to_string_lossy());
    match &config.history_path {
        Some(path) => log::info!("History Path: {}", path.to_string_lossy()),
        None => log::info!("History Path: None (no history will be kept)"),
    }
    log::info!("Make Channel Tables: {}", config.make_chans);

    let inventory = match Inventory::read_inventory_file(&config.inventory_path) {
        Ok(inv) => inv,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Loaded {} stations.", inventory.len());

    // Spawn the workers!
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    let mut workers: Vec<(
        usize,
        ProgressBar,
        JoinHandle<Result<BatchReport, ProcessorError>>,
    )> = Vec::new();
    let style = ProgressStyle::with_template("[worker {prefix}] {bar:40.cyan/blue} {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    for (idx, subset) in create_subsets(inventory.len(), config.n_threads as usize)
        .into_iter()
        .enumerate()
    {
        // Dont make empty workers
        if subset.is_empty() {
            continue;
        }
        let stations: Vec<_> = subset
            .iter()
            .map(|station| inventory.stations[*station].clone())
            .collect();
        let conf = config.clone();
        let worker_tx = tx.clone();
        let pb = pb_manager.add(ProgressBar::new(100));
        pb.set_style(style.clone());
        pb.set_prefix(idx.to_string());
        workers.push((
            idx,
            pb,
            std::thread::spawn(move || process_subset(conf, stations, worker_tx, idx)),
        ));
    }
    drop(tx);

    // Update the bars until every worker has hung up
    for status in rx.iter() {
        if let Some((_, pb, _)) = workers.iter().find(|(id, _, _)| *id == status.worker_id) {
            pb.set_position((status.progress * 100.0) as u64);
            pb.set_message(status.station);
        }
    }

    let mut total = BatchReport::default();
    let mut exit_code = ExitCode::SUCCESS;
    for (_, pb, handle) in workers {
        pb.finish();
        match handle.join() {
            Ok(Ok(report)) => total += report,
            Ok(Err(e)) => {
                log::error!("Worker failed with error: {e}");
                exit_code = ExitCode::FAILURE;
            }
            Err(_) => {
                log::error!("Failed to join worker thread!");
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    log::info!(
        "Wrote {} new configurations, {} unchanged, {} stations skipped.",
        total.written,
        total.unchanged,
        total.failed
    );
    if total.failed > 0 {
        log::warn!("Some stations were skipped. Check the log file {LOG_FILE} for details.");
    }
    log::info!("Done.");
    exit_code
}
