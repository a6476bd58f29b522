use clap::Parser;
use log::info;
use skyspotter::cli::Cli;
use skyspotter::config::ApplicationConfig;
use skyspotter::feed::FeedClient;
use skyspotter::logging::setup_logging;
use skyspotter::notifier::TelegramNotifier;
use skyspotter::scheduler::Scheduler;
use skyspotter::watcher::Watcher;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.logging_level);

    let application_config = match &cli.config_file {
        Some(path) => ApplicationConfig::construct_from_path(path).unwrap_or_else(|e| {
            log::error!("{e}");
            panic!("Config error. Exiting.")
        }),
        None => ApplicationConfig::default(),
    };

    info!("Main: Application started.");
    info!(
        "Main: Watching {0} for aircraft within {1} km of ({2}, {3}) below {4} ft.",
        application_config.receiver.url,
        application_config.watch.max_distance_km,
        application_config.watch.home_latitude,
        application_config.watch.home_longitude,
        application_config.watch.max_altitude_ft,
    );

    let source = FeedClient::new(&application_config.receiver);
    let notifier = TelegramNotifier::new(&application_config.telegram);
    let watcher = Watcher::new(&application_config.watch, source, notifier);

    let mut scheduler = Scheduler::new();
    let watcher_task_id = scheduler.spawn(
        watcher,
        std::time::Duration::from_secs(application_config.receiver.poll_interval_seconds),
    );

    if let Some(duration) = cli.duration {
        std::thread::sleep(std::time::Duration::from_secs(duration));
        scheduler.stop_all_tasks();
    }

    scheduler.wait_on_task_finish(watcher_task_id);

    info!("Main: Program finished.");
}
