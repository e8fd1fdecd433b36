// FinderClip: true cut and paste for Finder
//
// A session-wide keyboard event tap turns ⌘X into "copy and mark for move" and the following
// ⌘V into "move here" while Finder is frontmost.

pub mod cli;
pub mod cut_mode;
pub mod events;
pub mod keyboard;
pub mod keyboard_capture;
pub mod logging;
#[cfg(target_os = "macos")]
pub mod main_loop;
pub mod manager;
pub mod notifications;
pub mod settings;
pub mod shutdown;
pub mod window_context;

#[cfg(test)]
mod test_support;

use clap::Parser;
use cli::{Cli, Command};
use keyboard_capture::{MacAccessibility, PermissionProvider};
use settings::SettingsStore;
use std::process::ExitCode;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

/// How often the running service re-reads the settings file for CLI changes
pub const SETTINGS_RELOAD_INTERVAL: std::time::Duration = std::time::Duration::from_secs(2);

/// Application entry point: parses the command line and dispatches.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let store = match cli.settings.clone() {
        Some(path) => SettingsStore::new(path),
        None => match SettingsStore::with_default_path() {
            Ok(store) => store,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            if let Err(e) = logging::init() {
                eprintln!("Failed to initialize logging: {}", e);
            }
            if let Err(e) = store.load() {
                warn!("Failed to load settings, using defaults: {}", e);
            }
            run_service(store)
        }
        Command::Status => {
            if let Err(e) = store.load() {
                eprintln!("Warning: {}", e);
            }
            println!("{}", cli::status_report(&store, &MacAccessibility));
            ExitCode::SUCCESS
        }
        Command::OpenAccessibilitySettings => {
            if MacAccessibility.is_granted() {
                println!("Accessibility permission is already granted");
            } else {
                MacAccessibility.prompt();
            }
            match MacAccessibility.open_settings() {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Config { action } => {
            // Refuse to overwrite a file we could not read
            if let Err(e) = store.load() {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
            match cli::apply_config(&store, &action) {
                Ok(output) => {
                    println!("{}", output);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Run the interception service until SIGINT.
///
/// The main thread runs the AppKit run loop, which keeps NSWorkspace's frontmost application
/// current and delivers activation notifications. Background re-checks and the settings reload
/// run on the tokio runtime.
#[cfg(target_os = "macos")]
fn run_service(store: SettingsStore) -> ExitCode {
    use cut_mode::KeyInterceptor;
    use events::LogStatusEmitter;
    use keyboard::CgEventSynthesizer;
    use keyboard_capture::{CgEventTapBackend, EventTapSession, PermissionGate};
    use manager::{CutPasteManager, RecheckSchedule, RecheckTrigger};
    use notifications::{CutEvent, NotificationDispatcher, OsascriptNotificationSink};
    use std::sync::Arc;
    use window_context::{ActivationObserver, MacFocusProbe};

    info!("Starting FinderClip...");
    main_loop::init_app();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .thread_name("finderclip-worker")
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = Arc::new(store);
    let config = store.shared_config();

    let dispatcher = match NotificationDispatcher::spawn(
        Arc::new(OsascriptNotificationSink::new()),
        config.clone(),
    ) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("Failed to start notification dispatcher: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let interceptor = Arc::new(KeyInterceptor::new(
        config,
        Arc::new(MacFocusProbe::new()),
        Arc::new(CgEventSynthesizer::new()),
        dispatcher.notifier(),
    ));

    let manager = CutPasteManager::new(
        EventTapSession::new(CgEventTapBackend::new(), interceptor),
        PermissionGate::new(Arc::new(MacAccessibility)),
        Arc::new(LogStatusEmitter),
        runtime.handle().clone(),
        RecheckSchedule::default(),
    );

    let permission_notifier = dispatcher.notifier();
    manager.gate().on_change(move |granted| {
        permission_notifier.report(CutEvent::PermissionChanged { granted });
    });

    let settings_manager = manager.clone();
    store.on_change(move |settings| settings_manager.set_enabled(settings.enabled));

    // The user may have just granted permission in System Settings
    let activation_manager = manager.clone();
    window_context::set_activation_handler(move || activation_manager.on_app_activated());
    let observer = match ActivationObserver::register() {
        Ok(observer) => Some(observer),
        Err(e) => {
            warn!("App activation re-checks unavailable: {}", e);
            None
        }
    };

    if let Err(e) = ctrlc::set_handler(|| {
        shutdown::signal_shutdown();
        shutdown::stop_event_tap();
        main_loop::stop();
    }) {
        warn!("Failed to set Ctrl+C handler: {}", e);
    }

    manager.set_enabled(store.settings().enabled);
    manager.recheck_permission(RecheckTrigger::Startup);

    let reload_task =
        settings::spawn_reload_task(runtime.handle(), store.clone(), SETTINGS_RELOAD_INTERVAL);

    main_loop::run_until_shutdown();

    info!("Shutting down FinderClip...");
    reload_task.abort();
    drop(observer);
    window_context::clear_activation_handler();
    manager.set_enabled(false);
    drop(manager);
    drop(store);
    drop(dispatcher);
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    ExitCode::SUCCESS
}

#[cfg(not(target_os = "macos"))]
fn run_service(_store: SettingsStore) -> ExitCode {
    error!("FinderClip intercepts Finder shortcuts and requires macOS");
    ExitCode::FAILURE
}
