//! Murmur application binary - composition root.
//!
//! Wires the pipeline together:
//! 1. Load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the UI actor owning all mutable state
//! 4. Build the dispatcher and router over the configured collaborators
//! 5. Start the global hotkey listener thread (which owns the capture engine
//!    and its audio stream)
//! 6. Run the UI loop on the main thread
//!
//! Network and desktop collaborators are stubbed here; an embedding build
//! replaces [`stubs::StubCollaborators`] with real clients.

mod stubs;

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use murmur_audio::CaptureService;
use murmur_bridge::ui_actor;
use murmur_core::config::MurmurConfig;
use murmur_dispatch::{ActionDispatcher, AppState, Collaborators};
use murmur_hotkey::{listener, BindingTable, CaptureEngine, CaptureStateMachine, PipelineServices};
use murmur_router::IntentRouter;

use stubs::StubCollaborators;

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("murmur")
        .join("config.toml")
}

fn init_tracing(configured_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    let config_path = config_path();
    let config = MurmurConfig::load_or_default(&config_path);
    init_tracing(&config.general.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "Murmur starting"
    );

    let (ui_handle, mut ui_loop) = ui_actor(AppState::from_config(&config));

    let collaborators = Arc::new(StubCollaborators);
    let dispatcher = Arc::new(ActionDispatcher::new(
        Collaborators {
            completion: collaborators.clone(),
            speech: collaborators.clone(),
            screenshot: collaborators.clone(),
            typed: collaborators.clone(),
            presentation: collaborators.clone(),
        },
        ui_handle.clone(),
        config.assistant.system_prompt.clone(),
        config.speech.max_chars,
    ));
    let router = Arc::new(IntentRouter::new(collaborators.clone()));

    // The engine (and the audio stream it owns) lives on the listener
    // thread; only Send pieces cross into the closure.
    let listener_config = config.clone();
    murmur_bridge::spawn("hotkey-listener", move || {
        let table = match BindingTable::from_config(&listener_config.bindings) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(error = %e, "Invalid hotkey binding table; listener not started");
                return;
            }
        };
        let machine = CaptureStateMachine::new(table, listener_config.capture.toggle_mode);
        let audio = Box::new(CaptureService::new(
            listener_config.audio.sample_rate,
            listener_config.audio.preview_decimation,
        ));
        let engine = CaptureEngine::new(
            machine,
            audio,
            PipelineServices {
                stt: collaborators.clone(),
                selection: collaborators.clone(),
                router,
                dispatcher,
            },
            ui_handle,
            listener_config.audio.sample_rate,
            listener_config.capture.selection_settle_ms,
        );
        if let Err(e) = listener::run(engine) {
            tracing::error!(error = %e, "Hotkey listener exited");
        }
    });

    ui_loop.run();
}
