//! Workflow telemetry.
//!
//! Emitted through `tracing` at the verbosity the run options ask
//! for: `full` includes params and context, `minimal` only the action
//! and duration, `silent` nothing.

use jido_action::ExecError;
use jido_signal::TelemetryMode;
use jido_types::Payload;
use std::time::Duration;
use tracing::{debug, warn};

pub(crate) fn start(mode: TelemetryMode, action: &str, params: &Payload, context: &Payload) {
    match mode {
        TelemetryMode::Silent => {}
        TelemetryMode::Minimal => debug!("workflow '{}' started", action),
        TelemetryMode::Full => debug!(
            "workflow '{}' started (params: {:?}, context: {:?})",
            action, params, context
        ),
    }
}

pub(crate) fn complete(mode: TelemetryMode, action: &str, elapsed: Duration) {
    if mode != TelemetryMode::Silent {
        debug!("workflow '{}' completed in {:?}", action, elapsed);
    }
}

pub(crate) fn error(mode: TelemetryMode, action: &str, elapsed: Duration, error: &ExecError) {
    if mode != TelemetryMode::Silent {
        warn!("workflow '{}' failed after {:?}: {}", action, elapsed, error);
    }
}
