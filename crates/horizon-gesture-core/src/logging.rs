//! Logging facilities for Horizon Gesture.
//!
//! Horizon Gesture uses the `tracing` crate for instrumentation. The
//! libraries never install a subscriber; to see logs, install one in your
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_gesture=debug")
//!     .init();
//! ```
//!
//! State transitions are logged at `debug`, per-event dispatch at `trace`.

/// Span names used throughout Horizon Gesture for tracing.
pub mod span_names {
    /// Dispatch of one pointer event through an orchestrator.
    pub const DISPATCH: &str = "horizon_gesture::dispatch";
    /// Hit testing on pointer down.
    pub const HIT_TEST: &str = "horizon_gesture::hit_test";
    /// Deadline processing.
    pub const TICK: &str = "horizon_gesture::tick";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Handler state machine target.
    pub const HANDLER: &str = "horizon_gesture::handler";
    /// Orchestrator target.
    pub const ORCHESTRATOR: &str = "horizon_gesture::orchestrator";
    /// Interaction controller target.
    pub const INTERACTION: &str = "horizon_gesture::interaction";
    /// Registry and module facade target.
    pub const MODULE: &str = "horizon_gesture::module";
    /// Listener output target.
    pub const EVENTS: &str = "horizon_gesture::events";
}
