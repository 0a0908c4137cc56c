//! Frame analysis pipeline
//!
//! ```text
//! camera thread ──submit──▶ Mailbox (latest frame only)
//!                              │
//!                  frame-analyzer thread: reformat ▶ decode ▶ release
//!                              │ ScanOutcome (mpsc)
//!                              ▼
//!                     ScanSession ──▶ SessionEvent for the UI
//! ```

/// Keep-latest single-slot handoff
pub mod mailbox;
/// Scanner façade and camera-side frame sink
pub mod scanner;
/// Scan attempt state and timeout
pub mod session;
/// Frame analysis thread
pub mod worker;

pub use mailbox::Mailbox;
pub use scanner::{FrameSink, Scanner};
pub use session::{ScanSession, SessionEvent};
pub use worker::FrameAnalyzer;
