use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::ScanError;
use crate::models::{ScanOutcome, ScannedPass};

/// What the UI should show in response to scanner activity
#[derive(Debug)]
pub enum SessionEvent {
    /// A boarding pass was read; the scan attempt is over
    Decoded(ScannedPass),
    /// The latest frame held no barcode; scanning continues
    NoBarcode,
    /// A frame could not be analysed; scanning continues unless the error
    /// is unrecoverable
    FrameError(ScanError),
    /// No boarding pass was found within the scanning window
    TimedOut,
}

/// One user-initiated scan attempt with a coarse timeout.
///
/// Time is passed in by the caller so the state machine does not read the
/// clock itself. Every attempt gets a new number; frames carry the number of
/// the attempt they were submitted to, and outcomes for any other attempt
/// are discarded.
#[derive(Debug, Clone)]
pub struct ScanSession {
    timeout: Duration,
    deadline: Option<Instant>,
    attempt: u64,
}

impl ScanSession {
    /// Idle session with the given scanning window
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
            attempt: 0,
        }
    }

    /// Scanning window length
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a scan attempt is in progress
    pub fn is_scanning(&self) -> bool {
        self.deadline.is_some()
    }

    /// Number of the current (or most recent) attempt
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// When the current attempt gives up
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Start an attempt. Returns `false` (and changes nothing) if one is
    /// already running.
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.attempt += 1;
        self.deadline = Some(now + self.timeout);
        info!(attempt = self.attempt, timeout_ms = self.timeout.as_millis() as u64, "scan started");
        true
    }

    /// Abandon the current attempt without an event
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            info!("scan cancelled");
        }
    }

    /// Time left in the current attempt, `None` when idle
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Emit [`SessionEvent::TimedOut`] once the window has passed
    pub fn poll_timeout(&mut self, now: Instant) -> Option<SessionEvent> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                info!("scan timed out, no boarding pass found");
                Some(SessionEvent::TimedOut)
            }
            _ => None,
        }
    }

    /// Turn a frame outcome into a UI event.
    ///
    /// Outcomes that arrive while idle, or that belong to an earlier attempt,
    /// are discarded. An outcome that arrives after the deadline ends the
    /// attempt as timed out.
    pub fn on_outcome(&mut self, attempt: u64, outcome: ScanOutcome, now: Instant) -> Option<SessionEvent> {
        if !self.is_scanning() {
            debug!(?outcome, "discarding outcome outside a scan");
            return None;
        }
        if attempt != self.attempt {
            debug!(attempt, current = self.attempt, ?outcome, "discarding outcome from an earlier attempt");
            return None;
        }
        if let Some(timed_out) = self.poll_timeout(now) {
            return Some(timed_out);
        }

        match outcome {
            ScanOutcome::Decoded(text) => {
                self.deadline = None;
                info!("boarding pass decoded");
                Some(SessionEvent::Decoded(ScannedPass::new(text)))
            }
            ScanOutcome::NotFound => Some(SessionEvent::NoBarcode),
            ScanOutcome::Error(e) => {
                if !e.is_recoverable() {
                    self.deadline = None;
                }
                Some(SessionEvent::FrameError(e))
            }
        }
    }
}
