use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::JoinHandle;
use std::time::Instant;

use tracing::{trace, warn};

use super::mailbox::Mailbox;
use super::session::{ScanSession, SessionEvent};
use super::worker::{AttemptFrame, FrameAnalyzer, spawn_worker};
use crate::config::ScanConfig;
use crate::decoder::{LumaDecoder, Pdf417Decoder};
use crate::error::{Result, ScanError};
use crate::models::{FrameBuffer, ScanOutcome};

/// Handle the camera callback uses to hand frames to the scanner.
///
/// Cheap to clone and usable from any thread. Frames submitted while no
/// scan is running are released straight away; accepted frames are tagged
/// with the current attempt.
#[derive(Debug, Clone)]
pub struct FrameSink {
    mailbox: Arc<Mailbox<AttemptFrame>>,
    active: Arc<AtomicBool>,
    attempt: Arc<AtomicU64>,
}

impl FrameSink {
    /// Offer a frame for analysis. Returns `true` if it was queued.
    ///
    /// A frame still waiting from an earlier call is replaced and released.
    pub fn submit(&self, frame: FrameBuffer) -> bool {
        if !self.active.load(Ordering::Acquire) {
            return false;
        }
        let attempt = self.attempt.load(Ordering::Acquire);
        match self.mailbox.post((attempt, frame)) {
            Ok(Some(_displaced)) => {
                trace!("replaced a frame the analyzer had not reached");
                true
            }
            Ok(None) => true,
            Err(_rejected) => false,
        }
    }

    /// Frames replaced before the analyzer could take them
    pub fn dropped_frames(&self) -> u64 {
        self.mailbox.dropped()
    }
}

/// Boarding-pass scanner: a keep-latest frame mailbox, one analysis worker
/// and the scan session that turns frame outcomes into UI events.
pub struct Scanner {
    sink: FrameSink,
    outcomes: Receiver<(u64, ScanOutcome)>,
    session: ScanSession,
    worker: Option<JoinHandle<()>>,
}

impl Scanner {
    /// Scanner decoding PDF417 with rxing
    pub fn new(config: ScanConfig) -> Result<Self> {
        Self::with_decoder(config, Pdf417Decoder::new())
    }

    /// Scanner using a custom decoder
    pub fn with_decoder<D>(config: ScanConfig, decoder: D) -> Result<Self>
    where
        D: LumaDecoder + 'static,
    {
        let mailbox = Arc::new(Mailbox::new());
        let (tx, rx) = mpsc::channel();
        let worker = spawn_worker(
            &config.worker_name,
            Arc::clone(&mailbox),
            FrameAnalyzer::new(decoder),
            tx,
        )?;

        Ok(Self {
            sink: FrameSink {
                mailbox,
                active: Arc::new(AtomicBool::new(false)),
                attempt: Arc::new(AtomicU64::new(0)),
            },
            outcomes: rx,
            session: ScanSession::new(config.timeout),
            worker: Some(worker),
        })
    }

    /// Handle for the camera thread
    pub fn frame_sink(&self) -> FrameSink {
        self.sink.clone()
    }

    /// Offer a frame from the current thread; see [`FrameSink::submit`]
    pub fn submit_frame(&self, frame: FrameBuffer) -> bool {
        self.sink.submit(frame)
    }

    /// Frames replaced before the analyzer could take them
    pub fn dropped_frames(&self) -> u64 {
        self.sink.dropped_frames()
    }

    /// Whether a scan attempt is in progress
    pub fn is_scanning(&self) -> bool {
        self.session.is_scanning()
    }

    /// Start a scan attempt. Returns `false` if one is already running.
    ///
    /// Outcomes left over from earlier attempts, including frames still
    /// being decoded, never reach this one.
    pub fn begin_scan(&mut self) -> bool {
        if self.session.is_scanning() {
            return false;
        }
        while self.outcomes.try_recv().is_ok() {}
        self.session.begin(Instant::now());
        self.sink.attempt.store(self.session.attempt(), Ordering::Release);
        self.set_active(true);
        true
    }

    /// Abandon the current attempt without an event
    pub fn cancel_scan(&mut self) {
        self.session.cancel();
        self.set_active(false);
        drop(self.sink.mailbox.clear());
    }

    /// Wait for the next event of the current attempt.
    ///
    /// Blocks at most until the scanning window ends. Returns `None` when no
    /// attempt is running.
    pub fn next_event(&mut self) -> Option<SessionEvent> {
        loop {
            if let Some(event) = self.session.poll_timeout(Instant::now()) {
                return Some(self.finish(event));
            }
            let remaining = self.session.remaining(Instant::now())?;
            match self.outcomes.recv_timeout(remaining) {
                Ok((attempt, outcome)) => {
                    if let Some(event) = self.session.on_outcome(attempt, outcome, Instant::now()) {
                        return Some(self.finish(event));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Some(self.disconnected()),
            }
        }
    }

    /// Like [`next_event`](Self::next_event) but never blocks
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        if let Some(event) = self.session.poll_timeout(Instant::now()) {
            return Some(self.finish(event));
        }
        loop {
            if !self.session.is_scanning() {
                return None;
            }
            match self.outcomes.try_recv() {
                Ok((attempt, outcome)) => {
                    if let Some(event) = self.session.on_outcome(attempt, outcome, Instant::now()) {
                        return Some(self.finish(event));
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return Some(self.disconnected()),
            }
        }
    }

    /// Stop the worker and wait for it to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn finish(&mut self, event: SessionEvent) -> SessionEvent {
        if !self.session.is_scanning() {
            self.set_active(false);
            // Nothing left to analyse for this attempt
            drop(self.sink.mailbox.clear());
        }
        event
    }

    fn disconnected(&mut self) -> SessionEvent {
        warn!("frame analyzer exited unexpectedly");
        self.session.cancel();
        self.set_active(false);
        SessionEvent::FrameError(ScanError::Disconnected)
    }

    fn set_active(&self, active: bool) {
        self.sink.active.store(active, Ordering::Release);
    }

    fn stop(&mut self) {
        self.set_active(false);
        self.sink.mailbox.close();
        drop(self.sink.mailbox.clear());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("frame analyzer panicked");
            }
        }
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("session", &self.session)
            .field("mailbox", &self.sink.mailbox)
            .finish_non_exhaustive()
    }
}
