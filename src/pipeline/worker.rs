use std::io;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use super::mailbox::Mailbox;
use crate::decoder::LumaDecoder;
use crate::models::{FrameBuffer, ScanOutcome};
use crate::utils::yuv::{Conversion, yuv420_to_nv21};

/// Reformats and decodes frames one at a time
#[derive(Debug)]
pub struct FrameAnalyzer<D> {
    decoder: D,
}

impl<D: LumaDecoder> FrameAnalyzer<D> {
    /// Wrap a decoder
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// Analyse one frame. The frame is released as soon as its bytes have
    /// been copied, before decoding starts.
    pub fn analyze(&mut self, frame: FrameBuffer) -> ScanOutcome {
        let timestamp_ns = frame.timestamp_ns();
        let conversion = yuv420_to_nv21(&frame);
        frame.release();

        let image = match conversion {
            Conversion::Converted(image) => image,
            Conversion::Degraded { cause, .. } => return ScanOutcome::Error(cause),
        };

        match self.decoder.decode(image.luma(), image.width(), image.height()) {
            Ok(Some(text)) => {
                debug!(timestamp_ns, "frame decoded");
                ScanOutcome::Decoded(text)
            }
            Ok(None) => {
                debug!(timestamp_ns, "no symbol in frame");
                ScanOutcome::NotFound
            }
            Err(e) => ScanOutcome::Error(e),
        }
    }
}

/// Frame tagged with the scan attempt it was submitted to
pub(crate) type AttemptFrame = (u64, FrameBuffer);

/// Run `analyzer` on a dedicated thread until the mailbox closes or the
/// outcome receiver goes away. Outcomes keep the attempt number of their
/// frame.
pub(crate) fn spawn_worker<D>(
    name: &str,
    mailbox: Arc<Mailbox<AttemptFrame>>,
    mut analyzer: FrameAnalyzer<D>,
    outcomes: Sender<(u64, ScanOutcome)>,
) -> io::Result<JoinHandle<()>>
where
    D: LumaDecoder + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(move || {
        info!("frame analyzer started");
        while let Some((attempt, frame)) = mailbox.take() {
            let outcome = analyzer.analyze(frame);
            if outcomes.send((attempt, outcome)).is_err() {
                break;
            }
        }
        info!("frame analyzer stopped");
    })
}
