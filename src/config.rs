use std::sync::OnceLock;
use std::time::Duration;

/// Default scanning window before "no boarding pass could be found"
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

static SCAN_TIMEOUT_MS: OnceLock<u64> = OnceLock::new();

pub(crate) fn scan_timeout_ms() -> u64 {
    *SCAN_TIMEOUT_MS.get_or_init(|| {
        parse_env_u64("BPS_SCAN_TIMEOUT_MS", DEFAULT_SCAN_TIMEOUT.as_millis() as u64).max(1)
    })
}

/// Scanner settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// How long a scan attempt waits for a symbol before giving up
    pub timeout: Duration,
    /// Name of the analysis worker thread
    pub worker_name: String,
}

impl ScanConfig {
    /// Defaults, with `BPS_SCAN_TIMEOUT_MS` overriding the timeout
    pub fn from_env() -> Self {
        Self {
            timeout: Duration::from_millis(scan_timeout_ms()),
            ..Self::default()
        }
    }

    /// Use a different scanning window
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SCAN_TIMEOUT,
            worker_name: "frame-analyzer".to_string(),
        }
    }
}
