use std::{
    fmt,
    sync::{PoisonError, RwLock},
};

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

// ── Types ────────────────────────────────────────────────────────────────────

/// Tags written by the built-in triggers. The store itself accepts any
/// string as a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveSource {
    /// Initial state, nothing has toggled it yet.
    Manual,
    ChatCommand,
    ControlUrl,
}

impl LiveSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::ChatCommand => "chat-command",
            Self::ControlUrl => "control-url",
        }
    }
}

impl fmt::Display for LiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LiveSource> for String {
    fn from(source: LiveSource) -> Self {
        source.as_str().to_string()
    }
}

/// Snapshot of the broadcast flag and its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveState {
    pub is_live: bool,
    /// Time of the last accepted transition; `None` until the first one.
    pub updated_at: Option<DateTime<Utc>>,
    pub source: String,
}

impl Default for LiveState {
    fn default() -> Self {
        Self {
            is_live: false,
            updated_at: None,
            source: LiveSource::Manual.into(),
        }
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Holds the one `LiveState` of the process.
///
/// Every transition replaces the whole record under the write lock, so a
/// reader never sees the flag of one write with the timestamp of another.
pub struct LiveStore {
    state: RwLock<LiveState>,
    clock: Clock,
}

impl Default for LiveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LiveStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveStore")
            .field("state", &self.read())
            .finish()
    }
}

impl LiveStore {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Store with a custom time source.
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            state: RwLock::new(LiveState::default()),
            clock: Box::new(clock),
        }
    }

    /// Current snapshot.
    pub fn read(&self) -> LiveState {
        // A panic while holding the lock cannot leave a half-written record:
        // the only write is a single assignment.
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set the flag, stamp it and record who asked. Last write wins; setting
    /// the current value again still refreshes `updated_at` and `source`.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn transition(&self, is_live: bool, source: impl Into<String>) -> LiveState {
        let source = source.into();
        let mut state = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let now = (self.clock)();
        let updated_at = match state.updated_at {
            Some(prev) if prev > now => prev,
            _ => now,
        };

        *state = LiveState {
            is_live,
            updated_at: Some(updated_at),
            source,
        };
        state.clone()
    }
}
