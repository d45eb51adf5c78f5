//! Background persistence.
//!
//! The session decides *when* to persist ([`PersistSchedule`]) and exports
//! the bytes itself; writing them is handed to a worker thread so the
//! keystroke path never waits on storage. Outcomes travel back over a
//! channel: a written export moves the schedule's base version, a failure
//! surfaces as a notification and leaves the base where it was.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use uuid::Uuid;

use super::container::VersionVector;
use crate::error::PersistError;

/// Storage supplied by the host.
pub trait PersistenceHooks: Send + 'static {
    fn write_snapshot(&mut self, id: Uuid, bytes: &[u8]) -> Result<(), PersistError>;

    /// `base` is the version the update export starts from.
    fn write_updates(
        &mut self,
        id: Uuid,
        base: &VersionVector,
        bytes: &[u8],
    ) -> Result<(), PersistError>;
}

/// Writes `<id>.snapshot.json` (replaced each time) and appends one JSON
/// line per update export to `<id>.updates.jsonl`.
#[derive(Debug, Clone)]
pub struct DirectoryHooks {
    dir: PathBuf,
}

impl DirectoryHooks {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn snapshot_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.snapshot.json"))
    }

    pub fn updates_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.updates.jsonl"))
    }
}

impl PersistenceHooks for DirectoryHooks {
    fn write_snapshot(&mut self, id: Uuid, bytes: &[u8]) -> Result<(), PersistError> {
        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            // readers never see a partial snapshot
            let path = self.snapshot_path(id);
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, bytes)?;
            fs::rename(&tmp, &path)
        };
        write().map_err(|source| PersistError::Write {
            what: "snapshot",
            id,
            source,
        })
    }

    fn write_updates(
        &mut self,
        id: Uuid,
        _base: &VersionVector,
        bytes: &[u8],
    ) -> Result<(), PersistError> {
        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.updates_path(id))?;
            file.write_all(bytes)?;
            file.write_all(b"\n")
        };
        write().map_err(|source| PersistError::Write {
            what: "updates",
            id,
            source,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistKind {
    Snapshot,
    Updates,
}

impl fmt::Display for PersistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistKind::Snapshot => write!(f, "snapshot"),
            PersistKind::Updates => write!(f, "updates"),
        }
    }
}

/// An export to write. `version` is the container version the bytes
/// reach.
#[derive(Debug, Clone)]
pub enum PersistRequest {
    Snapshot {
        id: Uuid,
        version: VersionVector,
        bytes: Vec<u8>,
    },
    Updates {
        id: Uuid,
        base: VersionVector,
        version: VersionVector,
        bytes: Vec<u8>,
    },
}

impl PersistRequest {
    pub fn kind(&self) -> PersistKind {
        match self {
            PersistRequest::Snapshot { .. } => PersistKind::Snapshot,
            PersistRequest::Updates { .. } => PersistKind::Updates,
        }
    }

    pub fn version(&self) -> &VersionVector {
        match self {
            PersistRequest::Snapshot { version, .. } | PersistRequest::Updates { version, .. } => {
                version
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Everything up to `version` is stored.
    Written {
        id: Uuid,
        kind: PersistKind,
        version: VersionVector,
    },
    Failed {
        id: Uuid,
        kind: PersistKind,
        message: String,
    },
}

/// Persistence worker handle
pub struct PersistenceWorker {
    request_tx: Sender<PersistRequest>,
    outcome_rx: Receiver<PersistOutcome>,
    _worker_thread: thread::JoinHandle<()>,
}

impl PersistenceWorker {
    /// Spawn a worker thread that owns `hooks`
    pub fn spawn<H: PersistenceHooks>(hooks: H) -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded();

        let worker_thread = thread::spawn(move || {
            worker_loop(hooks, request_rx, outcome_tx);
        });

        Self {
            request_tx,
            outcome_rx,
            _worker_thread: worker_thread,
        }
    }

    /// Queue a write. Only fails if the worker thread is gone.
    pub fn submit(&self, req: PersistRequest) -> Result<(), PersistError> {
        self.request_tx
            .send(req)
            .map_err(|_| PersistError::WorkerGone)
    }

    /// Non-blocking
    pub fn try_recv_outcome(&self) -> Option<PersistOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    pub fn recv_outcome_timeout(&self, timeout: Duration) -> Option<PersistOutcome> {
        self.outcome_rx.recv_timeout(timeout).ok()
    }

    /// Lets queued writes finish, then returns every outcome not yet
    /// received.
    pub fn shutdown(self) -> Vec<PersistOutcome> {
        let Self {
            request_tx,
            outcome_rx,
            _worker_thread: worker_thread,
        } = self;
        drop(request_tx);
        if worker_thread.join().is_err() {
            warn!("Persistence worker panicked");
        }
        outcome_rx.try_iter().collect()
    }
}

/// Runs until every request sender is dropped.
fn worker_loop<H: PersistenceHooks>(
    mut hooks: H,
    request_rx: Receiver<PersistRequest>,
    outcome_tx: Sender<PersistOutcome>,
) {
    for req in request_rx.iter() {
        let kind = req.kind();
        let (id, result) = match &req {
            PersistRequest::Snapshot { id, bytes, .. } => (*id, hooks.write_snapshot(*id, bytes)),
            PersistRequest::Updates {
                id, base, bytes, ..
            } => (*id, hooks.write_updates(*id, base, bytes)),
        };

        let outcome = match result {
            Ok(()) => {
                debug!("{kind} written for {id}");
                PersistOutcome::Written {
                    id,
                    kind,
                    version: req.version().clone(),
                }
            }
            Err(e) => {
                warn!("Failed to persist {kind} for {id}: {e}");
                PersistOutcome::Failed {
                    id,
                    kind,
                    message: e.to_string(),
                }
            }
        };
        if outcome_tx.send(outcome).is_err() {
            break;
        }
    }
}

/// When snapshots and updates are due.
///
/// Snapshots run on a fixed interval. Updates run once the buffer has been
/// quiet for the debounce period after a change, and start from the last
/// version known to be written. Until an export is reported written the
/// base stays put, so a failed write is covered by the next export.
#[derive(Debug, Clone)]
pub struct PersistSchedule {
    snapshot_interval: Duration,
    update_debounce: Duration,
    last_snapshot: Instant,
    last_change: Option<Instant>,
    base: VersionVector,
}

impl PersistSchedule {
    pub fn new(now: Instant, snapshot_interval: Duration, update_debounce: Duration) -> Self {
        Self {
            snapshot_interval,
            update_debounce,
            last_snapshot: now,
            last_change: None,
            base: VersionVector::new(),
        }
    }

    /// Update exports start from `base` instead of the empty version.
    pub fn with_base(mut self, base: VersionVector) -> Self {
        self.base = base;
        self
    }

    pub fn record_change(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn snapshot_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_snapshot) >= self.snapshot_interval
    }

    pub fn updates_due(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|t| now.saturating_duration_since(t) >= self.update_debounce)
    }

    /// Version the next update export starts from.
    pub fn base(&self) -> &VersionVector {
        &self.base
    }

    /// A snapshot was queued; the next one is an interval away.
    pub fn snapshot_submitted(&mut self, now: Instant) {
        self.last_snapshot = now;
        self.last_change = None;
    }

    /// An update export was queued.
    pub fn updates_submitted(&mut self) {
        self.last_change = None;
    }

    /// An export reaching `version` is stored. Outcomes for older versions
    /// never move the base backwards.
    pub fn written(&mut self, version: VersionVector) {
        if version.includes(&self.base) {
            self.base = version;
        }
    }

    /// A write failed. The base is kept and the changes count as unsaved
    /// again, so an update export from the base follows after the debounce.
    pub fn failed(&mut self, now: Instant) {
        self.last_change = Some(now);
    }
}
