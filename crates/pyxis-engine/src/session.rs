//! # Editor Session
//!
//! One editor instance: a container, the caret in logical offsets and the
//! last render. Each input event runs the whole pipeline:
//!
//! 1. key table or paste produces the new text and caret
//! 2. the edit translator replays the diff into the container
//! 3. one commit
//! 4. the selective planner renders against the new caret
//!
//! The caret is clamped to the buffer at every render, so remote imports
//! that shrink the text never leave it dangling.

use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::caret::Caret;
use crate::display::{DisplayPoint, Selection};
use crate::error::EngineError;
use crate::keys::{self, DEFAULT_WORD_BOUNDARIES, Edit, Key};
use crate::plan::{RenderPlan, render_document};
use crate::position::logical_offset;
use crate::sync::{
    DiffTag, ExportMode, PersistKind, PersistOutcome, PersistRequest, PersistSchedule,
    PersistenceWorker, TextContainer, translate,
};
use crate::text::{char_len, strip_zero_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub word_boundaries: Vec<char>,
    pub snapshot_interval: Duration,
    pub update_debounce: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            word_boundaries: DEFAULT_WORD_BOUNDARIES.to_vec(),
            snapshot_interval: Duration::from_secs(30),
            update_debounce: Duration::from_millis(500),
        }
    }
}

/// A keydown as the host reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

/// Non-blocking reports for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    PersistenceFailed { kind: PersistKind, message: String },
}

/// What the render sink receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub display_markup: String,
    pub selection: Selection,
}

impl From<&RenderPlan> for RenderOutput {
    fn from(plan: &RenderPlan) -> Self {
        Self {
            display_markup: plan.markup(),
            selection: plan.selection.clone(),
        }
    }
}

pub trait RenderSink {
    fn render(&mut self, output: &RenderOutput);
}

impl<F: FnMut(&RenderOutput)> RenderSink for F {
    fn render(&mut self, output: &RenderOutput) {
        self(output)
    }
}

struct Persistence {
    worker: PersistenceWorker,
    schedule: PersistSchedule,
}

pub struct EditorSession<C: TextContainer> {
    id: Uuid,
    container: C,
    caret: Caret,
    options: SessionOptions,
    last_plan: Option<RenderPlan>,
    persistence: Option<Persistence>,
    notifications: Vec<Notification>,
}

impl<C: TextContainer> EditorSession<C> {
    pub fn new(id: Uuid, container: C, options: SessionOptions) -> Self {
        info!("Opening editor session {id}");
        Self {
            id,
            container,
            caret: Caret::default(),
            options,
            last_plan: None,
            persistence: None,
            notifications: Vec::new(),
        }
    }

    /// Hands snapshots and updates to `worker` from now on.
    pub fn with_persistence(mut self, worker: PersistenceWorker, now: Instant) -> Self {
        let schedule = PersistSchedule::new(
            now,
            self.options.snapshot_interval,
            self.options.update_debounce,
        )
        .with_base(self.container.version());
        self.persistence = Some(Persistence { worker, schedule });
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> String {
        self.container.text()
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    pub fn set_caret(&mut self, caret: Caret) {
        self.caret = caret;
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    /// Renders the current buffer for the current caret.
    pub fn render(&mut self) -> RenderOutput {
        let text = self.container.text();
        self.caret = self.caret.clamp(char_len(&text));
        let plan = render_document(&text, self.caret);
        let output = RenderOutput::from(&plan);
        self.last_plan = Some(plan);
        output
    }

    pub fn emit<S: RenderSink + ?Sized>(&mut self, sink: &mut S) {
        let output = self.render();
        sink.render(&output);
    }

    /// Returns `None` for keys the host handles natively or that type
    /// nothing. A typed zero width space types nothing, as in paste.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Option<RenderOutput>, EngineError> {
        let key = Key::from_name(&event.key);

        if key.is_navigation() {
            return Ok(None);
        }
        if event.ctrl && (key.is_ctrl_selection() || key.is_ctrl_skip()) {
            debug!("ctrl+{} left to the host", event.key);
            return Ok(None);
        }
        if !matches!(key, Key::Backspace | Key::Delete)
            && strip_zero_width(&key.content()).is_empty()
        {
            return Ok(None);
        }

        let old = self.container.text();
        let edit = keys::apply(
            &old,
            self.caret,
            &key,
            event.ctrl,
            &self.options.word_boundaries,
        );
        self.apply_edit(&old, edit).map(Some)
    }

    /// Replaces the selection with `plain_text`, zero width spaces removed.
    pub fn handle_paste(&mut self, plain_text: &str) -> Result<RenderOutput, EngineError> {
        let content = strip_zero_width(plain_text);
        let old = self.container.text();
        let caret = self.caret.clamp(char_len(&old));
        let edit = keys::insert(&old, caret, &content);
        self.apply_edit(&old, edit)
    }

    /// Moves the caret to a selection the host reports in display points,
    /// resolved against the last render.
    pub fn handle_selection(&mut self, anchor: &DisplayPoint, focus: &DisplayPoint) -> RenderOutput {
        if self.last_plan.is_none() {
            self.render();
        }
        if let Some(plan) = &self.last_plan {
            let lines = &plan.tree.lines;
            self.caret = Caret::new(logical_offset(lines, anchor), logical_offset(lines, focus));
        }
        self.render()
    }

    /// Merges a payload exported by another peer.
    pub fn import_remote(&mut self, bytes: &[u8]) -> Result<RenderOutput, EngineError> {
        self.container.import(bytes)?;
        Ok(self.render())
    }

    fn apply_edit(&mut self, old: &str, edit: Edit) -> Result<RenderOutput, EngineError> {
        let runs = translate(&mut self.container, old, &edit.text)?;
        self.container.commit();

        if runs.iter().any(|run| run.tag != DiffTag::Equal) {
            if let Some(persistence) = self.persistence.as_mut() {
                persistence.schedule.record_change(Instant::now());
            }
        }

        self.caret = edit.caret;
        Ok(self.render())
    }

    /// Submits a snapshot or an update export if one is due at `now`.
    /// Snapshots take precedence and cover pending updates.
    pub fn poll_persistence(&mut self, now: Instant) -> Result<(), EngineError> {
        self.collect_outcomes();
        let Some(persistence) = self.persistence.as_mut() else {
            return Ok(());
        };

        if persistence.schedule.snapshot_due(now) {
            let version = self.container.version();
            let bytes = self.container.export(&ExportMode::Snapshot)?;
            persistence.worker.submit(PersistRequest::Snapshot {
                id: self.id,
                version,
                bytes,
            })?;
            persistence.schedule.snapshot_submitted(now);
            debug!("snapshot queued for {}", self.id);
        } else if persistence.schedule.updates_due(now) {
            let base = persistence.schedule.base().clone();
            let version = self.container.version();
            let bytes = self.container.export(&ExportMode::Updates {
                since: base.clone(),
            })?;
            persistence.worker.submit(PersistRequest::Updates {
                id: self.id,
                base,
                version,
                bytes,
            })?;
            persistence.schedule.updates_submitted();
            debug!("updates queued for {}", self.id);
        }
        Ok(())
    }

    /// Notifications gathered since the last call.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.collect_outcomes();
        std::mem::take(&mut self.notifications)
    }

    /// Waits for queued persistence writes and returns the remaining
    /// notifications.
    pub fn close(mut self) -> Vec<Notification> {
        self.collect_outcomes();
        if let Some(persistence) = self.persistence.take() {
            for outcome in persistence.worker.shutdown() {
                self.push_outcome(outcome);
            }
        }
        info!("Closed editor session {}", self.id);
        self.notifications
    }

    fn push_outcome(&mut self, outcome: PersistOutcome) {
        let schedule = self.persistence.as_mut().map(|p| &mut p.schedule);
        match outcome {
            PersistOutcome::Written { version, .. } => {
                if let Some(schedule) = schedule {
                    schedule.written(version);
                }
            }
            PersistOutcome::Failed { kind, message, .. } => {
                if let Some(schedule) = schedule {
                    schedule.failed(Instant::now());
                }
                self.notifications
                    .push(Notification::PersistenceFailed { kind, message });
            }
        }
    }

    fn collect_outcomes(&mut self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let outcomes: Vec<_> =
            std::iter::from_fn(|| persistence.worker.try_recv_outcome()).collect();
        for outcome in outcomes {
            self.push_outcome(outcome);
        }
    }
}
