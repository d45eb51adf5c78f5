//! In-memory [`TextContainer`] over an `xi_rope::Rope`.
//!
//! Keeps a per-peer operation log so snapshots and since-version updates
//! can be exported and replayed on another instance. Remote operations are
//! applied in arrival order at their recorded positions; there is no
//! conflict resolution, so concurrent edits from different peers are only
//! as correct as their ordering.

use log::debug;
use serde::{Deserialize, Serialize};
use xi_rope::Rope;
use xi_rope::delta::Builder;

use super::container::{ExportMode, PeerId, TextContainer, VersionVector};
use crate::error::ContainerError;
use crate::text::{byte_offset, char_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpId {
    pub peer: PeerId,
    pub counter: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TextOp {
    Insert { pos: usize, text: String },
    Delete { pos: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedOp {
    pub id: OpId,
    pub op: TextOp,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Payload {
    Snapshot {
        text: String,
        version: VersionVector,
        ops: Vec<LoggedOp>,
    },
    Updates {
        ops: Vec<LoggedOp>,
    },
}

pub struct RopeText {
    peer: PeerId,
    buffer: Rope,
    log: Vec<LoggedOp>,
    /// Entries of `log` before this index are committed.
    committed: usize,
    version: VersionVector,
    next_counter: u64,
}

impl RopeText {
    pub fn new(peer: PeerId) -> Self {
        Self {
            peer,
            buffer: Rope::from(""),
            log: Vec::new(),
            committed: 0,
            version: VersionVector::new(),
            next_counter: 0,
        }
    }

    /// A container whose initial content is one committed insert.
    pub fn with_text(peer: PeerId, text: &str) -> Result<Self, ContainerError> {
        let mut container = Self::new(peer);
        container.insert(0, text)?;
        container.commit();
        Ok(container)
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }

    pub fn len_chars(&self) -> usize {
        rope_chars(&self.buffer)
    }

    /// Operations recorded but not yet committed.
    pub fn pending(&self) -> &[LoggedOp] {
        &self.log[self.committed..]
    }

    fn record(&mut self, op: TextOp) -> Result<(), ContainerError> {
        self.buffer = apply(&self.buffer, &op)?;
        let id = OpId {
            peer: self.peer,
            counter: self.next_counter,
        };
        self.next_counter += 1;
        self.log.push(LoggedOp { id, op });
        Ok(())
    }

    fn committed_ops(&self) -> &[LoggedOp] {
        &self.log[..self.committed]
    }
}

/// Chars in `rope`, counted chunk by chunk.
fn rope_chars(rope: &Rope) -> usize {
    rope.iter_chunks(..).map(char_len).sum()
}

/// Byte offset of char `pos`, or `None` when `pos` is past the end.
fn rope_byte_offset(rope: &Rope, pos: usize) -> Option<usize> {
    let mut chars = 0;
    let mut bytes = 0;
    for chunk in rope.iter_chunks(..) {
        let n = char_len(chunk);
        if chars + n >= pos {
            return Some(bytes + byte_offset(chunk, pos - chars));
        }
        chars += n;
        bytes += chunk.len();
    }
    (chars == pos).then_some(bytes)
}

/// `buffer` with `op` applied. Positions are resolved against the rope's
/// chunks, so the buffer is never copied out whole.
fn apply(buffer: &Rope, op: &TextOp) -> Result<Rope, ContainerError> {
    let out_of_range = |pos| ContainerError::OutOfRange {
        pos,
        len: rope_chars(buffer),
    };
    let mut builder = Builder::new(buffer.len());
    match op {
        TextOp::Insert { pos, text } => {
            let at = rope_byte_offset(buffer, *pos).ok_or_else(|| out_of_range(*pos))?;
            builder.replace(at..at, Rope::from(text.as_str()));
        }
        TextOp::Delete { pos, len } => {
            let end = pos + len;
            let from = rope_byte_offset(buffer, *pos).ok_or_else(|| out_of_range(end))?;
            let to = rope_byte_offset(buffer, end).ok_or_else(|| out_of_range(end))?;
            builder.delete(from..to);
        }
    }
    Ok(builder.build().apply(buffer))
}

impl TextContainer for RopeText {
    fn insert(&mut self, pos: usize, text: &str) -> Result<(), ContainerError> {
        if text.is_empty() {
            return Ok(());
        }
        self.record(TextOp::Insert {
            pos,
            text: text.to_string(),
        })
    }

    fn delete(&mut self, pos: usize, len: usize) -> Result<(), ContainerError> {
        if len == 0 {
            return Ok(());
        }
        self.record(TextOp::Delete { pos, len })
    }

    fn text(&self) -> String {
        self.buffer.slice_to_cow(..).into_owned()
    }

    fn commit(&mut self) {
        for entry in &self.log[self.committed..] {
            self.version.observe(entry.id.peer, entry.id.counter);
        }
        self.committed = self.log.len();
    }

    fn export(&self, mode: &ExportMode) -> Result<Vec<u8>, ContainerError> {
        let payload = match mode {
            ExportMode::Snapshot => Payload::Snapshot {
                text: self.text(),
                version: self.version.clone(),
                ops: self.committed_ops().to_vec(),
            },
            ExportMode::Updates { since } => Payload::Updates {
                ops: self
                    .committed_ops()
                    .iter()
                    .filter(|entry| entry.id.counter >= since.get(entry.id.peer))
                    .cloned()
                    .collect(),
            },
        };
        Ok(serde_json::to_vec(&payload)?)
    }

    fn import(&mut self, bytes: &[u8]) -> Result<(), ContainerError> {
        let payload: Payload = serde_json::from_slice(bytes)?;
        self.commit();

        match payload {
            Payload::Snapshot { text, version, ops } => {
                if version.includes(&self.version) && self.version.includes(&version) {
                    return Ok(());
                }
                if !self.log.is_empty() {
                    return Err(ContainerError::Diverged);
                }
                self.buffer = Rope::from(text.as_str());
                self.next_counter = version.get(self.peer);
                self.version = version;
                self.committed = ops.len();
                self.log = ops;
                debug!("imported snapshot at {:?}", self.version);
            }
            Payload::Updates { ops } => {
                // all or nothing: work on copies, swap in at the end
                let mut buffer = self.buffer.clone();
                let mut version = self.version.clone();
                let mut accepted = Vec::new();
                for entry in ops {
                    let OpId { peer, counter } = entry.id;
                    let expected = version.get(peer);
                    if counter < expected {
                        continue;
                    }
                    if counter > expected {
                        return Err(ContainerError::Gap {
                            peer,
                            expected,
                            found: counter,
                        });
                    }
                    buffer = apply(&buffer, &entry.op)?;
                    version.observe(peer, counter);
                    accepted.push(entry);
                }

                debug!("imported {} remote operations", accepted.len());
                self.buffer = buffer;
                self.next_counter = self.next_counter.max(version.get(self.peer));
                self.version = version;
                self.log.extend(accepted);
                self.committed = self.log.len();
            }
        }
        Ok(())
    }

    fn version(&self) -> VersionVector {
        self.version.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_and_delete_by_char() {
        let mut text = RopeText::new(1);
        text.insert(0, "héllo").unwrap();
        text.insert(5, "!").unwrap();
        text.delete(1, 1).unwrap();
        assert_eq!(text.text(), "hllo!");
        assert_eq!(text.len_chars(), 5);
    }

    #[test]
    fn out_of_range_is_an_error() {
        let mut text = RopeText::with_text(1, "ab").unwrap();
        assert!(matches!(
            text.insert(3, "x"),
            Err(ContainerError::OutOfRange { pos: 3, len: 2 })
        ));
        assert!(matches!(
            text.delete(1, 5),
            Err(ContainerError::OutOfRange { .. })
        ));
        assert_eq!(text.text(), "ab");
    }

    #[test]
    fn commit_advances_version() {
        let mut text = RopeText::new(3);
        text.insert(0, "a").unwrap();
        assert_eq!(text.version().get(3), 0);
        assert_eq!(text.pending().len(), 1);
        text.commit();
        assert_eq!(text.version().get(3), 1);
        assert!(text.pending().is_empty());
    }

    #[test]
    fn snapshot_restores_into_empty_container() {
        let source = RopeText::with_text(1, "hello").unwrap();
        let bytes = source.export(&ExportMode::Snapshot).unwrap();

        let mut replica = RopeText::new(2);
        replica.import(&bytes).unwrap();
        assert_eq!(replica.text(), "hello");
        assert_eq!(replica.version(), source.version());
    }

    #[test]
    fn snapshot_into_diverged_container_is_rejected() {
        let source = RopeText::with_text(1, "hello").unwrap();
        let bytes = source.export(&ExportMode::Snapshot).unwrap();

        let mut other = RopeText::with_text(2, "x").unwrap();
        assert!(matches!(other.import(&bytes), Err(ContainerError::Diverged)));
    }

    #[test]
    fn updates_since_version_replay_on_replica() {
        // Given a replica in sync with the source
        let mut source = RopeText::with_text(1, "ab").unwrap();
        let mut replica = RopeText::new(2);
        replica
            .import(&source.export(&ExportMode::Snapshot).unwrap())
            .unwrap();
        let base = source.version();

        // When the source edits and exports only what is new
        source.insert(1, "x").unwrap();
        source.commit();
        let updates = source
            .export(&ExportMode::Updates { since: base })
            .unwrap();

        // Then the replica catches up, and a repeated import is a no-op
        replica.import(&updates).unwrap();
        assert_eq!(replica.text(), "axb");
        replica.import(&updates).unwrap();
        assert_eq!(replica.text(), "axb");
        assert_eq!(replica.version(), source.version());
    }

    #[test]
    fn uncommitted_ops_are_not_exported() {
        let mut source = RopeText::with_text(1, "a").unwrap();
        let base = source.version();
        source.insert(1, "b").unwrap();
        let bytes = source
            .export(&ExportMode::Updates { since: base })
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], "updates");
        assert_eq!(json["ops"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn offsets_resolve_across_rope_chunks() {
        // long enough for the rope to hold several leaves
        let long = "é".repeat(3000);
        let mut text = RopeText::with_text(1, &long).unwrap();
        text.insert(2500, "x").unwrap();
        text.delete(2999, 2).unwrap();
        assert_eq!(text.len_chars(), 2999);
        assert_eq!(text.text().chars().nth(2500), Some('x'));
        assert!(matches!(
            text.insert(3000, "y"),
            Err(ContainerError::OutOfRange {
                pos: 3000,
                len: 2999
            })
        ));
    }

    #[test]
    fn update_with_a_counter_gap_is_rejected_whole() {
        // Given a replica at the source's base version
        let mut source = RopeText::with_text(1, "ab").unwrap();
        let mut replica = RopeText::new(2);
        replica
            .import(&source.export(&ExportMode::Snapshot).unwrap())
            .unwrap();
        let before = replica.version();

        // When it receives only the second of two later ops
        source.insert(2, "x").unwrap();
        source.commit();
        let mid = source.version();
        source.insert(3, "y").unwrap();
        source.commit();
        let late = source
            .export(&ExportMode::Updates { since: mid })
            .unwrap();

        // Then the batch is refused and nothing changes
        assert!(matches!(
            replica.import(&late),
            Err(ContainerError::Gap {
                peer: 1,
                expected: 1,
                found: 2
            })
        ));
        assert_eq!(replica.text(), "ab");
        assert_eq!(replica.version(), before);
    }

    #[test]
    fn failing_op_mid_batch_leaves_the_container_untouched() {
        let mut replica = RopeText::with_text(2, "ab").unwrap();
        let before = replica.version();
        let batch = br#"{"kind":"updates","ops":[
            {"id":{"peer":5,"counter":0},"op":{"op":"insert","pos":0,"text":"z"}},
            {"id":{"peer":5,"counter":1},"op":{"op":"delete","pos":0,"len":9}}
        ]}"#;

        assert!(matches!(
            replica.import(batch),
            Err(ContainerError::OutOfRange { pos: 9, len: 3 })
        ));
        assert_eq!(replica.text(), "ab");
        assert_eq!(replica.version(), before);
        assert!(replica.pending().is_empty());
    }

    #[test]
    fn own_ops_coming_back_advance_the_local_counter() {
        let mut source = RopeText::with_text(1, "a").unwrap();
        let mut restored = RopeText::new(1);
        restored
            .import(
                &source
                    .export(&ExportMode::Updates {
                        since: VersionVector::new(),
                    })
                    .unwrap(),
            )
            .unwrap();

        restored.insert(1, "b").unwrap();
        restored.commit();
        source.insert(1, "b").unwrap();
        source.commit();
        assert_eq!(restored.version(), source.version());
        assert!(restored.pending().is_empty());
    }

    #[test]
    fn garbage_import_is_a_decode_error() {
        let mut text = RopeText::new(1);
        assert!(matches!(
            text.import(b"not json"),
            Err(ContainerError::Decode(_))
        ));
    }
}
