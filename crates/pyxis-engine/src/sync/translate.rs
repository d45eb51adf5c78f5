//! # Edit Translator
//!
//! The key table produces whole new strings; the container wants minimal
//! positional edits. A char-level diff between the previous and the new
//! text gives ordered runs, and replaying them with a running cursor turns
//! each insert or delete run into exactly one container call.

use similar::{ChangeTag, TextDiff};

use super::container::TextContainer;
use crate::error::ContainerError;
use crate::text::char_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Equal,
    Insert,
    Delete,
}

/// Consecutive chars sharing one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRun {
    pub tag: DiffTag,
    pub text: String,
}

impl DiffRun {
    pub fn new(tag: DiffTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

/// Char diff of `old` against `new`, adjacent changes of the same kind
/// coalesced.
pub fn diff_runs(old: &str, new: &str) -> Vec<DiffRun> {
    let diff = TextDiff::from_chars(old, new);
    let mut runs: Vec<DiffRun> = Vec::new();

    for change in diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Equal => DiffTag::Equal,
            ChangeTag::Insert => DiffTag::Insert,
            ChangeTag::Delete => DiffTag::Delete,
        };
        match runs.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(change.value()),
            _ => runs.push(DiffRun::new(tag, change.value())),
        }
    }

    runs
}

/// Replays `runs` against `container`. Equal runs advance the cursor,
/// inserts are written at the cursor and advance it, deletes remove at the
/// cursor and leave it in place.
pub fn replay<C: TextContainer + ?Sized>(
    container: &mut C,
    runs: &[DiffRun],
) -> Result<(), ContainerError> {
    let mut cursor = 0;
    for run in runs {
        let len = char_len(&run.text);
        match run.tag {
            DiffTag::Equal => cursor += len,
            DiffTag::Insert => {
                container.insert(cursor, &run.text)?;
                cursor += len;
            }
            DiffTag::Delete => container.delete(cursor, len)?,
        }
    }
    Ok(())
}

/// Diffs and replays in one go. Does not commit.
pub fn translate<C: TextContainer + ?Sized>(
    container: &mut C,
    old: &str,
    new: &str,
) -> Result<Vec<DiffRun>, ContainerError> {
    let runs = diff_runs(old, new);
    replay(container, &runs)?;
    Ok(runs)
}
