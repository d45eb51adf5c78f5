use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ContainerError;

pub type PeerId = u64;

/// Per-peer count of operations seen.
///
/// Serialised as `[[peer, count], ...]`: JSON object keys are strings, and
/// integer keys do not survive a trip through an internally tagged payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<(PeerId, u64)>", from = "Vec<(PeerId, u64)>")]
pub struct VersionVector(BTreeMap<PeerId, u64>);

impl From<VersionVector> for Vec<(PeerId, u64)> {
    fn from(vv: VersionVector) -> Self {
        vv.0.into_iter().collect()
    }
}

impl From<Vec<(PeerId, u64)>> for VersionVector {
    fn from(pairs: Vec<(PeerId, u64)>) -> Self {
        let mut vv = VersionVector::new();
        for (peer, n) in pairs {
            let seen = vv.0.entry(peer).or_insert(0);
            *seen = (*seen).max(n);
        }
        vv
    }
}

impl VersionVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations from `peer` this version includes.
    pub fn get(&self, peer: PeerId) -> u64 {
        self.0.get(&peer).copied().unwrap_or(0)
    }

    /// Records that operation `counter` from `peer` has been seen.
    pub fn observe(&mut self, peer: PeerId, counter: u64) {
        let seen = self.0.entry(peer).or_insert(0);
        *seen = (*seen).max(counter + 1);
    }

    /// True when `self` has seen everything `other` has.
    pub fn includes(&self, other: &VersionVector) -> bool {
        other.0.iter().all(|(&peer, &n)| self.get(peer) >= n)
    }
}

/// What [`TextContainer::export`] produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportMode {
    /// Full state.
    Snapshot,
    /// Operations the given version has not seen.
    Updates { since: VersionVector },
}

/// An ordered sequence of chars that can be edited and merged between
/// peers. Positions and lengths count chars.
pub trait TextContainer {
    fn insert(&mut self, pos: usize, text: &str) -> Result<(), ContainerError>;

    fn delete(&mut self, pos: usize, len: usize) -> Result<(), ContainerError>;

    /// Current logical text.
    fn text(&self) -> String;

    /// Closes the current batch of local operations.
    fn commit(&mut self);

    fn export(&self, mode: &ExportMode) -> Result<Vec<u8>, ContainerError>;

    fn import(&mut self, bytes: &[u8]) -> Result<(), ContainerError>;

    fn version(&self) -> VersionVector;
}
