use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Child indices from the root container to a node, written `"2.0.1"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DisplayPath(Vec<usize>);

impl DisplayPath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl fmt::Display for DisplayPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, idx) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(".")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

impl FromStr for DisplayPath {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('.')
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<DisplayPath> for String {
    fn from(path: DisplayPath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for DisplayPath {
    type Error = std::num::ParseIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A position in the display tree. `offset` counts logical chars from the
/// start of the addressed node: chars into a text leaf, or chars into an
/// element counting its hidden prefix marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub path: DisplayPath,
    pub offset: usize,
}

impl DisplayPoint {
    pub fn new(path: DisplayPath, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// Selection handed to the render sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: DisplayPoint,
    pub focus: DisplayPoint,
    pub collapsed: bool,
}

impl Default for Selection {
    /// Start of the first line.
    fn default() -> Self {
        let start = DisplayPoint::new(DisplayPath::new(vec![0]), 0);
        Self {
            anchor: start.clone(),
            focus: start,
            collapsed: true,
        }
    }
}
