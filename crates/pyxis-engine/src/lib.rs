//! # pyxis-engine
//!
//! Turns line-level markdown structure into a display tree, keeps the caret
//! consistent between logical text and that tree, and feeds edits into a
//! CRDT text container.
//!
//! ```
//! use pyxis_engine::{Caret, render_document};
//!
//! let plan = render_document("Hello **world**!\nnext", Caret::at(18));
//! assert_eq!(
//!     plan.markup(),
//!     "<div>Hello <strong>world</strong>!</div><div>next</div>"
//! );
//! ```

pub mod caret;
pub mod display;
pub mod error;
pub mod keys;
pub mod plan;
pub mod position;
pub mod render;
pub mod session;
pub mod sync;
pub mod text;

pub use caret::Caret;
pub use display::{DisplayNode, DisplayPath, DisplayPoint, DisplayTree, Selection, Tag};
pub use error::{ContainerError, EngineError, PersistError};
pub use keys::{Edit, Key};
pub use plan::{RenderPlan, render_document};
pub use render::{render, transpile};
pub use session::{EditorSession, KeyEvent, Notification, RenderOutput, RenderSink, SessionOptions};
pub use sync::{ExportMode, RopeText, TextContainer, VersionVector};
