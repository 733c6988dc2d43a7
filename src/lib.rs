//! Region Editor - rectangle annotation for images
//!
//! An interactive editing core for drawing, moving, resizing, labelling and
//! deleting rectangular regions on an image. All geometry lives in a
//! normalized `[0, 1]` image space; the host supplies a drawing [`Surface`]
//! and forwards pointer and keyboard events to a [`RegionEditorController`],
//! which keeps the region list, selection and undo history and repaints the
//! surface.
//!
//! ```rust,ignore
//! use region_editor::{EditSession, EditorConfig, NoopCallback, PointerEvent};
//! use region_editor::render::{ImageInfo, RecordingSurface};
//!
//! let mut session = EditSession::new(
//!     RecordingSurface::new(800.0, 600.0),
//!     ImageInfo::new(1200, 900),
//!     "page.png",
//!     NoopCallback,
//!     &EditorConfig::default(),
//! );
//! session.controller_mut().handle_pointer_down(&PointerEvent::new(120.0, 80.0));
//! ```

pub mod config;
pub mod constants;
pub mod controller;
pub mod format;
pub mod history;
pub mod input;
pub mod keybindings;
pub mod model;
pub mod render;
pub mod session;
pub mod viewport;

pub use config::{ConfigError, EditorConfig, LogLevel};
pub use controller::{EditorCallback, NoopCallback, RegionEditorController};
pub use history::{EditHistory, HistoryStack, RegionList};
pub use input::{Direction, Key, KeyEvent, ModifierKey, Modifiers, MouseButton, PointerEvent};
pub use keybindings::{EditMode, EditorAction, KeyBindings};
pub use model::{Category, Label, Point, Rectangle, Region, RegionHandle, RegionId};
pub use render::Surface;
pub use session::EditSession;
