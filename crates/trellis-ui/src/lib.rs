//! Trellis UI - grid-cursor widget composition
//!
//! This crate builds form-style screens out of named, nested nodes:
//! - A layout cursor per node that decides where the next child goes
//! - Per-node registries of widgets and nested components, addressed by key
//! - Tabbed nodes whose pages host further nodes
//! - A two-level menu builder for the root window
//! - A pluggable [`Host`] toolkit, with a Taffy-backed [`HeadlessHost`]
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_ui::{
//!     Alignment, BuildContext, Component, ContainerOptions, HeadlessHost, Host, Node, Parent,
//!     UiResult, WidgetKind, WidgetOptions, WindowConfig,
//! };
//!
//! struct Address;
//!
//! impl Component for Address {
//!     fn initialize(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
//!         cx.cursor_mut().set_alignment(Alignment::WEST);
//!         cx.create_widget("label_calle", WidgetKind::Label, WidgetOptions::new().text("Calle"))?;
//!         cx.cursor_mut().advance_column();
//!         cx.create_widget("entry_calle", WidgetKind::Entry, WidgetOptions::new())?;
//!         Ok(())
//!     }
//! }
//!
//! let mut host = HeadlessHost::new();
//! let window = host.create_window(&WindowConfig::titled("My Program")).unwrap();
//! let mut main = Node::new(Parent::RootWindow(window), Address, ContainerOptions::new(), &mut host)
//!     .unwrap();
//!
//! let entry = main.widget("entry_calle").unwrap();
//! host.set_value(entry, "Av. Madero").unwrap();
//! main.dispose(&mut host).unwrap();
//! ```

pub mod cursor;
pub mod error;
pub mod headless;
pub mod host;
pub mod menu;
pub mod node;
pub mod registry;
pub mod tabs;

pub use cursor::{Alignment, LayoutCursor, Padding, Placement};
pub use error::{EntryKind, KeyScope, UiError, UiResult};
pub use headless::{HeadlessHost, HeadlessLayout, SurfaceKind};
pub use host::{
    Attach, Callback, ContainerOptions, Host, MenuId, MenuOptions, Placeable, SurfaceId,
    TabOptions, WidgetHandle, WidgetKind, WidgetOptions, WindowConfig, WindowId,
};
pub use menu::{MenuBuilder, MenuCallback, MenuEntry};
pub use node::{Blank, BlankTabs, BuildContext, Component, Node, NodeKind, Parent};
pub use registry::{Child, ChildMut, NodeRegistry, WidgetEntry};
pub use tabs::{Tab, TabSet};

// Shared utilities
pub use trellis_core::{Config, ProfilingMode};
