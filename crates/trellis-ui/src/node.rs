//! Composable nodes.
//!
//! A [`Node`] wraps one host container surface and owns a [`LayoutCursor`]
//! plus a [`NodeRegistry`] of named children. The screen-specific part of a
//! node is a [`Component`]: its `setup` and `initialize` hooks run once, in
//! that order, right after the container exists.
//!
//! # Example
//!
//! ```
//! use trellis_ui::{
//!     Alignment, BuildContext, Component, ContainerOptions, HeadlessHost, Host, Node, Parent,
//!     UiResult, WidgetKind, WidgetOptions, WindowConfig,
//! };
//!
//! struct Greeting;
//!
//! impl Component for Greeting {
//!     fn setup(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
//!         cx.cursor_mut().set_alignment(Alignment::HORIZONTAL);
//!         cx.configure_column(1, 1)
//!     }
//!
//!     fn initialize(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
//!         cx.create_widget("label", WidgetKind::Label, WidgetOptions::new().text("Name"))?;
//!         cx.cursor_mut().advance_column();
//!         cx.create_widget("entry", WidgetKind::Entry, WidgetOptions::new())?;
//!         Ok(())
//!     }
//! }
//!
//! let mut host = HeadlessHost::new();
//! let window = host.create_window(&WindowConfig::titled("Demo")).unwrap();
//! let node = Node::new(Parent::RootWindow(window), Greeting, ContainerOptions::new(), &mut host)
//!     .unwrap();
//! assert!(node.lookup("entry").is_ok());
//! ```

use std::any::Any;

use trellis_core::profiling::profile_function;

use crate::cursor::{LayoutCursor, Placement};
use crate::error::{KeyScope, UiError, UiResult};
use crate::host::{
    Attach, ContainerOptions, Host, Placeable, SurfaceId, WidgetHandle, WidgetKind, WidgetOptions,
    WindowId,
};
use crate::registry::{Child, ChildMut, NodeRegistry, WidgetEntry};
use crate::tabs::TabSet;

/// What a node is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The application's top-level window. The node fills it.
    RootWindow(WindowId),
    /// A plain container that is not a node, such as a tab page. The node fills it.
    ContainerFrame(SurfaceId),
    /// Another node's container. The parent places the node with its cursor.
    ParentNode(SurfaceId),
    /// Not attached to anything.
    Detached,
}

/// Structural flavour of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    #[default]
    Plain,
    /// The node owns a notebook and addresses its pages by key.
    Tabbed,
}

/// Screen-specific behaviour of a node.
///
/// Both hooks default to doing nothing. Returning an error from either hook
/// aborts construction and tears down whatever the node created so far.
pub trait Component: Any {
    fn kind(&self) -> NodeKind {
        NodeKind::Plain
    }

    /// Configure the cursor and the container before children are created.
    fn setup(&mut self, _cx: &mut BuildContext<'_>) -> UiResult<()> {
        Ok(())
    }

    /// Create the node's children.
    fn initialize(&mut self, _cx: &mut BuildContext<'_>) -> UiResult<()> {
        Ok(())
    }

    /// Called once when the node is disposed, before its children are.
    fn dispose(&mut self) {}
}

/// Component with no behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blank;

impl Component for Blank {}

/// Component with no behaviour that carries a tab strip.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankTabs;

impl Component for BlankTabs {
    fn kind(&self) -> NodeKind {
        NodeKind::Tabbed
    }
}

/// Everything a node owns except its component.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) surface: SurfaceId,
    pub(crate) parent: Parent,
    pub(crate) cursor: LayoutCursor,
    pub(crate) registry: NodeRegistry,
    pub(crate) tabs: Option<TabSet>,
}

impl Frame {
    fn attach(parent: Parent, options: &ContainerOptions, host: &mut dyn Host) -> UiResult<SurfaceId> {
        match parent {
            Parent::RootWindow(window) => {
                if !host.has_window(window) {
                    return Err(UiError::InvalidParentCapability(format!(
                        "window {:?} does not exist",
                        window
                    )));
                }
                let surface = host.create_surface(Attach::Window(window), options)?;
                host.place(Placeable::Surface(surface), &Placement::fill())?;
                Ok(surface)
            }
            Parent::ContainerFrame(container) => {
                if !host.has_surface(container) {
                    return Err(UiError::InvalidParentCapability(format!(
                        "container {:?} does not exist",
                        container
                    )));
                }
                let surface = host.create_surface(Attach::Surface(container), options)?;
                host.place(Placeable::Surface(surface), &Placement::fill())?;
                Ok(surface)
            }
            Parent::ParentNode(container) => {
                if !host.has_surface(container) {
                    return Err(UiError::InvalidParentCapability(format!(
                        "parent node container {:?} does not exist",
                        container
                    )));
                }
                host.create_surface(Attach::Surface(container), options)
            }
            Parent::Detached => host.create_surface(Attach::Detached, options),
        }
    }

    pub(crate) fn create_widget(
        &mut self,
        host: &mut dyn Host,
        key: &str,
        kind: WidgetKind,
        options: WidgetOptions,
    ) -> UiResult<WidgetHandle> {
        self.registry.ensure_vacant(key)?;

        let handle = host.create_widget(self.surface, &kind, options)?;
        if let Err(err) = host.place(Placeable::Widget(handle), &self.cursor.snapshot()) {
            host.destroy_widget(handle)?;
            return Err(err);
        }
        tracing::trace!(key, %kind, row = self.cursor.row(), column = self.cursor.column(), "widget created");

        self.registry.insert_widget(key, WidgetEntry { handle, kind })
    }

    pub(crate) fn create_component<C: Component>(
        &mut self,
        host: &mut dyn Host,
        key: &str,
        component: C,
        options: ContainerOptions,
    ) -> UiResult<&mut Node> {
        self.registry.ensure_vacant(key)?;

        let mut node = Node::build(Parent::ParentNode(self.surface), component, options, host, key)?;
        if let Err(err) = host.place(Placeable::Surface(node.surface()), &self.cursor.snapshot()) {
            node.dispose(host)?;
            return Err(err);
        }

        self.registry.insert_component(key, node)
    }

    /// Destroy every child and the node's own surface.
    ///
    /// A failing step does not stop the rest; the first error is returned.
    pub(crate) fn teardown(&mut self, host: &mut dyn Host) -> UiResult<()> {
        let mut first = None;
        let (components, widgets) = self.registry.drain();
        for (key, mut node) in components {
            tracing::trace!(key = key.as_str(), "disposing child component");
            keep_first(&mut first, node.dispose(host));
        }
        for (_, entry) in widgets {
            keep_first(&mut first, host.destroy_widget(entry.handle));
        }
        if let Some(tabs) = self.tabs.take() {
            keep_first(&mut first, tabs.teardown(host));
        }
        keep_first(&mut first, host.destroy_surface(self.surface));
        first.map_or(Ok(()), Err)
    }
}

/// Record a release failure, keeping only the first.
pub(crate) fn keep_first(first: &mut Option<UiError>, result: UiResult<()>) {
    if let Err(err) = result {
        tracing::error!(error = %err, "release step failed");
        first.get_or_insert(err);
    }
}

/// A container node with a layout cursor and named children.
pub struct Node {
    pub(crate) frame: Frame,
    component: Box<dyn Component>,
    disposed: bool,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("surface", &self.frame.surface)
            .field("parent", &self.frame.parent)
            .field("children", &self.frame.registry.len())
            .field("tabbed", &self.frame.tabs.is_some())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Node {
    /// Create a node under `parent` and run the component's lifecycle hooks.
    pub fn new<C: Component>(
        parent: Parent,
        component: C,
        options: ContainerOptions,
        host: &mut dyn Host,
    ) -> UiResult<Node> {
        Self::build(parent, component, options, host, "<root>")
    }

    pub(crate) fn build<C: Component>(
        parent: Parent,
        mut component: C,
        options: ContainerOptions,
        host: &mut dyn Host,
        key: &str,
    ) -> UiResult<Node> {
        profile_function!();

        let surface = Frame::attach(parent, &options, host)?;
        tracing::debug!(key, ?parent, ?surface, "node created");

        let mut frame = Frame {
            surface,
            parent,
            cursor: LayoutCursor::new(),
            registry: NodeRegistry::new(),
            tabs: None,
        };

        let built = match component.kind() {
            NodeKind::Plain => Ok(()),
            NodeKind::Tabbed => TabSet::create(surface, host).map(|tabs| frame.tabs = Some(tabs)),
        }
        .and_then(|()| {
            let mut cx = BuildContext {
                frame: &mut frame,
                host: &mut *host,
            };
            component.setup(&mut cx)?;
            component.initialize(&mut cx)
        });

        if let Err(err) = built {
            tracing::debug!(key, error = %err, "node construction aborted");
            if let Err(cleanup) = frame.teardown(host) {
                tracing::error!(key, error = %cleanup, "failed to release partially built node");
            }
            return Err(err);
        }

        Ok(Node {
            frame,
            component: Box::new(component),
            disposed: false,
        })
    }

    /// The node's own container surface.
    pub fn surface(&self) -> SurfaceId {
        self.frame.surface
    }

    pub fn parent(&self) -> Parent {
        self.frame.parent
    }

    pub fn cursor(&self) -> &LayoutCursor {
        &self.frame.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut LayoutCursor {
        &mut self.frame.cursor
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.frame.registry
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Borrow the component as its concrete type.
    pub fn component<T: Component>(&self) -> Option<&T> {
        let component: &dyn Any = self.component.as_ref();
        component.downcast_ref::<T>()
    }

    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let component: &mut dyn Any = self.component.as_mut();
        component.downcast_mut::<T>()
    }

    /// Create a widget at the cursor position and register it under `key`.
    pub fn create_widget(
        &mut self,
        host: &mut dyn Host,
        key: &str,
        kind: WidgetKind,
        options: WidgetOptions,
    ) -> UiResult<WidgetHandle> {
        self.ensure_live()?;
        self.frame.create_widget(host, key, kind, options)
    }

    /// Create a nested node at the cursor position and register it under `key`.
    pub fn create_component<C: Component>(
        &mut self,
        host: &mut dyn Host,
        key: &str,
        component: C,
        options: ContainerOptions,
    ) -> UiResult<&mut Node> {
        self.ensure_live()?;
        self.frame.create_component(host, key, component, options)
    }

    /// Look up a child by key, components first.
    pub fn lookup(&self, key: &str) -> UiResult<Child<'_>> {
        self.frame.registry.lookup(key)
    }

    pub fn lookup_mut(&mut self, key: &str) -> UiResult<ChildMut<'_>> {
        self.frame.registry.lookup_mut(key)
    }

    /// Look up a nested component. Widgets under `key` are not returned.
    pub fn child(&self, key: &str) -> UiResult<&Node> {
        self.frame
            .registry
            .component(key)
            .ok_or_else(|| UiError::not_found(key, KeyScope::Child))
    }

    pub fn child_mut(&mut self, key: &str) -> UiResult<&mut Node> {
        self.frame
            .registry
            .component_mut(key)
            .ok_or_else(|| UiError::not_found(key, KeyScope::Child))
    }

    /// Look up a widget handle. Components under `key` are not returned.
    pub fn widget(&self, key: &str) -> UiResult<WidgetHandle> {
        self.frame
            .registry
            .widget(key)
            .map(|entry| entry.handle)
            .ok_or_else(|| UiError::not_found(key, KeyScope::Child))
    }

    /// Release the node: its component hook, child components depth-first,
    /// widgets, tab pages and finally its own surface.
    ///
    /// Disposing twice is a no-op.
    pub fn dispose(&mut self, host: &mut dyn Host) -> UiResult<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;
        self.component.dispose();
        tracing::debug!(surface = ?self.frame.surface, "node disposed");
        self.frame.teardown(host)
    }

    pub(crate) fn ensure_live(&self) -> UiResult<()> {
        if self.disposed {
            return Err(UiError::Disposed);
        }
        Ok(())
    }
}

/// Access to a node under construction, handed to [`Component`] hooks.
pub struct BuildContext<'a> {
    pub(crate) frame: &'a mut Frame,
    pub(crate) host: &'a mut dyn Host,
}

impl<'a> BuildContext<'a> {
    pub fn surface(&self) -> SurfaceId {
        self.frame.surface
    }

    pub fn parent(&self) -> Parent {
        self.frame.parent
    }

    pub fn cursor(&self) -> &LayoutCursor {
        &self.frame.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut LayoutCursor {
        &mut self.frame.cursor
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.frame.registry
    }

    /// Direct access to the host toolkit.
    pub fn host(&mut self) -> &mut dyn Host {
        &mut *self.host
    }

    pub fn configure_column(&mut self, column: u16, weight: u16) -> UiResult<()> {
        self.host.configure_column(self.frame.surface, column, weight)
    }

    pub fn configure_row(&mut self, row: u16, weight: u16) -> UiResult<()> {
        self.host.configure_row(self.frame.surface, row, weight)
    }

    pub fn set_padding(&mut self, padding: u16) -> UiResult<()> {
        self.host.set_surface_padding(self.frame.surface, padding)
    }

    pub fn create_widget(
        &mut self,
        key: &str,
        kind: WidgetKind,
        options: WidgetOptions,
    ) -> UiResult<WidgetHandle> {
        self.frame.create_widget(&mut *self.host, key, kind, options)
    }

    pub fn create_component<C: Component>(
        &mut self,
        key: &str,
        component: C,
        options: ContainerOptions,
    ) -> UiResult<&mut Node> {
        self.frame
            .create_component(&mut *self.host, key, component, options)
    }

    pub fn lookup(&self, key: &str) -> UiResult<Child<'_>> {
        self.frame.registry.lookup(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Alignment;
    use crate::headless::HeadlessHost;
    use crate::host::{Callback, MenuId, MenuOptions, TabOptions, WindowConfig};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Component for Recorder {
        fn setup(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
            assert!(cx.registry().is_empty());
            self.log.borrow_mut().push("setup");
            Ok(())
        }

        fn initialize(&mut self, _cx: &mut BuildContext<'_>) -> UiResult<()> {
            self.log.borrow_mut().push("initialize");
            Ok(())
        }

        fn dispose(&mut self) {
            self.log.borrow_mut().push("dispose");
        }
    }

    fn window(host: &mut HeadlessHost) -> WindowId {
        host.create_window(&WindowConfig::default()).unwrap()
    }

    #[test]
    fn test_hooks_run_once_in_order() {
        let mut host = HeadlessHost::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let root = window(&mut host);

        let mut node = Node::new(
            Parent::RootWindow(root),
            Recorder { log: log.clone() },
            ContainerOptions::new(),
            &mut host,
        )
        .unwrap();
        assert_eq!(*log.borrow(), vec!["setup", "initialize"]);

        node.dispose(&mut host).unwrap();
        node.dispose(&mut host).unwrap();
        assert_eq!(*log.borrow(), vec!["setup", "initialize", "dispose"]);
    }

    #[test]
    fn test_component_downcast() {
        struct Counter(u32);
        impl Component for Counter {}

        let mut host = HeadlessHost::new();
        let root = window(&mut host);
        let mut node =
            Node::new(Parent::RootWindow(root), Counter(3), ContainerOptions::new(), &mut host)
                .unwrap();

        assert_eq!(node.component::<Counter>().map(|c| c.0), Some(3));
        assert!(node.component::<Blank>().is_none());
        node.component_mut::<Counter>().unwrap().0 += 1;
        assert_eq!(node.component::<Counter>().unwrap().0, 4);
    }

    #[test]
    fn test_root_attachment_fills() {
        let mut host = HeadlessHost::new();
        let root = window(&mut host);
        let node =
            Node::new(Parent::RootWindow(root), Blank, ContainerOptions::new(), &mut host).unwrap();

        let placement = host.placement(Placeable::Surface(node.surface())).unwrap();
        assert_eq!(placement.alignment, Alignment::FILL);
        assert_eq!(host.surface_attach(node.surface()), Some(Attach::Window(root)));
    }

    #[test]
    fn test_detached_node_is_not_placed() {
        let mut host = HeadlessHost::new();
        let node = Node::new(Parent::Detached, Blank, ContainerOptions::new(), &mut host).unwrap();
        assert_eq!(host.placement(Placeable::Surface(node.surface())), None);
        assert_eq!(host.surface_attach(node.surface()), Some(Attach::Detached));
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let mut host = HeadlessHost::new();
        let err = Node::new(
            Parent::RootWindow(WindowId(999)),
            Blank,
            ContainerOptions::new(),
            &mut host,
        )
        .unwrap_err();
        assert!(matches!(err, UiError::InvalidParentCapability(_)));

        let err = Node::new(
            Parent::ParentNode(SurfaceId(999)),
            Blank,
            ContainerOptions::new(),
            &mut host,
        )
        .unwrap_err();
        assert!(matches!(err, UiError::InvalidParentCapability(_)));
    }

    #[test]
    fn test_disposed_node_rejects_children() {
        let mut host = HeadlessHost::new();
        let root = window(&mut host);
        let mut node =
            Node::new(Parent::RootWindow(root), Blank, ContainerOptions::new(), &mut host).unwrap();
        node.dispose(&mut host).unwrap();

        let err = node
            .create_widget(&mut host, "late", WidgetKind::Label, WidgetOptions::new())
            .unwrap_err();
        assert_eq!(err, UiError::Disposed);
        assert!(!host.has_surface(node.surface()));
    }

    /// Headless host whose `destroy_widget` fails for one handle.
    struct StuckWidget {
        inner: HeadlessHost,
        stuck: Option<WidgetHandle>,
    }

    impl Host for StuckWidget {
        fn create_window(&mut self, config: &WindowConfig) -> UiResult<WindowId> {
            self.inner.create_window(config)
        }

        fn has_window(&self, window: WindowId) -> bool {
            self.inner.has_window(window)
        }

        fn has_surface(&self, surface: SurfaceId) -> bool {
            self.inner.has_surface(surface)
        }

        fn create_surface(
            &mut self,
            attach: Attach,
            options: &ContainerOptions,
        ) -> UiResult<SurfaceId> {
            self.inner.create_surface(attach, options)
        }

        fn set_surface_padding(&mut self, surface: SurfaceId, padding: u16) -> UiResult<()> {
            self.inner.set_surface_padding(surface, padding)
        }

        fn configure_column(
            &mut self,
            surface: SurfaceId,
            column: u16,
            weight: u16,
        ) -> UiResult<()> {
            self.inner.configure_column(surface, column, weight)
        }

        fn configure_row(&mut self, surface: SurfaceId, row: u16, weight: u16) -> UiResult<()> {
            self.inner.configure_row(surface, row, weight)
        }

        fn create_widget(
            &mut self,
            parent: SurfaceId,
            kind: &WidgetKind,
            options: WidgetOptions,
        ) -> UiResult<WidgetHandle> {
            self.inner.create_widget(parent, kind, options)
        }

        fn place(&mut self, target: Placeable, placement: &Placement) -> UiResult<()> {
            self.inner.place(target, placement)
        }

        fn create_notebook(&mut self, parent: SurfaceId) -> UiResult<SurfaceId> {
            self.inner.create_notebook(parent)
        }

        fn add_tab(
            &mut self,
            notebook: SurfaceId,
            label: &str,
            options: &TabOptions,
        ) -> UiResult<SurfaceId> {
            self.inner.add_tab(notebook, label, options)
        }

        fn select_tab(&mut self, notebook: SurfaceId, tab: SurfaceId) -> UiResult<()> {
            self.inner.select_tab(notebook, tab)
        }

        fn create_menu_bar(&mut self, window: WindowId) -> UiResult<MenuId> {
            self.inner.create_menu_bar(window)
        }

        fn add_cascade(
            &mut self,
            menu: MenuId,
            label: &str,
            options: &MenuOptions,
        ) -> UiResult<MenuId> {
            self.inner.add_cascade(menu, label, options)
        }

        fn add_command(&mut self, menu: MenuId, label: &str, action: Callback) -> UiResult<()> {
            self.inner.add_command(menu, label, action)
        }

        fn add_separator(&mut self, menu: MenuId) -> UiResult<()> {
            self.inner.add_separator(menu)
        }

        fn destroy_widget(&mut self, widget: WidgetHandle) -> UiResult<()> {
            if self.stuck == Some(widget) {
                return Err(UiError::Host("widget is busy".into()));
            }
            self.inner.destroy_widget(widget)
        }

        fn destroy_surface(&mut self, surface: SurfaceId) -> UiResult<()> {
            self.inner.destroy_surface(surface)
        }
    }

    #[test]
    fn test_dispose_releases_everything_past_a_failure() {
        let mut host = StuckWidget {
            inner: HeadlessHost::new(),
            stuck: None,
        };
        let root = host.create_window(&WindowConfig::default()).unwrap();
        let mut node =
            Node::new(Parent::RootWindow(root), Blank, ContainerOptions::new(), &mut host).unwrap();

        let nombre = node
            .create_widget(&mut host, "nombre", WidgetKind::Entry, WidgetOptions::new())
            .unwrap();
        node.create_widget(&mut host, "ciudad", WidgetKind::Entry, WidgetOptions::new())
            .unwrap();
        let child = node
            .create_component(&mut host, "extras", Blank, ContainerOptions::new())
            .unwrap();
        let child_surface = child.surface();
        let leer = child
            .create_widget(&mut host, "leer", WidgetKind::Checkbutton, WidgetOptions::new())
            .unwrap();
        host.stuck = Some(leer);

        let err = node.dispose(&mut host).unwrap_err();
        assert_eq!(err, UiError::Host("widget is busy".into()));

        // The failing child did not stop the rest of the release.
        assert!(!host.inner.has_surface(child_surface));
        assert!(!host.inner.has_surface(node.surface()));
        assert_eq!(host.inner.widget_kind(nombre), None);
        assert_eq!(host.inner.surface_count(), 0);
        assert_eq!(host.inner.widget_count(), 0);

        node.dispose(&mut host).unwrap();
    }
}
