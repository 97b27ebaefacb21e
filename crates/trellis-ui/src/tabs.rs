//! Tabbed nodes.
//!
//! A node whose component reports [`NodeKind::Tabbed`](crate::node::NodeKind)
//! owns a notebook filling its container. Tab pages are addressed by key, and
//! each page hosts nested nodes created with
//! [`create_component_in_tab`](BuildContext::create_component_in_tab).

use indexmap::IndexMap;

use crate::cursor::Placement;
use crate::error::{EntryKind, KeyScope, UiError, UiResult};
use crate::host::{ContainerOptions, Host, Placeable, SurfaceId, TabOptions};
use crate::node::{BuildContext, Component, Frame, Node, Parent, keep_first};

/// A tab page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub surface: SurfaceId,
    pub label: String,
}

/// Notebook and pages of a tabbed node.
#[derive(Debug)]
pub struct TabSet {
    notebook: SurfaceId,
    tabs: IndexMap<String, Tab>,
    active: Option<String>,
}

impl TabSet {
    pub(crate) fn create(parent: SurfaceId, host: &mut dyn Host) -> UiResult<Self> {
        let notebook = host.create_notebook(parent)?;
        host.place(Placeable::Surface(notebook), &Placement::fill())?;
        Ok(Self {
            notebook,
            tabs: IndexMap::new(),
            active: None,
        })
    }

    pub fn notebook(&self) -> SurfaceId {
        self.notebook
    }

    pub fn get(&self, key: &str) -> UiResult<&Tab> {
        self.tabs
            .get(key)
            .ok_or_else(|| UiError::not_found(key, KeyScope::Tab))
    }

    /// Key of the visible page.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Pages in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tab)> + '_ {
        self.tabs.iter().map(|(key, tab)| (key.as_str(), tab))
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub(crate) fn teardown(self, host: &mut dyn Host) -> UiResult<()> {
        let mut first = None;
        for tab in self.tabs.values().rev() {
            keep_first(&mut first, host.destroy_surface(tab.surface));
        }
        keep_first(&mut first, host.destroy_surface(self.notebook));
        first.map_or(Ok(()), Err)
    }
}

impl Frame {
    fn tabs(&self) -> UiResult<&TabSet> {
        self.tabs.as_ref().ok_or(UiError::NotTabbed)
    }

    fn tabs_mut(&mut self) -> UiResult<&mut TabSet> {
        self.tabs.as_mut().ok_or(UiError::NotTabbed)
    }

    pub(crate) fn create_tab(
        &mut self,
        host: &mut dyn Host,
        key: &str,
        label: &str,
        options: TabOptions,
    ) -> UiResult<SurfaceId> {
        let tabs = self.tabs_mut()?;
        if tabs.tabs.contains_key(key) {
            return Err(UiError::collision(key, EntryKind::Tab));
        }

        let surface = host.add_tab(tabs.notebook, label, &options)?;
        host.configure_column(surface, 0, 1)?;
        if let Some(padding) = options.padding {
            host.set_surface_padding(surface, padding)?;
        }
        tracing::trace!(key, label, ?surface, "tab created");

        tabs.tabs.insert(
            key.to_string(),
            Tab {
                surface,
                label: label.to_string(),
            },
        );
        if tabs.active.is_none() {
            tabs.active = Some(key.to_string());
        }
        Ok(surface)
    }

    pub(crate) fn create_component_in_tab<C: Component>(
        &mut self,
        host: &mut dyn Host,
        tab_key: &str,
        key: &str,
        component: C,
        options: ContainerOptions,
    ) -> UiResult<&mut Node> {
        let page = self.tabs()?.get(tab_key)?.surface;
        self.registry.ensure_vacant(key)?;

        let mut node = Node::build(Parent::ContainerFrame(page), component, options, host, key)?;
        // Pages lay out their single child themselves; the outer cursor only
        // decides where inside the page it sits.
        if let Err(err) = host.place(Placeable::Surface(node.surface()), &self.cursor.snapshot()) {
            node.dispose(host)?;
            return Err(err);
        }

        self.registry.insert_component(key, node)
    }

    pub(crate) fn select_tab(&mut self, host: &mut dyn Host, key: &str) -> UiResult<()> {
        let tabs = self.tabs_mut()?;
        let page = tabs.get(key)?.surface;
        host.select_tab(tabs.notebook, page)?;
        tabs.active = Some(key.to_string());
        Ok(())
    }
}

impl Node {
    pub fn is_tabbed(&self) -> bool {
        self.frame.tabs.is_some()
    }

    /// The node's tab pages. Fails with [`UiError::NotTabbed`] on plain nodes.
    pub fn tabs(&self) -> UiResult<&TabSet> {
        self.frame.tabs()
    }

    /// Surface of the page registered as `key`.
    pub fn tab_surface(&self, key: &str) -> UiResult<SurfaceId> {
        Ok(self.frame.tabs()?.get(key)?.surface)
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.frame.tabs.as_ref().and_then(TabSet::active)
    }

    pub fn create_tab(
        &mut self,
        host: &mut dyn Host,
        key: &str,
        label: &str,
        options: TabOptions,
    ) -> UiResult<SurfaceId> {
        self.ensure_live()?;
        self.frame.create_tab(host, key, label, options)
    }

    pub fn create_component_in_tab<C: Component>(
        &mut self,
        host: &mut dyn Host,
        tab_key: &str,
        key: &str,
        component: C,
        options: ContainerOptions,
    ) -> UiResult<&mut Node> {
        self.ensure_live()?;
        self.frame
            .create_component_in_tab(host, tab_key, key, component, options)
    }

    /// Bring the page registered as `key` to the front.
    pub fn select_tab(&mut self, host: &mut dyn Host, key: &str) -> UiResult<()> {
        self.ensure_live()?;
        self.frame.select_tab(host, key)
    }
}

impl<'a> BuildContext<'a> {
    pub fn tabs(&self) -> UiResult<&TabSet> {
        self.frame.tabs()
    }

    pub fn create_tab(&mut self, key: &str, label: &str, options: TabOptions) -> UiResult<SurfaceId> {
        self.frame.create_tab(&mut *self.host, key, label, options)
    }

    pub fn create_component_in_tab<C: Component>(
        &mut self,
        tab_key: &str,
        key: &str,
        component: C,
        options: ContainerOptions,
    ) -> UiResult<&mut Node> {
        self.frame
            .create_component_in_tab(&mut *self.host, tab_key, key, component, options)
    }

    pub fn select_tab(&mut self, key: &str) -> UiResult<()> {
        self.frame.select_tab(&mut *self.host, key)
    }
}
