//! Per-node registry of named children.
//!
//! A node keeps two key spaces, one for primitive widgets and one for nested
//! components. The spaces never share a key: inserting a key that exists in
//! either space fails. Lookups check components first, then widgets.

use indexmap::IndexMap;

use crate::error::{EntryKind, KeyScope, UiError, UiResult};
use crate::host::{WidgetHandle, WidgetKind};
use crate::node::Node;

/// A registered primitive widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEntry {
    pub handle: WidgetHandle,
    pub kind: WidgetKind,
}

/// Result of a lookup.
#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    Component(&'a Node),
    Widget(&'a WidgetEntry),
}

impl<'a> Child<'a> {
    pub fn kind(&self) -> EntryKind {
        match self {
            Child::Component(_) => EntryKind::Component,
            Child::Widget(_) => EntryKind::Widget,
        }
    }

    pub fn as_node(&self) -> Option<&'a Node> {
        match *self {
            Child::Component(node) => Some(node),
            Child::Widget(_) => None,
        }
    }

    pub fn as_widget(&self) -> Option<WidgetHandle> {
        match self {
            Child::Widget(entry) => Some(entry.handle),
            Child::Component(_) => None,
        }
    }
}

/// Mutable result of a lookup.
#[derive(Debug)]
pub enum ChildMut<'a> {
    Component(&'a mut Node),
    Widget(&'a WidgetEntry),
}

impl<'a> ChildMut<'a> {
    pub fn into_node(self) -> Option<&'a mut Node> {
        match self {
            ChildMut::Component(node) => Some(node),
            ChildMut::Widget(_) => None,
        }
    }
}

/// Children of a node, keyed by name, in insertion order.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    widgets: IndexMap<String, WidgetEntry>,
    components: IndexMap<String, Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`UiError::KeyCollision`] if `key` is taken in either space.
    pub fn ensure_vacant(&self, key: &str) -> UiResult<()> {
        if self.components.contains_key(key) {
            return Err(UiError::collision(key, EntryKind::Component));
        }
        if self.widgets.contains_key(key) {
            return Err(UiError::collision(key, EntryKind::Widget));
        }
        Ok(())
    }

    pub fn insert_widget(&mut self, key: impl Into<String>, entry: WidgetEntry) -> UiResult<WidgetHandle> {
        let key = key.into();
        self.ensure_vacant(&key)?;
        let handle = entry.handle;
        self.widgets.insert(key, entry);
        Ok(handle)
    }

    pub fn insert_component(&mut self, key: impl Into<String>, node: Node) -> UiResult<&mut Node> {
        let key = key.into();
        self.ensure_vacant(&key)?;
        let (index, _) = self.components.insert_full(key, node);
        // The index was just inserted.
        Ok(&mut self.components[index])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.components.contains_key(key) || self.widgets.contains_key(key)
    }

    /// Look up a child, components first.
    pub fn lookup(&self, key: &str) -> UiResult<Child<'_>> {
        if let Some(node) = self.components.get(key) {
            return Ok(Child::Component(node));
        }
        if let Some(entry) = self.widgets.get(key) {
            return Ok(Child::Widget(entry));
        }
        tracing::trace!(key, "child lookup failed");
        Err(UiError::not_found(key, KeyScope::Child))
    }

    pub fn lookup_mut(&mut self, key: &str) -> UiResult<ChildMut<'_>> {
        if let Some(node) = self.components.get_mut(key) {
            return Ok(ChildMut::Component(node));
        }
        if let Some(entry) = self.widgets.get(key) {
            return Ok(ChildMut::Widget(entry));
        }
        tracing::trace!(key, "child lookup failed");
        Err(UiError::not_found(key, KeyScope::Child))
    }

    pub fn widget(&self, key: &str) -> Option<&WidgetEntry> {
        self.widgets.get(key)
    }

    pub fn component(&self, key: &str) -> Option<&Node> {
        self.components.get(key)
    }

    pub fn component_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.components.get_mut(key)
    }

    /// Widgets in creation order.
    pub fn widgets(&self) -> impl Iterator<Item = (&str, &WidgetEntry)> + '_ {
        self.widgets.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Widgets of one kind, in creation order.
    pub fn widgets_of_kind<'a>(
        &'a self,
        kind: &'a WidgetKind,
    ) -> impl Iterator<Item = (&'a str, WidgetHandle)> + 'a {
        self.widgets()
            .filter(move |(_, entry)| &entry.kind == kind)
            .map(|(key, entry)| (key, entry.handle))
    }

    /// Components in creation order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &Node)> + '_ {
        self.components.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn len(&self) -> usize {
        self.widgets.len() + self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty() && self.components.is_empty()
    }

    /// Remove every entry, components in reverse creation order.
    pub(crate) fn drain(&mut self) -> (Vec<(String, Node)>, Vec<(String, WidgetEntry)>) {
        let components = self.components.drain(..).rev().collect();
        let widgets = self.widgets.drain(..).rev().collect();
        (components, widgets)
    }
}
