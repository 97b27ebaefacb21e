//! Two-level command menu attached to the root window.
//!
//! Provides:
//! - Top-level entries, each owning a submenu registered under a key
//! - Command items with a zero-argument action
//! - Separators
//!
//! Entries only accumulate; nothing is removed or reordered.
//!
//! # Example
//!
//! ```
//! use trellis_ui::{Blank, ContainerOptions, HeadlessHost, Host, MenuBuilder, MenuOptions, Node,
//!     Parent, WindowConfig};
//!
//! let mut host = HeadlessHost::new();
//! let window = host.create_window(&WindowConfig::titled("My Program")).unwrap();
//! let main = Node::new(Parent::RootWindow(window), Blank, ContainerOptions::new(), &mut host)
//!     .unwrap();
//!
//! let mut menu = MenuBuilder::new(&main, &mut host).unwrap();
//! menu.create_item(&mut host, "system", "System", MenuOptions::default()).unwrap();
//! menu.create_submenu_item(&mut host, "system", "Print", || println!("Print!")).unwrap();
//! menu.create_submenu_separator(&mut host, "system").unwrap();
//! menu.create_submenu_item(&mut host, "system", "Quit", || {}).unwrap();
//! ```

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{EntryKind, KeyScope, UiError, UiResult};
use crate::host::{Callback, Host, MenuId, MenuOptions, WindowId};
use crate::node::{Node, Parent};

/// Callback type for menu commands.
pub type MenuCallback = Callback;

/// An entry of a submenu, as recorded by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Action { label: String },
    Separator,
}

impl MenuEntry {
    pub fn label(&self) -> Option<&str> {
        match self {
            MenuEntry::Action { label } => Some(label),
            MenuEntry::Separator => None,
        }
    }
}

#[derive(Debug)]
struct Submenu {
    id: MenuId,
    label: String,
    entries: Vec<MenuEntry>,
}

/// Builder for the menu bar of a window.
#[derive(Debug)]
pub struct MenuBuilder {
    window: WindowId,
    bar: MenuId,
    submenus: IndexMap<String, Submenu>,
}

impl MenuBuilder {
    /// Attach a menu bar to the window `node` is bound to.
    ///
    /// Fails with [`UiError::InvalidParentCapability`] unless `node` was
    /// created directly under a root window.
    pub fn new(node: &Node, host: &mut dyn Host) -> UiResult<Self> {
        match node.parent() {
            Parent::RootWindow(window) => Self::for_window(window, host),
            other => Err(UiError::InvalidParentCapability(format!(
                "menus attach to a root window, node is attached to {:?}",
                other
            ))),
        }
    }

    /// Attach a menu bar to `window` directly.
    pub fn for_window(window: WindowId, host: &mut dyn Host) -> UiResult<Self> {
        if !host.has_window(window) {
            return Err(UiError::InvalidParentCapability(format!(
                "window {:?} does not exist",
                window
            )));
        }
        let bar = host.create_menu_bar(window)?;
        tracing::debug!(?window, ?bar, "menu bar created");
        Ok(Self {
            window,
            bar,
            submenus: IndexMap::new(),
        })
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn bar(&self) -> MenuId {
        self.bar
    }

    /// Add a top-level entry with an empty submenu registered under `key`.
    pub fn create_item(
        &mut self,
        host: &mut dyn Host,
        key: &str,
        label: &str,
        options: MenuOptions,
    ) -> UiResult<MenuId> {
        if self.submenus.contains_key(key) {
            return Err(UiError::collision(key, EntryKind::Submenu));
        }
        let id = host.add_cascade(self.bar, label, &options)?;
        tracing::trace!(key, label, ?id, "menu item created");
        self.submenus.insert(
            key.to_string(),
            Submenu {
                id,
                label: label.to_string(),
                entries: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Append a command to the submenu registered as `submenu_key`.
    pub fn create_submenu_item<F>(
        &mut self,
        host: &mut dyn Host,
        submenu_key: &str,
        label: &str,
        action: F,
    ) -> UiResult<()>
    where
        F: Fn() + 'static,
    {
        let submenu = self.submenu_entry(submenu_key)?;
        host.add_command(submenu.id, label, Rc::new(action))?;
        submenu.entries.push(MenuEntry::Action {
            label: label.to_string(),
        });
        Ok(())
    }

    /// Append a divider to the submenu registered as `submenu_key`.
    pub fn create_submenu_separator(&mut self, host: &mut dyn Host, submenu_key: &str) -> UiResult<()> {
        let submenu = self.submenu_entry(submenu_key)?;
        host.add_separator(submenu.id)?;
        submenu.entries.push(MenuEntry::Separator);
        Ok(())
    }

    pub fn submenu(&self, key: &str) -> UiResult<MenuId> {
        self.submenus
            .get(key)
            .map(|submenu| submenu.id)
            .ok_or_else(|| UiError::not_found(key, KeyScope::Submenu))
    }

    /// Entries of a submenu in the order they were added.
    pub fn entries(&self, key: &str) -> UiResult<&[MenuEntry]> {
        self.submenus
            .get(key)
            .map(|submenu| submenu.entries.as_slice())
            .ok_or_else(|| UiError::not_found(key, KeyScope::Submenu))
    }

    /// Top-level labels in the order they were added.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.submenus.values().map(|submenu| submenu.label.as_str())
    }

    fn submenu_entry(&mut self, key: &str) -> UiResult<&mut Submenu> {
        self.submenus
            .get_mut(key)
            .ok_or_else(|| UiError::not_found(key, KeyScope::Submenu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use crate::host::{ContainerOptions, WindowConfig};
    use crate::node::Blank;
    use std::cell::Cell;

    fn main_node(host: &mut HeadlessHost) -> Node {
        let window = host.create_window(&WindowConfig::default()).unwrap();
        Node::new(Parent::RootWindow(window), Blank, ContainerOptions::new(), host).unwrap()
    }

    #[test]
    fn test_items_accumulate_in_order() {
        let mut host = HeadlessHost::new();
        let node = main_node(&mut host);
        let mut menu = MenuBuilder::new(&node, &mut host).unwrap();

        menu.create_item(&mut host, "sistema", "Sistema", MenuOptions::default())
            .unwrap();
        menu.create_item(&mut host, "help", "Ayuda", MenuOptions::default())
            .unwrap();
        menu.create_submenu_item(&mut host, "sistema", "Imprimir", || {})
            .unwrap();
        menu.create_submenu_separator(&mut host, "sistema").unwrap();
        menu.create_submenu_item(&mut host, "sistema", "Salir", || {})
            .unwrap();

        assert_eq!(menu.labels().collect::<Vec<_>>(), vec!["Sistema", "Ayuda"]);
        let labels: Vec<_> = menu
            .entries("sistema")
            .unwrap()
            .iter()
            .map(MenuEntry::label)
            .collect();
        assert_eq!(labels, vec![Some("Imprimir"), None, Some("Salir")]);
        assert!(menu.entries("help").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_submenu() {
        let mut host = HeadlessHost::new();
        let node = main_node(&mut host);
        let mut menu = MenuBuilder::new(&node, &mut host).unwrap();

        let err = menu
            .create_submenu_item(&mut host, "missing", "Item", || {})
            .unwrap_err();
        assert_eq!(err, UiError::not_found("missing", KeyScope::Submenu));
        assert!(menu.create_submenu_separator(&mut host, "missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_item_key() {
        let mut host = HeadlessHost::new();
        let node = main_node(&mut host);
        let mut menu = MenuBuilder::new(&node, &mut host).unwrap();
        menu.create_item(&mut host, "help", "Help", MenuOptions::default())
            .unwrap();
        let err = menu
            .create_item(&mut host, "help", "Help", MenuOptions::default())
            .unwrap_err();
        assert_eq!(err, UiError::collision("help", EntryKind::Submenu));
    }

    #[test]
    fn test_requires_root_window_node() {
        let mut host = HeadlessHost::new();
        let node = Node::new(Parent::Detached, Blank, ContainerOptions::new(), &mut host).unwrap();
        let err = MenuBuilder::new(&node, &mut host).unwrap_err();
        assert!(matches!(err, UiError::InvalidParentCapability(_)));
    }

    #[test]
    fn test_action_fires_through_host() {
        let mut host = HeadlessHost::new();
        let node = main_node(&mut host);
        let mut menu = MenuBuilder::new(&node, &mut host).unwrap();
        let fired = Rc::new(Cell::new(0));

        menu.create_item(&mut host, "help", "Ayuda", MenuOptions::default())
            .unwrap();
        let counter = fired.clone();
        menu.create_submenu_item(&mut host, "help", "Acerca de", move || {
            counter.set(counter.get() + 1)
        })
        .unwrap();

        let submenu = menu.submenu("help").unwrap();
        host.activate_menu_item(submenu, "Acerca de").unwrap();
        host.activate_menu_item(submenu, "Acerca de").unwrap();
        assert_eq!(fired.get(), 2);
    }
}
