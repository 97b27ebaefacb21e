//! The capability a UI toolkit provides to the composition layer.
//!
//! Trellis never talks to a toolkit directly. Everything it needs (creating
//! surfaces and widgets, grid placement, notebooks, menus) goes through the
//! [`Host`] trait, and toolkit objects are referred to by the small copyable
//! handles defined here.

use std::rc::Rc;

use crate::cursor::Placement;
use crate::error::UiResult;

/// Zero-argument callback attached to buttons and menu commands.
pub type Callback = Rc<dyn Fn()>;

/// Handle to a top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub usize);

/// Handle to a container surface (plain frame, titled group, notebook or tab page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub usize);

/// Handle to a primitive widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetHandle(pub usize);

/// Handle to a menu bar or submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(pub usize);

/// Where a new surface is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attach {
    Window(WindowId),
    Surface(SurfaceId),
    Detached,
}

/// Anything the host can grid-place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeable {
    Widget(WidgetHandle),
    Surface(SurfaceId),
}

/// Kinds of primitive widgets a node can create.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Label,
    Entry,
    Button,
    Combobox,
    Checkbutton,
    Radiobutton,
    ScrolledText,
    /// Toolkit-specific widget identified by name.
    Custom(String),
}

impl WidgetKind {
    pub fn name(&self) -> &str {
        match self {
            WidgetKind::Label => "label",
            WidgetKind::Entry => "entry",
            WidgetKind::Button => "button",
            WidgetKind::Combobox => "combobox",
            WidgetKind::Checkbutton => "checkbutton",
            WidgetKind::Radiobutton => "radiobutton",
            WidgetKind::ScrolledText => "scrolled_text",
            WidgetKind::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Construction options for a primitive widget.
#[derive(Clone, Default)]
pub struct WidgetOptions {
    /// Caption of labels, buttons and check/radio buttons.
    pub text: Option<String>,
    /// Choices of a combobox.
    pub values: Vec<String>,
    /// Index of the initially selected choice.
    pub current: Option<usize>,
    /// Value a radio button sets on its group when selected.
    pub value: Option<i32>,
    /// Radio group name; radio buttons sharing a group are exclusive.
    pub group: Option<String>,
    /// Whether the user can type into the widget.
    pub readonly: bool,
    pub command: Option<Callback>,
}

impl WidgetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn current(mut self, index: usize) -> Self {
        self.current = Some(index);
        self
    }

    pub fn value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn command<F>(mut self, command: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.command = Some(Rc::new(command));
        self
    }
}

impl std::fmt::Debug for WidgetOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetOptions")
            .field("text", &self.text)
            .field("values", &self.values)
            .field("current", &self.current)
            .field("value", &self.value)
            .field("group", &self.group)
            .field("readonly", &self.readonly)
            .field("command", &self.command.is_some())
            .finish()
    }
}

/// Construction options for a node's container surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerOptions {
    /// Render the container as a titled group box.
    pub title: Option<String>,
    /// Inner padding in pixels.
    pub padding: Option<u16>,
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            padding: None,
        }
    }

    pub fn padding(mut self, padding: u16) -> Self {
        self.padding = Some(padding);
        self
    }
}

/// Options for a tab page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabOptions {
    pub padding: Option<u16>,
}

impl TabOptions {
    pub fn padded(padding: u16) -> Self {
        Self {
            padding: Some(padding),
        }
    }
}

/// Options for a top-level menu entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuOptions {
    /// Whether the submenu can be torn off into its own window.
    pub tearoff: bool,
}

/// Top-level window configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    /// Initial size in pixels.
    pub size: (u32, u32),
    pub min_size: (u32, u32),
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            size: (640, 480),
            min_size: (640, 480),
        }
    }
}

impl WindowConfig {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width.max(self.min_size.0), height.max(self.min_size.1));
        self
    }

    pub fn min_size(mut self, width: u32, height: u32) -> Self {
        self.min_size = (width, height);
        self.size = (self.size.0.max(width), self.size.1.max(height));
        self
    }
}

/// Primitives a UI toolkit exposes to Trellis.
///
/// All calls happen on the UI thread. Handles stay valid until destroyed.
pub trait Host {
    fn create_window(&mut self, config: &WindowConfig) -> UiResult<WindowId>;

    fn has_window(&self, window: WindowId) -> bool;

    fn has_surface(&self, surface: SurfaceId) -> bool;

    /// Create a container surface. Titled options produce a group box.
    fn create_surface(&mut self, attach: Attach, options: &ContainerOptions)
    -> UiResult<SurfaceId>;

    fn set_surface_padding(&mut self, surface: SurfaceId, padding: u16) -> UiResult<()>;

    /// Set the stretch weight of a grid column inside `surface`.
    fn configure_column(&mut self, surface: SurfaceId, column: u16, weight: u16) -> UiResult<()>;

    /// Set the stretch weight of a grid row inside `surface`.
    fn configure_row(&mut self, surface: SurfaceId, row: u16, weight: u16) -> UiResult<()>;

    fn create_widget(
        &mut self,
        parent: SurfaceId,
        kind: &WidgetKind,
        options: WidgetOptions,
    ) -> UiResult<WidgetHandle>;

    /// Grid-place a widget or surface inside its parent. Placing again moves it.
    fn place(&mut self, target: Placeable, placement: &Placement) -> UiResult<()>;

    /// Create a notebook (tab strip) inside `parent`.
    fn create_notebook(&mut self, parent: SurfaceId) -> UiResult<SurfaceId>;

    /// Append a tab page to a notebook and return the page's surface.
    fn add_tab(&mut self, notebook: SurfaceId, label: &str, options: &TabOptions)
    -> UiResult<SurfaceId>;

    fn select_tab(&mut self, notebook: SurfaceId, tab: SurfaceId) -> UiResult<()>;

    /// Create the menu bar of a window, replacing any previous one.
    fn create_menu_bar(&mut self, window: WindowId) -> UiResult<MenuId>;

    /// Append a cascading entry to `menu` and return its submenu.
    fn add_cascade(&mut self, menu: MenuId, label: &str, options: &MenuOptions)
    -> UiResult<MenuId>;

    fn add_command(&mut self, menu: MenuId, label: &str, action: Callback) -> UiResult<()>;

    fn add_separator(&mut self, menu: MenuId) -> UiResult<()>;

    fn destroy_widget(&mut self, widget: WidgetHandle) -> UiResult<()>;

    /// Destroy a surface together with everything still inside it.
    fn destroy_surface(&mut self, surface: SurfaceId) -> UiResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_options_builder() {
        let options = WidgetOptions::new()
            .values(["Tepeyac", "Morelos"])
            .current(0)
            .readonly(true);
        assert_eq!(options.values, vec!["Tepeyac".to_string(), "Morelos".to_string()]);
        assert_eq!(options.current, Some(0));
        assert!(options.readonly);
        assert!(options.command.is_none());
    }

    #[test]
    fn test_widget_kind_names() {
        assert_eq!(WidgetKind::Entry.to_string(), "entry");
        assert_eq!(WidgetKind::Custom("spinbox".into()).name(), "spinbox");
    }

    #[test]
    fn test_window_config_respects_min_size() {
        let config = WindowConfig::titled("My Program").size(320, 200);
        assert_eq!(config.size, (640, 480));

        let config = WindowConfig::default().min_size(100, 100).size(300, 200);
        assert_eq!(config.size, (300, 200));
    }
}
