//! In-memory host toolkit.
//!
//! [`HeadlessHost`] implements [`Host`] without a display. It keeps windows,
//! surfaces, widgets and menus in memory, resolves grid placement with Taffy,
//! and can fire stored callbacks. Use it for tests, benchmarks and tooling
//! that needs to reason about a screen's layout.

use indexmap::IndexMap;
use taffy::style_helpers::line;
use taffy::{
    AlignItems, AvailableSpace, Dimension, Display, GridPlacement, LengthPercentage,
    LengthPercentageAuto, Line, MaxTrackSizingFunction, MinTrackSizingFunction,
    NonRepeatedTrackSizingFunction, Style, TaffyTree, TrackSizingFunction,
};
use trellis_core::alloc::HashMap;
use trellis_core::geometry::Rect;
use trellis_core::profiling::profile_function;

use crate::cursor::{Alignment, Placement};
use crate::error::{UiError, UiResult};
use crate::host::{
    Attach, Callback, ContainerOptions, Host, MenuId, MenuOptions, Placeable, SurfaceId,
    TabOptions, WidgetHandle, WidgetKind, WidgetOptions, WindowConfig, WindowId,
};

/// Approximate glyph advance used to size text widgets.
pub const CHAR_WIDTH: f32 = 7.0;

/// Height of one line of text.
pub const LINE_HEIGHT: f32 = 20.0;

/// Height reserved for a notebook's tab strip.
pub const TAB_BAR_HEIGHT: f32 = 24.0;

/// Height reserved for the caption of a titled group.
pub const GROUP_CAPTION_HEIGHT: f32 = 16.0;

/// Highest grid track index Taffy can address.
pub const MAX_TRACK: u16 = i16::MAX as u16 - 1;

/// Kind of container surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Frame,
    Group,
    Notebook,
    Page,
}

/// Absolute rectangles of every visible item of a window.
#[derive(Debug, Default, Clone)]
pub struct HeadlessLayout {
    rects: HashMap<Placeable, Rect<f32>>,
}

impl HeadlessLayout {
    pub fn get(&self, item: Placeable) -> Option<Rect<f32>> {
        self.rects.get(&item).copied()
    }

    pub fn widget(&self, widget: WidgetHandle) -> Option<Rect<f32>> {
        self.get(Placeable::Widget(widget))
    }

    pub fn surface(&self, surface: SurfaceId) -> Option<Rect<f32>> {
        self.get(Placeable::Surface(surface))
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

struct WindowRecord {
    config: WindowConfig,
    node: taffy::NodeId,
    children: Vec<SurfaceId>,
    menu_bar: Option<MenuId>,
}

struct SurfaceRecord {
    kind: SurfaceKind,
    attach: Attach,
    title: Option<String>,
    node: taffy::NodeId,
    padding: u16,
    placement: Option<Placement>,
    column_weights: HashMap<u16, u16>,
    row_weights: HashMap<u16, u16>,
    children: Vec<Placeable>,
    /// Notebook pages only: whether the page is behind another one.
    hidden: bool,
    /// Notebooks only: the page in front.
    active_page: Option<SurfaceId>,
}

struct WidgetRecord {
    kind: WidgetKind,
    parent: SurfaceId,
    node: taffy::NodeId,
    placement: Option<Placement>,
    options: WidgetOptions,
    text_value: String,
    checked: bool,
}

enum HostMenuEntry {
    Cascade { label: String, menu: MenuId },
    Command { label: String, action: Callback },
    Separator,
}

struct MenuRecord {
    tearoff: bool,
    entries: Vec<HostMenuEntry>,
}

/// Display-less implementation of [`Host`].
pub struct HeadlessHost {
    taffy: TaffyTree<()>,
    windows: IndexMap<WindowId, WindowRecord>,
    surfaces: IndexMap<SurfaceId, SurfaceRecord>,
    widgets: IndexMap<WidgetHandle, WidgetRecord>,
    menus: IndexMap<MenuId, MenuRecord>,
    radio_groups: HashMap<String, i32>,
    next_id: usize,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

fn taffy_error(err: taffy::TaffyError) -> UiError {
    UiError::Host(err.to_string())
}

fn unknown(what: &str, id: impl std::fmt::Debug) -> UiError {
    UiError::Host(format!("unknown {} {:?}", what, id))
}

fn grid_line(index: u16) -> GridPlacement {
    line(index.min(MAX_TRACK) as i16 + 1)
}

fn check_track(axis: &str, index: u16) -> UiResult<()> {
    if index > MAX_TRACK {
        return Err(UiError::Host(format!(
            "{} {} is past the last grid track {}",
            axis, index, MAX_TRACK
        )));
    }
    Ok(())
}

fn axis_alignment(alignment: Alignment, start: Alignment, end: Alignment) -> AlignItems {
    match (alignment.contains(start), alignment.contains(end)) {
        (true, true) => AlignItems::Stretch,
        (true, false) => AlignItems::Start,
        (false, true) => AlignItems::End,
        (false, false) => AlignItems::Center,
    }
}

fn track(weight: u16) -> TrackSizingFunction {
    let max = if weight > 0 {
        MaxTrackSizingFunction::Fraction(weight as f32)
    } else {
        MaxTrackSizingFunction::Auto
    };
    TrackSizingFunction::Single(NonRepeatedTrackSizingFunction {
        min: MinTrackSizingFunction::Auto,
        max,
    })
}

fn tracks(weights: &HashMap<u16, u16>, used: u16) -> Vec<TrackSizingFunction> {
    let declared = weights
        .keys()
        .map(|index| index.saturating_add(1))
        .max()
        .unwrap_or(0);
    (0..used.max(declared).min(MAX_TRACK + 1))
        .map(|index| track(weights.get(&index).copied().unwrap_or(0)))
        .collect()
}

fn uniform_padding(padding: f32, extra_top: f32) -> taffy::Rect<LengthPercentage> {
    taffy::Rect {
        left: LengthPercentage::Length(padding),
        right: LengthPercentage::Length(padding),
        top: LengthPercentage::Length(padding + extra_top),
        bottom: LengthPercentage::Length(padding),
    }
}

/// Space a surface keeps above its grid for its own decoration.
fn reserved_top(kind: SurfaceKind) -> f32 {
    match kind {
        SurfaceKind::Group => GROUP_CAPTION_HEIGHT,
        SurfaceKind::Notebook => TAB_BAR_HEIGHT,
        SurfaceKind::Frame | SurfaceKind::Page => 0.0,
    }
}

fn apply_placement(style: &mut Style, placement: &Placement) {
    style.grid_row = Line {
        start: grid_line(placement.row),
        end: GridPlacement::Span(placement.row_span),
    };
    style.grid_column = Line {
        start: grid_line(placement.column),
        end: GridPlacement::Span(placement.column_span),
    };
    style.margin = taffy::Rect {
        left: LengthPercentageAuto::Length(placement.pad_x.before() as f32),
        right: LengthPercentageAuto::Length(placement.pad_x.after() as f32),
        top: LengthPercentageAuto::Length(placement.pad_y.before() as f32),
        bottom: LengthPercentageAuto::Length(placement.pad_y.after() as f32),
    };
    style.justify_self = Some(axis_alignment(
        placement.alignment,
        Alignment::WEST,
        Alignment::EAST,
    ));
    style.align_self = Some(axis_alignment(
        placement.alignment,
        Alignment::NORTH,
        Alignment::SOUTH,
    ));
}

/// Minimum size of a widget, from its kind and caption.
fn intrinsic_size(kind: &WidgetKind, text: Option<&str>) -> (f32, f32) {
    let chars = text.map(|t| t.chars().count()).unwrap_or(0) as f32;
    match kind {
        WidgetKind::Label | WidgetKind::Custom(_) => (chars * CHAR_WIDTH, LINE_HEIGHT),
        WidgetKind::Entry => (20.0 * CHAR_WIDTH, LINE_HEIGHT + 4.0),
        WidgetKind::Button => (chars * CHAR_WIDTH + 16.0, LINE_HEIGHT + 8.0),
        WidgetKind::Combobox => (20.0 * CHAR_WIDTH + 20.0, LINE_HEIGHT + 4.0),
        WidgetKind::Checkbutton | WidgetKind::Radiobutton => {
            (chars * CHAR_WIDTH + 20.0, LINE_HEIGHT)
        }
        WidgetKind::ScrolledText => (40.0 * CHAR_WIDTH, 6.0 * LINE_HEIGHT),
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            windows: IndexMap::new(),
            surfaces: IndexMap::new(),
            widgets: IndexMap::new(),
            menus: IndexMap::new(),
            radio_groups: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn surface(&self, surface: SurfaceId) -> UiResult<&SurfaceRecord> {
        self.surfaces
            .get(&surface)
            .ok_or_else(|| unknown("surface", surface))
    }

    fn surface_mut(&mut self, surface: SurfaceId) -> UiResult<&mut SurfaceRecord> {
        self.surfaces
            .get_mut(&surface)
            .ok_or_else(|| unknown("surface", surface))
    }

    fn widget(&self, widget: WidgetHandle) -> UiResult<&WidgetRecord> {
        self.widgets
            .get(&widget)
            .ok_or_else(|| unknown("widget", widget))
    }

    fn widget_mut(&mut self, widget: WidgetHandle) -> UiResult<&mut WidgetRecord> {
        self.widgets
            .get_mut(&widget)
            .ok_or_else(|| unknown("widget", widget))
    }

    fn menu_mut(&mut self, menu: MenuId) -> UiResult<&mut MenuRecord> {
        self.menus.get_mut(&menu).ok_or_else(|| unknown("menu", menu))
    }

    fn new_surface(
        &mut self,
        kind: SurfaceKind,
        attach: Attach,
        title: Option<String>,
        padding: u16,
        mut style: Style,
    ) -> UiResult<SurfaceId> {
        let parent_node = match attach {
            Attach::Window(window) => Some(
                self.windows
                    .get(&window)
                    .ok_or_else(|| unknown("window", window))?
                    .node,
            ),
            Attach::Surface(parent) => Some(self.surface(parent)?.node),
            Attach::Detached => None,
        };

        style.padding = uniform_padding(padding as f32, reserved_top(kind));
        style.display = Display::None;
        let node = self.taffy.new_leaf(style).map_err(taffy_error)?;
        if let Some(parent_node) = parent_node {
            self.taffy.add_child(parent_node, node).map_err(taffy_error)?;
        }

        let surface = SurfaceId(self.next_id());
        match attach {
            Attach::Window(window) => {
                if let Some(record) = self.windows.get_mut(&window) {
                    record.children.push(surface);
                }
            }
            Attach::Surface(parent) => {
                self.surface_mut(parent)?.children.push(Placeable::Surface(surface));
            }
            Attach::Detached => {}
        }

        self.surfaces.insert(
            surface,
            SurfaceRecord {
                kind,
                attach,
                title,
                node,
                padding,
                placement: None,
                column_weights: HashMap::new(),
                row_weights: HashMap::new(),
                children: Vec::new(),
                hidden: false,
                active_page: None,
            },
        );
        Ok(surface)
    }

    /// Re-derive a surface's display from its placement and visibility.
    fn refresh_display(&mut self, surface: SurfaceId) -> UiResult<()> {
        let record = self.surface(surface)?;
        let visible = record.placement.is_some() && !record.hidden;
        let node = record.node;
        let mut style = self.taffy.style(node).map_err(taffy_error)?.clone();
        style.display = if visible { Display::Grid } else { Display::None };
        self.taffy.set_style(node, style).map_err(taffy_error)
    }

    /// Rebuild grid templates from column/row weights and placed children.
    fn sync_tracks(&mut self) -> UiResult<()> {
        let mut updates = Vec::new();
        for record in self.surfaces.values() {
            if record.kind == SurfaceKind::Notebook {
                continue;
            }
            let (mut columns, mut rows) = (0u16, 0u16);
            for child in &record.children {
                let placement = match child {
                    Placeable::Widget(widget) => self.widgets.get(widget).and_then(|w| w.placement),
                    Placeable::Surface(surface) => {
                        self.surfaces.get(surface).and_then(|s| s.placement)
                    }
                };
                if let Some(p) = placement {
                    columns = columns.max(p.column.saturating_add(p.column_span));
                    rows = rows.max(p.row.saturating_add(p.row_span));
                }
            }
            updates.push((
                record.node,
                tracks(&record.column_weights, columns),
                tracks(&record.row_weights, rows),
            ));
        }

        for (node, columns, rows) in updates {
            let mut style = self.taffy.style(node).map_err(taffy_error)?.clone();
            style.grid_template_columns = columns;
            style.grid_template_rows = rows;
            self.taffy.set_style(node, style).map_err(taffy_error)?;
        }
        Ok(())
    }

    /// Resolve the layout of a window.
    pub fn compute_layout(&mut self, window: WindowId) -> UiResult<HeadlessLayout> {
        profile_function!();

        self.sync_tracks()?;
        let record = self
            .windows
            .get(&window)
            .ok_or_else(|| unknown("window", window))?;
        let (width, height) = record.config.size;
        let root = record.node;
        let children = record.children.clone();

        self.taffy
            .compute_layout(
                root,
                taffy::Size {
                    width: AvailableSpace::Definite(width as f32),
                    height: AvailableSpace::Definite(height as f32),
                },
            )
            .map_err(taffy_error)?;

        let mut layout = HeadlessLayout::default();
        for surface in children {
            self.collect(Placeable::Surface(surface), 0.0, 0.0, &mut layout)?;
        }
        tracing::trace!(?window, items = layout.len(), "layout computed");
        Ok(layout)
    }

    fn collect(
        &self,
        item: Placeable,
        origin_x: f32,
        origin_y: f32,
        layout: &mut HeadlessLayout,
    ) -> UiResult<()> {
        let (node, children) = match item {
            Placeable::Widget(widget) => {
                let record = self.widget(widget)?;
                if record.placement.is_none() {
                    return Ok(());
                }
                (record.node, &[] as &[Placeable])
            }
            Placeable::Surface(surface) => {
                let record = self.surface(surface)?;
                if record.placement.is_none() || record.hidden {
                    return Ok(());
                }
                (record.node, record.children.as_slice())
            }
        };

        let computed = self.taffy.layout(node).map_err(taffy_error)?;
        let rect = Rect::new(
            origin_x + computed.location.x,
            origin_y + computed.location.y,
            computed.size.width,
            computed.size.height,
        );
        layout.rects.insert(item, rect);

        for child in children {
            self.collect(*child, rect.x, rect.y, layout)?;
        }
        Ok(())
    }

    pub fn window_title(&self, window: WindowId) -> Option<&str> {
        self.windows.get(&window).map(|w| w.config.title.as_str())
    }

    pub fn menu_bar(&self, window: WindowId) -> Option<MenuId> {
        self.windows.get(&window).and_then(|w| w.menu_bar)
    }

    pub fn placement(&self, item: Placeable) -> Option<Placement> {
        match item {
            Placeable::Widget(widget) => self.widgets.get(&widget).and_then(|w| w.placement),
            Placeable::Surface(surface) => self.surfaces.get(&surface).and_then(|s| s.placement),
        }
    }

    pub fn surface_attach(&self, surface: SurfaceId) -> Option<Attach> {
        self.surfaces.get(&surface).map(|s| s.attach)
    }

    pub fn surface_kind(&self, surface: SurfaceId) -> Option<SurfaceKind> {
        self.surfaces.get(&surface).map(|s| s.kind)
    }

    pub fn surface_title(&self, surface: SurfaceId) -> Option<&str> {
        self.surfaces.get(&surface).and_then(|s| s.title.as_deref())
    }

    pub fn surface_padding(&self, surface: SurfaceId) -> Option<u16> {
        self.surfaces.get(&surface).map(|s| s.padding)
    }

    /// Weight of a grid column; 0 when never configured.
    pub fn column_weight(&self, surface: SurfaceId, column: u16) -> u16 {
        self.surfaces
            .get(&surface)
            .and_then(|s| s.column_weights.get(&column).copied())
            .unwrap_or(0)
    }

    pub fn row_weight(&self, surface: SurfaceId, row: u16) -> u16 {
        self.surfaces
            .get(&surface)
            .and_then(|s| s.row_weights.get(&row).copied())
            .unwrap_or(0)
    }

    /// Whether `surface` is nested, at any depth, inside `ancestor`.
    pub fn is_descendant(&self, surface: SurfaceId, ancestor: SurfaceId) -> bool {
        let mut current = self.surface_attach(surface);
        while let Some(Attach::Surface(parent)) = current {
            if parent == ancestor {
                return true;
            }
            current = self.surface_attach(parent);
        }
        false
    }

    pub fn widget_parent(&self, widget: WidgetHandle) -> Option<SurfaceId> {
        self.widgets.get(&widget).map(|w| w.parent)
    }

    pub fn widget_kind(&self, widget: WidgetHandle) -> Option<&WidgetKind> {
        self.widgets.get(&widget).map(|w| &w.kind)
    }

    /// Caption of a label, button or check/radio button.
    pub fn widget_text(&self, widget: WidgetHandle) -> Option<&str> {
        self.widgets
            .get(&widget)
            .and_then(|w| w.options.text.as_deref())
    }

    /// Current value: typed text, chosen combobox entry, or "1"/"0" for
    /// check and radio buttons.
    pub fn value(&self, widget: WidgetHandle) -> Option<String> {
        let record = self.widgets.get(&widget)?;
        let value = match record.kind {
            WidgetKind::Checkbutton | WidgetKind::Radiobutton => {
                let flag = if self.is_selected(widget) { "1" } else { "0" };
                flag.to_string()
            }
            _ => record.text_value.clone(),
        };
        Some(value)
    }

    /// Whether a check button is ticked or a radio button is its group's choice.
    pub fn is_selected(&self, widget: WidgetHandle) -> bool {
        let Some(record) = self.widgets.get(&widget) else {
            return false;
        };
        match record.kind {
            WidgetKind::Checkbutton => record.checked,
            WidgetKind::Radiobutton => match (&record.options.group, record.options.value) {
                (Some(group), Some(value)) => self.radio_groups.get(group) == Some(&value),
                _ => record.checked,
            },
            _ => false,
        }
    }

    /// Replace the text of an entry-like widget.
    ///
    /// Read-only comboboxes only accept one of their values.
    pub fn set_value(&mut self, widget: WidgetHandle, value: impl Into<String>) -> UiResult<()> {
        let value = value.into();
        let record = self.widget_mut(widget)?;
        match record.kind {
            WidgetKind::Combobox if record.options.readonly => {
                if !record.options.values.contains(&value) {
                    return Err(UiError::Host(format!(
                        "'{}' is not a choice of combobox {:?}",
                        value, widget
                    )));
                }
                record.text_value = value;
            }
            WidgetKind::Entry | WidgetKind::Combobox | WidgetKind::ScrolledText => {
                if record.options.readonly {
                    return Err(UiError::Host(format!("widget {:?} is read-only", widget)));
                }
                record.text_value = value;
            }
            _ => {
                return Err(UiError::Host(format!(
                    "widget {:?} of kind {} has no text value",
                    widget, record.kind
                )));
            }
        }
        Ok(())
    }

    /// Simulate a click: toggles check buttons, selects radio buttons and
    /// runs the widget's command.
    pub fn click(&mut self, widget: WidgetHandle) -> UiResult<()> {
        let record = self.widget_mut(widget)?;
        match record.kind {
            WidgetKind::Checkbutton => record.checked = !record.checked,
            WidgetKind::Radiobutton => {
                record.checked = true;
                if let (Some(group), Some(value)) = (record.options.group.clone(), record.options.value) {
                    self.radio_groups.insert(group, value);
                }
            }
            _ => {}
        }

        let command = self.widget(widget)?.options.command.clone();
        if let Some(command) = command {
            command();
        }
        Ok(())
    }

    /// Labels of a menu's entries; separators are `None`.
    pub fn menu_labels(&self, menu: MenuId) -> Vec<Option<&str>> {
        self.menus
            .get(&menu)
            .map(|record| {
                record
                    .entries
                    .iter()
                    .map(|entry| match entry {
                        HostMenuEntry::Cascade { label, .. } | HostMenuEntry::Command { label, .. } => {
                            Some(label.as_str())
                        }
                        HostMenuEntry::Separator => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn menu_tearoff(&self, menu: MenuId) -> Option<bool> {
        self.menus.get(&menu).map(|record| record.tearoff)
    }

    /// Run the command labelled `label` in `menu`.
    pub fn activate_menu_item(&mut self, menu: MenuId, label: &str) -> UiResult<()> {
        let action = self
            .menu_mut(menu)?
            .entries
            .iter()
            .find_map(|entry| match entry {
                HostMenuEntry::Command { label: l, action } if l == label => Some(action.clone()),
                _ => None,
            })
            .ok_or_else(|| UiError::Host(format!("menu {:?} has no command '{}'", menu, label)))?;
        action();
        Ok(())
    }

    /// Pages of a notebook in creation order.
    pub fn pages(&self, notebook: SurfaceId) -> Vec<SurfaceId> {
        self.surfaces
            .get(&notebook)
            .map(|record| {
                record
                    .children
                    .iter()
                    .filter_map(|child| match child {
                        Placeable::Surface(surface) => Some(*surface),
                        Placeable::Widget(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn active_page(&self, notebook: SurfaceId) -> Option<SurfaceId> {
        self.surfaces.get(&notebook).and_then(|s| s.active_page)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    fn remove_menu(&mut self, menu: MenuId) {
        if let Some(record) = self.menus.shift_remove(&menu) {
            for entry in record.entries {
                if let HostMenuEntry::Cascade { menu, .. } = entry {
                    self.remove_menu(menu);
                }
            }
        }
    }

    fn detach_from_parent(&mut self, item: Placeable, attach: Attach) {
        match attach {
            Attach::Window(window) => {
                if let (Some(record), Placeable::Surface(surface)) = (self.windows.get_mut(&window), item) {
                    record.children.retain(|child| *child != surface);
                }
            }
            Attach::Surface(parent) => {
                if let Some(record) = self.surfaces.get_mut(&parent) {
                    record.children.retain(|child| *child != item);
                    if let Placeable::Surface(surface) = item
                        && record.active_page == Some(surface)
                    {
                        record.active_page = None;
                    }
                }
            }
            Attach::Detached => {}
        }
    }
}

impl Host for HeadlessHost {
    fn create_window(&mut self, config: &WindowConfig) -> UiResult<WindowId> {
        let (width, height) = config.size;
        let style = Style {
            display: Display::Grid,
            size: taffy::Size {
                width: Dimension::Length(width as f32),
                height: Dimension::Length(height as f32),
            },
            grid_template_columns: vec![track(1)],
            grid_template_rows: vec![track(1)],
            ..Default::default()
        };
        let node = self.taffy.new_leaf(style).map_err(taffy_error)?;
        let window = WindowId(self.next_id());
        self.windows.insert(
            window,
            WindowRecord {
                config: config.clone(),
                node,
                children: Vec::new(),
                menu_bar: None,
            },
        );
        tracing::debug!(?window, title = config.title.as_str(), "window created");
        Ok(window)
    }

    fn has_window(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    fn has_surface(&self, surface: SurfaceId) -> bool {
        self.surfaces.contains_key(&surface)
    }

    fn create_surface(&mut self, attach: Attach, options: &ContainerOptions) -> UiResult<SurfaceId> {
        let kind = if options.title.is_some() {
            SurfaceKind::Group
        } else {
            SurfaceKind::Frame
        };
        self.new_surface(
            kind,
            attach,
            options.title.clone(),
            options.padding.unwrap_or(0),
            Style::default(),
        )
    }

    fn set_surface_padding(&mut self, surface: SurfaceId, padding: u16) -> UiResult<()> {
        let record = self.surface_mut(surface)?;
        record.padding = padding;
        let extra_top = reserved_top(record.kind);
        let node = record.node;
        let mut style = self.taffy.style(node).map_err(taffy_error)?.clone();
        style.padding = uniform_padding(padding as f32, extra_top);
        self.taffy.set_style(node, style).map_err(taffy_error)
    }

    fn configure_column(&mut self, surface: SurfaceId, column: u16, weight: u16) -> UiResult<()> {
        check_track("column", column)?;
        self.surface_mut(surface)?.column_weights.insert(column, weight);
        Ok(())
    }

    fn configure_row(&mut self, surface: SurfaceId, row: u16, weight: u16) -> UiResult<()> {
        check_track("row", row)?;
        self.surface_mut(surface)?.row_weights.insert(row, weight);
        Ok(())
    }

    fn create_widget(
        &mut self,
        parent: SurfaceId,
        kind: &WidgetKind,
        options: WidgetOptions,
    ) -> UiResult<WidgetHandle> {
        let parent_node = self.surface(parent)?.node;
        let (width, height) = intrinsic_size(kind, options.text.as_deref());
        let style = Style {
            display: Display::None,
            min_size: taffy::Size {
                width: Dimension::Length(width),
                height: Dimension::Length(height),
            },
            ..Default::default()
        };
        let node = self.taffy.new_leaf(style).map_err(taffy_error)?;
        self.taffy.add_child(parent_node, node).map_err(taffy_error)?;

        let text_value = match kind {
            WidgetKind::Combobox => options
                .current
                .and_then(|index| options.values.get(index))
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        };
        if let (WidgetKind::Radiobutton, Some(group)) = (kind, &options.group) {
            self.radio_groups.entry(group.clone()).or_insert(0);
        }

        let widget = WidgetHandle(self.next_id());
        self.surface_mut(parent)?.children.push(Placeable::Widget(widget));
        self.widgets.insert(
            widget,
            WidgetRecord {
                kind: kind.clone(),
                parent,
                node,
                placement: None,
                options,
                text_value,
                checked: false,
            },
        );
        Ok(widget)
    }

    fn place(&mut self, target: Placeable, placement: &Placement) -> UiResult<()> {
        match target {
            Placeable::Widget(widget) => {
                let record = self.widget_mut(widget)?;
                record.placement = Some(*placement);
                let node = record.node;
                let mut style = self.taffy.style(node).map_err(taffy_error)?.clone();
                apply_placement(&mut style, placement);
                style.display = Display::Flex;
                self.taffy.set_style(node, style).map_err(taffy_error)
            }
            Placeable::Surface(surface) => {
                let record = self.surface_mut(surface)?;
                record.placement = Some(*placement);
                let node = record.node;
                let mut style = self.taffy.style(node).map_err(taffy_error)?.clone();
                apply_placement(&mut style, placement);
                self.taffy.set_style(node, style).map_err(taffy_error)?;
                self.refresh_display(surface)
            }
        }
    }

    fn create_notebook(&mut self, parent: SurfaceId) -> UiResult<SurfaceId> {
        let style = Style {
            grid_template_columns: vec![track(1)],
            grid_template_rows: vec![track(1)],
            ..Default::default()
        };
        self.new_surface(
            SurfaceKind::Notebook,
            Attach::Surface(parent),
            None,
            0,
            style,
        )
    }

    fn add_tab(&mut self, notebook: SurfaceId, label: &str, options: &TabOptions) -> UiResult<SurfaceId> {
        if self.surface(notebook)?.kind != SurfaceKind::Notebook {
            return Err(UiError::Host(format!("surface {:?} is not a notebook", notebook)));
        }
        let page = self.new_surface(
            SurfaceKind::Page,
            Attach::Surface(notebook),
            Some(label.to_string()),
            options.padding.unwrap_or(0),
            Style::default(),
        )?;

        let first = {
            let record = self.surface_mut(notebook)?;
            let first = record.active_page.is_none();
            if first {
                record.active_page = Some(page);
            }
            first
        };
        self.surface_mut(page)?.hidden = !first;
        self.place(Placeable::Surface(page), &Placement::fill())?;
        Ok(page)
    }

    fn select_tab(&mut self, notebook: SurfaceId, tab: SurfaceId) -> UiResult<()> {
        let previous = self.surface(notebook)?.active_page;
        if self.surface(tab)?.attach != Attach::Surface(notebook) {
            return Err(UiError::Host(format!(
                "surface {:?} is not a page of notebook {:?}",
                tab, notebook
            )));
        }
        if let Some(previous) = previous.filter(|previous| *previous != tab) {
            self.surface_mut(previous)?.hidden = true;
            self.refresh_display(previous)?;
        }
        self.surface_mut(tab)?.hidden = false;
        self.surface_mut(notebook)?.active_page = Some(tab);
        self.refresh_display(tab)
    }

    fn create_menu_bar(&mut self, window: WindowId) -> UiResult<MenuId> {
        let menu = MenuId(self.next_id());
        let previous = {
            let record = self
                .windows
                .get_mut(&window)
                .ok_or_else(|| unknown("window", window))?;
            record.menu_bar.replace(menu)
        };
        if let Some(previous) = previous {
            self.remove_menu(previous);
        }
        self.menus.insert(
            menu,
            MenuRecord {
                tearoff: false,
                entries: Vec::new(),
            },
        );
        Ok(menu)
    }

    fn add_cascade(&mut self, menu: MenuId, label: &str, options: &MenuOptions) -> UiResult<MenuId> {
        self.menu_mut(menu)?;
        let submenu = MenuId(self.next_id());
        self.menus.insert(
            submenu,
            MenuRecord {
                tearoff: options.tearoff,
                entries: Vec::new(),
            },
        );
        self.menu_mut(menu)?.entries.push(HostMenuEntry::Cascade {
            label: label.to_string(),
            menu: submenu,
        });
        Ok(submenu)
    }

    fn add_command(&mut self, menu: MenuId, label: &str, action: Callback) -> UiResult<()> {
        self.menu_mut(menu)?.entries.push(HostMenuEntry::Command {
            label: label.to_string(),
            action,
        });
        Ok(())
    }

    fn add_separator(&mut self, menu: MenuId) -> UiResult<()> {
        self.menu_mut(menu)?.entries.push(HostMenuEntry::Separator);
        Ok(())
    }

    fn destroy_widget(&mut self, widget: WidgetHandle) -> UiResult<()> {
        let Some(record) = self.widgets.shift_remove(&widget) else {
            return Ok(());
        };
        self.detach_from_parent(Placeable::Widget(widget), Attach::Surface(record.parent));
        self.taffy.remove(record.node).map_err(taffy_error)?;
        Ok(())
    }

    fn destroy_surface(&mut self, surface: SurfaceId) -> UiResult<()> {
        let Some(record) = self.surfaces.get(&surface) else {
            return Ok(());
        };
        let children = record.children.clone();
        for child in children {
            match child {
                Placeable::Widget(widget) => self.destroy_widget(widget)?,
                Placeable::Surface(nested) => self.destroy_surface(nested)?,
            }
        }

        if let Some(record) = self.surfaces.shift_remove(&surface) {
            self.detach_from_parent(Placeable::Surface(surface), record.attach);
            self.taffy.remove(record.node).map_err(taffy_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with_frame() -> (HeadlessHost, WindowId, SurfaceId) {
        let mut host = HeadlessHost::new();
        let window = host
            .create_window(&WindowConfig::titled("Test").size(640, 480))
            .unwrap();
        let frame = host
            .create_surface(Attach::Window(window), &ContainerOptions::new())
            .unwrap();
        host.place(Placeable::Surface(frame), &Placement::fill()).unwrap();
        (host, window, frame)
    }

    #[test]
    fn test_unplaced_widget_is_not_laid_out() {
        let (mut host, window, frame) = host_with_frame();
        let widget = host
            .create_widget(frame, &WidgetKind::Label, WidgetOptions::new().text("Hidden"))
            .unwrap();
        let layout = host.compute_layout(window).unwrap();
        assert!(layout.widget(widget).is_none());
        assert!(layout.surface(frame).is_some());
    }

    #[test]
    fn test_root_frame_fills_window() {
        let (mut host, window, frame) = host_with_frame();
        let layout = host.compute_layout(window).unwrap();
        let rect = layout.surface(frame).unwrap();
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
        assert_eq!((rect.width, rect.height), (640.0, 480.0));
    }

    #[test]
    fn test_track_past_grid_limit_is_rejected() {
        let (mut host, window, frame) = host_with_frame();
        let err = host.configure_column(frame, u16::MAX, 1).unwrap_err();
        assert!(matches!(err, UiError::Host(_)));
        assert!(host.configure_row(frame, u16::MAX, 1).is_err());
        assert_eq!(host.column_weight(frame, u16::MAX), 0);

        host.configure_column(frame, 40, 1).unwrap();
        let label = host
            .create_widget(frame, &WidgetKind::Label, WidgetOptions::new().text("Nombre"))
            .unwrap();
        host.place(Placeable::Widget(label), &Placement::default()).unwrap();
        let layout = host.compute_layout(window).unwrap();
        assert!(layout.widget(label).is_some());
    }

    #[test]
    fn test_tracks_stop_at_grid_limit() {
        let mut weights = HashMap::new();
        weights.insert(2, 1);
        assert_eq!(tracks(&weights, 1).len(), 3);
        assert_eq!(tracks(&weights, 5).len(), 5);

        weights.insert(u16::MAX, 1);
        assert_eq!(tracks(&weights, 0).len(), usize::from(MAX_TRACK) + 1);
        assert_eq!(tracks(&HashMap::new(), u16::MAX).len(), usize::from(MAX_TRACK) + 1);
    }

    #[test]
    fn test_weighted_column_takes_remaining_width() {
        let (mut host, window, frame) = host_with_frame();
        host.configure_column(frame, 1, 1).unwrap();

        let label = host
            .create_widget(frame, &WidgetKind::Label, WidgetOptions::new().text("Nombre"))
            .unwrap();
        let entry = host
            .create_widget(frame, &WidgetKind::Entry, WidgetOptions::new())
            .unwrap();
        let mut placement = Placement {
            alignment: Alignment::HORIZONTAL,
            ..Placement::default()
        };
        host.place(Placeable::Widget(label), &placement).unwrap();
        placement.column = 1;
        host.place(Placeable::Widget(entry), &placement).unwrap();

        let layout = host.compute_layout(window).unwrap();
        let label_rect = layout.widget(label).unwrap();
        let entry_rect = layout.widget(entry).unwrap();
        assert_eq!(label_rect.x, 0.0);
        assert!(entry_rect.x >= label_rect.x + label_rect.width);
        assert!((entry_rect.x + entry_rect.width - 640.0).abs() < 0.5);
    }

    #[test]
    fn test_destroy_surface_removes_contents() {
        let (mut host, _, frame) = host_with_frame();
        let nested = host
            .create_surface(Attach::Surface(frame), &ContainerOptions::titled("Group"))
            .unwrap();
        host.create_widget(nested, &WidgetKind::Entry, WidgetOptions::new())
            .unwrap();
        assert_eq!(host.surface_kind(nested), Some(SurfaceKind::Group));

        host.destroy_surface(nested).unwrap();
        assert!(!host.has_surface(nested));
        assert_eq!(host.widget_count(), 0);
        host.destroy_surface(nested).unwrap();
    }

    #[test]
    fn test_radio_group_is_exclusive() {
        let (mut host, _, frame) = host_with_frame();
        let options = |value| WidgetOptions::new().group("estado").value(value);
        let single = host
            .create_widget(frame, &WidgetKind::Radiobutton, options(0))
            .unwrap();
        let married = host
            .create_widget(frame, &WidgetKind::Radiobutton, options(1))
            .unwrap();

        assert!(host.is_selected(single));
        host.click(married).unwrap();
        assert!(host.is_selected(married));
        assert!(!host.is_selected(single));
    }

    #[test]
    fn test_readonly_combobox_only_accepts_choices() {
        let (mut host, _, frame) = host_with_frame();
        let combobox = host
            .create_widget(
                frame,
                &WidgetKind::Combobox,
                WidgetOptions::new()
                    .values(["Morelia", "Zinapecuaro"])
                    .current(0)
                    .readonly(true),
            )
            .unwrap();
        assert_eq!(host.value(combobox).as_deref(), Some("Morelia"));

        host.set_value(combobox, "Zinapecuaro").unwrap();
        assert_eq!(host.value(combobox).as_deref(), Some("Zinapecuaro"));
        assert!(host.set_value(combobox, "Paris").is_err());
    }

    #[test]
    fn test_menu_bar_replacement_drops_old_menus() {
        let (mut host, window, _) = host_with_frame();
        let first = host.create_menu_bar(window).unwrap();
        let cascade = host
            .add_cascade(first, "File", &MenuOptions::default())
            .unwrap();
        let second = host.create_menu_bar(window).unwrap();

        assert_eq!(host.menu_bar(window), Some(second));
        assert!(host.menu_tearoff(first).is_none());
        assert!(host.menu_tearoff(cascade).is_none());
    }
}
