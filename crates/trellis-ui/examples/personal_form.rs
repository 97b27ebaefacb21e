//! Personal data form.
//!
//! Builds a two-tab form with a menu bar on the headless host, fills it in
//! the way a user would, and prints the report the "Imprimir" command asks
//! for.
//!
//! Run with: `cargo run -p trellis-ui --example personal_form`

use std::cell::Cell;
use std::rc::Rc;

use trellis_core::profiling::{init_profiling, new_frame};
use trellis_ui::{
    Alignment, BuildContext, Component, Config, ContainerOptions, HeadlessHost, Host, MenuBuilder,
    MenuOptions, Node, NodeKind, Parent, TabOptions, UiError, UiResult, WidgetKind, WidgetOptions,
    WindowConfig,
};

const FIELDS: [&str; 7] = [
    "Nombre",
    "Apellido Paterno",
    "Apellido Materno",
    "Direccion",
    "Colonia",
    "Ciudad",
    "Municipio",
];

struct Datos;

impl Datos {
    fn label(cx: &mut BuildContext<'_>, key: &str, text: &str) -> UiResult<()> {
        cx.cursor_mut().set_padding_x((0, 20));
        cx.create_widget(key, WidgetKind::Label, WidgetOptions::new().text(text))?;
        cx.cursor_mut().reset_padding_x();
        cx.cursor_mut().advance_column();
        Ok(())
    }

    fn entry(cx: &mut BuildContext<'_>, key: &str) -> UiResult<()> {
        cx.create_widget(key, WidgetKind::Entry, WidgetOptions::new())?;
        cx.cursor_mut().wrap_to_next_row();
        Ok(())
    }

    fn combobox(cx: &mut BuildContext<'_>, key: &str, values: [&str; 3]) -> UiResult<()> {
        let options = WidgetOptions::new().values(values).current(0).readonly(true);
        cx.create_widget(key, WidgetKind::Combobox, options)?;
        cx.cursor_mut().wrap_to_next_row();
        Ok(())
    }
}

impl Component for Datos {
    fn setup(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
        cx.cursor_mut().set_padding_y((0, 5));
        cx.configure_column(0, 0)?;
        cx.configure_column(1, 1)?;
        cx.cursor_mut().set_alignment(Alignment::HORIZONTAL);
        Ok(())
    }

    fn initialize(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
        for (key, text) in [
            ("nombre", "Nombre"),
            ("apellido_paterno", "Apellido Paterno"),
            ("apellido_materno", "Apellido Materno"),
            ("direccion", "Direccion"),
        ] {
            Self::label(cx, &format!("label_{key}"), text)?;
            Self::entry(cx, &format!("entry_{key}"))?;
        }

        Self::label(cx, "label_colonia", "Colonia")?;
        Self::combobox(cx, "combobox_colonia", ["Tepeyac", "Morelos", "Lazaro Cardenas"])?;
        Self::label(cx, "label_ciudad", "Ciudad")?;
        Self::combobox(cx, "combobox_ciudad", ["Morelia", "Zinapecuaro", "Lazaro Cardenas"])?;
        Self::label(cx, "label_municipio", "Municipio")?;
        Self::combobox(cx, "combobox_municipio", ["Zinapecuaro", "Tangamandapio", "Zitacuaro"])?;

        // The button shares the last row, right of the municipio combobox.
        cx.cursor_mut().set_alignment(Alignment::EAST);
        cx.cursor_mut().set_padding_x((10, 0));
        cx.cursor_mut().retreat_row();
        let row = cx.cursor().row();
        cx.cursor_mut().move_to(row, 2);
        cx.create_widget(
            "button_imprimir",
            WidgetKind::Button,
            WidgetOptions::new()
                .text("Imprimir Datos Personales")
                .command(|| tracing::info!("personal data print requested")),
        )?;
        Ok(())
    }
}

struct Pasatiempos;

impl Pasatiempos {
    fn choices(
        cx: &mut BuildContext<'_>,
        title: (&str, &str),
        kind: WidgetKind,
        choices: &[(&str, &str)],
    ) -> UiResult<()> {
        cx.cursor_mut().set_span(99, 1);
        cx.create_widget(title.0, WidgetKind::Label, WidgetOptions::new().text(title.1))?;
        cx.cursor_mut().reset_span();
        cx.cursor_mut().wrap_to_next_row();

        for (value, (key, text)) in choices.iter().enumerate() {
            let mut options = WidgetOptions::new().text(*text);
            if kind == WidgetKind::Radiobutton {
                options = options.group("estado").value(value as i32);
            }
            cx.create_widget(key, kind.clone(), options)?;
            cx.cursor_mut().advance_column();
        }
        cx.cursor_mut().wrap_to_next_row();
        Ok(())
    }
}

impl Component for Pasatiempos {
    fn setup(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
        cx.cursor_mut().set_padding_y((0, 5));
        cx.cursor_mut().set_alignment(Alignment::FILL);
        for column in 0..3 {
            cx.configure_column(column, 1)?;
        }
        Ok(())
    }

    fn initialize(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
        Self::choices(
            cx,
            ("label_pasatiempos", "Pasatiempos"),
            WidgetKind::Checkbutton,
            &[
                ("checkbutton_leer", "Leer"),
                ("checkbutton_peliculas", "Peliculas"),
                ("checkbutton_redes", "Redes Sociales"),
            ],
        )?;
        Self::choices(
            cx,
            ("label_estado", "Estado Civil"),
            WidgetKind::Radiobutton,
            &[
                ("radiobutton_soltero", "Soltero"),
                ("radiobutton_casado", "Casado"),
                ("radiobutton_viudo", "Viudo"),
            ],
        )?;

        cx.cursor_mut().set_span(2, 1);
        cx.create_widget(
            "label_objetivo",
            WidgetKind::Label,
            WidgetOptions::new().text("Objetivo en la vida"),
        )?;
        cx.cursor_mut().advance_row();
        cx.cursor_mut().set_padding_x((0, 10));
        cx.create_widget("entry_objetivo", WidgetKind::ScrolledText, WidgetOptions::new())?;
        Ok(())
    }
}

struct Tabbed;

impl Component for Tabbed {
    fn kind(&self) -> NodeKind {
        NodeKind::Tabbed
    }

    fn initialize(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
        cx.create_tab("1", "Datos Personales", TabOptions::padded(10))?;
        cx.create_tab("2", "Pasatiempos", TabOptions::padded(10))?;
        cx.cursor_mut().set_alignment(Alignment::FILL);
        cx.create_component_in_tab("1", "datos", Datos, ContainerOptions::new())?;
        cx.create_component_in_tab("2", "extras", Pasatiempos, ContainerOptions::new())?;
        Ok(())
    }
}

struct MainScreen;

impl Component for MainScreen {
    fn setup(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
        cx.configure_column(0, 1)?;
        cx.configure_row(0, 1)?;
        cx.cursor_mut().set_alignment(Alignment::FILL);
        Ok(())
    }

    fn initialize(&mut self, cx: &mut BuildContext<'_>) -> UiResult<()> {
        cx.create_component("tabbed", Tabbed, ContainerOptions::new())?;
        Ok(())
    }
}

/// Collect the report shown by "Imprimir", or `None` if a field is empty.
fn report(main: &Node, host: &HeadlessHost) -> UiResult<Option<String>> {
    let tabbed = main.child("tabbed")?;
    let datos = tabbed.child("datos")?;
    let extras = tabbed.child("extras")?;

    let mut message = String::new();
    let values = datos
        .registry()
        .widgets()
        .filter(|(_, entry)| matches!(entry.kind, WidgetKind::Entry | WidgetKind::Combobox))
        .map(|(_, entry)| host.value(entry.handle).unwrap_or_default());
    for (field, value) in FIELDS.iter().zip(values) {
        if value.is_empty() {
            return Ok(None);
        }
        message.push_str(&format!("{field}: {value}\n"));
    }

    let hobbies: Vec<_> = extras
        .registry()
        .widgets_of_kind(&WidgetKind::Checkbutton)
        .filter(|(_, handle)| host.is_selected(*handle))
        .filter_map(|(_, handle)| host.widget_text(handle))
        .collect();
    let estado = extras
        .registry()
        .widgets_of_kind(&WidgetKind::Radiobutton)
        .find(|(_, handle)| host.is_selected(*handle))
        .and_then(|(_, handle)| host.widget_text(handle))
        .unwrap_or_default();
    let objetivo = host.value(extras.widget("entry_objetivo")?).unwrap_or_default();
    if hobbies.is_empty() || objetivo.is_empty() {
        return Ok(None);
    }

    message.push_str("Pasatiempos:\n");
    for hobby in hobbies {
        message.push_str(&format!("  * {hobby}\n"));
    }
    message.push_str(&format!("Estado:\n  * {estado}\n"));
    message.push_str(&format!("Objetivo en la vida:\n  {objetivo}"));
    Ok(Some(message))
}

fn main() -> Result<(), UiError> {
    let config = Config::default();
    trellis_core::logging::init_with(&config);
    init_profiling(config.profiling);

    let mut host = HeadlessHost::new();
    let window = host.create_window(&WindowConfig::titled("My Program"))?;
    let mut main = Node::new(Parent::RootWindow(window), MainScreen, ContainerOptions::new(), &mut host)?;

    let print_requested = Rc::new(Cell::new(false));
    let mut menu = MenuBuilder::new(&main, &mut host)?;
    menu.create_item(&mut host, "sistema", "Sistema", MenuOptions::default())?;
    let flag = print_requested.clone();
    menu.create_submenu_item(&mut host, "sistema", "Imprimir", move || flag.set(true))?;
    menu.create_submenu_separator(&mut host, "sistema")?;
    menu.create_submenu_item(&mut host, "sistema", "Salir", || tracing::info!("quit requested"))?;
    menu.create_item(&mut host, "help", "Ayuda", MenuOptions::default())?;
    menu.create_submenu_item(&mut host, "help", "Acerca de", || {
        println!("Trellis personal form example")
    })?;

    // Fill the form in like a user would.
    {
        let tabbed = main.child("tabbed")?;
        let datos = tabbed.child("datos")?;
        for (key, value) in [
            ("entry_nombre", "Ana"),
            ("entry_apellido_paterno", "Garcia"),
            ("entry_apellido_materno", "Lopez"),
            ("entry_direccion", "Av. Madero 120"),
        ] {
            host.set_value(datos.widget(key)?, value)?;
        }
        host.set_value(datos.widget("combobox_ciudad")?, "Zinapecuaro")?;
        host.click(datos.widget("button_imprimir")?)?;

        let extras = tabbed.child("extras")?;
        host.click(extras.widget("checkbutton_leer")?)?;
        host.click(extras.widget("checkbutton_redes")?)?;
        host.click(extras.widget("radiobutton_casado")?)?;
        host.set_value(extras.widget("entry_objetivo")?, "Viajar por el mundo")?;
    }
    main.child_mut("tabbed")?.select_tab(&mut host, "2")?;

    host.activate_menu_item(menu.submenu("sistema")?, "Imprimir")?;
    if print_requested.get() {
        match report(&main, &host)? {
            Some(message) => println!("{message}"),
            None => println!("Los campos estan incompletos"),
        }
    }

    let layout = host.compute_layout(window)?;
    tracing::info!(items = layout.len(), "layout resolved");
    new_frame();

    main.dispose(&mut host)?;
    Ok(())
}
