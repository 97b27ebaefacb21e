//! Integration tests for the menu builder.

use std::cell::Cell;
use std::rc::Rc;

use trellis_ui::{
    Blank, ContainerOptions, HeadlessHost, Host, KeyScope, MenuBuilder, MenuEntry, MenuOptions,
    Node, Parent, UiError, WindowConfig,
};

fn main_node(host: &mut HeadlessHost) -> Node {
    let window = host.create_window(&WindowConfig::titled("My Program")).unwrap();
    Node::new(Parent::RootWindow(window), Blank, ContainerOptions::new(), host).unwrap()
}

#[test]
fn test_menu_mirrors_builder_calls() {
    let mut host = HeadlessHost::new();
    let node = main_node(&mut host);
    let mut menu = MenuBuilder::new(&node, &mut host).unwrap();

    menu.create_item(&mut host, "sistema", "Sistema", MenuOptions::default())
        .unwrap();
    menu.create_submenu_item(&mut host, "sistema", "Imprimir", || {})
        .unwrap();
    menu.create_submenu_separator(&mut host, "sistema").unwrap();
    menu.create_submenu_item(&mut host, "sistema", "Salir", || {})
        .unwrap();
    menu.create_item(&mut host, "ayuda", "Ayuda", MenuOptions { tearoff: true })
        .unwrap();

    let window = match node.parent() {
        Parent::RootWindow(window) => window,
        other => panic!("unexpected parent {:?}", other),
    };
    assert_eq!(host.menu_bar(window), Some(menu.bar()));
    assert_eq!(host.menu_labels(menu.bar()), vec![Some("Sistema"), Some("Ayuda")]);

    let sistema = menu.submenu("sistema").unwrap();
    assert_eq!(host.menu_labels(sistema), vec![Some("Imprimir"), None, Some("Salir")]);
    assert_eq!(host.menu_tearoff(sistema), Some(false));
    assert_eq!(host.menu_tearoff(menu.submenu("ayuda").unwrap()), Some(true));
    assert_eq!(
        menu.entries("sistema").unwrap()[1],
        MenuEntry::Separator
    );
}

#[test]
fn test_commands_run_their_action() {
    let mut host = HeadlessHost::new();
    let node = main_node(&mut host);
    let mut menu = MenuBuilder::new(&node, &mut host).unwrap();
    let printed = Rc::new(Cell::new(false));

    menu.create_item(&mut host, "sistema", "Sistema", MenuOptions::default())
        .unwrap();
    let flag = printed.clone();
    menu.create_submenu_item(&mut host, "sistema", "Imprimir", move || flag.set(true))
        .unwrap();

    let sistema = menu.submenu("sistema").unwrap();
    host.activate_menu_item(sistema, "Imprimir").unwrap();
    assert!(printed.get());
    assert!(host.activate_menu_item(sistema, "Salir").is_err());
}

#[test]
fn test_unknown_submenu_key() {
    let mut host = HeadlessHost::new();
    let node = main_node(&mut host);
    let mut menu = MenuBuilder::new(&node, &mut host).unwrap();

    let err = menu
        .create_submenu_item(&mut host, "archivo", "Abrir", || {})
        .unwrap_err();
    assert_eq!(
        err,
        UiError::KeyNotFound {
            key: "archivo".into(),
            scope: KeyScope::Submenu,
        }
    );
    assert!(menu.entries("archivo").is_err());
}

#[test]
fn test_menu_needs_root_window() {
    let mut host = HeadlessHost::new();
    let mut main = main_node(&mut host);
    let nested = main
        .create_component(&mut host, "datos", Blank, ContainerOptions::new())
        .unwrap();

    let err = MenuBuilder::new(nested, &mut host).unwrap_err();
    assert!(matches!(err, UiError::InvalidParentCapability(_)));
}
