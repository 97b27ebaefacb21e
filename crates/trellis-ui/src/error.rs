/// What a registered key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Widget,
    Component,
    Tab,
    Submenu,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntryKind::Widget => "widget",
            EntryKind::Component => "component",
            EntryKind::Tab => "tab",
            EntryKind::Submenu => "submenu",
        };
        f.write_str(name)
    }
}

/// Namespace a failed lookup was performed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyScope {
    /// Widgets and components of a node.
    Child,
    /// Tab containers of a tabbed node.
    Tab,
    /// Submenus of a menu builder.
    Submenu,
}

/// Errors raised while composing or addressing a node tree.
///
/// Except for [`UiError::Host`], every variant is a wiring mistake in the
/// screen definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// The key is already registered in this node.
    KeyCollision { key: String, existing: EntryKind },

    /// No entry is registered under the key.
    KeyNotFound { key: String, scope: KeyScope },

    /// The parent handed to a node cannot host it.
    InvalidParentCapability(String),

    /// A tab operation was used on a node built without a tab strip.
    NotTabbed,

    /// The node has been disposed.
    Disposed,

    /// The host toolkit rejected an operation.
    Host(String),
}

impl UiError {
    pub(crate) fn not_found(key: &str, scope: KeyScope) -> Self {
        UiError::KeyNotFound {
            key: key.to_string(),
            scope,
        }
    }

    pub(crate) fn collision(key: &str, existing: EntryKind) -> Self {
        UiError::KeyCollision {
            key: key.to_string(),
            existing,
        }
    }

    /// Whether this is a [`UiError::KeyNotFound`] error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UiError::KeyNotFound { .. })
    }

    /// Whether this is a [`UiError::KeyCollision`] error.
    pub fn is_collision(&self) -> bool {
        matches!(self, UiError::KeyCollision { .. })
    }
}

impl std::fmt::Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiError::KeyCollision { key, existing } => {
                write!(f, "Key '{}' is already registered as a {}", key, existing)
            }
            UiError::KeyNotFound { key, scope } => match scope {
                KeyScope::Child => write!(f, "No widget or component registered as '{}'", key),
                KeyScope::Tab => write!(f, "No tab registered as '{}'", key),
                KeyScope::Submenu => write!(f, "No submenu registered as '{}'", key),
            },
            UiError::InvalidParentCapability(msg) => {
                write!(f, "Parent cannot host a node: {}", msg)
            }
            UiError::NotTabbed => write!(f, "Node was not built with a tab strip"),
            UiError::Disposed => write!(f, "Node has been disposed"),
            UiError::Host(msg) => write!(f, "Host toolkit error: {}", msg),
        }
    }
}

impl std::error::Error for UiError {}

/// Result type for composition operations.
pub type UiResult<T> = Result<T, UiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = UiError::collision("entry_a", EntryKind::Widget);
        assert_eq!(err.to_string(), "Key 'entry_a' is already registered as a widget");

        let err = UiError::not_found("datos", KeyScope::Child);
        assert_eq!(err.to_string(), "No widget or component registered as 'datos'");

        let err = UiError::not_found("3", KeyScope::Tab);
        assert_eq!(err.to_string(), "No tab registered as '3'");
    }

    #[test]
    fn test_predicates() {
        assert!(UiError::not_found("x", KeyScope::Submenu).is_not_found());
        assert!(UiError::collision("x", EntryKind::Tab).is_collision());
        assert!(!UiError::Disposed.is_collision());
    }
}
