use winit::keyboard::{Key, NamedKey};

/// Where keyboard focus currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardFocus {
    /// The viewport, or nothing in particular
    #[default]
    Viewport,
    /// A text entry widget is being typed into
    TextEntry,
}

/// Editor keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Translate,
    Rotate,
    Scale,
    Deselect,
}

impl Shortcut {
    /// Map a logical key to a shortcut, ignoring letter case
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Escape) => Some(Self::Deselect),
            Key::Character(text) => Self::from_text(text),
            _ => None,
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        match text.to_lowercase().as_str() {
            "t" => Some(Self::Translate),
            "r" => Some(Self::Rotate),
            "s" => Some(Self::Scale),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_are_case_insensitive() {
        assert_eq!(Shortcut::from_key(&Key::Character("t".into())), Some(Shortcut::Translate));
        assert_eq!(Shortcut::from_key(&Key::Character("R".into())), Some(Shortcut::Rotate));
        assert_eq!(Shortcut::from_key(&Key::Character("S".into())), Some(Shortcut::Scale));
    }

    #[test]
    fn test_escape_and_unknown_keys() {
        assert_eq!(
            Shortcut::from_key(&Key::Named(NamedKey::Escape)),
            Some(Shortcut::Deselect)
        );
        assert_eq!(Shortcut::from_key(&Key::Character("q".into())), None);
        assert_eq!(Shortcut::from_key(&Key::Character("escape".into())), None);
        assert_eq!(Shortcut::from_key(&Key::Named(NamedKey::Enter)), None);
    }
}
