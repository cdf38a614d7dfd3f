use crate::core::NavigationKey;
use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Host-level actions that sit outside the search widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppAction {
    ToggleDebug,
    Quit,
}

/// Represents a key binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    pub fn with_ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Shift is dropped for characters, the terminal already reports the
    /// shifted char (`Char('N')`), and some terminals set SHIFT while others don't
    pub fn from_event(event: &KeyEvent) -> Self {
        let modifiers = match event.code {
            KeyCode::Char(_) => event.modifiers.difference(KeyModifiers::SHIFT),
            _ => event.modifiers,
        };
        Self {
            code: event.code,
            modifiers,
        }
    }

    /// Parse bindings like `ctrl+n`, `alt+down`, `enter`, `esc`, `j`
    pub fn parse(spec: &str) -> Result<Self> {
        let mut modifiers = KeyModifiers::empty();
        let mut code = None;

        for part in spec.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                key => {
                    if code.is_some() {
                        return Err(anyhow!("Key binding '{}' names more than one key", spec));
                    }
                    code = Some(parse_key_code(key, part)?);
                }
            }
        }

        let binding = code
            .map(|code| Self { code, modifiers })
            .ok_or_else(|| anyhow!("Key binding '{}' has no key", spec))?;
        Ok(binding.normalized())
    }

    /// Fold SHIFT into the character the way `from_event` sees it
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(c) if self.modifiers.contains(KeyModifiers::SHIFT) => Self {
                code: KeyCode::Char(c.to_ascii_uppercase()),
                modifiers: self.modifiers.difference(KeyModifiers::SHIFT),
            },
            _ => self,
        }
    }
}

fn parse_key_code(lower: &str, original: &str) -> Result<KeyCode> {
    let code = match lower {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        f if f.len() > 1 && f.starts_with('f') && f[1..].parse::<u8>().is_ok() => {
            KeyCode::F(f[1..].parse::<u8>()?)
        }
        _ => {
            let mut chars = original.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(anyhow!("Unknown key '{}'", original)),
            }
        }
    };
    Ok(code)
}

/// Parse an action name from the config file
pub fn parse_navigation_action(name: &str) -> Option<NavigationKey> {
    match name {
        "select_next" => Some(NavigationKey::Down),
        "select_previous" => Some(NavigationKey::Up),
        "confirm" => Some(NavigationKey::Confirm),
        "close" => Some(NavigationKey::Cancel),
        _ => None,
    }
}

/// Resolves raw key events into navigation keys and host actions
#[derive(Debug, Clone)]
pub struct KeyBindingManager {
    navigation_bindings: HashMap<KeyBinding, NavigationKey>,
    app_bindings: HashMap<KeyBinding, AppAction>,
}

impl Default for KeyBindingManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl KeyBindingManager {
    pub fn new(vim_mode: bool) -> Self {
        let mut manager = Self {
            navigation_bindings: HashMap::new(),
            app_bindings: HashMap::new(),
        };
        manager.setup_default_bindings(vim_mode);
        manager
    }

    fn setup_default_bindings(&mut self, vim_mode: bool) {
        self.navigation_bindings
            .insert(KeyBinding::new(KeyCode::Down), NavigationKey::Down);
        self.navigation_bindings
            .insert(KeyBinding::new(KeyCode::Up), NavigationKey::Up);
        self.navigation_bindings
            .insert(KeyBinding::new(KeyCode::Enter), NavigationKey::Confirm);
        self.navigation_bindings
            .insert(KeyBinding::new(KeyCode::Esc), NavigationKey::Cancel);

        if vim_mode {
            self.navigation_bindings.insert(
                KeyBinding::with_ctrl(KeyCode::Char('n')),
                NavigationKey::Down,
            );
            self.navigation_bindings.insert(
                KeyBinding::with_ctrl(KeyCode::Char('p')),
                NavigationKey::Up,
            );
        }

        self.app_bindings
            .insert(KeyBinding::new(KeyCode::F(5)), AppAction::ToggleDebug);
        self.app_bindings
            .insert(KeyBinding::with_ctrl(KeyCode::Char('c')), AppAction::Quit);
    }

    /// Apply `action = "key"` overrides from the config file
    pub fn apply_custom(&mut self, custom: &HashMap<String, String>) -> Result<()> {
        for (action, key) in custom {
            let binding = KeyBinding::parse(key)?;
            if let Some(nav) = parse_navigation_action(action) {
                self.navigation_bindings.insert(binding, nav);
            } else {
                return Err(anyhow!("Unknown key binding action '{}'", action));
            }
        }
        Ok(())
    }

    pub fn navigation_key(&self, key: &KeyEvent) -> Option<NavigationKey> {
        self.navigation_bindings
            .get(&KeyBinding::from_event(key))
            .copied()
    }

    pub fn app_action(&self, key: &KeyEvent) -> Option<AppAction> {
        self.app_bindings.get(&KeyBinding::from_event(key)).copied()
    }

    pub fn set_binding(&mut self, binding: KeyBinding, key: NavigationKey) {
        self.navigation_bindings.insert(binding, key);
    }

    pub fn remove_binding(&mut self, binding: &KeyBinding) {
        self.navigation_bindings.remove(binding);
    }
}
