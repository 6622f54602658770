use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

/// Configurable keyboard bindings mapping actions to key codes.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format (`"KeyG"`,
/// `"Space"`). The reverse map is rebuilt whenever bindings are
/// deserialized, so a loaded preset is immediately usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "BindingTable", into = "BindingTable")]
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `RegenerateScene` → `"KeyG"`).
    pub bindings: HashMap<KeyAction, String>,
    /// Reverse lookup cache (key string → action).
    key_to_action: HashMap<String, KeyAction>,
}

/// On-disk form: only the forward map.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct BindingTable {
    bindings: HashMap<KeyAction, String>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self {
            bindings: HashMap::from([
                (KeyAction::RegenerateScene, "KeyG".into()),
                (KeyAction::ToggleTracing, "KeyT".into()),
                (KeyAction::ToggleView, "KeyV".into()),
                (KeyAction::ResetCamera, "KeyR".into()),
            ]),
        }
    }
}

impl From<BindingTable> for KeybindingOptions {
    fn from(table: BindingTable) -> Self {
        let mut opts = Self {
            bindings: table.bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl From<KeybindingOptions> for BindingTable {
    fn from(opts: KeybindingOptions) -> Self {
        Self {
            bindings: opts.bindings,
        }
    }
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        BindingTable::default().into()
    }
}

impl PartialEq for KeybindingOptions {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }

    /// Bind `action` to `key`, replacing its previous key.
    pub fn bind(&mut self, action: KeyAction, key: impl Into<String>) {
        let _ = self.bindings.insert(action, key.into());
        self.rebuild_reverse_map();
    }
}
