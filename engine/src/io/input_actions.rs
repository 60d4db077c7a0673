//! Input action assets referenced by scenes

use serde::{Deserialize, Serialize};

/// How an action's value is computed from its bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// 0 or 1
    Button,
    /// -1 to 1
    Axis,
    Vector2,
    Vector3,
}

fn default_scale() -> f32 {
    1.0
}

/// A physical input feeding an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Binding {
    Key {
        key: String,
        #[serde(default = "default_scale")]
        scale: f32,
    },
    #[serde(alias = "mouseButton")]
    MouseButton {
        button: u8,
        #[serde(default = "default_scale")]
        scale: f32,
    },
    /// Four keys forming a 2D direction
    #[serde(alias = "composite2D")]
    Composite2d {
        up: String,
        down: String,
        left: String,
        right: String,
    },
}

impl Binding {
    /// Every key name this binding listens to
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Binding::Key { key, .. } => vec![key.as_str()],
            Binding::MouseButton { .. } => Vec::new(),
            Binding::Composite2d {
                up,
                down,
                left,
                right,
            } => vec![up.as_str(), down.as_str(), left.as_str(), right.as_str()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAction {
    pub name: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// A named group of actions enabled and disabled together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMap {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub actions: Vec<InputAction>,
}

/// A named set of action maps, such as a player control scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputActionAsset {
    pub name: String,
    #[serde(default)]
    pub action_maps: Vec<ActionMap>,
}

impl InputActionAsset {
    pub fn find_map(&self, map: &str) -> Option<&ActionMap> {
        self.action_maps.iter().find(|m| m.name == map)
    }

    /// Look up an action by map and action name
    pub fn find_action(&self, map: &str, action: &str) -> Option<&InputAction> {
        self.find_map(map)?
            .actions
            .iter()
            .find(|a| a.name == action)
    }

    /// Maps flagged as enabled at load time
    pub fn enabled_maps(&self) -> impl Iterator<Item = &ActionMap> {
        self.action_maps.iter().filter(|m| m.enabled)
    }
}
