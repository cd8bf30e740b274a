//! W3C input action sequences

use serde_json::{json, Value};

use crate::session::Element;

/// Pause between press and move so drag handlers register the drag
const DRAG_PAUSE_MS: u64 = 250;

/// Key code points from the W3C WebDriver key table
pub mod keys {
    pub const NULL: &str = "\u{E000}";
    pub const BACKSPACE: &str = "\u{E003}";
    pub const TAB: &str = "\u{E004}";
    pub const ENTER: &str = "\u{E007}";
    pub const SHIFT: &str = "\u{E008}";
    pub const CONTROL: &str = "\u{E009}";
    pub const ALT: &str = "\u{E00A}";
    pub const ESCAPE: &str = "\u{E00C}";
    pub const SPACE: &str = "\u{E00D}";
    pub const PAGE_UP: &str = "\u{E00E}";
    pub const PAGE_DOWN: &str = "\u{E00F}";
    pub const END: &str = "\u{E010}";
    pub const HOME: &str = "\u{E011}";
    pub const ARROW_LEFT: &str = "\u{E012}";
    pub const ARROW_UP: &str = "\u{E013}";
    pub const ARROW_RIGHT: &str = "\u{E014}";
    pub const ARROW_DOWN: &str = "\u{E015}";
    pub const DELETE: &str = "\u{E017}";
}

/// A batch of input sources for `POST /session/{id}/actions`
#[derive(Debug, Clone, Default)]
pub struct Actions {
    pointer: Vec<Value>,
    keyboard: Vec<Value>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press on `source`, move onto `target`, release
    pub fn drag_and_drop(source: &Element, target: &Element) -> Self {
        let mut actions = Self::new();
        actions.pointer = vec![
            json!({ "type": "pointerMove", "duration": 0, "origin": source.to_json(), "x": 0, "y": 0 }),
            json!({ "type": "pointerDown", "button": 0 }),
            json!({ "type": "pause", "duration": DRAG_PAUSE_MS }),
            json!({ "type": "pointerMove", "duration": DRAG_PAUSE_MS, "origin": target.to_json(), "x": 0, "y": 0 }),
            json!({ "type": "pointerUp", "button": 0 }),
        ];
        actions
    }

    pub fn move_to(mut self, element: &Element) -> Self {
        self.pointer.push(json!({
            "type": "pointerMove", "duration": 0, "origin": element.to_json(), "x": 0, "y": 0
        }));
        self
    }

    /// Press and release each character of `text` in order
    pub fn type_keys(mut self, text: &str) -> Self {
        for c in text.chars() {
            self.keyboard.push(json!({ "type": "keyDown", "value": c.to_string() }));
            self.keyboard.push(json!({ "type": "keyUp", "value": c.to_string() }));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pointer.is_empty() && self.keyboard.is_empty()
    }

    pub fn to_body(&self) -> Value {
        let mut sources = Vec::new();
        if !self.pointer.is_empty() {
            sources.push(json!({
                "type": "pointer",
                "id": "mouse",
                "parameters": { "pointerType": "mouse" },
                "actions": self.pointer,
            }));
        }
        if !self.keyboard.is_empty() {
            sources.push(json!({
                "type": "key",
                "id": "keyboard",
                "actions": self.keyboard,
            }));
        }
        json!({ "actions": sources })
    }
}
