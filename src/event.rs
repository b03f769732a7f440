//! Native events delivered by a surface to element listeners.

use serde::{Deserialize, Serialize};

/// A user or browser event as seen by the concrete node tree.
///
/// `name` is the DOM event name (`click`, `input`, `keydown`, ...). The
/// remaining fields carry whatever payload the surface could observe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    /// Current value of the target (form controls).
    #[serde(default)]
    pub value: Option<String>,
    /// Checked state of the target (checkboxes, radios).
    #[serde(default)]
    pub checked: Option<bool>,
    /// Key name for keyboard events.
    #[serde(default)]
    pub key: Option<String>,
    /// Free-form extra payload.
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn click() -> Self {
        Self::new("click")
    }

    pub fn input(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new("input")
        }
    }

    pub fn keydown(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new("keydown")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_only_a_name() {
        let event: Event = serde_json::from_str(r#"{"name":"click"}"#).unwrap();
        assert_eq!(event, Event::click());
        assert!(event.detail.is_null());
    }

    #[test]
    fn input_carries_value() {
        let event = Event::input("hello");
        assert_eq!(event.name, "input");
        assert_eq!(event.value.as_deref(), Some("hello"));
    }
}
