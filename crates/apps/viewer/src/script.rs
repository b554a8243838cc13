//! Line-oriented pointer scripts replayed against a [`crate::session::ViewerSession`].
//!
//! ```text
//! # comment
//! down left 640 360
//! move 660 360
//! up left 660 360
//! wheel -120
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { button: PointerButton, x: f64, y: f64 },
    PointerUp { button: PointerButton, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    Wheel { delta: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

pub fn parse_script(source: &str) -> Result<Vec<InputEvent>, ScriptError> {
    let mut events = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let err = |message: String| ScriptError {
            line: i + 1,
            message,
        };
        let words: Vec<&str> = text.split_whitespace().collect();
        let event = match words.as_slice() {
            ["down", button, x, y] => InputEvent::PointerDown {
                button: parse_button(button).map_err(err)?,
                x: parse_number(x).map_err(err)?,
                y: parse_number(y).map_err(err)?,
            },
            ["up", button, x, y] => InputEvent::PointerUp {
                button: parse_button(button).map_err(err)?,
                x: parse_number(x).map_err(err)?,
                y: parse_number(y).map_err(err)?,
            },
            ["move", x, y] => InputEvent::PointerMove {
                x: parse_number(x).map_err(err)?,
                y: parse_number(y).map_err(err)?,
            },
            ["wheel", delta] => InputEvent::Wheel {
                delta: parse_number(delta).map_err(err)?,
            },
            _ => return Err(err(format!("unrecognized event: {text}"))),
        };
        events.push(event);
    }
    Ok(events)
}

fn parse_button(word: &str) -> Result<PointerButton, String> {
    match word {
        "left" => Ok(PointerButton::Left),
        "middle" => Ok(PointerButton::Middle),
        "right" => Ok(PointerButton::Right),
        other => Err(format!("unknown button: {other}")),
    }
}

fn parse_number(word: &str) -> Result<f64, String> {
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("not a number: {word}"))
}
