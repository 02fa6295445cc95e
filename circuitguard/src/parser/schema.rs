//! Circuit data model: terminals, wires and placed components.
//!
//! These are the values the editor hands to the validator. They carry serde
//! derives so a snapshot can be exchanged as JSON with the CLI and tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::pinout;

/// Component id of the fixed microcontroller board.
pub const BOARD_ID: &str = "arduino";

/// One electrical contact point, identified by `(component_id, terminal_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    pub component_id: String,
    pub terminal_id: String,
}

impl Terminal {
    pub fn new(component_id: impl Into<String>, terminal_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            terminal_id: terminal_id.into(),
        }
    }

    /// A pin on the fixed board.
    pub fn board(pin_id: impl Into<String>) -> Self {
        Self::new(BOARD_ID, pin_id)
    }

    pub fn is_board_pin(&self) -> bool {
        self.component_id == BOARD_ID
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component_id, self.terminal_id)
    }
}

/// An explicit, unordered connection between two terminals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    pub id: String,
    pub start: Terminal,
    pub end: Terminal,
}

impl Wire {
    /// Create a wire with a fresh `wire-<uuid>` id.
    pub fn new(start: Terminal, end: Terminal) -> Self {
        Self::with_id(format!("wire-{}", uuid::Uuid::new_v4()), start, end)
    }

    pub fn with_id(id: impl Into<String>, start: Terminal, end: Terminal) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.start == self.end
    }

    /// True if either end sits on the given component.
    pub fn touches(&self, component_id: &str) -> bool {
        self.start.component_id == component_id || self.end.component_id == component_id
    }
}

/// Closed set of component types the workbench offers.
///
/// Anything else found in an incoming snapshot deserialises to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Led,
    Button,
    Potentiometer,
    Servo,
    Resistor,
    Buzzer,
    SevenSegmentDisplay,
    UltrasonicSensor,
    Lcd,
    Joystick,
    PirSensor,
    TempSensor,
    RgbLed,
    Relay,
    Keypad,
    DcMotor,
    Protoboard,
    #[serde(other)]
    Unknown,
}

impl ComponentKind {
    /// Every known kind, in palette order.
    pub const ALL: [ComponentKind; 17] = [
        ComponentKind::Led,
        ComponentKind::Button,
        ComponentKind::Potentiometer,
        ComponentKind::Servo,
        ComponentKind::Resistor,
        ComponentKind::Buzzer,
        ComponentKind::SevenSegmentDisplay,
        ComponentKind::UltrasonicSensor,
        ComponentKind::Lcd,
        ComponentKind::Joystick,
        ComponentKind::PirSensor,
        ComponentKind::TempSensor,
        ComponentKind::RgbLed,
        ComponentKind::Relay,
        ComponentKind::Keypad,
        ComponentKind::DcMotor,
        ComponentKind::Protoboard,
    ];

    /// Type tag as it appears in snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Led => "led",
            ComponentKind::Button => "button",
            ComponentKind::Potentiometer => "potentiometer",
            ComponentKind::Servo => "servo",
            ComponentKind::Resistor => "resistor",
            ComponentKind::Buzzer => "buzzer",
            ComponentKind::SevenSegmentDisplay => "seven_segment_display",
            ComponentKind::UltrasonicSensor => "ultrasonic_sensor",
            ComponentKind::Lcd => "lcd",
            ComponentKind::Joystick => "joystick",
            ComponentKind::PirSensor => "pir_sensor",
            ComponentKind::TempSensor => "temp_sensor",
            ComponentKind::RgbLed => "rgb_led",
            ComponentKind::Relay => "relay",
            ComponentKind::Keypad => "keypad",
            ComponentKind::DcMotor => "dc_motor",
            ComponentKind::Protoboard => "protoboard",
            ComponentKind::Unknown => "unknown",
        }
    }

    /// Human-readable name used in messages and prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentKind::Led => "LED",
            ComponentKind::Button => "push button",
            ComponentKind::Potentiometer => "potentiometer",
            ComponentKind::Servo => "servo motor",
            ComponentKind::Resistor => "resistor",
            ComponentKind::Buzzer => "buzzer",
            ComponentKind::SevenSegmentDisplay => "7-segment display",
            ComponentKind::UltrasonicSensor => "ultrasonic sensor",
            ComponentKind::Lcd => "16x2 LCD",
            ComponentKind::Joystick => "joystick",
            ComponentKind::PirSensor => "PIR motion sensor",
            ComponentKind::TempSensor => "temperature sensor",
            ComponentKind::RgbLed => "RGB LED",
            ComponentKind::Relay => "relay module",
            ComponentKind::Keypad => "4x4 keypad",
            ComponentKind::DcMotor => "DC motor",
            ComponentKind::Protoboard => "breadboard",
            ComponentKind::Unknown => "unknown component",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ComponentKind::Unknown)
    }

    /// Kinds whose type implies internal connections beyond explicit wires.
    pub fn is_bus(&self) -> bool {
        matches!(self, ComponentKind::Protoboard)
    }

    /// Terminal names this kind exposes.
    pub fn terminals(&self) -> Vec<String> {
        pinout::terminals_for(*self)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown component type '{}'", s))
    }
}

/// Simulation state, keyed by what the component type needs.
///
/// The validator never looks at this; it only travels with the record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentState {
    Led {
        #[serde(default)]
        is_on: bool,
    },
    Button {
        #[serde(default)]
        is_pressed: bool,
    },
    /// Potentiometer position, servo angle, joystick or sensor reading.
    Level {
        #[serde(default)]
        value: f64,
    },
    Segments {
        #[serde(default)]
        segments: BTreeMap<String, bool>,
    },
    #[default]
    Passive,
}

impl ComponentState {
    /// Resting state for a freshly placed component.
    pub fn initial_for(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Led | ComponentKind::RgbLed => ComponentState::Led { is_on: false },
            ComponentKind::Button => ComponentState::Button { is_pressed: false },
            ComponentKind::Potentiometer
            | ComponentKind::Servo
            | ComponentKind::Joystick
            | ComponentKind::TempSensor => ComponentState::Level { value: 0.0 },
            ComponentKind::SevenSegmentDisplay => ComponentState::Segments {
                segments: pinout::SEVEN_SEGMENT_SEGMENTS
                    .iter()
                    .map(|s| (s.to_string(), false))
                    .collect(),
            },
            _ => ComponentState::Passive,
        }
    }
}

/// Canvas position of a component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A placed circuit element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default)]
    pub state: ComponentState,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            position: None,
            state: ComponentState::initial_for(kind),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point { x, y });
        self
    }

    /// The terminal `name` on this component.
    pub fn terminal(&self, name: &str) -> Terminal {
        Terminal::new(self.id.clone(), name)
    }

    pub fn has_terminal(&self, name: &str) -> bool {
        pinout::has_terminal(self.kind, name)
    }
}
