//! Board Pin Classification
//!
//! The Uno exposes pins whose names alone imply their electrical role. Every
//! rule goes through [`classify_pin`] so the interpretation is the same
//! everywhere.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parser::schema::Terminal;

/// Electrical role of a board pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinRole {
    Digital,
    Analog,
    Ground,
    FiveVolt,
    ThreeVolt,
}

impl PinRole {
    /// Phrase used inside violation messages ("connect it to a GND pin").
    pub fn noun(&self) -> &'static str {
        match self {
            PinRole::Digital => "a digital pin",
            PinRole::Analog => "an analog pin",
            PinRole::Ground => "a GND pin",
            PinRole::FiveVolt => "the 5V pin",
            PinRole::ThreeVolt => "the 3.3V pin",
        }
    }

    /// A board pin that satisfies this role, for suggestions.
    pub fn example_pin(&self) -> &'static str {
        match self {
            PinRole::Digital => "pin-13",
            PinRole::Analog => "A0",
            PinRole::Ground => "gnd-1",
            PinRole::FiveVolt => "5v",
            PinRole::ThreeVolt => "3.3v",
        }
    }
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PinRole::Digital => "digital",
            PinRole::Analog => "analog",
            PinRole::Ground => "GND",
            PinRole::FiveVolt => "5V",
            PinRole::ThreeVolt => "3.3V",
        };
        f.write_str(s)
    }
}

/// Highest digital pin number on the Uno.
const MAX_DIGITAL_PIN: u8 = 13;

/// Classify a board pin id.
///
/// `gnd*` is ground, `5v` and `3.3v` are the supplies, `A<digit>...` is analog
/// and `0`..`13` (bare or `pin-` prefixed) is digital. Other pins such as
/// `aref`, `reset` or `vin` have no role.
pub fn classify_pin(pin_id: &str) -> Option<PinRole> {
    if pin_id.starts_with("gnd") {
        return Some(PinRole::Ground);
    }
    match pin_id {
        "5v" => return Some(PinRole::FiveVolt),
        "3.3v" => return Some(PinRole::ThreeVolt),
        _ => {}
    }
    if let Some(rest) = pin_id.strip_prefix('A') {
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return Some(PinRole::Analog);
        }
    }
    let number = pin_id.strip_prefix("pin-").unwrap_or(pin_id);
    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = number.parse::<u8>() {
            if n <= MAX_DIGITAL_PIN {
                return Some(PinRole::Digital);
            }
        }
    }
    None
}

/// Role of a terminal, if it is a classified pin of the board.
pub fn terminal_role(terminal: &Terminal) -> Option<PinRole> {
    if terminal.is_board_pin() {
        classify_pin(&terminal.terminal_id)
    } else {
        None
    }
}

/// Header strip a pin sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Header {
    Digital,
    Power,
    Analog,
}

/// One pin of the board with its silkscreen label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardPin {
    pub id: &'static str,
    pub label: &'static str,
    pub header: Header,
}

const fn pin(id: &'static str, label: &'static str, header: Header) -> BoardPin {
    BoardPin { id, label, header }
}

/// Uno pin table, left to right per header.
pub const UNO_PINS: &[BoardPin] = &[
    pin("aref", "AREF", Header::Digital),
    pin("gnd-1", "GND", Header::Digital),
    pin("pin-13", "13", Header::Digital),
    pin("pin-12", "12", Header::Digital),
    pin("pin-11", "~11", Header::Digital),
    pin("pin-10", "~10", Header::Digital),
    pin("pin-9", "~9", Header::Digital),
    pin("pin-8", "8", Header::Digital),
    pin("pin-7", "7", Header::Digital),
    pin("pin-6", "~6", Header::Digital),
    pin("pin-5", "~5", Header::Digital),
    pin("pin-4", "4", Header::Digital),
    pin("pin-3", "~3", Header::Digital),
    pin("pin-2", "2", Header::Digital),
    pin("pin-1", "1 TX", Header::Digital),
    pin("pin-0", "0 RX", Header::Digital),
    pin("io-ref", "IOREF", Header::Power),
    pin("reset", "RESET", Header::Power),
    pin("3.3v", "3.3V", Header::Power),
    pin("5v", "5V", Header::Power),
    pin("gnd-2", "GND", Header::Power),
    pin("gnd-3", "GND", Header::Power),
    pin("vin", "VIN", Header::Power),
    pin("A0", "A0", Header::Analog),
    pin("A1", "A1", Header::Analog),
    pin("A2", "A2", Header::Analog),
    pin("A3", "A3", Header::Analog),
    pin("A4", "A4/SDA", Header::Analog),
    pin("A5", "A5/SCL", Header::Analog),
];

pub fn board_pin(id: &str) -> Option<&'static BoardPin> {
    UNO_PINS.iter().find(|p| p.id == id)
}
