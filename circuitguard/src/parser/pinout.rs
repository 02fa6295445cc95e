//! Static pinouts: which terminal names each component type exposes, and the
//! geometry of the prototyping board's internal buses.

use super::schema::ComponentKind;

/// Number of terminal-strip columns on the breadboard.
pub const PROTOBOARD_COLUMNS: usize = 30;
/// Number of holes along each power rail.
pub const PROTOBOARD_RAIL_POSITIONS: usize = 25;
/// Power rails, two on each long edge.
pub const PROTOBOARD_RAILS: [&str; 4] = ["top-pos", "top-neg", "bottom-pos", "bottom-neg"];
/// Row letters of the two terminal-strip groups, either side of the centre channel.
pub const PROTOBOARD_STRIP_GROUPS: [&[char]; 2] = [&['a', 'b', 'c', 'd', 'e'], &['f', 'g', 'h', 'i', 'j']];

pub const SEVEN_SEGMENT_SEGMENTS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "dp"];

const LED: &[&str] = &["anode", "cathode"];
const TWO_LEAD: &[&str] = &["t1", "t2"];
const POTENTIOMETER: &[&str] = &["t1", "wiper", "t2"];
const SERVO: &[&str] = &["signal", "vcc", "gnd"];
const SEVEN_SEGMENT: &[&str] = &["a", "b", "c", "d", "e", "f", "g", "dp", "common"];
const ULTRASONIC: &[&str] = &["vcc", "trig", "echo", "gnd"];
const LCD: &[&str] = &["vss", "vdd", "rs", "e", "d4", "d5", "d6", "d7"];
const JOYSTICK: &[&str] = &["gnd", "vcc", "vrx", "vry", "sw"];
const PIR: &[&str] = &["vcc", "out", "gnd"];
const TEMP_SENSOR: &[&str] = &["vcc", "vout", "gnd"];
const RGB_LED: &[&str] = &["r", "common", "g", "b"];
const RELAY: &[&str] = &["in", "gnd", "vcc", "com", "no", "nc"];
const KEYPAD: &[&str] = &["r1", "r2", "r3", "r4", "c1", "c2", "c3", "c4"];

/// Fixed terminal names of a kind. Empty for the protoboard, whose holes are
/// generated from its geometry, and for unknown kinds.
pub fn fixed_terminals(kind: ComponentKind) -> &'static [&'static str] {
    match kind {
        ComponentKind::Led => LED,
        ComponentKind::Button
        | ComponentKind::Resistor
        | ComponentKind::Buzzer
        | ComponentKind::DcMotor => TWO_LEAD,
        ComponentKind::Potentiometer => POTENTIOMETER,
        ComponentKind::Servo => SERVO,
        ComponentKind::SevenSegmentDisplay => SEVEN_SEGMENT,
        ComponentKind::UltrasonicSensor => ULTRASONIC,
        ComponentKind::Lcd => LCD,
        ComponentKind::Joystick => JOYSTICK,
        ComponentKind::PirSensor => PIR,
        ComponentKind::TempSensor => TEMP_SENSOR,
        ComponentKind::RgbLed => RGB_LED,
        ComponentKind::Relay => RELAY,
        ComponentKind::Keypad => KEYPAD,
        ComponentKind::Protoboard | ComponentKind::Unknown => &[],
    }
}

/// All terminal names of a kind, including generated protoboard holes.
pub fn terminals_for(kind: ComponentKind) -> Vec<String> {
    if kind.is_bus() {
        let rails = PROTOBOARD_RAILS.iter().flat_map(|rail| {
            (1..=PROTOBOARD_RAIL_POSITIONS).map(move |pos| rail_terminal(rail, pos))
        });
        let strips = PROTOBOARD_STRIP_GROUPS.iter().flat_map(|rows| {
            rows.iter().flat_map(|&row| {
                (1..=PROTOBOARD_COLUMNS).map(move |col| strip_terminal(row, col))
            })
        });
        return rails.chain(strips).collect();
    }
    fixed_terminals(kind).iter().map(|t| t.to_string()).collect()
}

pub fn has_terminal(kind: ComponentKind, name: &str) -> bool {
    if kind.is_bus() {
        return parse_rail_terminal(name).is_some() || parse_strip_terminal(name).is_some();
    }
    fixed_terminals(kind).contains(&name)
}

/// For a two-lead part, the lead opposite `name`.
pub fn partner_terminal(kind: ComponentKind, name: &str) -> Option<&'static str> {
    match fixed_terminals(kind) {
        [a, b] if *a == name => Some(*b),
        [a, b] if *b == name => Some(*a),
        _ => None,
    }
}

/// `rail-top-pos-3` style id.
pub fn rail_terminal(rail: &str, position: usize) -> String {
    format!("rail-{}-{}", rail, position)
}

/// `a1`, `j30` style id.
pub fn strip_terminal(row: char, column: usize) -> String {
    format!("{}{}", row, column)
}

fn parse_rail_terminal(name: &str) -> Option<(&str, usize)> {
    let rest = name.strip_prefix("rail-")?;
    let (rail, pos) = rest.rsplit_once('-')?;
    let pos: usize = pos.parse().ok()?;
    (PROTOBOARD_RAILS.contains(&rail) && (1..=PROTOBOARD_RAIL_POSITIONS).contains(&pos))
        .then_some((rail, pos))
}

fn parse_strip_terminal(name: &str) -> Option<(char, usize)> {
    let mut chars = name.chars();
    let row = chars.next()?;
    let col: usize = chars.as_str().parse().ok()?;
    let known_row = PROTOBOARD_STRIP_GROUPS.iter().any(|rows| rows.contains(&row));
    (known_row && (1..=PROTOBOARD_COLUMNS).contains(&col)).then_some((row, col))
}
