//! Wiring rule catalogue.
//!
//! One declarative descriptor per component type. Adding a component type
//! means adding an entry here; the checker itself does not change.

use crate::board::PinRole::{self, Analog, Digital, FiveVolt, Ground};
use crate::parser::schema::ComponentKind;

/// One wiring requirement on a component's terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The terminal must be wired, and its net must contain a pin of `role`.
    Role { terminal: &'static str, role: PinRole },
    /// Only checked when the terminal is wired.
    RoleIfWired { terminal: &'static str, role: PinRole },
    /// Two terminals must reach the two roles, in either order.
    EitherOrder {
        terminals: (&'static str, &'static str),
        roles: (PinRole, PinRole),
    },
    /// The terminal's net must hold a lead of a `via` part whose opposite
    /// lead's net contains a pin of `role`.
    SeriesThrough {
        terminal: &'static str,
        via: ComponentKind,
        role: PinRole,
    },
}

/// The rule set of one component type.
#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    pub kind: ComponentKind,
    pub rule_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirements: &'static [Requirement],
    /// Informational note attached to every instance; never blocks.
    pub advisory: Option<&'static str>,
}

const fn role(terminal: &'static str, role: PinRole) -> Requirement {
    Requirement::Role { terminal, role }
}

const fn if_wired(terminal: &'static str, role: PinRole) -> Requirement {
    Requirement::RoleIfWired { terminal, role }
}

const fn either(a: &'static str, b: &'static str, first: PinRole, second: PinRole) -> Requirement {
    Requirement::EitherOrder {
        terminals: (a, b),
        roles: (first, second),
    }
}

pub const CATALOGUE: &[RuleDescriptor] = &[
    RuleDescriptor {
        kind: ComponentKind::Led,
        rule_id: "led",
        name: "LED",
        description: "Cathode to GND; anode to a digital pin through a series resistor",
        requirements: &[
            role("cathode", Ground),
            Requirement::SeriesThrough {
                terminal: "anode",
                via: ComponentKind::Resistor,
                role: Digital,
            },
        ],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::Button,
        rule_id: "button",
        name: "Push button",
        description: "One lead to a digital pin, the other to GND",
        requirements: &[either("t1", "t2", Digital, Ground)],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::Potentiometer,
        rule_id: "potentiometer",
        name: "Potentiometer",
        description: "Wiper to an analog pin; outer leads to 5V and GND",
        requirements: &[role("wiper", Analog), either("t1", "t2", FiveVolt, Ground)],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::Servo,
        rule_id: "servo",
        name: "Servo motor",
        description: "Signal to a digital pin, VCC to 5V, GND to GND",
        requirements: &[role("signal", Digital), role("vcc", FiveVolt), role("gnd", Ground)],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::Buzzer,
        rule_id: "buzzer",
        name: "Buzzer",
        description: "One lead to a digital pin, the other to GND",
        requirements: &[either("t1", "t2", Digital, Ground)],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::SevenSegmentDisplay,
        rule_id: "seven_segment_display",
        name: "7-segment display",
        description: "Common to GND and segments to digital pins, where wired",
        requirements: &[
            if_wired("common", Ground),
            if_wired("a", Digital),
            if_wired("b", Digital),
            if_wired("c", Digital),
            if_wired("d", Digital),
            if_wired("e", Digital),
            if_wired("f", Digital),
            if_wired("g", Digital),
            if_wired("dp", Digital),
        ],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::UltrasonicSensor,
        rule_id: "ultrasonic_sensor",
        name: "Ultrasonic sensor",
        description: "VCC to 5V, GND to GND, Trig and Echo to digital pins",
        requirements: &[
            role("vcc", FiveVolt),
            role("gnd", Ground),
            role("trig", Digital),
            role("echo", Digital),
        ],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::Lcd,
        rule_id: "lcd",
        name: "16x2 LCD",
        description: "VSS to GND, VDD to 5V, RS/E/D4-D7 to digital pins",
        requirements: &[
            role("vss", Ground),
            role("vdd", FiveVolt),
            role("rs", Digital),
            role("e", Digital),
            role("d4", Digital),
            role("d5", Digital),
            role("d6", Digital),
            role("d7", Digital),
        ],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::Joystick,
        rule_id: "joystick",
        name: "Joystick",
        description: "GND to GND, VCC to 5V, VRx/VRy to analog pins, SW to a digital pin if wired",
        requirements: &[
            role("gnd", Ground),
            role("vcc", FiveVolt),
            role("vrx", Analog),
            role("vry", Analog),
            if_wired("sw", Digital),
        ],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::PirSensor,
        rule_id: "pir_sensor",
        name: "PIR motion sensor",
        description: "GND to GND, VCC to 5V, OUT to a digital pin",
        requirements: &[role("gnd", Ground), role("vcc", FiveVolt), role("out", Digital)],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::TempSensor,
        rule_id: "temp_sensor",
        name: "Temperature sensor",
        description: "GND to GND, VCC to 5V, VOUT to an analog pin",
        requirements: &[role("gnd", Ground), role("vcc", FiveVolt), role("vout", Analog)],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::RgbLed,
        rule_id: "rgb_led",
        name: "RGB LED",
        description: "Common cathode to GND; R/G/B to digital pins where wired",
        requirements: &[
            role("common", Ground),
            if_wired("r", Digital),
            if_wired("g", Digital),
            if_wired("b", Digital),
        ],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::Relay,
        rule_id: "relay",
        name: "Relay module",
        description: "GND to GND, VCC to 5V, IN to a digital pin",
        requirements: &[role("gnd", Ground), role("vcc", FiveVolt), role("in", Digital)],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::Keypad,
        rule_id: "keypad",
        name: "4x4 keypad",
        description: "Row and column lines to digital pins where wired",
        requirements: &[
            if_wired("r1", Digital),
            if_wired("r2", Digital),
            if_wired("r3", Digital),
            if_wired("r4", Digital),
            if_wired("c1", Digital),
            if_wired("c2", Digital),
            if_wired("c3", Digital),
            if_wired("c4", Digital),
        ],
        advisory: None,
    },
    RuleDescriptor {
        kind: ComponentKind::DcMotor,
        rule_id: "dc_motor",
        name: "DC motor",
        description: "One lead to GND, the other to a digital pin",
        requirements: &[either("t1", "t2", Ground, Digital)],
        advisory: Some(
            "a DC motor normally needs a transistor or motor driver between it and the board; \
             a bare pin cannot supply its current",
        ),
    },
];

/// Descriptor for a component type. Passive parts and unknown types have none.
pub fn descriptor_for(kind: ComponentKind) -> Option<&'static RuleDescriptor> {
    CATALOGUE.iter().find(|d| d.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::pinout;

    #[test]
    fn test_passive_and_unknown_have_no_rules() {
        assert!(descriptor_for(ComponentKind::Resistor).is_none());
        assert!(descriptor_for(ComponentKind::Protoboard).is_none());
        assert!(descriptor_for(ComponentKind::Unknown).is_none());
    }

    #[test]
    fn test_every_active_kind_has_one_descriptor() {
        for kind in ComponentKind::ALL {
            let count = CATALOGUE.iter().filter(|d| d.kind == kind).count();
            let expected = match kind {
                ComponentKind::Resistor | ComponentKind::Protoboard => 0,
                _ => 1,
            };
            assert_eq!(count, expected, "{:?}", kind);
        }
    }

    #[test]
    fn test_requirements_name_real_terminals() {
        for descriptor in CATALOGUE {
            for req in descriptor.requirements {
                let names: Vec<&str> = match *req {
                    Requirement::Role { terminal, .. }
                    | Requirement::RoleIfWired { terminal, .. }
                    | Requirement::SeriesThrough { terminal, .. } => vec![terminal],
                    Requirement::EitherOrder { terminals, .. } => vec![terminals.0, terminals.1],
                };
                for name in names {
                    assert!(
                        pinout::has_terminal(descriptor.kind, name),
                        "{} has no terminal {}",
                        descriptor.rule_id,
                        name
                    );
                }
            }
        }
    }

    #[test]
    fn test_series_part_has_two_leads() {
        for descriptor in CATALOGUE {
            for req in descriptor.requirements {
                if let Requirement::SeriesThrough { via, .. } = *req {
                    assert_eq!(pinout::fixed_terminals(via).len(), 2);
                }
            }
        }
    }
}
