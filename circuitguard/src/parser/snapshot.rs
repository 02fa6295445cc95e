//! Circuit snapshots: the component list and wire list handed to the
//! validator, plus JSON loading and the small editing operations the
//! workbench performs on them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::schema::{Component, ComponentKind, Terminal, Wire, BOARD_ID};
use crate::core::CircuitGuardError;

/// Immutable input of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitSnapshot {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl CircuitSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The starter bench: an LED and a 220Ω resistor, nothing wired.
    pub fn starter_bench() -> Self {
        Self {
            components: vec![
                Component::new("led-1", ComponentKind::Led, "L LED").with_position(100.0, 280.0),
                Component::new("resistor-1", ComponentKind::Resistor, "220Ω Resistor")
                    .with_position(250.0, 280.0),
            ],
            wires: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CircuitGuardError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.components.iter().any(|c| c.id == BOARD_ID) {
            return Err(CircuitGuardError::DuplicateComponent(BOARD_ID.to_string()));
        }
        Ok(snapshot)
    }

    pub fn from_path(path: &Path) -> Result<Self, CircuitGuardError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, CircuitGuardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Place a component. Ids must be unique and must not collide with the board.
    pub fn add_component(&mut self, component: Component) -> Result<(), CircuitGuardError> {
        if component.id == BOARD_ID || self.component(&component.id).is_some() {
            return Err(CircuitGuardError::DuplicateComponent(component.id));
        }
        self.components.push(component);
        Ok(())
    }

    /// Remove a component together with every wire attached to it.
    pub fn remove_component(&mut self, id: &str) -> Option<Component> {
        let index = self.components.iter().position(|c| c.id == id)?;
        self.wires.retain(|w| !w.touches(id));
        Some(self.components.remove(index))
    }

    /// Draw a wire between two terminals. Returns the new wire's id.
    pub fn connect(&mut self, start: Terminal, end: Terminal) -> Result<String, CircuitGuardError> {
        if start == end {
            return Err(CircuitGuardError::InvalidWire(format!(
                "cannot connect {} to itself",
                start
            )));
        }
        for terminal in [&start, &end] {
            if !terminal.is_board_pin() && self.component(&terminal.component_id).is_none() {
                return Err(CircuitGuardError::InvalidWire(format!(
                    "no component with id '{}'",
                    terminal.component_id
                )));
            }
        }
        let wire = Wire::new(start, end);
        let id = wire.id.clone();
        self.wires.push(wire);
        Ok(id)
    }

    pub fn remove_wire(&mut self, id: &str) -> Option<Wire> {
        let index = self.wires.iter().position(|w| w.id == id)?;
        Some(self.wires.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_component_cascades_wires() {
        let mut snapshot = CircuitSnapshot::starter_bench();
        snapshot
            .connect(Terminal::new("led-1", "anode"), Terminal::new("resistor-1", "t1"))
            .unwrap();
        snapshot
            .connect(Terminal::new("resistor-1", "t2"), Terminal::board("pin-13"))
            .unwrap();
        snapshot
            .connect(Terminal::new("led-1", "cathode"), Terminal::board("gnd-1"))
            .unwrap();

        let removed = snapshot.remove_component("resistor-1").unwrap();
        assert_eq!(removed.kind, ComponentKind::Resistor);
        assert_eq!(snapshot.wires.len(), 1);
        assert!(snapshot.wires[0].touches("led-1"));
        assert!(snapshot.remove_component("resistor-1").is_none());
    }

    #[test]
    fn test_connect_rejects_self_and_dangling() {
        let mut snapshot = CircuitSnapshot::starter_bench();
        let anode = Terminal::new("led-1", "anode");
        assert!(matches!(
            snapshot.connect(anode.clone(), anode.clone()),
            Err(CircuitGuardError::InvalidWire(_))
        ));
        assert!(matches!(
            snapshot.connect(anode, Terminal::new("ghost", "t1")),
            Err(CircuitGuardError::InvalidWire(_))
        ));
        assert!(snapshot.wires.is_empty());
    }

    #[test]
    fn test_add_component_rejects_duplicates() {
        let mut snapshot = CircuitSnapshot::starter_bench();
        let dup = Component::new("led-1", ComponentKind::Led, "Another");
        assert!(snapshot.add_component(dup).is_err());
        let board = Component::new(BOARD_ID, ComponentKind::Unknown, "Board");
        assert!(snapshot.add_component(board).is_err());
        let fresh = Component::new("btn-1", ComponentKind::Button, "Go");
        assert!(snapshot.add_component(fresh).is_ok());
        assert_eq!(snapshot.components.len(), 3);
    }

    #[test]
    fn test_remove_wire() {
        let mut snapshot = CircuitSnapshot::starter_bench();
        let id = snapshot
            .connect(Terminal::new("led-1", "cathode"), Terminal::board("gnd-2"))
            .unwrap();
        assert!(snapshot.remove_wire("nope").is_none());
        assert_eq!(snapshot.remove_wire(&id).map(|w| w.id), Some(id));
        assert!(snapshot.wires.is_empty());
    }

    #[test]
    fn test_json_round_trip_keeps_wiring() {
        let mut snapshot = CircuitSnapshot::starter_bench();
        snapshot
            .connect(Terminal::new("led-1", "cathode"), Terminal::board("gnd-1"))
            .unwrap();
        let json = snapshot.to_json_pretty().unwrap();
        assert!(json.contains("\"componentId\": \"arduino\""));
        let parsed = CircuitSnapshot::from_json_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = CircuitSnapshot::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CircuitGuardError::Parse(_)));
    }

    #[test]
    fn test_json_component_cannot_use_board_id() {
        let json = r#"{ "components": [{ "id": "arduino", "type": "servo", "label": "Fake" }] }"#;
        let err = CircuitSnapshot::from_json_str(json).unwrap_err();
        assert!(matches!(err, CircuitGuardError::DuplicateComponent(ref id) if id == BOARD_ID));
    }
}
