use crate::parser::schema::{Component, Terminal, Wire};

/// Describe one wire endpoint in prose.
fn describe_endpoint(terminal: &Terminal, components: &[Component]) -> String {
    if terminal.is_board_pin() {
        let pin = terminal.terminal_id.replacen("pin-", "", 1);
        return format!("Arduino pin {}", pin);
    }
    let label = components
        .iter()
        .find(|c| c.id == terminal.component_id)
        .map(|c| c.label.as_str())
        .filter(|l| !l.is_empty())
        .unwrap_or("a component");
    format!("{} terminal {}", label, terminal.terminal_id)
}

/// Render the wiring as one sentence per wire.
pub fn describe_circuit(components: &[Component], wires: &[Wire]) -> String {
    if wires.is_empty() {
        return "No components are wired.".to_string();
    }
    wires
        .iter()
        .map(|w| {
            format!(
                "{} is connected to {}.",
                describe_endpoint(&w.start, components),
                describe_endpoint(&w.end, components)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn summarize_components(components: &[Component]) -> String {
    if components.is_empty() {
        return "none".to_string();
    }
    components
        .iter()
        .map(|c| format!("{} ({})", c.label, c.kind))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_generation_prompt(goal: &str, components: &[Component], wires: &[Wire]) -> String {
    let component_list = summarize_components(components);
    let circuit_description = describe_circuit(components, wires);

    format!(
        r#"You are an expert Arduino programmer and electronics tutor.
Your task is to provide a complete solution for an Arduino Uno project based on the user's request.

The user has the following components available on their virtual workbench: {}.
The current wiring on the workbench is as follows: "{}". An empty description means nothing is wired.

Based on this setup, the user's request is: "{}".

Please provide a two-part response:
1.  **Wiring Instructions:** A clear, step-by-step guide on how to wire the necessary components to achieve the user's goal. Base the instructions on the available components. If the user has already wired components, acknowledge the existing wiring and give instructions for any missing or incorrect connections. If the circuit is empty or the wiring is irrelevant to the request, give a complete, step-by-step guide. Be specific about pin numbers (e.g., "Connect the LED's long leg (anode) to digital pin 13.").
2.  **Arduino Code:** A complete, compilable Arduino C++ sketch for the .ino file that implements the user's logic.

FORMATTING REQUIREMENTS:
- Use the exact markdown headings `### Wiring Instructions` and `### Arduino Code`.
- Wrap the entire C++ code in a single markdown block like this: ```cpp ... ```
- Use clear and simple language for the wiring instructions, with bullet points or a numbered list.
"#,
        component_list, circuit_description, goal
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::ComponentKind;

    fn bench() -> Vec<Component> {
        vec![
            Component::new("led-1", ComponentKind::Led, "Red LED"),
            Component::new("r-1", ComponentKind::Resistor, ""),
        ]
    }

    #[test]
    fn test_empty_wiring() {
        assert_eq!(describe_circuit(&bench(), &[]), "No components are wired.");
    }

    #[test]
    fn test_describe_wires() {
        let wires = vec![
            Wire::with_id("w1", Terminal::board("pin-13"), Terminal::new("led-1", "anode")),
            Wire::with_id("w2", Terminal::new("r-1", "t1"), Terminal::board("gnd-1")),
            Wire::with_id("w3", Terminal::new("ghost", "x"), Terminal::board("A0")),
        ];
        assert_eq!(
            describe_circuit(&bench(), &wires),
            "Arduino pin 13 is connected to Red LED terminal anode. \
             a component terminal t1 is connected to Arduino pin gnd-1. \
             a component terminal x is connected to Arduino pin A0."
        );
    }

    #[test]
    fn test_component_summary() {
        assert_eq!(summarize_components(&[]), "none");
        assert_eq!(summarize_components(&bench()), "Red LED (led),  (resistor)");
    }

    #[test]
    fn test_prompt_carries_goal_and_headings() {
        let prompt = build_generation_prompt("blink the LED", &bench(), &[]);
        assert!(prompt.contains("\"blink the LED\""));
        assert!(prompt.contains("Red LED (led)"));
        assert!(prompt.contains("\"No components are wired.\""));
        assert!(prompt.contains("### Wiring Instructions"));
        assert!(prompt.contains("### Arduino Code"));
    }
}
