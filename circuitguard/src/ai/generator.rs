//! Validation-gated solution generation.
//!
//! A circuit with wiring violations is never sent to a provider. The
//! response is split into wiring prose and a sketch, with placeholders when
//! either part is missing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::ai::prompts::build_generation_prompt;
use crate::ai::provider::{GenerationError, GenerationProvider};
use crate::analyzer::rules::check_circuit;
use crate::parser::snapshot::CircuitSnapshot;

pub const WIRING_HEADING: &str = "### Wiring Instructions";
pub const CODE_HEADING: &str = "### Arduino Code";
pub const MISSING_WIRING: &str = "Could not generate wiring instructions.";
pub const MISSING_CODE: &str =
    "// Could not generate code. Please check your prompt and circuit.\nvoid setup() {}\nvoid loop() {}";

#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub wiring: String,
    pub code: String,
    pub provider: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// Wiring prose and sketch pulled out of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSolution {
    pub wiring: String,
    pub code: String,
}

/// Split a response into its wiring section and its code block.
pub fn extract_solution(text: &str) -> ExtractedSolution {
    ExtractedSolution {
        wiring: extract_wiring(text).unwrap_or_else(|| MISSING_WIRING.to_string()),
        code: extract_code(text).unwrap_or_else(|| MISSING_CODE.to_string()),
    }
}

fn extract_wiring(text: &str) -> Option<String> {
    let start = text.find(WIRING_HEADING)? + WIRING_HEADING.len();
    let section = &text[start..];
    let section = match section.find(CODE_HEADING) {
        Some(end) => &section[..end],
        None => section,
    };
    let wiring = section.trim();
    (!wiring.is_empty()).then(|| wiring.to_string())
}

/// The block right under the code heading, else the first fenced block anywhere.
fn extract_code(text: &str) -> Option<String> {
    let under_heading = text
        .find(CODE_HEADING)
        .and_then(|i| fenced_body(text[i + CODE_HEADING.len()..].trim_start()));
    under_heading
        .or_else(|| text.find("```").and_then(|i| fenced_body(&text[i..])))
        .map(str::to_string)
}

fn fenced_body(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let rest = match rest.find('\n') {
        Some(nl) if is_info_string(&rest[..nl]) => &rest[nl + 1..],
        _ => rest,
    };
    let end = rest.find("```")?;
    let body = rest[..end].trim();
    (!body.is_empty()).then_some(body)
}

/// `cpp`, `c++`, `arduino` and the like; a bare fence counts too.
fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'))
}

pub struct SolutionGenerator {
    provider: Arc<dyn GenerationProvider>,
}

impl SolutionGenerator {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn GenerationProvider {
        self.provider.as_ref()
    }

    pub async fn generate(
        &self,
        goal: &str,
        snapshot: &CircuitSnapshot,
    ) -> Result<Solution, GenerationError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let violations = check_circuit(&snapshot.components, &snapshot.wires);
        if !violations.is_empty() {
            tracing::debug!("Refusing to generate: {} violations", violations.len());
            return Err(GenerationError::CircuitInvalid(violations));
        }

        let prompt = build_generation_prompt(goal, &snapshot.components, &snapshot.wires);
        let response = self.provider.generate(&prompt).await?;
        let extracted = extract_solution(&response);
        let info = self.provider.model_info();

        Ok(Solution {
            wiring: extracted.wiring,
            code: extracted.code,
            provider: info.provider,
            model: info.model_name,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ModelInfo;
    use crate::parser::schema::{Component, ComponentKind, Terminal};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const RESPONSE: &str = "Here you go.\n\n### Wiring Instructions\n\
        1. Connect the LED anode to pin 13 through the resistor.\n\
        2. Connect the cathode to GND.\n\n\
        ### Arduino Code\n```cpp\nvoid setup() {\n  pinMode(13, OUTPUT);\n}\nvoid loop() {}\n```\n";

    struct MockProvider {
        reply: String,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl MockProvider {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl GenerationProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn model_info(&self) -> ModelInfo {
            ModelInfo {
                provider: "mock".to_string(),
                model_name: "mock-1".to_string(),
                temperature: 0.0,
            }
        }
    }

    fn blink() -> CircuitSnapshot {
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
        snapshot
    }

    #[test]
    fn test_extract_both_sections() {
        let solution = extract_solution(RESPONSE);
        assert!(solution.wiring.starts_with("1. Connect the LED anode"));
        assert!(solution.wiring.ends_with("Connect the cathode to GND."));
        assert!(solution.code.starts_with("void setup() {"));
        assert!(solution.code.ends_with("void loop() {}"));
    }

    #[test]
    fn test_extract_falls_back_to_any_block() {
        let text = "### Arduino Code\nSee below.\n\n```c++\nvoid loop() {}\n```";
        let solution = extract_solution(text);
        assert_eq!(solution.code, "void loop() {}");
        assert_eq!(solution.wiring, MISSING_WIRING);
    }

    #[test]
    fn test_extract_placeholders() {
        let solution = extract_solution("I cannot help with that.");
        assert_eq!(solution.wiring, MISSING_WIRING);
        assert_eq!(solution.code, MISSING_CODE);
    }

    #[test]
    fn test_wiring_runs_to_end_without_code_heading() {
        let solution = extract_solution("### Wiring Instructions\n- pin 2 to button\n");
        assert_eq!(solution.wiring, "- pin 2 to button");
    }

    #[tokio::test]
    async fn test_generate_valid_circuit() {
        let provider = MockProvider::new(RESPONSE);
        let generator = SolutionGenerator::new(provider.clone());

        let solution = generator.generate("blink the LED", &blink()).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(solution.provider, "mock");
        assert!(solution.code.contains("pinMode(13, OUTPUT);"));

        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Arduino pin 13"));
        assert!(prompt.contains("L LED (led)"));
    }

    #[tokio::test]
    async fn test_invalid_circuit_never_reaches_provider() {
        let provider = MockProvider::new(RESPONSE);
        let generator = SolutionGenerator::new(provider.clone());
        let mut snapshot = CircuitSnapshot::new();
        snapshot
            .add_component(Component::new("led-1", ComponentKind::Led, "Red LED"))
            .unwrap();

        let err = generator.generate("blink", &snapshot).await.unwrap_err();
        match err {
            GenerationError::CircuitInvalid(violations) => assert_eq!(violations.len(), 2),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let provider = MockProvider::new(RESPONSE);
        let generator = SolutionGenerator::new(provider.clone());
        let err = generator.generate("   ", &blink()).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyPrompt));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
