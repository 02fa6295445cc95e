//! Ask Gemini for wiring instructions and a sketch for a validated circuit.
//!
//! Reads the API key from `GEMINI_API_KEY` (or `API_KEY`).

use circuitguard::ai::{GeminiClient, GenerationConfig, SolutionGenerator};
use circuitguard::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let goal = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Blink the LED once per second".to_string());

    let mut snapshot = CircuitSnapshot::starter_bench();
    snapshot.connect(Terminal::new("led-1", "anode"), Terminal::new("resistor-1", "t1"))?;
    snapshot.connect(Terminal::new("resistor-1", "t2"), Terminal::board("pin-13"))?;
    snapshot.connect(Terminal::new("led-1", "cathode"), Terminal::board("gnd-1"))?;

    let client = GeminiClient::new(GenerationConfig::from_env()?);
    let generator = SolutionGenerator::new(Arc::new(client));
    let solution = generator.generate(&goal, &snapshot).await?;

    println!("### Wiring Instructions\n{}\n", solution.wiring);
    println!("### Arduino Code\n{}", solution.code);
    Ok(())
}
