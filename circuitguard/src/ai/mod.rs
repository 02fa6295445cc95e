pub mod gemini;
pub mod generator;
pub mod prompts;
pub mod provider;

// Re-export for convenience
pub use gemini::{GeminiClient, GenerationConfig};
pub use generator::{extract_solution, ExtractedSolution, Solution, SolutionGenerator};
pub use prompts::{build_generation_prompt, describe_circuit, summarize_components};
pub use provider::{GenerationError, GenerationProvider, ModelInfo};
