pub mod catalogue;
pub mod rules;

pub use catalogue::{descriptor_for, Requirement, RuleDescriptor, CATALOGUE};
pub use rules::{check_circuit, Issue, Rule, RuleContext, RulesEngine, Severity, UnknownComponentRule};
