use crate::analyzer::catalogue::{self, Requirement, RuleDescriptor};
use crate::board::{terminal_role, PinRole};
use crate::netlist::{build_nets, resolve_nets, NetMap};
use crate::parser::pinout;
use crate::parser::schema::{Component, ComponentKind, Terminal, Wire, BOARD_ID};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Blocks simulation.
    Error,
    /// Advisory only.
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Id of the offending component.
    pub component: Option<String>,
    pub terminal: Option<String>,
    pub suggestion: Option<String>,
}

impl Issue {
    fn new(rule_id: &str, severity: Severity, component: &Component, message: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule_id.to_string(),
            severity,
            message,
            component: Some(component.id.clone()),
            terminal: None,
            suggestion: None,
        }
    }

    fn at(mut self, terminal: &str) -> Self {
        self.terminal = Some(terminal.to_string());
        self
    }

    fn suggest(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Resolved nets plus the component list, shared by all rules of one run.
pub struct RuleContext<'a> {
    pub components: &'a [Component],
    pub nets: &'a NetMap,
}

impl<'a> RuleContext<'a> {
    pub fn component(&self, id: &str) -> Option<&'a Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Does the terminal's net contain a board pin of `role`?
    pub fn reaches(&self, terminal: &Terminal, role: PinRole) -> bool {
        self.nets
            .members(terminal)
            .iter()
            .any(|t| terminal_role(t) == Some(role))
    }

    pub fn is_wired(&self, terminal: &Terminal) -> bool {
        self.nets.is_wired(terminal)
    }
}

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn applies_to(&self, component: &Component) -> bool;
    fn check(&self, component: &Component, context: &RuleContext<'_>) -> Vec<Issue>;
}

pub struct RulesEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// One rule per catalogue entry.
    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        for descriptor in catalogue::CATALOGUE {
            engine.add_rule(Arc::new(CatalogueRule::new(descriptor)));
        }
        engine
    }

    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    /// Build and resolve nets, then check every component in list order.
    pub fn analyze(&self, components: &[Component], wires: &[Wire]) -> Vec<Issue> {
        let nets = resolve_nets(&build_nets(components, wires));
        self.analyze_with_nets(components, &nets)
    }

    pub fn analyze_with_nets(&self, components: &[Component], nets: &NetMap) -> Vec<Issue> {
        let context = RuleContext { components, nets };
        let mut issues = Vec::new();
        for component in components {
            // Its terminals would read as board pins.
            if component.id == BOARD_ID {
                tracing::debug!("Skipping component that uses the board id");
                continue;
            }
            for rule in self.rules.iter().filter(|r| r.applies_to(component)) {
                issues.extend(rule.check(component, &context));
            }
        }
        issues
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Validate a circuit. Returns one message per blocking violation; an empty
/// list means the circuit may be simulated.
pub fn check_circuit(components: &[Component], wires: &[Wire]) -> Vec<String> {
    RulesEngine::with_default_rules()
        .analyze(components, wires)
        .into_iter()
        .filter(Issue::is_blocking)
        .map(|issue| issue.message)
        .collect()
}

// Rule implementations

/// Evaluates one catalogue descriptor.
pub struct CatalogueRule {
    descriptor: &'static RuleDescriptor,
}

impl CatalogueRule {
    pub fn new(descriptor: &'static RuleDescriptor) -> Self {
        Self { descriptor }
    }

    fn evaluate(
        &self,
        requirement: &Requirement,
        component: &Component,
        ctx: &RuleContext<'_>,
    ) -> Option<Issue> {
        let rule_id = self.descriptor.rule_id;
        let label = &component.label;

        match *requirement {
            Requirement::Role { terminal, role } => {
                let t = component.terminal(terminal);
                if !ctx.is_wired(&t) {
                    Some(
                        Issue::new(
                            rule_id,
                            Severity::Error,
                            component,
                            format!(
                                "{}: '{}' is not connected. It must be connected to {}.",
                                label,
                                terminal,
                                role.noun()
                            ),
                        )
                        .at(terminal)
                        .suggest(wire_to(label, terminal, role)),
                    )
                } else if !ctx.reaches(&t, role) {
                    Some(
                        Issue::new(
                            rule_id,
                            Severity::Error,
                            component,
                            format!("{}: '{}' must be connected to {}.", label, terminal, role.noun()),
                        )
                        .at(terminal)
                        .suggest(wire_to(label, terminal, role)),
                    )
                } else {
                    None
                }
            }
            Requirement::RoleIfWired { terminal, role } => {
                let t = component.terminal(terminal);
                (ctx.is_wired(&t) && !ctx.reaches(&t, role)).then(|| {
                    Issue::new(
                        rule_id,
                        Severity::Error,
                        component,
                        format!(
                            "{}: '{}' is wired but not to {}.",
                            label,
                            terminal,
                            role.noun()
                        ),
                    )
                    .at(terminal)
                    .suggest(wire_to(label, terminal, role))
                })
            }
            Requirement::EitherOrder {
                terminals: (a, b),
                roles: (first, second),
            } => {
                let ta = component.terminal(a);
                let tb = component.terminal(b);
                let straight = ctx.reaches(&ta, first) && ctx.reaches(&tb, second);
                let crossed = ctx.reaches(&ta, second) && ctx.reaches(&tb, first);
                (!straight && !crossed).then(|| {
                    Issue::new(
                        rule_id,
                        Severity::Error,
                        component,
                        format!(
                            "{}: one of '{}'/'{}' must be connected to {} and the other to {}.",
                            label,
                            a,
                            b,
                            first.noun(),
                            second.noun()
                        ),
                    )
                    .suggest(format!(
                        "Wire {} '{}' to {} and '{}' to {}",
                        label,
                        a,
                        first.example_pin(),
                        b,
                        second.example_pin()
                    ))
                })
            }
            Requirement::SeriesThrough { terminal, via, role } => {
                self.check_series(component, terminal, via, role, ctx)
            }
        }
    }

    /// Takes the first `via` lead found on the terminal's net, in terminal order.
    fn check_series(
        &self,
        component: &Component,
        terminal: &str,
        via: ComponentKind,
        role: PinRole,
        ctx: &RuleContext<'_>,
    ) -> Option<Issue> {
        let rule_id = self.descriptor.rule_id;
        let label = &component.label;
        let via_name = via.display_name();

        let series_lead = ctx
            .nets
            .members(&component.terminal(terminal))
            .iter()
            .find(|t| {
                t.component_id != component.id
                    && ctx.component(&t.component_id).map(|c| c.kind) == Some(via)
            });

        let Some(lead) = series_lead else {
            return Some(
                Issue::new(
                    rule_id,
                    Severity::Error,
                    component,
                    format!(
                        "{}: '{}' must be connected to {} through a {}.",
                        label,
                        terminal,
                        role.noun(),
                        via_name
                    ),
                )
                .at(terminal)
                .suggest(format!(
                    "Place a {} between {} '{}' and {}",
                    via_name,
                    label,
                    terminal,
                    role.example_pin()
                )),
            );
        };

        let part_label = ctx
            .component(&lead.component_id)
            .map(|c| c.label.as_str())
            .unwrap_or(lead.component_id.as_str());
        let far_side = pinout::partner_terminal(via, &lead.terminal_id)
            .map(|other| Terminal::new(lead.component_id.clone(), other));

        match far_side {
            Some(ref far) if ctx.reaches(far, role) => None,
            _ => Some(
                Issue::new(
                    rule_id,
                    Severity::Error,
                    component,
                    format!(
                        "{}: the {} on '{}' ({}) must lead to {}.",
                        label,
                        via_name,
                        terminal,
                        part_label,
                        role.noun()
                    ),
                )
                .at(terminal)
                .suggest(format!(
                    "Connect the free end of {} to {}",
                    part_label,
                    role.example_pin()
                )),
            ),
        }
    }
}

impl Rule for CatalogueRule {
    fn id(&self) -> &str {
        self.descriptor.rule_id
    }

    fn name(&self) -> &str {
        self.descriptor.name
    }

    fn applies_to(&self, component: &Component) -> bool {
        component.kind == self.descriptor.kind
    }

    fn check(&self, component: &Component, context: &RuleContext<'_>) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .descriptor
            .requirements
            .iter()
            .filter_map(|req| self.evaluate(req, component, context))
            .collect();

        if let Some(note) = self.descriptor.advisory {
            issues.push(Issue::new(
                self.descriptor.rule_id,
                Severity::Info,
                component,
                format!("{}: {}.", component.label, note),
            ));
        }
        issues
    }
}

/// Flags components whose type the catalogue does not know.
///
/// Not part of the default engine: unknown types pass silently unless this
/// rule is added (see `ValidationOptions::strict_unknown_types`).
pub struct UnknownComponentRule;

impl Rule for UnknownComponentRule {
    fn id(&self) -> &str {
        "unknown_component"
    }

    fn name(&self) -> &str {
        "Unknown component type"
    }

    fn applies_to(&self, component: &Component) -> bool {
        !component.kind.is_known()
    }

    fn check(&self, component: &Component, _context: &RuleContext<'_>) -> Vec<Issue> {
        vec![Issue::new(
            self.id(),
            Severity::Error,
            component,
            format!(
                "{}: component type is not recognised, so its wiring cannot be checked.",
                component.label
            ),
        )]
    }
}

fn wire_to(label: &str, terminal: &str, role: PinRole) -> String {
    format!("Wire {} '{}' to {}", label, terminal, role.example_pin())
}
