//! Dependency-ordered install planning
//!
//! Units that other units require are hoisted ahead of the rest. Placement
//! is a single pass over the reverse-dependency index:
//!
//! 1. Every required unit, in the order its first dependent was seen, is
//!    emitted and annotated with the names of its dependents.
//! 2. All remaining units follow in their original order.
//!
//! Only one layer is hoisted. In a chain `A -> B -> C` (A requires B,
//! B requires C) the output is `B, C, A`: both requirements move ahead of
//! A, but B is not moved behind C. Requirements that name a unit outside
//! the planned set are ignored.

use std::collections::{HashMap, HashSet};

use blueprint_manifest::ResourceDescriptor;

use crate::unit::InstallableUnit;

/// A unit scheduled for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub unit: InstallableUnit,
    pub resource: ResourceDescriptor,
    /// Why the unit was moved ahead, e.g. `Required by: WooPayments`
    pub annotation: Option<String>,
}

/// Reverse-dependency index over a set of units.
///
/// Edges point from a required unit to the units that need it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Required ids in discovery order
    required: Vec<String>,
    /// Required id to dependent ids, in discovery order
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the index, keeping only edges whose target is in `units`.
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a InstallableUnit>) -> Self {
        let units: Vec<&InstallableUnit> = units.into_iter().collect();
        let known: HashSet<&str> = units.iter().map(|u| u.id.as_str()).collect();
        let mut graph = Self::default();

        for unit in units {
            for required in &unit.requires {
                if !known.contains(required.as_str()) {
                    tracing::debug!(unit = %unit.id, %required, "ignoring dangling requirement");
                    continue;
                }
                graph.add_edge(required, &unit.id);
            }
        }

        graph
    }

    /// Record that `dependent` requires `required`.
    pub fn add_edge(&mut self, required: &str, dependent: &str) {
        if !self.dependents.contains_key(required) {
            self.required.push(required.to_string());
        }
        let dependents = self.dependents.entry(required.to_string()).or_default();
        if !dependents.iter().any(|d| d == dependent) {
            dependents.push(dependent.to_string());
        }
    }

    /// Required ids in the order they were discovered.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(String::as_str)
    }

    /// Units that require `id`.
    pub fn dependents_of(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}

/// Order resolved units so required units come before their dependents.
pub fn plan(units: Vec<(InstallableUnit, ResourceDescriptor)>) -> Vec<PlannedStep> {
    let graph = DependencyGraph::from_units(units.iter().map(|(u, _)| u));

    let names: HashMap<&str, &str> = units
        .iter()
        .map(|(u, _)| (u.id.as_str(), u.display_name.as_str()))
        .collect();
    let annotations: HashMap<String, String> = graph
        .required()
        .map(|id| {
            let needed_by: Vec<&str> = graph
                .dependents_of(id)
                .iter()
                .map(|d| names.get(d.as_str()).copied().unwrap_or(d.as_str()))
                .collect();
            (id.to_string(), format!("Required by: {}", needed_by.join(", ")))
        })
        .collect();

    let mut pending: Vec<Option<(InstallableUnit, ResourceDescriptor)>> =
        units.into_iter().map(Some).collect();
    let position: HashMap<String, usize> = pending
        .iter()
        .enumerate()
        .filter_map(|(i, u)| u.as_ref().map(|(u, _)| (u.id.clone(), i)))
        .collect();

    let mut planned = Vec::with_capacity(pending.len());

    for id in graph.required() {
        let Some(&index) = position.get(id) else {
            continue;
        };
        if let Some((unit, resource)) = pending[index].take() {
            let annotation = annotations.get(id).cloned();
            tracing::debug!(unit = %unit.id, ?annotation, "hoisted required unit");
            planned.push(PlannedStep {
                unit,
                resource,
                annotation,
            });
        }
    }

    planned.extend(pending.into_iter().flatten().map(|(unit, resource)| PlannedStep {
        unit,
        resource,
        annotation: None,
    }));

    planned
}
