//! Framework records
//!
//! A [`Framework`] is a label plus an insertion-ordered mapping from control
//! name to the evidence tasks that satisfy it. The label lives in its own
//! field, so any string is a legal control name.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a unit of evidence (policy document, screenshot, export...)
pub type EvidenceTaskId = String;

/// Name of a requirement within a single framework
pub type Control = String;

/// A named compliance framework and its control-to-evidence mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    /// Human-readable name (e.g., "SOC 2", "ISO 27001:2013")
    label: String,

    /// Control name -> evidence tasks, in input order. Duplicates preserved.
    controls: IndexMap<Control, Vec<EvidenceTaskId>>,
}

impl Framework {
    /// Create an empty framework
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            controls: IndexMap::new(),
        }
    }

    /// Build a framework from `(control, evidence tasks)` pairs
    ///
    /// Repeated controls have their evidence lists concatenated.
    pub fn from_controls<C, I, E>(label: impl Into<String>, controls: C) -> Self
    where
        C: IntoIterator<Item = (E, I)>,
        I: IntoIterator,
        I::Item: Into<EvidenceTaskId>,
        E: Into<Control>,
    {
        let mut framework = Self::new(label);
        for (control, tasks) in controls {
            let list = framework.controls.entry(control.into()).or_default();
            list.extend(tasks.into_iter().map(Into::into));
        }
        framework
    }

    /// Framework label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Control mapping in insertion order
    pub fn controls(&self) -> &IndexMap<Control, Vec<EvidenceTaskId>> {
        &self.controls
    }

    /// Evidence tasks for a control, if the control exists
    pub fn evidence_for(&self, control: &str) -> Option<&[EvidenceTaskId]> {
        self.controls.get(control).map(Vec::as_slice)
    }

    /// Whether the framework defines `control`
    pub fn has_control(&self, control: &str) -> bool {
        self.controls.contains_key(control)
    }

    /// Number of controls
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    /// Whether the framework has no controls
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Distinct evidence task ids referenced by any control
    pub fn evidence_tasks(&self) -> HashSet<&str> {
        self.controls
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Controls that have no evidence task mapped to them
    pub fn unmapped_controls(&self) -> impl Iterator<Item = &str> {
        self.controls
            .iter()
            .filter(|(_, tasks)| tasks.is_empty())
            .map(|(control, _)| control.as_str())
    }

    /// Register a control with no evidence, keeping existing evidence if present
    pub(crate) fn register_control(&mut self, control: &str) {
        if !self.controls.contains_key(control) {
            self.controls.insert(control.to_string(), Vec::new());
        }
    }

    /// Append an evidence task to a control, creating the control if new
    pub(crate) fn assign(&mut self, control: &str, task: &str) {
        match self.controls.get_mut(control) {
            Some(tasks) => tasks.push(task.to_string()),
            None => {
                self.controls
                    .insert(control.to_string(), vec![task.to_string()]);
            }
        }
    }

    /// Append an evidence task to an already registered control
    ///
    /// Returns `false` and leaves the framework untouched when the control
    /// was never registered.
    pub(crate) fn assign_existing(&mut self, control: &str, task: &str) -> bool {
        match self.controls.get_mut(control) {
            Some(tasks) => {
                tasks.push(task.to_string());
                true
            }
            None => false,
        }
    }
}

/// Ordered collection of frameworks produced by a single build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSet {
    frameworks: IndexMap<String, Framework>,
}

impl FrameworkSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a framework, replacing any framework with the same label
    pub fn insert(&mut self, framework: Framework) -> Option<Framework> {
        self.frameworks
            .insert(framework.label().to_string(), framework)
    }

    /// Look up a framework by label
    pub fn get(&self, label: &str) -> Result<&Framework> {
        self.frameworks
            .get(label)
            .ok_or_else(|| Error::unknown_framework(label))
    }

    /// Look up several frameworks, failing on the first unknown label
    pub fn get_all<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<&Framework>> {
        labels.iter().map(|l| self.get(l.as_ref())).collect()
    }

    /// Mutable access used while building
    pub(crate) fn get_or_create(&mut self, label: &str) -> &mut Framework {
        self.frameworks
            .entry(label.to_string())
            .or_insert_with(|| Framework::new(label))
    }

    pub(crate) fn get_mut(&mut self, label: &str) -> Option<&mut Framework> {
        self.frameworks.get_mut(label)
    }

    /// Whether a framework with this label exists
    pub fn contains(&self, label: &str) -> bool {
        self.frameworks.contains_key(label)
    }

    /// Labels in build order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.frameworks.keys().map(String::as_str)
    }

    /// Frameworks in build order
    pub fn iter(&self) -> impl Iterator<Item = &Framework> {
        self.frameworks.values()
    }

    /// Number of frameworks
    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }
}

impl FromIterator<Framework> for FrameworkSet {
    fn from_iter<T: IntoIterator<Item = Framework>>(iter: T) -> Self {
        let mut set = Self::new();
        for framework in iter {
            set.insert(framework);
        }
        set
    }
}

impl<'a> IntoIterator for &'a FrameworkSet {
    type Item = &'a Framework;
    type IntoIter = indexmap::map::Values<'a, String, Framework>;

    fn into_iter(self) -> Self::IntoIter {
        self.frameworks.values()
    }
}
