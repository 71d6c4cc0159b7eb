//! Ordered breakdown of a calculation, for display and debugging.

use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Display) {
        self.steps.push(TraceStep {
            label: label.into(),
            value: value.to_string(),
        });
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Value of the first step with `label`
    pub fn get(&self, label: &str) -> Option<&str> {
        self.steps
            .iter()
            .find(|step| step.label == label)
            .map(|step| step.value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
