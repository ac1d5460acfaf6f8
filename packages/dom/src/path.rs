//! Path algebra.
//!
//! A [`Path`] is an ordered sequence of [`Step`]s naming the route from a
//! declared root to a node; the empty sequence is the root itself. Each
//! step addresses either an ordinal child or an entry of a named slot.
//! All queries run on the step vector in O(depth) without touching the
//! tree, which is what lets mutation algorithms ascend and descend via
//! path values instead of live references.
//!
//! The string form (`Display`/`FromStr`) exists for the external boundary
//! only: steps joined by `/`, ordinals as decimal indices, slot steps as
//! `name:index`. The root renders as the empty string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Ordinal(usize),
    Slot(String, usize),
}

impl Step {
    pub fn index(&self) -> usize {
        match self {
            Step::Ordinal(index) | Step::Slot(_, index) => *index,
        }
    }

    pub fn slot_name(&self) -> Option<&str> {
        match self {
            Step::Ordinal(_) => None,
            Step::Slot(name, _) => Some(name),
        }
    }

    /// The same step kind pointing at a different index.
    pub fn with_index(&self, index: usize) -> Step {
        match self {
            Step::Ordinal(_) => Step::Ordinal(index),
            Step::Slot(name, _) => Step::Slot(name.clone(), index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    pub fn root() -> Self {
        Path { steps: Vec::new() }
    }

    /// Extends the path with an ordinal step.
    pub fn child(mut self, index: usize) -> Self {
        self.steps.push(Step::Ordinal(index));
        self
    }

    /// Extends the path with a slot step.
    pub fn slot_child(mut self, name: impl Into<String>, index: usize) -> Self {
        self.steps.push(Step::Slot(name.into(), index));
        self
    }

    pub fn join(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_child(&self) -> bool {
        !self.steps.is_empty()
    }

    /// The path one level up; `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        if self.steps.is_empty() {
            return None;
        }
        Some(Path {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }

    pub fn last_step(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Index of the last step; `None` at the root.
    pub fn step_index(&self) -> Option<usize> {
        self.steps.last().map(Step::index)
    }

    /// Slot name of the last step; `None` at the root or when the last
    /// step is ordinal.
    pub fn slot_name(&self) -> Option<&str> {
        self.steps.last().and_then(Step::slot_name)
    }

    /// The path addressing another index in the same sequence; `None` at
    /// the root.
    pub fn sibling(&self, index: usize) -> Option<Path> {
        let last = self.steps.last()?;
        let mut steps = self.steps[..self.steps.len() - 1].to_vec();
        steps.push(last.with_index(index));
        Some(Path { steps })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, step) in self.steps.iter().enumerate() {
            if position > 0 {
                write!(f, "/")?;
            }
            match step {
                Step::Ordinal(index) => write!(f, "{index}")?,
                Step::Slot(name, index) => write!(f, "{name}:{index}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = DomError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Ok(Path::root());
        }
        let mut steps = Vec::new();
        for segment in input.split('/') {
            if segment.is_empty() {
                return Err(DomError::path_syntax(input, "empty step"));
            }
            let step = match segment.split_once(':') {
                Some((name, index)) => {
                    if name.is_empty() {
                        return Err(DomError::path_syntax(input, "empty slot name"));
                    }
                    if name.starts_with('#') {
                        return Err(DomError::path_syntax(input, "slot name uses the reserved marker"));
                    }
                    let index = index
                        .parse()
                        .map_err(|_| DomError::path_syntax(input, "slot step index is not a number"))?;
                    Step::Slot(name.to_string(), index)
                }
                None => {
                    let index = segment
                        .parse()
                        .map_err(|_| DomError::path_syntax(input, "ordinal step is not a number"))?;
                    Step::Ordinal(index)
                }
            };
            steps.push(step);
        }
        Ok(Path { steps })
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
