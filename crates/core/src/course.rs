// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Course and module entities held in the local cache.

use serde::{Deserialize, Serialize};

/// A unit of a course that the learner can complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Identifier, unique within the parent course.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Module {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Module { id: id.into(), title: title.into(), completed: false }
    }
}

/// A course the learner can enroll in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub modules: Vec<Module>,
    /// Completion percentage, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Course {
            id: id.into(),
            title: title.into(),
            modules: Vec::new(),
            progress: 0,
            level: None,
            duration: None,
        }
    }

    /// Builder-style helper to attach modules.
    pub fn with_modules(mut self, modules: Vec<Module>) -> Self {
        self.modules = modules;
        self
    }

    /// Number of modules marked completed.
    pub fn completed_count(&self) -> usize {
        self.modules.iter().filter(|m| m.completed).count()
    }

    /// Progress implied by the completed modules, `round(100 * done / total)`.
    ///
    /// A course with no modules reports its stored progress unchanged.
    pub fn derived_progress(&self) -> u8 {
        let total = self.modules.len();
        if total == 0 {
            return self.progress;
        }
        let pct = (100.0 * self.completed_count() as f64 / total as f64).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Marks a module completed and recomputes progress.
    ///
    /// Returns false if the module is not part of this course. Completing an
    /// already completed module leaves the course unchanged.
    pub fn complete_module(&mut self, module_id: &str) -> bool {
        match self.modules.iter_mut().find(|m| m.id == module_id) {
            Some(module) => {
                module.completed = true;
                self.progress = self.derived_progress();
                true
            }
            None => false,
        }
    }

    /// Sets progress, clamped to 0..=100.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
    }
}

#[cfg(test)]
#[path = "course_tests.rs"]
mod tests;
