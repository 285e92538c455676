//! Linear multi-step wizard coordination
//!
//! Tracks which step is shown and which steps have been completed. The
//! forms behind each step are separate [`crate::FormEngine`]s; the wizard
//! only decides where navigation may go.

use crate::engine::SubmitOutcome;
use crate::error::WizardError;

/// A single wizard step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub label: String,
    pub completed: bool,
}

/// Step sequence with reachability guards
#[derive(Debug, Clone)]
pub struct Wizard {
    steps: Vec<WizardStep>,
    current: usize,
}

impl Wizard {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: labels
                .into_iter()
                .map(|label| WizardStep {
                    label: label.into(),
                    completed: false,
                })
                .collect(),
            current: 0,
        }
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn current_label(&self) -> Option<&str> {
        self.steps.get(self.current).map(|s| s.label.as_str())
    }

    pub fn is_completed(&self, step: usize) -> bool {
        self.steps.get(step).is_some_and(|s| s.completed)
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    /// Current step, any completed step, or the step right after the current
    /// one once the current step is completed.
    pub fn is_reachable(&self, step: usize) -> bool {
        if step >= self.steps.len() {
            return false;
        }
        step == self.current
            || self.steps[step].completed
            || (step == self.current + 1 && self.is_completed(self.current))
    }

    /// Mark the current step as done
    pub fn complete_current(&mut self) {
        if let Some(step) = self.steps.get_mut(self.current) {
            step.completed = true;
            tracing::debug!(step = self.current, "wizard step completed");
        }
    }

    /// Move forward; the current step must be completed first
    pub fn next_step(&mut self) -> Result<usize, WizardError> {
        if self.is_last_step() {
            return Err(WizardError::AtLastStep);
        }
        if !self.is_completed(self.current) {
            return Err(WizardError::Incomplete(self.current));
        }
        self.current += 1;
        Ok(self.current)
    }

    /// Move back one step. Going back never needs a completed step.
    pub fn prev_step(&mut self) -> Result<usize, WizardError> {
        if self.current == 0 {
            return Err(WizardError::AtFirstStep);
        }
        self.current -= 1;
        Ok(self.current)
    }

    /// Jump to any reachable step
    pub fn jump_step(&mut self, step: usize) -> Result<usize, WizardError> {
        if step >= self.steps.len() {
            return Err(WizardError::OutOfRange {
                step,
                len: self.steps.len(),
            });
        }
        if !self.is_reachable(step) {
            return Err(WizardError::Unreachable(step));
        }
        self.current = step;
        Ok(self.current)
    }

    /// Complete the current step and advance, but only if its form submitted
    /// successfully. Returns whether the wizard moved.
    pub fn advance_with<T>(&mut self, outcome: &SubmitOutcome<T>) -> bool {
        if !outcome.is_submitted() {
            return false;
        }
        self.complete_current();
        self.next_step().is_ok()
    }

    /// Back to the first step with nothing completed
    pub fn reset(&mut self) {
        self.current = 0;
        for step in &mut self.steps {
            step.completed = false;
        }
    }
}
