//! Contact form submission
//!
//! While a submission is in flight the submit control is disabled and
//! reads "Sending...". The lock is a guard: dropping it on any path
//! (success, failure, teardown) frees the gate, and [`SubmitGate::release`]
//! also restores the control on the page.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use folio_layout::page::{ElementId, LayoutSource, Page};

pub const SENDING_LABEL: &str = "Sending...";
pub const SUCCESS_MESSAGE: &str = "Thank you for your message! I will get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Sorry, your message could not be sent. Please try again later.";
pub const INVALID_MESSAGE: &str = "Please correct the highlighted fields.";

/// Name/value pairs collected from a form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub form: ElementId,
    pub fields: Vec<(String, String)>,
}

impl Submission {
    /// Collect every control of `form`, keyed by its `name` attribute
    pub fn collect<L: LayoutSource + ?Sized>(layout: &L, form: &ElementId) -> Self {
        let fields = layout
            .form_fields(form)
            .into_iter()
            .map(|id| {
                let name = layout
                    .attribute(&id, "name")
                    .unwrap_or_else(|| id.as_str().to_string());
                let value = layout.value(&id).unwrap_or_default();
                (name, value)
            })
            .collect();
        Self {
            form: form.clone(),
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Delivers submissions
///
/// Delivery completes `delay()` after the submit event; the controller
/// calls `deliver` when that timer fires.
pub trait SubmissionTransport: fmt::Debug {
    fn delay(&self) -> Duration;

    fn deliver(&mut self, submission: &Submission) -> anyhow::Result<()>;
}

/// Transport that never leaves the page
#[derive(Debug, Clone, Default)]
pub struct SimulatedTransport {
    delay: Duration,
    fail: bool,
    delivered: Vec<Submission>,
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail: false,
            delivered: Vec::new(),
        }
    }

    /// Make every delivery fail
    pub fn failing(mut self, fail: bool) -> Self {
        self.fail = fail;
        self
    }

    pub fn delivered(&self) -> &[Submission] {
        &self.delivered
    }
}

impl SubmissionTransport for SimulatedTransport {
    fn delay(&self) -> Duration {
        self.delay
    }

    fn deliver(&mut self, submission: &Submission) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!(crate::error::FolioError::Submission(
                "simulated network failure".to_string()
            ));
        }
        self.delivered.push(submission.clone());
        Ok(())
    }
}

/// Guard held while a submission is in flight
#[derive(Debug)]
pub struct SubmitLock {
    flag: Rc<Cell<bool>>,
}

impl Drop for SubmitLock {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Single-flight gate around the submit control
#[derive(Debug)]
pub struct SubmitGate {
    control: ElementId,
    locked: Rc<Cell<bool>>,
    idle_label: Option<String>,
}

impl SubmitGate {
    pub fn new(control: impl Into<ElementId>) -> Self {
        Self {
            control: control.into(),
            locked: Rc::new(Cell::new(false)),
            idle_label: None,
        }
    }

    pub fn control(&self) -> &ElementId {
        &self.control
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Lock the control; None while another submission holds it
    pub fn try_acquire<P: Page + ?Sized>(&mut self, page: &mut P) -> Option<SubmitLock> {
        if self.locked.get() {
            return None;
        }
        self.locked.set(true);
        if self.idle_label.is_none() {
            self.idle_label = page.text(&self.control);
        }
        self.render(page);
        tracing::debug!(control = %self.control, "submit control locked");
        Some(SubmitLock {
            flag: Rc::clone(&self.locked),
        })
    }

    /// Drop `lock` and restore the control
    pub fn release<P: Page + ?Sized>(&mut self, lock: SubmitLock, page: &mut P) {
        drop(lock);
        self.render(page);
    }

    /// Bring the control in line with the lock state
    pub fn render<P: Page + ?Sized>(&mut self, page: &mut P) {
        if self.locked.get() {
            page.set_attribute(&self.control, "disabled", "");
            page.set_text(&self.control, SENDING_LABEL);
        } else {
            page.remove_attribute(&self.control, "disabled");
            if let Some(label) = self.idle_label.take() {
                page.set_text(&self.control, &label);
            }
        }
    }
}

/// A submission waiting on its transport delay
#[derive(Debug)]
pub struct PendingSubmission {
    pub submission: Submission,
    pub lock: SubmitLock,
}
