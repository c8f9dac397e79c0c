#![forbid(unsafe_code)]

//! Contact form: validation, delivery, compose fallback, status messages.
//!
//! Delivery is asynchronous on the web, so submission is two-phase:
//! [`ContactForm::begin_submit`] validates and marks the message in flight,
//! and the host reports the transport result with
//! [`ContactForm::complete`]. When delivery fails the form opens the
//! visitor's mail client on a prefilled `mailto:` link instead. For
//! synchronous transports, [`ContactForm::submit`] does both phases.
//!
//! Status messages clear themselves after a dismissal delay; a newer status
//! cancels the older dismissal.
//!
//! This module never touches navigation or overlays.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;

use crate::config::ContactConfig;
use crate::navigation::PlatformError;
use crate::timer::{DeferredSlot, Timers};

/// What the visitor typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Required fields present and the reply address plausible.
    pub fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField { field });
            }
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ContactError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// `local@domain.tld`, no whitespace.
pub(crate) fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
        && !s.chars().any(char::is_whitespace)
}

/// The form rejected a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{0:?} is not an email address")]
    InvalidEmail(String),
    #[error("a message is already being sent")]
    InFlight,
    #[error("no message is being sent")]
    NotInFlight,
}

/// The email service did not take the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("email service rejected the message: {0}")]
    Rejected(String),
    #[error("email service unreachable: {0}")]
    Unreachable(String),
}

/// Sends a message through an email service.
pub trait EmailTransport {
    fn deliver(&self, message: &ContactMessage) -> Result<(), DeliveryError>;
}

/// Opens the visitor's mail client.
pub trait ComposeLauncher {
    fn open(&self, url: &str) -> Result<(), PlatformError>;
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryOutcome {
    /// The email service accepted the message.
    Delivered,
    /// Delivery failed; the mail client was opened instead.
    ComposeFallback,
    /// Delivery and the fallback both failed.
    Failed,
}

impl DeliveryOutcome {
    /// Whether the message reached the visitor's hands or the inbox.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Delivered | Self::ComposeFallback)
    }
}

/// The status line under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Sending,
    /// "Message sent successfully!"
    Sent,
    /// The mail client was opened with the message prefilled.
    ComposeOpened,
    /// "Something went wrong. Please try again."
    Failed,
}

/// `mailto:` link carrying `message` to `recipient`.
#[must_use]
pub fn mailto_url(recipient: &str, message: &ContactMessage) -> String {
    let subject = format!("Portfolio contact from {}", message.name.trim());
    let body = format!(
        "{}\n\n{} <{}>",
        message.message.trim(),
        message.name.trim(),
        message.email.trim()
    );
    format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    )
}

/// Contact form state.
pub struct ContactForm {
    recipient: String,
    composer: Rc<dyn ComposeLauncher>,
    status: Rc<Cell<FormStatus>>,
    in_flight: Option<ContactMessage>,
    dismiss: DeferredSlot,
    dismiss_after: Duration,
}

impl fmt::Debug for ContactForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactForm")
            .field("recipient", &self.recipient)
            .field("status", &self.status.get())
            .field("in_flight", &self.in_flight.is_some())
            .field("dismiss_after", &self.dismiss_after)
            .finish_non_exhaustive()
    }
}

impl ContactForm {
    #[must_use]
    pub fn new(config: &ContactConfig, timers: &Timers, composer: Rc<dyn ComposeLauncher>) -> Self {
        Self {
            recipient: config.recipient.clone(),
            composer,
            status: Rc::new(Cell::new(FormStatus::Idle)),
            in_flight: None,
            dismiss: DeferredSlot::new(timers, "contact-dismiss"),
            dismiss_after: config.dismiss_after(),
        }
    }

    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.status.get()
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate `message` and mark it in flight. The host sends the
    /// returned message and reports back through [`complete`](Self::complete).
    pub fn begin_submit(&mut self, message: ContactMessage) -> Result<&ContactMessage, ContactError> {
        if self.in_flight.is_some() {
            return Err(ContactError::InFlight);
        }
        message.validate()?;
        self.dismiss.cancel();
        self.status.set(FormStatus::Sending);
        tracing::debug!(target: "folio.contact", "contact message submitted");
        Ok(self.in_flight.insert(message))
    }

    /// Apply the transport result of the in-flight message.
    pub fn complete(
        &mut self,
        result: Result<(), DeliveryError>,
    ) -> Result<DeliveryOutcome, ContactError> {
        let message = self.in_flight.take().ok_or(ContactError::NotInFlight)?;
        let outcome = match result {
            Ok(()) => {
                tracing::info!(target: "folio.contact", "contact message delivered");
                DeliveryOutcome::Delivered
            }
            Err(err) => {
                tracing::warn!(target: "folio.contact", error = %err, "delivery failed, opening mail client");
                let url = mailto_url(&self.recipient, &message);
                match self.composer.open(&url) {
                    Ok(()) => DeliveryOutcome::ComposeFallback,
                    Err(open_err) => {
                        tracing::error!(target: "folio.contact", error = %open_err, "mail client fallback failed");
                        DeliveryOutcome::Failed
                    }
                }
            }
        };
        self.show(match outcome {
            DeliveryOutcome::Delivered => FormStatus::Sent,
            DeliveryOutcome::ComposeFallback => FormStatus::ComposeOpened,
            DeliveryOutcome::Failed => FormStatus::Failed,
        });
        Ok(outcome)
    }

    /// Validate, deliver through `transport`, and apply the result.
    pub fn submit(
        &mut self,
        message: ContactMessage,
        transport: &dyn EmailTransport,
    ) -> Result<DeliveryOutcome, ContactError> {
        let result = transport.deliver(self.begin_submit(message)?);
        self.complete(result)
    }

    /// Clear the status line now.
    pub fn dismiss(&self) {
        self.dismiss.cancel();
        self.status.set(FormStatus::Idle);
    }

    fn show(&self, status: FormStatus) {
        self.status.set(status);
        let cell = Rc::clone(&self.status);
        self.dismiss.schedule(self.dismiss_after, move || {
            if cell.get() == status {
                cell.set(FormStatus::Idle);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingComposer {
        opened: RefCell<Vec<String>>,
        fail: bool,
    }

    impl ComposeLauncher for RecordingComposer {
        fn open(&self, url: &str) -> Result<(), PlatformError> {
            if self.fail {
                return Err(PlatformError::failed("window.open", "blocked"));
            }
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    struct FixedTransport(Result<(), DeliveryError>);

    impl EmailTransport for FixedTransport {
        fn deliver(&self, _message: &ContactMessage) -> Result<(), DeliveryError> {
            self.0.clone()
        }
    }

    fn message() -> ContactMessage {
        ContactMessage::new("Ada", "ada@example.com", "Hello & welcome")
    }

    fn form(composer: Rc<RecordingComposer>) -> (Timers, ContactForm) {
        let timers = Timers::new();
        let form = ContactForm::new(&ContactConfig::default(), &timers, composer);
        (timers, form)
    }

    #[test]
    fn validation() {
        assert_eq!(message().validate(), Ok(()));
        let missing = ContactMessage::new("Ada", "", "hi");
        assert_eq!(
            missing.validate(),
            Err(ContactError::MissingField { field: "email" })
        );
        for bad in ["ada", "ada@", "@example.com", "ada@example", "a b@example.com", "ada@@x.io"] {
            let m = ContactMessage::new("Ada", bad, "hi");
            assert!(matches!(m.validate(), Err(ContactError::InvalidEmail(_))), "{bad}");
        }
    }

    #[test]
    fn mailto_is_encoded() {
        let url = mailto_url("mark@mayouftech.com", &message());
        assert!(url.starts_with("mailto:mark@mayouftech.com?subject=Portfolio%20contact%20from%20Ada&body="));
        assert!(url.contains("Hello%20%26%20welcome"));
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));
    }

    #[test]
    fn delivered_then_dismissed() {
        let composer = Rc::new(RecordingComposer::default());
        let (timers, mut form) = form(Rc::clone(&composer));
        let outcome = form.submit(message(), &FixedTransport(Ok(()))).unwrap();
        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(form.status(), FormStatus::Sent);
        timers.advance(Duration::from_millis(1999));
        assert_eq!(form.status(), FormStatus::Sent);
        timers.advance(Duration::from_millis(1));
        assert_eq!(form.status(), FormStatus::Idle);
        assert!(composer.opened.borrow().is_empty());
    }

    #[test]
    fn failure_opens_compose() {
        let composer = Rc::new(RecordingComposer::default());
        let (_timers, mut form) = form(Rc::clone(&composer));
        let outcome = form
            .submit(
                message(),
                &FixedTransport(Err(DeliveryError::Unreachable("offline".into()))),
            )
            .unwrap();
        assert_eq!(outcome, DeliveryOutcome::ComposeFallback);
        assert!(outcome.is_success());
        assert_eq!(form.status(), FormStatus::ComposeOpened);
        assert_eq!(composer.opened.borrow().len(), 1);
    }

    #[test]
    fn fallback_failure_reports_failed() {
        let composer = Rc::new(RecordingComposer {
            fail: true,
            ..Default::default()
        });
        let (_timers, mut form) = form(composer);
        let outcome = form
            .submit(message(), &FixedTransport(Err(DeliveryError::Rejected("quota".into()))))
            .unwrap();
        assert_eq!(outcome, DeliveryOutcome::Failed);
        assert!(!outcome.is_success());
        assert_eq!(form.status(), FormStatus::Failed);
    }

    #[test]
    fn two_phase_guards() {
        let (_timers, mut form) = form(Rc::default());
        assert_eq!(form.complete(Ok(())), Err(ContactError::NotInFlight));
        form.begin_submit(message()).unwrap();
        assert_eq!(form.status(), FormStatus::Sending);
        assert_eq!(form.begin_submit(message()).unwrap_err(), ContactError::InFlight);
        assert_eq!(form.complete(Ok(())), Ok(DeliveryOutcome::Delivered));
    }

    #[test]
    fn newer_status_supersedes_dismissal() {
        let (timers, mut form) = form(Rc::default());
        form.submit(message(), &FixedTransport(Ok(()))).unwrap();
        timers.advance(Duration::from_millis(1500));
        form.submit(message(), &FixedTransport(Ok(()))).unwrap();
        timers.advance(Duration::from_millis(1000));
        assert_eq!(form.status(), FormStatus::Sent);
        assert_eq!(timers.pending_count(), 1);
        timers.advance(Duration::from_millis(1000));
        assert_eq!(form.status(), FormStatus::Idle);
    }
}
