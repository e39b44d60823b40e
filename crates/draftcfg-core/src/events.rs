//! Synchronous change notification
//!
//! Listeners subscribe either to every commit ([`ChangeEvent::Any`],
//! `"change"`) or to a single key ([`ChangeEvent::Key`], `"change:<key>"`).
//! Dispatch happens inline, in registration order, before the mutating call
//! returns. A listener error is not caught: it stops the rest of the
//! dispatch and is handed back to the caller.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::{BoxError, Error, Result};

/// Name of the batch event
pub const CHANGE_EVENT: &str = "change";

/// One property's new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alteration {
    pub key: String,
    pub value: Value,
}

impl Alteration {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Events a listener can subscribe to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    /// Every commit, delivered as a batch
    Any,
    /// Changes to one key, delivered as the bare value
    Key(String),
}

impl ChangeEvent {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "{CHANGE_EVENT}"),
            Self::Key(key) => write!(f, "{CHANGE_EVENT}:{key}"),
        }
    }
}

impl FromStr for ChangeEvent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.strip_prefix(CHANGE_EVENT) {
            Some("") => Ok(Self::Any),
            Some(rest) => match rest.strip_prefix(':') {
                Some(key) if !key.is_empty() => Ok(Self::Key(key.to_string())),
                _ => Err(format!("invalid change event name: {s}")),
            },
            None => Err(format!("invalid change event name: {s}")),
        }
    }
}

/// What a listener receives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// All alterations of one commit, in order
    Batch(&'a [Alteration]),
    /// The new value of the subscribed key
    Value(&'a Value),
}

/// Outcome of a listener call
pub type ListenerResult = std::result::Result<(), BoxError>;

type Callback = Box<dyn FnMut(&Payload<'_>) -> ListenerResult>;

struct Registration {
    callback: Callback,
    once: bool,
}

/// Ordered callback registry keyed by event.
#[derive(Default)]
pub struct Emitter {
    listeners: HashMap<ChangeEvent, Vec<Registration>>,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<String, usize> = self
            .listeners
            .iter()
            .map(|(event, regs)| (event.to_string(), regs.len()))
            .collect();
        f.debug_struct("Emitter").field("listeners", &counts).finish()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, event: ChangeEvent, listener: F)
    where
        F: FnMut(&Payload<'_>) -> ListenerResult + 'static,
    {
        self.register(event, Box::new(listener), false);
    }

    /// Register a listener that is dropped after its first call.
    pub fn subscribe_once<F>(&mut self, event: ChangeEvent, listener: F)
    where
        F: FnMut(&Payload<'_>) -> ListenerResult + 'static,
    {
        self.register(event, Box::new(listener), true);
    }

    /// Drop every listener for `event`.
    pub fn unsubscribe_all(&mut self, event: &ChangeEvent) {
        self.listeners.remove(event);
    }

    pub fn listener_count(&self, event: &ChangeEvent) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    /// Call every listener for `event` in registration order.
    ///
    /// Stops at the first listener error.
    pub fn publish(&mut self, event: &ChangeEvent, payload: &Payload<'_>) -> Result<()> {
        let Some(registrations) = self.listeners.get_mut(event) else {
            return Ok(());
        };
        trace!(%event, listeners = registrations.len(), "publishing");

        let mut index = 0;
        while index < registrations.len() {
            let outcome = (registrations[index].callback)(payload);
            if registrations[index].once {
                registrations.remove(index);
            } else {
                index += 1;
            }
            outcome.map_err(|source| Error::Listener {
                event: event.to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Deliver one commit: the batch first, then per-key events if enabled.
    pub fn dispatch(&mut self, alterations: &[Alteration], per_key: bool) -> Result<()> {
        self.publish(&ChangeEvent::Any, &Payload::Batch(alterations))?;
        if per_key {
            for alteration in alterations {
                self.publish(
                    &ChangeEvent::Key(alteration.key.clone()),
                    &Payload::Value(&alteration.value),
                )?;
            }
        }
        Ok(())
    }

    fn register(&mut self, event: ChangeEvent, callback: Callback, once: bool) {
        self.listeners
            .entry(event)
            .or_default()
            .push(Registration { callback, once });
    }
}
