//! Message channel to a privileged test controller.
//!
//! Integration tests sometimes need actions the page itself cannot perform
//! (mounting fake volumes, changing OS-level settings). Those go over a
//! request/response channel to an out-of-process controller — faked here by
//! [`ScriptedController`], which records every request and replies from a
//! queue of canned responses.
//!
//! ## Clone fidelity
//!
//! Real test-message channels copy payloads across a process boundary.
//! To keep that honest, every request and response is round-tripped through
//! `bincode` before delivery: non-serializable payloads fail at test time,
//! and delivered values are deep copies with no shared references.

use crate::result::{FingirError, FingirResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Request sent to the privileged controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControllerRequest {
    /// Mount a fake volume with this name
    MountVolume {
        /// Volume name
        name: String,
    },
    /// Unmount a previously mounted volume
    UnmountVolume {
        /// Volume name
        name: String,
    },
    /// Change an OS-level setting
    SetSystemSetting {
        /// Setting name
        name: String,
        /// Setting value, serialized as text
        value: String,
    },
    /// Raw text passthrough for controller verbs without a typed form
    Raw {
        /// Message text
        text: String,
    },
}

impl ControllerRequest {
    /// Mount-volume request.
    #[must_use]
    pub fn mount_volume(name: impl Into<String>) -> Self {
        Self::MountVolume { name: name.into() }
    }

    /// System-setting request.
    #[must_use]
    pub fn set_system_setting(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::SetSystemSetting {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Raw passthrough request.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw { text: text.into() }
    }
}

/// Response from the privileged controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControllerResponse {
    /// Request succeeded with no payload
    Ok,
    /// Request succeeded with a text payload
    Text(String),
    /// Controller-side failure
    Error {
        /// Error message
        message: String,
    },
}

/// Handler seam for the controller side of the channel.
///
/// Payload types are associated so suites can drive controllers with their
/// own request/response vocabulary; both sides must survive the wire
/// round-trip, which is how non-cloneable payloads get caught.
pub trait TestController {
    /// Request payload crossing the channel.
    type Request: Serialize + DeserializeOwned;
    /// Response payload crossing the channel.
    type Response: Serialize + DeserializeOwned;

    /// Handle one request, producing a response.
    fn handle(&mut self, request: Self::Request) -> Self::Response;
}

/// Deterministic controller fake: replies from a FIFO of canned responses
/// (defaulting to [`ControllerResponse::Ok`]) and records every request.
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    responses: VecDeque<ControllerResponse>,
    requests: Vec<ControllerRequest>,
}

impl ScriptedController {
    /// Create a controller with no canned responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response for a future request.
    pub fn push_response(&mut self, response: ControllerResponse) {
        self.responses.push_back(response);
    }

    /// Every request handled so far, in order.
    #[must_use]
    pub fn requests(&self) -> &[ControllerRequest] {
        &self.requests
    }
}

impl TestController for ScriptedController {
    type Request = ControllerRequest;
    type Response = ControllerResponse;

    fn handle(&mut self, request: ControllerRequest) -> ControllerResponse {
        self.requests.push(request);
        self.responses.pop_front().unwrap_or(ControllerResponse::Ok)
    }
}

/// Request/response channel with one outstanding call at a time.
pub struct TestMessageChannel<C: TestController> {
    controller: C,
    pending: Option<C::Request>,
    sent_count: usize,
}

impl<C: TestController + std::fmt::Debug> std::fmt::Debug for TestMessageChannel<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestMessageChannel")
            .field("controller", &self.controller)
            .field("pending", &self.pending.is_some())
            .field("sent_count", &self.sent_count)
            .finish()
    }
}

fn clone_via_wire<T: Serialize + DeserializeOwned>(value: &T) -> FingirResult<T> {
    let bytes = bincode::serialize(value).map_err(|e| FingirError::NotCloneable {
        message: e.to_string(),
    })?;
    bincode::deserialize(&bytes).map_err(|e| FingirError::NotCloneable {
        message: e.to_string(),
    })
}

impl<C: TestController> TestMessageChannel<C> {
    /// Create a channel backed by the given controller.
    #[must_use]
    pub fn new(controller: C) -> Self {
        Self {
            controller,
            pending: None,
            sent_count: 0,
        }
    }

    /// The controller side, for assertions after the fact.
    #[must_use]
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Mutable controller access, e.g. to queue canned responses mid-test.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Whether a posted request has not yet been dispatched.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total requests dispatched.
    #[must_use]
    pub const fn sent_count(&self) -> usize {
        self.sent_count
    }

    /// Post a request without dispatching it yet.
    ///
    /// Fails with `InvalidState` if a call is already outstanding — the
    /// protocol allows one in flight per call site. A payload that cannot
    /// survive the wire round-trip fails with `NotCloneable` and leaves
    /// nothing outstanding.
    pub fn post(&mut self, request: C::Request) -> FingirResult<()> {
        if self.pending.is_some() {
            return Err(FingirError::InvalidState {
                message: "a controller call is already outstanding on this channel".to_string(),
            });
        }
        self.pending = Some(clone_via_wire(&request)?);
        Ok(())
    }

    /// Dispatch the posted request and return the controller's response.
    pub fn dispatch(&mut self) -> FingirResult<C::Response> {
        let request = self.pending.take().ok_or_else(|| FingirError::InvalidState {
            message: "no controller call is outstanding".to_string(),
        })?;
        debug!(call = self.sent_count + 1, "dispatching controller request");
        let response = self.controller.handle(request);
        self.sent_count += 1;
        clone_via_wire(&response)
    }

    /// Post and dispatch in one step — the common synchronous shape.
    pub fn send_test_message(&mut self, request: C::Request) -> FingirResult<C::Response> {
        self.post(request)?;
        self.dispatch()
    }
}
