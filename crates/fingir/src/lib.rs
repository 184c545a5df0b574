//! Fingir: deterministic fake-host test doubles for UI-facing code.
//!
//! Fingir (Spanish: "to fake/pretend") provides the substitute objects a
//! test suite injects in place of privileged host APIs — a settings state
//! container, a synthetic virtual-node tree, lifecycle callback sinks,
//! scripted one-shot fault injection, a page-object facade with bounded
//! polling, and a request/response channel to a scripted test controller.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     FINGIR Architecture                        │
//! ├───────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌──────────────────┐    ┌─────────────┐   │
//! │   │ Test Case  │    │ FakeReadingHost  │    │ Production  │   │
//! │   │ (Rust)     │───►│ state/tree/sink/ │◄───│ UI code     │   │
//! │   │            │    │ faults           │    │ under test  │   │
//! │   └────────────┘    └──────────────────┘    └─────────────┘   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is in-process, single-threaded cooperative, and test-lifetime
//! only: no network, no persistence, no real concurrency. Determinism comes
//! from construction (fixed synthetic data), not from retries — the one
//! retried thing is UI-settle polling, because rendering can lag a few
//! event-loop turns.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Message channel to a privileged test controller.
pub mod channel;

/// Scripted one-shot fault injection.
pub mod fault;

/// Per-test fixture lifecycle.
pub mod fixture;

/// Drop-in fake host binding composing state, tree, sink, and faults.
pub mod host;

/// Page object facade over a tree-structured UI surface.
pub mod page_object;

mod result;

/// Event/callback sink for host lifecycle notifications.
pub mod sink;

/// Fake speech synthesis engine.
pub mod speech;

/// Host setting state container.
pub mod state;

/// Deterministic virtual node trees.
pub mod tree;

/// Poll-until-predicate synchronization.
pub mod wait;

pub use channel::{
    ControllerRequest, ControllerResponse, ScriptedController, TestController, TestMessageChannel,
};
pub use fault::{FaultQueue, Scripted};
pub use fixture::{Fixture, FixtureManager, FixtureState, HostFixture, SimpleFixture};
pub use host::{FakeReadingHost, DEFAULT_MAX_NODE_ID};
pub use page_object::{DirectoryTreePage, FakeTreeSurface, PageObject, TreeSurface};
pub use result::{FingirError, FingirResult};
pub use sink::{EventSink, Selection, SinkEvent, SinkRecorder};
pub use speech::{
    ClientStatus, FakeSpeechSynthesis, InstallStatus, ServerStatus, SpeechEvent, Utterance,
    VoiceDescriptor, SPEAK_OPERATION,
};
pub use state::{HostState, SettingValue};
pub use tree::{ContentTree, NodeId, SyntheticTree, VirtualNode, SYNTHETIC_TEXT_PREFIX};
pub use wait::{
    wait_for_value, wait_until, WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
