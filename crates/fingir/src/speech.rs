//! Fake speech synthesis engine.
//!
//! Stands in for a hardware-backed speech API: a voice list, synchronous
//! utterance lifecycle callbacks, and scripted one-shot faults from a
//! [`FaultQueue`]. There is no real audio playback — an unarmed `speak`
//! completes synchronously with start and end events, so tests get the full
//! lifecycle in a single turn.

use crate::fault::{FaultQueue, Scripted};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Operation name the synthesizer consults the fault queue with.
pub const SPEAK_OPERATION: &str = "speak";

// =============================================================================
// VOICES
// =============================================================================

/// A synthesized voice, uniquely identified by name within one voice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    /// Voice name (unique key)
    pub name: String,
    /// Language tag, e.g. "en-US"
    pub lang: String,
    /// Whether this is the default voice for its language
    pub is_default: bool,
    /// Whether the voice is locally installed (vs network-backed)
    pub is_local: bool,
}

impl VoiceDescriptor {
    /// Create a non-default, local voice.
    #[must_use]
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            is_default: false,
            is_local: true,
        }
    }

    /// Mark as the default voice.
    #[must_use]
    pub const fn default_voice(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Mark as network-backed.
    #[must_use]
    pub const fn remote(mut self) -> Self {
        self.is_local = false;
        self
    }
}

/// Normalize a language tag for grouping: lowercase, primary subtag only.
fn normalize_lang(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or(tag)
        .to_ascii_lowercase()
}

// =============================================================================
// LANGUAGE PACK INSTALL STATUS
// =============================================================================

/// Server-side install state of a language pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerStatus {
    /// Pack not installed
    NotInstalled,
    /// Download/install in progress
    Installing,
    /// Pack installed on the device
    Installed,
    /// Install failed
    Failed,
}

/// Client-side availability derived from [`ServerStatus`] plus the voice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    /// Pack not installed
    NotInstalled,
    /// Install in progress
    Installing,
    /// Installed and a matching voice exists
    Available,
    /// Installed or failed, but no matching voice can be used
    Unavailable,
}

/// Install status pair for one language key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallStatus {
    /// What the server reports
    pub server: ServerStatus,
    /// What the client observes
    pub client: ClientStatus,
}

// =============================================================================
// SPEECH EVENTS
// =============================================================================

/// Lifecycle event delivered to the start/end hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Playback of the utterance began
    Start {
        /// Utterance text
        text: String,
    },
    /// Playback of the utterance completed
    End {
        /// Utterance text
        text: String,
        /// Character index reached (always the full length here)
        char_index: usize,
    },
}

/// An utterance handed to [`FakeSpeechSynthesis::speak`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Text to speak
    pub text: String,
    /// Requested language tag
    pub lang: String,
}

impl Utterance {
    /// Create an utterance.
    #[must_use]
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
        }
    }
}

// =============================================================================
// FAKE SYNTHESIZER
// =============================================================================

type EventHook = Option<Box<dyn FnMut(SpeechEvent)>>;
type ErrorHook = Option<Box<dyn FnMut(String)>>;

/// Deterministic substitute for a speech synthesis engine.
pub struct FakeSpeechSynthesis {
    voices: Vec<VoiceDescriptor>,
    faults: FaultQueue,
    install_status: HashMap<String, InstallStatus>,
    client_overrides: HashMap<String, ClientStatus>,
    on_start: EventHook,
    on_end: EventHook,
    on_error: ErrorHook,
    speak_count: usize,
    last_spoken: Option<Utterance>,
}

impl std::fmt::Debug for FakeSpeechSynthesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeSpeechSynthesis")
            .field("voices", &self.voices.len())
            .field("armed", &self.faults.len())
            .field("speak_count", &self.speak_count)
            .finish()
    }
}

impl Default for FakeSpeechSynthesis {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSpeechSynthesis {
    /// Create a synthesizer with no voices and nothing armed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            faults: FaultQueue::new(),
            install_status: HashMap::new(),
            client_overrides: HashMap::new(),
            on_start: None,
            on_end: None,
            on_error: None,
            speak_count: 0,
            last_spoken: None,
        }
    }

    // -------------------------------------------------------------------------
    // Voice list
    // -------------------------------------------------------------------------

    /// Add a voice, replacing any existing voice of the same name.
    pub fn add_voice(&mut self, voice: VoiceDescriptor) {
        if let Some(existing) = self.voices.iter_mut().find(|v| v.name == voice.name) {
            *existing = voice;
        } else {
            self.voices.push(voice);
        }
        self.recompute_client_statuses();
    }

    /// All voices, in insertion order.
    #[must_use]
    pub fn voices(&self) -> &[VoiceDescriptor] {
        &self.voices
    }

    /// Voices matching `lang` by exact or normalized tag.
    #[must_use]
    pub fn voices_for_language(&self, lang: &str) -> Vec<&VoiceDescriptor> {
        let wanted = normalize_lang(lang);
        self.voices
            .iter()
            .filter(|v| v.lang.eq_ignore_ascii_case(lang) || normalize_lang(&v.lang) == wanted)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Install status
    // -------------------------------------------------------------------------

    /// Record the server-reported status for a language key. The client
    /// status is derived, never stored independently.
    pub fn set_server_status(&mut self, lang: impl Into<String>, status: ServerStatus) {
        let _ = self.install_status.insert(
            lang.into(),
            InstallStatus {
                server: status,
                client: ClientStatus::NotInstalled,
            },
        );
        self.recompute_client_statuses();
    }

    /// Force a client status for a language key, bypassing derivation.
    /// Test-only escape hatch for exercising disagreement paths.
    pub fn override_client_status_for_testing(
        &mut self,
        lang: impl Into<String>,
        status: ClientStatus,
    ) {
        let _ = self.client_overrides.insert(lang.into(), status);
        self.recompute_client_statuses();
    }

    /// Install status for a language key; absent keys read as not installed.
    #[must_use]
    pub fn install_status(&self, lang: &str) -> InstallStatus {
        self.install_status
            .get(lang)
            .copied()
            .unwrap_or(InstallStatus {
                server: ServerStatus::NotInstalled,
                client: ClientStatus::NotInstalled,
            })
    }

    fn recompute_client_statuses(&mut self) {
        let langs: Vec<String> = self.install_status.keys().cloned().collect();
        for lang in langs {
            let client = if let Some(forced) = self.client_overrides.get(&lang) {
                *forced
            } else {
                let has_voice = !self.voices_for_language(&lang).is_empty();
                match self.install_status[&lang].server {
                    ServerStatus::NotInstalled => ClientStatus::NotInstalled,
                    ServerStatus::Installing => ClientStatus::Installing,
                    ServerStatus::Installed if has_voice => ClientStatus::Available,
                    ServerStatus::Installed | ServerStatus::Failed => ClientStatus::Unavailable,
                }
            };
            if let Some(entry) = self.install_status.get_mut(&lang) {
                entry.client = client;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Scripting
    // -------------------------------------------------------------------------

    /// Arm a fault for the next `speak` call.
    pub fn arm_fault(&mut self, code: impl Into<String>) {
        self.faults.arm(SPEAK_OPERATION, Scripted::fault(code));
    }

    /// Arm a start event (without completion) for the next `speak` call.
    pub fn arm_start_event(&mut self) {
        self.faults.arm(SPEAK_OPERATION, Scripted::event("start"));
    }

    /// Access the underlying fault queue for less common scripting.
    pub fn faults_mut(&mut self) -> &mut FaultQueue {
        &mut self.faults
    }

    // -------------------------------------------------------------------------
    // Hooks
    // -------------------------------------------------------------------------

    /// Override the start hook.
    pub fn on_start<F: FnMut(SpeechEvent) + 'static>(&mut self, f: F) {
        self.on_start = Some(Box::new(f));
    }

    /// Override the end hook.
    pub fn on_end<F: FnMut(SpeechEvent) + 'static>(&mut self, f: F) {
        self.on_end = Some(Box::new(f));
    }

    /// Override the error hook. Receives the armed fault code.
    pub fn on_error<F: FnMut(String) + 'static>(&mut self, f: F) {
        self.on_error = Some(Box::new(f));
    }

    // -------------------------------------------------------------------------
    // Speaking
    // -------------------------------------------------------------------------

    /// Speak an utterance.
    ///
    /// Consults the fault queue first; an armed fault goes to the error
    /// hook, an armed start event goes to the start hook without
    /// completion. Unarmed calls complete synchronously: start, then end
    /// with a generated result. The armed entry is consumed before any
    /// hook runs, so a hook that calls `speak` again takes the normal path.
    pub fn speak(&mut self, utterance: Utterance) {
        self.speak_count += 1;
        self.last_spoken = Some(utterance.clone());

        match self.faults.take(SPEAK_OPERATION) {
            Some(Scripted::Fault(code)) => {
                debug!(%code, "delivering scripted speech fault");
                if let Some(hook) = self.on_error.as_mut() {
                    hook(code);
                }
            }
            Some(Scripted::Event(_)) => {
                if let Some(hook) = self.on_start.as_mut() {
                    hook(SpeechEvent::Start {
                        text: utterance.text,
                    });
                }
            }
            None => {
                if let Some(hook) = self.on_start.as_mut() {
                    hook(SpeechEvent::Start {
                        text: utterance.text.clone(),
                    });
                }
                let char_index = utterance.text.chars().count();
                if let Some(hook) = self.on_end.as_mut() {
                    hook(SpeechEvent::End {
                        text: utterance.text,
                        char_index,
                    });
                }
            }
        }
    }

    /// Total `speak` calls, scripted or not.
    #[must_use]
    pub const fn speak_count(&self) -> usize {
        self.speak_count
    }

    /// The most recently spoken utterance.
    #[must_use]
    pub fn last_spoken(&self) -> Option<&Utterance> {
        self.last_spoken.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn synthesis_with_recorded_errors() -> (FakeSpeechSynthesis, Rc<RefCell<Vec<String>>>) {
        let mut synthesis = FakeSpeechSynthesis::new();
        let errors = Rc::new(RefCell::new(Vec::new()));
        let errors_clone = Rc::clone(&errors);
        synthesis.on_error(move |code| errors_clone.borrow_mut().push(code));
        (synthesis, errors)
    }

    mod voices {
        use super::*;

        #[test]
        fn test_add_voice_unique_by_name() {
            let mut synthesis = FakeSpeechSynthesis::new();
            synthesis.add_voice(VoiceDescriptor::new("Lyra", "en-US"));
            synthesis.add_voice(VoiceDescriptor::new("Lyra", "en-GB").default_voice());

            assert_eq!(synthesis.voices().len(), 1);
            assert_eq!(synthesis.voices()[0].lang, "en-GB");
            assert!(synthesis.voices()[0].is_default);
        }

        #[test]
        fn test_voices_for_language_normalized() {
            let mut synthesis = FakeSpeechSynthesis::new();
            synthesis.add_voice(VoiceDescriptor::new("Lyra", "en-US"));
            synthesis.add_voice(VoiceDescriptor::new("Koa", "en-GB"));
            synthesis.add_voice(VoiceDescriptor::new("Mika", "fr-FR"));

            let en = synthesis.voices_for_language("en");
            assert_eq!(en.len(), 2);

            let exact = synthesis.voices_for_language("fr-FR");
            assert_eq!(exact.len(), 1);
            assert_eq!(exact[0].name, "Mika");
        }
    }

    mod install_status {
        use super::*;

        #[test]
        fn test_absent_key_reads_not_installed() {
            let synthesis = FakeSpeechSynthesis::new();
            let status = synthesis.install_status("de");
            assert_eq!(status.server, ServerStatus::NotInstalled);
            assert_eq!(status.client, ClientStatus::NotInstalled);
        }

        #[test]
        fn test_client_derived_from_server_and_voices() {
            let mut synthesis = FakeSpeechSynthesis::new();
            synthesis.set_server_status("en", ServerStatus::Installed);
            // Installed but no voice yet.
            assert_eq!(synthesis.install_status("en").client, ClientStatus::Unavailable);

            synthesis.add_voice(VoiceDescriptor::new("Lyra", "en-US"));
            assert_eq!(synthesis.install_status("en").client, ClientStatus::Available);
        }

        #[test]
        fn test_installing_and_failed_derivations() {
            let mut synthesis = FakeSpeechSynthesis::new();
            synthesis.set_server_status("fr", ServerStatus::Installing);
            assert_eq!(synthesis.install_status("fr").client, ClientStatus::Installing);

            synthesis.set_server_status("fr", ServerStatus::Failed);
            assert_eq!(synthesis.install_status("fr").client, ClientStatus::Unavailable);
        }

        #[test]
        fn test_explicit_override_beats_derivation() {
            let mut synthesis = FakeSpeechSynthesis::new();
            synthesis.set_server_status("en", ServerStatus::Installed);
            synthesis.override_client_status_for_testing("en", ClientStatus::Installing);
            assert_eq!(synthesis.install_status("en").client, ClientStatus::Installing);
        }
    }

    mod speaking {
        use super::*;

        #[test]
        fn test_unarmed_speak_completes_synchronously() {
            let mut synthesis = FakeSpeechSynthesis::new();
            let events = Rc::new(RefCell::new(Vec::new()));
            let events_clone = Rc::clone(&events);
            synthesis.on_start(move |e| events_clone.borrow_mut().push(e));
            let events_clone = Rc::clone(&events);
            synthesis.on_end(move |e| events_clone.borrow_mut().push(e));

            synthesis.speak(Utterance::new("hello", "en"));

            assert_eq!(
                events.borrow().as_slice(),
                &[
                    SpeechEvent::Start {
                        text: "hello".into()
                    },
                    SpeechEvent::End {
                        text: "hello".into(),
                        char_index: 5
                    },
                ]
            );
        }

        #[test]
        fn test_armed_fault_delivered_exactly_once() {
            let (mut synthesis, errors) = synthesis_with_recorded_errors();
            synthesis.arm_fault("network-error");

            synthesis.speak(Utterance::new("a", "en"));
            assert_eq!(errors.borrow().as_slice(), &["network-error".to_string()]);

            // Second call takes the default success path.
            synthesis.speak(Utterance::new("b", "en"));
            assert_eq!(errors.borrow().len(), 1);
            assert_eq!(synthesis.speak_count(), 2);
        }

        #[test]
        fn test_armed_start_event_suppresses_completion() {
            let mut synthesis = FakeSpeechSynthesis::new();
            let starts = Rc::new(RefCell::new(0));
            let ends = Rc::new(RefCell::new(0));
            let s = Rc::clone(&starts);
            synthesis.on_start(move |_| *s.borrow_mut() += 1);
            let e = Rc::clone(&ends);
            synthesis.on_end(move |_| *e.borrow_mut() += 1);

            synthesis.arm_start_event();
            synthesis.speak(Utterance::new("x", "en"));

            assert_eq!(*starts.borrow(), 1);
            assert_eq!(*ends.borrow(), 0);
        }

        #[test]
        fn test_fault_wins_when_both_armed() {
            let (mut synthesis, errors) = synthesis_with_recorded_errors();
            synthesis.arm_start_event();
            synthesis.arm_fault("interrupted");

            synthesis.speak(Utterance::new("x", "en"));
            assert_eq!(errors.borrow().as_slice(), &["interrupted".to_string()]);
        }

        #[test]
        fn test_last_spoken_tracked() {
            let mut synthesis = FakeSpeechSynthesis::new();
            synthesis.speak(Utterance::new("first", "en"));
            synthesis.speak(Utterance::new("second", "en"));
            assert_eq!(synthesis.last_spoken().unwrap().text, "second");
        }
    }
}
