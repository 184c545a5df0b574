//! Per-test fixture lifecycle.
//!
//! Fakes are created fresh in `setup` and discarded in `teardown`; nothing
//! persists across tests. The manager sets fixtures up in priority order
//! (highest first) and tears them down in reverse, so dependent fixtures
//! come up after and go down before what they depend on.

use crate::host::FakeReadingHost;
use crate::result::{FingirError, FingirResult};
use std::any::TypeId;
use std::collections::HashMap;

/// Trait for test fixtures that can be set up and torn down.
///
/// Fixtures live on the test's own thread; the harness model is
/// single-threaded cooperative, so no `Send`/`Sync` bound is imposed and
/// fixtures may hold non-thread-safe fakes like hook closures.
pub trait Fixture {
    /// Set up the fixture before test execution.
    fn setup(&mut self) -> FingirResult<()>;

    /// Tear down the fixture after test execution.
    fn teardown(&mut self) -> FingirResult<()>;

    /// Get the fixture name for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Get fixture priority (higher = set up first, tear down last).
    fn priority(&self) -> i32 {
        0
    }
}

/// State of a fixture in the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    /// Registered but not set up.
    Registered,
    /// Set up successfully.
    SetUp,
    /// Torn down.
    TornDown,
    /// Setup or teardown failed.
    Failed,
}

struct FixtureEntry {
    fixture: Box<dyn Fixture>,
    state: FixtureState,
    priority: i32,
}

/// Manager for test fixtures with priority-ordered setup/teardown.
#[derive(Default)]
pub struct FixtureManager {
    fixtures: HashMap<TypeId, FixtureEntry>,
    setup_order: Vec<TypeId>,
}

impl std::fmt::Debug for FixtureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureManager")
            .field("fixture_count", &self.fixtures.len())
            .field("setup_order", &self.setup_order.len())
            .finish()
    }
}

impl FixtureManager {
    /// Create a new fixture manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixture, replacing any previous fixture of the same type.
    pub fn register<F: Fixture + 'static>(&mut self, fixture: F) {
        let type_id = TypeId::of::<F>();
        let priority = fixture.priority();
        let _ = self.fixtures.insert(
            type_id,
            FixtureEntry {
                fixture: Box::new(fixture),
                state: FixtureState::Registered,
                priority,
            },
        );
    }

    /// Whether a fixture of this type is registered.
    #[must_use]
    pub fn is_registered<F: Fixture + 'static>(&self) -> bool {
        self.fixtures.contains_key(&TypeId::of::<F>())
    }

    /// Number of registered fixtures.
    #[must_use]
    pub fn count(&self) -> usize {
        self.fixtures.len()
    }

    /// State of a fixture by type.
    #[must_use]
    pub fn state<F: Fixture + 'static>(&self) -> Option<FixtureState> {
        self.fixtures.get(&TypeId::of::<F>()).map(|e| e.state)
    }

    /// Names of all registered fixtures.
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.fixtures.values().map(|e| e.fixture.name()).collect()
    }

    /// Registered fixture ids, highest priority first.
    fn priority_ordered(&self) -> Vec<TypeId> {
        let mut ordered: Vec<(TypeId, i32)> = self
            .fixtures
            .iter()
            .map(|(id, e)| (*id, e.priority))
            .collect();
        ordered.sort_by_key(|(_, priority)| std::cmp::Reverse(*priority));
        ordered.into_iter().map(|(id, _)| id).collect()
    }

    /// Set up all registered fixtures in priority order (highest first).
    ///
    /// If any setup fails, fixtures that already came up are torn down
    /// before the error is returned.
    pub fn setup_all(&mut self) -> FingirResult<()> {
        self.setup_order.clear();

        for type_id in self.priority_ordered() {
            let Some(entry) = self.fixtures.get_mut(&type_id) else {
                continue;
            };
            match entry.state {
                FixtureState::Registered | FixtureState::TornDown => {}
                FixtureState::SetUp | FixtureState::Failed => continue,
            }

            match entry.fixture.setup() {
                Ok(()) => {
                    entry.state = FixtureState::SetUp;
                    self.setup_order.push(type_id);
                }
                Err(e) => {
                    entry.state = FixtureState::Failed;
                    let message =
                        format!("Fixture '{}' setup failed: {e}", entry.fixture.name());
                    // Roll back whatever came up before reporting.
                    self.teardown_setup_order()?;
                    return Err(FingirError::FixtureError { message });
                }
            }
        }
        Ok(())
    }

    /// Tear down all fixtures in reverse setup order.
    ///
    /// Every fixture gets torn down even if an earlier teardown fails;
    /// the first error is returned.
    pub fn teardown_all(&mut self) -> FingirResult<()> {
        self.teardown_setup_order()
    }

    fn teardown_setup_order(&mut self) -> FingirResult<()> {
        let order: Vec<TypeId> = self.setup_order.drain(..).rev().collect();
        let mut first_error: Option<FingirError> = None;

        for type_id in order {
            let Some(entry) = self.fixtures.get_mut(&type_id) else {
                continue;
            };
            if entry.state != FixtureState::SetUp {
                continue;
            }

            match entry.fixture.teardown() {
                Ok(()) => entry.state = FixtureState::TornDown,
                Err(e) => {
                    entry.state = FixtureState::Failed;
                    if first_error.is_none() {
                        first_error = Some(FingirError::FixtureError {
                            message: format!(
                                "Fixture '{}' teardown failed: {e}",
                                entry.fixture.name()
                            ),
                        });
                    }
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

/// A fixture that executes closures for setup and teardown.
pub struct SimpleFixture {
    name: String,
    priority: i32,
    setup_fn: Option<Box<dyn FnMut() -> FingirResult<()>>>,
    teardown_fn: Option<Box<dyn FnMut() -> FingirResult<()>>>,
}

impl std::fmt::Debug for SimpleFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleFixture")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish()
    }
}

impl SimpleFixture {
    /// Create a named fixture with no-op setup and teardown.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            setup_fn: None,
            teardown_fn: None,
        }
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the setup closure.
    #[must_use]
    pub fn on_setup<F: FnMut() -> FingirResult<()> + 'static>(mut self, f: F) -> Self {
        self.setup_fn = Some(Box::new(f));
        self
    }

    /// Set the teardown closure.
    #[must_use]
    pub fn on_teardown<F: FnMut() -> FingirResult<()> + 'static>(mut self, f: F) -> Self {
        self.teardown_fn = Some(Box::new(f));
        self
    }
}

impl Fixture for SimpleFixture {
    fn setup(&mut self) -> FingirResult<()> {
        self.setup_fn.as_mut().map_or(Ok(()), |f| f())
    }

    fn teardown(&mut self) -> FingirResult<()> {
        self.teardown_fn.as_mut().map_or(Ok(()), |f| f())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Fixture that provides a fresh [`FakeReadingHost`] per test.
#[derive(Debug, Default)]
pub struct HostFixture {
    host: Option<FakeReadingHost>,
    synthetic_max_id: Option<u32>,
}

impl HostFixture {
    /// Create a fixture using the host's default synthetic tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fixture whose host gets a synthetic tree of this length.
    #[must_use]
    pub fn with_synthetic_tree(max_id: u32) -> Self {
        Self {
            host: None,
            synthetic_max_id: Some(max_id),
        }
    }

    /// The live host. Only available between setup and teardown.
    pub fn host_mut(&mut self) -> FingirResult<&mut FakeReadingHost> {
        self.host.as_mut().ok_or_else(|| FingirError::InvalidState {
            message: "HostFixture accessed outside setup/teardown window".to_string(),
        })
    }
}

impl Fixture for HostFixture {
    fn setup(&mut self) -> FingirResult<()> {
        self.host = Some(match self.synthetic_max_id {
            Some(max_id) => FakeReadingHost::with_synthetic_tree(max_id),
            None => FakeReadingHost::new(),
        });
        Ok(())
    }

    fn teardown(&mut self) -> FingirResult<()> {
        self.host = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "HostFixture"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    mod manager_tests {
        use super::*;

        #[test]
        fn test_register_and_count() {
            let mut manager = FixtureManager::new();
            manager.register(HostFixture::new());
            assert_eq!(manager.count(), 1);
            assert!(manager.is_registered::<HostFixture>());
            assert_eq!(manager.state::<HostFixture>(), Some(FixtureState::Registered));
        }

        #[test]
        fn test_setup_then_teardown_states() {
            let mut manager = FixtureManager::new();
            manager.register(HostFixture::new());

            manager.setup_all().unwrap();
            assert_eq!(manager.state::<HostFixture>(), Some(FixtureState::SetUp));

            manager.teardown_all().unwrap();
            assert_eq!(manager.state::<HostFixture>(), Some(FixtureState::TornDown));
        }

        #[test]
        fn test_priority_order_and_reverse_teardown() {
            let order = Arc::new(std::sync::Mutex::new(Vec::new()));

            struct Tracking {
                tag: &'static str,
                priority: i32,
                order: Arc<std::sync::Mutex<Vec<String>>>,
            }
            impl Fixture for Tracking {
                fn setup(&mut self) -> FingirResult<()> {
                    self.order.lock().unwrap().push(format!("up:{}", self.tag));
                    Ok(())
                }
                fn teardown(&mut self) -> FingirResult<()> {
                    self.order.lock().unwrap().push(format!("down:{}", self.tag));
                    Ok(())
                }
                fn priority(&self) -> i32 {
                    self.priority
                }
            }
            // Distinct types so both can register.
            struct High(Tracking);
            struct Low(Tracking);
            impl Fixture for High {
                fn setup(&mut self) -> FingirResult<()> {
                    self.0.setup()
                }
                fn teardown(&mut self) -> FingirResult<()> {
                    self.0.teardown()
                }
                fn priority(&self) -> i32 {
                    self.0.priority()
                }
            }
            impl Fixture for Low {
                fn setup(&mut self) -> FingirResult<()> {
                    self.0.setup()
                }
                fn teardown(&mut self) -> FingirResult<()> {
                    self.0.teardown()
                }
                fn priority(&self) -> i32 {
                    self.0.priority()
                }
            }

            let mut manager = FixtureManager::new();
            manager.register(Low(Tracking {
                tag: "low",
                priority: 0,
                order: Arc::clone(&order),
            }));
            manager.register(High(Tracking {
                tag: "high",
                priority: 10,
                order: Arc::clone(&order),
            }));

            manager.setup_all().unwrap();
            manager.teardown_all().unwrap();

            assert_eq!(
                order.lock().unwrap().as_slice(),
                &["up:high", "up:low", "down:low", "down:high"]
            );
        }

        #[test]
        fn test_repeated_cycles_reset_torn_down_fixtures() {
            let mut manager = FixtureManager::new();
            manager.register(HostFixture::new());

            for _ in 0..3 {
                manager.setup_all().unwrap();
                assert_eq!(manager.state::<HostFixture>(), Some(FixtureState::SetUp));
                manager.teardown_all().unwrap();
                assert_eq!(manager.state::<HostFixture>(), Some(FixtureState::TornDown));
            }
        }

        #[test]
        fn test_failed_setup_rolls_back() {
            static TEARDOWNS: AtomicUsize = AtomicUsize::new(0);

            struct Good;
            impl Fixture for Good {
                fn setup(&mut self) -> FingirResult<()> {
                    Ok(())
                }
                fn teardown(&mut self) -> FingirResult<()> {
                    let _ = TEARDOWNS.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                fn priority(&self) -> i32 {
                    10
                }
            }
            struct Bad;
            impl Fixture for Bad {
                fn setup(&mut self) -> FingirResult<()> {
                    Err(FingirError::assertion("cannot come up"))
                }
                fn teardown(&mut self) -> FingirResult<()> {
                    Ok(())
                }
            }

            let mut manager = FixtureManager::new();
            manager.register(Good);
            manager.register(Bad);

            let err = manager.setup_all().unwrap_err();
            assert!(matches!(err, FingirError::FixtureError { .. }));
            // The fixture that came up was torn down again.
            assert_eq!(TEARDOWNS.load(Ordering::SeqCst), 1);
        }
    }

    mod simple_fixture_tests {
        use super::*;

        #[test]
        fn test_closure_fixture() {
            let count = Arc::new(AtomicUsize::new(0));
            let up = Arc::clone(&count);
            let down = Arc::clone(&count);

            let mut fixture = SimpleFixture::new("counter")
                .with_priority(3)
                .on_setup(move || {
                    let _ = up.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .on_teardown(move || {
                    let _ = down.fetch_add(10, Ordering::SeqCst);
                    Ok(())
                });

            assert_eq!(fixture.name(), "counter");
            assert_eq!(fixture.priority(), 3);
            fixture.setup().unwrap();
            fixture.teardown().unwrap();
            assert_eq!(count.load(Ordering::SeqCst), 11);
        }
    }

    mod host_fixture_tests {
        use super::*;

        #[test]
        fn test_host_fresh_per_setup() {
            let mut fixture = HostFixture::new();
            fixture.setup().unwrap();
            fixture.host_mut().unwrap().set_font_size(42.0);
            fixture.teardown().unwrap();

            // A second cycle starts from defaults: nothing persisted.
            fixture.setup().unwrap();
            assert_eq!(fixture.host_mut().unwrap().font_size(), 18.0);
        }

        #[test]
        fn test_host_unavailable_outside_window() {
            let mut fixture = HostFixture::new();
            assert!(matches!(
                fixture.host_mut(),
                Err(FingirError::InvalidState { .. })
            ));
        }

        #[test]
        fn test_synthetic_tree_parameter() {
            let mut fixture = HostFixture::with_synthetic_tree(3);
            fixture.setup().unwrap();
            let host = fixture.host_mut().unwrap();
            assert!(host.is_leaf_node(crate::tree::NodeId(3)));
        }
    }
}
