//! Effect descriptions returned by reducers.
//!
//! Effects are NOT executed immediately. They are values describing what
//! should happen, returned from reducers and executed by the Store runtime.
//! Keeping them as data keeps reducers pure and testable: a test can assert
//! on the returned effects without running any I/O.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Identifier for a cancellable unit of work.
///
/// Stable keys let a reducer cancel work it started earlier without holding
/// a handle to it: wrap the effect in [`Effect::Cancellable`] under an id,
/// and emit [`Effect::Cancel`] with the same id later (for example when the
/// user navigates away mid-request).
///
/// Ids are compared by their string key, so two `EffectId`s built from the
/// same literal refer to the same work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(&'static str);

impl EffectId {
    /// Create an effect id from a static key.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    /// The underlying key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Effect type - describes a side effect to be executed
///
/// # Type Parameters
///
/// - `Action`: The action type that effects can produce (feedback loop)
pub enum Effect<Action> {
    /// No-op effect
    None,

    /// Run effects in parallel
    Parallel(Vec<Effect<Action>>),

    /// Run effects sequentially
    Sequential(Vec<Effect<Action>>),

    /// Delayed action (for timeouts)
    Delay {
        /// How long to wait
        duration: Duration,
        /// Action to dispatch after delay
        action: Box<Action>,
    },

    /// Arbitrary async computation
    ///
    /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
    Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

    /// An effect that can be aborted later via [`Effect::Cancel`]
    ///
    /// The runtime registers the spawned work under `id`; a subsequent
    /// `Cancel` with the same id aborts it. Aborted work produces no
    /// feedback action.
    Cancellable {
        /// Key under which the work is registered
        id: EffectId,
        /// The effect to run
        effect: Box<Effect<Action>>,
    },

    /// Abort all in-flight work registered under the given id
    Cancel(EffectId),
}

// Manual Debug implementation since Future doesn't implement Debug
impl<Action> std::fmt::Debug for Effect<Action>
where
    Action: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "Effect::None"),
            Effect::Parallel(effects) => f.debug_tuple("Effect::Parallel").field(effects).finish(),
            Effect::Sequential(effects) => {
                f.debug_tuple("Effect::Sequential").field(effects).finish()
            },
            Effect::Delay { duration, action } => f
                .debug_struct("Effect::Delay")
                .field("duration", duration)
                .field("action", action)
                .finish(),
            Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            Effect::Cancellable { id, effect } => f
                .debug_struct("Effect::Cancellable")
                .field("id", id)
                .field("effect", effect)
                .finish(),
            Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
        }
    }
}

impl<Action> Effect<Action> {
    /// Combine effects to run in parallel
    #[must_use]
    pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Parallel(effects)
    }

    /// Chain effects to run sequentially
    #[must_use]
    pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Sequential(effects)
    }

    /// Wrap an async computation so it can be aborted under `id`
    pub fn cancellable<F>(id: EffectId, future: F) -> Effect<Action>
    where
        F: Future<Output = Option<Action>> + Send + 'static,
    {
        Effect::Cancellable {
            id,
            effect: Box::new(Effect::Future(Box::pin(future))),
        }
    }

    /// Abort all in-flight work registered under `id`
    #[must_use]
    pub const fn cancel(id: EffectId) -> Effect<Action> {
        Effect::Cancel(id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)] // Test code can panic

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Done,
    }

    #[test]
    fn effect_id_equality_is_by_key() {
        const LOAD: EffectId = EffectId::new("test.load");
        assert_eq!(LOAD, EffectId::new("test.load"));
        assert_ne!(LOAD, EffectId::new("test.submit"));
        assert_eq!(LOAD.key(), "test.load");
    }

    #[test]
    fn debug_formats_without_evaluating_futures() {
        let effect: Effect<TestAction> =
            Effect::cancellable(EffectId::new("test.load"), async { Some(TestAction::Done) });
        let rendered = format!("{effect:?}");
        assert!(rendered.contains("Effect::Cancellable"));
        assert!(rendered.contains("test.load"));
        assert!(rendered.contains("Effect::Future(<future>)"));
    }

    #[test]
    fn merge_and_chain_preserve_order() {
        let merged: Effect<TestAction> = Effect::merge(vec![Effect::None, Effect::None]);
        assert!(matches!(merged, Effect::Parallel(ref v) if v.len() == 2));

        let chained: Effect<TestAction> = Effect::chain(vec![Effect::None]);
        assert!(matches!(chained, Effect::Sequential(ref v) if v.len() == 1));
    }

    #[tokio::test]
    async fn cancellable_wraps_a_runnable_future() {
        let effect: Effect<TestAction> =
            Effect::cancellable(EffectId::new("test.load"), async { Some(TestAction::Done) });
        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, EffectId::new("test.load"));
                match *effect {
                    Effect::Future(fut) => assert_eq!(fut.await, Some(TestAction::Done)),
                    other => panic!("expected future inside cancellable, got {other:?}"),
                }
            },
            other => panic!("expected cancellable, got {other:?}"),
        }
    }
}
