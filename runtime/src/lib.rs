//! # Purohit Runtime
//!
//! Runtime implementation for the Purohit booking architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation Registry**: Aborts in-flight work registered under an [`EffectId`]
//!
//! Network calls in this workspace are wrapped in `Effect::Cancellable`, so
//! a flow that is abandoned mid-request (the user navigates away) aborts the
//! request instead of delivering a result to observers that no longer exist.
//!
//! ## Example
//!
//! ```ignore
//! use purohit_runtime::Store;
//! use purohit_core::reducer::Reducer;
//!
//! let store = Store::new(
//!     initial_state,
//!     my_reducer,
//!     environment,
//! );
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use purohit_core::effect::{Effect, EffectId};
use purohit_core::reducer::Reducer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// The store is shutting down and not accepting new actions
        #[error("Store is shutting down, action rejected")]
        ShutdownInProgress,

        /// Shutdown timed out with effects still running
        #[error("Shutdown timeout: {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action
        #[error("Timeout waiting for matching action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Handle for waiting on effect completion
///
/// Returned by [`Store::send`]. The handle tracks the effects started by
/// that one dispatch; awaiting it does not wait for actions those effects
/// feed back into the store (each feedback dispatch gets its own handle).
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(BookingFlowAction::ConfirmPayment).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await.ok();
/// ```
pub struct EffectHandle {
    counter: Arc<AtomicUsize>,
    notifier: tokio::sync::watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a handle together with its tracking side.
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = tokio::sync::watch::channel(());

        let handle = Self {
            counter: Arc::clone(&counter),
            notifier: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };
        (handle, tracking)
    }

    /// A handle whose effects have already completed
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = tokio::sync::watch::channel(());
        drop(tx);
        Self {
            counter: Arc::new(AtomicUsize::new(0)),
            notifier: rx,
        }
    }

    /// Wait until all tracked effects have completed
    pub async fn wait(&mut self) {
        while self.counter.load(Ordering::SeqCst) > 0 {
            if self.notifier.changed().await.is_err() {
                // Tracking side dropped; nothing left to wait for
                break;
            }
        }
    }

    /// Wait for effect completion with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before the tracked effects
    /// complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

/// Internal: counting side of an [`EffectHandle`]
///
/// Incremented when an effect task starts, decremented when it finishes.
/// Reaching zero notifies waiters through the watch channel.
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: tokio::sync::watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect
/// panics or its task is aborted mid-await.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Registry of abortable work, keyed by [`EffectId`]
///
/// Finished handles are pruned on registration; aborting a finished task is
/// a no-op, so a stale handle is never a correctness problem.
#[derive(Clone, Default)]
struct CancellationRegistry {
    handles: Arc<Mutex<HashMap<EffectId, Vec<AbortHandle>>>>,
}

impl CancellationRegistry {
    fn register(&self, id: EffectId, handle: AbortHandle) {
        let mut map = self
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = map.entry(id).or_default();
        slot.retain(|h| !h.is_finished());
        slot.push(handle);
    }

    /// Abort everything registered under `id`; returns how many tasks were aborted.
    fn cancel(&self, id: EffectId) -> usize {
        let handles = {
            let mut map = self
                .handles
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            map.remove(&id).unwrap_or_default()
        };
        let live = handles.iter().filter(|h| !h.is_finished()).count();
        for handle in handles {
            handle.abort();
        }
        live
    }

    /// Abort everything registered under any id; returns how many tasks were aborted.
    fn cancel_all(&self) -> usize {
        let drained: Vec<AbortHandle> = {
            let mut map = self
                .handles
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            map.drain().flat_map(|(_, handles)| handles).collect()
        };
        let live = drained.iter().filter(|h| !h.is_finished()).count();
        for handle in drained {
            handle.abort();
        }
        live
    }
}

/// Store module - The runtime for reducers
///
/// Coordinates reducer execution, effect handling, and the action feedback
/// loop.
pub mod store {
    use super::{
        AbortHandle, Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, CancellationRegistry,
        DecrementGuard, Duration, Effect, EffectHandle, EffectId, EffectTracking, Ordering,
        Reducer, RwLock, StoreError,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(
    ///     BookingFlowState::default(),
    ///     BookingFlowReducer::new(),
    ///     production_environment(),
    /// );
    ///
    /// store.send(BookingFlowAction::Start { priest_id }).await?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        cancellations: CancellationRegistry,
        /// Action broadcast channel for observing actions produced by effects.
        ///
        /// All actions produced by effects (e.g., from `Effect::Future`) are
        /// broadcast to observers. This is how a UI layer watches for
        /// terminal results such as a confirmed booking.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses the default action broadcast capacity of 16; increase with
        /// [`Store::with_broadcast_capacity`] if observers frequently lag.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new Store with custom action broadcast capacity
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        /// - `capacity`: Action broadcast channel capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellations: CancellationRegistry::default(),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// This is the primary way to interact with the store:
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects asynchronously
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// # Concurrency and Effect Execution
        ///
        /// - The reducer executes synchronously while holding a write lock
        /// - Effects execute asynchronously in spawned tasks
        /// - `send()` returns after starting effect execution, not completion
        /// - Multiple concurrent `send()` calls serialize at the reducer level
        ///
        /// # Returns
        ///
        /// An [`EffectHandle`] that can be used to wait for effect completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            // Check if store is shutting down
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            // Create tracking for this action's effects
            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                let duration = start.elapsed();
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(duration.as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching result action
        ///
        /// This method is designed for request-response shaped flows: send
        /// the triggering action, then wait for the terminal action an
        /// effect eventually feeds back (e.g. send `ConfirmPayment`, wait
        /// for `BookingConfirmed` or `SubmissionFailed`).
        ///
        /// Subscribes to the action broadcast BEFORE sending to avoid a
        /// race with fast effects.
        ///
        /// # Arguments
        ///
        /// - `action`: The initial action to send
        /// - `predicate`: Function to test if an action is the terminal result
        /// - `timeout`: Maximum time to wait for a matching action
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before a matching action arrived
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        ///
        /// # Example
        ///
        /// ```ignore
        /// let result = store.send_and_wait_for(
        ///     BookingFlowAction::ConfirmPayment,
        ///     |a| matches!(a,
        ///         BookingFlowAction::BookingCreated { .. } |
        ///         BookingFlowAction::SubmissionFailed { .. }
        ///     ),
        ///     Duration::from_secs(20),
        /// ).await?;
        /// ```
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            // Send the initial action
            self.send(action).await?;

            // Wait for matching action with timeout
            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {} // Not the action we want, keep waiting
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Slow consumer, some actions were dropped.
                            // Keep waiting - the timeout catches a dropped terminal action.
                            tracing::warn!(
                                skipped,
                                "Action observer lagged, {} actions skipped",
                                skipped
                            );
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        }
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Returns a receiver that gets a clone of every action fed back by
        /// an effect (not the initial actions passed to `send`). This is
        /// the result channel a UI layer observes for navigation-worthy
        /// outcomes.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let phase = store.state(|s| s.phase_name()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Abort all in-flight work registered under `id`
        ///
        /// Equivalent to a reducer emitting [`Effect::Cancel`], exposed for
        /// imperative callers (e.g. a navigation layer tearing a screen down).
        pub fn cancel(&self, id: EffectId) {
            let aborted = self.cancellations.cancel(id);
            if aborted > 0 {
                tracing::debug!(id = %id, aborted, "Cancelled in-flight work");
                metrics::counter!("store.effects.cancelled").increment(aborted as u64);
            }
        }

        /// Abort all in-flight cancellable work
        pub fn cancel_all(&self) {
            let aborted = self.cancellations.cancel_all();
            if aborted > 0 {
                tracing::debug!(aborted, "Cancelled all in-flight work");
                metrics::counter!("store.effects.cancelled").increment(aborted as u64);
            }
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Aborts in-flight cancellable work (network requests)
        /// 3. Waits for remaining effects to complete (with timeout)
        ///
        /// # Arguments
        ///
        /// - `timeout`: Maximum time to wait for effects to complete
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires
        /// before all pending effects complete.
        ///
        /// # Example
        ///
        /// ```ignore
        /// store.shutdown(Duration::from_secs(5)).await?;
        /// ```
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            // Set shutdown flag to reject new actions
            self.shutdown.store(true, Ordering::Release);

            // Abort cancellable work so it does not hold up the drain
            self.cancel_all();

            // Wait for pending effects with timeout
            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running",
                        pending
                    );
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Execute an effect with tracking
        ///
        /// Internal method that executes effects with completion tracking.
        /// Uses [`DecrementGuard`] to ensure the effect counter is always
        /// decremented, even if the effect panics or is aborted.
        ///
        /// # Error Handling Strategy
        ///
        /// **Reducer panics**: Propagate (fail fast). Reducers should be
        /// pure functions that do not panic.
        ///
        /// **Effect execution failures**: Effects report failure by feeding
        /// an error-carrying action back into the reducer; the runtime
        /// itself only logs.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned, so pass by value is intentional
        #[allow(clippy::too_many_lines)]
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            // Broadcast to observers, then feed back into the reducer
                            let _ = store.action_broadcast.send(action.clone());
                            let _ = store.send(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        tokio::time::sleep(duration).await;
                        tracing::trace!("Effect::Delay completed, sending action");

                        let _ = store.action_broadcast.send((*action).clone());
                        let _ = store.send(*action).await;
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                    // Execute all effects concurrently, each with the same tracking
                    for effect in effects {
                        self.execute_effect_internal(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        // Execute effects one by one, waiting for each to complete
                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!(
                                "Executing sequential effect {} of {}",
                                idx + 1,
                                effect_count
                            );

                            let (sub_tx, _sub_rx) = tokio::sync::watch::channel(());
                            let sub_tracking = EffectTracking {
                                counter: Arc::new(AtomicUsize::new(0)),
                                notifier: sub_tx,
                            };
                            let mut sub_rx = sub_tracking.notifier.subscribe();

                            store.execute_effect_internal(effect, sub_tracking.clone());

                            // Wait for this effect to complete before continuing
                            if sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                                let _ = sub_rx.changed().await;
                            }
                        }
                        tracing::trace!("Effect::Sequential completed");
                    });
                },
                Effect::Cancellable { id, effect } => {
                    self.execute_cancellable(id, *effect, tracking);
                },
                Effect::Cancel(id) => {
                    tracing::trace!(id = %id, "Executing Effect::Cancel");
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                    self.cancel(id);
                },
            }
        }

        /// Execute an effect whose task is registered for cancellation
        ///
        /// The spawned task's [`AbortHandle`] is registered under `id`;
        /// a later `Cancel(id)` aborts it. Aborting drops the future, so
        /// the RAII guards still decrement every counter.
        fn execute_cancellable(&self, id: EffectId, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);

            match effect {
                Effect::Future(fut) => {
                    tracing::trace!(id = %id, "Executing cancellable future");
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    let task = tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        if let Some(action) = fut.await {
                            let _ = store.action_broadcast.send(action.clone());
                            let _ = store.send(action).await;
                        }
                    });
                    self.register_cancellable(id, task.abort_handle());
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!(id = %id, "Executing cancellable delay");
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    let task = tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        tokio::time::sleep(duration).await;
                        let _ = store.action_broadcast.send((*action).clone());
                        let _ = store.send(*action).await;
                    });
                    self.register_cancellable(id, task.abort_handle());
                },
                other => {
                    // Composite effects spawn through their own paths; only
                    // leaf async work can be registered for abort.
                    tracing::warn!(
                        id = %id,
                        "Cancellable wraps a non-async effect; executing without registration"
                    );
                    self.execute_effect_internal(other, tracking);
                },
            }
        }

        fn register_cancellable(&self, id: EffectId, handle: AbortHandle) {
            tracing::trace!(id = %id, "Registered cancellable task");
            self.cancellations.register(id, handle);
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellations: self.cancellations.clone(),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purohit_core::{SmallVec, smallvec};
    use std::time::Duration;

    const SLOW_WORK: EffectId = EffectId::new("test.slow_work");

    #[derive(Clone, Debug, Default)]
    struct TestState {
        value: i32,
        feedback_count: u32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Set(i32),
        StartWork(i32),
        StartSlowWork(i32),
        CancelSlowWork,
        WorkDone(i32),
    }

    #[derive(Clone)]
    struct TestReducer;

    #[derive(Clone)]
    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Set(v) => {
                    state.value = v;
                    smallvec![Effect::None]
                },
                TestAction::StartWork(v) => {
                    smallvec![Effect::Future(Box::pin(async move {
                        Some(TestAction::WorkDone(v))
                    }))]
                },
                TestAction::StartSlowWork(v) => {
                    smallvec![Effect::Cancellable {
                        id: SLOW_WORK,
                        effect: Box::new(Effect::Delay {
                            duration: Duration::from_secs(5),
                            action: Box::new(TestAction::WorkDone(v)),
                        }),
                    }]
                },
                TestAction::CancelSlowWork => {
                    smallvec![Effect::cancel(SLOW_WORK)]
                },
                TestAction::WorkDone(v) => {
                    state.value = v;
                    state.feedback_count += 1;
                    smallvec![Effect::None]
                },
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState::default(), TestReducer, TestEnv)
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn send_updates_state() {
        let store = test_store();
        let _ = store.send(TestAction::Set(42)).await.unwrap();
        assert_eq!(store.state(|s| s.value).await, 42);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn future_effect_feeds_action_back() {
        let store = test_store();
        let result = store
            .send_and_wait_for(
                TestAction::StartWork(7),
                |a| matches!(a, TestAction::WorkDone(_)),
                Duration::from_secs(1),
            )
            .await
            .unwrap();

        assert!(matches!(result, TestAction::WorkDone(7)));
        // Feedback dispatch races with the broadcast; give it a moment to land.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.state(|s| s.value).await, 7);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn effect_handle_waits_for_completion() {
        let store = test_store();
        let mut handle = store.send(TestAction::StartWork(3)).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.ok();
        // The tracked effect has finished; its feedback dispatch is separate.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn cancel_aborts_registered_work() {
        let store = test_store();
        let _ = store.send(TestAction::StartSlowWork(9)).await.unwrap();
        let _ = store.send(TestAction::CancelSlowWork).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let state = store.state(Clone::clone).await;
        assert_eq!(state.value, 0, "aborted work must not deliver its action");
        assert_eq!(state.feedback_count, 0);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn imperative_cancel_aborts_registered_work() {
        let store = test_store();
        let _ = store.send(TestAction::StartSlowWork(9)).await.unwrap();
        store.cancel(SLOW_WORK);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn shutdown_rejects_new_actions() {
        let store = test_store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(TestAction::Set(1)).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn shutdown_aborts_cancellable_work() {
        let store = test_store();
        let _ = store.send(TestAction::StartSlowWork(5)).await.unwrap();

        // The delayed action would run for 5s; shutdown aborts it instead.
        store.shutdown(Duration::from_secs(1)).await.unwrap();
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn observers_receive_effect_actions() {
        let store = test_store();
        let mut rx = store.subscribe_actions();

        let _ = store.send(TestAction::StartWork(11)).await.unwrap();

        let observed = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(observed, TestAction::WorkDone(11)));
    }

    #[tokio::test]
    async fn completed_handle_returns_immediately() {
        let mut handle = EffectHandle::completed();
        handle.wait().await;
    }
}
