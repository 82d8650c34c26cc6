//! The core trait for business logic.
//!
//! Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
//! They contain all business logic and are deterministic and testable; every
//! source of nondeterminism (time, network, randomness) comes in through the
//! environment.

use crate::effect::Effect;
use smallvec::SmallVec;

/// The Reducer trait - core abstraction for business logic
///
/// # Type Parameters
///
/// - `State`: The domain state this reducer operates on
/// - `Action`: The action type this reducer processes
/// - `Environment`: The injected dependencies this reducer needs
///
/// # Example
///
/// ```ignore
/// impl Reducer for BookingFlowReducer {
///     type State = BookingFlowState;
///     type Action = BookingFlowAction;
///     type Environment = ProductionEnvironment;
///
///     fn reduce(
///         &self,
///         state: &mut BookingFlowState,
///         action: BookingFlowAction,
///         env: &ProductionEnvironment,
///     ) -> SmallVec<[Effect<BookingFlowAction>; 4]> {
///         match action {
///             BookingFlowAction::SelectCeremony(ceremony) => {
///                 // Business logic here
///                 smallvec![Effect::None]
///             }
///             _ => smallvec![Effect::None],
///         }
///     }
/// }
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// Reduce an action into state changes and effects
    ///
    /// This is a pure function that:
    /// 1. Validates the action against the current state
    /// 2. Updates state in place
    /// 3. Returns effect descriptions to be executed
    ///
    /// # Arguments
    ///
    /// - `state`: Mutable reference to current state
    /// - `action`: The action to process
    /// - `env`: Reference to injected dependencies
    ///
    /// # Returns
    ///
    /// Effects to be executed by the runtime. Most transitions produce one
    /// effect (often `Effect::None`), so the small-vector capacity of four
    /// keeps the common case off the heap.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]>;
}
