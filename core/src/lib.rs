//! # Purohit Core
//!
//! Core traits and types for the Purohit booking architecture.
//!
//! This crate provides the fundamental abstractions used by every feature
//! in the workspace: a reducer-driven state machine with explicit effect
//! descriptions and injected dependencies.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature (e.g. the booking flow phase)
//! - **Action**: All possible inputs to a reducer (user intents, network results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//! - Cancellable async work (navigating away aborts in-flight requests)
//!
//! ## Example
//!
//! ```ignore
//! use purohit_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for BookingFlowReducer {
//!     type State = BookingFlowState;
//!     type Action = BookingFlowAction;
//!     type Environment = ProductionEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BookingFlowState,
//!         action: BookingFlowAction,
//!         env: &ProductionEnvironment,
//!     ) -> SmallVec<[Effect<BookingFlowAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub mod effect;
pub mod environment;
pub mod reducer;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};
