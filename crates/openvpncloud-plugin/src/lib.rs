//! OpenVPN Cloud plugin runtime
//!
//! The host-facing half of the provider: attribute schemas, the generic
//! resource data handed to callbacks, diagnostics, and the registry that
//! dispatches create/read/update/delete calls to resource implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 host / CLI harness               │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               openvpncloud-plugin                │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  Provider<M> / ConfiguredProvider        │   │
//! │  │  trait Resource<M> / DataSource<M>       │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │    Schema    │  │  State Mgmt  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │  openvpncloud-provider  →  openvpncloud-client   │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod data;
pub mod diag;
pub mod error;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod state;

// Re-exports
pub use data::{Block, Fields, ResourceData};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{PluginError, Result};
pub use provider::{ApplyError, ConfiguredProvider, Provider, ProviderSchema};
pub use resource::{Configure, DataSource, Resource};
pub use schema::{Attribute, Element, Schema, ValueType};
pub use state::{GlobalState, ResourceAddress, ResourceState, StateLock, StateManager};
