//! Resource and data source callback traits
//!
//! `M` is the provider's configured meta value, typically the API client the
//! configure step produced.

use crate::data::ResourceData;
use crate::diag::{Diagnostic, Diagnostics};
use crate::schema::Schema;
use async_trait::async_trait;
use std::sync::Arc;

/// A managed entity with a full create/read/update/delete lifecycle
#[async_trait]
pub trait Resource<M: ?Sized + Send + Sync>: Send + Sync {
    /// Attributes the resource accepts and exports
    fn schema(&self) -> Schema;

    /// Create the remote object and record its id
    async fn create(&self, meta: &M, d: &mut ResourceData) -> Result<(), Diagnostics>;

    /// Refresh `d` from the remote object; clear the id if it no longer exists
    async fn read(&self, meta: &M, d: &mut ResourceData) -> Result<(), Diagnostics>;

    /// Apply changed attributes in place
    ///
    /// Resources whose arguments are all `force_new` never reach this.
    async fn update(&self, _meta: &M, _d: &mut ResourceData) -> Result<(), Diagnostics> {
        Err(Diagnostics::error(
            "Update not supported",
            "This resource can only be replaced, not updated in place.",
        ))
    }

    async fn delete(&self, meta: &M, d: &mut ResourceData) -> Result<(), Diagnostics>;

    /// Prepare `d` (holding only the user-supplied import id) for a read
    fn import(&self, _d: &mut ResourceData) -> Result<(), Diagnostics> {
        Err(Diagnostic::error(
            "Resource does not support import",
            "Remove the resource from configuration and recreate it instead.",
        )
        .into())
    }
}

/// Read-only lookup of an existing remote entity
#[async_trait]
pub trait DataSource<M: ?Sized + Send + Sync>: Send + Sync {
    fn schema(&self) -> Schema;

    async fn read(&self, meta: &M, d: &mut ResourceData) -> Result<(), Diagnostics>;
}

/// Provider configure step: turns provider configuration into a meta value
#[async_trait]
pub trait Configure<M: ?Sized + Send + Sync>: Send + Sync {
    async fn configure(&self, d: &ResourceData) -> Result<Arc<M>, Diagnostics>;
}
