//! Process-wide catalog registry
//!
//! Hosts that load one catalog at startup register it here and open
//! sessions against it. Re-initialising replaces the catalog for sessions
//! opened afterwards; open sessions keep the catalog they started with.

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::{BuildError, Result};
use crate::session::BuildSession;

type Registry = OnceCell<RwLock<Arc<Catalog>>>;

/// Global cached catalog
static CATALOG: Registry = OnceCell::new();

fn install(registry: &Registry, catalog: Catalog) {
    let catalog = Arc::new(catalog);
    let lock = registry.get_or_init(|| RwLock::new(Arc::clone(&catalog)));
    *lock.write() = catalog;
}

fn current(registry: &Registry) -> Result<Arc<Catalog>> {
    registry
        .get()
        .map(|lock| Arc::clone(&lock.read()))
        .ok_or(BuildError::CatalogNotInitialized)
}

/// Parse, validate and register a catalog
pub fn init_catalog(json: &str) -> Result<()> {
    install(&CATALOG, Catalog::from_json(json)?);
    Ok(())
}

/// Register the catalog bundled with the crate
pub fn init_builtin_catalog() -> Result<()> {
    install(&CATALOG, Catalog::builtin()?);
    Ok(())
}

pub fn is_catalog_initialized() -> bool {
    CATALOG.get().is_some()
}

/// The registered catalog
pub fn catalog() -> Result<Arc<Catalog>> {
    current(&CATALOG)
}

/// Open a session against the registered catalog
pub fn open_session() -> Result<BuildSession> {
    Ok(BuildSession::new(catalog()?))
}
