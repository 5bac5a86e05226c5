//! Python bindings
//!
//! Thin wrappers over the registry and [`BuildSession`]. Groups, sigil
//! kinds and custom spells are passed as their snake_case keys.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::catalog::{CustomSpell, OptionGroup, SigilKind};
use crate::error::BuildError;
use crate::registry;
use crate::session::BuildSession;

// ============================================================================
// Key Parsing
// ============================================================================

fn group(key: &str) -> PyResult<OptionGroup> {
    OptionGroup::from_key(key).ok_or_else(|| BuildError::UnknownGroup(key.to_string()).into())
}

fn sigil(key: &str) -> PyResult<SigilKind> {
    SigilKind::from_key(key).ok_or_else(|| BuildError::UnknownSigil(key.to_string()).into())
}

fn spell(key: &str) -> PyResult<CustomSpell> {
    CustomSpell::from_key(key).ok_or_else(|| BuildError::UnknownSpell(key.to_string()).into())
}

// ============================================================================
// Python Functions
// ============================================================================

/// Load and cache a catalog from JSON text (call once at startup)
///
/// # Raises
/// ValueError if the catalog is malformed or fails validation
#[pyfunction]
fn init_catalog(json: &str) -> PyResult<()> {
    Ok(registry::init_catalog(json)?)
}

/// Cache the catalog bundled with the extension
#[pyfunction]
fn init_builtin_catalog() -> PyResult<()> {
    Ok(registry::init_builtin_catalog()?)
}

/// Check if a catalog is cached
#[pyfunction]
fn is_catalog_initialized() -> bool {
    registry::is_catalog_initialized()
}

/// Open a new session against the cached catalog
///
/// # Raises
/// RuntimeError if `init_catalog` was not called first
#[pyfunction]
fn new_session() -> PyResult<PyBuildSession> {
    PyBuildSession::new()
}

// ============================================================================
// BuildSession PyClass
// ============================================================================

/// BuildSession - one build's selections and balances
///
/// Every write method returns `True` when applied and `False` when the
/// intent was absorbed as a no-op.
#[pyclass(name = "BuildSession")]
pub struct PyBuildSession {
    inner: BuildSession,
}

#[pymethods]
impl PyBuildSession {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(Self {
            inner: registry::open_session()?,
        })
    }

    // ------------------------------------------------------------------------
    // Getter Properties
    // ------------------------------------------------------------------------

    #[getter]
    fn blessing_points(&self) -> i32 {
        self.inner.blessing_points()
    }

    #[getter]
    fn fortune_points(&self) -> i32 {
        self.inner.fortune_points()
    }

    #[getter]
    fn parents(&self) -> u32 {
        self.inner.parents()
    }

    #[getter]
    fn siblings(&self) -> u32 {
        self.inner.siblings()
    }

    #[getter]
    fn tier(&self) -> Option<String> {
        self.inner.tier().map(str::to_string)
    }

    #[getter]
    fn is_multiplayer(&self) -> bool {
        self.inner.is_multiplayer()
    }

    // ------------------------------------------------------------------------
    // Option Groups
    // ------------------------------------------------------------------------

    fn toggle_single(&mut self, group_key: &str, id: &str) -> PyResult<bool> {
        Ok(self.inner.toggle_single(group(group_key)?, id))
    }

    #[pyo3(signature = (group_key, id=None))]
    fn set_single(&mut self, group_key: &str, id: Option<&str>) -> PyResult<bool> {
        Ok(self.inner.set_single(group(group_key)?, id))
    }

    fn toggle_multi(&mut self, group_key: &str, id: &str) -> PyResult<bool> {
        Ok(self.inner.toggle_multi(group(group_key)?, id))
    }

    fn single(&self, group_key: &str) -> PyResult<Option<String>> {
        Ok(self.inner.single(group(group_key)?).map(str::to_string))
    }

    fn multi(&self, group_key: &str) -> PyResult<Vec<String>> {
        Ok(self.inner.multi(group(group_key)?).map(str::to_string).collect())
    }

    fn is_selected(&self, group_key: &str, id: &str) -> PyResult<bool> {
        Ok(self.inner.is_selected(group(group_key)?, id))
    }

    /// Cost label with the origin discount applied, or None for unknown ids
    fn display_cost(&self, group_key: &str, id: &str) -> PyResult<Option<String>> {
        Ok(self.inner.display_cost(group(group_key)?, id))
    }

    fn set_parents(&mut self, parents: u32) -> bool {
        self.inner.set_parents(parents)
    }

    fn set_siblings(&mut self, siblings: u32) -> bool {
        self.inner.set_siblings(siblings)
    }

    fn set_custom_spell(&mut self, spell_key: &str, text: &str) -> PyResult<bool> {
        Ok(self.inner.set_custom_spell(spell(spell_key)?, text))
    }

    fn custom_spell(&self, spell_key: &str) -> PyResult<Option<String>> {
        Ok(self.inner.custom_spell(spell(spell_key)?).map(str::to_string))
    }

    // ------------------------------------------------------------------------
    // Sigils
    // ------------------------------------------------------------------------

    fn buy_sigil(&mut self, kind: &str) -> PyResult<bool> {
        Ok(self.inner.buy_sigil(sigil(kind)?))
    }

    fn sell_sigil(&mut self, kind: &str) -> PyResult<bool> {
        Ok(self.inner.sell_sigil(sigil(kind)?))
    }

    fn toggle_sigil_choice(&mut self, id: &str) -> bool {
        self.inner.toggle_sigil_choice(id)
    }

    fn buy_job(&mut self, id: &str) -> bool {
        self.inner.buy_job(id)
    }

    fn sell_job(&mut self, id: &str) -> bool {
        self.inner.sell_job(id)
    }

    fn available(&self, kind: &str) -> PyResult<i32> {
        Ok(self.inner.available(sigil(kind)?))
    }

    /// Get the ledger as {kind: {"total", "used", "available"}}
    fn get_ledger(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let ledger = self.inner.ledger();
        let dict = PyDict::new(py);
        for kind in SigilKind::ALL {
            let entry = PyDict::new(py);
            entry.set_item("total", ledger.total(kind))?;
            entry.set_item("used", ledger.used(kind))?;
            entry.set_item("available", ledger.available(kind))?;
            dict.set_item(kind.key(), entry)?;
        }
        Ok(dict.into())
    }

    // ------------------------------------------------------------------------
    // Boosts, Tiers, Trees and Powers
    // ------------------------------------------------------------------------

    fn toggle_boost(&mut self, category: &str) -> bool {
        self.inner.toggle_boost(category)
    }

    fn toggle_boost_with(&mut self, category: &str, kind: &str) -> PyResult<bool> {
        Ok(self.inner.toggle_boost_with(category, sigil(kind)?))
    }

    fn boost(&self, category: &str) -> Option<&'static str> {
        self.inner.boost(category).map(SigilKind::key)
    }

    #[pyo3(signature = (tier=None))]
    fn select_tier(&mut self, tier: Option<&str>) -> bool {
        self.inner.select_tier(tier)
    }

    fn toggle_node(&mut self, tree: &str, node: &str) -> bool {
        self.inner.toggle_node(tree, node)
    }

    fn select_node(&mut self, tree: &str, node: &str) -> bool {
        self.inner.select_node(tree, node)
    }

    fn deselect_node(&mut self, tree: &str, node: &str) -> bool {
        self.inner.deselect_node(tree, node)
    }

    fn can_select_node(&self, tree: &str, node: &str) -> bool {
        self.inner.can_select_node(tree, node)
    }

    fn active_nodes(&self, tree: &str) -> Vec<String> {
        self.inner.active_nodes(tree).map(str::to_string).collect()
    }

    fn toggle_power(&mut self, category: &str, power: &str) -> bool {
        self.inner.toggle_power(category, power)
    }

    fn powers(&self, category: &str) -> Vec<String> {
        self.inner.powers(category).map(str::to_string).collect()
    }

    fn budget(&self, category: &str) -> u32 {
        self.inner.budget(category)
    }

    fn picks_remaining(&self, category: &str) -> u32 {
        self.inner.picks_remaining(category)
    }

    /// Get every category budget as {category: picks}
    fn get_budgets(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let dict = PyDict::new(py);
        for (category, picks) in &self.inner.derived().budgets {
            dict.set_item(category, *picks)?;
        }
        Ok(dict.into())
    }
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn magecraft_build_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(init_builtin_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(is_catalog_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(new_session, m)?)?;
    m.add_class::<PyBuildSession>()?;
    Ok(())
}
