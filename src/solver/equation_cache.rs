use chrono::Local;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Fixed storage key for the last submitted equation.
pub const LAST_EQUATION_KEY: &str = "last_equation";

/// Persists the last submitted (M, N) pair as a small toml document:
///
/// ```toml
/// [last_equation]
/// m = "2xy"
/// n = "x^2"
/// saved_at = "2026-08-07T12:00:00+00:00"
/// ```
///
/// Written after a successful solve, read at startup to prefill the input
/// fields. Missing or corrupt files load as `None`; the cache never fails a
/// solve.
#[derive(Debug, Clone)]
pub struct EquationCache {
    path: PathBuf,
}

impl EquationCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EquationCache { path: path.into() }
    }

    /// Cache file in the system temp directory, so the library never writes
    /// into the working tree unasked.
    pub fn at_default_location() -> Self {
        EquationCache::new(std::env::temp_dir().join("mathnexa_last_equation.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the cache with the given raw input pair.
    pub fn store(&self, m_raw: &str, n_raw: &str) -> io::Result<()> {
        let mut entry = Table::new();
        entry.insert("m".to_string(), Value::String(m_raw.to_string()));
        entry.insert("n".to_string(), Value::String(n_raw.to_string()));
        entry.insert(
            "saved_at".to_string(),
            Value::String(Local::now().to_rfc3339()),
        );
        let mut doc = Table::new();
        doc.insert(LAST_EQUATION_KEY.to_string(), Value::Table(entry));
        debug!("persisting last equation to {}", self.path.display());
        fs::write(&self.path, doc.to_string())
    }

    /// Reads the cached (M, N) pair back, if a valid cache file exists.
    pub fn load(&self) -> Option<(String, String)> {
        let text = fs::read_to_string(&self.path).ok()?;
        let doc: Table = text.parse().ok()?;
        let entry = doc.get(LAST_EQUATION_KEY)?.as_table()?;
        let m = entry.get("m")?.as_str()?.to_string();
        let n = entry.get("n")?.as_str()?.to_string();
        Some((m, n))
    }
}
