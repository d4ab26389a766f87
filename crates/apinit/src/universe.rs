//! Export manifest model
//!
//! The module universe is the injected description of the library being
//! scanned: which internal modules exist and which export annotations each
//! one carries. It arrives as a TOML manifest so that generation never has to
//! import or reflect on the target library itself.

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Dotted chain of Python identifiers, e.g. `mylib.python.ops.math_ops`.
static DOTTED_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("DOTTED_PATH regex should compile")
});

/// Single Python identifier.
static PY_IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("PY_IDENT regex should compile")
});

/// A constant exported by name. Constants carry no identity, so two modules
/// may expose the same constant path without tripping conflict detection.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstantExport {
    /// Name of the constant inside its defining module.
    pub value: String,
    /// Public dotted paths this constant is exported under.
    pub paths: Vec<String>,
}

/// An annotated symbol export.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolExport {
    /// Attribute name inside the defining module.
    pub name: String,
    /// Stable identity token shared by every annotation of the same symbol,
    /// conventionally the dotted path of its canonical definition site.
    pub symbol: String,
    /// Public dotted paths this symbol is exported under.
    pub paths: Vec<String>,
}

/// One internal module and the exports declared inside it.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleRecord {
    /// Dotted module path, e.g. `mylib.python.ops.math_ops`.
    pub name: String,
    /// Style-A exports: named constants.
    #[serde(default, rename = "constant")]
    pub constants: Vec<ConstantExport>,
    /// Style-B exports: symbols annotated with an identity token.
    #[serde(default, rename = "symbol")]
    pub symbols: Vec<SymbolExport>,
}

/// The full set of modules visible to one generation run.
///
/// A module may appear in several records (e.g. a manifest assembled from
/// fragments); the scanner processes each record independently.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleUniverse {
    /// Root namespace of the library, e.g. `mylib`.
    pub namespace: String,
    /// Module records in manifest order.
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleRecord>,
}

impl ModuleUniverse {
    /// Load and validate a manifest from a TOML file.
    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;
        let universe: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest file: {}", path.display()))?;
        universe.validate()?;
        debug!(
            "loaded manifest with {} module records under namespace '{}'",
            universe.modules.len(),
            universe.namespace
        );
        Ok(universe)
    }

    /// Module filter applied when none is configured: the library's own
    /// namespace prefix, so unrelated modules in the manifest are ignored.
    pub fn default_module_filter(&self) -> String {
        format!("{}.", self.namespace)
    }

    /// Root module of the generated package when none is configured.
    pub fn default_output_module(&self) -> String {
        format!("{}.api", self.namespace)
    }

    /// Check every identifier and dotted path in the manifest.
    fn validate(&self) -> Result<()> {
        check_dotted_path("namespace", &self.namespace)?;
        for module in &self.modules {
            check_dotted_path("module name", &module.name)?;
            for constant in &module.constants {
                check_identifier("constant value", &constant.value)?;
                for path in &constant.paths {
                    check_dotted_path("export path", path)?;
                }
            }
            for symbol in &module.symbols {
                check_identifier("symbol name", &symbol.name)?;
                check_dotted_path("symbol identity", &symbol.symbol)?;
                for path in &symbol.paths {
                    check_dotted_path("export path", path)?;
                }
            }
        }
        Ok(())
    }
}

fn check_dotted_path(what: &str, value: &str) -> Result<()> {
    if !DOTTED_PATH.is_match(value) {
        bail!("invalid {what} in manifest: '{value}' is not a dotted Python identifier path");
    }
    Ok(())
}

fn check_identifier(what: &str, value: &str) -> Result<()> {
    if !PY_IDENT.is_match(value) {
        bail!("invalid {what} in manifest: '{value}' is not a Python identifier");
    }
    Ok(())
}
