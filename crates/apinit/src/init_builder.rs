//! Aggregation of export declarations into per-module import blocks
//!
//! `ModuleInitBuilder` is the single owner of the accumulated import table:
//! every discovered export and every synthesized parent-chain import flows
//! through [`ModuleInitBuilder::add_import`], and [`ModuleInitBuilder::build`]
//! renders the final `__init__.py` body text for each destination module.

use std::collections::BTreeSet;

use log::trace;
use rustc_hash::FxHashMap;

use crate::{
    error::GenError,
    types::{FxIndexMap, SymbolId},
};

/// Formats an import statement.
///
/// An empty `source_module_name` produces a plain `import` statement; a
/// destination name differing from the source name produces an `as` alias.
pub fn format_import(source_module_name: &str, source_name: &str, dest_name: &str) -> String {
    if source_module_name.is_empty() {
        if source_name == dest_name {
            format!("import {source_name}")
        } else {
            format!("import {source_name} as {dest_name}")
        }
    } else if source_name == dest_name {
        format!("from {source_module_name} import {source_name}")
    } else {
        format!("from {source_module_name} import {source_name} as {dest_name}")
    }
}

/// Builds a map from destination module name to the imports included in that
/// module's generated `__init__.py`.
#[derive(Debug)]
pub struct ModuleInitBuilder {
    /// Destination module -> fully-qualified name -> candidate statements.
    ///
    /// The same symbol can be reachable through more than one physical source
    /// path; every candidate spelling is retained here and [`Self::build`]
    /// picks exactly one per name.
    module_imports: FxIndexMap<String, FxIndexMap<String, BTreeSet<String>>>,
    /// Identity last seen for each fully-qualified destination name.
    dest_symbols: FxHashMap<String, SymbolId>,
    /// Root-module export names that start with an underscore, in first-seen
    /// order, duplicates preserved.
    underscore_names_in_root: Vec<String>,
}

impl Default for ModuleInitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleInitBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            module_imports: FxIndexMap::default(),
            dest_symbols: FxHashMap::default(),
            underscore_names_in_root: Vec::new(),
        }
    }

    /// Record one export declaration or synthesized structural import.
    ///
    /// `dest_module_name` is the dotted destination namespace (`""` for the
    /// root module); `source_module_name` and `source_name` locate the symbol
    /// being imported; `dest_name` is the name it is exposed under.
    ///
    /// Fails with [`GenError::SymbolExposedTwice`] when the fully-qualified
    /// destination name was previously claimed by a different identity and
    /// neither identity is the [`SymbolId::Unchecked`] sentinel.
    pub fn add_import(
        &mut self,
        symbol: SymbolId,
        dest_module_name: &str,
        source_module_name: &str,
        source_name: &str,
        dest_name: &str,
    ) -> Result<(), GenError> {
        let full_api_name = if dest_module_name.is_empty() {
            dest_name.to_owned()
        } else {
            format!("{dest_module_name}.{dest_name}")
        };

        // Two different real symbols must never share a fully-qualified name.
        if let Some(previous) = self.dest_symbols.get(&full_api_name)
            && *previous != symbol
            && !previous.is_unchecked()
            && !symbol.is_unchecked()
        {
            return Err(GenError::SymbolExposedTwice {
                name: full_api_name,
            });
        }
        // Identity bookkeeping: last writer wins.
        self.dest_symbols.insert(full_api_name.clone(), symbol);

        if dest_module_name.is_empty() && dest_name.starts_with('_') {
            self.underscore_names_in_root.push(dest_name.to_owned());
        }

        let import_str = format_import(source_module_name, source_name, dest_name);
        trace!("adding to {dest_module_name:?}: {import_str}");
        self.module_imports
            .entry(dest_module_name.to_owned())
            .or_default()
            .entry(full_api_name)
            .or_default()
            .insert(import_str);
        Ok(())
    }

    /// Destination modules that have received at least one import so far.
    pub fn destination_modules(&self) -> impl Iterator<Item = &str> {
        self.module_imports.keys().map(String::as_str)
    }

    /// Render the accumulated imports into per-module body text.
    ///
    /// For every destination name the lexicographically smallest candidate
    /// statement wins, independent of discovery order; a module's chosen
    /// statements are then themselves sorted and newline-joined. The root
    /// module (`""`) additionally receives the underscore exposure epilogue
    /// and is always present in the result.
    pub fn build(self) -> FxIndexMap<String, String> {
        let mut module_text_map = FxIndexMap::default();
        for (dest_module, dest_name_to_imports) in &self.module_imports {
            let mut imports_list: Vec<&str> = dest_name_to_imports
                .values()
                .filter_map(|imports| imports.first())
                .map(String::as_str)
                .collect();
            imports_list.sort_unstable();
            module_text_map.insert(dest_module.clone(), imports_list.join("\n"));
        }

        // Underscore-prefixed exports would be hidden by the wildcard-import
        // convention, so the root module re-exposes them explicitly.
        let underscore_names_str = self
            .underscore_names_in_root
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let root_text: &mut String = module_text_map.entry(String::new()).or_default();
        root_text.push_str(&format!(
            "\n_names_with_underscore = [{underscore_names_str}]\n\
             __all__ = [s for s in dir() if not s.startswith('_')]\n\
             __all__.extend([s for s in _names_with_underscore])\n"
        ));

        module_text_map
    }
}
