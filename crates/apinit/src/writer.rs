//! Output path mapping and file writing
//!
//! Boundary module: matches destination module names to the physical
//! `__init__.py` paths declared by the build system, verifies the two sides
//! agree, and persists the generated texts. Nothing is written until the
//! whole run is known to be consistent.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use cow_utils::CowUtils;
use log::{debug, info};

use crate::{
    config::Config, error::GenError, scanner, types::FxIndexMap, universe::ModuleUniverse,
};

/// Docstring stamped at the top of every generated file.
pub const GENERATED_FILE_HEADER: &str = r#""""Imports for Python API.

This file is MACHINE GENERATED! Do not edit.
Generated by: apinit.
"""
"#;

/// Map each declared output file to the destination module it will hold.
///
/// Paths are normalized to `/` separators and must contain a `/{api_dir}/`
/// component; the module name is derived from the directory path after the
/// last occurrence of that marker, so `out/api/nn/sub/__init__.py` holds
/// module `nn.sub` and `out/api/__init__.py` holds the root. When two paths
/// claim the same module the later declaration wins.
pub fn module_file_map(
    output_files: &[String],
    api_dir: &str,
) -> Result<FxIndexMap<String, PathBuf>, GenError> {
    let marker = format!("/{api_dir}/");
    let mut module_to_file = FxIndexMap::default();
    for output_file in output_files {
        let normalized = output_file.cow_replace('\\', "/");
        let Some(marker_pos) = normalized.rfind(&marker) else {
            return Err(GenError::OutputOutsideApiDir {
                api_dir: api_dir.to_owned(),
                path: output_file.clone(),
            });
        };
        let relative = &normalized[marker_pos + marker.len()..];
        let module_dir = match relative.rfind('/') {
            Some(pos) => &relative[..pos],
            None => "",
        };
        let module_name = module_dir.cow_replace('/', ".").trim_matches('.').to_owned();
        module_to_file.insert(module_name, PathBuf::from(output_file));
    }
    Ok(module_to_file)
}

/// Generate and write every declared `__init__.py`.
///
/// Path validation, generation, and the missing-output check all run before
/// the first write, so a failing run leaves the output tree untouched.
/// Declared files whose module received no imports are created empty; they
/// are package markers that keep the generated tree importable.
pub fn create_api_files(
    output_files: &[String],
    universe: &ModuleUniverse,
    config: &Config,
) -> Result<()> {
    let module_to_file = module_file_map(output_files, &config.api_dir)?;
    let module_text_map = scanner::generate_init_text(universe, config)?;

    let mut missing: Vec<String> = module_text_map
        .keys()
        .filter(|module| !module_to_file.contains_key(module.as_str()))
        .map(|module| missing_file_entry(module, &config.api_dir))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(GenError::MissingOutputs { missing }.into());
    }

    for (module, file_path) in &module_to_file {
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
        if !module_text_map.contains_key(module) {
            fs::write(file_path, "").with_context(|| {
                format!("Failed to create package marker {}", file_path.display())
            })?;
        }
    }

    for (module, text) in &module_text_map {
        let Some(file_path) = module_to_file.get(module) else {
            continue;
        };
        debug!("writing module '{module}' to {}", file_path.display());
        fs::write(file_path, format!("{GENERATED_FILE_HEADER}{text}"))
            .with_context(|| format!("Failed to write {}", file_path.display()))?;
    }

    info!(
        "wrote {} generated modules across {} declared outputs",
        module_text_map.len(),
        module_to_file.len()
    );
    Ok(())
}

/// Path reported for a generated module with no declared output.
fn missing_file_entry(module: &str, api_dir: &str) -> String {
    if module.is_empty() {
        format!("{api_dir}/__init__.py")
    } else {
        format!("{api_dir}/{}/__init__.py", module.cow_replace('.', "/"))
    }
}
