//! Namespace scanning and parent-chain synthesis
//!
//! Walks the module universe, feeds every export declaration to the
//! [`ModuleInitBuilder`], then wires intermediate namespace segments into
//! their parents so deep destinations resolve step by step.

use log::debug;

use crate::{
    config::Config,
    error::GenError,
    init_builder::ModuleInitBuilder,
    types::{FxIndexMap, SymbolId},
    universe::ModuleUniverse,
};

/// Generate the per-destination-module `__init__.py` body texts.
///
/// Returns a map from destination module name (`""` for the root) to its
/// generated text. Fails on the first fully-qualified name claimed by two
/// different symbol identities.
pub fn generate_init_text(
    universe: &ModuleUniverse,
    config: &Config,
) -> Result<FxIndexMap<String, String>, GenError> {
    let default_filter = universe.default_module_filter();
    let module_filter = config.module_filter.as_deref().unwrap_or(&default_filter);
    let default_output = universe.default_output_module();
    let output_module = config.output_module.as_deref().unwrap_or(&default_output);
    debug!("scanning modules matching '{module_filter}' into '{output_module}'");

    let mut builder = ModuleInitBuilder::new();
    for record in &universe.modules {
        if !record.name.contains(module_filter) {
            continue;
        }
        // Incubating namespaces are excluded from the exported surface.
        if is_unstable(&record.name, &config.unstable_segment) {
            debug!("skipping incubating module {}", record.name);
            continue;
        }

        for constant in &record.constants {
            for path in &constant.paths {
                let (dest_module, dest_name) = split_export_path(path);
                builder.add_import(
                    SymbolId::Unchecked,
                    dest_module,
                    &record.name,
                    &constant.value,
                    dest_name,
                )?;
            }
        }
        for symbol in &record.symbols {
            for path in &symbol.paths {
                let (dest_module, dest_name) = split_export_path(path);
                builder.add_import(
                    SymbolId::Token(symbol.symbol.clone()),
                    dest_module,
                    &record.name,
                    &symbol.name,
                    dest_name,
                )?;
            }
        }
    }

    add_parent_chain_imports(&mut builder, output_module)?;
    Ok(builder.build())
}

/// Split an export path into (destination module, destination name).
/// A bare name lands in the root module.
fn split_export_path(path: &str) -> (&str, &str) {
    path.rsplit_once('.').unwrap_or(("", path))
}

/// True when `segment` appears as a whole namespace segment of `module_name`
/// (other than the leading one).
fn is_unstable(module_name: &str, segment: &str) -> bool {
    module_name.contains(&format!(".{segment}."))
        || module_name.ends_with(&format!(".{segment}"))
}

/// Import every namespace segment into its immediate parent.
///
/// For a destination module `a.b.c` this issues `from <output> import a`
/// into the root, `from <output>.a import b` into `a`, and
/// `from <output>.a.b import c` into `a.b`. The source side always points
/// into the generated package itself, never the scanned library, so the
/// generated tree is self-contained. Modules are visited in sorted order to
/// keep the emitted statements independent of discovery order.
fn add_parent_chain_imports(
    builder: &mut ModuleInitBuilder,
    output_module: &str,
) -> Result<(), GenError> {
    let mut modules: Vec<String> = builder
        .destination_modules()
        .filter(|module| !module.is_empty())
        .map(str::to_owned)
        .collect();
    modules.sort_unstable();

    for module in &modules {
        let segments: Vec<&str> = module.split('.').collect();
        let mut parent = String::new();
        for (index, segment) in segments.iter().enumerate() {
            if index > 0 {
                if !parent.is_empty() {
                    parent.push('.');
                }
                parent.push_str(segments[index - 1]);
            }
            let import_from = if parent.is_empty() {
                output_module.to_owned()
            } else {
                format!("{output_module}.{parent}")
            };
            builder.add_import(SymbolId::Unchecked, &parent, &import_from, segment, segment)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn universe(manifest: &str) -> ModuleUniverse {
        toml::from_str(manifest).expect("manifest should parse")
    }

    const LAYERS: &str = r#"
namespace = "mylib"

[[module]]
name = "mylib.python.layers"

[[module.symbol]]
name = "Dense"
symbol = "mylib.python.layers.Dense"
paths = ["nn.sub.Dense"]
"#;

    #[test]
    fn test_parent_chain_completeness() {
        let text = generate_init_text(&universe(LAYERS), &Config::default()).unwrap();
        assert!(text[""].contains("from mylib.api import nn"));
        assert_eq!(text["nn"], "from mylib.api.nn import sub");
        assert_eq!(
            text["nn.sub"],
            "from mylib.python.layers import Dense"
        );
    }

    #[test]
    fn test_output_module_override_changes_chain_source() {
        let config = Config {
            output_module: Some("mylib.v2".to_owned()),
            ..Config::default()
        };
        let text = generate_init_text(&universe(LAYERS), &config).unwrap();
        assert!(text[""].contains("from mylib.v2 import nn"));
        assert_eq!(text["nn"], "from mylib.v2.nn import sub");
    }

    #[test]
    fn test_default_filter_skips_foreign_modules() {
        let manifest = r#"
namespace = "mylib"

[[module]]
name = "numpy.core"

[[module.symbol]]
name = "array"
symbol = "numpy.core.array"
paths = ["array"]
"#;
        let text = generate_init_text(&universe(manifest), &Config::default()).unwrap();
        assert!(!text[""].contains("array"));
    }

    #[test]
    fn test_explicit_filter_narrows_scan() {
        let manifest = r#"
namespace = "mylib"

[[module]]
name = "mylib.python.ops"

[[module.symbol]]
name = "add"
symbol = "mylib.python.ops.add"
paths = ["add"]

[[module]]
name = "mylib.python.io"

[[module.symbol]]
name = "read_file"
symbol = "mylib.python.io.read_file"
paths = ["read_file"]
"#;
        let config = Config {
            module_filter: Some("mylib.python.ops".to_owned()),
            ..Config::default()
        };
        let text = generate_init_text(&universe(manifest), &config).unwrap();
        assert!(text[""].contains("import add"));
        assert!(!text[""].contains("read_file"));
    }

    #[test]
    fn test_incubating_modules_are_skipped() {
        assert!(is_unstable("mylib.contrib.audio", "contrib"));
        assert!(is_unstable("mylib.contrib", "contrib"));
        // Segment match is exact, not a prefix match.
        assert!(!is_unstable("mylib.contribution", "contrib"));
        assert!(!is_unstable("contrib.mylib", "contrib"));

        let manifest = r#"
namespace = "mylib"

[[module]]
name = "mylib.contrib.audio"

[[module.symbol]]
name = "decode"
symbol = "mylib.contrib.audio.decode"
paths = ["audio.decode"]
"#;
        let text = generate_init_text(&universe(manifest), &Config::default()).unwrap();
        assert!(!text.contains_key("audio"));
    }

    #[test]
    fn test_constant_exports_use_no_check_sentinel() {
        let manifest = r#"
namespace = "mylib"

[[module]]
name = "mylib.python.constants"

[[module.constant]]
value = "PI"
paths = ["math.pi"]

[[module]]
name = "mylib.python.compat"

[[module.constant]]
value = "PI"
paths = ["math.pi"]
"#;
        // Two modules exporting the same constant path must not conflict.
        let text = generate_init_text(&universe(manifest), &Config::default()).unwrap();
        assert_eq!(
            text["math"],
            "from mylib.python.compat import PI as pi"
        );
    }

    #[test]
    fn test_conflicting_symbols_abort_the_run() {
        let manifest = r#"
namespace = "mylib"

[[module]]
name = "mylib.python.a"

[[module.symbol]]
name = "Thing"
symbol = "mylib.python.a.Thing"
paths = ["Thing"]

[[module]]
name = "mylib.python.b"

[[module.symbol]]
name = "Thing"
symbol = "mylib.python.b.Thing"
paths = ["Thing"]
"#;
        let err = generate_init_text(&universe(manifest), &Config::default()).unwrap_err();
        assert_eq!(
            err,
            GenError::SymbolExposedTwice {
                name: "Thing".to_owned()
            }
        );
    }

    #[test]
    fn test_split_export_path() {
        assert_eq!(split_export_path("math.add"), ("math", "add"));
        assert_eq!(split_export_path("nn.sub.Dense"), ("nn.sub", "Dense"));
        assert_eq!(split_export_path("add"), ("", "add"));
    }

    #[test]
    fn test_generated_text_is_stable() {
        let manifest = r#"
namespace = "mylib"

[[module]]
name = "mylib.python.ops.math_ops"

[[module.symbol]]
name = "add"
symbol = "mylib.python.ops.math_ops.add"
paths = ["math.add", "add"]

[[module.symbol]]
name = "multiply"
symbol = "mylib.python.ops.math_ops.multiply"
paths = ["math.multiply"]

[[module.constant]]
value = "PI"
paths = ["math.pi"]
"#;
        let text = generate_init_text(&universe(manifest), &Config::default()).unwrap();
        insta::assert_snapshot!(text["math"], @r"
        from mylib.python.ops.math_ops import PI as pi
        from mylib.python.ops.math_ops import add
        from mylib.python.ops.math_ops import multiply
        ");
    }

    #[test]
    fn test_record_order_does_not_change_output() {
        let forward = r#"
namespace = "mylib"

[[module]]
name = "mylib.python.a"

[[module.symbol]]
name = "add"
symbol = "mylib.python.impl.add"
paths = ["math.add"]

[[module]]
name = "mylib.python.b"

[[module.symbol]]
name = "add"
symbol = "mylib.python.impl.add"
paths = ["math.add"]
"#;
        let reverse = r#"
namespace = "mylib"

[[module]]
name = "mylib.python.b"

[[module.symbol]]
name = "add"
symbol = "mylib.python.impl.add"
paths = ["math.add"]

[[module]]
name = "mylib.python.a"

[[module.symbol]]
name = "add"
symbol = "mylib.python.impl.add"
paths = ["math.add"]
"#;
        let config = Config::default();
        let forward_text = generate_init_text(&universe(forward), &config).unwrap();
        let reverse_text = generate_init_text(&universe(reverse), &config).unwrap();
        assert_eq!(forward_text["math"], reverse_text["math"]);
        assert_eq!(forward_text[""], reverse_text[""]);
    }
}
