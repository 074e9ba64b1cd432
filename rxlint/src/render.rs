//! Plain-text rendering for CLI output

use rxlint_types::TypeGraph;

/// `name: true/false` rows with the values aligned
pub fn probe_table(rows: &[(String, bool)]) -> String {
    let width = rows.iter().map(|(name, _)| name.len() + 1).max().unwrap_or(0);
    rows.iter()
        .map(|(name, value)| format!("{:<width$} {}", format!("{name}:"), value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every declaration and binding of a graph, one per line
pub fn dump_graph(graph: &TypeGraph) -> String {
    let mut lines = vec!["declarations:".to_string()];
    for (module, name, handle) in graph.declarations() {
        let qualified = match module {
            Some(module) => format!("{module:?}.{name}"),
            None => name.to_string(),
        };
        lines.push(format!("  {qualified} = {}", graph.describe(handle)));
    }

    lines.push("bindings:".to_string());
    for (name, binding) in graph.bindings() {
        let line = if binding.function_like {
            match binding.return_type {
                Some(returns) => format!("  fn {name}() => {}", graph.describe(returns)),
                None => format!("  fn {name}()"),
            }
        } else {
            format!("  let {name}: {}", graph.describe(binding.ty))
        };
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_probe_table_aligns_values() {
        let rows = vec![
            ("observable".to_string(), true),
            ("behavior-subject".to_string(), false),
        ];
        assert_eq!(
            probe_table(&rows),
            "observable:       true\nbehavior-subject: false"
        );
    }

    #[test]
    fn test_probe_table_empty() {
        assert_eq!(probe_table(&[]), "");
    }

    #[test]
    fn test_dump_graph() {
        let graph = rxlint_types::load_type_graph(
            r#"module "m" { class Box<T>; } let b: Box<string>; fn make() => Box<number>; fn noop();"#,
        )
        .unwrap();
        assert_eq!(
            dump_graph(&graph),
            [
                "declarations:",
                "  \"m\".Box = Box",
                "bindings:",
                "  let b: Box<string>",
                "  fn make() => Box<number>",
                "  fn noop()",
            ]
            .join("\n")
        );
    }
}
