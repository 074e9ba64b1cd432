use crate::*;
use pretty_assertions::assert_eq;

fn roundtrip(input: &str) -> String {
    parse_type_expr(input).unwrap().to_string()
}

#[test]
fn test_keywords() {
    for keyword in [
        "any",
        "unknown",
        "string",
        "number",
        "boolean",
        "void",
        "never",
        "null",
        "undefined",
        "object",
    ] {
        match parse_type_expr(keyword).unwrap() {
            TypeExpr::Keyword { keyword: parsed, .. } => assert_eq!(parsed.as_str(), keyword),
            other => panic!("Expected keyword for {keyword}, got {other:?}"),
        }
    }
}

#[test]
fn test_union_members_are_flattened_in_order() {
    match parse_type_expr("Subject<number> | string | Error").unwrap() {
        TypeExpr::Union { members, .. } => {
            let rendered: Vec<String> = members.iter().map(ToString::to_string).collect();
            assert_eq!(rendered, vec!["Subject<number>", "string", "Error"]);
        }
        other => panic!("Expected union, got {other:?}"),
    }
}

#[test]
fn test_intersection_binds_tighter_than_union() {
    match parse_type_expr("A & B | C").unwrap() {
        TypeExpr::Union { members, .. } => {
            assert_eq!(members.len(), 2);
            assert!(matches!(members[0], TypeExpr::Intersection { .. }));
        }
        other => panic!("Expected union, got {other:?}"),
    }
}

#[test]
fn test_parenthesized_union_inside_intersection() {
    match parse_type_expr("A & (B | C)").unwrap() {
        TypeExpr::Intersection { members, .. } => {
            assert_eq!(members.len(), 2);
            assert!(matches!(members[1], TypeExpr::Union { .. }));
        }
        other => panic!("Expected intersection, got {other:?}"),
    }
    assert_eq!(roundtrip("A & (B | C)"), "A & (B | C)");
}

#[test]
fn test_function_type() {
    match parse_type_expr("(source: Observable<T>) => Observable<T>").unwrap() {
        TypeExpr::Function {
            params,
            return_type,
            ..
        } => {
            assert_eq!(params.len(), 1);
            assert_eq!(params[0].name.name, "source");
            assert_eq!(return_type.to_string(), "Observable<T>");
        }
        other => panic!("Expected function type, got {other:?}"),
    }
    assert_eq!(roundtrip("() => void"), "() => void");
}

#[test]
fn test_parenthesized_function_in_union() {
    assert_eq!(roundtrip("(() => void) | string"), "(() => void) | string");
}

#[test]
fn test_qualified_reference() {
    match parse_type_expr(r#""rxjs/internal/Subject".Subject<number>"#).unwrap() {
        TypeExpr::Reference(reference) => {
            assert_eq!(reference.module.as_deref(), Some("rxjs/internal/Subject"));
            assert_eq!(reference.name.name, "Subject");
            assert_eq!(reference.type_args.len(), 1);
        }
        other => panic!("Expected reference, got {other:?}"),
    }
}

#[test]
fn test_string_escapes_in_module_path() {
    match parse_type_expr(r#""a\\b\/c".X"#).unwrap() {
        TypeExpr::Reference(reference) => {
            assert_eq!(reference.module.as_deref(), Some("a\\b/c"));
        }
        other => panic!("Expected reference, got {other:?}"),
    }
}

#[test]
fn test_nested_generics() {
    assert_eq!(
        roundtrip("Map<string, Observable<Array<number>>>"),
        "Map<string, Observable<Array<number>>>"
    );
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    assert_eq!(roundtrip("   Subject<number>\n"), "Subject<number>");
}
