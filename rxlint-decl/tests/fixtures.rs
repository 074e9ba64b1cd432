use rxlint_decl::{parse_declarations_with_source, Binding, Declaration, TypeExpr};

const RXJS: &str = include_str!("../../rxlint-types/tests/fixtures/rxjs.rxd");
const QUALIFIED: &str = include_str!("../../rxlint-types/tests/fixtures/qualified.rxd");

#[test]
fn test_rxjs_fixture_parses() {
    let file = parse_declarations_with_source(RXJS, Some("rxjs.rxd".to_string()))
        .expect("rxjs fixture should parse");

    let classes = file
        .declarations()
        .filter(|(_, decl)| matches!(decl, Declaration::Class(_)))
        .count();
    assert_eq!(classes, 5);

    let bindings: Vec<&str> = file
        .bindings()
        .map(|binding| binding.name().name.as_str())
        .collect();
    assert!(bindings.contains(&"subject"));
    assert!(bindings.contains(&"nothing"));
}

#[test]
fn test_qualified_fixture_foreign_subject() {
    let file = parse_declarations_with_source(QUALIFIED, None).unwrap();
    let foreign = file
        .bindings()
        .find(|binding| binding.name().name == "foreign")
        .expect("foreign binding");

    match foreign {
        Binding::Let(binding) => match &binding.type_annotation {
            TypeExpr::Reference(reference) => {
                assert_eq!(reference.module.as_deref(), Some("other-lib/events"));
                assert_eq!(reference.name.name, "Subject");
            }
            other => panic!("Expected reference, got {other:?}"),
        },
        other => panic!("Expected let binding, got {other:?}"),
    }
}

#[test]
fn test_rxjs_fixture_spans_point_into_source() {
    let file = parse_declarations_with_source(RXJS, None).unwrap();
    for binding in file.bindings() {
        let name = binding.name();
        assert_eq!(&RXJS[name.span.start..name.span.end], name.name);
    }
}
