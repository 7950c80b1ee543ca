use std::sync::Arc;

use zodgen::{
    Expr, GenError, GeneratorConfig, KindDecl, Namespace, NamespaceFactory, TokenRegistry, ValueKindBuilder,
    ValueKinds, args, build_shared_member_creators, call, identifier, make_refinement_creator, make_root_creator,
    property_access, tokens::Token,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mock_registry() -> TokenRegistry {
    TokenRegistry::new()
        .with_kind("string", [("min", "min"), ("max", "max")])
        .with_kind("set", [("size", "size")])
        .with_shared([("optional", "optional")])
}

fn namespace(name: &str) -> Arc<dyn NamespaceFactory> {
    Arc::new(Namespace::new(name).expect("valid namespace"))
}

#[test]
fn scenario_string_min_optional() {
    init_logging();
    let decl = KindDecl::new("string", &["min", "max"]);
    let string = ValueKindBuilder::compose(&mock_registry(), namespace("ns"), &decl).expect("compose string");

    let root = string.create(args![]).expect("root");
    let min = string.t().get("min").expect("min").apply(root, args![3]).expect("min");
    let expr = string.t().get("optional").expect("optional").apply(min, args![]).expect("optional");

    assert_eq!(expr.to_string(), "ns.string().min(3).optional()");

    let expected = call(
        property_access(
            call(
                property_access(
                    call(property_access(identifier("ns").unwrap(), "string").unwrap(), vec![]).unwrap(),
                    "min",
                )
                .unwrap(),
                vec![Expr::from(3)],
            )
            .unwrap(),
            "optional",
        )
        .unwrap(),
        vec![],
    )
    .unwrap();
    assert_eq!(expr, expected);
}

#[test]
fn scenario_unknown_name_fails_at_composition() {
    let decl = KindDecl::new("string", &["min", "email"]);
    let err = ValueKindBuilder::compose(&mock_registry(), namespace("ns"), &decl).unwrap_err();
    match err {
        GenError::UnknownToken { kind, name } => {
            assert_eq!(kind, "string");
            assert_eq!(name, "email");
        }
        other => panic!("expected UnknownToken, got {other:?}"),
    }

    // Lookups after composition never error.
    let decl = KindDecl::new("string", &["min"]);
    let string = ValueKindBuilder::compose(&mock_registry(), namespace("ns"), &decl).unwrap();
    assert!(string.t().get("email").is_none());
}

#[test]
fn scenario_missing_target() {
    let kind = Token::new("string", "string");
    let min = make_refinement_creator(Token::new("min", "min"), kind).unwrap();
    let err = min.apply(None::<Expr>, args![3]).unwrap_err();
    assert!(matches!(err, GenError::InvalidTarget { .. }));
    assert!(err.to_string().contains("value kind `string`"));
}

#[test]
fn creators_are_deterministic() {
    let kinds = ValueKinds::builtin().unwrap();
    let string = kinds.kind("string").unwrap();
    let regex = string.t().get("regex").unwrap();

    let build = || {
        let root = string.create(args![Expr::object([("required_error", Expr::string("required"))])]).unwrap();
        regex
            .apply(root, vec![Expr::regex("^[a-z]+$", "i").unwrap(), Expr::object([("message", Expr::string("letters"))])])
            .unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn chaining_nests_without_flattening() {
    let kinds = ValueKinds::builtin().unwrap();
    let number = kinds.kind("number").unwrap();
    let int = number.t().get("int").unwrap();
    let positive = number.t().get("positive").unwrap();

    let inner = int.apply(number.create(args![]).unwrap(), args![]).unwrap();
    let outer = positive.apply(inner.clone(), args![]).unwrap();

    assert_eq!(outer.receiver(), Some(&inner));
    assert_eq!(outer.method(), Some("positive"));
    assert_eq!(outer.methods(), vec!["number", "int", "positive"]);

    let swapped = int.apply(positive.apply(number.create(args![]).unwrap(), args![]).unwrap(), args![]).unwrap();
    assert_ne!(outer, swapped);
    assert_eq!(swapped.to_string(), "z.number().positive().int()");
}

#[test]
fn kind_specific_token_shadows_shared() {
    init_logging();
    let registry = TokenRegistry::new()
        .with_kind("array", [("nonempty", "nonempty"), ("optional", "optionalArray")])
        .with_shared([("optional", "optional"), ("nullable", "nullable")]);
    let decl = KindDecl::new("array", &["nonempty", "optional"]);
    let array = ValueKindBuilder::compose(&registry, namespace("z"), &decl).unwrap();

    let optional = array.t().get("optional").unwrap();
    assert_eq!(optional.token().method(), "optionalArray");
    assert_eq!(array.t().get("nullable").unwrap().token().method(), "nullable");

    let expr = optional.apply(array.create(args![]).unwrap(), args![]).unwrap();
    assert_eq!(expr.to_string(), "z.array().optionalArray()");
}

#[test]
fn argument_order_is_preserved() {
    let callee = property_access(identifier("z").unwrap(), "union").unwrap();
    let x = Expr::from("x");
    let y = Expr::from(2);
    let z = Expr::from(true);
    let expr = call(callee, vec![x.clone(), y.clone(), z.clone()]).unwrap();

    assert_eq!(expr.args(), Some(&[x, y, z][..]));
    assert_eq!(expr.to_string(), r#"z.union("x", 2, true)"#);
}

#[test]
fn shared_bundle_is_independent_per_kind() {
    let registry = mock_registry();
    let for_string = build_shared_member_creators(&registry, &Token::new("string", "string")).unwrap();
    let for_set = build_shared_member_creators(&registry, &Token::new("set", "set")).unwrap();

    let from_string = for_string.get("optional").unwrap();
    let from_set = for_set.get("optional").unwrap();
    assert_ne!(from_string, from_set);

    let root = make_root_creator(namespace("z"), Token::new("set", "set")).unwrap();
    let a = from_string.apply(root.create(args![]).unwrap(), args![]).unwrap();
    let b = from_set.apply(root.create(args![]).unwrap(), args![]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn builders_are_shareable_across_threads() {
    let kinds = ValueKinds::compose(&GeneratorConfig::builtin().unwrap(), zodgen::BUILTIN_KINDS).unwrap();
    let expected = {
        let string = kinds.kind("string").unwrap();
        let root = string.create(args![]).unwrap();
        string.t().get("email").unwrap().apply(root, args![]).unwrap()
    };

    let kinds = &kinds;
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let string = kinds.kind("string").unwrap();
                    let root = string.create(args![]).unwrap();
                    string.t().get("email").unwrap().apply(root, args![]).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn literal_targets_are_rejected() {
    let kinds = ValueKinds::builtin().unwrap();
    let trim = kinds.kind("string").unwrap().t().get("trim").unwrap();
    let err = trim.apply(Expr::string("  padded  "), args![]).unwrap_err();
    match err {
        GenError::InvalidTarget { member, reason, .. } => {
            assert_eq!(member, "trim");
            assert_eq!(reason, "chain is not rooted at an identifier");
        }
        other => panic!("expected InvalidTarget, got {other:?}"),
    }
}
