use ruletree::parse::ParseErrorKind;
use ruletree::{field, Error, EvaluationErrorKind, Record, RuleEngine, RuleId, ValueKind};

fn parse_kind(err: Error) -> ParseErrorKind {
    match err {
        Error::Parse(err) => err.kind().clone(),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn create_and_evaluate_the_sample_rule() {
    let engine = RuleEngine::new();
    let id = engine
        .create_rule("(age > 30 AND department = 'Sales')")
        .unwrap();

    let record = Record::new().set("age", 35_i64).set("department", "Sales");
    assert_eq!(engine.evaluate_rule(id, &record), Ok(true));
}

#[test]
fn missing_operator_is_rejected() {
    let engine = RuleEngine::new();
    let err = engine
        .create_rule("(age > 30 AND department 'Sales')")
        .unwrap_err();
    match parse_kind(err) {
        ParseErrorKind::MissingOperator { field, .. } => assert_eq!(field, "department"),
        other => panic!("expected MissingOperator, got {other:?}"),
    }
    assert!(engine.store().is_empty());
}

#[test]
fn empty_rule_is_rejected() {
    let engine = RuleEngine::new();
    let err = engine.create_rule("").unwrap_err();
    match err {
        Error::Parse(err) => {
            assert_eq!(err.position(), 0);
            assert_eq!(err.kind(), &ParseErrorKind::EmptyInput);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn whitespace_only_rule_is_empty() {
    let engine = RuleEngine::new();
    let err = engine.create_rule("   \t ").unwrap_err();
    assert_eq!(parse_kind(err), ParseErrorKind::EmptyInput);
}

#[test]
fn missing_field_in_record() {
    let engine = RuleEngine::new();
    let id = engine.create_rule("(age > 25 AND salary > 30000)").unwrap();

    let err = engine
        .evaluate_rule(id, &Record::new().set("age", 28_i64))
        .unwrap_err();
    match err {
        Error::Evaluation(err) => {
            assert_eq!(err.kind, EvaluationErrorKind::MissingField);
            assert_eq!(err.field, "salary");
        }
        other => panic!("expected an evaluation error, got {other:?}"),
    }
}

#[test]
fn combine_unknown_ids_allocates_nothing() {
    let engine = RuleEngine::new();
    let r1 = engine.create_rule("age > 1").unwrap();

    assert_eq!(
        engine.combine_rules(&[RuleId(999), RuleId(1000)]),
        Err(Error::NotFound { id: RuleId(999) })
    );
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.store().next_id(), RuleId(r1.0 + 1));
}

#[test]
fn string_where_number_expected() {
    let engine = RuleEngine::new();
    let id = engine.create_rule("(age > 25 AND salary > 30000)").unwrap();

    let record = Record::new().set("age", "thirty").set("salary", 30_000_i64);
    match engine.evaluate_rule(id, &record).unwrap_err() {
        Error::Evaluation(err) => {
            assert_eq!(err.field, "age");
            assert_eq!(
                err.kind,
                EvaluationErrorKind::TypeMismatch {
                    expected: ValueKind::Number,
                    found: ValueKind::String,
                }
            );
        }
        other => panic!("expected an evaluation error, got {other:?}"),
    }
}

#[test]
fn combine_empty_list() {
    let engine = RuleEngine::new();
    assert!(matches!(
        engine.combine_rules(&[]),
        Err(Error::InvalidInput { .. })
    ));
    assert!(engine.store().is_empty());
    assert_eq!(engine.store().next_id(), RuleId(1));
}

#[test]
fn combine_keeps_duplicates() {
    let engine = RuleEngine::new();
    let r1 = engine.create_rule("(age > 20)").unwrap();
    let r2 = engine.create_rule("(salary > 30000)").unwrap();

    let combined = engine.combine_rules(&[r1, r1, r2]).unwrap();
    assert_ne!(combined, r1);
    assert_ne!(combined, r2);

    let rule = engine.get_rule(combined).unwrap();
    let expected = field("age")
        .gt(20_i64)
        .and(field("age").gt(20_i64))
        .and(field("salary").gt(30_000_i64));
    assert_eq!(rule.condition, expected);
    assert_eq!(rule.condition.leaf_count(), 3);

    let pass = Record::new().set("age", 25_i64).set("salary", 40_000_i64);
    let fail = Record::new().set("age", 25_i64).set("salary", 20_000_i64);
    assert_eq!(engine.evaluate_rule(combined, &pass), Ok(true));
    assert_eq!(engine.evaluate_rule(combined, &fail), Ok(false));
}

#[test]
fn modify_unknown_rule() {
    let engine = RuleEngine::new();
    assert_eq!(
        engine.modify_rule(RuleId(9999), "age > 40"),
        Err(Error::NotFound { id: RuleId(9999) })
    );
    assert!(engine.store().is_empty());
}

#[test]
fn modify_with_empty_text_keeps_rule() {
    let engine = RuleEngine::new();
    let r1 = engine.create_rule("(age > 20)").unwrap();

    let err = engine.modify_rule(r1, "").unwrap_err();
    assert_eq!(parse_kind(err), ParseErrorKind::EmptyInput);

    let rule = engine.get_rule(r1).unwrap();
    assert_eq!(rule.source, "(age > 20)");
    assert_eq!(rule.condition, field("age").gt(20_i64));
}

#[test]
fn modify_with_lex_error_keeps_rule() {
    let engine = RuleEngine::new();
    let r1 = engine.create_rule("age > 20").unwrap();
    assert!(matches!(
        engine.modify_rule(r1, "age > 20 & x = 1"),
        Err(Error::Lex(_))
    ));
    assert_eq!(engine.get_rule(r1).unwrap().source, "age > 20");
}

#[test]
fn nan_record_values() {
    let engine = RuleEngine::new();
    let eq = engine.create_rule("score = 1.5").unwrap();
    let neq = engine.create_rule("score != 1.5").unwrap();
    let gt = engine.create_rule("score > 1.5").unwrap();

    let record = Record::new().set("score", f64::NAN);
    assert_eq!(engine.evaluate_rule(eq, &record), Ok(false));
    assert_eq!(engine.evaluate_rule(neq, &record), Ok(true));
    assert_eq!(engine.evaluate_rule(gt, &record), Ok(false));
}

#[test]
fn large_integers_compare_exactly() {
    let engine = RuleEngine::new();
    let id = engine.create_rule("n > 9007199254740992").unwrap();
    let record = Record::new().set("n", 9_007_199_254_740_993_i64);
    assert_eq!(engine.evaluate_rule(id, &record), Ok(true));
}

#[test]
fn negative_and_decimal_literals() {
    let engine = RuleEngine::new();
    let id = engine.create_rule("balance >= -10.5 AND balance < 0").unwrap();
    assert_eq!(
        engine.evaluate_rule(id, &Record::new().set("balance", -3_i64)),
        Ok(true)
    );
    assert_eq!(
        engine.evaluate_rule(id, &Record::new().set("balance", -11_i64)),
        Ok(false)
    );
}

#[test]
fn and_binds_tighter_than_or() {
    let engine = RuleEngine::new();
    let id = engine.create_rule("a = 1 OR b = 1 AND c = 1").unwrap();
    let record = Record::new().set("a", 1_i64).set("b", 0_i64).set("c", 0_i64);
    assert_eq!(engine.evaluate_rule(id, &record), Ok(true));

    let grouped = engine.create_rule("(a = 1 OR b = 1) AND c = 1").unwrap();
    assert_eq!(engine.evaluate_rule(grouped, &record), Ok(false));
}

#[test]
fn deep_nesting_is_rejected_not_overflowed() {
    let engine = RuleEngine::new();
    let text = format!("{}a = 1{}", "(".repeat(500), ")".repeat(500));
    let err = engine.create_rule(&text).unwrap_err();
    assert!(matches!(parse_kind(err), ParseErrorKind::TooDeep { .. }));
}

#[test]
fn long_chains_render_and_reparse() {
    let engine = RuleEngine::new();
    for leaves in [70, 400] {
        let text = vec!["a = 1"; leaves].join(" AND ");
        let id = engine.create_rule(&text).unwrap();
        let rule = engine.get_rule(id).unwrap();
        let rendered = rule.condition.to_string();
        assert_eq!(rendered, text);
        assert_eq!(ruletree::parse::parse(&rendered), Ok(rule.condition.clone()));
    }
}

#[test]
fn mixed_chain_renders_within_the_nesting_limit() {
    let text = (0..200)
        .map(|i| format!("f{i} = {i}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    let text = format!("({text}) AND x = 1 AND y = 2");
    let condition = ruletree::parse::parse(&text).unwrap();
    assert_eq!(ruletree::parse::parse(&condition.to_string()), Ok(condition));
}

#[test]
fn oversized_chain_is_rejected_not_overflowed() {
    let text = ["a = 1"; 300_000].join(" AND ");
    let err = ruletree::parse::parse(&text).unwrap_err();
    assert!(matches!(parse_kind(err), ParseErrorKind::TreeTooDeep { limit: 512 }));
}

#[test]
fn chain_at_the_tree_limit_evaluates() {
    let text = ["a = 1"; 512].join(" AND ");
    let condition = ruletree::parse::parse(&text).unwrap();
    assert_eq!(condition.depth(), 512);
    assert_eq!(condition.evaluate(&Record::new().set("a", 1_i64)), Ok(true));

    let over = ["a = 1"; 513].join(" AND ");
    assert!(ruletree::parse::parse(&over).is_err());
}

#[test]
fn combining_combined_rules_keeps_sources_parseable() {
    let engine = RuleEngine::new();
    let base = engine.create_rule("a = 1").unwrap();
    let mut current = base;
    let err = loop {
        match engine.combine_rules(&[current, base]) {
            Ok(id) => current = id,
            Err(err) => break err,
        }
    };
    assert!(matches!(err, Error::InvalidInput { .. }));

    for id in engine.store().ids() {
        let rule = engine.get_rule(id).unwrap();
        assert_eq!(
            ruletree::parse::parse(&rule.source),
            Ok(rule.condition.clone()),
            "source of rule {id}"
        );
    }
}
