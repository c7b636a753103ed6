//! Walks through the rule service's edge cases end to end.
//!
//! Run with `RUST_LOG=ruletree=debug cargo run --example harness` to see the
//! store's log events alongside the output.

use ruletree::{Error, Record, RuleEngine, RuleId};

fn report<T: std::fmt::Debug>(case: &str, outcome: Result<T, Error>) {
    match outcome {
        Ok(value) => println!("{case:<44} ok: {value:?}"),
        Err(err) => println!("{case:<44} error: {err}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ruletree=info")),
        )
        .init();

    let engine = RuleEngine::new();

    let r1 = engine.create_rule("(age > 20)")?;
    let r2 = engine.create_rule("(salary > 30000)")?;
    let sample = engine.create_rule("(age > 25 AND salary > 30000)")?;

    report(
        "missing operator",
        engine.create_rule("(age > 30 AND department 'Sales')"),
    );
    report("empty rule", engine.create_rule(""));
    report(
        "missing field",
        engine.evaluate_rule(sample, &Record::new().set("age", 28_i64)),
    );
    report(
        "combine unknown ids",
        engine.combine_rules(&[RuleId(999), RuleId(1000)]),
    );
    report(
        "type mismatch",
        engine.evaluate_rule(
            sample,
            &Record::new().set("age", "thirty").set("salary", 30_000_i64),
        ),
    );
    report("combine nothing", engine.combine_rules(&[]));

    let combined = engine.combine_rules(&[r1, r1, r2])?;
    report("combine with duplicates", engine.get_rule(combined).map(|r| r.source.clone()));

    report("modify unknown rule", engine.modify_rule(RuleId(9999), "age > 40"));
    report("modify with empty text", engine.modify_rule(r1, ""));
    report("rule after failed modify", engine.get_rule(r1).map(|r| r.source.clone()));

    println!("{}", engine.store());
    Ok(())
}
