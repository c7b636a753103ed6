use ruletree::{Record, RuleEngine};
use serde_json::json;

fn main() {
    let engine = RuleEngine::new();
    let rule = engine
        .create_rule("(age > 25 AND salary > 30000)")
        .expect("failed to create rule");

    let payloads = [
        json!({ "age": 28, "salary": 45000 }),
        json!({ "age": 28 }),
        json!({ "age": "thirty", "salary": 30000 }),
        json!({ "age": null }),
    ];

    for payload in payloads {
        let outcome = Record::try_from(payload.clone())
            .map_err(ruletree::Error::from)
            .and_then(|record| engine.evaluate_rule(rule, &record));
        match outcome {
            Ok(result) => println!("{payload} -> {result}"),
            Err(err) => println!("{payload} -> error: {err}"),
        }
    }
}
