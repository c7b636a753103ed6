use std::sync::Arc;
use std::thread;

use ruletree::{Record, RuleEngine};

fn main() {
    let engine = Arc::new(RuleEngine::new());
    let eligible = engine
        .create_rule("age >= 18 AND status = 'active'")
        .expect("failed to create rule");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let record = Record::new()
                    .set("age", 16_i64 + i64::from(i))
                    .set("status", "active");
                let result = engine.evaluate_rule(eligible, &record);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    // Writers and readers share the same store.
    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            engine
                .modify_rule(eligible, "age >= 17 AND status = 'active'")
                .expect("failed to modify rule");
        })
    };

    for h in handles {
        h.join().unwrap();
    }
    writer.join().unwrap();

    println!("final: {}", engine.get_rule(eligible).unwrap());
}
