use ruletree::{field, Record, RuleEngine};

fn main() {
    let engine = RuleEngine::new();

    // Rules from text
    let senior = engine
        .create_rule("(age > 30 AND department = 'Sales')")
        .expect("failed to create rule");
    let well_paid = engine
        .create_rule("salary >= 50000")
        .expect("failed to create rule");
    let both = engine
        .combine_rules(&[senior, well_paid])
        .expect("failed to combine rules");

    for id in engine.store().ids() {
        println!("{}", engine.get_rule(id).expect("rule was just listed"));
    }

    let record = Record::new()
        .set("age", 35_i64)
        .set("department", "Sales")
        .set("salary", 42_000_i64);

    for id in [senior, well_paid, both] {
        match engine.evaluate_rule(id, &record) {
            Ok(result) => println!("rule {id}: {result}"),
            Err(err) => println!("rule {id}: error: {err}"),
        }
    }

    // The same condition built in code
    let built = field("age").gt(30_i64).and(field("department").eq("Sales"));
    println!("built: {built} -> {:?}", built.evaluate(&record));
}
