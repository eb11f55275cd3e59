use std::io::Write;
use tractorbot_context::{classify, ContextTable, PromptBuilder};

const CONTEXTS: &str = include_str!("../../../data/contexts.txt");

fn table() -> ContextTable {
    ContextTable::parse(CONTEXTS).unwrap()
}

#[test]
fn test_bundled_table_loads_with_general_last() {
    let table = table();
    assert_eq!(table.len(), 7);
    assert_eq!(table.iter().last().unwrap().name, "General");
    assert!(table.general().triggers.iter().all(|t| t == "*"));
}

#[test]
fn test_typical_questions() {
    let table = table();
    let cases = [
        ("Where is the closest showroom?", "Dealership"),
        ("My DI 650 needs repair", "Product Information"),
        ("I need a new battery", "Spare Parts"),
        ("When will my delivery arrive", "Order Status"),
        ("is there a subsidy available", "Pricing"),
        ("good morning", "General"),
    ];
    for (message, expected) in cases {
        assert_eq!(classify(&table, message).name, expected, "message: {}", message);
    }
}

#[test]
fn test_misspelled_trigger_uses_fuzzy_match() {
    assert_eq!(classify(&table(), "where is the nearest delaer").name, "Dealership");
}

#[test]
fn test_load_from_disk_and_render_prompt() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[Service]\ndescription = Repairs\ntriggers = repair\nactions = book\n").unwrap();

    let table = ContextTable::load(file.path()).unwrap();
    let ctx = classify(&table, "Repair please");
    assert_eq!(ctx.name, "Service");

    let prompt = PromptBuilder::default().render(ctx, &["Service every 250 hours"]);
    assert!(prompt.contains("Current context: Service - Repairs"));
    assert!(prompt.contains("Actions available in this context: book"));
}
