use super::*;
use pretty_assertions::assert_eq;

fn pos(file: &str, line: u32, column: u32) -> Position {
    Position::new(file, line * 100 + column, line, column)
}

#[test]
fn add_appends_in_order() {
    let mut errors = Errors::new();
    errors.add(pos("a", 2, 1), "second line");
    errors.add(pos("a", 1, 1), "first line");
    let msgs: Vec<_> = errors.iter().filter_map(Error::first_message).collect();
    assert_eq!(msgs, vec!["second line", "first line"]);
}

#[test]
fn merge_same_diagnostic_twice_keeps_one_entry() {
    let mut errors = Errors::new();
    let err = Error::new(pos("a", 3, 4), "illegal character");
    errors.merge([err.clone()]);
    errors.merge([err]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.to_string(), "a:3:4: illegal character");
}

#[test]
fn merge_distinct_messages_at_same_position() {
    let mut errors = Errors::new();
    errors.merge([
        Error::new(pos("a", 3, 4), "one"),
        Error::new(pos("a", 3, 4), "two"),
    ]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.iter().next().map(|e| e.children.len()), Some(2));
}

#[test]
fn sort_orders_by_file_line_column_message() {
    let mut errors = Errors::with_config(AggregateConfig::unlimited());
    errors.add(pos("b", 1, 1), "z");
    errors.add(pos("a", 2, 5), "y");
    errors.add(pos("a", 2, 1), "x");
    errors.add(pos("a", 1, 9), "w");
    errors.add(pos("a", 2, 1), "a");
    errors.sort();
    let order: Vec<_> = errors
        .iter()
        .map(|e| (e.pos.filename.as_str(), e.pos.line, e.pos.column, e.first_message()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("a", 1, 9, Some("w")),
            ("a", 2, 1, Some("a")),
            ("a", 2, 1, Some("x")),
            ("a", 2, 5, Some("y")),
            ("b", 1, 1, Some("z")),
        ]
    );
}

#[test]
fn leaves_sort_before_trees_at_same_position() {
    let mut tree = Error::at(pos("a", 1, 1));
    tree.merge([Error::new(pos("a", 9, 9), "aaa")]);

    let mut errors = Errors::new();
    errors.merge([tree]);
    errors.add(pos("a", 1, 1), "zzz");
    errors.sort();
    assert!(!errors.iter().next().is_some_and(Error::is_tree));
}

#[test]
fn remove_multiples_keeps_first_per_line() {
    let mut errors = Errors::new();
    // Five distinct lines plus three duplicates on lines 2, 4 and 5.
    errors.add(pos("a", 5, 3), "e");
    errors.add(pos("a", 2, 8), "dup2");
    errors.add(pos("a", 1, 1), "a");
    errors.add(pos("a", 4, 2), "d");
    errors.add(pos("a", 2, 1), "b");
    errors.add(pos("a", 3, 1), "c");
    errors.add(pos("a", 4, 9), "dup4");
    errors.add(pos("a", 5, 7), "dup5");
    assert_eq!(errors.len(), 8);

    errors.remove_multiples();
    let kept: Vec<_> = errors
        .iter()
        .map(|e| (e.pos.line, e.pos.column, e.first_message()))
        .collect();
    assert_eq!(
        kept,
        vec![
            (1, 1, Some("a")),
            (2, 1, Some("b")),
            (3, 1, Some("c")),
            (4, 2, Some("d")),
            (5, 3, Some("e")),
        ]
    );
}

#[test]
fn remove_multiples_distinguishes_files() {
    let mut errors = Errors::new();
    errors.add(pos("a", 1, 1), "x");
    errors.add(pos("b", 1, 1), "y");
    errors.remove_multiples();
    assert_eq!(errors.len(), 2);
}

#[test]
fn cap_drops_oldest() {
    let mut errors = Errors::new();
    for i in 0..130 {
        errors.add(pos("a", i + 1, 1), format!("m{i}"));
    }
    assert_eq!(errors.len(), 120);
    assert_eq!(errors.iter().next().and_then(Error::first_message), Some("m10"));
}

#[test]
fn unlimited_config_keeps_everything() {
    let mut errors = Errors::with_config(AggregateConfig::unlimited());
    for i in 0..300 {
        errors.add(pos("a", i + 1, 1), "m");
    }
    assert_eq!(errors.len(), 300);
}

#[test]
fn handler_records_reports() {
    let mut errors = Errors::new();
    {
        let mut report = errors.handler();
        report(&pos("a", 1, 2), "first");
        report(&pos("a", 3, 4), "second");
    }
    assert_eq!(errors.len(), 2);
}

#[test]
fn display_and_err() {
    let mut errors = Errors::new();
    assert_eq!(errors.to_string(), "no errors");
    assert!(errors.err().is_ok());

    errors.add(pos("a", 1, 1), "one");
    errors.add(pos("a", 2, 1), "two");
    errors.add(pos("a", 3, 1), "three");
    assert_eq!(errors.to_string(), "a:1:1: one (and 2 more errors)");
    assert!(errors.err().is_err());

    errors.reset();
    assert!(errors.is_empty());
}
