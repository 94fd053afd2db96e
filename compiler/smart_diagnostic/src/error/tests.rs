use super::*;
use pretty_assertions::assert_eq;

fn pos(line: u32, column: u32) -> Position {
    Position::new("build.smart", line * 100 + column, line, column)
}

#[test]
fn new_error_has_one_leaf() {
    let err = Error::new(pos(1, 2), "boom");
    assert_eq!(err.children, vec![Diag::Leaf("boom".into())]);
    assert!(!err.is_tree());
    assert_eq!(err.first_message(), Some("boom"));
}

#[test]
fn leaf_merge_dedups_by_message() {
    let mut err = Error::new(pos(1, 1), "a");
    err.merge(["a", "b", "a"]);
    assert_eq!(
        err.children,
        vec![Diag::Leaf("a".into()), Diag::Leaf("b".into())]
    );
}

#[test]
fn merging_same_tree_twice_is_idempotent() {
    let mut root = Error::at(pos(1, 1));
    let child = Error::new(pos(2, 3), "undefined: foo");
    root.merge([child.clone()]);
    root.merge([child]);
    assert_eq!(root.children.len(), 1);
    assert_eq!(
        root.to_string(),
        "build.smart:2:3: undefined: foo\nbuild.smart:1:1: ...from here"
    );
}

#[test]
fn tree_at_existing_position_merges_into_child() {
    let mut root = Error::at(pos(1, 1));
    root.merge([Error::new(pos(2, 1), "first")]);
    root.merge([Error::new(pos(2, 1), "second")]);

    assert_eq!(root.children.len(), 1);
    let Diag::Node(child) = &root.children[0] else {
        panic!("expected a node child");
    };
    assert_eq!(
        child.children,
        vec![Diag::Leaf("first".into()), Diag::Leaf("second".into())]
    );
}

#[test]
fn nested_merge_descends_iteratively() {
    let mut deep = Error::new(pos(9, 9), "leaf");
    for line in (2..9).rev() {
        let mut parent = Error::at(pos(line, 1));
        parent.children.push(Diag::Node(deep));
        deep = parent;
    }
    let mut root = Error::at(pos(1, 1));
    root.merge([deep.clone()]);
    root.merge([deep]);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.first_message(), Some("leaf"));

    let mut node = &root;
    let mut depth = 0;
    while let Some(Diag::Node(child)) = node.children.first() {
        assert_eq!(node.children.len(), 1);
        node = child;
        depth += 1;
    }
    assert_eq!(depth, 8);
    assert_eq!(node.children, vec![Diag::Leaf("leaf".into())]);
}

#[test]
fn appended_tree_replaces_children_it_carries() {
    let mut root = Error::at(pos(1, 1));
    root.merge([Error::new(pos(3, 1), "old")]);

    let mut wider = Error::at(pos(2, 1));
    wider.children.push(Diag::Node(Error::new(pos(3, 1), "old")));
    root.merge([wider]);

    assert_eq!(root.children.len(), 1);
    let Diag::Node(child) = &root.children[0] else {
        panic!("expected a node child");
    };
    assert_eq!(child.pos, pos(2, 1));
}

#[test]
fn children_are_capped_dropping_oldest() {
    let mut err = Error::at(pos(1, 1));
    let msgs: Vec<String> = (0..10).map(|i| format!("m{i}")).collect();
    err.merge_with_limit(msgs, 4);
    assert_eq!(err.children.len(), 4);
    assert_eq!(err.first_message(), Some("m6"));
}

#[test]
fn default_cap_is_120() {
    let mut err = Error::at(pos(1, 1));
    err.merge((0..200).map(|i| format!("m{i}")));
    assert_eq!(err.children.len(), DEFAULT_LIMIT);
}

#[test]
fn single_leaf_rendering() {
    assert_eq!(Error::new(pos(4, 7), "bad").to_string(), "build.smart:4:7: bad");
    assert_eq!(Error::new(Position::default(), "bad").to_string(), "bad");
}

#[test]
fn multiple_leaves_render_one_per_line() {
    let mut err = Error::new(pos(1, 2), "a");
    err.merge(["b"]);
    assert_eq!(
        err.to_string(),
        "build.smart:1:2: a\nbuild.smart:1:2: b\nbuild.smart:1:2: ...from here"
    );
}

#[test]
fn multiple_leaves_without_position_have_no_provenance() {
    let mut err = Error::new(Position::default(), "a");
    err.merge(["b"]);
    assert_eq!(err.to_string(), "a\nb");
}

#[test]
fn multiple_children_with_tree_end_with_provenance() {
    let mut err = Error::new(pos(1, 2), "a");
    err.merge([Error::new(pos(5, 1), "b")]);
    assert_eq!(
        err.to_string(),
        "build.smart:1:2: a\nbuild.smart:5:1: b\nbuild.smart:1:2: ...from here"
    );
}

#[test]
fn brief_shows_first_child_and_count() {
    let mut err = Error::new(pos(1, 1), "a");
    err.merge(["b", "c"]);
    assert_eq!(err.brief(), "build.smart:1:1: a (and 2 more)");
    assert_eq!(Error::new(pos(1, 1), "a").brief(), "build.smart:1:1: a");
}

#[test]
fn find_only_matches_direct_node_children() {
    let mut root = Error::new(pos(1, 1), "leaf");
    root.merge([Error::new(pos(2, 1), "x")]);
    assert_eq!(root.find(&pos(2, 1)), Some(1));
    assert_eq!(root.find(&pos(1, 1)), None);
    assert_eq!(root.find(&pos(3, 1)), None);
}
