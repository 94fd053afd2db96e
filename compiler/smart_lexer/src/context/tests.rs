use super::*;
use pretty_assertions::assert_eq;

#[test]
fn push_keeps_only_inherited_bits() {
    let mut stack = ContextStack::new(
        Context::FIRST_OF_LINE | Context::CAN_BE_RECIPES | Context::CAN_BE_RECIPE_TAB,
    );
    stack.push(Context::COMPOUND_STRING);
    assert_eq!(
        stack.current(),
        Context::COMPOUND_STRING | Context::CAN_BE_RECIPES
    );
    assert_eq!(stack.depth(), 1);
}

#[test]
fn pop_restores_saved_context() {
    let initial = Context::FIRST_OF_LINE | Context::CAN_BE_RECIPE_TAB;
    let mut stack = ContextStack::new(initial);
    stack.push(Context::COMPOUND_STRING);
    stack.push(Context::CALL_PAREN);
    assert_eq!(stack.peek(), Some(Context::COMPOUND_STRING));

    assert!(stack.pop(Context::CALL_PAREN));
    assert_eq!(stack.current(), Context::COMPOUND_STRING);
    assert!(stack.pop(Context::COMPOUND_STRING));
    assert_eq!(stack.current(), initial);
    assert_eq!(stack.depth(), 0);
}

#[test]
fn pop_of_unset_bit_is_a_no_op() {
    let mut stack = ContextStack::new(Context::empty());
    stack.push(Context::CALL_BRACE);
    assert!(!stack.pop(Context::CALL_PAREN));
    assert_eq!(stack.current(), Context::CALL_BRACE);
    assert_eq!(stack.depth(), 1);
}

#[test]
fn pop_at_top_level_never_underflows() {
    let mut stack = ContextStack::new(Context::COMPOUND_LINE | Context::COMMENTS_OFF);
    assert!(stack.pop(Context::COMPOUND_LINE));
    assert_eq!(stack.current(), Context::COMMENTS_OFF);
    assert!(!stack.pop(Context::COMPOUND_LINE));
}

#[test]
fn replace_flips_colon_state() {
    let mut stack = ContextStack::new(Context::empty());
    stack.push(Context::CALL_COLON_L);
    stack.replace(Context::CALL_COLON_L, Context::CALL_COLON_R);
    assert_eq!(stack.current(), Context::CALL_COLON_R);
    assert_eq!(stack.depth(), 1);
    assert!(stack.pop(Context::CALL_COLON));
    assert_eq!(stack.depth(), 0);
}

#[test]
fn set_inherited_reaches_every_level() {
    let mut stack = ContextStack::new(Context::empty());
    stack.push(Context::CALL_PAREN);
    stack.set_inherited(Context::CAN_BE_RECIPES | Context::FIRST_OF_LINE, true);
    assert_eq!(stack.current(), Context::CALL_PAREN | Context::CAN_BE_RECIPES);
    stack.pop(Context::CALL_PAREN);
    assert_eq!(stack.current(), Context::CAN_BE_RECIPES);
}

#[test]
fn deep_nesting_spills_past_inline_capacity() {
    let mut stack = ContextStack::new(Context::empty());
    for _ in 0..32 {
        stack.push(Context::COMPOUND_GROUP);
    }
    assert_eq!(stack.depth(), 32);
    for _ in 0..32 {
        assert!(stack.pop(Context::COMPOUND_GROUP));
    }
    assert_eq!(stack.current(), Context::empty());
}
