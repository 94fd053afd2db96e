use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kind(src: &str) -> Option<(Token, usize)> {
    recognize(src.as_bytes()).map(|t| (t.tok, t.len))
}

fn errors(src: &str) -> Vec<&'static str> {
    recognize(src.as_bytes())
        .map(|t| t.errors.iter().map(|&(_, msg)| msg).collect())
        .unwrap_or_default()
}

#[test]
fn dates_times_and_datetimes() {
    assert_eq!(kind("2006-01-02"), Some((Token::Date, 10)));
    assert_eq!(kind("15:04:05"), Some((Token::Time, 8)));
    assert_eq!(kind("15:04:05.999 x"), Some((Token::Time, 12)));
    assert_eq!(kind("2006-01-02T15:04:05Z"), Some((Token::DateTime, 20)));
    assert_eq!(kind("2006-01-02t15:04:05z"), Some((Token::DateTime, 20)));
    assert_eq!(kind("2006-01-02T15:04:05-07:00"), Some((Token::DateTime, 25)));
    assert_eq!(kind("2006-01-02T15:04:05.5+01:30"), Some((Token::DateTime, 27)));
    assert_eq!(kind("2006-01-02T15:04:05"), Some((Token::DateTime, 19)));
}

#[test]
fn terminators() {
    for term in [" ", "\t", "\n", "\r", "(", ")", "{", "}", "$", "#", "\\"] {
        let src = format!("2006-01-02{term}");
        assert_eq!(kind(&src), Some((Token::Date, 10)), "{term:?}");
    }
    assert_eq!(kind("2006-01-02,"), None);
    assert_eq!(kind("2006-01-02x"), None);
    assert_eq!(kind("15:04:05Z"), None);
}

#[test]
fn shape_mismatch_falls_back() {
    assert_eq!(kind("12345678"), None);
    assert_eq!(kind("1234"), None);
    assert_eq!(kind("2006-1-02 "), None);
    assert_eq!(kind("2006-01-02T15:04"), None);
    assert_eq!(kind("a006-01-02"), None);
    assert_eq!(kind("15:04:5x"), None);
}

#[test]
fn out_of_range_fields_are_reported() {
    assert_eq!(kind("2006-13-02"), Some((Token::Date, 10)));
    assert_eq!(errors("2006-13-02"), vec!["invalid month"]);
    assert_eq!(errors("2006-00-02"), vec!["invalid month"]);
    assert_eq!(errors("2006-01-42"), vec!["invalid day"]);
    assert_eq!(errors("24:00:00"), vec!["invalid hour"]);
    assert_eq!(errors("23:60:61"), vec!["invalid minute", "invalid second"]);
    assert_eq!(errors("2006-01-02T10:00:00+24:00"), vec!["invalid time zone hour"]);
    assert!(errors("2006-02-31").is_empty());
}

#[test]
fn error_offsets_point_at_the_field() {
    let t = recognize(b"2006-01-02T25:00:00Z");
    assert_eq!(t.map(|t| t.errors.to_vec()), Some(vec![(11, "invalid hour")]));
}

proptest! {
    #[test]
    fn valid_rfc3339_datetimes(
        y in 0u32..10_000,
        mo in 1u32..=12,
        d in 1u32..=28,
        h in 0u32..24,
        mi in 0u32..60,
        s in 0u32..60,
        zone in prop::sample::select(vec!["Z", "z", "+01:00", "-07:30", ""]),
    ) {
        let src = format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}{zone}");
        let t = recognize(src.as_bytes());
        prop_assert_eq!(t.as_ref().map(|t| (t.tok, t.len)), Some((Token::DateTime, src.len())));
        prop_assert!(t.is_some_and(|t| t.errors.is_empty()));
    }

    #[test]
    fn plain_integers_are_not_temporal(n in 0u64..u64::MAX) {
        prop_assert_eq!(kind(&n.to_string()), None);
    }
}
