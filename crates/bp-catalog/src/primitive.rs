//! Primitive patterns the catalog is assembled from.
//!
//! Every primitive takes a `name`: the constant label it serializes to. An
//! empty name keeps the default label, the extracted value's text.

use std::collections::{HashMap, HashSet};

use bp_core::{Pattern, PatternCombinator, PatternFactory, Value};

use crate::text::{char_at, char_index, is_decimal as decimal, split_chars};

/// Digit-class labels for 1 through 5 digit numbers.
const UPPER_BOUNDS: [&str; 5] = ["9", "99", "999", "10K", "100K"];

/// Splits the input after `at` characters into a `(head, tail)` tuple.
pub fn split_at(at: usize, name: &str) -> Pattern {
    PatternFactory::new()
        .serialize(name)
        .map(move |s| {
            let (head, tail) = split_chars(s, at);
            Some(Value::Tuple(vec![head.into(), tail.into()]))
        })
        .create()
}

/// Matches members of a fixed set of strings.
pub fn string_set<I, S>(strings: I, name: &str) -> Pattern
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: HashSet<String> = strings.into_iter().map(Into::into).collect();
    PatternFactory::new()
        .serialize(name)
        .map(move |s| set.contains(s).then_some(Value::Bool(true)))
        .create()
}

pub fn is_decimal(name: &str) -> Pattern {
    PatternFactory::new()
        .serialize(name)
        .predicate(|v| decimal(&v.text()))
        .create()
}

/// Decimal string of exactly `digits` digits.
pub fn number_of_digit(digits: usize, name: &str) -> Pattern {
    let exact = PatternFactory::new()
        .serialize(name)
        .predicate(move |v| v.text().chars().count() == digits)
        .create();
    is_decimal("").chain(move |_, _| exact.clone())
}

/// Letter shape of the input: the first distinct character becomes `A`,
/// the next `B`, and so on, positions preserved ("1122" → "AABB").
///
/// With `group` set, only inputs of exactly that shape match.
pub fn character_group(group: Option<&str>, name: &str) -> Pattern {
    let group = group.map(str::to_owned);
    PatternFactory::new()
        .serialize(name)
        .map(move |s| {
            let shape = shape_of(s);
            match &group {
                Some(wanted) if *wanted != shape => None,
                _ => Some(Value::Str(shape)),
            }
        })
        .create()
}

fn shape_of(s: &str) -> String {
    let mut shape = vec!['\0'; s.chars().count()];
    for (i, (_, positions)) in char_index(s).into_iter().enumerate() {
        let letter = char::from_u32('A' as u32 + i as u32).unwrap_or('?');
        for j in positions {
            shape[j] = letter;
        }
    }
    shape.into_iter().collect()
}

/// Decimal number within `[min, max]`. Extracts the number.
pub fn number_range(min: f64, max: f64, name: &str) -> Pattern {
    let bounded = PatternFactory::new()
        .map(|s| s.parse::<f64>().ok().map(Value::Num))
        .predicate(move |v| v.as_number().is_some_and(|n| min <= n && n <= max))
        .serialize(name)
        .create();
    is_decimal("").chain(move |_, _| bounded.clone())
}

/// Character at `index` (negative counts from the end) equals `value`.
pub fn value_at(value: char, index: isize, name: &str) -> Pattern {
    PatternFactory::new()
        .predicate(move |v| char_at(&v.text(), index) == Some(value))
        .serialize(name)
        .create()
}

pub fn prefix(prefix: &str, name: &str) -> PatternCombinator {
    PatternCombinator::all(
        prefix
            .chars()
            .enumerate()
            .map(|(i, c)| value_at(c, i as isize, "")),
    )
    .named(name)
}

pub fn suffix(suffix: &str, name: &str) -> PatternCombinator {
    PatternCombinator::all(
        suffix
            .chars()
            .rev()
            .enumerate()
            .map(|(i, c)| value_at(c, -(i as isize) - 1, "")),
    )
    .named(name)
}

/// Translates every character through `table`; fails if any is unmapped.
pub fn map_string(table: &[(char, char)], name: &str) -> Pattern {
    let table: HashMap<char, char> = table.iter().copied().collect();
    PatternFactory::new()
        .map(move |s| {
            s.chars()
                .map(|c| table.get(&c).copied())
                .collect::<Option<String>>()
                .map(Value::Str)
        })
        .serialize(name)
        .create()
}

/// Digit-class label (`9`, `99`, `999`, `10K`, `100K`) of a decimal of
/// `start_digit` to 5 digits.
pub fn number_upper_bound(start_digit: usize, name: &str) -> Pattern {
    PatternFactory::new()
        .serialize(name)
        .map(move |s| {
            let len = s.chars().count();
            if !decimal(s) || len < start_digit.max(1) {
                return None;
            }
            UPPER_BOUNDS.get(len - 1).map(|bound| Value::from(*bound))
        })
        .create()
}

/// Decimal `n` with `min <= n <= max` and `(n - min)` a multiple of `step`.
pub fn arithmetic_sequence(min: f64, max: f64, step: f64, name: &str) -> Pattern {
    let member = PatternFactory::new()
        .serialize(name)
        .predicate(move |v| {
            v.text().parse::<f64>().is_ok_and(|n| {
                min <= n && n <= max && (n - min) % step == 0.0
            })
        })
        .create();
    is_decimal("").chain(move |_, _| member.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{ARABIC, CN};

    #[test]
    fn test_split_at() {
        let p = split_at(2, "");
        assert_eq!(
            p.exec("0x1f"),
            Some(Value::Tuple(vec!["0x".into(), "1f".into()]))
        );
        assert_eq!(p.serialize("0x1f").as_deref(), Some("0x,1f"));
    }

    #[test]
    fn test_string_set() {
        let p = string_set(["°", "℃"], "Degree");
        assert!(p.test("°"));
        assert!(!p.test("x"));
        assert_eq!(p.serialize("°").as_deref(), Some("Degree"));
    }

    #[test]
    fn test_number_of_digit() {
        let four = number_of_digit(4, "");
        assert!(four.test("1234"));
        assert!(!four.test("123"));
        assert!(!four.test("12a4"));
        assert!(!four.test(""));
        assert_eq!(four.serialize("1234").as_deref(), Some("1234"));
        assert_eq!(number_of_digit(4, "4D").serialize("0000").as_deref(), Some("4D"));
    }

    #[test]
    fn test_character_group_shapes() {
        let p = character_group(None, "");
        assert_eq!(p.serialize("1122").as_deref(), Some("AABB"));
        assert_eq!(p.serialize("1212").as_deref(), Some("ABAB"));
        assert_eq!(p.serialize("2111").as_deref(), Some("ABBB"));
        assert_eq!(p.serialize(""), None);
    }

    #[test]
    fn test_character_group_fixed() {
        let p = character_group(Some("AABB"), "");
        assert!(p.test("5566"));
        assert!(!p.test("1234"));
        assert!(!p.test("1212"));
    }

    #[test]
    fn test_number_range() {
        let p = number_range(0.0, 999.0, "");
        assert!(p.test("999"));
        assert!(p.test("000"));
        assert!(!p.test("1000"));
        assert!(!p.test("-1"));
        assert_eq!(p.exec("042"), Some(Value::Num(42.0)));
    }

    #[test]
    fn test_value_at() {
        assert!(value_at('0', 0, "").test("0123"));
        assert!(value_at('3', -1, "").test("0123"));
        assert!(!value_at('0', 5, "").test("0123"));
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert!(prefix("00", "").test("0012"));
        assert!(!prefix("00", "").test("0102"));
        assert!(suffix("69", "").test("1269"));
        assert!(!suffix("69", "").test("1296"));
        assert_eq!(suffix("420", "XX420").serialize("12420").as_deref(), Some("XX420"));
    }

    #[test]
    fn test_map_string() {
        let cn = map_string(CN, "CN");
        assert_eq!(cn.exec("一二三"), Some(Value::from("123")));
        assert_eq!(cn.exec("一2三"), None);
        assert_eq!(cn.serialize("九九九").as_deref(), Some("CN"));
        assert_eq!(map_string(ARABIC, "").exec("١٢"), Some(Value::from("12")));
    }

    #[test]
    fn test_number_upper_bound() {
        let p = number_upper_bound(1, "");
        assert_eq!(p.serialize("7").as_deref(), Some("9"));
        assert_eq!(p.serialize("123").as_deref(), Some("999"));
        assert_eq!(p.serialize("1234").as_deref(), Some("10K"));
        assert_eq!(p.serialize("12345").as_deref(), Some("100K"));
        assert_eq!(p.serialize("123456"), None);
        assert_eq!(p.serialize("12a"), None);

        let from_three = number_upper_bound(3, "");
        assert_eq!(from_three.serialize("12"), None);
        assert_eq!(from_three.serialize("123").as_deref(), Some("999"));
    }

    #[test]
    fn test_arithmetic_sequence() {
        let p = arithmetic_sequence(10000.0, 9990000.0, 10000.0, "WanClub");
        assert!(p.test("20000"));
        assert!(!p.test("25000"));
        assert!(!p.test("9999"));
        assert!(!p.test("10000000"));
        assert_eq!(p.serialize("9990000").as_deref(), Some("WanClub"));
    }
}
