//! The named patterns a `.bit` name is classified against.

use std::sync::Arc;

use bp_core::{Pattern, PatternCombinator, PatternFactory, Value};

use crate::calendar;
use crate::primitive::{
    arithmetic_sequence, character_group, map_string, number_of_digit, number_range,
    number_upper_bound, prefix, split_at, string_set, suffix, value_at,
};
use crate::text::is_lower_hex;
use crate::translate::{ARABIC, CN, FLAGS, JP};

/// A catalog entry: one pattern, or a group of related patterns.
#[derive(Clone, Debug)]
pub struct Entry {
    pub name: &'static str,
    pub patterns: Vec<Pattern>,
}

impl Entry {
    fn single(name: &'static str, pattern: Pattern) -> Self {
        Self {
            name,
            patterns: vec![pattern],
        }
    }
}

/// Every catalog entry, in declaration order.
pub fn catalog() -> Vec<Entry> {
    vec![
        Entry::single("DigitCharacterGroup", digit_character_group()),
        Entry::single("NumberUpperBound", number_upper_bound(1, "")),
        Entry::single("Degree360", degree_360()),
        Entry::single("DecimalWith0x", decimal_with_0x()),
        Entry::single("CNNumber", cn_number()),
        Entry::single("JPNumber", jp_number()),
        Entry::single("ArabicNumber", arabic_number()),
        Entry::single("FlagNumber", flag_number()),
        Entry {
            name: "X",
            patterns: digit_positions(),
        },
        Entry::single("TimesTable", times_table()),
        Entry::single("MMDD", mmdd(calendar::current_year)),
        Entry::single("AShareCode", ashare_code()),
        Entry::single("WanClub", wan_club()),
        Entry::single("Hex", hex()),
    ]
}

/// Names of all catalog entries.
pub fn entry_names() -> Vec<&'static str> {
    catalog().into_iter().map(|e| e.name).collect()
}

/// 3 to 8 digits, labelled by letter shape ("ABC", "AABB", ...).
pub fn digit_character_group() -> Pattern {
    let digits = PatternCombinator::any((3..=8).map(|n| number_of_digit(n, "")));
    PatternCombinator::all([digits.into(), character_group(None, "")])
        .select(|results| results.get(1).cloned().flatten())
        .into()
}

/// Exactly three digits, labelled "999".
fn three_digits() -> Pattern {
    PatternCombinator::all([number_range(0.0, 999.0, ""), number_of_digit(3, "")])
        .named("999")
        .into()
}

/// "0" to "360" followed by a degree sign: "360Degree".
pub fn degree_360() -> Pattern {
    split_at(3, "").ap(
        [number_range(0.0, 360.0, "360"), string_set(["°"], "Degree")],
        false,
    )
}

/// "0x" followed by up to five digits: "0x999", "0x10K", ...
pub fn decimal_with_0x() -> Pattern {
    split_at(2, "").ap([prefix("0x", "0x").into(), number_upper_bound(1, "")], false)
}

/// Three Chinese numerals: "999CN".
pub fn cn_number() -> Pattern {
    let three = three_digits();
    map_string(CN, "CN").concat(move |_, _| three.clone(), true)
}

/// Three Japanese formal numerals: "999JP".
pub fn jp_number() -> Pattern {
    let three = three_digits();
    map_string(JP, "JP").concat(move |_, _| three.clone(), true)
}

/// Three to five Arabic-Indic digits: "Arabic999", "Arabic10K", ...
pub fn arabic_number() -> Pattern {
    let bound = number_upper_bound(3, "");
    map_string(ARABIC, "Arabic").concat(move |_, _| bound.clone(), false)
}

/// A flag emoji followed by three digits: "Flag999".
pub fn flag_number() -> Pattern {
    // a flag is two regional indicator characters
    split_at(2, "").ap(
        [string_set(FLAGS.iter().cloned(), "Flag"), three_digits()],
        false,
    )
}

/// Zero/repeat positions within 4, 5, 6 and 11 digit numbers.
pub fn digit_positions() -> Vec<Pattern> {
    let four: Vec<Pattern> = vec![
        prefix("0", "0XXX").into(),
        prefix("00", "00XX").into(),
        PatternCombinator::all([prefix("0", "").into(), value_at('0', 2, "")])
            .named("0X0X")
            .into(),
        PatternCombinator::all([prefix("0", "").into(), suffix("0", "").into()])
            .named("0XX0")
            .into(),
        suffix("00", "XX00").into(),
        PatternCombinator::all([suffix("0", "").into(), value_at('0', 1, "")])
            .named("X0X0")
            .into(),
        suffix("88", "XX88").into(),
        suffix("69", "XX69").into(),
    ];

    let five: Vec<Pattern> = vec![
        suffix("000", "XX000").into(),
        PatternCombinator::all([prefix("00", "").into(), suffix("0", "").into()])
            .named("00XX0")
            .into(),
        prefix("000", "000XX").into(),
        suffix("420", "XX420").into(),
        prefix("69", "69XXX").into(),
        suffix("69", "XXX69").into(),
        prefix("00", "00XXX").into(),
        suffix("00", "XXX00").into(),
        tail_shape(1, "ABCD", "XABCD"),
    ];

    let six: Vec<Pattern> = vec![
        PatternCombinator::all([prefix("00", "").into(), suffix("00", "").into()])
            .named("00XX00")
            .into(),
        prefix("420", "420XXX").into(),
        suffix("420", "XXX420").into(),
        prefix("000", "000XXX").into(),
        suffix("000", "XXX000").into(),
        suffix("69", "XXXX69").into(),
    ];

    let mut patterns = Vec::new();
    for (digits, group) in [(4, four), (5, five), (6, six)] {
        patterns.extend(group.into_iter().map(|p| with_digits(digits, p)));
    }
    patterns.push(with_digits(11, tail_shape(3, "AAAAAAAA", "XXXAAAAAAAA")));
    patterns
}

/// Run `pattern` on inputs of exactly `digits` digits.
fn with_digits(digits: usize, pattern: Pattern) -> Pattern {
    number_of_digit(digits, "").chain(move |_, _| pattern.clone())
}

/// Everything after the first `skip` characters has letter shape `shape`.
fn tail_shape(skip: usize, shape: &str, name: &str) -> Pattern {
    let group = character_group(Some(shape), "");
    split_at(skip, name).map(move |v| {
        let tail = v.as_tuple()?.get(1)?;
        group.exec(&tail.text())
    })
}

/// Two factors then their product, smaller factor first: "3412" (3 × 4 = 12).
pub fn times_table() -> Pattern {
    number_of_digit(4, "").chain(|value, _| {
        let digits = value.text().into_owned();
        PatternFactory::new()
            .predicate(move |_| is_times_table(&digits))
            .serialize("TimesTable")
            .create()
    })
}

fn is_times_table(digits: &str) -> bool {
    let mut chars = digits.chars().filter_map(|c| c.to_digit(10));
    let (Some(a), Some(b)) = (chars.next(), chars.next()) else {
        return false;
    };
    let Some(product) = digits.get(2..).and_then(|s| s.parse::<u32>().ok()) else {
        return false;
    };
    a <= b && a * b == product
}

/// Month then day, e.g. "1231". A "00" day is accepted.
///
/// `year` is read on every evaluation, so a long-lived pattern follows the
/// calendar across New Year.
pub fn mmdd<Y>(year: Y) -> Pattern
where
    Y: Fn() -> i64 + Send + Sync + 'static,
{
    let year = Arc::new(year);
    number_of_digit(4, "").chain(move |value, _| {
        let digits = value.text().into_owned();
        let year = Arc::clone(&year);
        PatternFactory::new()
            .predicate(move |_| is_month_day(&digits, year()))
            .serialize("MMDD")
            .create()
    })
}

fn is_month_day(digits: &str, year: i64) -> bool {
    let parse = |part: Option<&str>| part.and_then(|s| s.parse::<u32>().ok());
    let (Some(month), Some(day)) = (parse(digits.get(..2)), parse(digits.get(2..))) else {
        return false;
    };
    calendar::days_in_month(year, month).is_some_and(|days| day <= days)
}

/// Six-digit A-share stock codes: 000000-000999 or 600000-603999.
pub fn ashare_code() -> Pattern {
    let code: Pattern = PatternCombinator::any([
        number_range(0.0, 999.0, ""),
        number_range(600000.0, 603999.0, ""),
    ])
    .named("AShareCode")
    .into();
    number_of_digit(6, "").chain(move |_, _| code.clone())
}

/// Multiples of 10000 from 10000 to 9990000.
pub fn wan_club() -> Pattern {
    arithmetic_sequence(10000.0, 9990000.0, 10000.0, "WanClub")
}

/// "0x" followed by lowercase hex digits, labelled by their count: "3Hex".
pub fn hex() -> Pattern {
    let digits = PatternFactory::new()
        .map(|s| is_lower_hex(s).then(|| Value::from(s.chars().count())))
        .create();
    split_at(2, "").ap([prefix("0x", "Hex").into(), digits], true)
}
