use std::fmt;
use std::sync::Arc;

use crate::factory::PatternFactory;
use crate::value::Value;

/// A shared evaluation function over an input string.
pub type Eval<T> = Arc<dyn Fn(&str) -> T + Send + Sync>;
/// Acceptance test over an extracted value.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// Canonical label of an extracted value.
pub type Serializer = Arc<dyn Fn(&Value) -> String + Send + Sync>;
/// Element-wise labelling of a tuple value against sibling patterns.
pub type Aggregator = Arc<dyn Fn(&Value, &[Pattern], bool) -> Option<String> + Send + Sync>;

/// Configuration frozen by [`PatternFactory::create`].
///
/// Derived patterns share their root's elements: the aggregator used by
/// [`Pattern::ap`] and the predicate/serializer behind the default rules
/// always come from the factory-built ancestor.
#[derive(Clone)]
pub(crate) struct Elements {
    pub(crate) predicate: Predicate,
    pub(crate) serializer: Serializer,
    pub(crate) aggregate: Aggregator,
}

impl Default for Elements {
    fn default() -> Self {
        Self {
            predicate: Arc::new(Value::is_truthy),
            serializer: Arc::new(|v: &Value| v.to_string()),
            aggregate: Arc::new(concat_labels),
        }
    }
}

/// How a pattern decides `test`.
///
/// `Predicate` and `Present` are resolved against the pattern's *own*
/// `exec` at call time, so a pattern derived through `map` or `ap` keeps
/// the rule but applies it to the derived extraction. `Bound` is a closure
/// fixed to the pattern it was installed on.
#[derive(Clone)]
pub(crate) enum TestRule {
    Predicate,
    Present,
    Bound(Eval<bool>),
}

/// How a pattern decides `serialize`. Same resolution as [`TestRule`].
#[derive(Clone)]
pub(crate) enum SerializeRule {
    Serializer,
    Bound(Eval<Option<String>>),
}

/// An immutable, composable matcher over strings.
///
/// Cloning is cheap: every part is reference counted. Composition never
/// mutates `self`; each operator returns a new pattern that holds its parent
/// by shared ownership.
///
/// `None` from [`exec`](Self::exec) or [`serialize`](Self::serialize) means
/// "no match". Every operator short-circuits on it without calling the
/// predicate, serializer, or successor.
#[derive(Clone)]
pub struct Pattern {
    elements: Arc<Elements>,
    exec: Eval<Option<Value>>,
    test: TestRule,
    serialize: SerializeRule,
}

impl Pattern {
    pub(crate) fn from_parts(
        elements: Arc<Elements>,
        exec: Eval<Option<Value>>,
        test: TestRule,
        serialize: SerializeRule,
    ) -> Self {
        Self {
            elements,
            exec,
            test,
            serialize,
        }
    }

    /// The pattern that extracts the input unchanged and accepts any
    /// non-empty string.
    pub fn identity() -> Self {
        PatternFactory::new().create()
    }

    /// Extract a value from `input`.
    pub fn exec(&self, input: &str) -> Option<Value> {
        (self.exec)(input)
    }

    /// Whether `input` is accepted.
    pub fn test(&self, input: &str) -> bool {
        match &self.test {
            TestRule::Predicate => self
                .exec(input)
                .is_some_and(|v| (self.elements.predicate)(&v)),
            TestRule::Present => self.exec(input).is_some(),
            TestRule::Bound(test) => test(input),
        }
    }

    /// Canonical label for `input`, only when [`test`](Self::test) passes.
    pub fn serialize(&self, input: &str) -> Option<String> {
        match &self.serialize {
            SerializeRule::Serializer => {
                if !self.test(input) {
                    return None;
                }
                self.exec(input).map(|v| (self.elements.serializer)(&v))
            }
            SerializeRule::Bound(serialize) => serialize(input),
        }
    }

    /// Transform the extracted value.
    ///
    /// The derived pattern only extracts when `self` accepts the input, and
    /// accepts whenever `f` returns a value: the parent's predicate no
    /// longer applies.
    pub fn map<F>(&self, f: F) -> Pattern
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        let parent = self.clone();
        let exec: Eval<Option<Value>> = Arc::new(move |input: &str| {
            if !parent.test(input) {
                return None;
            }
            parent.exec(input).and_then(|v| f(&v))
        });
        Pattern::from_parts(
            Arc::clone(&self.elements),
            exec,
            TestRule::Present,
            self.serialize.clone(),
        )
    }

    /// Continue matching with the pattern produced by `next`.
    ///
    /// `next` receives the value extracted by `self` and the original input.
    /// The returned pattern is then evaluated **on the extracted value** (in
    /// its text form), not on the original input. This re-targeting is how
    /// primitives drill from a whole name into a normalized substring or
    /// number.
    pub fn chain<F>(&self, next: F) -> Pattern
    where
        F: Fn(&Value, &str) -> Pattern + Send + Sync + 'static,
    {
        let step = self.step(next);
        let test_step = Arc::clone(&step);
        let serialize_step = Arc::clone(&step);

        Pattern::from_parts(
            Arc::clone(&self.elements),
            Arc::new(move |input: &str| step(input).and_then(|(value, next)| next.exec(&value))),
            TestRule::Bound(Arc::new(move |input: &str| {
                test_step(input).is_some_and(|(value, next)| next.test(&value))
            })),
            SerializeRule::Bound(Arc::new(move |input: &str| {
                serialize_step(input).and_then(|(value, next)| next.serialize(&value))
            })),
        )
    }

    /// Like [`chain`](Self::chain), but the label joins `self`'s label with
    /// the successor's. `reverse` puts the successor's label first.
    pub fn concat<F>(&self, next: F, reverse: bool) -> Pattern
    where
        F: Fn(&Value, &str) -> Pattern + Send + Sync + 'static,
    {
        let chained = self.chain(next);
        let parent = self.clone();
        let successor = chained.clone();

        Pattern {
            serialize: SerializeRule::Bound(Arc::new(move |input: &str| {
                if !successor.test(input) {
                    return None;
                }
                let head = parent.serialize(input)?;
                let tail = successor.serialize(input)?;
                Some(if reverse { tail + &head } else { head + &tail })
            })),
            ..chained
        }
    }

    /// Match a tuple value element-wise against `patterns`.
    ///
    /// The derived `exec` yields the aggregated label as a string (see
    /// [`concat_labels`] for the default aggregation), or `None` when `self`
    /// rejects the input or any element fails its sibling.
    pub fn ap<I>(&self, patterns: I, reverse: bool) -> Pattern
    where
        I: IntoIterator<Item = Pattern>,
    {
        let siblings: Arc<[Pattern]> = patterns.into_iter().collect();
        let parent = self.clone();
        let aggregate = Arc::clone(&self.elements.aggregate);

        let exec: Eval<Option<Value>> = Arc::new(move |input: &str| {
            if !parent.test(input) {
                return None;
            }
            let value = parent.exec(input)?;
            aggregate(&value, &siblings[..], reverse).map(Value::Str)
        });
        Pattern::from_parts(
            Arc::clone(&self.elements),
            exec,
            self.test.clone(),
            self.serialize.clone(),
        )
    }

    /// Evaluate `self` and pair the extracted text with the successor built
    /// by `next`.
    fn step<F>(&self, next: F) -> Eval<Option<(String, Pattern)>>
    where
        F: Fn(&Value, &str) -> Pattern + Send + Sync + 'static,
    {
        let parent = self.clone();
        Arc::new(move |input: &str| {
            if !parent.test(input) {
                return None;
            }
            let value = parent.exec(input)?;
            let successor = next(&value, input);
            Some((value.text().into_owned(), successor))
        })
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let test = match self.test {
            TestRule::Predicate => "predicate",
            TestRule::Present => "present",
            TestRule::Bound(_) => "bound",
        };
        f.debug_struct("Pattern")
            .field("test", &test)
            .finish_non_exhaustive()
    }
}

/// Default aggregator: serialize each tuple element with its sibling and
/// concatenate the labels (right to left when `reverse`).
///
/// Fails when the value is not a tuple, the lengths differ, or any sibling
/// produces no label or an empty one.
pub fn concat_labels(value: &Value, patterns: &[Pattern], reverse: bool) -> Option<String> {
    let items = value.as_tuple()?;
    if items.len() != patterns.len() {
        return None;
    }

    let mut acc = String::new();
    for (item, pattern) in items.iter().zip(patterns) {
        let label = pattern.serialize(&item.text())?;
        if label.is_empty() {
            return None;
        }
        if reverse {
            acc.insert_str(0, &label);
        } else {
            acc.push_str(&label);
        }
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn digits() -> Pattern {
        PatternFactory::new()
            .predicate(|v| v.as_str().is_some_and(|s| s.chars().all(|c| c.is_ascii_digit())))
            .create()
    }

    fn split(at: usize) -> Pattern {
        PatternFactory::new()
            .map(move |s| {
                let head: String = s.chars().take(at).collect();
                let tail: String = s.chars().skip(at).collect();
                Some(Value::Tuple(vec![head.into(), tail.into()]))
            })
            .create()
    }

    fn label(name: &str) -> Pattern {
        PatternFactory::new().serialize(name).create()
    }

    #[test]
    fn test_factory_defaults() {
        let p = Pattern::identity();
        assert_eq!(p.exec("abc"), Some(Value::from("abc")));
        assert!(p.test("abc"));
        assert!(!p.test(""));
        assert_eq!(p.serialize("abc").as_deref(), Some("abc"));
        assert_eq!(p.serialize(""), None);
    }

    #[test]
    fn test_map_replaces_predicate_with_presence() {
        let strict = PatternFactory::new().predicate(|_| false).create();
        assert!(!strict.test("abc"));

        let len = Pattern::identity().map(|v| Some(Value::from(v.text().len())));
        assert!(len.test("abcd"));
        assert_eq!(len.exec("abcd"), Some(Value::Num(4.0)));
        // Default serializer now labels the mapped value
        assert_eq!(len.serialize("abcd").as_deref(), Some("4"));
    }

    #[test]
    fn test_map_is_guarded_by_parent_test() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mapped = digits().map(move |v| {
            seen.fetch_add(1, Ordering::SeqCst);
            Some(v.clone())
        });
        assert_eq!(mapped.exec("12a"), None);
        assert!(!mapped.test("12a"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_chain_retargets_onto_extracted_value() {
        let upper = PatternFactory::new()
            .map(|s| Some(Value::from(s.to_uppercase())))
            .create();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let chained = upper.chain(move |value, original| {
            log.lock().unwrap().push((value.to_string(), original.to_string()));
            PatternFactory::new()
                .predicate(|v| v.as_str() == Some("ABC"))
                .create()
        });

        assert!(chained.test("abc"));
        assert_eq!(chained.exec("abc"), Some(Value::from("ABC")));
        assert_eq!(
            seen.lock().unwrap()[0],
            ("ABC".to_string(), "abc".to_string())
        );
    }

    #[test]
    fn test_chain_short_circuits_on_parent_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let chained = digits().chain(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Pattern::identity()
        });
        assert!(!chained.test("x1"));
        assert_eq!(chained.exec("x1"), None);
        assert_eq!(chained.serialize("x1"), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concat_orders_labels() {
        let forward = label("head").concat(|_, _| label("tail"), false);
        let backward = label("head").concat(|_, _| label("tail"), true);
        assert_eq!(forward.serialize("x").as_deref(), Some("headtail"));
        assert_eq!(backward.serialize("x").as_deref(), Some("tailhead"));
        assert_eq!(forward.serialize(""), None);
    }

    #[test]
    fn test_concat_requires_successor() {
        let never = || PatternFactory::new().predicate(|_| false).create();
        let joined = label("head").concat(move |_, _| never(), false);
        assert!(!joined.test("x"));
        assert_eq!(joined.serialize("x"), None);
    }

    #[test]
    fn test_ap_labels_each_element() {
        let p = split(2).ap([label("L"), digits()], false);
        assert_eq!(p.exec("ab12"), Some(Value::from("L12")));
        assert_eq!(p.serialize("ab12").as_deref(), Some("L12"));
        assert_eq!(p.exec("ab1x"), None);
        assert!(!p.test("ab1x"));

        let reversed = split(2).ap([label("L"), digits()], true);
        assert_eq!(reversed.serialize("ab12").as_deref(), Some("12L"));
    }

    #[test]
    fn test_ap_length_mismatch_is_no_value() {
        let p = split(1).ap([label("only")], false);
        assert_eq!(p.exec("ab"), None);
    }

    #[test]
    fn test_ap_uses_root_aggregator_after_map() {
        let custom = PatternFactory::new()
            .map(|s| Some(Value::Tuple(vec![Value::from(s)])))
            .ap(|_, patterns, _| Some(format!("{} siblings", patterns.len())))
            .create();
        let derived = custom.map(|v| Some(v.clone())).ap([label("a"), label("b")], false);
        assert_eq!(derived.exec("x"), Some(Value::from("2 siblings")));
    }

    #[test]
    fn test_concat_labels_rejects_empty_label() {
        let empty = PatternFactory::new().serialize_with(|_| String::new()).create();
        let value = Value::Tuple(vec!["a".into()]);
        assert_eq!(concat_labels(&value, &[empty], false), None);
        assert_eq!(concat_labels(&Value::from("a"), &[label("x")], false), None);
    }
}
