use std::fmt;
use std::sync::Arc;

use crate::pattern::{Elements, Eval, Pattern, SerializeRule, TestRule};
use crate::value::Value;

/// Reduces the per-child results of a combinator into its own result.
pub type Selector = Arc<dyn Fn(&[Option<Value>]) -> Option<Value> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Fails when any child rejects the input.
    All,
    /// Fails only when every child rejects the input.
    Any,
}

/// Logical combination of sibling patterns.
///
/// Every child is evaluated against the same input; children never feed
/// each other. Child order fixes the selector's input order, which is the
/// tie-break for `any`.
///
/// The selector can be replaced with [`select`](Self::select). Composition
/// operators snapshot the selector active when they are called, so a later
/// `select` does not reach patterns already derived from this combinator.
#[derive(Clone)]
pub struct PatternCombinator {
    mode: Mode,
    name: Option<String>,
    patterns: Arc<[Pattern]>,
    selector: Selector,
}

impl PatternCombinator {
    /// Conjunction. Default selector yields the tuple of child results.
    pub fn all<I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = Pattern>,
    {
        Self::new(Mode::All, patterns, Arc::new(select_tuple))
    }

    /// Disjunction. Default selector yields the first truthy child result.
    pub fn any<I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = Pattern>,
    {
        Self::new(Mode::Any, patterns, Arc::new(select_first_truthy))
    }

    fn new<I>(mode: Mode, patterns: I, selector: Selector) -> Self
    where
        I: IntoIterator<Item = Pattern>,
    {
        Self {
            mode,
            name: None,
            patterns: patterns.into_iter().collect(),
            selector,
        }
    }

    /// Fixed label returned by [`serialize`](Self::serialize) whenever the
    /// combinator matches. An empty name keeps selector-based labels.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    /// Replace the selector.
    pub fn select<F>(mut self, selector: F) -> Self
    where
        F: Fn(&[Option<Value>]) -> Option<Value> + Send + Sync + 'static,
    {
        self.selector = Arc::new(selector);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn fails(&self, input: &str) -> bool {
        match self.mode {
            Mode::All => self.patterns.iter().any(|p| !p.test(input)),
            Mode::Any => self.patterns.iter().all(|p| !p.test(input)),
        }
    }

    pub fn exec(&self, input: &str) -> Option<Value> {
        if self.fails(input) {
            return None;
        }
        let results: Vec<Option<Value>> = self.patterns.iter().map(|p| p.exec(input)).collect();
        (self.selector)(&results)
    }

    pub fn serialize(&self, input: &str) -> Option<String> {
        if self.fails(input) {
            return None;
        }
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        let labels: Vec<Option<Value>> = self
            .patterns
            .iter()
            .map(|p| p.serialize(input).map(Value::Str))
            .collect();
        (self.selector)(&labels).map(|v| v.to_string())
    }

    /// Conjunction (`all`) or disjunction (`any`) of the children's tests.
    /// The selector never affects acceptance.
    pub fn test(&self, input: &str) -> bool {
        !self.fails(input)
    }

    /// View this combinator as a plain [`Pattern`], with the current
    /// selector frozen in.
    pub fn to_pattern(&self) -> Pattern {
        let exec_view = self.clone();
        let test_view = self.clone();
        let serialize_view = self.clone();
        let exec: Eval<Option<Value>> = Arc::new(move |input: &str| exec_view.exec(input));
        Pattern::from_parts(
            Arc::new(Elements::default()),
            exec,
            TestRule::Bound(Arc::new(move |input: &str| test_view.test(input))),
            SerializeRule::Bound(Arc::new(move |input: &str| serialize_view.serialize(input))),
        )
    }

    pub fn map<F>(&self, f: F) -> Pattern
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.to_pattern().map(f)
    }

    pub fn chain<F>(&self, next: F) -> Pattern
    where
        F: Fn(&Value, &str) -> Pattern + Send + Sync + 'static,
    {
        self.to_pattern().chain(next)
    }

    pub fn concat<F>(&self, next: F, reverse: bool) -> Pattern
    where
        F: Fn(&Value, &str) -> Pattern + Send + Sync + 'static,
    {
        self.to_pattern().concat(next, reverse)
    }

    pub fn ap<I>(&self, patterns: I, reverse: bool) -> Pattern
    where
        I: IntoIterator<Item = Pattern>,
    {
        self.to_pattern().ap(patterns, reverse)
    }
}

impl From<PatternCombinator> for Pattern {
    fn from(combinator: PatternCombinator) -> Self {
        combinator.to_pattern()
    }
}

impl From<&PatternCombinator> for Pattern {
    fn from(combinator: &PatternCombinator) -> Self {
        combinator.to_pattern()
    }
}

impl fmt::Debug for PatternCombinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCombinator")
            .field("mode", &self.mode)
            .field("name", &self.name)
            .field("patterns", &self.patterns.len())
            .finish_non_exhaustive()
    }
}

fn select_tuple(results: &[Option<Value>]) -> Option<Value> {
    results
        .iter()
        .cloned()
        .collect::<Option<Vec<Value>>>()
        .map(Value::Tuple)
}

fn select_first_truthy(results: &[Option<Value>]) -> Option<Value> {
    results.iter().flatten().find(|v| v.is_truthy()).cloned()
}
