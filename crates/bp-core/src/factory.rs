use std::sync::Arc;

use crate::memo::Memo;
use crate::pattern::{Elements, Pattern, SerializeRule, TestRule};
use crate::value::Value;

type Mapper = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Fluent builder for factory-made patterns.
///
/// Defaults: identity mapper, truthy predicate, stringifying serializer and
/// [`concat_labels`](crate::concat_labels) as the `ap` aggregator. The built
/// pattern memoizes its mapper per input.
#[derive(Clone)]
pub struct PatternFactory {
    mapper: Mapper,
    elements: Elements,
}

impl Default for PatternFactory {
    fn default() -> Self {
        Self {
            mapper: Arc::new(|s: &str| Some(Value::from(s))),
            elements: Elements::default(),
        }
    }
}

impl PatternFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw extraction. Return `None` for "no match".
    pub fn map<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.mapper = Arc::new(mapper);
        self
    }

    /// Constant label. An empty label keeps the current serializer.
    pub fn serialize(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if label.is_empty() {
            return self;
        }
        self.elements.serializer = Arc::new(move |_: &Value| label.clone());
        self
    }

    /// Label computed from the extracted value.
    pub fn serialize_with<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.elements.serializer = Arc::new(serializer);
        self
    }

    pub fn predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.elements.predicate = Arc::new(predicate);
        self
    }

    /// Aggregator used by [`Pattern::ap`] on this pattern and its derivations.
    pub fn ap<F>(mut self, aggregate: F) -> Self
    where
        F: Fn(&Value, &[Pattern], bool) -> Option<String> + Send + Sync + 'static,
    {
        self.elements.aggregate = Arc::new(aggregate);
        self
    }

    pub fn create(self) -> Pattern {
        let mapper = self.mapper;
        let memo = Memo::new(move |s: &str| mapper(s));
        Pattern::from_parts(
            Arc::new(self.elements),
            Arc::new(move |input: &str| memo.call(input)),
            TestRule::Predicate,
            SerializeRule::Serializer,
        )
    }
}
