//! Pattern combinator engine for classifying strings.
//!
//! A [`Pattern`] extracts a [`Value`] from an input string (`exec`), decides
//! acceptance (`test`) and produces a canonical label (`serialize`).
//! Patterns compose with `map`, `chain`, `concat` and `ap`, and group under
//! [`PatternCombinator::all`] / [`PatternCombinator::any`].
//!
//! "No match" is always `None` and propagates through every operator
//! without touching predicates, serializers or successors.
//!
//! Zero I/O: pure evaluation with per-pattern memoization.

pub mod combinator;
pub mod factory;
pub mod memo;
pub mod pattern;
pub mod value;

pub use combinator::{PatternCombinator, Selector};
pub use factory::PatternFactory;
pub use memo::Memo;
pub use pattern::{Aggregator, Eval, Pattern, Predicate, Serializer, concat_labels};
pub use value::Value;
