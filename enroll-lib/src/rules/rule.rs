//! Declarative field rules with a fluent builder.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Custom rule closure. `Err(message)` is a failure; an empty message falls
/// back to the rule's `Custom` template.
pub type CustomFn = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// The kind of check a failure message belongs to.
///
/// Variants are declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureKind {
    Required,
    MinLength,
    MaxLength,
    ExactLength,
    Pattern,
    Match,
    Custom,
}

impl FailureKind {
    /// Template used when a rule sets a constraint without a message.
    pub fn default_template(self) -> &'static str {
        match self {
            Self::Required => "{field} is required",
            Self::MinLength => "{field} must be at least {min} characters",
            Self::MaxLength => "{field} must be at most {max} characters",
            Self::ExactLength => "{field} must be exactly {length} characters",
            Self::Pattern => "{field} has an invalid format",
            Self::Match => "{field} does not match",
            Self::Custom => "{field} is invalid",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Required => "required",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::ExactLength => "exact_length",
            Self::Pattern => "pattern",
            Self::Match => "match",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Validation rule for a single field.
///
/// A rule with no constraints accepts anything, including the empty string,
/// unless it is `required`. Checks always run in [`FailureKind`] order no
/// matter the order the builder methods were called in.
///
/// Message templates may use `{field}`, `{min}`, `{max}` and `{length}`.
///
/// Lengths count Unicode scalar values (`chars()`), not UTF-16 code units,
/// so a character outside the Basic Multilingual Plane such as an emoji
/// counts as one.
///
/// # Example
///
/// ```
/// use enroll_lib::rules::Rule;
///
/// let rule = Rule::new()
///     .required("Please enter a username")
///     .min_length(3, "Username needs at least {min} characters")
///     .pattern(r"^[a-zA-Z0-9_]+$", "Letters, digits and underscores only");
/// assert!(rule.is_required());
/// ```
#[derive(Clone, Default)]
pub struct Rule {
    pub(crate) required: bool,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) exact_length: Option<usize>,
    pub(crate) pattern: Option<String>,
    pub(crate) match_field: Option<String>,
    pub(crate) custom: Option<CustomFn>,
    pub(crate) messages: BTreeMap<FailureKind, String>,
}

impl Rule {
    /// Create a rule with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the field to be non-empty.
    pub fn required(mut self, msg: impl Into<String>) -> Self {
        self.required = true;
        self.message(FailureKind::Required, msg)
    }

    /// Require minimum length, in `char`s.
    pub fn min_length(mut self, min: usize, msg: impl Into<String>) -> Self {
        self.min_length = Some(min);
        self.message(FailureKind::MinLength, msg)
    }

    /// Require maximum length, in `char`s.
    pub fn max_length(mut self, max: usize, msg: impl Into<String>) -> Self {
        self.max_length = Some(max);
        self.message(FailureKind::MaxLength, msg)
    }

    /// Require an exact length, in `char`s. `"a😀b1"` has length 4.
    pub fn exact_length(mut self, length: usize, msg: impl Into<String>) -> Self {
        self.exact_length = Some(length);
        self.message(FailureKind::ExactLength, msg)
    }

    /// Require the value to match a regex pattern.
    ///
    /// The pattern is compiled when the engine is built; an invalid pattern
    /// fails engine construction.
    pub fn pattern(mut self, pattern: impl Into<String>, msg: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self.message(FailureKind::Pattern, msg)
    }

    /// Require the value to equal the value of another field.
    pub fn matches(mut self, field: impl Into<String>, msg: impl Into<String>) -> Self {
        self.match_field = Some(field.into());
        self.message(FailureKind::Match, msg)
    }

    /// Add a custom rule.
    ///
    /// `msg` is used when the closure fails with an empty message.
    pub fn custom<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(f));
        self.message(FailureKind::Custom, msg)
    }

    /// Set or replace the message template for one failure kind.
    pub fn message(mut self, kind: FailureKind, msg: impl Into<String>) -> Self {
        self.messages.insert(kind, msg.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The field this rule must match, if any.
    pub fn match_field(&self) -> Option<&str> {
        self.match_field.as_deref()
    }

    /// The raw message template for a failure kind, if one was set.
    pub fn template(&self, kind: FailureKind) -> Option<&str> {
        self.messages.get(&kind).map(String::as_str)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("exact_length", &self.exact_length)
            .field("pattern", &self.pattern)
            .field("match_field", &self.match_field)
            .field("custom", &self.custom.is_some())
            .field("messages", &self.messages)
            .finish()
    }
}

/// An ordered table of rules keyed by field name.
///
/// Declaration order is the order fields are swept before submission and the
/// order used to pick the field that should receive focus.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(String, Rule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field.
    pub fn field(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.fields.push((name.into(), rule));
        self
    }

    /// Iterate over `(name, rule)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.iter()
            .find(|(field, _)| *field == name)
            .map(|(_, rule)| rule)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
