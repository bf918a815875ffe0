//! Field rules.
//!
//! A [`Rule`] describes the constraints on one field. A [`RuleSet`] is the
//! ordered table of rules for a whole form; it is compiled once when a
//! [`ValidationEngine`](crate::ValidationEngine) is built and never changes
//! afterwards.
//!
//! # Example
//!
//! ```
//! use enroll_lib::rules::{Rule, RuleSet};
//!
//! let rules = RuleSet::new()
//!     .field("password", Rule::new().required("Please set a password"))
//!     .field(
//!         "confirm-password",
//!         Rule::new()
//!             .required("Please confirm the password")
//!             .matches("password", "Passwords do not match"),
//!     );
//! assert_eq!(rules.len(), 2);
//! ```

mod check;
mod rule;

pub(crate) use check::CompiledRule;
pub use rule::{CustomFn, FailureKind, Rule, RuleSet};
