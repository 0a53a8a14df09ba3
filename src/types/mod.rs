//! Nominal + generic type representation.
//!
//! Types form a single-inheritance tree rooted at `var`. Function
//! signatures and comma separated aggregates are generic types whose
//! arguments are compared position by position.

pub mod types;
