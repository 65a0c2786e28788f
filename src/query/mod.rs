//! Query construction and pre-execution interception.

mod builder;
mod conditions;
mod interceptor;
mod options;

pub use builder::{Query, QueryKind};
pub use conditions::{Condition, ConditionSet};
pub use options::{QueryOptions, WITH_DELETED};
