//! Utility functions for rule and front-end implementations.

pub mod allowance;
pub mod paths;

#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck};
#[doc(inline)]
pub use paths::{path_to_string, to_slash};
