//! Variables module for the workbench
//!
//! Resolves `{{variable}}` tokens in request text against the active
//! environment.

pub mod substitution;

pub use substitution::{
    find_variable_references, substitute_request, substitute_variables, unresolved_variables,
};
