//! fibervec provides [DynamicArray](crate::dynamic_array::DynamicArray), a contiguous growable array which manages
//! its own heap storage and reports allocation failures instead of aborting


#![deny(
missing_docs,
trivial_numeric_casts,
unused_extern_crates,
unused_import_braces,
unused_results
)]

/// Import everything herein to gain access to the DynamicArray and all its associated structures
pub mod prelude {
    pub use crate::dynamic_array::{ArrayState, DynamicArray};
    pub use crate::results::*;
    pub use crate::{GROWTH_FACTOR, INITIAL_CAPACITY};
}

/// The array itself
pub mod dynamic_array;

/// Errors
pub mod results;

pub(crate) mod util;

/// provides trait implementations for DynamicArray
pub mod impls;

/// The factor the capacity is multiplied by whenever a push finds the array full
pub const GROWTH_FACTOR: usize = 2;

/// The number of slots `init` allocates
pub const INITIAL_CAPACITY: usize = 1;
