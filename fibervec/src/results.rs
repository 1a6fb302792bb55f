/*
 * Copyright (c) 2019. The information/code/data contained within this file and all other files with the same copyright are protected under US Statutes. You must have explicit written access by Thomas P. Braun in order to access, view, modify, alter, or apply this code in any context commercial or non-commercial. If you have this code but were not given explicit written access by Thomas P. Braun, you must destroy the information herein for legal safety. You agree that if you apply the concepts herein without any written access, Thomas P. Braun will seek the maximum possible legal retribution.
 */

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Failures surfaced by the fallible [DynamicArray](crate::dynamic_array::DynamicArray) operations.
/// Out-of-range reads are not represented here; they resolve to `None`
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum MemError {
    /// The target array is not in a state where the operation can proceed
    INVALID_ARGUMENT(&'static str),
    /// The allocator could not provide storage for the contained number of elements
    ALLOCATION(usize),
}

impl MemError {
    /// #
    pub fn throw_invalid<U>(reason: &'static str) -> InformationResult<U> {
        Err(MemError::INVALID_ARGUMENT(reason))
    }

    /// #
    pub fn throw_allocation<U>(slots: usize) -> InformationResult<U> {
        Err(MemError::ALLOCATION(slots))
    }

    /// Returns true if this error was caused by the allocator
    pub fn is_allocation(&self) -> bool {
        match self {
            MemError::ALLOCATION(_) => true,
            _ => false,
        }
    }

    fn printf(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            MemError::INVALID_ARGUMENT(reason) => {
                write!(f, "[MemoryError] Invalid argument: {}", reason)
            }

            MemError::ALLOCATION(slots) => {
                write!(f, "[MemoryError] Unable to allocate storage for {} elements", slots)
            }
        }
    }

    /// Numeric code of the error, stable across releases
    pub fn value(&self) -> i32 {
        match self {
            MemError::INVALID_ARGUMENT(_) => 1,
            MemError::ALLOCATION(_) => 2,
        }
    }
}

impl Display for MemError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        self.printf(f)
    }
}

impl Debug for MemError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        self.printf(f)
    }
}

impl Error for MemError {}

impl From<MemError> for std::io::Error {
    fn from(err: MemError) -> Self {
        let kind = match err {
            MemError::INVALID_ARGUMENT(_) => std::io::ErrorKind::InvalidInput,
            MemError::ALLOCATION(_) => std::io::ErrorKind::OutOfMemory,
        };

        std::io::Error::new(kind, err)
    }
}

/// #
pub type InformationResult<T> = Result<T, MemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_prefix() {
        assert_eq!(MemError::ALLOCATION(8).to_string(), "[MemoryError] Unable to allocate storage for 8 elements");
        assert_eq!(MemError::INVALID_ARGUMENT("freed").to_string(), "[MemoryError] Invalid argument: freed");
    }

    #[test]
    fn converts_into_io_error() {
        let err: std::io::Error = MemError::ALLOCATION(4).into();
        assert_eq!(err.kind(), std::io::ErrorKind::OutOfMemory);

        let err: std::io::Error = MemError::INVALID_ARGUMENT("initialized").into();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
