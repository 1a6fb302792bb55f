/*
 * Copyright (c) 2019. The information/code/data contained within this file and all other files with the same copyright are protected under US Statutes. You must have explicit written access by Thomas P. Braun in order to access, view, modify, alter, or apply this code in any context commercial or non-commercial. If you have this code but were not given explicit written access by Thomas P. Braun, you must destroy the information herein for legal safety. You agree that if you apply the concepts herein without any written access, Thomas P. Braun will seek the maximum possible legal retribution.
 */

/// Thin layer over `std::alloc` working in element slots instead of bytes
pub(crate) mod raw {
    use std::alloc::Layout;
    use std::ptr::NonNull;

    use crate::results::{InformationResult, MemError};

    #[inline]
    fn layout_for<T>(slots: usize) -> InformationResult<Layout> {
        Layout::array::<T>(slots).map_err(|_| MemError::ALLOCATION(slots))
    }

    /// Allocates uninitialized storage for `slots` elements. Zero-sized requests never reach the allocator
    pub fn allocate<T>(slots: usize) -> InformationResult<NonNull<T>> {
        let layout = layout_for::<T>(slots)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        super::fault::check(slots)?;
        let ptr = unsafe { std::alloc::alloc(layout) } as *mut T;
        NonNull::new(ptr).ok_or(MemError::ALLOCATION(slots))
    }

    /// Resizes the block at `ptr` to `new_slots`, preserving the leading elements. If this fails,
    /// the old block is left as it was and still belongs to the caller.
    ///
    /// `ptr` must come from [allocate] or [reallocate] with `old_slots` slots
    pub unsafe fn reallocate<T>(ptr: NonNull<T>, old_slots: usize, new_slots: usize) -> InformationResult<NonNull<T>> {
        let old_layout = layout_for::<T>(old_slots)?;
        if old_layout.size() == 0 {
            return allocate(new_slots);
        }

        let new_layout = layout_for::<T>(new_slots)?;
        super::fault::check(new_slots)?;
        let new_ptr = std::alloc::realloc(ptr.as_ptr() as *mut u8, old_layout, new_layout.size()) as *mut T;
        NonNull::new(new_ptr).ok_or(MemError::ALLOCATION(new_slots))
    }

    /// Returns the block to the allocator. The elements must already have been dropped
    pub unsafe fn release<T>(ptr: NonNull<T>, slots: usize) {
        if let Ok(layout) = layout_for::<T>(slots) {
            if layout.size() != 0 {
                std::alloc::dealloc(ptr.as_ptr() as *mut u8, layout);
            }
        }
    }
}

/// Allocation-failure injection for the unit tests. Failures are armed per thread
#[cfg(test)]
pub(crate) mod fault {
    use std::cell::Cell;

    use crate::results::{InformationResult, MemError};

    thread_local! {
        static COUNTDOWN: Cell<Option<usize>> = Cell::new(None);
    }

    /// Lets `skip` allocations through, then fails the next one. The trap disarms after firing
    pub fn fail_after(skip: usize) {
        COUNTDOWN.with(|countdown| countdown.set(Some(skip)))
    }

    /// Disarms a pending failure
    pub fn disarm() {
        COUNTDOWN.with(|countdown| countdown.set(None))
    }

    pub(super) fn check(slots: usize) -> InformationResult<()> {
        COUNTDOWN.with(|countdown| match countdown.get() {
            Some(0) => {
                countdown.set(None);
                MemError::throw_allocation(slots)
            }

            Some(n) => {
                countdown.set(Some(n - 1));
                Ok(())
            }

            None => Ok(()),
        })
    }
}

#[cfg(not(test))]
pub(crate) mod fault {
    use crate::results::InformationResult;

    #[inline(always)]
    pub(super) fn check(_slots: usize) -> InformationResult<()> {
        Ok(())
    }
}

pub(crate) mod ser {
    use std::fs::File;
    use std::io::{BufReader, Write};
    use std::path::Path;

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    /// Serializes an entity to the disk, returning the number of bytes written
    pub(crate) fn serialize_to_disk<T: Serialize + ?Sized>(full_path: &Path, entity: &T) -> Result<usize, std::io::Error> {
        let bytes = serialize_to_bytes(entity)?;
        File::create(full_path)
            .and_then(|mut file| file.write_all(bytes.as_slice()))
            .map(|_| bytes.len())
    }

    /// Deserializes an entity from the disk
    pub(crate) fn deserialize_from_disk<T: DeserializeOwned>(full_path: &Path) -> Result<T, std::io::Error> {
        File::open(full_path).and_then(|file| {
            let rx = BufReader::new(file);
            bincode::deserialize_from(rx).map_err(into_io)
        })
    }

    pub(crate) fn serialize_to_bytes<T: Serialize + ?Sized>(entity: &T) -> Result<Vec<u8>, std::io::Error> {
        bincode::serialize(entity).map_err(into_io)
    }

    pub(crate) fn deserialize_from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, std::io::Error> {
        bincode::deserialize(bytes).map_err(into_io)
    }

    fn into_io(err: bincode::Error) -> std::io::Error {
        match *err {
            bincode::ErrorKind::Io(err) => err,
            other => std::io::Error::new(std::io::ErrorKind::Other, format!("[MemoryError] {}", other)),
        }
    }
}
