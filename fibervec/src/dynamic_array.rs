/*
 * Copyright (c) 2019. The information/code/data contained within this file and all other files with the same copyright are protected under US Statutes. You must have explicit written access by Thomas P. Braun in order to access, view, modify, alter, or apply this code in any context commercial or non-commercial. If you have this code but were not given explicit written access by Thomas P. Braun, you must destroy the information herein for legal safety. You agree that if you apply the concepts herein without any written access, Thomas P. Braun will seek the maximum possible legal retribution.
 */

use std::fmt::{Display, Error, Formatter};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use crate::results::{InformationResult, MemError};
use crate::util::raw;
use crate::{GROWTH_FACTOR, INITIAL_CAPACITY};

/// A contiguous, owned, growable buffer of `T` with explicit length and capacity tracking.
///
/// The array must be brought to life with [init](DynamicArray::init) before anything is pushed onto it,
/// and is torn down with [free](DynamicArray::free). Dropping the array frees it as well, so calling
/// `free` explicitly is only required when the storage should be released early. Any growth may relocate the
/// storage, so references into the array never outlive a `push`
pub struct DynamicArray<T> {
    pub(crate) capacity: usize,
    pub(crate) length: usize,
    /// `None` whenever the array is not [ArrayState::Initialized]
    pub(crate) storage: Option<NonNull<T>>,
    pub(crate) state: ArrayState,
    _phantom: PhantomData<T>,
}

/// The lifecycle position of a [DynamicArray]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArrayState {
    /// Constructed, but `init` has not run yet (or it failed)
    Uninitialized,
    /// Holds storage; `push` and `get` are valid
    Initialized,
    /// `free` released the storage. `init` may run again
    Freed,
}

impl<T> DynamicArray<T> {
    #[inline]
    /// Returns an uninitialized array. Nothing is allocated until [init](DynamicArray::init)
    pub const fn new() -> Self {
        Self { capacity: 0, length: 0, storage: None, state: ArrayState::Uninitialized, _phantom: PhantomData }
    }

    /// Returns an array that has already been initialized
    pub fn with_init() -> InformationResult<Self> {
        let mut array = Self::new();
        array.init()?;
        Ok(array)
    }

    /// Allocates the starting buffer of [INITIAL_CAPACITY] elements. Running this on an array that is
    /// already initialized is refused, since it would orphan the existing storage. If the allocation fails,
    /// the array keeps its previous state
    pub fn init(&mut self) -> InformationResult<()> {
        if self.state == ArrayState::Initialized {
            log::debug!("refusing to re-initialize an initialized array ({} elements)", self.length);
            return MemError::throw_invalid("the array is already initialized");
        }

        let storage = raw::allocate::<T>(INITIAL_CAPACITY).map_err(|err| {
            log::debug!("initial allocation failed: {}", err);
            err
        })?;

        self.storage = Some(storage);
        self.capacity = INITIAL_CAPACITY;
        self.length = 0;
        self.state = ArrayState::Initialized;
        log::trace!("initialized array with {} slots", self.capacity);
        Ok(())
    }

    /// Appends `value`, doubling the capacity first if the array is full. Fails if the array is not
    /// initialized, or if growing the storage fails. In both cases nothing about the array changes
    pub fn push(&mut self, value: T) -> InformationResult<()> {
        if self.state != ArrayState::Initialized {
            log::debug!("refusing to push onto an array in state {}", self.state);
            return MemError::throw_invalid("the array must be initialized before pushing");
        }

        debug_assert!(self.length <= self.capacity);
        if self.length >= self.capacity {
            self.grow()?;
        }

        unsafe { ptr::write(self.storage_ptr().add(self.length), value) };
        self.length += 1;
        Ok(())
    }

    /// Grows the storage to `GROWTH_FACTOR * length` slots (at least one). The fields are only
    /// touched once the allocator has succeeded
    pub(crate) fn grow(&mut self) -> InformationResult<()> {
        let new_capacity = GROWTH_FACTOR
            .checked_mul(self.length)
            .ok_or(MemError::ALLOCATION(usize::MAX))?
            .max(1);

        let storage = match self.storage {
            Some(storage) => unsafe { raw::reallocate(storage, self.capacity, new_capacity) },
            None => raw::allocate(new_capacity),
        }
        .map_err(|err| {
            log::debug!("growth from {} to {} slots failed: {}", self.capacity, new_capacity, err);
            err
        })?;

        log::trace!("grew storage from {} to {} slots", self.capacity, new_capacity);
        self.storage = Some(storage);
        self.capacity = new_capacity;
        Ok(())
    }

    /// Drops every element, releases the storage and resets the array to the empty state.
    /// Safe to call any number of times, including on an array that was never initialized
    pub fn free(&mut self) {
        if let Some(storage) = self.storage.take() {
            let length = self.length;
            let capacity = self.capacity;
            // reset first, so that a panicking element destructor leaves an empty array behind
            self.length = 0;
            self.capacity = 0;
            self.state = ArrayState::Freed;

            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(storage.as_ptr(), length));
                raw::release(storage, capacity);
            }

            log::trace!("released storage for {} slots ({} elements)", capacity, length);
        }
    }

    /// Returns a reference to the element at `index`, or `None` if `index >= len()` or the array holds no storage
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Returns a mutable reference to the element at `index`, under the same rules as [get](DynamicArray::get)
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Returns a copy of the element at `index`. The caller is expected to have checked `len()`:
    /// an absent element is a caller fault and panics
    pub fn value(&self, index: usize) -> T
    where
        T: Clone,
    {
        match self.get(index) {
            Some(value) => value.clone(),
            None => absent(index, self.length),
        }
    }

    /// Returns a reference to the element at `index` without any bounds check
    ///
    /// # Safety
    /// `index` must be less than `len()`
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.length);
        &*self.storage_ptr().add(index)
    }

    /// Returns the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if there are no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of elements the storage holds before it must grow
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the lifecycle state
    #[inline]
    pub fn state(&self) -> ArrayState {
        self.state
    }

    /// Returns true if the array holds storage
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state == ArrayState::Initialized
    }

    /// Views the elements as a slice. Empty unless the array is initialized
    pub fn as_slice(&self) -> &[T] {
        match self.storage {
            Some(storage) => unsafe { std::slice::from_raw_parts(storage.as_ptr(), self.length) },
            None => &[],
        }
    }

    /// Views the elements as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self.storage {
            Some(storage) => unsafe { std::slice::from_raw_parts_mut(storage.as_ptr(), self.length) },
            None => &mut [],
        }
    }

    /// Iterates over the elements
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterates mutably over the elements
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    #[inline]
    pub(crate) fn storage_ptr(&self) -> *mut T {
        self.storage.unwrap_or(NonNull::dangling()).as_ptr()
    }
}

#[cold]
#[inline(never)]
pub(crate) fn absent(index: usize, length: usize) -> ! {
    panic!("index {} is out of range for an array of length {}", index, length)
}

impl Display for ArrayState {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let state = match self {
            ArrayState::Uninitialized => "Uninitialized",
            ArrayState::Initialized => "Initialized",
            ArrayState::Freed => "Freed",
        };

        f.write_str(state)
    }
}

impl<T> Display for DynamicArray<T> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "[DynamicArray] [length={}] [capacity={}] [state={}]", self.length, self.capacity, self.state)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::util::fault;

    #[test]
    fn growth_failure_leaves_the_array_untouched() {
        let mut array = DynamicArray::with_init().unwrap();
        array.push(10u32).unwrap();
        array.push(20).unwrap();
        assert_eq!(array.capacity(), 2);

        fault::fail_after(0);
        assert_eq!(array.push(30), Err(MemError::ALLOCATION(4)));
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), 2);
        assert_eq!(array.as_slice(), &[10, 20]);

        array.push(30).unwrap();
        assert_eq!(array.as_slice(), &[10, 20, 30]);
        assert_eq!(array.capacity(), 4);
    }

    #[test]
    fn init_failure_keeps_the_array_uninitialized() {
        let mut array = DynamicArray::<u64>::new();
        fault::fail_after(0);
        assert_eq!(array.init(), Err(MemError::ALLOCATION(INITIAL_CAPACITY)));
        assert_eq!(array.state(), ArrayState::Uninitialized);
        assert_eq!(array.capacity(), 0);
        assert!(array.get(0).is_none());
        assert!(array.push(1).is_err());

        array.init().unwrap();
        array.push(1).unwrap();
        assert_eq!(array.value(0), 1);
    }

    #[test]
    fn failure_injection_skips_earlier_allocations() {
        let mut array = DynamicArray::with_init().unwrap();
        array.push('a').unwrap();
        // 1 -> 2 succeeds, 2 -> 4 fails
        fault::fail_after(1);
        array.push('b').unwrap();
        assert!(array.push('c').unwrap_err().is_allocation());
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), 2);
        fault::disarm();
    }

    #[test]
    fn element_is_dropped_when_its_push_fails() {
        let drops = Rc::new(Cell::new(0));

        struct Tracked(Rc<Cell<usize>>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut array = DynamicArray::with_init().unwrap();
        array.push(Tracked(drops.clone())).unwrap();
        fault::fail_after(0);
        assert!(array.push(Tracked(drops.clone())).is_err());
        assert_eq!(drops.get(), 1);

        array.free();
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn growth_from_empty_storage_allocates_a_slot() {
        let mut array = DynamicArray::<i16>::with_init().unwrap();
        array.free();
        // grow is the growth step alone; it still needs to produce room for one element
        array.grow().unwrap();
        assert_eq!(array.capacity(), 1);
        assert!(array.storage.is_some());
        unsafe { raw::release(array.storage.take().unwrap(), array.capacity) };
        array.capacity = 0;
    }

    #[test]
    fn display_reports_the_fields() {
        let mut array = DynamicArray::with_init().unwrap();
        array.push(1u8).unwrap();
        assert_eq!(array.to_string(), "[DynamicArray] [length=1] [capacity=1] [state=Initialized]");
        array.free();
        assert_eq!(array.to_string(), "[DynamicArray] [length=0] [capacity=0] [state=Freed]");
    }
}
