/*
 * Copyright (c) 2019. The information/code/data contained within this file and all other files with the same copyright are protected under US Statutes. You must have explicit written access by Thomas P. Braun in order to access, view, modify, alter, or apply this code in any context commercial or non-commercial. If you have this code but were not given explicit written access by Thomas P. Braun, you must destroy the information herein for legal safety. You agree that if you apply the concepts herein without any written access, Thomas P. Braun will seek the maximum possible legal retribution.
 */
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::path::Path;

use bytes::buf::UninitSlice;
use bytes::BufMut;
use serde::de::{self, DeserializeOwned, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dynamic_array::{absent, DynamicArray};
use crate::results::MemError;

/// The array may be shipped between threads whenever its elements may
unsafe impl<T: Send> Send for DynamicArray<T> {}

/// Shared references only ever hand out `&T`
unsafe impl<T: Sync> Sync for DynamicArray<T> {}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        self.free()
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(value) => value,
            None => absent(index, self.len()),
        }
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let length = self.len();
        match self.get_mut(index) {
            Some(value) => value,
            None => absent(index, length),
        }
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: Debug> Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<DynamicArray<U>> for DynamicArray<T> {
    fn eq(&self, other: &DynamicArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

/// Lets an initialized byte array act as a growable sink. Unlike a fixed buffer, running out of capacity
/// grows the array; an allocation failure at that point panics, as there is no way to report it through `BufMut`
unsafe impl BufMut for DynamicArray<u8> {
    fn remaining_mut(&self) -> usize {
        if self.is_initialized() {
            isize::MAX as usize - self.length
        } else {
            0
        }
    }

    unsafe fn advance_mut(&mut self, cnt: usize) {
        let spare = self.capacity - self.length;
        assert!(cnt <= spare, "cannot advance past the allocated capacity ({} > {})", cnt, spare);
        self.length += cnt;
    }

    fn chunk_mut(&mut self) -> &mut UninitSlice {
        assert!(self.is_initialized(), "the byte array must be initialized before writing");
        if self.length == self.capacity {
            if let Err(err) = self.grow() {
                panic!("unable to extend the byte array: {}", err);
            }
        }

        let spare = self.capacity - self.length;
        unsafe { UninitSlice::from_raw_parts_mut(self.storage_ptr().add(self.length), spare) }
    }
}

impl<T: Serialize> Serialize for DynamicArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DynamicArray<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ArrayVisitor(PhantomData))
    }
}

struct ArrayVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ArrayVisitor<T> {
    type Value = DynamicArray<T>;

    fn expecting(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        f.write_str("a sequence of array elements")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut array = DynamicArray::with_init().map_err(de::Error::custom)?;
        while let Some(element) = seq.next_element()? {
            array.push(element).map_err(de::Error::custom)?;
        }

        Ok(array)
    }
}

impl<T: Serialize> DynamicArray<T> {
    /// Encodes the elements with bincode. Arrays that are not initialized are refused
    pub fn to_bytes(&self) -> Result<Vec<u8>, std::io::Error> {
        self.check_serializable()?;
        crate::util::ser::serialize_to_bytes(self)
    }

    /// Saves the elements to the disk, and returns the number of bytes written if successful
    pub fn serialize_to_disk<P: AsRef<Path>>(&self, path: P) -> Result<usize, std::io::Error> {
        self.check_serializable()?;
        crate::util::ser::serialize_to_disk(path.as_ref(), self)
    }

    fn check_serializable(&self) -> Result<(), std::io::Error> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(MemError::INVALID_ARGUMENT("only an initialized array can be serialized").into())
        }
    }
}

impl<T: DeserializeOwned> DynamicArray<T> {
    /// Decodes an array previously encoded with [to_bytes](DynamicArray::to_bytes). The result is initialized
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, std::io::Error> {
        crate::util::ser::deserialize_from_bytes(bytes)
    }

    /// Retrieves an array previously saved with [serialize_to_disk](DynamicArray::serialize_to_disk)
    pub fn deserialize_from_disk<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        crate::util::ser::deserialize_from_disk(path.as_ref())
    }
}
