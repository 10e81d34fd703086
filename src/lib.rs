#![no_std]

//! A **heap-allocated**, **growable**, **double-ended** vector backed by a circular buffer, `no_std` compatible.
//!
//! `CircVec<T>` keeps its elements in a single block of uninitialized slots and
//! tracks the live range `head..=tail` modulo the capacity. Elements can be
//! appended or prepended in amortized constant time; when the block is full it
//! is replaced by one twice as large and the live elements are moved over in
//! logical order.
//!
//! This type is ideal for cases where:
//! - You need cheap insertion and removal at both ends.
//! - You want index-based random access relative to the current front.
//! - You need deterministic element lifetimes: every slot is constructed and
//!   destructed exactly once, and reallocation never clones an element.
//!
//! ```rust
//! use circ_vec::{CircVec, Error};
//!
//! let mut v = CircVec::new();
//! assert!(v.is_empty());
//! assert_eq!(v.capacity(), 8);
//!
//! v.push_back(2);
//! v.push_front(1);
//! v.push_back(3);
//! assert_eq!(v.len(), 3);
//! assert_eq!(v, [1, 2, 3]);
//!
//! assert_eq!(v.pop_front(), Ok(1));
//! assert_eq!(v.pop_back(), Ok(3));
//! assert_eq!(v.at(1), Err(Error::OutOfRange { index: 1, len: 1 }));
//! ```

extern crate alloc;

mod error;

pub use error::Error;

use alloc::boxed::Box;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem::MaybeUninit;
use core::ops::{Index, IndexMut};
use core::slice;

use tracing::trace;

/// Number of slots allocated by an empty [`CircVec`].
pub const MIN_CAPACITY: usize = 8;

/// Circular range of initialized slots, `head..=tail` modulo the capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    head: usize,
    tail: usize,
}

impl Span {
    /// Number of slots covered, wrap-aware. `capacity` is never zero while a span exists.
    const fn len(self, capacity: usize) -> usize {
        (self.tail + capacity - self.head) % capacity + 1
    }
}

/// A heap-allocated, growable vector with amortized O(1) push and pop at both ends.
///
/// `CircVec` is similar to [`VecDeque`](alloc::collections::VecDeque), except:
/// - A pre-sized vector ([`with_len`](CircVec::with_len)) owns exactly as many slots as elements.
/// - Growth always doubles the block and repacks the live elements at its start.
/// - Cloning preserves the physical layout, while [`clone_from`](Clone::clone_from)
///   repacks the elements at the start of the (possibly reused) destination block.
pub struct CircVec<T> {
    span: Option<Span>,
    buf: Box<[MaybeUninit<T>]>,
}

impl<T> Default for CircVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> From<[T; N]> for CircVec<T> {
    fn from(value: [T; N]) -> Self {
        Self::packed(N, value)
    }
}

impl<T> Clone for CircVec<T>
where
    T: Clone,
{
    /// Copies every live element into the same physical slot of a block with the
    /// same capacity.
    fn clone(&self) -> Self {
        let mut buf = Box::new_uninit_slice(self.capacity());
        if let Some(span) = self.span {
            for index in 0..span.len(self.capacity()) {
                let slot = self.wrap_add(span.head, index);
                buf[slot].write(unsafe { self.buf[slot].assume_init_ref() }.clone());
            }
        }

        Self {
            span: self.span,
            buf,
        }
    }

    /// Destructs the live elements of `self`, then copies the elements of
    /// `source` into slots `0..source.len()`.
    ///
    /// The current block is reused unless `source` owns a larger one, in which
    /// case the block is replaced by one of the same capacity as `source`.
    fn clone_from(&mut self, source: &Self) {
        self.clear();

        if source.capacity() > self.capacity() {
            trace!(
                old_capacity = self.capacity(),
                new_capacity = source.capacity(),
                "replaced circular vector storage"
            );
            self.buf = Box::new_uninit_slice(source.capacity());
        }

        for (index, element) in source.iter().enumerate() {
            self.buf[index].write(element.clone());
            // Track every copy as it lands so a panicking `clone` leaves no orphan.
            self.span = Some(Span {
                head: 0,
                tail: index,
            });
        }
    }
}

impl<T> CircVec<T> {
    /// Creates a new, empty `CircVec` owning [`MIN_CAPACITY`] uninitialized slots.
    ///
    /// ```
    /// use circ_vec::CircVec;
    ///
    /// let v = CircVec::<i32>::new();
    /// assert_eq!(v.capacity(), 8);
    /// assert_eq!(v.len(), 0);
    /// assert!(v.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            span: None,
            buf: Box::new_uninit_slice(MIN_CAPACITY),
        }
    }

    /// Creates a `CircVec` holding `len` default-constructed elements, with a
    /// capacity of exactly `len`. A `len` of zero behaves like [`new`](CircVec::new).
    ///
    /// ```
    /// use circ_vec::CircVec;
    ///
    /// let v = CircVec::<u8>::with_len(10);
    /// assert_eq!(v.len(), 10);
    /// assert_eq!(v.capacity(), 10);
    /// assert!(v.iter().all(|&e| e == 0));
    ///
    /// assert_eq!(CircVec::<u8>::with_len(0).capacity(), 8);
    /// ```
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::packed(len, core::iter::repeat_with(T::default))
    }

    fn packed<I>(len: usize, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        if len == 0 {
            return Self::new();
        }

        let mut buf = Box::new_uninit_slice(len);
        let mut written = 0;
        for (slot, element) in buf.iter_mut().zip(elements) {
            slot.write(element);
            written += 1;
        }

        debug_assert_eq!(written, len);
        Self {
            span: Some(Span {
                head: 0,
                tail: len - 1,
            }),
            buf,
        }
    }

    /// Returns the number of live elements.
    pub fn len(&self) -> usize {
        self.span.map_or(0, |span| span.len(self.capacity()))
    }

    /// Returns `true` if the vector contains no elements.
    pub fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    /// Returns the number of slots in the backing block.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    fn wrap_add(&self, slot: usize, offset: usize) -> usize {
        (slot + offset) % self.capacity()
    }

    fn wrap_sub(&self, slot: usize) -> usize {
        (slot + self.capacity() - 1) % self.capacity()
    }

    /// Translates a logical index into the physical slot holding it.
    fn slot(&self, index: usize) -> Option<usize> {
        let span = self.span?;
        (index < span.len(self.capacity())).then(|| self.wrap_add(span.head, index))
    }

    /// Returns a reference to the element at logical position `index`, or `None`
    /// if it is out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slot(index)
            .map(|slot| unsafe { self.buf[slot].assume_init_ref() })
    }

    /// Returns a mutable reference to the element at logical position `index`,
    /// or `None` if it is out of range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let slot = self.slot(index)?;
        Some(unsafe { self.buf[slot].assume_init_mut() })
    }

    /// Returns a reference to the element at logical position `index`.
    ///
    /// ```
    /// use circ_vec::{CircVec, Error};
    ///
    /// let v = CircVec::from([10, 20]);
    /// assert_eq!(v.at(1), Ok(&20));
    /// assert_eq!(v.at(2), Err(Error::OutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        self.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Returns a mutable reference to the element at logical position `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len();
        self.get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Returns a reference to the first element, or `None` if the vector is empty.
    pub fn front(&self) -> Option<&T> {
        let span = self.span?;
        Some(unsafe { self.buf[span.head].assume_init_ref() })
    }

    /// Returns a mutable reference to the first element, or `None` if the vector is empty.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let span = self.span?;
        Some(unsafe { self.buf[span.head].assume_init_mut() })
    }

    /// Returns a reference to the last element, or `None` if the vector is empty.
    pub fn back(&self) -> Option<&T> {
        let span = self.span?;
        Some(unsafe { self.buf[span.tail].assume_init_ref() })
    }

    /// Returns a mutable reference to the last element, or `None` if the vector is empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let span = self.span?;
        Some(unsafe { self.buf[span.tail].assume_init_mut() })
    }

    /// Moves the live elements, in logical order, to slots `0..len` of a block
    /// twice as large ([`MIN_CAPACITY`] when there was no block). Leaves `span`
    /// empty and returns the number of elements moved.
    fn grow(&mut self) -> usize {
        let old_capacity = self.capacity();
        let new_capacity = match old_capacity {
            0 => MIN_CAPACITY,
            n => n * 2,
        };
        let len = self.len();

        let mut buf = Box::new_uninit_slice(new_capacity);
        if let Some(span) = self.span.take() {
            for (index, slot) in buf[..len].iter_mut().enumerate() {
                let from = self.wrap_add(span.head, index);
                slot.write(unsafe { self.buf[from].assume_init_read() });
            }
        }

        // Every old slot has been moved out, dropping the block runs no destructors.
        self.buf = buf;
        trace!(old_capacity, new_capacity, len, "grew circular vector");
        len
    }

    /// Appends an element after the current back, growing the block if it is full.
    ///
    /// ```
    /// use circ_vec::CircVec;
    ///
    /// let mut v = CircVec::new();
    /// for i in 0..9 {
    ///     v.push_back(i);
    /// }
    /// assert_eq!(v.capacity(), 16);
    /// assert_eq!(v[8], 8);
    /// ```
    pub fn push_back(&mut self, element: T) {
        let span = if self.is_full() {
            let len = self.grow();
            Span { head: 0, tail: len }
        } else {
            match self.span {
                None => Span { head: 0, tail: 0 },
                Some(Span { head, tail }) => Span {
                    head,
                    tail: self.wrap_add(tail, 1),
                },
            }
        };

        self.buf[span.tail].write(element);
        self.span = Some(span);
    }

    /// Prepends an element before the current front, growing the block if it is full.
    ///
    /// When growing, the new element takes the last slot of the new block so it
    /// wraps around to sit just before the old elements repacked at its start.
    ///
    /// ```
    /// use circ_vec::CircVec;
    ///
    /// let mut v = CircVec::from([1, 2, 3]);
    /// v.push_front(0);
    /// assert_eq!(v, [0, 1, 2, 3]);
    /// assert_eq!(v.capacity(), 6);
    /// ```
    pub fn push_front(&mut self, element: T) {
        let span = if self.is_full() {
            match self.grow() {
                0 => Span { head: 0, tail: 0 },
                len => Span {
                    head: self.capacity() - 1,
                    tail: len - 1,
                },
            }
        } else {
            match self.span {
                None => Span { head: 0, tail: 0 },
                Some(Span { head, tail }) => Span {
                    head: self.wrap_sub(head),
                    tail,
                },
            }
        };

        self.buf[span.head].write(element);
        self.span = Some(span);
    }

    /// Appends a copy of `element`.
    pub fn push_back_cloned(&mut self, element: &T)
    where
        T: Clone,
    {
        self.push_back(element.clone());
    }

    /// Prepends a copy of `element`.
    pub fn push_front_cloned(&mut self, element: &T)
    where
        T: Clone,
    {
        self.push_front(element.clone());
    }

    /// Removes the last element and returns it, or [`Error::Empty`] if there is none.
    ///
    /// ```
    /// use circ_vec::{CircVec, Error};
    ///
    /// let mut v = CircVec::from([1, 2]);
    /// assert_eq!(v.pop_back(), Ok(2));
    /// assert_eq!(v.pop_back(), Ok(1));
    /// assert_eq!(v.pop_back(), Err(Error::Empty));
    /// ```
    pub fn pop_back(&mut self) -> Result<T, Error> {
        let Some(Span { head, tail }) = self.span else {
            return Err(Error::Empty);
        };

        let element = unsafe { self.buf[tail].assume_init_read() };
        self.span = (head != tail).then(|| Span {
            head,
            tail: self.wrap_sub(tail),
        });
        Ok(element)
    }

    /// Removes the first element and returns it, or [`Error::Empty`] if there is none.
    pub fn pop_front(&mut self) -> Result<T, Error> {
        let Some(Span { head, tail }) = self.span else {
            return Err(Error::Empty);
        };

        let element = unsafe { self.buf[head].assume_init_read() };
        self.span = (head != tail).then(|| Span {
            head: self.wrap_add(head, 1),
            tail,
        });
        Ok(element)
    }

    /// Drops all elements and resets the vector to an empty state.
    /// The capacity remains allocated.
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        if let Some(span) = self.span.take() {
            for index in 0..span.len(capacity) {
                let slot = self.wrap_add(span.head, index);
                unsafe { self.buf[slot].assume_init_drop() };
            }
        }
    }

    /// Returns the live elements as two slices in logical order. The second
    /// slice is empty unless the live range wraps around the end of the block.
    ///
    /// ```
    /// use circ_vec::CircVec;
    ///
    /// let mut v = CircVec::from([2, 3]);
    /// v.push_front(1);
    /// assert_eq!(v.as_slices(), (&[1][..], &[2, 3][..]));
    /// ```
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let Some(Span { head, tail }) = self.span else {
            return (&[], &[]);
        };

        let (front, back) = if head <= tail {
            (&self.buf[head..=tail], &self.buf[..0])
        } else {
            (&self.buf[head..], &self.buf[..=tail])
        };

        unsafe { (assume_init(front), assume_init(back)) }
    }

    /// Mutable counterpart of [`as_slices`](CircVec::as_slices).
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let Some(Span { head, tail }) = self.span else {
            return (&mut [], &mut []);
        };

        let (wrapped, rest) = self.buf.split_at_mut(head);
        let (front, back) = if head <= tail {
            (&mut rest[..=tail - head], &mut wrapped[..0])
        } else {
            (rest, &mut wrapped[..=tail])
        };

        unsafe { (assume_init_mut(front), assume_init_mut(back)) }
    }

    /// Returns an iterator over immutable references to the elements, front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.as_slices();
        Iter {
            front: front.iter(),
            back: back.iter(),
        }
    }

    /// Returns an iterator over mutable references to the elements, front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (front, back) = self.as_mut_slices();
        IterMut {
            front: front.iter_mut(),
            back: back.iter_mut(),
        }
    }
}

/// # Safety
/// Every slot of `slots` must hold an initialized `T`.
unsafe fn assume_init<T>(slots: &[MaybeUninit<T>]) -> &[T] {
    unsafe { slice::from_raw_parts(slots.as_ptr() as *const T, slots.len()) }
}

/// # Safety
/// Every slot of `slots` must hold an initialized `T`.
unsafe fn assume_init_mut<T>(slots: &mut [MaybeUninit<T>]) -> &mut [T] {
    unsafe { slice::from_raw_parts_mut(slots.as_mut_ptr() as *mut T, slots.len()) }
}

impl<T> Index<usize> for CircVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(element) => element,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}

impl<T> IndexMut<usize> for CircVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len();
        match self.get_mut(index) {
            Some(element) => element,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T> Extend<T> for CircVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|element| self.push_back(element));
    }
}

impl<'a, T> Extend<&'a T> for CircVec<T>
where
    T: Copy + 'a,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for CircVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T> IntoIterator for CircVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { inner: self }
    }
}

impl<'a, T> IntoIterator for &'a CircVec<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut CircVec<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> PartialEq for CircVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T> PartialEq<[T]> for CircVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T> PartialEq<&[T]> for CircVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &&[T]) -> bool {
        *self == **other
    }
}

impl<T, const N: usize> PartialEq<[T; N]> for CircVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &[T; N]) -> bool {
        *self == other[..]
    }
}

impl<T, const N: usize> PartialEq<&[T; N]> for CircVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &&[T; N]) -> bool {
        *self == other[..]
    }
}

impl<T> Eq for CircVec<T> where T: Eq {}

impl<T> PartialOrd for CircVec<T>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T> Ord for CircVec<T>
where
    T: Ord,
{
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.iter().cmp(other)
    }
}

impl<T> Hash for CircVec<T>
where
    T: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        self.iter().for_each(|element| element.hash(state));
    }
}

impl<T> core::fmt::Debug for CircVec<T>
where
    T: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Drop for CircVec<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

// ---

/// Immutable iterator over a [`CircVec`], front to back.
pub struct Iter<'a, T> {
    front: slice::Iter<'a, T>,
    back: slice::Iter<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.front.next().or_else(|| self.back.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.back.next_back().or_else(|| self.front.next_back())
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }
}

// ---

/// Mutable iterator over a [`CircVec`], front to back.
pub struct IterMut<'a, T> {
    front: slice::IterMut<'a, T>,
    back: slice::IterMut<'a, T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.front.next().or_else(|| self.back.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.back.next_back().or_else(|| self.front.next_back())
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }
}

// ---

/// Owning iterator over a [`CircVec`]. Elements not yielded are dropped with it.
pub struct IntoIter<T> {
    inner: CircVec<T>,
}

impl<T> core::fmt::Debug for IntoIter<T>
where
    T: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntoIter")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.pop_back().ok()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}
