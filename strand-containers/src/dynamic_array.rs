/*!
The `DynamicArray` type is a growable sequence where every element is boxed on its own
and the array only stores the boxes.
Next to the element count it keeps a `begin` offset, the slot of the first element,
which makes popping at the front *O*(1) without shifting anything:
* pushing at the back is amortized *O*(1)
* popping at the front or the back is *O*(1)
* accessing the first and last elements is *O*(1)
# Growth
A push only grows the array when there is no free slot after the last element,
that is when `begin + len == capacity`.
The new slot array is `growth_factor` times larger (2 by default), the boxes are moved over
in order and `begin` goes back to zero.
Slots freed by `pop_front` are not reused before that, so an array which is popped at the
front and pushed at the back grows even though some of its slots are free.
Only `clear` resets `begin` otherwise.
```
use strand_containers::DynamicArray;
let mut array = DynamicArray::new();
assert_eq!(array.capacity(), 5);
for i in 0..6 {
    array.push(i);
}
assert_eq!(array.capacity(), 10);
assert_eq!(array.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
```
# Empty arrays
Unlike the linked list, reading or popping an empty array is a checked error:
```
use strand_containers::{DynamicArray, StrandContainerError};
let mut array: DynamicArray<u8> = DynamicArray::new();
assert_eq!(array.front(), Err(StrandContainerError::ContainerEmpty("front")));
assert_eq!(array.pop_back(), Err(StrandContainerError::ContainerEmpty("pop_back")));
```
**/

use std::{fmt, hint, iter::FromIterator, mem, slice};

use strand_config::{
    DynamicArrayConfig, StrandGlobalConfig, DEFAULT_GROWTH_FACTOR, DEFAULT_INITIAL_CAPACITY,
    MAX_GROWTH_FACTOR,
};
use strand_libs::tracing;

use crate::StrandContainerError;

/// The `DynamicArray` type, a growable array of individually boxed elements.
pub struct DynamicArray<T> {
    slots: Box<[Option<Box<T>>]>,
    len: usize,
    begin: usize,
    initial_capacity: usize,
    growth_factor: usize,
    relocations: usize,
}

#[inline]
fn occupied<T>(slot: Option<Box<T>>) -> Box<T> {
    slot.unwrap_or_else(|| unsafe { hint::unreachable_unchecked() })
}

impl<T> DynamicArray<T> {
    /// Constructs a new, empty `DynamicArray<T>` with 5 slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Constructs a new, empty `DynamicArray<T>` with the specified number of slots.
    ///
    /// With a capacity of 0 nothing is allocated until the first push, which then
    /// allocates the default 5 slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Self::allocate_slots(capacity),
            len: 0,
            begin: 0,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            relocations: 0,
        }
    }

    /// Constructs a new, empty `DynamicArray<T>` sized and grown as configured.
    ///
    /// The config is expected to be validated, see [`DynamicArrayConfig::validate`].
    pub fn with_config(config: &DynamicArrayConfig) -> Self {
        Self {
            slots: Self::allocate_slots(config.initial_capacity),
            len: 0,
            begin: 0,
            initial_capacity: config.initial_capacity.max(1),
            growth_factor: config.growth_factor.max(2).min(MAX_GROWTH_FACTOR),
            relocations: 0,
        }
    }

    /// Constructs a new, empty `DynamicArray<T>` from the global config.
    pub fn from_global_config() -> Result<Self, StrandContainerError> {
        let config = StrandGlobalConfig::get()?;
        let config = config.read();
        Ok(Self::with_config(&config.dynamic_array))
    }

    fn allocate_slots(capacity: usize) -> Box<[Option<Box<T>>]> {
        (0..capacity).map(|_| None).collect()
    }

    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = if old_capacity == 0 {
            self.initial_capacity
        } else {
            match old_capacity.checked_mul(self.growth_factor) {
                Some(capacity) => capacity,
                None => panic!("capacity overflow"),
            }
        };

        let mut slots = Self::allocate_slots(new_capacity);
        for (dst, src) in slots
            .iter_mut()
            .zip(self.slots[self.begin..self.begin + self.len].iter_mut())
        {
            *dst = src.take();
        }
        self.slots = slots;
        self.begin = 0;
        self.relocations += self.len;

        tracing::debug!(
            "dynamic array grows from {} to {} slots, {} elements relocated",
            old_capacity,
            new_capacity,
            self.len
        );
    }

    /// Returns the number of elements in the array.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots, used or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns how many elements growth has moved to a new slot array since construction.
    /// After *n* pushes into an empty array this is *O*(*n*).
    #[inline]
    pub fn relocations(&self) -> usize {
        self.relocations
    }

    /// The element at logical `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            self.slots[self.begin + index].as_deref()
        } else {
            None
        }
    }

    /// The element at logical `index` as a mutable reference, or `None` if out of range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            self.slots[self.begin + index].as_deref_mut()
        } else {
            None
        }
    }

    /// The first element, or `ContainerEmpty` if the array is empty.
    pub fn front(&self) -> Result<&T, StrandContainerError> {
        self.get(0).ok_or(StrandContainerError::ContainerEmpty("front"))
    }

    /// The first element as a mutable reference, or `ContainerEmpty` if the array is empty.
    pub fn front_mut(&mut self) -> Result<&mut T, StrandContainerError> {
        self.get_mut(0)
            .ok_or(StrandContainerError::ContainerEmpty("front_mut"))
    }

    /// The last element, or `ContainerEmpty` if the array is empty.
    pub fn back(&self) -> Result<&T, StrandContainerError> {
        match self.len.checked_sub(1) {
            Some(index) => self
                .get(index)
                .ok_or(StrandContainerError::ContainerEmpty("back")),
            None => Err(StrandContainerError::ContainerEmpty("back")),
        }
    }

    /// The last element as a mutable reference, or `ContainerEmpty` if the array is empty.
    pub fn back_mut(&mut self) -> Result<&mut T, StrandContainerError> {
        match self.len.checked_sub(1) {
            Some(index) => self
                .get_mut(index)
                .ok_or(StrandContainerError::ContainerEmpty("back_mut")),
            None => Err(StrandContainerError::ContainerEmpty("back_mut")),
        }
    }

    /// Adds an element at the back of the array, growing it first if the last slot is taken.
    ///
    /// This operation should compute in amortized *O*(1) time.
    pub fn push(&mut self, value: T) {
        if self.begin + self.len == self.capacity() {
            self.grow();
        }
        self.slots[self.begin + self.len] = Some(Box::new(value));
        self.len += 1;
    }

    /// Adds a clone of `value` at the back of the array.
    pub fn push_ref(&mut self, value: &T)
    where
        T: Clone,
    {
        self.push(value.clone());
    }

    /// Removes the last element and returns it, or `ContainerEmpty` if the array is empty.
    ///
    /// This operation should compute in *O*(1) time.
    pub fn pop_back(&mut self) -> Result<T, StrandContainerError> {
        if self.is_empty() {
            return Err(StrandContainerError::ContainerEmpty("pop_back"));
        }
        self.len -= 1;
        let slot = self.slots[self.begin + self.len].take();
        Ok(*occupied(slot))
    }

    /// Removes the first element and returns it, or `ContainerEmpty` if the array is empty.
    /// The freed slot stays unused until the array grows or is cleared.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_containers::{DynamicArray, StrandContainerError};
    ///
    /// let mut array = DynamicArray::new();
    /// array.push(7);
    /// assert_eq!(array.pop_front(), Ok(7));
    /// assert!(array.is_empty());
    /// assert_eq!(array.front(), Err(StrandContainerError::ContainerEmpty("front")));
    /// ```
    pub fn pop_front(&mut self) -> Result<T, StrandContainerError> {
        if self.is_empty() {
            return Err(StrandContainerError::ContainerEmpty("pop_front"));
        }
        let slot = self.slots[self.begin].take();
        self.begin += 1;
        self.len -= 1;
        Ok(*occupied(slot))
    }

    /// Drops every element and resets `begin`. The capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots[self.begin..self.begin + self.len].iter_mut() {
            *slot = None;
        }
        self.len = 0;
        self.begin = 0;
    }

    /// Moves the whole content out, leaving `self` empty with no slots at all.
    pub fn take(&mut self) -> Self {
        let empty = Self {
            slots: Self::allocate_slots(0),
            len: 0,
            begin: 0,
            initial_capacity: self.initial_capacity,
            growth_factor: self.growth_factor,
            relocations: 0,
        };
        mem::replace(self, empty)
    }

    /// Exchanges the content of two arrays.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Returns a borrowing iterator over its elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots[self.begin..self.begin + self.len].iter(),
        }
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Copies the slot layout and deep copies each element.
    /// If cloning an element panics, the copies made so far are dropped with the new slots.
    fn clone(&self) -> Self {
        let mut slots = Self::allocate_slots(self.capacity());
        for index in self.begin..self.begin + self.len {
            slots[index] = self.slots[index].clone();
        }
        Self {
            slots,
            len: self.len,
            begin: self.begin,
            initial_capacity: self.initial_capacity,
            growth_factor: self.growth_factor,
            relocations: 0,
        }
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

/// Borrowing iterator over values of the dynamic array.
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, Option<Box<T>>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| {
            slot.as_deref()
                .unwrap_or_else(|| unsafe { hint::unreachable_unchecked() })
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|slot| {
            slot.as_deref()
                .unwrap_or_else(|| unsafe { hint::unreachable_unchecked() })
        })
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod dynamic_array_tests {
    // importing names from outer (for mod tests) scope.
    use super::*;
    use std::{
        cell::Cell,
        collections::VecDeque,
        panic::{self, AssertUnwindSafe},
        rc::Rc,
    };
    use strand_libs::rand::{rngs::SmallRng, Rng, SeedableRng};

    fn to_vec(array: &DynamicArray<i32>) -> Vec<i32> {
        array.iter().copied().collect()
    }

    struct Tracked {
        id: u32,
        poison: u32,
        live: Rc<Cell<i64>>,
    }

    impl Tracked {
        fn new(id: u32, poison: u32, live: &Rc<Cell<i64>>) -> Self {
            live.set(live.get() + 1);
            Self {
                id,
                poison,
                live: live.clone(),
            }
        }
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            if self.id == self.poison {
                panic!("clone of poisoned element {}", self.id);
            }
            Tracked::new(self.id, self.poison, &self.live)
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    #[test]
    fn test_single_growth_past_default_capacity() {
        let mut array = DynamicArray::new();
        assert_eq!(array.capacity(), 5);
        for i in 0..5 {
            array.push(i);
        }
        assert_eq!(array.capacity(), 5);
        assert_eq!(array.relocations(), 0);

        array.push(5);
        assert_eq!(array.capacity(), 10);
        assert_eq!(array.relocations(), 5);
        assert_eq!(to_vec(&array), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(array.front(), Ok(&0));
        assert_eq!(array.back(), Ok(&5));
    }

    #[test]
    fn test_growth_work_is_linear() {
        let n = 100_000;
        let mut array = DynamicArray::new();
        let mut growths = 0;
        let mut capacity = array.capacity();
        for i in 0..n {
            array.push(i);
            if array.capacity() != capacity {
                growths += 1;
                capacity = array.capacity();
            }
        }
        assert_eq!(array.len(), n);
        assert!(array.relocations() < 2 * n);
        // 5 * 2^15 >= 100_000 > 5 * 2^14
        assert_eq!(growths, 15);
        assert_eq!(array.capacity(), 5 << 15);
    }

    #[test]
    fn test_pop_front_headroom_forces_growth() {
        let mut array = DynamicArray::new();
        for i in 0..5 {
            array.push(i);
        }
        assert_eq!(array.pop_front(), Ok(0));
        assert_eq!(array.pop_front(), Ok(1));
        assert_eq!(array.len(), 3);
        assert_eq!(array.capacity(), 5);

        array.push(5);
        assert_eq!(array.capacity(), 10);
        assert_eq!(to_vec(&array), vec![2, 3, 4, 5]);
        assert_eq!(array.front(), Ok(&2));
    }

    #[test]
    fn test_pop_front_to_empty() {
        let mut array = DynamicArray::new();
        array.push(1);
        assert_eq!(array.pop_front(), Ok(1));
        assert!(array.is_empty());
        assert_eq!(
            array.front(),
            Err(StrandContainerError::ContainerEmpty("front"))
        );
        assert_eq!(array.back(), Err(StrandContainerError::ContainerEmpty("back")));
        assert_eq!(
            array.pop_front(),
            Err(StrandContainerError::ContainerEmpty("pop_front"))
        );

        array.push(2);
        assert_eq!(array.front(), Ok(&2));
        assert_eq!(array.back(), Ok(&2));
    }

    #[test]
    fn test_drain_all_slots_from_front() {
        let mut array = DynamicArray::new();
        for i in 0..5 {
            array.push(i);
        }
        for i in 0..5 {
            assert_eq!(array.pop_front(), Ok(i));
        }
        assert!(array.is_empty());
        assert!(array.front().is_err());
        assert!(array.back_mut().is_err());
        array.push(9);
        assert_eq!(to_vec(&array), vec![9]);
    }

    #[test]
    fn test_error_keeps_state() {
        let mut array: DynamicArray<i32> = DynamicArray::new();
        assert_eq!(
            array.pop_back(),
            Err(StrandContainerError::ContainerEmpty("pop_back"))
        );
        assert_eq!(
            array.front_mut(),
            Err(StrandContainerError::ContainerEmpty("front_mut"))
        );
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 5);
        array.push(3);
        assert_eq!(to_vec(&array), vec![3]);
        assert_eq!(
            StrandContainerError::ContainerEmpty("pop_back").to_string(),
            "container empty for pop_back()"
        );
    }

    #[test]
    fn test_front_back_mut_and_get() {
        let mut array: DynamicArray<i32> = (1..=4).collect();
        array.pop_front().unwrap();
        *array.front_mut().unwrap() *= 10;
        *array.back_mut().unwrap() *= 10;
        *array.get_mut(1).unwrap() += 1;
        assert_eq!(to_vec(&array), vec![20, 4, 40]);
        assert_eq!(array.get(2), Some(&40));
        assert_eq!(array.get(3), None);
    }

    #[test]
    fn test_random_push_pop_matches_model() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let mut array = DynamicArray::new();
            let mut model = VecDeque::new();
            let (mut pushes, mut pops) = (0usize, 0usize);
            for step in 0..500 {
                match rng.gen_range(0..4) {
                    0 | 1 => {
                        array.push(step);
                        model.push_back(step);
                        pushes += 1;
                    }
                    2 => {
                        let popped = array.pop_front().ok();
                        assert_eq!(popped, model.pop_front());
                        pops += popped.is_some() as usize;
                    }
                    _ => {
                        let popped = array.pop_back().ok();
                        assert_eq!(popped, model.pop_back());
                        pops += popped.is_some() as usize;
                    }
                }
                assert_eq!(array.len(), pushes - pops);
            }
            assert!(array.iter().eq(model.iter()));
        }
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut array: DynamicArray<i32> = (0..7).collect();
        array.pop_front().unwrap();
        assert_eq!(array.capacity(), 10);
        array.clear();
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 10);
        for i in 0..10 {
            array.push(i);
        }
        assert_eq!(array.capacity(), 10);
        assert_eq!(array.front(), Ok(&0));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original: DynamicArray<i32> = (0..4).collect();
        original.pop_front().unwrap();
        let mut copy = original.clone();
        assert_eq!(copy.capacity(), original.capacity());
        assert_eq!(copy, original);

        copy.push(9);
        *copy.front_mut().unwrap() = 0;
        assert_eq!(to_vec(&original), vec![1, 2, 3]);
        assert_eq!(to_vec(&copy), vec![0, 2, 3, 9]);
    }

    #[test]
    fn test_clone_panic_releases_copied_elements() {
        let live = Rc::new(Cell::new(0));
        let mut array = DynamicArray::new();
        for id in 0..6 {
            array.push(Tracked::new(id, 3, &live));
        }
        assert_eq!(live.get(), 6);

        let result = panic::catch_unwind(AssertUnwindSafe(|| array.clone()));
        assert!(result.is_err());
        assert_eq!(live.get(), 6);

        array.clear();
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_push_ref_copies() {
        let live = Rc::new(Cell::new(0));
        let value = Tracked::new(1, 0, &live);
        let mut array = DynamicArray::new();
        array.push_ref(&value);
        array.push_ref(&value);
        assert_eq!(live.get(), 3);
        assert_eq!(array.back().map(|t| t.id), Ok(1));
        drop(array);
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn test_take_leaves_zero_capacity() {
        let mut source: DynamicArray<i32> = (0..3).collect();
        let moved = source.take();
        assert_eq!(to_vec(&moved), vec![0, 1, 2]);
        assert_eq!(moved.capacity(), 5);
        assert!(source.is_empty());
        assert_eq!(source.capacity(), 0);
        assert!(source.front().is_err());

        source.push(7);
        assert_eq!(source.capacity(), 5);
        assert_eq!(to_vec(&source), vec![7]);
    }

    #[test]
    fn test_with_config() {
        let config = DynamicArrayConfig::new(2, 3);
        let mut array = DynamicArray::with_config(&config);
        assert_eq!(array.capacity(), 2);
        for i in 0..3 {
            array.push(i);
        }
        assert_eq!(array.capacity(), 6);

        let mut clamped = DynamicArray::with_config(&DynamicArrayConfig::new(1, usize::MAX));
        clamped.push(0);
        clamped.push(1);
        assert_eq!(clamped.capacity(), MAX_GROWTH_FACTOR);
        assert_eq!(clamped.iter().copied().collect::<Vec<_>>(), vec![0, 1]);

        let mut empty: DynamicArray<i32> = DynamicArray::with_capacity(0);
        assert_eq!(empty.capacity(), 0);
        empty.push(1);
        assert_eq!(empty.capacity(), DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn test_swap_and_debug() {
        let mut a: DynamicArray<i32> = (0..2).collect();
        let mut b: DynamicArray<i32> = (5..8).collect();
        a.swap(&mut b);
        assert_eq!(format!("{:?}", a), "[5, 6, 7]");
        assert_eq!(format!("{:?}", b), "[0, 1]");
        assert_eq!(a.iter().rev().copied().collect::<Vec<_>>(), vec![7, 6, 5]);
        assert_eq!((&b).into_iter().len(), 2);
    }
}
