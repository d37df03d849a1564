/*!
The `LinkedList` type is a circular doubly linked list built around one permanent sentinel node.
Every element lives in its own heap node, so the following is done in *O*(1):
* inserting elements before any position, including the front and the back
* erasing the element at any position
* moving one element or a whole list from one list into another (`splice`)
* getting the element count
# Positions
A [`Position`] names a node of a list, either an element node or the sentinel returned by `end`.
It does not borrow the list, so it stays usable while the list is mutated:
inserting, erasing other elements or splicing never moves a node, only its links.
A position is invalidated only when its own node is erased.
Spliced nodes keep their positions, which then refer into the destination list.
Because of that, the operations taking a position can't be checked by the compiler
and are `unsafe`: the caller promises the position belongs to the list and is still alive.
Debug builds verify the ownership part.
## Example
```
use strand_containers::LinkedList;
let mut list = LinkedList::new();
list.push_back(1);
list.push_back(3);
let three = unsafe { list.next(list.begin()) };
let two = unsafe { list.insert(three, 2) };
list.push_front(0);
assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
assert_eq!(unsafe { list.get(two) }, Some(&2));
assert_eq!(unsafe { list.get(list.end()) }, None);
```
# Layout
```text
        ┌───────────────────────────────────────────────┐
        ▼                                               │
 ┌──────────┐    ┌──────────┐           ┌──────────┐    │
 │ sentinel ├───►│  first   ├──► ··· ──►│   last   ├────┘
 │ (no data)│◄───┤          │◄── ··· ◄──┤          │◄───┐
 └──────────┘    └──────────┘           └──────────┘    │
        │                                               │
        └───────────────────────────────────────────────┘
```
The sentinel's `next` is the head of the list and its `prev` the tail.
An empty list is a sentinel linked to itself.
**/

use std::{
    fmt,
    iter::FromIterator,
    marker::PhantomData,
    mem::{self, MaybeUninit},
    ptr::NonNull,
};

use strand_libs::tracing;

struct Node<T> {
    next: NonNull<Node<T>>,
    prev: NonNull<Node<T>>,
    value: MaybeUninit<T>,
}

impl<T> Node<T> {
    fn sentinel() -> NonNull<Self> {
        let node = NonNull::from(Box::leak(Box::new(Self {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
            value: MaybeUninit::uninit(),
        })));
        unsafe {
            (*node.as_ptr()).next = node;
            (*node.as_ptr()).prev = node;
        }
        node
    }

    fn new(prev: NonNull<Self>, next: NonNull<Self>, value: T) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Self {
            next,
            prev,
            value: MaybeUninit::new(value),
        })))
    }
}

/// A node of a [`LinkedList`], either holding an element or being the list's end marker.
///
/// Positions are plain handles: copying one is free and holding one doesn't borrow the list.
pub struct Position<T> {
    node: NonNull<Node<T>>,
}

impl<T> Position<T> {
    fn new(node: NonNull<Node<T>>) -> Self {
        Self { node }
    }
}

impl<T> Clone for Position<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T> PartialEq for Position<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for Position<T> {}

impl<T> fmt::Debug for Position<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Position").field(&self.node.as_ptr()).finish()
    }
}

/// The `LinkedList` type, a circular doubly linked list with a sentinel node.
pub struct LinkedList<T> {
    sentinel: NonNull<Node<T>>,
    len: usize,
    marker: PhantomData<Box<Node<T>>>,
}

unsafe impl<T: Send> Send for LinkedList<T> {}
unsafe impl<T: Sync> Sync for LinkedList<T> {}

impl<T> LinkedList<T> {
    /// Constructs a new, empty `LinkedList<T>`.
    ///
    /// Only the sentinel node is allocated.
    pub fn new() -> Self {
        Self {
            sentinel: Node::sentinel(),
            len: 0,
            marker: PhantomData,
        }
    }

    /// Constructs a list holding `count` clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_containers::LinkedList;
    ///
    /// let list = LinkedList::from_elem(3, &"a");
    /// assert_eq!(list.len(), 3);
    /// assert!(list.iter().all(|x| *x == "a"));
    /// ```
    pub fn from_elem(count: usize, value: &T) -> Self
    where
        T: Clone,
    {
        let mut result = Self::new();
        for _ in 0..count {
            result.push_back(value.clone());
        }
        result
    }

    #[inline]
    fn head(&self) -> NonNull<Node<T>> {
        unsafe { (*self.sentinel.as_ptr()).next }
    }

    #[inline]
    fn tail(&self) -> NonNull<Node<T>> {
        unsafe { (*self.sentinel.as_ptr()).prev }
    }

    #[inline]
    unsafe fn connect(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
        (*prev.as_ptr()).next = next;
        (*next.as_ptr()).prev = prev;
    }

    /// Links the detached `node` right before `next`.
    #[inline]
    unsafe fn link_before(next: NonNull<Node<T>>, node: NonNull<Node<T>>) {
        let prev = (*next.as_ptr()).prev;
        Self::connect(prev, node);
        Self::connect(node, next);
    }

    /// Links the detached run `first..=last` right before `next`.
    #[inline]
    unsafe fn link_run_before(
        next: NonNull<Node<T>>,
        first: NonNull<Node<T>>,
        last: NonNull<Node<T>>,
    ) {
        let prev = (*next.as_ptr()).prev;
        Self::connect(prev, first);
        Self::connect(last, next);
    }

    /// Takes `node` out of its ring, leaving its own links stale.
    #[inline]
    unsafe fn detach(node: NonNull<Node<T>>) {
        Self::connect((*node.as_ptr()).prev, (*node.as_ptr()).next);
    }

    fn insert_before(&mut self, next: NonNull<Node<T>>, value: T) -> NonNull<Node<T>> {
        unsafe {
            let prev = (*next.as_ptr()).prev;
            let node = Node::new(prev, next, value);
            Self::connect(prev, node);
            Self::connect(node, next);
            self.len += 1;
            node
        }
    }

    /// Detaches and frees an element node, returning its value and its successor.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> (NonNull<Node<T>>, T) {
        Self::detach(node);
        self.len -= 1;
        let Node { next, value, .. } = *Box::from_raw(node.as_ptr());
        (next, value.assume_init())
    }

    fn take_front(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(unsafe { self.unlink(self.head()).1 })
        }
    }

    fn take_back(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(unsafe { self.unlink(self.tail()).1 })
        }
    }

    /// Whether `position` is one of this list's nodes, sentinel included. *O*(*n*).
    fn owns(&self, position: Position<T>) -> bool {
        let mut cursor = self.sentinel;
        loop {
            if cursor == position.node {
                return true;
            }
            cursor = unsafe { (*cursor.as_ptr()).next };
            if cursor == self.sentinel {
                return false;
            }
        }
    }

    /// Whether `position` lies in `[first, last)`. *O*(*k*).
    fn in_range(&self, position: Position<T>, first: Position<T>, last: Position<T>) -> bool {
        let mut cursor = first.node;
        while cursor != last.node && cursor != self.sentinel {
            if cursor == position.node {
                return true;
            }
            cursor = unsafe { (*cursor.as_ptr()).next };
        }
        false
    }

    /// Returns the number of elements in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The position of the first element, or `end()` if the list is empty.
    #[inline]
    pub fn begin(&self) -> Position<T> {
        Position::new(self.head())
    }

    /// The past-the-end position, i.e. the sentinel. It never holds an element.
    #[inline]
    pub fn end(&self) -> Position<T> {
        Position::new(self.sentinel)
    }

    /// The first element.
    ///
    /// # Panics
    /// Panics if the list is empty. Check `is_empty` first.
    pub fn front(&self) -> &T {
        assert!(!self.is_empty(), "front() called on an empty list");
        unsafe { (*self.head().as_ptr()).value.assume_init_ref() }
    }

    /// The last element.
    ///
    /// # Panics
    /// Panics if the list is empty. Check `is_empty` first.
    pub fn back(&self) -> &T {
        assert!(!self.is_empty(), "back() called on an empty list");
        unsafe { (*self.tail().as_ptr()).value.assume_init_ref() }
    }

    /// The first element as a mutable reference.
    ///
    /// # Panics
    /// Panics if the list is empty.
    pub fn front_mut(&mut self) -> &mut T {
        assert!(!self.is_empty(), "front_mut() called on an empty list");
        unsafe { (*self.head().as_ptr()).value.assume_init_mut() }
    }

    /// The last element as a mutable reference.
    ///
    /// # Panics
    /// Panics if the list is empty.
    pub fn back_mut(&mut self) -> &mut T {
        assert!(!self.is_empty(), "back_mut() called on an empty list");
        unsafe { (*self.tail().as_ptr()).value.assume_init_mut() }
    }

    /// The element at `position`, or `None` for `end()`.
    ///
    /// # Safety
    /// `position` must be a live position of this list.
    pub unsafe fn get(&self, position: Position<T>) -> Option<&T> {
        debug_assert!(self.owns(position), "position does not belong to this list");
        if position.node == self.sentinel {
            None
        } else {
            Some((*position.node.as_ptr()).value.assume_init_ref())
        }
    }

    /// The element at `position` as a mutable reference, or `None` for `end()`.
    ///
    /// # Safety
    /// `position` must be a live position of this list.
    pub unsafe fn get_mut(&mut self, position: Position<T>) -> Option<&mut T> {
        debug_assert!(self.owns(position), "position does not belong to this list");
        if position.node == self.sentinel {
            None
        } else {
            Some((*position.node.as_ptr()).value.assume_init_mut())
        }
    }

    /// The position following `position`. The ring is closed: the successor of `end()`
    /// is `begin()`.
    ///
    /// # Safety
    /// `position` must be a live position of this list.
    pub unsafe fn next(&self, position: Position<T>) -> Position<T> {
        debug_assert!(self.owns(position), "position does not belong to this list");
        Position::new((*position.node.as_ptr()).next)
    }

    /// The position preceding `position`. The predecessor of `begin()` is `end()`.
    ///
    /// # Safety
    /// `position` must be a live position of this list.
    pub unsafe fn prev(&self, position: Position<T>) -> Position<T> {
        debug_assert!(self.owns(position), "position does not belong to this list");
        Position::new((*position.node.as_ptr()).prev)
    }

    /// Adds an element at the back of the list.
    ///
    /// This operation should compute in *O*(1) time.
    pub fn push_back(&mut self, value: T) {
        self.insert_before(self.sentinel, value);
    }

    /// Adds an element at the front of the list.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_containers::LinkedList;
    ///
    /// let mut list = LinkedList::new();
    /// list.push_back(1);
    /// list.push_back(2);
    /// list.push_front(0);
    ///
    /// assert_eq!(list.len(), 3);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    /// ```
    pub fn push_front(&mut self, value: T) {
        self.insert_before(self.head(), value);
    }

    /// Removes the last element and returns it.
    ///
    /// # Panics
    /// Panics if the list is empty.
    pub fn pop_back(&mut self) -> T {
        match self.take_back() {
            Some(value) => value,
            None => panic!("pop_back() called on an empty list"),
        }
    }

    /// Removes the first element and returns it.
    ///
    /// # Panics
    /// Panics if the list is empty.
    pub fn pop_front(&mut self) -> T {
        match self.take_front() {
            Some(value) => value,
            None => panic!("pop_front() called on an empty list"),
        }
    }

    /// Inserts `value` right before `position` and returns the position of the new element.
    /// Inserting before `begin()` makes the element the new head,
    /// inserting before `end()` appends it.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Safety
    /// `position` must be a live position of this list.
    pub unsafe fn insert(&mut self, position: Position<T>, value: T) -> Position<T> {
        debug_assert!(self.owns(position), "position does not belong to this list");
        Position::new(self.insert_before(position.node, value))
    }

    /// Removes the element at `position` and returns the position of the element after it.
    /// Other positions are not affected.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Panics
    /// Panics if `position` is `end()`.
    ///
    /// # Safety
    /// `position` must be a live position of this list. It is dead afterwards.
    pub unsafe fn erase(&mut self, position: Position<T>) -> Position<T> {
        assert!(position.node != self.sentinel, "erase() called with end()");
        debug_assert!(self.owns(position), "position does not belong to this list");
        let (next, _) = self.unlink(position.node);
        Position::new(next)
    }

    /// Removes the elements in `[first, last)` and returns `last`.
    ///
    /// This operation should compute in *O*(*k*) time for *k* removed elements.
    ///
    /// # Panics
    /// Panics if `end()` is reached before `last`.
    ///
    /// # Safety
    /// `first` and `last` must be live positions of this list, with `last` reachable from `first`.
    pub unsafe fn erase_range(&mut self, first: Position<T>, last: Position<T>) -> Position<T> {
        debug_assert!(self.owns(first), "first does not belong to this list");
        debug_assert!(self.owns(last), "last does not belong to this list");
        let mut cursor = first.node;
        while cursor != last.node {
            assert!(cursor != self.sentinel, "erase_range() ran past end()");
            cursor = self.unlink(cursor).0;
        }
        last
    }

    /// Removes every element equal to `value`, keeping the order of the others.
    /// Returns the number of removed elements.
    pub fn remove(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.remove_if(|x| x == value)
    }

    /// Removes every element for which `predicate` returns `true`.
    /// The predicate is called exactly once per element, front to back.
    /// Returns the number of removed elements.
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_containers::LinkedList;
    ///
    /// let mut list: LinkedList<u32> = (1..=6).collect();
    /// assert_eq!(list.remove_if(|x| x % 2 == 0), 3);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
    /// ```
    pub fn remove_if<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        let mut cursor = self.head();
        while cursor != self.sentinel {
            unsafe {
                let next = (*cursor.as_ptr()).next;
                if predicate((*cursor.as_ptr()).value.assume_init_ref()) {
                    self.unlink(cursor);
                    removed += 1;
                }
                cursor = next;
            }
        }
        removed
    }

    /// Removes all elements. The sentinel is kept, so the list stays usable.
    pub fn clear(&mut self) {
        let count = self.len;
        while self.take_front().is_some() {}
        if count > 0 {
            tracing::debug!("linked list cleared, {} elements dropped", count);
        }
    }

    /// Replaces the content with `count` clones of `value`.
    ///
    /// The new content is built aside first, so if cloning panics the list is left untouched.
    pub fn assign(&mut self, count: usize, value: &T)
    where
        T: Clone,
    {
        let mut fresh = Self::from_elem(count, value);
        self.swap(&mut fresh);
    }

    /// Exchanges the content of two lists. Positions follow their nodes.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the whole content out, leaving `self` as an empty list with a fresh sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_containers::LinkedList;
    ///
    /// let mut source: LinkedList<u8> = vec![1, 2].into_iter().collect();
    /// let moved = source.take();
    /// assert_eq!(moved.len(), 2);
    /// assert!(source.is_empty());
    /// source.push_back(3);
    /// assert_eq!(source.front(), &3);
    /// ```
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Moves every element of `other` to the back of `self`. *O*(1).
    pub fn append(&mut self, other: &mut Self) {
        unsafe { self.splice(self.end(), other) }
    }

    /// Moves every element of `other` right before `position`, leaving `other` empty.
    /// No element is copied or reallocated.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Safety
    /// `position` must be a live position of this list.
    pub unsafe fn splice(&mut self, position: Position<T>, other: &mut Self) {
        debug_assert!(self.owns(position), "position does not belong to this list");
        if other.is_empty() {
            return;
        }
        let first = other.head();
        let last = other.tail();
        Self::connect(other.sentinel, other.sentinel);
        Self::link_run_before(position.node, first, last);

        self.len += other.len;
        tracing::debug!("spliced {} elements from another list", other.len);
        other.len = 0;
    }

    /// Moves the element at `i` from `other` right before `position`.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Panics
    /// Panics if `i` is `other.end()`.
    ///
    /// # Safety
    /// `position` must be a live position of this list and `i` a live position of `other`.
    pub unsafe fn splice_one(&mut self, position: Position<T>, other: &mut Self, i: Position<T>) {
        assert!(i.node != other.sentinel, "splice_one() called with end()");
        debug_assert!(self.owns(position), "position does not belong to this list");
        debug_assert!(other.owns(i), "i does not belong to the source list");
        Self::detach(i.node);
        other.len -= 1;
        Self::link_before(position.node, i.node);
        self.len += 1;
    }

    /// Moves the elements in `[first, last)` from `other` right before `position`.
    ///
    /// This operation should compute in *O*(*k*) time for *k* moved elements,
    /// which are counted to keep both lengths right.
    ///
    /// # Panics
    /// Panics if `other.end()` is reached before `last`.
    ///
    /// # Safety
    /// `position` must be a live position of this list, `first` and `last` live positions
    /// of `other` with `last` reachable from `first`.
    pub unsafe fn splice_range(
        &mut self,
        position: Position<T>,
        other: &mut Self,
        first: Position<T>,
        last: Position<T>,
    ) {
        debug_assert!(self.owns(position), "position does not belong to this list");
        debug_assert!(other.owns(first), "first does not belong to the source list");
        debug_assert!(other.owns(last), "last does not belong to the source list");
        let count = other.distance(first, last);
        if count == 0 {
            return;
        }
        let run_first = first.node;
        let run_last = (*last.node.as_ptr()).prev;
        Self::connect((*run_first.as_ptr()).prev, last.node);
        other.len -= count;
        Self::link_run_before(position.node, run_first, run_last);
        self.len += count;
        tracing::trace!("relinked {} elements from another list", count);
    }

    /// Moves the element at `i` of this list right before `position`.
    /// Moving an element before itself or before its own successor changes nothing.
    ///
    /// # Panics
    /// Panics if `i` is `end()`.
    ///
    /// # Safety
    /// `position` and `i` must be live positions of this list.
    pub unsafe fn splice_within(&mut self, position: Position<T>, i: Position<T>) {
        assert!(i.node != self.sentinel, "splice_within() called with end()");
        debug_assert!(self.owns(position), "position does not belong to this list");
        debug_assert!(self.owns(i), "i does not belong to this list");
        if position == i || position.node == (*i.node.as_ptr()).next {
            return;
        }
        Self::detach(i.node);
        Self::link_before(position.node, i.node);
    }

    /// Moves the elements in `[first, last)` of this list right before `position`.
    /// Moving the range before `first` or before `last` changes nothing.
    ///
    /// # Panics
    /// Panics if `end()` is reached before `last`.
    ///
    /// # Safety
    /// `position`, `first` and `last` must be live positions of this list, with `last`
    /// reachable from `first` and `position` not strictly inside `(first, last)`.
    pub unsafe fn splice_range_within(
        &mut self,
        position: Position<T>,
        first: Position<T>,
        last: Position<T>,
    ) {
        debug_assert!(self.owns(position), "position does not belong to this list");
        if first == last || position == first || position == last {
            return;
        }
        debug_assert!(
            !self.in_range(position, first, last),
            "position lies inside the moved range"
        );
        let mut run_last = first.node;
        while (*run_last.as_ptr()).next != last.node {
            assert!(run_last != self.sentinel, "splice_range_within() ran past end()");
            run_last = (*run_last.as_ptr()).next;
        }
        assert!(run_last != self.sentinel, "splice_range_within() ran past end()");
        Self::connect((*first.node.as_ptr()).prev, last.node);
        Self::link_run_before(position.node, first.node, run_last);
    }

    /// Number of elements in `[first, last)`.
    unsafe fn distance(&self, first: Position<T>, last: Position<T>) -> usize {
        let mut count = 0;
        let mut cursor = first.node;
        while cursor != last.node {
            assert!(cursor != self.sentinel, "range end is not reachable");
            count += 1;
            cursor = (*cursor.as_ptr()).next;
        }
        count
    }

    /// Returns a borrowing iterator over its elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            head: self.head(),
            tail: self.tail(),
            len: self.len,
            marker: PhantomData,
        }
    }

    /// Returns a borrowing iterator over its elements as mutable references.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            head: self.head(),
            tail: self.tail(),
            len: self.len,
            marker: PhantomData,
        }
    }

    /// Returns an iterator over the positions of its elements, `end()` excluded.
    pub fn positions(&self) -> Positions<'_, T> {
        Positions {
            inner: Iter {
                head: self.head(),
                tail: self.tail(),
                len: self.len,
                marker: PhantomData,
            },
        }
    }
}

impl<T> Drop for LinkedList<T> {
    fn drop(&mut self) {
        self.clear();
        unsafe {
            drop(Box::from_raw(self.sentinel.as_ptr()));
        }
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

/// Borrowing iterator over values of the linked list.
pub struct Iter<'a, T> {
    head: NonNull<Node<T>>,
    tail: NonNull<Node<T>>,
    len: usize,
    marker: PhantomData<&'a Node<T>>,
}

unsafe impl<'a, T: Sync> Send for Iter<'a, T> {}
unsafe impl<'a, T: Sync> Sync for Iter<'a, T> {}

impl<'a, T> Iter<'a, T> {
    #[inline]
    fn next_node(&mut self) -> Option<NonNull<Node<T>>> {
        if self.len == 0 {
            return None;
        }
        let node = self.head;
        self.head = unsafe { (*node.as_ptr()).next };
        self.len -= 1;
        Some(node)
    }

    #[inline]
    fn next_back_node(&mut self) -> Option<NonNull<Node<T>>> {
        if self.len == 0 {
            return None;
        }
        let node = self.tail;
        self.tail = unsafe { (*node.as_ptr()).prev };
        self.len -= 1;
        Some(node)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_node()
            .map(|node| unsafe { (*node.as_ptr()).value.assume_init_ref() })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.next_back_node()
            .map(|node| unsafe { (*node.as_ptr()).value.assume_init_ref() })
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// Borrowing iterator over mutable values of the linked list.
pub struct IterMut<'a, T> {
    head: NonNull<Node<T>>,
    tail: NonNull<Node<T>>,
    len: usize,
    marker: PhantomData<&'a mut Node<T>>,
}

unsafe impl<'a, T: Send> Send for IterMut<'a, T> {}
unsafe impl<'a, T: Sync> Sync for IterMut<'a, T> {}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.head;
        self.len -= 1;
        unsafe {
            self.head = (*node.as_ptr()).next;
            Some((*node.as_ptr()).value.assume_init_mut())
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.tail;
        self.len -= 1;
        unsafe {
            self.tail = (*node.as_ptr()).prev;
            Some((*node.as_ptr()).value.assume_init_mut())
        }
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

/// Borrowing iterator over the element positions of the linked list.
pub struct Positions<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Iterator for Positions<'a, T> {
    type Item = Position<T>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_node().map(Position::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Positions<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back_node().map(Position::new)
    }
}

/// Owning iterator over values of the linked list.
pub struct IntoIter<T>(LinkedList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.take_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.take_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
