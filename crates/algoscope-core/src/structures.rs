//! Linear data structures: stack, queue, array, deque and circular queue.
//!
//! These are plain in-memory collections. Rendering and pacing of the
//! operations lives in the engine crate.

use std::collections::VecDeque;

use rand::Rng;

use crate::error::{ParseError, StructureError};

/// Smallest allowed circular queue capacity.
pub const MIN_CIRCULAR_CAPACITY: usize = 3;
/// Largest allowed circular queue capacity.
pub const MAX_CIRCULAR_CAPACITY: usize = 10;
/// Capacity of a fresh circular queue.
pub const DEFAULT_CIRCULAR_CAPACITY: usize = 5;

/// Random contents for a stack, queue, array or deque: 3 to 7 values in `0..100`.
pub fn random_items<R: Rng + ?Sized>(rng: &mut R) -> Vec<f64> {
    let count = rng.gen_range(3..=7);
    (0..count).map(|_| f64::from(rng.gen_range(0u32..100))).collect()
}

/// LIFO stack. The top is the last element.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stack {
    items: Vec<f64>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Result<f64, StructureError> {
        self.items.pop().ok_or(StructureError::Empty("stack"))
    }

    pub fn peek(&self) -> Option<f64> {
        self.items.last().copied()
    }

    /// Distance from the top of the first match, scanning top-down.
    pub fn search(&self, value: f64) -> Option<usize> {
        self.items.iter().rev().position(|v| *v == value)
    }

    pub fn items(&self) -> &[f64] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// FIFO queue.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Queue {
    items: VecDeque<f64>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, value: f64) {
        self.items.push_back(value);
    }

    pub fn dequeue(&mut self) -> Result<f64, StructureError> {
        self.items.pop_front().ok_or(StructureError::Empty("queue"))
    }

    pub fn front(&self) -> Option<f64> {
        self.items.front().copied()
    }

    pub fn items(&self) -> Vec<f64> {
        self.items.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Indexed array with positional insert and delete.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayList {
    items: Vec<f64>,
}

impl ArrayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, value: f64) -> Result<(), ParseError> {
        if index > self.items.len() {
            return Err(ParseError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, value);
        Ok(())
    }

    pub fn check_index(&self, index: usize) -> Result<(), ParseError> {
        if index >= self.items.len() {
            return Err(ParseError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<f64, ParseError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Every index holding `value`, in ascending order.
    pub fn search(&self, value: f64) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == value)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn items(&self) -> &[f64] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Operations on a deque, each with a pseudo-code caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DequeOp {
    InsertFront,
    InsertRear,
    DeleteFront,
    DeleteRear,
}

impl DequeOp {
    /// Step-by-step description shown next to the deque.
    pub fn caption(self, value: Option<f64>) -> String {
        let v = value.map(|v| v.to_string()).unwrap_or_default();
        match self {
            DequeOp::InsertFront => format!(
                "deque.insertFront({v}):\n  1. Create new node with value {v}\n  2. Point new node's next to front\n  3. Update front pointer\n  4. If rear is null, update rear pointer"
            ),
            DequeOp::InsertRear => format!(
                "deque.insertRear({v}):\n  1. Create new node with value {v}\n  2. Point rear's next to new node\n  3. Update rear pointer\n  4. If front is null, update front pointer"
            ),
            DequeOp::DeleteFront => "deque.deleteFront():\n  1. Store front value\n  2. Move front to next node\n  3. If front becomes null, update rear\n  4. Return stored value".to_string(),
            DequeOp::DeleteRear => "deque.deleteRear():\n  1. Store rear value\n  2. Find second last node\n  3. Update rear pointer\n  4. Return stored value".to_string(),
        }
    }

    /// Caption shown when no operation has run yet.
    pub fn overview() -> &'static str {
        "Deque Operations:\n- insertFront(x): Add at front\n- insertRear(x): Add at rear\n- deleteFront(): Remove from front\n- deleteRear(): Remove from rear"
    }
}

/// Double-ended queue.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deque {
    items: VecDeque<f64>,
}

impl Deque {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_front(&mut self, value: f64) {
        self.items.push_front(value);
    }

    pub fn insert_rear(&mut self, value: f64) {
        self.items.push_back(value);
    }

    pub fn delete_front(&mut self) -> Result<f64, StructureError> {
        self.items.pop_front().ok_or(StructureError::Empty("deque"))
    }

    pub fn delete_rear(&mut self) -> Result<f64, StructureError> {
        self.items.pop_back().ok_or(StructureError::Empty("deque"))
    }

    pub fn items(&self) -> Vec<f64> {
        self.items.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Fixed-capacity ring buffer with explicit front and rear indices.
///
/// Empty is `front == None`. Full is `(rear + 1) % capacity == front`, so
/// every slot is usable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircularQueue {
    slots: Vec<Option<f64>>,
    front: Option<usize>,
    rear: Option<usize>,
}

impl Default for CircularQueue {
    fn default() -> Self {
        Self::with_capacity_unchecked(DEFAULT_CIRCULAR_CAPACITY)
    }
}

impl CircularQueue {
    fn with_capacity_unchecked(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            front: None,
            rear: None,
        }
    }

    /// Create an empty queue; capacity must lie in `3..=10`.
    pub fn with_capacity(capacity: usize) -> Result<Self, ParseError> {
        if !(MIN_CIRCULAR_CAPACITY..=MAX_CIRCULAR_CAPACITY).contains(&capacity) {
            return Err(ParseError::SizeOutOfRange {
                value: capacity,
                min: MIN_CIRCULAR_CAPACITY,
                max: MAX_CIRCULAR_CAPACITY,
            });
        }
        Ok(Self::with_capacity_unchecked(capacity))
    }

    /// Change the capacity. The queue is emptied.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), ParseError> {
        *self = Self::with_capacity(capacity)?;
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn front(&self) -> Option<usize> {
        self.front
    }

    pub fn rear(&self) -> Option<usize> {
        self.rear
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    pub fn is_full(&self) -> bool {
        match (self.front, self.rear) {
            (Some(front), Some(rear)) => (rear + 1) % self.capacity() == front,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        match (self.front, self.rear) {
            (Some(front), Some(rear)) => (rear + self.capacity() - front) % self.capacity() + 1,
            _ => 0,
        }
    }

    /// Enqueue at the rear. Returns the slot written.
    pub fn enqueue(&mut self, value: f64) -> Result<usize, StructureError> {
        if self.is_full() {
            return Err(StructureError::Full("circular queue"));
        }
        let slot = match self.rear {
            None => {
                self.front = Some(0);
                0
            }
            Some(rear) => (rear + 1) % self.capacity(),
        };
        self.rear = Some(slot);
        self.slots[slot] = Some(value);
        Ok(slot)
    }

    /// Dequeue from the front. Removing the last element resets both indices.
    pub fn dequeue(&mut self) -> Result<f64, StructureError> {
        let Some(front) = self.front else {
            return Err(StructureError::Empty("circular queue"));
        };
        let value = self.slots[front].take().unwrap_or_default();
        if self.rear == Some(front) {
            self.front = None;
            self.rear = None;
        } else {
            self.front = Some((front + 1) % self.capacity());
        }
        Ok(value)
    }

    /// Raw slot contents, indexed by position in the ring.
    pub fn slots(&self) -> &[Option<f64>] {
        &self.slots
    }

    /// Elements in FIFO order.
    pub fn items(&self) -> Vec<f64> {
        let Some(front) = self.front else {
            return Vec::new();
        };
        (0..self.len())
            .filter_map(|i| self.slots[(front + i) % self.capacity()])
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::with_capacity_unchecked(self.capacity());
    }

    /// Number of elements for a random fill: between 1 and `capacity - 1`.
    pub fn random_fill_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(1..self.capacity())
    }
}
