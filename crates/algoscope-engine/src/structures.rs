//! Structure mutators: animated operations on the linear structures.
//!
//! Every operation claims the run control for the length of its animation,
//! validates input, mutates, renders one frame, paces and posts a status
//! line. Structural violations additionally render a `Shake` frame.

use algoscope_core::{
    format_value, parse_value, random_items, ArrayList, CircularQueue, Deque, DequeOp, ParseError, Queue, Stack,
    StructureError, DEFAULT_CIRCULAR_CAPACITY,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::control::{RunControl, RunToken};
use crate::error::{Error, Result};
use crate::pacer::{Pacer, PacerConfig};
use crate::sink::{Frame, Highlight, HighlightKind, Scene, Sinks, StructureKind};

fn parse_index(text: &str) -> std::result::Result<usize, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    trimmed
        .parse::<usize>()
        .map_err(|_| ParseError::NotAnInteger(trimmed.to_string()))
}

/// The five linear structures and their animated operations.
#[derive(Debug)]
pub struct StructureMutator {
    stack: Stack,
    queue: Queue,
    array: ArrayList,
    deque: Deque,
    circular: CircularQueue,
    control: RunControl,
    pacer: Pacer,
    sinks: Sinks,
    rng: StdRng,
}

impl StructureMutator {
    pub fn new(control: RunControl, sinks: Sinks) -> Self {
        Self {
            stack: Stack::new(),
            queue: Queue::new(),
            array: ArrayList::new(),
            deque: Deque::new(),
            circular: CircularQueue::default(),
            control,
            pacer: Pacer::new(PacerConfig::structures()),
            sinks,
            rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Seed the generator used by random fills.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn array(&self) -> &ArrayList {
        &self.array
    }

    pub fn deque(&self) -> &Deque {
        &self.deque
    }

    pub fn circular(&self) -> &CircularQueue {
        &self.circular
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    /// Current contents of `kind` as a scene.
    pub fn scene(&self, kind: StructureKind) -> Scene {
        let (slots, front, rear) = match kind {
            StructureKind::Stack => (self.stack.items().iter().copied().map(Some).collect(), None, None),
            StructureKind::Queue => (self.queue.items().into_iter().map(Some).collect(), None, None),
            StructureKind::Array => (self.array.items().iter().copied().map(Some).collect(), None, None),
            StructureKind::Deque => (self.deque.items().into_iter().map(Some).collect(), None, None),
            StructureKind::CircularQueue => (
                self.circular.slots().to_vec(),
                self.circular.front(),
                self.circular.rear(),
            ),
        };
        Scene::Items {
            kind,
            slots,
            front,
            rear,
        }
    }

    /// Draw `kind` without highlights.
    pub fn render(&self, kind: StructureKind) {
        self.sinks.render(&Frame::new(self.scene(kind)));
    }

    fn claim(&self) -> Result<RunToken> {
        self.control.begin().ok_or(Error::Busy)
    }

    /// Bad input: status only, nothing drawn.
    fn reject(&self, token: &RunToken, message: &str, err: ParseError) -> Error {
        self.sinks.status(message);
        self.control.finish(token);
        err.into()
    }

    /// Structural violation: shake the structure and report.
    fn violation(&self, token: &RunToken, kind: StructureKind, message: &str, err: StructureError) -> Error {
        let frame = Frame::new(self.scene(kind)).with_highlights([Highlight::all(HighlightKind::Shake)]);
        self.sinks.render(&frame);
        self.sinks.status(message);
        self.control.finish(token);
        err.into()
    }

    async fn animate(&self, token: &RunToken, frame: Frame, message: &str) -> Result<()> {
        self.sinks.render(&frame);
        self.pacer.pace(token).await?;
        self.sinks.status(message);
        self.control.finish(token);
        Ok(())
    }

    fn value_or_reject(&self, token: &RunToken, text: &str, message: &str) -> Result<f64> {
        parse_value(text).map_err(|e| self.reject(token, message, e))
    }

    // Stack

    pub async fn push(&mut self, text: &str) -> Result<()> {
        let token = self.claim()?;
        let value = self.value_or_reject(&token, text, "Please enter a valid number.")?;
        self.stack.push(value);
        let top = self.stack.len() - 1;
        let frame = Frame::new(self.scene(StructureKind::Stack))
            .with_highlights([Highlight::at(top, HighlightKind::Inserted)]);
        let message = format!(
            "Pushed {} onto the stack. Stack size: {}",
            format_value(value),
            self.stack.len()
        );
        self.animate(&token, frame, &message).await
    }

    pub async fn pop(&mut self) -> Result<f64> {
        let token = self.claim()?;
        let Some(top) = self.stack.len().checked_sub(1) else {
            return Err(self.violation(
                &token,
                StructureKind::Stack,
                "Cannot pop from an empty stack.",
                StructureError::Empty("stack"),
            ));
        };
        let leaving = Frame::new(self.scene(StructureKind::Stack))
            .with_highlights([Highlight::at(top, HighlightKind::Removed)]);
        self.sinks.render(&leaving);
        let value = self.stack.pop()?;
        let message = format!(
            "Popped {} from the stack. Stack size: {}",
            format_value(value),
            self.stack.len()
        );
        self.animate(&token, Frame::new(self.scene(StructureKind::Stack)), &message)
            .await?;
        Ok(value)
    }

    /// Highlight the top without removing it.
    pub async fn peek(&mut self) -> Result<f64> {
        let token = self.claim()?;
        let Some(value) = self.stack.peek() else {
            return Err(self.violation(
                &token,
                StructureKind::Stack,
                "Stack is empty.",
                StructureError::Empty("stack"),
            ));
        };
        let frame = Frame::new(self.scene(StructureKind::Stack))
            .with_highlights([Highlight::at(self.stack.len() - 1, HighlightKind::Found)]);
        let message = format!("Top of the stack is {}", format_value(value));
        self.animate(&token, frame, &message).await?;
        Ok(value)
    }

    /// Distance from the top of the first match. Not finding the value is
    /// not an error.
    pub async fn search_stack(&mut self, text: &str) -> Result<Option<usize>> {
        let token = self.claim()?;
        let value = self.value_or_reject(&token, text, "Please enter a value to search.")?;
        let found = self.stack.search(value);
        let (highlight, message) = match found {
            Some(depth) => (
                Highlight::at(self.stack.len() - 1 - depth, HighlightKind::Found),
                format!(
                    "Found {} at position {depth} from the top of the stack",
                    format_value(value)
                ),
            ),
            None => (
                Highlight::all(HighlightKind::Shake),
                format!("Value {} not found in the stack", format_value(value)),
            ),
        };
        let frame = Frame::new(self.scene(StructureKind::Stack)).with_highlights([highlight]);
        self.animate(&token, frame, &message).await?;
        Ok(found)
    }

    // Queue

    pub async fn enqueue(&mut self, text: &str) -> Result<()> {
        let token = self.claim()?;
        let value = self.value_or_reject(&token, text, "Please enter a value to enqueue.")?;
        self.queue.enqueue(value);
        let rear = self.queue.len() - 1;
        let frame = Frame::new(self.scene(StructureKind::Queue))
            .with_highlights([Highlight::at(rear, HighlightKind::Inserted)]);
        let message = format!(
            "Enqueued {} into the queue. Queue size: {}",
            format_value(value),
            self.queue.len()
        );
        self.animate(&token, frame, &message).await
    }

    pub async fn dequeue(&mut self) -> Result<f64> {
        let token = self.claim()?;
        if self.queue.is_empty() {
            return Err(self.violation(
                &token,
                StructureKind::Queue,
                "Cannot dequeue from an empty queue.",
                StructureError::Empty("queue"),
            ));
        }
        let leaving = Frame::new(self.scene(StructureKind::Queue))
            .with_highlights([Highlight::at(0, HighlightKind::Removed)]);
        self.sinks.render(&leaving);
        let value = self.queue.dequeue()?;
        let message = format!(
            "Dequeued {} from the queue. Queue size: {}",
            format_value(value),
            self.queue.len()
        );
        self.animate(&token, Frame::new(self.scene(StructureKind::Queue)), &message)
            .await?;
        Ok(value)
    }

    // Array

    /// Insert at `index`, which may equal the current length.
    pub async fn insert_at(&mut self, value_text: &str, index_text: &str) -> Result<()> {
        let token = self.claim()?;
        let value = self.value_or_reject(&token, value_text, "Please enter a valid value and index.")?;
        let index = parse_index(index_text).map_err(|e| self.reject(&token, "Please enter a valid value and index.", e))?;
        if let Err(e) = self.array.insert(index, value) {
            return Err(self.reject(&token, "Please enter a valid value and index.", e));
        }
        let frame = Frame::new(self.scene(StructureKind::Array))
            .with_highlights([Highlight::at(index, HighlightKind::Inserted)]);
        let message = format!(
            "Inserted {} at index {index}. Array size: {}",
            format_value(value),
            self.array.len()
        );
        self.animate(&token, frame, &message).await
    }

    /// Delete the element at `index`, which must be in range.
    pub async fn delete_at(&mut self, index_text: &str) -> Result<f64> {
        let token = self.claim()?;
        if self.array.is_empty() {
            return Err(self.violation(
                &token,
                StructureKind::Array,
                "Cannot delete from an empty array.",
                StructureError::Empty("array"),
            ));
        }
        let index = parse_index(index_text)
            .and_then(|i| self.array.check_index(i).map(|()| i))
            .map_err(|e| self.reject(&token, "Please enter a valid index to delete.", e))?;
        let leaving = Frame::new(self.scene(StructureKind::Array))
            .with_highlights([Highlight::at(index, HighlightKind::Removed)]);
        self.sinks.render(&leaving);
        let value = self.array.delete(index)?;
        let message = format!("Deleted element at index {index}. Array size: {}", self.array.len());
        self.animate(&token, Frame::new(self.scene(StructureKind::Array)), &message)
            .await?;
        Ok(value)
    }

    /// Every index holding the value.
    pub async fn search_array(&mut self, text: &str) -> Result<Vec<usize>> {
        let token = self.claim()?;
        let value = self.value_or_reject(&token, text, "Please enter a value to search.")?;
        let positions = self.array.search(value);
        let (highlights, message) = if positions.is_empty() {
            (
                vec![Highlight::all(HighlightKind::Shake)],
                format!("Value {} not found in the array", format_value(value)),
            )
        } else {
            let listed = positions.iter().map(usize::to_string).collect::<Vec<_>>().join(", ");
            (
                positions.iter().map(|&i| Highlight::at(i, HighlightKind::Found)).collect(),
                format!("Found {} at position(s): {listed}", format_value(value)),
            )
        };
        let frame = Frame::new(self.scene(StructureKind::Array)).with_highlights(highlights);
        self.animate(&token, frame, &message).await?;
        Ok(positions)
    }

    // Deque

    pub async fn insert_front(&mut self, text: &str) -> Result<()> {
        self.deque_insert(text, DequeOp::InsertFront).await
    }

    pub async fn insert_rear(&mut self, text: &str) -> Result<()> {
        self.deque_insert(text, DequeOp::InsertRear).await
    }

    async fn deque_insert(&mut self, text: &str, op: DequeOp) -> Result<()> {
        let token = self.claim()?;
        let value = self.value_or_reject(&token, text, "Please enter a valid number.")?;
        let (slot, end) = match op {
            DequeOp::InsertFront => {
                self.deque.insert_front(value);
                (0, "front")
            }
            _ => {
                self.deque.insert_rear(value);
                (self.deque.len() - 1, "rear")
            }
        };
        let frame = Frame::new(self.scene(StructureKind::Deque))
            .with_highlights([Highlight::at(slot, HighlightKind::Inserted)])
            .with_caption(op.caption(Some(value)));
        let message = format!("Inserted {} at {end}", format_value(value));
        self.animate(&token, frame, &message).await
    }

    pub async fn delete_front(&mut self) -> Result<f64> {
        self.deque_delete(DequeOp::DeleteFront).await
    }

    pub async fn delete_rear(&mut self) -> Result<f64> {
        self.deque_delete(DequeOp::DeleteRear).await
    }

    async fn deque_delete(&mut self, op: DequeOp) -> Result<f64> {
        let token = self.claim()?;
        let front = matches!(op, DequeOp::DeleteFront);
        let end = if front { "front" } else { "rear" };
        if self.deque.is_empty() {
            let message = format!("Deque is empty! Cannot delete from {end}.");
            return Err(self.violation(&token, StructureKind::Deque, &message, StructureError::Empty("deque")));
        }
        let slot = if front { 0 } else { self.deque.len() - 1 };
        let leaving = Frame::new(self.scene(StructureKind::Deque))
            .with_highlights([Highlight::at(slot, HighlightKind::Removed)]);
        self.sinks.render(&leaving);
        let value = if front {
            self.deque.delete_front()?
        } else {
            self.deque.delete_rear()?
        };
        let frame = Frame::new(self.scene(StructureKind::Deque)).with_caption(op.caption(None));
        let message = format!("Deleted {} from {end}", format_value(value));
        self.animate(&token, frame, &message).await?;
        Ok(value)
    }

    // Circular queue

    /// Returns the slot written.
    pub async fn circular_enqueue(&mut self, text: &str) -> Result<usize> {
        let token = self.claim()?;
        let value = self.value_or_reject(&token, text, "Please enter a value to enqueue.")?;
        let slot = match self.circular.enqueue(value) {
            Ok(slot) => slot,
            Err(e) => {
                return Err(self.violation(
                    &token,
                    StructureKind::CircularQueue,
                    "Queue is full! Cannot enqueue.",
                    e,
                ))
            }
        };
        let frame = Frame::new(self.scene(StructureKind::CircularQueue))
            .with_highlights([Highlight::at(slot, HighlightKind::Inserted)]);
        let message = format!("Enqueued {} into circular queue", format_value(value));
        self.animate(&token, frame, &message).await?;
        Ok(slot)
    }

    pub async fn circular_dequeue(&mut self) -> Result<f64> {
        let token = self.claim()?;
        let Some(front) = self.circular.front() else {
            return Err(self.violation(
                &token,
                StructureKind::CircularQueue,
                "Queue is empty! Cannot dequeue.",
                StructureError::Empty("circular queue"),
            ));
        };
        let leaving = Frame::new(self.scene(StructureKind::CircularQueue))
            .with_highlights([Highlight::at(front, HighlightKind::Removed)]);
        self.sinks.render(&leaving);
        let value = self.circular.dequeue()?;
        let message = format!("Dequeued {} from circular queue", format_value(value));
        self.animate(&token, Frame::new(self.scene(StructureKind::CircularQueue)), &message)
            .await?;
        Ok(value)
    }

    /// Change the circular queue capacity (`3..=10`). The queue is emptied.
    pub fn set_capacity(&mut self, text: &str) -> Result<()> {
        if self.control.is_active() {
            return Err(Error::Busy);
        }
        let capacity = parse_index(text).and_then(|c| self.circular.set_capacity(c).map(|()| c));
        let capacity = match capacity {
            Ok(c) => c,
            Err(e) => {
                self.sinks.status("Please enter a valid size between 3 and 10.");
                return Err(e.into());
            }
        };
        self.render(StructureKind::CircularQueue);
        self.sinks.status(&format!("Circular queue size set to {capacity}"));
        Ok(())
    }

    // Shared

    /// Replace `kind`'s contents with random values.
    pub fn random_fill(&mut self, kind: StructureKind) -> Result<usize> {
        if self.control.is_active() {
            return Err(Error::Busy);
        }
        let count = match kind {
            StructureKind::CircularQueue => {
                self.circular.clear();
                let count = self.circular.random_fill_count(&mut self.rng);
                for _ in 0..count {
                    let value = f64::from(self.rng.gen_range(1u32..100));
                    self.circular.enqueue(value)?;
                }
                count
            }
            _ => {
                let items = random_items(&mut self.rng);
                self.clear(kind);
                for &value in &items {
                    match kind {
                        StructureKind::Stack => self.stack.push(value),
                        StructureKind::Queue => self.queue.enqueue(value),
                        StructureKind::Array => self.array.insert(self.array.len(), value)?,
                        _ => self.deque.insert_rear(value),
                    }
                }
                items.len()
            }
        };
        debug!(structure = kind.name(), count, "random fill");
        self.render(kind);
        self.sinks
            .status(&format!("Generated random {} with {count} elements.", kind.name()));
        Ok(count)
    }

    fn clear(&mut self, kind: StructureKind) {
        match kind {
            StructureKind::Stack => self.stack.clear(),
            StructureKind::Queue => self.queue.clear(),
            StructureKind::Array => self.array.clear(),
            StructureKind::Deque => self.deque.clear(),
            StructureKind::CircularQueue => self.circular.clear(),
        }
    }

    /// Empty `kind`. The circular queue keeps its capacity.
    pub fn reset(&mut self, kind: StructureKind) -> Result<()> {
        if self.control.is_active() {
            return Err(Error::Busy);
        }
        self.clear(kind);
        let frame = match kind {
            StructureKind::Deque => Frame::new(self.scene(kind)).with_caption(DequeOp::overview()),
            _ => Frame::new(self.scene(kind)),
        };
        self.sinks.render(&frame);
        let name = match kind {
            StructureKind::CircularQueue => "Circular queue".to_string(),
            other => {
                let name = other.name();
                let mut chars = name.chars();
                chars
                    .next()
                    .map(|c| c.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            }
        };
        self.sinks.status(&format!("{name} has been reset."));
        Ok(())
    }

    /// Capacity of a fresh circular queue.
    pub fn default_capacity() -> usize {
        DEFAULT_CIRCULAR_CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::control::RunState;
    use crate::sink::RecordingSink;

    fn mutator() -> (StructureMutator, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let mutator = StructureMutator::new(RunControl::new(), Sinks::recording(sink.clone()))
            .with_pacer(Pacer::immediate())
            .with_seed(7);
        (mutator, sink)
    }

    #[tokio::test]
    async fn stack_push_pop_and_search() {
        let (mut m, sink) = mutator();
        m.push("1").await.unwrap();
        m.push("2").await.unwrap();
        m.push("3").await.unwrap();
        assert_eq!(sink.last_message().unwrap(), "Pushed 3 onto the stack. Stack size: 3");

        assert_eq!(m.search_stack("1").await.unwrap(), Some(2));
        assert_eq!(
            sink.last_frame().unwrap().highlights,
            vec![Highlight::at(0, HighlightKind::Found)]
        );
        assert_eq!(m.search_stack("9").await.unwrap(), None);
        assert!(sink.last_frame().unwrap().has(HighlightKind::Shake));

        assert_eq!(m.pop().await.unwrap(), 3.0);
        assert_eq!(m.peek().await.unwrap(), 2.0);
        assert_eq!(m.control().state(), RunState::Done);
    }

    #[tokio::test]
    async fn empty_pop_shakes_and_reports() {
        let (mut m, sink) = mutator();
        assert_eq!(m.pop().await, Err(Error::Structure(StructureError::Empty("stack"))));
        assert!(sink.last_frame().unwrap().has(HighlightKind::Shake));
        assert_eq!(sink.last_message().unwrap(), "Cannot pop from an empty stack.");
        assert!(!m.control().is_active());
    }

    #[tokio::test]
    async fn invalid_input_changes_nothing() {
        let (mut m, sink) = mutator();
        assert!(matches!(m.push("abc").await, Err(Error::InvalidInput(_))));
        assert!(matches!(m.enqueue("  ").await, Err(Error::InvalidInput(ParseError::Empty))));
        assert!(m.stack().is_empty());
        assert!(m.queue().is_empty());
        assert_eq!(sink.frame_count(), 0);
    }

    #[tokio::test]
    async fn queue_is_fifo() {
        let (mut m, _) = mutator();
        for v in ["4", "5", "6"] {
            m.enqueue(v).await.unwrap();
        }
        assert_eq!(m.dequeue().await.unwrap(), 4.0);
        assert_eq!(m.queue().items(), vec![5.0, 6.0]);
    }

    #[tokio::test]
    async fn array_insert_delete_and_search() {
        let (mut m, sink) = mutator();
        m.insert_at("10", "0").await.unwrap();
        m.insert_at("30", "1").await.unwrap();
        m.insert_at("20", "1").await.unwrap();
        m.insert_at("10", "3").await.unwrap();
        assert_eq!(m.array().items(), &[10.0, 20.0, 30.0, 10.0]);
        assert!(m.insert_at("5", "9").await.is_err());
        assert!(m.insert_at("5", "-1").await.is_err());

        assert_eq!(m.search_array("10").await.unwrap(), vec![0, 3]);
        assert_eq!(sink.last_message().unwrap(), "Found 10 at position(s): 0, 3");

        assert!(m.delete_at("4").await.is_err());
        assert_eq!(m.delete_at("1").await.unwrap(), 20.0);
        assert_eq!(m.array().items(), &[10.0, 30.0, 10.0]);
    }

    #[tokio::test]
    async fn deque_operations_caption_each_step() {
        let (mut m, sink) = mutator();
        m.insert_front("2").await.unwrap();
        m.insert_front("1").await.unwrap();
        m.insert_rear("3").await.unwrap();
        assert_eq!(m.deque().items(), vec![1.0, 2.0, 3.0]);
        assert!(sink
            .last_frame()
            .unwrap()
            .caption
            .unwrap()
            .starts_with("deque.insertRear(3)"));

        assert_eq!(m.delete_rear().await.unwrap(), 3.0);
        assert_eq!(sink.last_message().unwrap(), "Deleted 3 from rear");
        assert_eq!(m.delete_front().await.unwrap(), 1.0);
        m.delete_front().await.unwrap();
        assert!(m.delete_rear().await.is_err());
        assert_eq!(sink.last_message().unwrap(), "Deque is empty! Cannot delete from rear.");
    }

    #[tokio::test]
    async fn circular_queue_fills_to_capacity() {
        let (mut m, sink) = mutator();
        for (i, v) in ["1", "2", "3", "4", "5"].iter().enumerate() {
            assert_eq!(m.circular_enqueue(v).await.unwrap(), i);
        }
        assert_eq!(
            m.circular_enqueue("6").await,
            Err(Error::Structure(StructureError::Full("circular queue")))
        );
        assert_eq!(sink.last_message().unwrap(), "Queue is full! Cannot enqueue.");
        for expected in 1..=5 {
            assert_eq!(m.circular_dequeue().await.unwrap(), f64::from(expected));
        }
        assert!(m.circular_dequeue().await.is_err());
        assert!(m.circular().front().is_none());
    }

    #[tokio::test]
    async fn capacity_bounds() {
        let (mut m, _) = mutator();
        assert!(m.set_capacity("2").is_err());
        assert!(m.set_capacity("11").is_err());
        m.set_capacity("3").unwrap();
        assert_eq!(m.circular().capacity(), 3);
        assert_eq!(StructureMutator::default_capacity(), 5);
    }

    #[test]
    fn random_fill_sizes() {
        let (mut m, sink) = mutator();
        let n = m.random_fill(StructureKind::Stack).unwrap();
        assert!((3..=7).contains(&n));
        assert_eq!(m.stack().len(), n);
        assert!(sink.last_message().unwrap().starts_with("Generated random stack"));

        let n = m.random_fill(StructureKind::CircularQueue).unwrap();
        assert!((1..5).contains(&n));
        assert!(!m.circular().is_full());
        assert!(m.circular().items().iter().all(|v| (1.0..100.0).contains(v)));
    }

    #[test]
    fn reset_empties_and_reports() {
        let (mut m, sink) = mutator();
        m.random_fill(StructureKind::Deque).unwrap();
        m.reset(StructureKind::Deque).unwrap();
        assert!(m.deque().is_empty());
        assert_eq!(sink.last_message().unwrap(), "Deque has been reset.");
        m.reset(StructureKind::CircularQueue).unwrap();
        assert_eq!(sink.last_message().unwrap(), "Circular queue has been reset.");
    }

    #[tokio::test]
    async fn operations_are_refused_while_a_run_is_active() {
        let (mut m, _) = mutator();
        let _token = m.control().begin().unwrap();
        assert_eq!(m.push("1").await, Err(Error::Busy));
        assert_eq!(m.random_fill(StructureKind::Array), Err(Error::Busy));
        assert!(m.stack().is_empty());
    }
}
