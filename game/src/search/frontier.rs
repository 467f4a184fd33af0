use coord_2d::Coord;
use direction::CardinalDirection;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityEntry {
    pub priority: u32,
    pub sequence: u64,
    pub coord: Coord,
    /// Accumulated entry cost from the start when this entry was pushed.
    pub cost: u32,
}

impl PartialOrd for PriorityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityEntry {
    // Reversed so the max-heap pops the lowest priority first, and among equal priorities the
    // entry that was pushed first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackEntry {
    pub coord: Coord,
    /// Direction moved to reach `coord` from the cell that pushed it.
    pub via: Option<CardinalDirection>,
}

#[derive(Debug, Clone)]
pub enum Frontier {
    Fifo(VecDeque<Coord>),
    Lifo(Vec<StackEntry>),
    Priority {
        heap: BinaryHeap<PriorityEntry>,
        next_sequence: u64,
    },
}

impl Frontier {
    pub fn fifo() -> Self {
        Self::Fifo(VecDeque::new())
    }

    pub fn lifo() -> Self {
        Self::Lifo(Vec::new())
    }

    pub fn priority() -> Self {
        Self::Priority {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo(queue) => queue.len(),
            Self::Lifo(stack) => stack.len(),
            Self::Priority { heap, .. } => heap.len(),
        }
    }

    pub fn push_back(&mut self, coord: Coord) {
        if let Self::Fifo(queue) = self {
            queue.push_back(coord);
        }
    }

    pub fn pop_front(&mut self) -> Option<Coord> {
        match self {
            Self::Fifo(queue) => queue.pop_front(),
            _ => None,
        }
    }

    pub fn push_stack(&mut self, entry: StackEntry) {
        if let Self::Lifo(stack) = self {
            stack.push(entry);
        }
    }

    pub fn pop_stack(&mut self) -> Option<StackEntry> {
        match self {
            Self::Lifo(stack) => stack.pop(),
            _ => None,
        }
    }

    pub fn push_priority(&mut self, coord: Coord, priority: u32, cost: u32) {
        if let Self::Priority {
            heap,
            next_sequence,
        } = self
        {
            heap.push(PriorityEntry {
                priority,
                sequence: *next_sequence,
                coord,
                cost,
            });
            *next_sequence += 1;
        }
    }

    pub fn pop_priority(&mut self) -> Option<PriorityEntry> {
        match self {
            Self::Priority { heap, .. } => heap.pop(),
            _ => None,
        }
    }
}
