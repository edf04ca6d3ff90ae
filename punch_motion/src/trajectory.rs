//! Per-side trajectory store.
//!
//! Each side keeps the last `capacity` samples in a ring buffer indexed by a
//! write cursor.  Storage is reserved once at construction; appends never
//! allocate and eviction is O(1).

use crate::error::{MotionError, Result};
use crate::landmark::Side;

/// Default number of samples kept per side.
pub const DEFAULT_HISTORY_LEN: usize = 12;

// ════════════════════════════════════════════════════════════════════════════
// Point / Sample
// ════════════════════════════════════════════════════════════════════════════

/// Pixel-space position with optional depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }
}

/// One frame's worth of arm geometry for a single side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Monotonic seconds.
    pub timestamp: f64,
    pub wrist: Point,
    pub shoulder: Point,
    pub elbow: Option<Point>,
}

impl Sample {
    pub fn new(timestamp: f64, wrist: Point, shoulder: Point) -> Self {
        Self { timestamp, wrist, shoulder, elbow: None }
    }

    pub fn with_elbow(mut self, elbow: Point) -> Self {
        self.elbow = Some(elbow);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Window: read-only, oldest-first view
// ════════════════════════════════════════════════════════════════════════════

/// Ordered view over a trajectory.  The ring buffer may wrap, so the view is
/// two slices: `older` followed by `newer`.
#[derive(Clone, Copy, Debug)]
pub struct Window<'a> {
    older: &'a [Sample],
    newer: &'a [Sample],
}

impl<'a> Window<'a> {
    /// View over samples already in time order.
    pub fn from_slice(samples: &'a [Sample]) -> Self {
        Self { older: samples, newer: &[] }
    }

    pub fn len(&self) -> usize {
        self.older.len() + self.newer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `i`-th sample counting from the oldest.
    pub fn get(&self, i: usize) -> Option<&'a Sample> {
        if i < self.older.len() {
            self.older.get(i)
        } else {
            self.newer.get(i - self.older.len())
        }
    }

    /// `k`-th sample counting back from the newest; `back(0)` is the newest.
    pub fn back(&self, k: usize) -> Option<&'a Sample> {
        self.len().checked_sub(k + 1).and_then(|i| self.get(i))
    }

    pub fn newest(&self) -> Option<&'a Sample> {
        self.back(0)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a Sample> + Clone + 'a {
        let (older, newer) = (self.older, self.newer);
        older.iter().chain(newer.iter())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Trajectory: one side's ring buffer
// ════════════════════════════════════════════════════════════════════════════

/// Fixed-capacity sample history for one side.
#[derive(Clone, Debug)]
pub struct Trajectory {
    slots: Vec<Sample>,
    capacity: usize,
    /// Next slot to overwrite once the buffer is full.
    write_index: usize,
}

impl Trajectory {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MotionError::InvalidCapacity(capacity));
        }
        Ok(Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            write_index: 0,
        })
    }

    pub fn push(&mut self, sample: Sample) {
        if self.slots.len() < self.capacity {
            self.slots.push(sample);
        } else {
            self.slots[self.write_index] = sample;
        }
        self.write_index = (self.write_index + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first view.  Before the first wrap `write_index == len`, so
    /// the same split works for both the filling and the full buffer.
    pub fn window(&self) -> Window<'_> {
        let (newer, older) = self.slots.split_at(self.write_index.min(self.slots.len()));
        Window { older, newer }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.write_index = 0;
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Self {
            slots: Vec::with_capacity(DEFAULT_HISTORY_LEN),
            capacity: DEFAULT_HISTORY_LEN,
            write_index: 0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrajectoryStore: both sides
// ════════════════════════════════════════════════════════════════════════════

/// Left and right trajectories with a shared, fixed capacity.
#[derive(Clone, Debug)]
pub struct TrajectoryStore {
    sides: [Trajectory; 2],
}

impl TrajectoryStore {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            sides: [Trajectory::new(capacity)?, Trajectory::new(capacity)?],
        })
    }

    pub fn append(&mut self, side: Side, sample: Sample) {
        self.sides[side.index()].push(sample);
    }

    pub fn window(&self, side: Side) -> Window<'_> {
        self.sides[side.index()].window()
    }

    pub fn len(&self, side: Side) -> usize {
        self.sides[side.index()].len()
    }

    pub fn capacity(&self) -> usize {
        self.sides[0].capacity()
    }

    pub fn clear(&mut self) {
        for t in self.sides.iter_mut() {
            t.clear();
        }
    }
}

impl Default for TrajectoryStore {
    fn default() -> Self {
        Self { sides: [Trajectory::default(), Trajectory::default()] }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
