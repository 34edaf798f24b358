//! Signal event streams and trade direction.
//!
//! Signals arrive from an external generator as ascending [`TimeIndex`]
//! sequences. Entries are split into long and short sub-streams so the
//! direction of each sequenced trade can be recovered after pairing.

use std::collections::BTreeSet;
use std::fmt;

/// Zero-based position into the ordered sequence of trading dates.
pub type TimeIndex = usize;

/// Ascending (non-strictly) sequence of signal time indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStream {
    events: Vec<TimeIndex>,
}

impl EventStream {
    /// Wraps an already ascending sequence.
    pub fn new(events: Vec<TimeIndex>) -> Self {
        Self { events }
    }

    /// Builds a stream from events in any order.
    pub fn from_unsorted(mut events: Vec<TimeIndex>) -> Self {
        events.sort_unstable();
        Self { events }
    }

    pub fn as_slice(&self) -> &[TimeIndex] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, index: TimeIndex) -> bool {
        self.events.binary_search(&index).is_ok()
    }

    /// Returns a copy of this stream with every index present in `other` removed.
    pub fn without(&self, other: &EventStream) -> EventStream {
        let blocked: BTreeSet<TimeIndex> = other.events.iter().copied().collect();
        EventStream {
            events: self
                .events
                .iter()
                .copied()
                .filter(|e| !blocked.contains(e))
                .collect(),
        }
    }

    /// Merges two ascending streams, keeping duplicates.
    pub fn merge(&self, other: &EventStream) -> EventStream {
        let mut merged = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < self.events.len() && j < other.events.len() {
            if self.events[i] <= other.events[j] {
                merged.push(self.events[i]);
                i += 1;
            } else {
                merged.push(other.events[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&self.events[i..]);
        merged.extend_from_slice(&other.events[j..]);
        EventStream { events: merged }
    }
}

impl From<Vec<TimeIndex>> for EventStream {
    fn from(events: Vec<TimeIndex>) -> Self {
        EventStream::new(events)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Sign applied to the pair return: `+1` long, `-1` short.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// Entry signals partitioned by the direction they open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedEntries {
    pub long: EventStream,
    pub short: EventStream,
}

impl TaggedEntries {
    pub fn new(long: EventStream, short: EventStream) -> Self {
        Self { long, short }
    }

    /// The single stream the sequencer pairs against exits.
    pub fn merged(&self) -> EventStream {
        self.long.merge(&self.short)
    }

    /// Direction of a trade opened at `entry`. Long takes precedence when
    /// the index appears in both sub-streams.
    pub fn direction_of(&self, entry: TimeIndex) -> Direction {
        if self.long.contains(entry) {
            Direction::Long
        } else {
            Direction::Short
        }
    }
}

/// Every signal for one evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalSet {
    pub entries: TaggedEntries,
    pub exits: EventStream,
}

impl SignalSet {
    /// Exits that do not coincide with any entry index.
    pub fn non_coincident_exits(&self) -> EventStream {
        self.exits.without(&self.entries.merged())
    }

    /// Largest index referenced by any stream.
    pub fn max_index(&self) -> Option<TimeIndex> {
        [&self.entries.long, &self.entries.short, &self.exits]
            .iter()
            .filter_map(|s| s.as_slice().last().copied())
            .max()
    }
}
