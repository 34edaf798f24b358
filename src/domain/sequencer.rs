//! Entry/exit event sequencing into non-overlapping trade intervals.
//!
//! The walk is a two-state automaton: [`SequencerState::Flat`] and
//! [`SequencerState::Open`]. Every consumed event goes through
//! [`transition`], and leaving `Open` on an exit is the only place an
//! interval is produced. Redundant entries while open and stray exits while
//! flat are absorbed. A position still open when both streams are exhausted
//! is dropped, never force-closed at the horizon.

use super::signal::{Direction, EventStream, TaggedEntries, TimeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradeInterval {
    pub entry: TimeIndex,
    pub exit: TimeIndex,
}

impl TradeInterval {
    /// Number of time steps the position is held, inclusive of both ends.
    pub fn span(&self) -> usize {
        self.exit - self.entry + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Flat,
    Open { entry: TimeIndex },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Entry(TimeIndex),
    Exit(TimeIndex),
}

/// Applies one event to the automaton, returning the next state and the
/// interval closed by this event, if any.
pub fn transition(state: SequencerState, event: Event) -> (SequencerState, Option<TradeInterval>) {
    match (state, event) {
        (SequencerState::Flat, Event::Entry(t)) => (SequencerState::Open { entry: t }, None),
        (open @ SequencerState::Open { .. }, Event::Entry(_)) => (open, None),
        (SequencerState::Open { entry }, Event::Exit(t)) => (
            SequencerState::Flat,
            Some(TradeInterval { entry, exit: t }),
        ),
        (SequencerState::Flat, Event::Exit(_)) => (SequencerState::Flat, None),
    }
}

/// Iterates both streams in chronological order. On equal indices the
/// entry is yielded first.
struct MergedEvents<'a> {
    entries: &'a [TimeIndex],
    exits: &'a [TimeIndex],
}

impl Iterator for MergedEvents<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        match (self.entries.first(), self.exits.first()) {
            (Some(&entry), Some(&exit)) if exit < entry => {
                self.exits = &self.exits[1..];
                Some(Event::Exit(exit))
            }
            (Some(&entry), _) => {
                self.entries = &self.entries[1..];
                Some(Event::Entry(entry))
            }
            (None, Some(&exit)) => {
                self.exits = &self.exits[1..];
                Some(Event::Exit(exit))
            }
            (None, None) => None,
        }
    }
}

/// Pairs entry and exit signals into ordered, non-overlapping intervals.
pub fn sequence(entries: &EventStream, exits: &EventStream) -> Vec<TradeInterval> {
    let events = MergedEvents {
        entries: entries.as_slice(),
        exits: exits.as_slice(),
    };

    let mut state = SequencerState::Flat;
    let mut intervals = Vec::new();
    for event in events {
        let (next, closed) = transition(state, event);
        intervals.extend(closed);
        state = next;
    }

    if let SequencerState::Open { entry } = state {
        tracing::warn!(entry, "dropping trailing open position");
    }
    tracing::debug!(
        entries = entries.len(),
        exits = exits.len(),
        intervals = intervals.len(),
        "sequenced trade intervals"
    );
    intervals
}

/// Intervals paired with the direction that opened each one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequencedTrades {
    pub intervals: Vec<TradeInterval>,
    pub directions: Vec<Direction>,
}

impl SequencedTrades {
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TradeInterval, &Direction)> {
        self.intervals.iter().zip(self.directions.iter())
    }
}

/// Sequences the merged long/short entry streams against exits and tags
/// each interval with its opening direction.
pub fn sequence_tagged(entries: &TaggedEntries, exits: &EventStream) -> SequencedTrades {
    let intervals = sequence(&entries.merged(), exits);
    let directions = intervals
        .iter()
        .map(|interval| entries.direction_of(interval.entry))
        .collect();
    SequencedTrades {
        intervals,
        directions,
    }
}
