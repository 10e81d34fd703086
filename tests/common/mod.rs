//! Element type with instrumented lifetimes, shared by the integration tests.

use std::cell::Cell;
use std::thread::LocalKey;

thread_local! {
    static CONSTRUCTIONS: Cell<u64> = const { Cell::new(0) };
    static DESTRUCTIONS: Cell<u64> = const { Cell::new(0) };
    static COPIES: Cell<u64> = const { Cell::new(0) };
}

fn bump(counter: &'static LocalKey<Cell<u64>>) {
    counter.with(|count| count.set(count.get() + 1));
}

/// Per-thread tally of [`Foo`] lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub constructions: u64,
    pub destructions: u64,
    pub copies: u64,
}

impl Counters {
    pub fn reset() {
        for counter in [&CONSTRUCTIONS, &DESTRUCTIONS, &COPIES] {
            counter.with(|count| count.set(0));
        }
    }

    pub fn snapshot() -> Self {
        Self {
            constructions: CONSTRUCTIONS.with(Cell::get),
            destructions: DESTRUCTIONS.with(Cell::get),
            copies: COPIES.with(Cell::get),
        }
    }

    /// Number of `Foo` values currently alive on this thread.
    pub fn live(self) -> u64 {
        self.constructions + self.copies - self.destructions
    }
}

/// Counts default constructions, clones and drops. Moves are not observable.
#[derive(Debug)]
pub struct Foo {
    payload: Box<u32>,
}

impl Default for Foo {
    fn default() -> Self {
        bump(&CONSTRUCTIONS);
        Self {
            payload: Box::new(0),
        }
    }
}

impl Clone for Foo {
    fn clone(&self) -> Self {
        bump(&COPIES);
        Self {
            payload: self.payload.clone(),
        }
    }
}

impl Drop for Foo {
    fn drop(&mut self) {
        bump(&DESTRUCTIONS);
    }
}
