//! "Moving on" acknowledgements.
//!
//! Once a question's follow-up budget is spent, the candidate is told the
//! interview is moving on with one of a fixed set of messages instead of the
//! evaluator's own text. The choice of message goes through a [`Picker`] so
//! tests can make it deterministic.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The fixed acknowledgement messages.
pub const ACKNOWLEDGEMENTS: [&str; 10] = [
    "Awesome, let's keep going with the next question.",
    "Perfect, moving on to the next one now.",
    "Great job! Let's tackle the next question.",
    "Sounds good! Let's proceed to the next question.",
    "Excellent, let's continue with the next question.",
    "Nice work! On to the next question.",
    "Alright, let's move forward to the next question.",
    "Good stuff! Let's check out the next question.",
    "Well done! Let's head to the next question.",
    "Fantastic, let's go to the next question now.",
];

/// Chooses an index in `0..len`. `len` is never zero.
pub trait Picker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniformly random selection.
#[derive(Debug, Default)]
pub struct RandomPicker;

impl Picker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Cycles through the pool in order, starting at the first message.
#[derive(Debug, Default)]
pub struct RoundRobinPicker {
    next: AtomicUsize,
}

impl Picker for RoundRobinPicker {
    fn pick(&self, len: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % len
    }
}

/// A pool of acknowledgement messages and the policy for choosing among them.
pub struct Acknowledgements {
    messages: Vec<String>,
    picker: Box<dyn Picker>,
}

impl Acknowledgements {
    /// The standard pool with random selection.
    pub fn standard() -> Self {
        Self::with_picker(Box::new(RandomPicker))
    }

    /// The standard pool with a caller-supplied selection policy.
    pub fn with_picker(picker: Box<dyn Picker>) -> Self {
        Self {
            messages: ACKNOWLEDGEMENTS.iter().map(|m| m.to_string()).collect(),
            picker,
        }
    }

    /// Returns the next acknowledgement.
    pub fn next_message(&self) -> &str {
        let idx = self.picker.pick(self.messages.len()) % self.messages.len();
        &self.messages[idx]
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Default for Acknowledgements {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Acknowledgements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Acknowledgements")
            .field("messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}
