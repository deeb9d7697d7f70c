/// Easing curves.
pub mod ease;
/// Loop phase.
pub mod phase;
