/// Applies an event to shared game state and reports what happened.
///
/// The classifier owns the game state and whatever locking it needs:
/// applying the event and reading back its outcome must be atomic with
/// respect to other handlers running concurrently. By the time `apply`
/// returns, the change is committed; the dispatch core never retries or
/// undoes it.
pub trait OutcomeClassifier<E>: Send + Sync {
    type Outcome;

    fn apply(&self, event: &E) -> Self::Outcome;
}

impl<E, O, F> OutcomeClassifier<E> for F
where
    F: Fn(&E) -> O + Send + Sync,
{
    type Outcome = O;

    fn apply(&self, event: &E) -> O {
        self(event)
    }
}
