use std::time::{Duration, Instant};

pub const COPIED_WINDOW: Duration = Duration::from_millis(2000);

/// Transient "copied" acknowledgment for a single key.
///
/// Marking again, for the same or another key, restarts the window.
#[derive(Debug, Clone)]
pub struct CopiedFlag<K> {
    active: Option<(K, Instant)>,
}

impl<K> Default for CopiedFlag<K> {
    fn default() -> Self {
        CopiedFlag { active: None }
    }
}

impl<K: PartialEq> CopiedFlag<K> {
    pub fn mark(&mut self, key: K, now: Instant) {
        self.active = Some((key, now));
    }

    pub fn is_set(&self, key: &K, now: Instant) -> bool {
        match &self.active {
            Some((active, at)) => active == key && now.saturating_duration_since(*at) < COPIED_WINDOW,
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Drops an elapsed acknowledgment. Returns true when something was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let elapsed = matches!(
            &self.active,
            Some((_, at)) if now.saturating_duration_since(*at) >= COPIED_WINDOW
        );
        if elapsed {
            self.active = None;
        }
        elapsed
    }
}
