/// Tracks which flights have already been notified, keyed by flight code.
/// An entry is kept for one notification window; once it falls out, the
/// flight becomes eligible to notify again.
#[derive(Debug)]
pub struct NotifiedCache {
    window: chrono::TimeDelta,
    entries: std::collections::HashMap<String, chrono::DateTime<chrono::Utc>>,
}

impl NotifiedCache {
    #[must_use]
    pub fn new(window: chrono::TimeDelta) -> Self {
        NotifiedCache {
            window,
            entries: std::collections::HashMap::new(),
        }
    }

    /// Drops every entry older than the window. An entry exactly at the
    /// window boundary is kept.
    pub fn prune(&mut self, now: chrono::DateTime<chrono::Utc>) {
        let window = self.window;
        self.entries.retain(|_, notified_at| now - *notified_at <= window);
    }

    #[must_use]
    pub fn is_suppressed(&self, flight: &str) -> bool {
        self.entries.contains_key(flight)
    }

    pub fn record(&mut self, flight: String, now: chrono::DateTime<chrono::Utc>) {
        self.entries.insert(flight, now);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
