use crate::cache::NotifiedCache;
use crate::config::WatchConfig;
use crate::feed::{AircraftRecord, AircraftSource, FeedError};
use crate::geo::{haversine_km, Position};
use crate::notifier::{Notification, Notifier, NotifyError};
use crate::scheduler::ScheduledTask;

#[derive(Debug)]
pub enum CycleError {
    Feed(FeedError),
    Notify(NotifyError),
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleError::Feed(error) => write!(f, "{error}"),
            CycleError::Notify(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CycleError::Feed(error) => Some(error),
            CycleError::Notify(error) => Some(error),
        }
    }
}

impl From<FeedError> for CycleError {
    fn from(error: FeedError) -> Self {
        CycleError::Feed(error)
    }
}

impl From<NotifyError> for CycleError {
    fn from(error: NotifyError) -> Self {
        CycleError::Notify(error)
    }
}

/// Owns one poll-filter-notify cycle: the feed source, the proximity
/// thresholds, the dedup cache and the notifier.
pub struct Watcher<S, N> {
    source: S,
    notifier: N,
    cache: NotifiedCache,
    home: Position,
    max_distance_km: f64,
    max_altitude_ft: f64,
}

impl<S, N> Watcher<S, N>
where
    S: AircraftSource,
    N: Notifier,
{
    #[must_use]
    pub fn new(config: &WatchConfig, source: S, notifier: N) -> Self {
        Watcher {
            source,
            notifier,
            cache: NotifiedCache::new(chrono::TimeDelta::minutes(
                config.notification_window_minutes,
            )),
            home: Position::new(config.home_latitude, config.home_longitude),
            max_distance_km: config.max_distance_km,
            max_altitude_ft: config.max_altitude_ft,
        }
    }

    /// One full cycle: prune the cache, fetch the feed, notify every
    /// qualifying aircraft not already notified inside the window.
    /// Returns the number of notifications sent.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::Feed` if the fetch or decode fails, and
    /// `CycleError::Notify` if a delivery fails; either way the rest of
    /// the cycle is abandoned.
    pub fn run_cycle(&mut self, now: chrono::DateTime<chrono::Utc>) -> Result<usize, CycleError> {
        self.cache.prune(now);

        let records = self.source.fetch()?;

        let mut sent = 0;
        for record in records {
            let Some(notification) = self.evaluate(&record) else {
                continue;
            };
            if self.cache.is_suppressed(&notification.flight) {
                continue;
            }
            // Recorded before delivery, so a failed POST is not retried
            // within the window
            self.cache.record(notification.flight.clone(), now);
            log::info!("{}", notification.console_line());
            self.notifier.notify(&notification)?;
            sent += 1;
        }
        Ok(sent)
    }

    // A record qualifies iff it has a position, a reported altitude at or
    // below the ceiling, and is within the distance threshold of home.
    // Records without an altitude are skipped like records without a
    // position.
    fn evaluate(&self, record: &AircraftRecord) -> Option<Notification> {
        let (Some(latitude), Some(longitude)) = (record.lat, record.lon) else {
            return None;
        };
        let altitude_ft = record.alt_baro?;

        let distance_km = haversine_km(&self.home, &Position::new(latitude, longitude));
        if distance_km > self.max_distance_km || altitude_ft > self.max_altitude_ft {
            return None;
        }

        Some(Notification {
            flight: record.flight_code().to_owned(),
            distance_km,
            altitude_ft,
            latitude,
            longitude,
        })
    }
}

impl<S, N> ScheduledTask for Watcher<S, N>
where
    S: AircraftSource + Send + 'static,
    N: Notifier + Send + 'static,
{
    fn step(&mut self) -> bool {
        match self.run_cycle(chrono::Utc::now()) {
            Ok(sent) => {
                if sent > 0 {
                    log::debug!("Cycle complete, {sent} notification(s) sent");
                }
            }
            Err(error) => log::error!("Cycle failed: {error}"),
        }
        true
    }
}
