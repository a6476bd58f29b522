use crate::config::TelegramConfig;
use crate::feed::UNAVAILABLE_FLIGHT;

const FLIGHTAWARE_LIVE_URL: &str = "https://www.flightaware.com/live/flight";

/// Everything needed to announce one qualifying aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub flight: String,
    pub distance_km: f64,
    pub altitude_ft: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Notification {
    /// FlightAware live-tracking link, or "N/A" when the flight code is
    /// unavailable.
    #[must_use]
    pub fn tracking_link(&self) -> String {
        if self.flight == UNAVAILABLE_FLIGHT {
            String::from("N/A")
        } else {
            format!("{FLIGHTAWARE_LIVE_URL}/{0}", self.flight)
        }
    }

    /// Markdown body for the Telegram message.
    #[must_use]
    pub fn message_text(&self) -> String {
        format!(
            "\u{2708}\u{fe0f} *New plane spotted:*\n\n\
             *Flight:* [{0}]({1})\n\
             *Distance:* {2:.2} km\n\
             *Altitude:* {3} ft\n\
             *Latitude:* {4}\n\
             *Longitude:* {5}",
            self.flight,
            self.tracking_link(),
            self.distance_km,
            self.altitude_ft,
            self.latitude,
            self.longitude,
        )
    }

    /// Single console line; the logger supplies the timestamp.
    #[must_use]
    pub fn console_line(&self) -> String {
        format!(
            "Flight {0} | Distance: {1:.2} km | Altitude: {2} ft | Latitude: {3} | Longitude: {4} | FlightAware: {5}",
            self.flight,
            self.distance_km,
            self.altitude_ft,
            self.latitude,
            self.longitude,
            self.tracking_link(),
        )
    }
}

#[derive(Debug)]
pub enum NotifyError {
    Http(Box<ureq::Error>),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Http(error) => write!(f, "Failed to deliver notification: {error}"),
        }
    }
}

impl std::error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotifyError::Http(error) => Some(error),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Delivers notifications to the Telegram bot API. One POST per
/// notification, no retry; a failed delivery fails the cycle.
pub struct TelegramNotifier {
    agent: ureq::Agent,
    api_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(config: &TelegramConfig) -> Self {
        TelegramNotifier {
            agent: ureq::AgentBuilder::new().build(),
            api_url: config.api_url.clone(),
            chat_id: config.chat_id.clone(),
        }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": notification.message_text(),
            "parse_mode": "Markdown",
        });
        self.agent
            .post(&self.api_url)
            .send_json(body)
            .map_err(|error| NotifyError::Http(Box::new(error)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Notification;
    use crate::feed::UNAVAILABLE_FLIGHT;

    fn test_notification(flight: &str) -> Notification {
        Notification {
            flight: String::from(flight),
            distance_km: 5.0004,
            altitude_ft: 10_000.0,
            latitude: 40.04497,
            longitude: 10.0,
        }
    }

    #[test]
    fn when_flight_code_is_known_then_link_points_to_flightaware() {
        let notification = test_notification("TEST1");
        assert_eq!(
            notification.tracking_link(),
            "https://www.flightaware.com/live/flight/TEST1"
        );
    }

    #[test]
    fn when_flight_code_is_unavailable_then_link_is_not_applicable() {
        let notification = test_notification(UNAVAILABLE_FLIGHT);
        assert_eq!(notification.tracking_link(), "N/A");
    }

    #[test]
    fn when_formatting_message_then_fields_are_rendered() {
        let message = test_notification("TEST1").message_text();

        assert!(message.contains("*New plane spotted:*"));
        assert!(message.contains("[TEST1](https://www.flightaware.com/live/flight/TEST1)"));
        assert!(message.contains("*Distance:* 5.00 km"));
        assert!(message.contains("*Altitude:* 10000 ft"));
        assert!(message.contains("*Latitude:* 40.04497"));
        assert!(message.contains("*Longitude:* 10"));
    }

    #[test]
    fn when_formatting_console_line_then_fields_are_rendered() {
        let line = test_notification("TEST1").console_line();

        assert!(line.starts_with("Flight TEST1 | "));
        assert!(line.contains("Distance: 5.00 km"));
        assert!(line.contains("Altitude: 10000 ft"));
        assert!(line.contains("FlightAware: https://www.flightaware.com/live/flight/TEST1"));
    }
}
