//! Error taxonomy shared by the client and the session.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The geocoding service returned no match for the queried name.
    #[error("No location found for '{0}'")]
    NotFound(String),

    /// Transport failure, timeout or a non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    /// A weather view was requested before any location was set.
    #[error("No location set")]
    NoLocation,

    #[error("City name must not be empty")]
    EmptyQuery,

    /// A successful response whose body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl WeatherError {
    /// Short message suitable for showing directly to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(city) => format!("Could not find {city}"),
            Self::Network(_) => "Unable to reach the weather service. Check your connection.".to_string(),
            Self::NoLocation => "Please set a location first.".to_string(),
            Self::EmptyQuery => "Please enter a valid city name.".to_string(),
            Self::InvalidResponse(_) => "The weather service returned unexpected data.".to_string(),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_city() {
        let err = WeatherError::NotFound("Atlantis".into());
        assert!(err.to_string().contains("Atlantis"));
        assert_eq!(err.user_message(), "Could not find Atlantis");
    }

    #[test]
    fn no_location_points_at_setting_one() {
        assert!(WeatherError::NoLocation.user_message().contains("set a location"));
    }

    #[test]
    fn network_message_hides_transport_details() {
        let err = WeatherError::Network("dns error: no such host".into());
        assert!(err.to_string().contains("dns error"));
        assert!(!err.user_message().contains("dns"));
    }
}
