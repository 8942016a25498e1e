//! WMO weather interpretation codes as reported by Open-Meteo.

/// Catalogued description for `code`, if the table knows it.
pub fn lookup(code: i32) -> Option<&'static str> {
    let description = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        _ => return None,
    };

    Some(description)
}

/// Human-readable description for any code; unknown codes name themselves.
pub fn describe(code: i32) -> String {
    match lookup(code) {
        Some(description) => description.to_string(),
        None => format!("Unknown weather code: {code}"),
    }
}
