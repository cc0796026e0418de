//! Static catalog mapping WeatherAPI condition codes to display descriptors.
//!
//! The catalog is read-only process-wide data; `lookup` never fails. Codes
//! missing from the table resolve to [`DEFAULT`].

/// Visual descriptor for one weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionInfo {
    pub label: &'static str,
    /// Icon identifier understood by the display layer.
    pub icon: &'static str,
    /// Background style key understood by the display layer.
    pub background: &'static str,
}

/// Descriptor returned for any code not present in the catalog.
pub const DEFAULT: ConditionInfo = ConditionInfo {
    label: "Weather",
    icon: "cloud",
    background: "weather-cloudy",
};

/// Resolve a provider condition code to its display descriptor.
pub fn lookup(code: &str) -> &'static ConditionInfo {
    match code {
        // Clear / sunny
        "1000" => &ConditionInfo {
            label: "Sunny",
            icon: "sun",
            background: "weather-sunny",
        },
        "1003" => &ConditionInfo {
            label: "Partly cloudy",
            icon: "cloud-sun",
            background: "weather-cloudy",
        },
        // Cloud cover
        "1006" => &ConditionInfo {
            label: "Cloudy",
            icon: "cloud",
            background: "weather-cloudy",
        },
        "1009" => &ConditionInfo {
            label: "Overcast",
            icon: "cloudy",
            background: "weather-cloudy",
        },
        // Mist / fog
        "1030" => &ConditionInfo {
            label: "Mist",
            icon: "cloud-fog",
            background: "weather-foggy",
        },
        "1135" => &ConditionInfo {
            label: "Fog",
            icon: "cloud-fog",
            background: "weather-foggy",
        },
        // Rain
        "1063" => &ConditionInfo {
            label: "Patchy rain",
            icon: "cloud-drizzle",
            background: "weather-rainy",
        },
        "1180" => &ConditionInfo {
            label: "Light rain",
            icon: "cloud-rain",
            background: "weather-rainy",
        },
        "1183" => &ConditionInfo {
            label: "Moderate rain",
            icon: "cloud-rain",
            background: "weather-rainy",
        },
        "1186" => &ConditionInfo {
            label: "Heavy rain",
            icon: "cloud-rain",
            background: "weather-rainy",
        },
        // Snow
        "1066" => &ConditionInfo {
            label: "Patchy snow",
            icon: "cloud-snow",
            background: "weather-snowy",
        },
        "1210" => &ConditionInfo {
            label: "Light snow",
            icon: "snowflake",
            background: "weather-snowy",
        },
        "1213" => &ConditionInfo {
            label: "Moderate snow",
            icon: "cloud-snow",
            background: "weather-snowy",
        },
        "1216" => &ConditionInfo {
            label: "Heavy snow",
            icon: "cloud-snow",
            background: "weather-snowy",
        },
        // Thunder
        "1087" => &ConditionInfo {
            label: "Thundery outbreaks",
            icon: "cloud-lightning",
            background: "weather-stormy",
        },
        "1273" => &ConditionInfo {
            label: "Thunder",
            icon: "cloud-lightning",
            background: "weather-stormy",
        },
        _ => &DEFAULT,
    }
}
