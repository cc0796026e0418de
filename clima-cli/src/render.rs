//! Human-friendly terminal rendering of a weather snapshot.
//!
//! Reads only the published state; the unit preference picks which of the
//! snapshot's dual temperature fields to show.

use clima_core::model::{UnitSystem, WeatherSnapshot};
use clima_core::{conditions, format};

/// Print current conditions, the 7-day forecast, and the hourly window.
pub fn snapshot(weather: &WeatherSnapshot, units: UnitSystem) {
    let current = &weather.current;
    let info = conditions::lookup(&current.condition_code);

    println!(
        "{}, {} ({:.2}, {:.2})",
        weather.location.name, weather.location.country, weather.location.lat, weather.location.lon
    );
    println!(
        "{}  {}  (feels like {})",
        info.label,
        format::format_temperature(temp_for(current.temp_c, current.temp_f, units), units),
        format::format_temperature(
            temp_for(current.feelslike_c, current.feelslike_f, units),
            units
        ),
    );
    println!(
        "Humidity {}%  Wind {} km/h {}  UV {}  Pressure {} mb  Precip {} mm",
        current.humidity,
        current.wind_kph,
        current.wind_dir,
        current.uv,
        current.pressure_mb,
        current.precip_mm,
    );
    println!(
        "Updated {} ({})",
        format::format_time(current.last_updated),
        if current.is_day { "day" } else { "night" },
    );

    println!("\n7-day forecast:");
    for day in &weather.daily {
        let info = conditions::lookup(&day.condition_code);
        println!(
            "  {:<10} {:<18} {} / {}  rain {}%",
            format::format_date(day.date),
            info.label,
            format::format_temperature(temp_for(day.maxtemp_c, day.maxtemp_f, units), units),
            format::format_temperature(temp_for(day.mintemp_c, day.mintemp_f, units), units),
            day.chance_of_rain,
        );
    }

    let window = format::window_hourly(&weather.hourly, format::HOURLY_WINDOW);
    if !window.is_empty() {
        println!("\nHourly:");
        for hour in window {
            println!(
                "  {:<9} {}  rain {}%",
                format::format_time(hour.time),
                format::format_temperature(temp_for(hour.temp_c, hour.temp_f, units), units),
                hour.chance_of_rain,
            );
        }
    }
}

fn temp_for(celsius: f64, fahrenheit: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => celsius,
        UnitSystem::Imperial => fahrenheit,
    }
}
