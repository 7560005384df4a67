use std::io::Write;

use weather_core::{DisplayModel, ProgressIndicator};

/// Lines of the weather screen.
pub fn format_display(d: &DisplayModel) -> String {
    let icon = d.icon.map(|i| format!("[{i}] ")).unwrap_or_default();
    let mut out = String::new();

    out.push_str(&format!("{}, {}\n", d.city, d.country));
    out.push_str(&format!("{icon}{} ({})\n", d.main, d.description));
    out.push_str(&format!("{}  {}  {}\n", d.temperature, d.temp_min, d.temp_max));
    out.push_str(&format!("{}\n", d.humidity));
    out.push_str(&format!("Wind {} {}\n", d.wind_speed, d.speed_unit));
    out.push_str(&format!("Sunrise {}  Sunset {}\n", d.sunrise, d.sunset));
    out.push_str(&d.last_updated);
    out
}

pub fn print_display(d: &DisplayModel) {
    println!("{}", format_display(d));
}

pub fn print_empty() {
    println!("No weather data yet. Run `weather refresh` to fetch it.");
}

/// "Please wait" notice on stderr.
pub struct StderrProgress;

impl ProgressIndicator for StderrProgress {
    fn show(&self) {
        eprint!("Fetching current weather, please wait...");
        let _ = std::io::stderr().flush();
    }

    fn hide(&self) {
        eprintln!();
    }
}
