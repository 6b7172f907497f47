use jiff::civil::DateTime;

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human-readable size with binary prefixes, e.g. `1.5 MB`.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < BYTE_UNITS.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    if exponent == 0 {
        return format!("{bytes} Bytes");
    }
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    format!("{value:.decimals$} {}", BYTE_UNITS[exponent])
}

/// Backend timestamps carry no zone; they are shown as-is.
pub fn format_datetime(datetime: &DateTime) -> String {
    datetime.strftime("%b %d, %Y %H:%M").to_string()
}

/// Render a 0..=1 fraction as a whole percentage.
pub fn fraction_to_percent(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Returns true if the application was built against a local backend.
pub fn is_dev_mode() -> bool {
    cfg!(debug_assertions)
        || option_env!("API_BASE_URL").is_some_and(|url| url.contains("localhost"))
}
