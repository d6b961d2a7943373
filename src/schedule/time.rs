use crate::error::TimeError;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Parse a 24-hour `HH:MM` string into minutes since midnight.
pub fn time_to_minutes(s: &str) -> Result<u16, TimeError> {
    let (h, m) = split_hhmm(s)?;
    if h > 23 || m > 59 {
        return Err(TimeError::OutOfRange(s.to_string()));
    }
    Ok(h * 60 + m)
}

/// Like [`time_to_minutes`] but also accepts `24:00` as the end of the day.
pub fn parse_end_time(s: &str) -> Result<u16, TimeError> {
    let (h, m) = split_hhmm(s)?;
    if h == 24 && m == 0 {
        return Ok(MINUTES_PER_DAY);
    }
    if h > 23 || m > 59 {
        return Err(TimeError::OutOfRange(s.to_string()));
    }
    Ok(h * 60 + m)
}

fn split_hhmm(s: &str) -> Result<(u16, u16), TimeError> {
    let malformed = || TimeError::Malformed(s.to_string());
    let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(malformed());
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let h = h.parse::<u16>().map_err(|_| malformed())?;
    let m = m.parse::<u16>().map_err(|_| malformed())?;
    Ok((h, m))
}

/// Format minutes since midnight as a zero-padded `HH:MM`.
pub fn minutes_to_time(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Round to the nearest multiple of `step`.
pub fn snap_minutes(minutes: i32, step: u16) -> i32 {
    if step == 0 {
        return minutes;
    }
    let step = step as i32;
    ((minutes as f64 / step as f64).round() as i32) * step
}

/// Hour label for the time column, e.g. `6 AM`, `12 PM`.
pub fn format_hour(hour: u16) -> String {
    match hour % 24 {
        0 => "12 AM".to_string(),
        h @ 1..=11 => format!("{} AM", h),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}
