use chrono::DateTime;

/// Current local date in YYYY-MM-DD format
pub fn get_current_date() -> String {
    use js_sys::Date;
    let now = Date::new_0();
    let year = now.get_full_year();
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Current local time in 24 hour HH:MM format
pub fn get_current_time() -> String {
    let now = js_sys::Date::new_0();
    format!("{:02}:{:02}", now.get_hours(), now.get_minutes())
}

/// Minutes east of UTC for the browser's timezone
pub fn get_utc_offset_minutes() -> i32 {
    // getTimezoneOffset is minutes *behind* UTC
    -(js_sys::Date::new_0().get_timezone_offset() as i32)
}

/// "April 17, 2025 at 11:30 AM" in the offset the timestamp was recorded with
pub fn format_report_time(rfc3339: &str) -> String {
    match DateTime::parse_from_rfc3339(rfc3339) {
        Ok(dt) => dt.format("%B %-d, %Y at %-I:%M %p").to_string(),
        Err(_) => rfc3339.to_string(),
    }
}

/// Date only, for memo headers
pub fn format_report_date(rfc3339: &str) -> String {
    match DateTime::parse_from_rfc3339(rfc3339) {
        Ok(dt) => dt.format("%B %-d, %Y").to_string(),
        Err(_) => rfc3339.split('T').next().unwrap_or(rfc3339).to_string(),
    }
}
