pub trait FormatDuration {
    fn format_clock(&self) -> String;
}

impl FormatDuration for chrono::Duration {
    /// `HH:MM:SS`, hours not wrapped at 24.
    fn format_clock(&self) -> String {
        let total = self.num_seconds().max(0);
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::FormatDuration;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_clock() {
        assert_eq!("00:00:30", Duration::seconds(30).format_clock());
        assert_eq!("24:00:00", Duration::hours(24).format_clock());
        assert_eq!("07:05:09", Duration::seconds(7 * 3600 + 5 * 60 + 9).format_clock());
        assert_eq!("00:00:00", Duration::seconds(-5).format_clock());
    }
}
