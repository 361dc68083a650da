pub mod format_duration;
