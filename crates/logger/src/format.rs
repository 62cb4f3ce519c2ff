//! Line rendering (timestamp, JSON and human-readable layouts)

use serde_json::Value;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::config::Level;
use crate::sink::Record;

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS:mmm`
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]:[subsecond digits:3]"
        ))
        .unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}

/// Layout of a rendered record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// One JSON object per line: the payload plus `level`, `message`, `timestamp`
    Json,
    /// `<timestamp> <level>: <message>`
    Text {
        /// Colorize the level
        colors: bool,
    },
}

impl LineFormat {
    /// Pick the layout for a sink
    pub fn new(only_json: bool, colors: bool) -> Self {
        if only_json {
            Self::Json
        } else {
            Self::Text { colors }
        }
    }

    /// Render a record as one newline-terminated line
    pub fn render(&self, record: &Record<'_>) -> String {
        match self {
            Self::Json => render_json(record),
            Self::Text { colors } => render_text(record, *colors),
        }
    }
}

fn render_json(record: &Record<'_>) -> String {
    let mut object = record.payload.clone();
    object.insert("level".to_string(), Value::from(record.level.as_str()));
    object.insert("message".to_string(), Value::from(record.message));
    object.insert(
        "timestamp".to_string(),
        Value::from(format_timestamp(record.timestamp)),
    );

    match serde_json::to_string(&object) {
        Ok(mut line) => {
            line.push('\n');
            line
        }
        Err(_) => render_text(record, false),
    }
}

fn render_text(record: &Record<'_>, colors: bool) -> String {
    let level = if colors {
        paint(record.level)
    } else {
        record.level.as_str().to_string()
    };
    format!(
        "{} {}: {}\n",
        format_timestamp(record.timestamp),
        level,
        record.message
    )
}

#[cfg(feature = "ansi")]
fn paint(level: Level) -> String {
    use colored::Colorize;

    let name = level.as_str();
    match level {
        Level::Debug => name.blue(),
        Level::Info => name.green(),
        Level::Warn => name.yellow(),
        Level::Error => name.red(),
    }
    .to_string()
}

#[cfg(not(feature = "ansi"))]
fn paint(level: Level) -> String {
    level.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};
    use time::macros::datetime;

    fn record(payload: &Map<String, Value>) -> Record<'_> {
        Record {
            level: Level::Error,
            message: "boom",
            payload,
            timestamp: datetime!(2024-03-05 07:08:09.123 UTC),
        }
    }

    #[test]
    fn test_timestamp_layout() {
        assert_eq!(
            format_timestamp(datetime!(2024-03-05 07:08:09.123 UTC)),
            "2024-03-05 07:08:09:123"
        );
    }

    #[test]
    fn test_text_line() {
        let payload = Map::new();
        let line = LineFormat::Text { colors: false }.render(&record(&payload));
        assert_eq!(line, "2024-03-05 07:08:09:123 error: boom\n");
    }

    #[test]
    fn test_json_line_merges_payload_and_reserved_keys_win() {
        let mut payload = Map::new();
        payload.insert("className".to_string(), json!("orders.rs"));
        payload.insert("message".to_string(), json!("shadowed"));

        let line = LineFormat::Json.render(&record(&payload));
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(
            parsed,
            json!({
                "className": "orders.rs",
                "level": "error",
                "message": "boom",
                "timestamp": "2024-03-05 07:08:09:123",
            })
        );
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(LineFormat::new(true, true), LineFormat::Json);
        assert_eq!(LineFormat::new(false, true), LineFormat::Text { colors: true });
    }
}
