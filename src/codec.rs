// Whole-list encoding of the persisted task blob

use crate::error::StorageError;
use crate::task::Task;
use tracing::{info, warn};

/// Encode the full task list as a JSON array
pub fn encode_tasks(tasks: &[Task]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Decode a persisted blob, falling back to an empty list
///
/// Absent, truncated or otherwise malformed data never fails startup; it is
/// logged and treated as "no tasks yet".
pub fn decode_tasks(blob: Option<&str>) -> Vec<Task> {
    let Some(blob) = blob else {
        return Vec::new();
    };

    if blob.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<Task>>(blob) {
        Ok(tasks) => {
            info!(count = tasks.len(), "Loaded tasks");
            tasks
        }
        Err(e) => {
            warn!(
                error = ?e,
                bytes = blob.len(),
                "Failed to decode persisted tasks, starting empty"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskTime;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Task> {
        let mut done = Task::new(
            2,
            "Call <Bob>",
            TaskTime::new(14, 30).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        );
        done.completed = true;
        let pending = Task::new(
            1,
            "Buy milk",
            TaskTime::new(9, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        );
        vec![done, pending]
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let tasks = sample();
        let blob = encode_tasks(&tasks).unwrap();
        assert_eq!(decode_tasks(Some(&blob)), tasks);
    }

    #[test]
    fn test_encode_format() {
        let blob = encode_tasks(&sample()[1..]).unwrap();
        assert_eq!(
            blob,
            r#"[{"id":1,"text":"Buy milk","time":"09:00","completed":false,"createdAt":"2024-03-01T08:00:00Z"}]"#
        );
    }

    #[test]
    fn test_decode_absent_or_blank() {
        assert!(decode_tasks(None).is_empty());
        assert!(decode_tasks(Some("")).is_empty());
        assert!(decode_tasks(Some("  \n")).is_empty());
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        let blob = encode_tasks(&sample()).unwrap();
        let truncated = &blob[..blob.len() / 2];

        assert!(decode_tasks(Some(truncated)).is_empty());
        assert!(decode_tasks(Some("{not json")).is_empty());
        assert!(decode_tasks(Some(r#"{"id":1}"#)).is_empty());
    }

    #[test]
    fn test_decode_accepts_millisecond_timestamps() {
        let blob = r#"[{"id":1709280000000,"text":"Stretch","time":"07:15","completed":false,"createdAt":"2024-03-01T08:00:00.000Z"}]"#;
        let tasks = decode_tasks(Some(blob));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].time, TaskTime::new(7, 15).unwrap());
    }
}
