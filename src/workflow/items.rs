//! Action items and the pure transforms that govern them.
//!
//! Every mutation of the action-item list flows through `normalize` and
//! `edit_field`. Both are pure: they return a fresh list and never alias
//! entries, so concurrent readers can never observe a half-edited item.

use crate::workflow::timeslot::Timeslot;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Allowed duration range in minutes, with the fallback used when an item
/// carries no usable duration.
#[derive(Debug, Clone, Copy)]
pub struct DurationBounds {
    pub default: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self {
            default: DEFAULT_DURATION_MINUTES,
            min: 5,
            max: 480,
        }
    }
}

impl DurationBounds {
    /// Clamp a duration into range, substituting the default for zero.
    pub fn clamp(&self, minutes: u32) -> u32 {
        let minutes = if minutes == 0 { self.default } else { minutes };
        minutes.clamp(self.min, self.max)
    }
}

/// A follow-up task extracted from a transcript.
///
/// `text` is immutable once created; everything else is user-editable.
/// Separate `date` and `time` strings are the canonical representation so a
/// partially filled item (date without time) stays representable; combined
/// datetime-local input is split at the edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub text: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default = "default_include")]
    pub include: bool,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

fn default_include() -> bool {
    true
}

impl ActionItem {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            owner: String::new(),
            date: String::new(),
            time: String::new(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            include: true,
        }
    }
}

/// Wire shape accepted from the extraction collaborator: either a bare
/// sentence or a structured item, possibly with a combined `datetime`
/// instead of separate date/time fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActionItemInput {
    Text(String),
    Fields(ActionItemFields),
}

#[derive(Debug, Deserialize)]
pub struct ActionItemFields {
    pub text: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub include: Option<bool>,
}

impl From<ActionItemInput> for ActionItem {
    fn from(input: ActionItemInput) -> Self {
        match input {
            ActionItemInput::Text(text) => ActionItem::from_text(text),
            ActionItemInput::Fields(fields) => {
                let (mut date, mut time) = (
                    fields.date.unwrap_or_default(),
                    fields.time.unwrap_or_default(),
                );
                if let Some(datetime) = fields.datetime {
                    let (d, t) = split_datetime(&datetime);
                    date = d;
                    time = t;
                }
                ActionItem {
                    text: fields.text,
                    owner: fields.owner.unwrap_or_default(),
                    date,
                    time,
                    duration_minutes: fields.duration.unwrap_or(DEFAULT_DURATION_MINUTES),
                    include: fields.include.unwrap_or(true),
                }
            }
        }
    }
}

/// Split a datetime-local string (`YYYY-MM-DDTHH:MM`) into date and time
/// parts. A string without a `T` separator is treated as date-only.
pub fn split_datetime(value: &str) -> (String, String) {
    match value.trim().split_once('T') {
        Some((date, time)) => (date.to_string(), time.to_string()),
        None => (value.trim().to_string(), String::new()),
    }
}

/// The editable fields of an action item. `text` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemField {
    Owner,
    Date,
    Time,
    Datetime,
    Duration,
    Include,
}

/// Fill defaults for items that arrived without them. Idempotent: applying
/// it twice yields the same list as applying it once.
pub fn normalize(items: &[ActionItem], default_duration: u32) -> Vec<ActionItem> {
    items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if item.duration_minutes == 0 {
                item.duration_minutes = default_duration;
            }
            item
        })
        .collect()
}

/// Return a new list with only `items[idx].field` replaced. Out-of-range
/// indices are a logged no-op; they never corrupt other entries.
pub fn edit_field(items: &[ActionItem], idx: usize, field: ItemField, value: &str) -> Vec<ActionItem> {
    let mut updated = items.to_vec();
    match updated.get_mut(idx) {
        None => {
            warn!(
                "Ignoring edit of action {} ({:?}): only {} items",
                idx,
                field,
                items.len()
            );
        }
        Some(item) => match field {
            ItemField::Owner => item.owner = value.to_string(),
            ItemField::Date => item.date = value.trim().to_string(),
            ItemField::Time => item.time = value.trim().to_string(),
            ItemField::Datetime => {
                let (date, time) = split_datetime(value);
                item.date = date;
                item.time = time;
            }
            ItemField::Duration => {
                item.duration_minutes =
                    value.trim().parse().unwrap_or(DEFAULT_DURATION_MINUTES);
            }
            ItemField::Include => {
                item.include = matches!(value.trim(), "true" | "1" | "on");
            }
        },
    }
    updated
}

/// Calendar event payload submitted for one eligible action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRequest {
    pub text: String,
    pub owner: String,
    pub datetime: String,
    pub end: String,
    pub include: bool,
}

/// Build the scheduling batch: included items with an owner and a resolvable
/// date+time. Everything else is silently left out of the batch.
pub fn eligible_events(items: &[ActionItem], bounds: &DurationBounds) -> Vec<EventRequest> {
    items
        .iter()
        .filter(|item| item.include && !item.owner.trim().is_empty())
        .filter_map(|item| {
            let minutes = bounds.clamp(item.duration_minutes);
            let slot = Timeslot::resolve(&item.date, &item.time, minutes)?;
            Some(EventRequest {
                text: item.text.clone(),
                owner: item.owner.clone(),
                datetime: slot.start_rfc3339(),
                end: slot.end_rfc3339(),
                include: true,
            })
        })
        .collect()
}

/// Summary, decisions and action items extracted from one transcript.
/// Produced atomically: a failed extraction never yields a partial analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingAnalysis {
    pub summary: Vec<String>,
    pub decisions: Vec<String>,
    pub actions: Vec<ActionItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items() -> Vec<ActionItem> {
        vec![
            ActionItem {
                text: "Prepare report".to_string(),
                owner: "Alice".to_string(),
                date: "2025-05-14".to_string(),
                time: "14:30".to_string(),
                duration_minutes: 60,
                include: true,
            },
            ActionItem::from_text("Follow up with vendor"),
        ]
    }

    #[test]
    fn test_normalize_fills_zero_duration() {
        let mut items = sample_items();
        items[1].duration_minutes = 0;
        let normalized = normalize(&items, 60);
        assert_eq!(normalized[1].duration_minutes, 60);
        assert_eq!(normalized[0], items[0]);
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut items = sample_items();
        items[0].duration_minutes = 0;
        let once = normalize(&items, 60);
        let twice = normalize(&once, 60);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_edit_field_touches_only_target() {
        let items = sample_items();
        let updated = edit_field(&items, 1, ItemField::Owner, "Bob");
        assert_eq!(updated[1].owner, "Bob");
        assert_eq!(updated[0], items[0]);
        // Original list untouched
        assert_eq!(items[1].owner, "");
    }

    #[test]
    fn test_edit_field_idempotent() {
        let items = sample_items();
        let once = edit_field(&items, 0, ItemField::Time, "09:00");
        let twice = edit_field(&once, 0, ItemField::Time, "09:00");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_edit_field_out_of_range_is_noop() {
        let items = sample_items();
        let updated = edit_field(&items, 7, ItemField::Owner, "Nobody");
        assert_eq!(updated, items);
    }

    #[test]
    fn test_edit_datetime_splits() {
        let items = sample_items();
        let updated = edit_field(&items, 1, ItemField::Datetime, "2025-06-01T10:15");
        assert_eq!(updated[1].date, "2025-06-01");
        assert_eq!(updated[1].time, "10:15");
    }

    #[test]
    fn test_edit_duration_invalid_falls_back_to_default() {
        let items = sample_items();
        let updated = edit_field(&items, 0, ItemField::Duration, "ninety");
        assert_eq!(updated[0].duration_minutes, DEFAULT_DURATION_MINUTES);
    }

    #[test]
    fn test_edit_include_parses_boolean() {
        let items = sample_items();
        let updated = edit_field(&items, 0, ItemField::Include, "false");
        assert!(!updated[0].include);
        let updated = edit_field(&updated, 0, ItemField::Include, "true");
        assert!(updated[0].include);
    }

    #[test]
    fn test_duration_clamp() {
        let bounds = DurationBounds::default();
        assert_eq!(bounds.clamp(0), 60);
        assert_eq!(bounds.clamp(2), 5);
        assert_eq!(bounds.clamp(90), 90);
        assert_eq!(bounds.clamp(1000), 480);
    }

    #[test]
    fn test_item_input_from_bare_string() {
        let input: ActionItemInput =
            serde_json::from_str("\"Carol will draft the proposal\"").unwrap();
        let item = ActionItem::from(input);
        assert_eq!(item.text, "Carol will draft the proposal");
        assert!(item.include);
        assert_eq!(item.duration_minutes, 60);
        assert_eq!(item.owner, "");
    }

    #[test]
    fn test_item_input_with_combined_datetime() {
        let input: ActionItemInput = serde_json::from_str(
            r#"{ "text": "Ship it", "owner": "Dan", "datetime": "2025-05-14T15:00" }"#,
        )
        .unwrap();
        let item = ActionItem::from(input);
        assert_eq!(item.date, "2025-05-14");
        assert_eq!(item.time, "15:00");
        assert_eq!(item.owner, "Dan");
    }

    #[test]
    fn test_item_input_with_separate_fields() {
        let input: ActionItemInput = serde_json::from_str(
            r#"{ "text": "Review PR", "date": "2025-05-20", "time": "11:00", "duration": 30, "include": false }"#,
        )
        .unwrap();
        let item = ActionItem::from(input);
        assert_eq!(item.date, "2025-05-20");
        assert_eq!(item.duration_minutes, 30);
        assert!(!item.include);
    }

    #[test]
    fn test_eligible_events_filters() {
        let mut items = sample_items();
        // item 1 has no owner and no date/time -> excluded
        items.push(ActionItem {
            text: "Excluded by flag".to_string(),
            owner: "Eve".to_string(),
            date: "2025-05-14".to_string(),
            time: "16:00".to_string(),
            duration_minutes: 60,
            include: false,
        });
        items.push(ActionItem {
            text: "Missing time".to_string(),
            owner: "Frank".to_string(),
            date: "2025-05-14".to_string(),
            time: String::new(),
            duration_minutes: 60,
            include: true,
        });

        let events = eligible_events(&items, &DurationBounds::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text, "Prepare report");
        assert_eq!(events[0].owner, "Alice");
        assert!(events[0].include);
    }
}
