// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Entry model for the `entries` table and its display metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Entry category. Closed set for everything this server writes; stored
/// values outside the set decode to [`EntryType::Unknown`] so one foreign
/// row cannot fail a whole list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum EntryType {
    Praise,
    #[default]
    SmallWin,
    Learning,
    Unknown,
}

impl From<String> for EntryType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "praise" => EntryType::Praise,
            "small_win" => EntryType::SmallWin,
            "learning" => EntryType::Learning,
            _ => EntryType::Unknown,
        }
    }
}

/// Display metadata for an entry type: emoji, localized label, and the
/// frontend's color classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TypeInfo {
    pub emoji: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

impl EntryType {
    /// The three selectable types, in selector display order.
    pub const ALL: [EntryType; 3] = [EntryType::Praise, EntryType::SmallWin, EntryType::Learning];

    /// Resolve display metadata. Exhaustive over the enum; `Unknown` maps
    /// to the generic fallback.
    pub fn info(self) -> TypeInfo {
        match self {
            EntryType::Praise => TypeInfo {
                emoji: "👏",
                label: "칭찬받음",
                color: "bg-blue-100 text-blue-700",
            },
            EntryType::SmallWin => TypeInfo {
                emoji: "✨",
                label: "작은 성과",
                color: "bg-green-100 text-green-700",
            },
            EntryType::Learning => TypeInfo {
                emoji: "📚",
                label: "배움",
                color: "bg-purple-100 text-purple-700",
            },
            EntryType::Unknown => TypeInfo {
                emoji: "📝",
                label: "기록",
                color: "bg-gray-100 text-gray-700",
            },
        }
    }
}

/// Entry row as returned by the table service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Row ID (store-generated UUID)
    pub id: String,
    /// Owning user ID (set from the session at insert, never client-supplied)
    pub user_id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Title (non-empty at creation)
    pub title: String,
    /// Optional detail text (absent encoded as null)
    pub detail: Option<String>,
    /// User-editable calendar date
    pub date: NaiveDate,
    /// Store-managed timestamps (ISO 8601)
    pub created_at: String,
    pub updated_at: String,
}

/// Insert payload for the table service. `detail` serializes as an explicit
/// null when absent, matching the store's column default handling.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntry {
    pub user_id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub title: String,
    pub detail: Option<String>,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&EntryType::SmallWin).unwrap(),
            "\"small_win\""
        );
        assert_eq!(
            serde_json::from_str::<EntryType>("\"praise\"").unwrap(),
            EntryType::Praise
        );
        assert_eq!(
            serde_json::from_str::<EntryType>("\"learning\"").unwrap(),
            EntryType::Learning
        );
    }

    #[test]
    fn test_unrecognized_type_falls_back() {
        let parsed: EntryType = serde_json::from_str("\"retro_note\"").unwrap();
        assert_eq!(parsed, EntryType::Unknown);
        assert_eq!(parsed.info().emoji, "📝");
        assert_eq!(parsed.info().label, "기록");
    }

    #[test]
    fn test_default_type_is_small_win() {
        assert_eq!(EntryType::default(), EntryType::SmallWin);
    }

    #[test]
    fn test_entry_row_deserializes() {
        let json = r#"{
            "id": "3f6e0a2e-7f4b-4a59-9b3e-0a5a6a1f0c01",
            "user_id": "U123",
            "type": "learning",
            "title": "Closed my first PR",
            "detail": null,
            "date": "2024-03-01",
            "created_at": "2024-03-01T09:30:00+00:00",
            "updated_at": "2024-03-01T09:30:00+00:00"
        }"#;

        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.entry_type, EntryType::Learning);
        assert_eq!(entry.detail, None);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_new_entry_serializes_null_detail() {
        let new = NewEntry {
            user_id: "U123".to_string(),
            entry_type: EntryType::Learning,
            title: "Closed my first PR".to_string(),
            detail: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };

        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(value["user_id"], "U123");
        assert_eq!(value["type"], "learning");
        assert!(value["detail"].is_null());
        assert_eq!(value["date"], "2024-03-01");
    }
}
