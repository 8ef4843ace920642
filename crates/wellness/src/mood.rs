//! Mood log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How you feel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Neutral,
    Anxious,
    Sad,
}

impl Mood {
    /// Display order for counts and pickers
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Calm, Mood::Neutral, Mood::Anxious, Mood::Sad];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Calm => "calm",
            Self::Neutral => "neutral",
            Self::Anxious => "anxious",
            Self::Sad => "sad",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "happy" => Some(Self::Happy),
            "calm" => Some(Self::Calm),
            "neutral" | "ok" => Some(Self::Neutral),
            "anxious" => Some(Self::Anxious),
            "sad" => Some(Self::Sad),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Calm => "😌",
            Self::Neutral => "😐",
            Self::Anxious => "😟",
            Self::Sad => "😢",
        }
    }
}

/// One logged mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// When it was logged (Unix timestamp)
    pub at: i64,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MoodEntry {
    /// Get the log time as a DateTime
    pub fn logged_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.at, 0).unwrap_or_else(Utc::now)
    }
}

/// Every mood logged, in the order it was logged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodLog {
    entries: Vec<MoodEntry>,
}

impl MoodLog {
    /// Append an entry; a blank note is stored as none
    pub fn record(&mut self, mood: Mood, note: Option<String>, at: i64) -> &MoodEntry {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self.entries.push(MoodEntry { at, mood, note });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries logged at or after `since`
    pub fn since(&self, since: i64) -> impl Iterator<Item = &MoodEntry> {
        self.entries.iter().filter(move |e| e.at >= since)
    }

    /// How often each mood was logged, in `Mood::ALL` order
    pub fn counts<'a>(entries: impl IntoIterator<Item = &'a MoodEntry>) -> [(Mood, usize); 5] {
        let mut counts = Mood::ALL.map(|m| (m, 0));
        for entry in entries {
            if let Some(slot) = counts.iter_mut().find(|(m, _)| *m == entry.mood) {
                slot.1 += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_parsing() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_str(mood.as_str()), Some(mood));
        }
        assert_eq!(Mood::from_str("HAPPY"), Some(Mood::Happy));
        assert_eq!(Mood::from_str("ok"), Some(Mood::Neutral));
        assert_eq!(Mood::from_str("grumpy"), None);
    }

    #[test]
    fn test_record_normalizes_note() {
        let mut log = MoodLog::default();
        assert_eq!(log.record(Mood::Calm, Some("  ".to_string()), 100).note, None);
        assert_eq!(log.record(Mood::Sad, None, 200).note, None);
        assert_eq!(
            log.record(Mood::Happy, Some(" good run ".to_string()), 300).note.as_deref(),
            Some("good run")
        );
        assert_eq!(log.entries().len(), 3);
        assert_eq!(log.entries()[0].mood, Mood::Calm);
    }

    #[test]
    fn test_counts_in_display_order() {
        let mut log = MoodLog::default();
        log.record(Mood::Sad, None, 1);
        log.record(Mood::Happy, None, 2);
        log.record(Mood::Happy, None, 3);
        log.record(Mood::Anxious, None, 4);

        let counts = MoodLog::counts(log.entries());
        assert_eq!(
            counts,
            [
                (Mood::Happy, 2),
                (Mood::Calm, 0),
                (Mood::Neutral, 0),
                (Mood::Anxious, 1),
                (Mood::Sad, 1),
            ]
        );

        let recent = MoodLog::counts(log.since(3));
        assert_eq!(recent[0], (Mood::Happy, 1));
        assert_eq!(recent[4], (Mood::Sad, 0));
    }

    #[test]
    fn test_note_omitted_when_empty() {
        let mut log = MoodLog::default();
        log.record(Mood::Neutral, None, 42);
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, r#"[{"at":42,"mood":"neutral"}]"#);
    }
}
