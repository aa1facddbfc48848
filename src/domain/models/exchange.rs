use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One question/answer pair recorded in a session transcript.
///
/// Only [`ChatSession`](crate::application::ChatSession) assigns sequence
/// numbers, so this is serialized for display but never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    question: String,
    answer: String,
    sequence: u64,
    created_at: DateTime<Utc>,
}

impl Exchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, sequence: u64) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            sequence,
            created_at: Utc::now(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// 1-based insertion position within the owning session.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Order in which a transcript is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptOrder {
    Chronological,
    /// Newest first.
    #[default]
    Reverse,
}

impl TranscriptOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptOrder::Chronological => "chronological",
            TranscriptOrder::Reverse => "reverse",
        }
    }
}

impl std::fmt::Display for TranscriptOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TranscriptOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chronological" | "oldest" | "asc" => Ok(TranscriptOrder::Chronological),
            "reverse" | "newest" | "desc" => Ok(TranscriptOrder::Reverse),
            other => Err(format!("Unknown transcript order: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_order_parses_aliases() {
        assert_eq!(
            "chronological".parse::<TranscriptOrder>(),
            Ok(TranscriptOrder::Chronological)
        );
        assert_eq!(" Newest ".parse::<TranscriptOrder>(), Ok(TranscriptOrder::Reverse));
        assert!("sideways".parse::<TranscriptOrder>().is_err());
    }

    #[test]
    fn default_order_is_newest_first() {
        assert_eq!(TranscriptOrder::default(), TranscriptOrder::Reverse);
    }

    #[test]
    fn exchange_serializes_for_display() {
        let exchange = Exchange::new("And bawa?", "Bawa is slang for a Parsi person.", 2);
        let json = serde_json::to_value(&exchange).unwrap();

        assert_eq!(json["question"], "And bawa?");
        assert_eq!(json["answer"], "Bawa is slang for a Parsi person.");
        assert_eq!(json["sequence"], 2);
        assert!(json["created_at"].is_string());
    }
}
