// Data models for labeled news examples.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text::clean_text;

/// Ground-truth class of a news article. The discriminants are the class
/// indices used by the classifier (FAKE = 0, REAL = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Fake = 0,
    Real = 1,
}

impl Label {
    /// Both classes, in class-index order.
    pub const ALL: [Label; 2] = [Label::Fake, Label::Real];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::Fake),
            1 => Some(Label::Real),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Fake => "FAKE",
            Label::Real => "REAL",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled article as read from the source CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExample {
    pub text: String,
    pub label: Label,
}

/// An article after text cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedExample {
    pub cleaned_text: String,
    pub label: Label,
}

impl RawExample {
    pub fn normalize(&self) -> NormalizedExample {
        NormalizedExample {
            cleaned_text: clean_text(&self.text),
            label: self.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_indices() {
        assert_eq!(Label::Fake.index(), 0);
        assert_eq!(Label::Real.index(), 1);
        assert_eq!(Label::from_index(1), Some(Label::Real));
        assert_eq!(Label::from_index(2), None);
    }

    #[test]
    fn test_label_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Label::Fake).unwrap(), "\"FAKE\"");
        let parsed: Label = serde_json::from_str("\"REAL\"").unwrap();
        assert_eq!(parsed, Label::Real);
    }
}
