use serde::{Deserialize, Serialize};

use crate::models::domain::ids::deserialize_id;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    #[serde(default)]
    pub option_c: Option<String>,
    #[serde(default)]
    pub option_d: Option<String>,
    #[serde(default)]
    pub option_e: Option<String>,
    // Hidden from participants by some backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl QuizQuestion {
    /// Non-empty options keyed by their answer letter.
    pub fn options(&self) -> Vec<(char, &str)> {
        let optional = [
            ('c', self.option_c.as_deref()),
            ('d', self.option_d.as_deref()),
            ('e', self.option_e.as_deref()),
        ];

        let mut options = vec![('a', self.option_a.as_str()), ('b', self.option_b.as_str())];
        options.extend(
            optional
                .into_iter()
                .filter_map(|(key, text)| text.filter(|t| !t.is_empty()).map(|t| (key, t))),
        );
        options
    }

    pub fn accepts(&self, answer: &str) -> bool {
        let mut chars = answer.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.options().iter().any(|(key, _)| *key == c.to_ascii_lowercase()),
            _ => false,
        }
    }
}
