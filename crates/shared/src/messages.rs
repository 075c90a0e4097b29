use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub prompt: String,
    pub go: String,
    pub invalid_input: String,
    pub correct: String,
    pub wrong: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            prompt: "How many buttons to create?".into(),
            go: "Go!".into(),
            invalid_input: "Please enter a number between 3 and 7.".into(),
            correct: "Excellent memory!".into(),
            wrong: "Wrong order!".into(),
        }
    }
}
