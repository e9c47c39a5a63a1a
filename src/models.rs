use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar fields of the submission record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Name,
    Email,
    Age,
    Education,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Email => "email",
            FieldName::Age => "age",
            FieldName::Education => "education",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

/// Everything the respondent has entered so far.
///
/// `answers` is indexed by question position. It only grows as far as the
/// highest answered index, unset slots stay `None` and serialise as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub age: String,
    pub education: String,
    #[serde(default)]
    pub answers: Vec<Option<Answer>>,
}

impl FormState {
    pub fn field(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Age => &self.age,
            FieldName::Education => &self.education,
        }
    }

    pub fn field_mut(&mut self, field: FieldName) -> &mut String {
        match field {
            FieldName::Name => &mut self.name,
            FieldName::Email => &mut self.email,
            FieldName::Age => &mut self.age,
            FieldName::Education => &mut self.education,
        }
    }

    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index).and_then(|a| a.as_ref())
    }

    /// Write `answer` at `index`, padding with empty slots as needed
    pub fn set_answer(&mut self, index: usize, answer: Answer) {
        if self.answers.len() <= index {
            self.answers.resize(index + 1, None);
        }
        self.answers[index] = Some(answer);
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        *self == FormState::default()
    }
}

/// Response returned by the backend after storing a submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SubmissionResult {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            extra: serde_json::Map::new(),
        }
    }

    /// A stored submission is acknowledged by echoing back a non-empty name
    pub fn is_success(&self) -> bool {
        self.name.as_deref().map_or(false, |n| !n.is_empty())
    }
}

/// Answers prepared ahead of time for non-interactive submission.
///
/// `answers` is keyed by the question number shown in the form (1-based).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSheet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub answers: BTreeMap<usize, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_answers_serialize_as_null() {
        let mut state = FormState::default();
        state.set_answer(
            3,
            Answer {
                question: "q".to_string(),
                answer: "Never".to_string(),
            },
        );

        let json = serde_json::to_value(&state).unwrap();
        let answers = json["answers"].as_array().unwrap();
        assert_eq!(answers.len(), 4);
        assert!(answers[0].is_null());
        assert!(answers[2].is_null());
        assert_eq!(answers[3]["answer"], "Never");
        assert_eq!(state.answered_count(), 1);
    }

    #[test]
    fn test_submission_result_requires_non_empty_name() {
        let ok: SubmissionResult =
            serde_json::from_str(r#"{"name": "Jane Doe", "id": 7}"#).unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.extra["id"], 7);

        let empty: SubmissionResult = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(!empty.is_success());

        let missing: SubmissionResult = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert!(!missing.is_success());
    }

    #[test]
    fn test_answer_sheet_keys_are_question_numbers() {
        let sheet: AnswerSheet = serde_json::from_str(
            r#"{"name": "Jane", "age": "25-34", "answers": {"3": "1-2 hours"}}"#,
        )
        .unwrap();
        assert_eq!(sheet.answers.get(&3).map(String::as_str), Some("1-2 hours"));
        assert!(sheet.email.is_empty());
    }
}
