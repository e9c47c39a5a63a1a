//! Static questionnaire for the sleep survey

use crate::models::FieldName;

/// Title shown at the top of the form
pub const SURVEY_TITLE: &str = "Technology Usage and its Impact on Sleep Patterns";

/// Privacy notice shown under the title
pub const PRIVACY_NOTICE: &str =
    "This survey complies with the Data Privacy Act of 2012 to protect your personal information.";

/// A single survey question with its fixed list of options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionDefinition {
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    /// Set for questions bound directly onto the submission record
    pub field_name: Option<FieldName>,
}

impl QuestionDefinition {
    pub fn is_named(&self) -> bool {
        self.field_name.is_some()
    }

    /// Position of `option` in this question's options
    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| *o == option)
    }

    /// Label as rendered: named questions show the bare prompt,
    /// indexed questions are numbered by their 1-based position.
    pub fn label(&self, index: usize) -> String {
        if self.is_named() {
            self.prompt.to_string()
        } else {
            format!("{}. {}", index + 1, self.prompt)
        }
    }
}

pub static QUESTIONS: [QuestionDefinition; 12] = [
    QuestionDefinition {
        prompt: "What is your age group?",
        options: &["Under 18", "18-24", "25-34", "35-44", "45-54", "55-64", "65 or above"],
        field_name: Some(FieldName::Age),
    },
    QuestionDefinition {
        prompt: "What is your highest level of educational attainment?",
        options: &[
            "High school or equivalent",
            "Some college/Associate degree",
            "Bachelor's degree",
            "Graduate/Professional degree",
        ],
        field_name: Some(FieldName::Education),
    },
    QuestionDefinition {
        prompt: "How many hours per day, on average, do you use electronic devices (smartphones, tablets, computers, TVs, etc.)?",
        options: &["Less than 1 hour", "1-2 hours", "2-4 hours", "More than 4 hours"],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "How often do you use these devices in bed before attempting to sleep??",
        options: &[
            "Never",
            "Rarely (1-2 times a week)",
            "Sometimes (3-4 times a week)",
            "Often (5-6 times a week)",
            "Every Night",
        ],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "Do you use any technology (smartphone, tablet, etc.) as an alarm clock in your bedroom??",
        options: &["Yes", "No"],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "On average, how many hours of sleep do you get per night?",
        options: &["Less than 5 hours", "5-6 hours", "6-7 hours", "7-8 hours", "More than 8 hours"],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "How would you rate the overall quality of your sleep?",
        options: &["Excellent", "Good", "Fair", "Poor", "Very Poor"],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "How often do you find yourself checking or using electronic devices if you wake up during the night?",
        options: &["Never", "Rarely", "Sometimes", "Often", "Every Night"],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "Do you believe that using electronic devices before bedtime affects your ability to fall asleep?",
        options: &["Not at all", "Slightly", "Moderately", "Significantly", "I don't know"],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "Do you use any apps or features on your electronic devices to help you relax or wind down before bedtime (e.g., meditation apps, relaxation music)?",
        options: &["Yes, regularly", "Yes, occasionally", "No"],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "Do you use any sleep-tracking devices or apps (e.g., Fitbit, Sleep Cycle) to monitor your sleep patterns?",
        options: &["Yes", "No"],
        field_name: None,
    },
    QuestionDefinition {
        prompt: "When experiencing sleep difficulties, how often do you attempt to adjust your technology use habits (e.g., reducing screen time before bed, using blue light filters)?",
        options: &["Never", "Rarely", "Sometimes", "Often", "Always"],
        field_name: None,
    },
];

pub fn question_count() -> usize {
    QUESTIONS.len()
}

/// Question bound to a named field, if any
pub fn question_for_field(field: FieldName) -> Option<(usize, &'static QuestionDefinition)> {
    QUESTIONS
        .iter()
        .enumerate()
        .find(|(_, q)| q.field_name == Some(field))
}

/// Plain-text rendering of the whole questionnaire
pub fn render_questionnaire() -> String {
    let mut out = format!("{}\n{}\n", SURVEY_TITLE, PRIVACY_NOTICE);
    for (index, question) in QUESTIONS.iter().enumerate() {
        out.push('\n');
        out.push_str(&question.label(index));
        out.push('\n');
        for (n, option) in question.options.iter().enumerate() {
            out.push_str(&format!("  {}) {}\n", n + 1, option));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_age_and_education_are_named() {
        let named: Vec<_> = QUESTIONS.iter().filter_map(|q| q.field_name).collect();
        assert_eq!(named, vec![FieldName::Age, FieldName::Education]);
        assert_eq!(question_count(), 12);
    }

    #[test]
    fn test_labels_number_indexed_questions_only() {
        assert_eq!(QUESTIONS[0].label(0), "What is your age group?");
        assert_eq!(
            QUESTIONS[2].label(2),
            format!("3. {}", QUESTIONS[2].prompt)
        );
    }

    #[test]
    fn test_question_for_field() {
        let (index, question) = question_for_field(FieldName::Education).unwrap();
        assert_eq!(index, 1);
        assert_eq!(question.option_index("Bachelor's degree"), Some(2));
        assert!(question_for_field(FieldName::Email).is_none());
    }

    #[test]
    fn test_render_questionnaire_lists_every_option() {
        let text = render_questionnaire();
        assert!(text.starts_with(SURVEY_TITLE));
        assert!(text.contains("\n12. When experiencing sleep difficulties"));
        assert!(text.contains("  7) 65 or above\n"));
        let option_lines = text.lines().filter(|l| l.starts_with("  ")).count();
        let total: usize = QUESTIONS.iter().map(|q| q.options.len()).sum();
        assert_eq!(option_lines, total);
    }
}
