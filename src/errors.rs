//! Error types for the survey form

use thiserror::Error;

/// Message the backend uses when an email address was already used
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already exists";

/// Shown when the backend reports a duplicate email
pub const DUPLICATE_EMAIL_NOTICE: &str = "This email has already been used to submit a survey.";

/// Shown for every other submission failure
pub const GENERIC_FAILURE_NOTICE: &str = "An error occurred while submitting the survey.";

/// Required input missing or malformed. Never reaches the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Age and education fields are required.")]
    MissingDemographics,

    #[error("Full name is required.")]
    MissingName,

    #[error("Email is required.")]
    MissingEmail,

    #[error("'{0}' is not a valid email address.")]
    InvalidEmail(String),
}

/// Failure reported by the submission collaborator
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("{}", DUPLICATE_EMAIL_MESSAGE)]
    DuplicateEmail,

    #[error("Server rejected the submission (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server response did not include the respondent name")]
    MissingName,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse server response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SubmissionError {
    /// Build a rejection, recognising the duplicate-email message
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if message == DUPLICATE_EMAIL_MESSAGE {
            SubmissionError::DuplicateEmail
        } else {
            SubmissionError::Rejected { status, message }
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            SubmissionError::DuplicateEmail => DUPLICATE_EMAIL_NOTICE,
            SubmissionError::Rejected { message, .. } if message == DUPLICATE_EMAIL_MESSAGE => {
                DUPLICATE_EMAIL_NOTICE
            }
            _ => GENERIC_FAILURE_NOTICE,
        }
    }
}

/// Edit refused by the form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("The form cannot be changed while it is {0}")]
    Locked(&'static str),

    #[error("Question {index} does not exist (the survey has {count} questions)")]
    QuestionOutOfRange { index: usize, count: usize },

    #[error("Question {index} is answered through the {field} field")]
    NamedQuestion { index: usize, field: &'static str },

    #[error("'{option}' is not an option of question {index}")]
    UnknownOption { index: usize, option: String },
}

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl SurveyError {
    /// Text for the single error slot shown to the respondent
    pub fn user_message(&self) -> String {
        match self {
            SurveyError::Validation(e) => e.to_string(),
            SurveyError::Submission(e) => e.user_message().to_string(),
            SurveyError::Edit(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_recognises_duplicate_email() {
        let err = SubmissionError::rejected(409, "Email already exists");
        assert!(matches!(err, SubmissionError::DuplicateEmail));
        assert_eq!(err.to_string(), DUPLICATE_EMAIL_MESSAGE);
        assert_eq!(err.user_message(), DUPLICATE_EMAIL_NOTICE);
    }

    #[test]
    fn test_duplicate_message_wins_however_rejection_is_built() {
        let err = SubmissionError::Rejected {
            status: 409,
            message: DUPLICATE_EMAIL_MESSAGE.to_string(),
        };
        assert_eq!(err.user_message(), DUPLICATE_EMAIL_NOTICE);
        assert_eq!(SurveyError::from(err).user_message(), DUPLICATE_EMAIL_NOTICE);
    }

    #[test]
    fn test_other_rejections_are_generic() {
        let err = SubmissionError::rejected(500, "email already exists");
        assert!(matches!(err, SubmissionError::Rejected { status: 500, .. }));
        assert_eq!(err.user_message(), GENERIC_FAILURE_NOTICE);
        assert_eq!(
            SurveyError::from(SubmissionError::MissingName).user_message(),
            GENERIC_FAILURE_NOTICE
        );
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = SurveyError::from(ValidationError::MissingDemographics);
        assert_eq!(err.user_message(), "Age and education fields are required.");
    }
}
