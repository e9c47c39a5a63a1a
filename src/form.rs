//! Survey form state machine
//!
//! `SurveyForm` owns everything the respondent has entered plus the transient
//! UI state of the submit flow. The UI layer only reads from it and feeds it
//! edits, so the same rules apply to the terminal form and to the CLI.
//!
//! ```text
//! Editing --begin_submit--> Submitting --finish_submit--> Acknowledged
//!    ^                          |
//!    +------ error slot set ----+
//! ```

use tracing::{debug, info, warn};

use crate::api::SubmitResponse;
use crate::errors::{EditError, SubmissionError, SurveyError, ValidationError};
use crate::models::{Answer, AnswerSheet, FieldName, FormState, SubmissionResult};
use crate::questions::{question_count, QUESTIONS};

/// Where the form is in its submit flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    /// Terminal for the session
    Acknowledged { dialog_open: bool },
}

impl Phase {
    pub fn describe(&self) -> &'static str {
        match self {
            Phase::Editing => "being edited",
            Phase::Submitting => "being submitted",
            Phase::Acknowledged { .. } => "already submitted",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SurveyForm {
    state: FormState,
    phase: Phase,
    error: Option<String>,
}

impl Default for SurveyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyForm {
    pub fn new() -> Self {
        Self {
            state: FormState::default(),
            phase: Phase::Editing,
            error: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Message currently in the error slot
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Acknowledged { .. })
    }

    pub fn is_acknowledgement_open(&self) -> bool {
        self.phase == Phase::Acknowledged { dialog_open: true }
    }

    fn ensure_editable(&self) -> Result<(), EditError> {
        match self.phase {
            Phase::Editing => Ok(()),
            other => Err(EditError::Locked(other.describe())),
        }
    }

    /// Overwrite one scalar field of the record
    pub fn update_field(&mut self, field: FieldName, value: impl Into<String>) -> Result<(), EditError> {
        self.ensure_editable()?;
        *self.state.field_mut(field) = value.into();
        Ok(())
    }

    /// Record `option` as the answer to the question at `index`.
    ///
    /// Only slot `index` changes; choosing again replaces the previous answer.
    /// Questions bound to a named field are answered through
    /// [`SurveyForm::update_field`] instead.
    pub fn select_answer(&mut self, index: usize, option: &str) -> Result<(), EditError> {
        self.ensure_editable()?;
        let question = QUESTIONS.get(index).ok_or(EditError::QuestionOutOfRange {
            index,
            count: question_count(),
        })?;
        if let Some(field) = question.field_name {
            return Err(EditError::NamedQuestion {
                index,
                field: field.as_str(),
            });
        }
        if question.option_index(option).is_none() {
            return Err(EditError::UnknownOption {
                index,
                option: option.to_string(),
            });
        }

        debug!("Question {} answered with '{}'", index, option);
        self.state.set_answer(
            index,
            Answer {
                question: question.prompt.to_string(),
                answer: option.to_string(),
            },
        );
        Ok(())
    }

    /// Pick option `option_index` of question `index`, whichever way that
    /// question is bound
    pub fn choose(&mut self, index: usize, option_index: usize) -> Result<(), EditError> {
        let question = QUESTIONS.get(index).ok_or(EditError::QuestionOutOfRange {
            index,
            count: question_count(),
        })?;
        let option = question.options.get(option_index).ok_or_else(|| EditError::UnknownOption {
            index,
            option: format!("#{}", option_index + 1),
        })?;

        match question.field_name {
            Some(field) => self.update_field(field, *option),
            None => self.select_answer(index, option),
        }
    }

    /// Current choice for question `index`
    pub fn selected_option(&self, index: usize) -> Option<&str> {
        let question = QUESTIONS.get(index)?;
        let value = match question.field_name {
            Some(field) => self.state.field(field),
            None => self.state.answer(index).map(|a| a.answer.as_str())?,
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Number of questions with a choice, named ones included
    pub fn answered_questions(&self) -> usize {
        (0..question_count())
            .filter(|&i| self.selected_option(i).is_some())
            .count()
    }

    /// Fill the form from a prepared answer sheet
    pub fn apply_sheet(&mut self, sheet: &AnswerSheet) -> Result<(), EditError> {
        self.update_field(FieldName::Name, sheet.name.as_str())?;
        self.update_field(FieldName::Email, sheet.email.as_str())?;
        self.update_field(FieldName::Age, sheet.age.as_str())?;
        self.update_field(FieldName::Education, sheet.education.as_str())?;

        for (number, option) in &sheet.answers {
            let index = number.checked_sub(1).ok_or(EditError::QuestionOutOfRange {
                index: 0,
                count: question_count(),
            })?;
            self.select_answer(index, option)?;
        }
        Ok(())
    }

    /// Check required inputs without touching any state
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.state.age.is_empty() || self.state.education.is_empty() {
            return Err(ValidationError::MissingDemographics);
        }
        if self.state.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        let email = self.state.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !looks_like_email(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }

    /// Validate and enter `Submitting`, returning the snapshot to send.
    ///
    /// A validation failure fills the error slot and leaves the phase alone.
    pub fn begin_submit(&mut self) -> Result<FormState, SurveyError> {
        self.ensure_editable()?;

        if let Err(e) = self.validate() {
            warn!("Submission blocked: {}", e);
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        self.phase = Phase::Submitting;
        self.error = None;
        Ok(self.state.clone())
    }

    /// Complete a submission started with [`SurveyForm::begin_submit`].
    ///
    /// Every outcome leaves `Submitting`.
    pub fn finish_submit(
        &mut self,
        result: Result<SubmissionResult, SubmissionError>,
    ) -> Result<SubmissionResult, SurveyError> {
        if self.phase != Phase::Submitting {
            warn!("Ignoring submission result while form is {}", self.phase.describe());
            return Err(EditError::Locked(self.phase.describe()).into());
        }

        let outcome = match result {
            Ok(res) if res.is_success() => Ok(res),
            Ok(_) => Err(SubmissionError::MissingName),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(res) => {
                info!("Survey response saved for {}", res.name.as_deref().unwrap_or_default());
                self.state = FormState::default();
                self.error = None;
                self.phase = Phase::Acknowledged { dialog_open: true };
                Ok(res)
            }
            Err(e) => {
                warn!("Error submitting form: {}", e);
                self.error = Some(e.user_message().to_string());
                self.phase = Phase::Editing;
                Err(e.into())
            }
        }
    }

    /// Validate, send through `submitter`, and apply the outcome
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<SubmissionResult, SurveyError>
    where
        S: SubmitResponse + ?Sized,
    {
        let snapshot = self.begin_submit()?;
        let result = submitter.submit_response(&snapshot).await;
        self.finish_submit(result)
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn dismiss_acknowledgement(&mut self) {
        if let Phase::Acknowledged { dialog_open: true } = self.phase {
            self.phase = Phase::Acknowledged { dialog_open: false };
        }
    }
}

/// `local@domain` with no whitespace
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
