// ********* Survey records ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The input widget of a question, as tagged on the wire.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionType {
    /// Short free text.
    Text,
    /// Long free text.
    Textarea,
    /// One option out of a list (radio buttons).
    Radio,
    /// Any number of options out of a list.
    Checkbox,
    /// One option out of a drop-down list.
    Select,
}

/// How the answers to a choice question are encoded and counted.
///
/// Free-text questions have no choice kind: their answers are displayed
/// verbatim and never aggregated.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ChoiceKind {
    /// The raw answer is the literal selected label.
    Single,
    /// The raw answer is a JSON array of the selected labels.
    Multi,
}

impl QuestionType {
    pub fn choice_kind(&self) -> Option<ChoiceKind> {
        match self {
            QuestionType::Text | QuestionType::Textarea => None,
            QuestionType::Radio | QuestionType::Select => Some(ChoiceKind::Single),
            QuestionType::Checkbox => Some(ChoiceKind::Multi),
        }
    }

    /// True for the question types that need a list of options.
    pub fn has_options(&self) -> bool {
        self.choice_kind().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Text => "Short text",
            QuestionType::Textarea => "Long text",
            QuestionType::Radio => "Single choice",
            QuestionType::Checkbox => "Multiple choice",
            QuestionType::Select => "Drop-down list",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SurveyStatus {
    Draft,
    Published,
    Closed,
}

impl SurveyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SurveyStatus::Draft => "Draft",
            SurveyStatus::Published => "Published",
            SurveyStatus::Closed => "Closed",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u64,
    pub survey_id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// The options, stored by the server as a JSON-encoded array.
    pub options: Option<String>,
    pub order: u32,
    pub required: bool,
}

impl Question {
    /// The decoded option labels. See [`decode_options`].
    pub fn option_labels(&self) -> Option<Vec<String>> {
        decode_options(self.options.as_deref())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub created_by: u64,
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Only present when the survey is fetched individually.
    pub questions: Option<Vec<Question>>,
    pub creator: Option<Creator>,
    pub questions_count: Option<u64>,
    pub responses_count: Option<u64>,
}

/// Decodes the JSON-encoded option list of a question.
///
/// Returns `None` for a missing value, a value that is not valid JSON, or a
/// JSON value that is not an array. Non-string elements are kept with their
/// JSON text.
pub fn decode_options(options: Option<&str>) -> Option<Vec<String>> {
    options.and_then(crate::parse_selection)
}

// ********* Requests ***********

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Plain labels: the server encodes them as JSON itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub order: u32,
    pub required: bool,
}

/// Used both to create and to update a survey.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: SurveyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    pub question_id: u64,
    pub value: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    pub survey_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_email: Option<String>,
    pub answers: Vec<AnswerPayload>,
}

// ******** Analytics data structures *********

/// The raw answers of one question, as aggregated by the server.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalytics {
    pub question_id: u64,
    pub question_title: String,
    pub question_type: QuestionType,
    /// Number of respondents who answered: the denominator of the percentages.
    pub total_answers: u64,
    /// One raw value per respondent.
    pub answers: Vec<String>,
}

impl QuestionAnalytics {
    /// The rendering of the question, without a canonical list of options.
    pub fn tally(&self) -> Tally {
        crate::tally_question(self, None)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyHeader {
    pub id: u64,
    pub title: String,
    pub status: SurveyStatus,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnalytics {
    pub survey: SurveyHeader,
    pub total_responses: u64,
    pub analytics: Vec<QuestionAnalytics>,
}

/// One row of a frequency table.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OptionCount {
    pub option: String,
    pub count: u64,
    /// Always finite, in `[0, 100]`.
    pub percentage: f64,
}

/// The rendering of one question.
#[derive(PartialEq, Debug, Clone)]
pub enum Tally {
    /// Choice questions: ranked frequency table.
    Options(Vec<OptionCount>),
    /// Free-text questions: the answers as submitted.
    Verbatim(Vec<String>),
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseAnswer {
    pub id: u64,
    pub question_id: u64,
    pub value: String,
    pub question: AnsweredQuestion,
}

/// A complete individual response.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetail {
    pub id: u64,
    pub survey_id: u64,
    pub respondent_name: Option<String>,
    pub respondent_email: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: String,
    pub answers: Vec<ResponseAnswer>,
}

// ********* Errors **********

/// Validation errors raised while editing a survey or filling in a response.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SurveyErrors {
    MissingSurveyTitle,
    NoQuestions,
    MissingQuestionTitle,
    /// A choice question was saved without any option.
    MissingOptions { question_title: String },
    /// A required question has no valid answer.
    RequiredUnanswered { question_title: String },
    UnknownQuestion(u64),
    /// The operation does not apply to this type of question.
    WrongQuestionType {
        question_id: u64,
        question_type: QuestionType,
    },
    IndexOutOfRange(usize),
    /// The expiration date is not of the form `YYYY-MM-DD`.
    InvalidExpirationDate(String),
}

impl Error for SurveyErrors {}

impl Display for SurveyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyErrors::MissingSurveyTitle => write!(f, "The survey title is required"),
            SurveyErrors::NoQuestions => write!(f, "The survey needs at least one question"),
            SurveyErrors::MissingQuestionTitle => write!(f, "The question title is required"),
            SurveyErrors::MissingOptions { question_title } => write!(
                f,
                "The question \"{}\" needs at least one option",
                question_title
            ),
            SurveyErrors::RequiredUnanswered { question_title } => {
                write!(f, "The question \"{}\" is required", question_title)
            }
            SurveyErrors::UnknownQuestion(id) => write!(f, "Unknown question {}", id),
            SurveyErrors::WrongQuestionType {
                question_id,
                question_type,
            } => write!(
                f,
                "Question {} is of type {:?}, which does not accept this answer",
                question_id, question_type
            ),
            SurveyErrors::IndexOutOfRange(idx) => write!(f, "No question at position {}", idx),
            SurveyErrors::InvalidExpirationDate(d) => {
                write!(f, "Invalid expiration date {:?}, expected YYYY-MM-DD", d)
            }
        }
    }
}

/// A failed request to the survey server, as seen by the user.
///
/// Failures are reported, never retried.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UpstreamFailure {
    pub status: u16,
    /// The `message` field of the server error envelope, if any.
    pub message: Option<String>,
}

impl UpstreamFailure {
    pub fn new(status: u16, message: Option<String>) -> UpstreamFailure {
        UpstreamFailure { status, message }
    }

    pub fn user_message(&self) -> String {
        match (self.status, self.message.as_deref()) {
            (404, _) => "Survey not found or not available".to_string(),
            (410, _) => "This survey has expired".to_string(),
            (_, Some(m)) if !m.trim().is_empty() => m.to_string(),
            _ => "An error occurred. Please try again".to_string(),
        }
    }

    /// The session is no longer valid and the user must log in again.
    pub fn requires_login(&self) -> bool {
        self.status == 401
    }
}

impl Error for UpstreamFailure {}

impl Display for UpstreamFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (status {})", self.user_message(), self.status)
    }
}
