pub use crate::config::*;

use log::debug;

/// The answer a respondent is entering for one question.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Selection {
    /// Free text, as typed.
    Text(String),
    /// At most one label.
    Single(Option<String>),
    /// The selected labels, without duplicates, in selection order.
    Multi(Vec<String>),
}

impl Selection {
    fn empty(question_type: QuestionType) -> Selection {
        match question_type.choice_kind() {
            None => Selection::Text(String::new()),
            Some(ChoiceKind::Single) => Selection::Single(None),
            Some(ChoiceKind::Multi) => Selection::Multi(Vec::new()),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QuestionAnswer {
    pub question_id: u64,
    pub question_title: String,
    pub question_type: QuestionType,
    pub required: bool,
    pub options: Option<Vec<String>>,
    pub selection: Selection,
}

impl QuestionAnswer {
    pub fn new(question: &Question) -> QuestionAnswer {
        QuestionAnswer {
            question_id: question.id,
            question_title: question.title.clone(),
            question_type: question.question_type,
            required: question.required,
            options: question.option_labels(),
            selection: Selection::empty(question.question_type),
        }
    }

    /// An all-whitespace text, a missing single choice or an empty multiple
    /// choice do not count as an answer.
    pub fn has_valid_answer(&self) -> bool {
        match &self.selection {
            Selection::Text(t) => !t.trim().is_empty(),
            Selection::Single(s) => s.as_deref().map_or(false, |s| !s.is_empty()),
            Selection::Multi(labels) => !labels.is_empty(),
        }
    }

    /// The value sent on the wire.
    ///
    /// Multiple choices are encoded as a JSON array (`"[]"` when nothing is
    /// selected), single choices as the literal label and free text trimmed.
    pub fn value(&self) -> String {
        match &self.selection {
            Selection::Text(t) => t.trim().to_string(),
            Selection::Single(s) => s.clone().unwrap_or_default(),
            Selection::Multi(labels) => crate::encode_selection(labels),
        }
    }

    pub fn is_checked(&self, option: &str) -> bool {
        match &self.selection {
            Selection::Multi(labels) => labels.iter().any(|l| l == option),
            Selection::Single(Some(s)) => s == option,
            _ => false,
        }
    }

    fn clear(&mut self) {
        self.selection = Selection::empty(self.question_type);
    }
}

/// Collects the answers of one respondent to a survey.
///
/// ```
/// use survey_analytics::builder::Collector;
/// use survey_analytics::{Question, QuestionType};
///
/// let colors = Question {
///     id: 4,
///     survey_id: 1,
///     title: "Favorite colors".to_string(),
///     question_type: QuestionType::Checkbox,
///     options: Some(r#"["Red","Blue"]"#.to_string()),
///     order: 1,
///     required: true,
/// };
/// let mut collector = Collector::new(1, &[colors]);
/// collector.toggle(4, "Blue")?;
/// collector.toggle(4, "Red")?;
///
/// let request = collector.submission()?;
/// assert_eq!(request.answers[0].value, r#"["Blue","Red"]"#);
///
/// # Ok::<(), survey_analytics::SurveyErrors>(())
/// ```
pub struct Collector {
    pub(crate) _survey_id: u64,
    pub(crate) _answers: Vec<QuestionAnswer>,
    pub(crate) _respondent_name: String,
    pub(crate) _respondent_email: String,
}

impl Collector {
    pub fn new(survey_id: u64, questions: &[Question]) -> Collector {
        Collector {
            _survey_id: survey_id,
            _answers: questions.iter().map(QuestionAnswer::new).collect(),
            _respondent_name: String::new(),
            _respondent_email: String::new(),
        }
    }

    /// A collector for all the questions of a survey. A survey fetched without
    /// its questions gives an empty form.
    pub fn for_survey(survey: &Survey) -> Collector {
        Collector::new(survey.id, survey.questions.as_deref().unwrap_or(&[]))
    }

    pub fn answers(&self) -> &[QuestionAnswer] {
        &self._answers
    }

    pub fn answer(&self, question_id: u64) -> Option<&QuestionAnswer> {
        self._answers.iter().find(|qa| qa.question_id == question_id)
    }

    fn answer_mut(&mut self, question_id: u64) -> Result<&mut QuestionAnswer, SurveyErrors> {
        self._answers
            .iter_mut()
            .find(|qa| qa.question_id == question_id)
            .ok_or(SurveyErrors::UnknownQuestion(question_id))
    }

    pub fn set_respondent(&mut self, name: &str, email: &str) {
        self._respondent_name = name.to_string();
        self._respondent_email = email.to_string();
    }

    pub fn set_text(&mut self, question_id: u64, text: &str) -> Result<(), SurveyErrors> {
        let qa = self.answer_mut(question_id)?;
        match &mut qa.selection {
            Selection::Text(t) => {
                *t = text.to_string();
                Ok(())
            }
            _ => Err(SurveyErrors::WrongQuestionType {
                question_id,
                question_type: qa.question_type,
            }),
        }
    }

    /// Selects the only option of a single choice question.
    pub fn select(&mut self, question_id: u64, option: &str) -> Result<(), SurveyErrors> {
        let qa = self.answer_mut(question_id)?;
        match &mut qa.selection {
            Selection::Single(s) => {
                *s = Some(option.to_string());
                Ok(())
            }
            _ => Err(SurveyErrors::WrongQuestionType {
                question_id,
                question_type: qa.question_type,
            }),
        }
    }

    /// Checks or unchecks an option of a multiple choice question.
    pub fn set_checked(
        &mut self,
        question_id: u64,
        option: &str,
        checked: bool,
    ) -> Result<(), SurveyErrors> {
        let qa = self.answer_mut(question_id)?;
        match &mut qa.selection {
            Selection::Multi(labels) => {
                let present = labels.iter().any(|l| l == option);
                if checked && !present {
                    labels.push(option.to_string());
                } else if !checked {
                    labels.retain(|l| l != option);
                }
                Ok(())
            }
            _ => Err(SurveyErrors::WrongQuestionType {
                question_id,
                question_type: qa.question_type,
            }),
        }
    }

    /// Flips an option of a multiple choice question. Returns whether the
    /// option is now checked.
    pub fn toggle(&mut self, question_id: u64, option: &str) -> Result<bool, SurveyErrors> {
        let checked = self
            .answer(question_id)
            .map_or(false, |qa| qa.is_checked(option));
        self.set_checked(question_id, option, !checked)?;
        Ok(!checked)
    }

    /// Checks that every required question has an answer. Reports the first
    /// missing one, in question order.
    pub fn validate(&self) -> Result<(), SurveyErrors> {
        for qa in self._answers.iter() {
            if qa.required && !qa.has_valid_answer() {
                debug!("validate: question {} is unanswered", qa.question_id);
                return Err(SurveyErrors::RequiredUnanswered {
                    question_title: qa.question_title.clone(),
                });
            }
        }
        Ok(())
    }

    /// Builds the request that submits this response.
    ///
    /// Unanswered text and single choice questions are left out. Multiple
    /// choice questions are always sent, as `"[]"` when nothing is selected.
    pub fn submission(&self) -> Result<SubmitResponseRequest, SurveyErrors> {
        self.validate()?;
        let answers: Vec<AnswerPayload> = self
            ._answers
            .iter()
            .filter(|qa| {
                qa.has_valid_answer() || qa.question_type.choice_kind() == Some(ChoiceKind::Multi)
            })
            .map(|qa| AnswerPayload {
                question_id: qa.question_id,
                value: qa.value(),
            })
            .collect();
        Ok(SubmitResponseRequest {
            survey_id: self._survey_id,
            respondent_name: non_empty(&self._respondent_name),
            respondent_email: non_empty(&self._respondent_email),
            answers,
        })
    }

    /// Clears all the answers, to respond again.
    pub fn reset(&mut self) {
        self._respondent_name.clear();
        self._respondent_email.clear();
        for qa in self._answers.iter_mut() {
            qa.clear();
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
