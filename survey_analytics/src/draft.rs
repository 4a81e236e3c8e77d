pub use crate::config::*;

use log::{debug, info};
use serde::Serialize;

/// A question being edited. The options are plain labels.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct DraftQuestion {
    pub id: Option<u64>,
    pub title: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub order: u32,
    pub required: bool,
}

impl DraftQuestion {
    pub fn new(title: &str, question_type: QuestionType) -> DraftQuestion {
        DraftQuestion {
            id: None,
            title: title.to_string(),
            question_type,
            options: Vec::new(),
            order: 0,
            required: false,
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> DraftQuestion {
        for opt in options {
            self.add_option(opt);
        }
        self
    }

    pub fn required(mut self, required: bool) -> DraftQuestion {
        self.required = required;
        self
    }

    fn from_question(q: &Question) -> DraftQuestion {
        DraftQuestion {
            id: Some(q.id),
            title: q.title.clone(),
            question_type: q.question_type,
            options: q.option_labels().unwrap_or_default(),
            order: q.order,
            required: q.required,
        }
    }

    /// Adds an option at the end. Blank options are ignored.
    pub fn add_option(&mut self, option: &str) -> bool {
        let opt = option.trim();
        if opt.is_empty() {
            return false;
        }
        self.options.push(opt.to_string());
        true
    }

    pub fn remove_option(&mut self, idx: usize) -> Option<String> {
        if idx < self.options.len() {
            Some(self.options.remove(idx))
        } else {
            None
        }
    }

    pub fn move_option_up(&mut self, idx: usize) {
        if idx > 0 && idx < self.options.len() {
            self.options.swap(idx, idx - 1);
        }
    }

    pub fn move_option_down(&mut self, idx: usize) {
        if idx + 1 < self.options.len() {
            self.options.swap(idx, idx + 1);
        }
    }

    fn validate(&self) -> Result<(), SurveyErrors> {
        if self.title.trim().is_empty() {
            return Err(SurveyErrors::MissingQuestionTitle);
        }
        if self.question_type.has_options() && self.options.is_empty() {
            return Err(SurveyErrors::MissingOptions {
                question_title: self.title.trim().to_string(),
            });
        }
        Ok(())
    }

    fn to_request(&self) -> CreateQuestionRequest {
        CreateQuestionRequest {
            title: self.title.trim().to_string(),
            question_type: self.question_type,
            options: options_to_request(&self.options),
            order: self.order,
            required: self.required,
        }
    }
}

/// Trims the options and drops the blank ones. `None` when nothing is left.
pub fn options_to_request(options: &[String]) -> Option<Vec<String>> {
    let res: Vec<String> = options
        .iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if res.is_empty() {
        None
    } else {
        Some(res)
    }
}

// `YYYY-MM-DD`, with a month in 1..=12 and a day that exists in that month.
fn is_calendar_date(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    let (y, m, d) = match parts.as_slice() {
        [y, m, d] if y.len() == 4 && m.len() == 2 && d.len() == 2 => (*y, *m, *d),
        _ => return false,
    };
    if !s.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return false;
    }
    let (year, month, day) = match (y.parse::<u32>(), m.parse::<u32>(), d.parse::<u32>()) {
        (Ok(year), Ok(month), Ok(day)) => (year, month, day),
        _ => return false,
    };
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => return false,
    };
    (1..=days_in_month).contains(&day)
}

// The part of the draft that counts for unsaved changes.
#[derive(Serialize)]
struct EditableState<'a> {
    title: &'a str,
    description: &'a str,
    status: SurveyStatus,
    expires_at: &'a str,
    questions: &'a [DraftQuestion],
}

/// A survey being created or edited.
///
/// The draft remembers a fingerprint of its state when it is loaded or saved,
/// which tells if the user has changes to lose.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyDraft {
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    pub status: SurveyStatus,
    /// `YYYY-MM-DD`, or empty for no expiration.
    pub expires_at: String,
    questions: Vec<DraftQuestion>,
    initial_state: String,
}

impl Default for SurveyDraft {
    fn default() -> Self {
        SurveyDraft::new()
    }
}

impl SurveyDraft {
    pub fn new() -> SurveyDraft {
        let mut d = SurveyDraft {
            id: None,
            title: String::new(),
            description: String::new(),
            status: SurveyStatus::Draft,
            expires_at: String::new(),
            questions: Vec::new(),
            initial_state: String::new(),
        };
        d.capture_initial_state();
        d
    }

    /// Loads an existing survey for editing.
    pub fn from_survey(survey: &Survey) -> SurveyDraft {
        let questions: Vec<DraftQuestion> = survey
            .questions
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(DraftQuestion::from_question)
            .collect();
        let expires_at = survey
            .expires_at
            .as_deref()
            .and_then(|s| s.split('T').next())
            .unwrap_or("")
            .to_string();
        let mut d = SurveyDraft {
            id: Some(survey.id),
            title: survey.title.clone(),
            description: survey.description.clone().unwrap_or_default(),
            status: survey.status,
            expires_at,
            questions,
            initial_state: String::new(),
        };
        d.capture_initial_state();
        info!(
            "Loaded survey {} with {} questions",
            survey.id,
            d.questions.len()
        );
        d
    }

    pub fn questions(&self) -> &[DraftQuestion] {
        &self.questions
    }

    pub fn question_mut(&mut self, idx: usize) -> Result<&mut DraftQuestion, SurveyErrors> {
        self.questions
            .get_mut(idx)
            .ok_or(SurveyErrors::IndexOutOfRange(idx))
    }

    fn fingerprint(&self) -> String {
        let state = EditableState {
            title: &self.title,
            description: &self.description,
            status: self.status,
            expires_at: &self.expires_at,
            questions: &self.questions,
        };
        let js = serde_json::to_string(&state).unwrap_or_default();
        sha256::digest(js)
    }

    /// The current state becomes the reference for unsaved changes.
    pub fn capture_initial_state(&mut self) {
        self.initial_state = self.fingerprint();
    }

    /// True if the draft differs from the captured state. Undoing an edit
    /// brings this back to false.
    pub fn has_unsaved_changes(&self) -> bool {
        self.fingerprint() != self.initial_state
    }

    /// Leaving the editor discards changes, and needs a confirmation.
    pub fn needs_confirmation_to_leave(&self) -> bool {
        self.has_unsaved_changes()
    }

    /// Appends a question. It is numbered after the existing ones.
    pub fn add_question(&mut self, question: DraftQuestion) -> Result<(), SurveyErrors> {
        question.validate()?;
        let mut q = question;
        q.order = self.questions.len() as u32 + 1;
        debug!("add_question: {:?}", q);
        self.questions.push(q);
        Ok(())
    }

    /// Replaces the question at `idx`, keeping its position and its server id.
    pub fn update_question(
        &mut self,
        idx: usize,
        question: DraftQuestion,
    ) -> Result<(), SurveyErrors> {
        question.validate()?;
        let slot = self.question_mut(idx)?;
        *slot = DraftQuestion {
            id: slot.id,
            order: slot.order,
            ..question
        };
        Ok(())
    }

    pub fn remove_question(&mut self, idx: usize) -> Result<DraftQuestion, SurveyErrors> {
        if idx >= self.questions.len() {
            return Err(SurveyErrors::IndexOutOfRange(idx));
        }
        let q = self.questions.remove(idx);
        self.renumber();
        Ok(q)
    }

    pub fn move_question_up(&mut self, idx: usize) {
        if idx > 0 && idx < self.questions.len() {
            self.questions.swap(idx, idx - 1);
            self.renumber();
        }
    }

    pub fn move_question_down(&mut self, idx: usize) {
        if idx + 1 < self.questions.len() {
            self.questions.swap(idx, idx + 1);
            self.renumber();
        }
    }

    fn renumber(&mut self) {
        for (i, q) in self.questions.iter_mut().enumerate() {
            q.order = i as u32 + 1;
        }
    }

    /// Builds the request that creates or updates the survey.
    pub fn to_request(&self) -> Result<CreateSurveyRequest, SurveyErrors> {
        if self.title.trim().is_empty() {
            return Err(SurveyErrors::MissingSurveyTitle);
        }
        if self.questions.is_empty() {
            return Err(SurveyErrors::NoQuestions);
        }
        let expires_at = match self.expires_at.trim() {
            "" => None,
            d => {
                let date = d.split('T').next().unwrap_or(d);
                if !is_calendar_date(date) {
                    return Err(SurveyErrors::InvalidExpirationDate(d.to_string()));
                }
                Some(format!("{}T00:00:00.000Z", date))
            }
        };
        Ok(CreateSurveyRequest {
            title: self.title.trim().to_string(),
            description: Some(self.description.trim().to_string()),
            status: self.status,
            expires_at,
            questions: self.questions.iter().map(|q| q.to_request()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> Survey {
        let q = |id: u64, title: &str, qt: QuestionType, options: Option<&str>| Question {
            id,
            survey_id: 5,
            title: title.to_string(),
            question_type: qt,
            options: options.map(|s| s.to_string()),
            order: id as u32,
            required: false,
        };
        Survey {
            id: 5,
            title: "Onboarding".to_string(),
            description: None,
            status: SurveyStatus::Published,
            created_by: 1,
            expires_at: Some("2025-03-01T00:00:00.000Z".to_string()),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
            updated_at: "2025-01-02T00:00:00.000Z".to_string(),
            questions: Some(vec![
                q(1, "Team", QuestionType::Select, Some(r#"["Core","Infra"]"#)),
                q(2, "Tools", QuestionType::Checkbox, Some("not json")),
                q(3, "Notes", QuestionType::Textarea, None),
            ]),
            creator: None,
            questions_count: Some(3),
            responses_count: Some(0),
        }
    }

    #[test]
    fn loading_a_survey() {
        let d = SurveyDraft::from_survey(&survey());
        assert_eq!(d.expires_at, "2025-03-01");
        assert_eq!(d.questions()[0].options, vec!["Core", "Infra"]);
        assert!(d.questions()[1].options.is_empty());
        assert!(!d.has_unsaved_changes());
    }

    #[test]
    fn reverting_an_edit_clears_the_flag() {
        let mut d = SurveyDraft::from_survey(&survey());
        d.title = "Onboarding 2".to_string();
        assert!(d.has_unsaved_changes());
        assert!(d.needs_confirmation_to_leave());
        d.title = "Onboarding".to_string();
        assert!(!d.has_unsaved_changes());

        d.question_mut(0).unwrap().move_option_down(0);
        assert!(d.has_unsaved_changes());
        d.capture_initial_state();
        assert!(!d.has_unsaved_changes());
    }

    #[test]
    fn question_validation() {
        let mut d = SurveyDraft::new();
        assert_eq!(
            d.add_question(DraftQuestion::new("  ", QuestionType::Text)),
            Err(SurveyErrors::MissingQuestionTitle)
        );
        assert_eq!(
            d.add_question(DraftQuestion::new("Color", QuestionType::Radio)),
            Err(SurveyErrors::MissingOptions {
                question_title: "Color".to_string()
            })
        );
        assert!(!d.has_unsaved_changes());
        d.add_question(DraftQuestion::new("Color", QuestionType::Radio).with_options(&["Red", " ", "Blue "]))
            .unwrap();
        assert_eq!(d.questions()[0].options, vec!["Red", "Blue"]);
        assert_eq!(d.questions()[0].order, 1);
        assert!(d.has_unsaved_changes());
    }

    #[test]
    fn reordering_renumbers() {
        let mut d = SurveyDraft::from_survey(&survey());
        d.move_question_down(0);
        let titles: Vec<(&str, u32)> = d.questions().iter().map(|q| (q.title.as_str(), q.order)).collect();
        assert_eq!(titles, vec![("Tools", 1), ("Team", 2), ("Notes", 3)]);

        d.move_question_up(0);
        d.move_question_down(2);
        assert_eq!(d.questions()[0].title, "Tools");

        let removed = d.remove_question(0).unwrap();
        assert_eq!(removed.title, "Tools");
        let orders: Vec<u32> = d.questions().iter().map(|q| q.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(d.remove_question(7), Err(SurveyErrors::IndexOutOfRange(7)));
    }

    #[test]
    fn update_keeps_position() {
        let mut d = SurveyDraft::from_survey(&survey());
        let edited = DraftQuestion::new("Main team", QuestionType::Radio).with_options(&["Core"]);
        d.update_question(0, edited).unwrap();
        assert_eq!(d.questions()[0].title, "Main team");
        assert_eq!(d.questions()[0].order, 1);
        assert!(d
            .update_question(1, DraftQuestion::new("Tools", QuestionType::Checkbox))
            .is_err());
    }

    #[test]
    fn expiration_must_be_a_date() {
        let mut d = SurveyDraft::new();
        d.title = "Lunch".to_string();
        d.add_question(DraftQuestion::new("Where?", QuestionType::Text))
            .unwrap();
        for bad in ["garbage", "2025-13-01", "2025-02-30", "25-01-01", "2025-1-01", "+025-01-01"] {
            d.expires_at = bad.to_string();
            assert_eq!(
                d.to_request(),
                Err(SurveyErrors::InvalidExpirationDate(bad.to_string())),
                "{}",
                bad
            );
        }
        d.expires_at = "2024-02-29".to_string();
        assert_eq!(
            d.to_request().unwrap().expires_at,
            Some("2024-02-29T00:00:00.000Z".to_string())
        );
        d.expires_at = "2025-03-01T00:00:00.000Z".to_string();
        assert_eq!(
            d.to_request().unwrap().expires_at,
            Some("2025-03-01T00:00:00.000Z".to_string())
        );
    }

    #[test]
    fn saving_an_unchanged_question_keeps_the_draft_clean() {
        let mut d = SurveyDraft::from_survey(&survey());
        let same = DraftQuestion::new("Team", QuestionType::Select).with_options(&["Core", "Infra"]);
        d.update_question(0, same).unwrap();
        assert_eq!(d.questions()[0].id, Some(1));
        assert!(!d.has_unsaved_changes());
        assert!(!d.needs_confirmation_to_leave());

        let renamed = DraftQuestion::new("Squad", QuestionType::Select).with_options(&["Core"]);
        d.update_question(0, renamed).unwrap();
        assert_eq!(d.questions()[0].id, Some(1));
        assert!(d.has_unsaved_changes());
    }

    #[test]
    fn option_editing() {
        let mut q = DraftQuestion::new("Size", QuestionType::Select).with_options(&["S", "M", "L"]);
        q.move_option_up(2);
        assert_eq!(q.options, vec!["S", "L", "M"]);
        q.move_option_up(0);
        q.move_option_down(2);
        assert_eq!(q.options, vec!["S", "L", "M"]);
        assert_eq!(q.remove_option(0), Some("S".to_string()));
        assert_eq!(q.remove_option(5), None);
        assert!(!q.add_option("   "));
    }

    #[test]
    fn request_building() {
        let mut d = SurveyDraft::new();
        assert_eq!(d.to_request(), Err(SurveyErrors::MissingSurveyTitle));
        d.title = "  Lunch  ".to_string();
        assert_eq!(d.to_request(), Err(SurveyErrors::NoQuestions));
        d.expires_at = "2025-06-30".to_string();
        d.add_question(DraftQuestion::new(" Where? ", QuestionType::Text).required(true))
            .unwrap();
        let mut q = DraftQuestion::new("Dish", QuestionType::Checkbox).with_options(&["Soup"]);
        q.options.push("  ".to_string());
        d.add_question(q).unwrap();

        let req = d.to_request().unwrap();
        assert_eq!(req.title, "Lunch");
        assert_eq!(req.description, Some("".to_string()));
        assert_eq!(req.expires_at, Some("2025-06-30T00:00:00.000Z".to_string()));
        assert_eq!(req.questions[0].title, "Where?");
        assert_eq!(req.questions[0].options, None);
        assert!(req.questions[0].required);
        assert_eq!(req.questions[1].options, Some(vec!["Soup".to_string()]));
        assert_eq!(req.questions[1].order, 2);

        let js = serde_json::to_value(&req).unwrap();
        assert_eq!(js["questions"][1]["type"], "CHECKBOX");
        assert!(js["questions"][0].get("options").is_none());
    }
}
