mod config;
use log::{debug, info, warn};

use serde_json::Value as JSValue;
use std::collections::{HashMap, HashSet};

pub mod builder;
pub mod dashboard;
pub mod draft;
pub mod manual;
pub mod quick_start;

pub use crate::config::*;

// **** Private structures ****

// Running counts per label. Rows are kept in first-occurrence order, which is
// the tie-break order of the final table.
#[derive(Debug, Default)]
struct LabelCounts {
    positions: HashMap<String, usize>,
    rows: Vec<(String, u64)>,
}

impl LabelCounts {
    fn add(&mut self, label: &str) {
        match self.positions.get(label) {
            Some(&idx) => self.rows[idx].1 += 1,
            None => {
                self.positions.insert(label.to_string(), self.rows.len());
                self.rows.push((label.to_string(), 1));
            }
        }
    }

    fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    fn contributions(&self) -> u64 {
        self.rows.iter().map(|(_, c)| *c).sum()
    }
}

fn percentage(count: u64, total_answers: u64) -> f64 {
    if total_answers == 0 {
        return 0.0;
    }
    // A label can be counted more often than there are respondents when the
    // caller passes an inconsistent total, or when a multi-choice answer repeats
    // a label.
    (count as f64 / total_answers as f64 * 100.0).min(100.0)
}

/// Decodes a multi-choice answer.
///
/// Returns the selected labels if `raw` is a JSON array, and `None` otherwise.
/// String elements are taken as they are; any other element is kept with its
/// JSON text.
pub fn parse_selection(raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<JSValue>(raw) {
        Ok(JSValue::Array(items)) => Some(
            items
                .into_iter()
                .map(|v| match v {
                    JSValue::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Encodes the selected labels of a multi-choice answer as a JSON array.
pub fn encode_selection(labels: &[String]) -> String {
    serde_json::to_string(labels).unwrap_or_else(|_| "[]".to_string())
}

/// The labels of one answer, for displaying an individual response.
///
/// An answer that is not a JSON array is shown as a single label.
pub fn parse_checkbox_answer(value: &str) -> Vec<String> {
    parse_selection(value).unwrap_or_else(|| vec![value.to_string()])
}

fn count_labels<S: AsRef<str>>(kind: ChoiceKind, raw_answers: &[S]) -> LabelCounts {
    let mut counts = LabelCounts::default();
    for raw in raw_answers.iter().map(|s| s.as_ref()) {
        match kind {
            ChoiceKind::Single => counts.add(raw),
            ChoiceKind::Multi => match parse_selection(raw) {
                Some(labels) => {
                    for label in labels.iter() {
                        counts.add(label);
                    }
                }
                None => {
                    debug!(
                        "count_labels: answer {:?} is not a JSON array, counting it as one label",
                        raw
                    );
                    counts.add(raw);
                }
            },
        }
    }
    counts
}

fn to_option_counts(counts: LabelCounts, total_answers: u64) -> Vec<OptionCount> {
    let mut res: Vec<OptionCount> = counts
        .rows
        .into_iter()
        .map(|(option, count)| OptionCount {
            option,
            count,
            percentage: percentage(count, total_answers),
        })
        .collect();
    // Stable: equal counts keep their first-occurrence order.
    res.sort_by(|a, b| b.count.cmp(&a.count));
    res
}

/// Reduces the raw answers of a choice question to a ranked frequency table.
///
/// Arguments:
/// * `kind` how the raw answers are encoded
/// * `total_answers` the number of respondents, used as the denominator of the
/// percentages. For multi-choice questions the counts may add up to more than
/// this number.
/// * `raw_answers` one raw value per respondent
///
/// The rows are sorted by decreasing count. Rows with the same count are in
/// the order in which their label first appears in `raw_answers`.
///
/// This function never fails: a multi-choice answer that is not a JSON array is
/// counted as one literal label, and a zero `total_answers` gives 0 percent.
pub fn aggregate<S: AsRef<str>>(
    kind: ChoiceKind,
    total_answers: u64,
    raw_answers: &[S],
) -> Vec<OptionCount> {
    let counts = count_labels(kind, raw_answers);
    debug!(
        "aggregate: kind: {:?} respondents: {} labels: {} contributions: {}",
        kind,
        total_answers,
        counts.rows.len(),
        counts.contributions()
    );
    to_option_counts(counts, total_answers)
}

/// Like [`aggregate`], with a canonical list of options.
///
/// Options of the canonical list that nobody picked are appended with a count
/// of zero, in canonical order.
pub fn aggregate_with_options<S: AsRef<str>>(
    kind: ChoiceKind,
    total_answers: u64,
    raw_answers: &[S],
    options: &[String],
) -> Vec<OptionCount> {
    let counts = count_labels(kind, raw_answers);
    let mut missing: Vec<String> = Vec::new();
    for opt in options.iter() {
        if !counts.contains(opt) && !missing.contains(opt) {
            missing.push(opt.clone());
        }
    }
    let mut res = to_option_counts(counts, total_answers);
    res.extend(missing.into_iter().map(|option| OptionCount {
        option,
        count: 0,
        percentage: 0.0,
    }));
    res
}

/// Computes the rendering of a question: a frequency table for the choice
/// questions, the answers as submitted for the free-text questions.
///
/// `options` is the canonical option list, if known.
pub fn tally_question(question: &QuestionAnalytics, options: Option<&[String]>) -> Tally {
    match (question.question_type.choice_kind(), options) {
        (None, _) => Tally::Verbatim(question.answers.clone()),
        (Some(kind), Some(opts)) => Tally::Options(aggregate_with_options(
            kind,
            question.total_answers,
            question.answers.as_slice(),
            opts,
        )),
        (Some(kind), None) => Tally::Options(aggregate(
            kind,
            question.total_answers,
            question.answers.as_slice(),
        )),
    }
}

/// The width of a percentage bar, e.g. `"67%"`.
pub fn bar_width(percentage: f64) -> String {
    format!("{}%", percentage.round() as u64)
}

/// Groups individual responses into per-question answer lists.
///
/// Questions are listed in order of first appearance. The number of answers of
/// a question is the number of responses that answered it. A response that
/// answers a question twice only counts with its first answer.
pub fn analytics_from_responses(responses: &[ResponseDetail]) -> Vec<QuestionAnalytics> {
    info!("Grouping {} responses", responses.len());
    let mut positions: HashMap<u64, usize> = HashMap::new();
    let mut res: Vec<QuestionAnalytics> = Vec::new();
    for r in responses.iter() {
        let mut seen: HashSet<u64> = HashSet::new();
        for a in r.answers.iter() {
            if !seen.insert(a.question_id) {
                warn!(
                    "analytics_from_responses: response {} answers question {} more than once, keeping the first answer",
                    r.id, a.question_id
                );
                continue;
            }
            let idx = *positions.entry(a.question_id).or_insert_with(|| {
                res.push(QuestionAnalytics {
                    question_id: a.question_id,
                    question_title: a.question.title.clone(),
                    question_type: a.question.question_type,
                    total_answers: 0,
                    answers: Vec::new(),
                });
                res.len() - 1
            });
            let qa = &mut res[idx];
            qa.answers.push(a.value.clone());
            qa.total_answers += 1;
        }
    }
    debug!("analytics_from_responses: {} questions", res.len());
    res
}
