use std::collections::HashMap;
use std::path::Path;

use crate::tally::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Given the header of a file (names of each of the columns), and the titles of the
/// questions, finds the column of each question.
pub fn get_col_index_mapping(
    questions: &[ConfiguredQuestion],
    header: &[Option<String>],
    path: &str,
) -> BTallyResult<Vec<usize>> {
    let col_names: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(idx, x)| x.as_ref().map(|s| (s.trim().to_string(), idx)))
        .collect();
    debug!("get_col_index_mapping: col_names: {:?}", col_names);

    let mut col_indexes: Vec<usize> = Vec::new();
    for q in questions {
        let idx = col_names
            .get(q.title.trim())
            .context(MissingQuestionColumnSnafu {
                title: q.title.clone(),
                path,
            })?;
        col_indexes.push(*idx);
    }
    Ok(col_indexes)
}

/// Spreadsheet exports write multiple choices as `A;B`. Such cells are re-encoded
/// as JSON arrays. Cells that are already JSON arrays are kept.
pub fn normalize_checkbox_cell(cell: &str) -> String {
    if parse_selection(cell).is_some() {
        return cell.to_string();
    }
    let labels: Vec<String> = cell
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    encode_selection(&labels)
}

/// Turns a table of answers (one column per question, one row per respondent) into
/// per-question answer lists. Blank cells are skipped questions.
pub fn sheet_to_analytics(
    sheet: &ParsedSheet,
    questions: &[ConfiguredQuestion],
    path: &str,
) -> BTallyResult<SourceData> {
    let col_indexes = get_col_index_mapping(questions, &sheet.header, path)?;
    let mut res: Vec<QuestionAnalytics> = Vec::new();
    for (q_idx, (q, col_idx)) in questions.iter().zip(col_indexes.iter()).enumerate() {
        let mut answers: Vec<String> = Vec::new();
        for row in sheet.rows.iter() {
            let cell = row.cells.get(*col_idx).map(|s| s.trim()).unwrap_or("");
            if cell.is_empty() {
                debug!("sheet_to_analytics: {}: skipped {:?}", row.id, q.title);
                continue;
            }
            let value = match q.question_type.choice_kind() {
                Some(ChoiceKind::Multi) => normalize_checkbox_cell(cell),
                _ => cell.to_string(),
            };
            answers.push(value);
        }
        res.push(QuestionAnalytics {
            question_id: (q_idx + 1) as u64,
            question_title: q.title.clone(),
            question_type: q.question_type,
            total_answers: answers.len() as u64,
            answers,
        });
    }
    Ok(SourceData {
        total_responses: sheet.rows.len() as u64,
        questions: res,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(title: &str, question_type: QuestionType) -> ConfiguredQuestion {
        ConfiguredQuestion {
            title: title.to_string(),
            question_type,
            options: None,
        }
    }

    fn sheet() -> ParsedSheet {
        let row = |id: &str, cells: &[&str]| ParsedResponse {
            id: id.to_string(),
            cells: cells.iter().map(|s| s.to_string()).collect(),
        };
        ParsedSheet {
            header: vec![
                Some("Id".to_string()),
                Some("Color".to_string()),
                None,
                Some("Tools ".to_string()),
            ],
            rows: vec![
                row("r1", &["1", "Red", "x", "Git;Cargo"]),
                row("r2", &["2", " ", "x", r#"["Cargo"]"#]),
                row("r3", &["3", "Blue"]),
            ],
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("data/answers.csv"), "answers.csv");
        let default_id = make_default_id("data/answers.csv");
        assert_eq!(default_id(12), "answers.csv-00000012");
    }

    #[test]
    fn checkbox_cells() {
        assert_eq!(normalize_checkbox_cell("Git; Cargo ;"), r#"["Git","Cargo"]"#);
        assert_eq!(normalize_checkbox_cell(r#"["Git"]"#), r#"["Git"]"#);
        assert_eq!(normalize_checkbox_cell("Git"), r#"["Git"]"#);
    }

    #[test]
    fn columns_by_title() {
        let questions = vec![
            configured("Tools", QuestionType::Checkbox),
            configured("Color", QuestionType::Radio),
        ];
        let data = sheet_to_analytics(&sheet(), &questions, "answers.csv").unwrap();
        assert_eq!(data.total_responses, 3);
        assert_eq!(data.questions[0].question_id, 1);
        assert_eq!(
            data.questions[0].answers,
            vec![r#"["Git","Cargo"]"#, r#"["Cargo"]"#]
        );
        assert_eq!(data.questions[0].total_answers, 2);
        assert_eq!(data.questions[1].answers, vec!["Red", "Blue"]);
    }

    #[test]
    fn missing_column() {
        let questions = vec![configured("Size", QuestionType::Select)];
        let res = sheet_to_analytics(&sheet(), &questions, "answers.csv");
        assert!(matches!(
            res.map_err(|e| *e),
            Err(TallyError::MissingQuestionColumn { .. })
        ));
    }
}
