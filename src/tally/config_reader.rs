use crate::tally::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    pub survey_title: String,
    pub survey_date: Option<String>,
    /// Where to write the summary. Overridden by `--out`.
    pub output_path: Option<String>,
}

/// The `config` section of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    pub survey: String,
    pub date: Option<String>,
    pub total_responses: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSource {
    pub provider: String,
    pub file_path: String,
    #[serde(rename = "headerRowIndex")]
    _header_row_index: Option<JSValue>,
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    pub fn new(provider: &str, file_path: &str, excel_worksheet_name: Option<String>) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            _header_row_index: None,
            excel_worksheet_name,
        }
    }

    /// The 0-based position of the header row.
    pub fn header_row_index(&self) -> TallyResult<usize> {
        match &self._header_row_index {
            None => Ok(0),
            Some(_) => {
                let x = read_js_int(&self._header_row_index)?;
                if x == 0 {
                    whatever!("headerRowIndex starts at 1, found 0 for {}", self.file_path)
                }
                Ok(x - 1)
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfiguredQuestion {
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// The canonical options. Options without any answer are reported with a
    /// count of zero.
    pub options: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyConfig {
    pub output_settings: OutputSettings,
    pub sources: Vec<FileSource>,
    #[serde(default)]
    pub questions: Vec<ConfiguredQuestion>,
}

impl TallyConfig {
    pub fn options_for(&self, title: &str) -> Option<&[String]> {
        self.questions
            .iter()
            .find(|q| q.title == title)
            .and_then(|q| q.options.as_deref())
    }
}

pub fn read_config(path: &str) -> BTallyResult<TallyConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: TallyConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: String) -> BTallyResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> TallyResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}
