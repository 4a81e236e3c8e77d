use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_analytics::*;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;

use crate::args::Args;
use crate::tally::config_reader::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TallyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet with answers in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Several worksheets in {path}: the worksheet name must be provided"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Unexpected cell type on line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive integer"))]
    ParsingJsonNumber {},
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Provider not implemented: {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("The provider {provider} needs the list of questions in the configuration"))]
    MissingQuestions { provider: String },
    #[snafu(display("Cannot find the question {title:?} in the header of {path}"))]
    MissingQuestionColumn { title: String, path: String },
    #[snafu(display("No input: one of --config or --input must be provided"))]
    MissingInput {},
    #[snafu(display("No source of answers in the configuration"))]
    NoSources {},
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, TallyError>;
pub type BTallyResult<T> = Result<T, Box<TallyError>>;

/// The answers read from one source.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct SourceData {
    pub total_responses: u64,
    pub questions: Vec<QuestionAnalytics>,
}

/// A table of answers, as read from a spreadsheet.
/// The cells are not interpreted yet.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct ParsedSheet {
    pub header: Vec<Option<String>>,
    pub rows: Vec<ParsedResponse>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct ParsedResponse {
    pub id: String,
    pub cells: Vec<String>,
}

fn read_source_data(
    root_path: &Path,
    cfs: &FileSource,
    questions: &[ConfiguredQuestion],
) -> BTallyResult<SourceData> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read answer file {:?}", p2);
    let provider = cfs.provider.as_str();
    let needs_questions = || -> BTallyResult<()> {
        if questions.is_empty() {
            return Err(Box::new(TallyError::MissingQuestions {
                provider: provider.to_string(),
            }));
        }
        Ok(())
    };
    match provider {
        "analytics" => io_json::read_analytics(&p2),
        "responses" => io_json::read_responses(&p2),
        "csv" => {
            needs_questions()?;
            let sheet = io_csv::read_csv_sheet(&p2, cfs)?;
            io_common::sheet_to_analytics(&sheet, questions, &p2)
        }
        "xlsx" => {
            needs_questions()?;
            let sheet = io_xlsx::read_xlsx_sheet(&p2, cfs)?;
            io_common::sheet_to_analytics(&sheet, questions, &p2)
        }
        x => Err(Box::new(TallyError::UnknownProvider {
            provider: x.to_string(),
        })),
    }
}

/// Merges the answers of several sources. Questions are matched by title and listed
/// in order of first appearance.
fn merge_sources(sources: Vec<SourceData>) -> SourceData {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut res = SourceData {
        total_responses: 0,
        questions: Vec::new(),
    };
    for source in sources {
        res.total_responses += source.total_responses;
        for q in source.questions {
            match positions.get(&q.question_title) {
                Some(&idx) => {
                    let existing = &mut res.questions[idx];
                    if existing.question_type != q.question_type {
                        warn!(
                            "merge_sources: question {:?} is {:?} in one source and {:?} in another, keeping {:?}",
                            q.question_title, existing.question_type, q.question_type, existing.question_type
                        );
                    }
                    existing.total_answers += q.total_answers;
                    existing.answers.extend(q.answers);
                }
                None => {
                    positions.insert(q.question_title.clone(), res.questions.len());
                    res.questions.push(q);
                }
            }
        }
    }
    res
}

fn question_to_json(question: &QuestionAnalytics, options: Option<&[String]>) -> JSValue {
    let mut js = json!({
        "question": question.question_title,
        "type": question.question_type,
        "totalAnswers": question.total_answers.to_string(),
    });
    match tally_question(question, options) {
        Tally::Options(rows) => {
            let tally: Vec<JSValue> = rows
                .iter()
                .map(|r| {
                    json!({
                        "option": r.option,
                        "count": r.count.to_string(),
                        "percentage": format!("{:.2}", r.percentage),
                        "bar": bar_width(r.percentage),
                    })
                })
                .collect();
            js["tally"] = JSValue::Array(tally);
        }
        Tally::Verbatim(answers) => {
            js["answers"] = json!(answers);
        }
    }
    js
}

fn build_summary_js(config: &TallyConfig, data: &SourceData) -> JSValue {
    let c = OutputConfig {
        survey: config.output_settings.survey_title.clone(),
        date: config.output_settings.survey_date.clone(),
        total_responses: data.total_responses.to_string(),
    };
    let results: Vec<JSValue> = data
        .questions
        .iter()
        .map(|q| question_to_json(q, config.options_for(&q.question_title)))
        .collect();
    json!({
        "config": c,
        "results": results })
}

/// Reads all the sources of a configuration and builds the summary.
///
/// `root_path` is the directory against which the source paths are resolved.
pub fn tally_config(config: &TallyConfig, root_path: &Path) -> BTallyResult<JSValue> {
    if config.sources.is_empty() {
        return Err(Box::new(TallyError::NoSources {}));
    }
    let mut data: Vec<SourceData> = Vec::new();
    for cfs in config.sources.iter() {
        data.push(read_source_data(root_path, cfs, &config.questions)?);
    }
    let merged = merge_sources(data);
    info!(
        "tally_config: {} responses, {} questions",
        merged.total_responses,
        merged.questions.len()
    );
    debug!("tally_config: data: {:?}", merged);
    Ok(build_summary_js(config, &merged))
}

fn write_summary(pretty_js_stats: &str, out_path: Option<&str>) -> BTallyResult<()> {
    match out_path {
        None | Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some(path) => {
            info!("Writing summary to {}", path);
            fs::write(path, pretty_js_stats).context(WritingSummarySnafu { path })?;
        }
    }
    Ok(())
}

fn check_reference(pretty_js_stats: &str, summary_p: String) -> BTallyResult<()> {
    let summary_ref = read_summary(summary_p)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return Err(Box::new(TallyError::ReferenceMismatch {}));
    }
    Ok(())
}

fn run_summary(
    config: &TallyConfig,
    root_path: &Path,
    out_path: Option<&str>,
    check_summary_path: Option<String>,
) -> BTallyResult<()> {
    let result_js = tally_config(config, root_path)?;
    // Reparsing the value sorts the keys, like the reference.
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&pretty_js_stats, out_path)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        check_reference(&pretty_js_stats, summary_p)?;
    }
    Ok(())
}

pub fn run_tally_config(
    config_path: String,
    out_path: Option<String>,
    check_summary_path: Option<String>,
) -> BTallyResult<()> {
    let config = read_config(&config_path)?;
    info!("config: {:?}", config);
    let config_p = Path::new(config_path.as_str());
    let root_p = config_p.parent().context(MissingParentDirSnafu {
        path: config_path.clone(),
    })?;
    let out = out_path.or_else(|| {
        config
            .output_settings
            .output_path
            .as_ref()
            .map(|p| root_p.join(p).display().to_string())
    });
    run_summary(&config, root_p, out.as_deref(), check_summary_path)
}

/// Tallies a single input file given on the command line.
pub fn run_tally_input(args: &Args) -> BTallyResult<()> {
    let input = args.input.clone().context(MissingInputSnafu {})?;
    let provider = args
        .input_type
        .clone()
        .unwrap_or_else(|| "analytics".to_string());
    let config = TallyConfig {
        output_settings: OutputSettings {
            survey_title: io_common::simplify_file_name(&input),
            survey_date: None,
            output_path: None,
        },
        sources: vec![FileSource::new(
            &provider,
            &input,
            args.excel_worksheet_name.clone(),
        )],
        questions: Vec::new(),
    };
    // The input path is taken as given.
    run_summary(
        &config,
        Path::new(""),
        args.out.as_deref(),
        args.reference.clone(),
    )
}

#[cfg(test)]
fn run_tally_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    let test_dir = option_env!("TALLY_TEST_DIR").unwrap_or("./tests/data");
    info!("Running test {}", test_name);
    let res = run_tally_config(
        format!("{}/{}/{}", test_dir, test_name, config_lpath),
        None,
        Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
    );
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = snafu::ErrorCompat::backtrace(&*e) {
            eprintln!("trace: {}", bt);
        }
        panic!("test {} failed: {}", test_name, e);
    }
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    run_tally_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}
