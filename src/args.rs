use clap::Parser;

/// This is a survey tally program: it turns the answers of a survey into frequency tables.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the survey, its questions and the sources
    /// of answers. See the documentation of the survey_analytics crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the summary of a survey in JSON format. If provided,
    /// surveytally will check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the survey will be written in JSON
    /// format to the given location. Setting this option overrides the path that may be specified
    /// with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) A single file of answers. Used when --config is not provided.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default analytics) The type of the input: analytics, responses, csv or xlsx. The csv and
    /// xlsx inputs need a configuration that lists the questions.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. It is required when
    /// the workbook has more than one worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
