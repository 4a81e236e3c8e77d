// Readers for the documents returned by the survey server.

use crate::tally::*;

fn read_document<T: serde::de::DeserializeOwned>(path: &str) -> BTallyResult<T> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let doc: T = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(doc)
}

/// Reads the aggregated answers of a survey (the analytics endpoint).
pub fn read_analytics(path: &str) -> BTallyResult<SourceData> {
    let doc: SurveyAnalytics = read_document(path)?;
    info!(
        "read_analytics: survey {} ({:?}): {} responses",
        doc.survey.id, doc.survey.title, doc.total_responses
    );
    Ok(SourceData {
        total_responses: doc.total_responses,
        questions: doc.analytics,
    })
}

/// Reads a list of individual responses.
pub fn read_responses(path: &str) -> BTallyResult<SourceData> {
    let doc: Vec<ResponseDetail> = read_document(path)?;
    info!("read_responses: {} responses", doc.len());
    Ok(SourceData {
        total_responses: doc.len() as u64,
        questions: analytics_from_responses(&doc),
    })
}
