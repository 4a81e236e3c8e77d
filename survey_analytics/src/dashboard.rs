pub use crate::config::*;

/// Headline numbers for the surveys of one user.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct DashboardStats {
    pub total_surveys: u64,
    /// Sum of the response counts. Surveys without a count contribute 0.
    pub total_responses: u64,
    pub active_surveys: u64,
    pub draft_surveys: u64,
}

impl DashboardStats {
    pub fn from_surveys(surveys: &[Survey]) -> DashboardStats {
        surveys
            .iter()
            .fold(DashboardStats::default(), |mut stats, s| {
                stats.total_surveys += 1;
                stats.total_responses += s.responses_count.unwrap_or(0);
                match s.status {
                    SurveyStatus::Published => stats.active_surveys += 1,
                    SurveyStatus::Draft => stats.draft_surveys += 1,
                    SurveyStatus::Closed => {}
                }
                stats
            })
    }
}
