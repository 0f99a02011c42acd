//! The user-submitted campaign brief.

use serde::{Deserialize, Serialize};

/// A company's marketing brief, captured from user input.
///
/// Immutable once submitted; consumed to build the combined generation
/// request sent to the agent service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub company_name: String,
    pub company_domain: String,
    pub goals_audience: String,
}

impl CampaignBrief {
    pub fn new(
        company_name: impl Into<String>,
        company_domain: impl Into<String>,
        goals_audience: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            company_domain: company_domain.into(),
            goals_audience: goals_audience.into(),
        }
    }

    /// Builds the combined generation query sent to the agent service.
    ///
    /// The exact phrasing is part of the service contract: the downstream
    /// agent workflow keys off this structure to run the full pipeline.
    pub fn query_text(&self) -> String {
        format!(
            "Company: {}\nWebsite: {}\nGoals/Target Audience: {}\n\n\
             Please generate a complete marketing campaign following the full workflow.",
            self.company_name, self.company_domain, self.goals_audience
        )
    }
}
