//! Deterministic fallback video script.

/// Synthesizes the video script used when script generation fails.
///
/// Concatenates the campaign content, the visual concept description, and
/// the company name, in that order, followed by the fixed production
/// directives. The pipeline proceeds to video generation with this script
/// instead of aborting.
pub fn fallback_script(
    campaign_content: &str,
    visual_concept: &str,
    company_name: &str,
) -> String {
    format!(
        "{campaign_content}. Visual concept: {visual_concept}. Company: {company_name}. \
         Create a professional 8-second marketing video showing the campaign concept in action. \
         NO visible text, words, letters, or typography to avoid spelling errors. \
         Focus on visual storytelling with natural brand integration."
    )
}
