//! Terminal rendering of pipeline view state.
//!
//! Card builders return plain text so they stay testable; color is applied
//! only when printing notices.

use colored::Colorize;
use madcap_proto::{
    CampaignOption, Notice, NoticeLevel, StatusTone, VideoOutcome, VideoResult, VideoScript,
    VideoSection, VisualConcept,
};

/// Prints accumulated notices, colorized by category.
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let line = match notice.level {
            NoticeLevel::Success => format!("✔ {}", notice.message).green(),
            NoticeLevel::Error => format!("✖ {}", notice.message).red(),
            NoticeLevel::Warning => format!("▲ {}", notice.message).yellow(),
            NoticeLevel::Info => format!("· {}", notice.message).cyan(),
        };
        println!("{line}");
    }
}

/// Renders one campaign proposal.
///
/// Structured options show every labeled section, with absent fields shown
/// empty rather than omitted. Unstructured options fall back to the raw
/// block with emphasis markup stripped.
pub fn campaign_card(option: &CampaignOption) -> String {
    let mut card = format!("CAMPAIGN {}\n", option.label);

    if option.is_structured() {
        if let Some(name) = &option.fields.name {
            card.push_str(&format!("  {name}\n"));
        }
        for (label, value) in [
            ("The Big Idea", &option.fields.big_idea),
            ("Target Impact", &option.fields.target_impact),
            ("Why It Works", &option.fields.why_it_works),
            ("Bottom Line", &option.fields.bottom_line),
        ] {
            card.push_str(&format!("  {label}: {}\n", value.as_deref().unwrap_or("")));
        }
    } else {
        for line in option.fallback_text().lines() {
            card.push_str(&format!("  {line}\n"));
        }
    }

    card
}

/// Renders one visual concept, previewing the (usually enormous) image data.
pub fn concept_card(concept: &VisualConcept) -> String {
    format!(
        "VISUAL CONCEPT {}\n  {}\n  image: {}\n",
        concept.index,
        concept.caption,
        preview(&concept.image_data, 48)
    )
}

/// Renders video fragments embedded in the combined response.
pub fn inline_video_card(section: &VideoSection) -> String {
    let mut card = String::from("VIDEO GENERATION\n");

    if let Some(script) = &section.script {
        card.push_str(&format!("  script: {}\n", preview(script, 120)));
    }
    if let Some(operation) = &section.operation {
        card.push_str(&format!("  operation: {operation}\n"));
    }
    if let Some(status) = &section.status {
        let tone = match section.status_tone() {
            Some(StatusTone::Error) => "error",
            _ => "in progress",
        };
        card.push_str(&format!("  status ({tone}): {status}\n"));
    }
    if let Some(url) = &section.video_url {
        card.push_str(&format!("  video: {url}\n"));
    }
    if section.is_empty() {
        card.push_str("  generation started, details to follow\n");
    }

    card
}

/// Renders the persistent video result panel: outcome details plus the
/// script that was actually used.
pub fn video_panel(script: Option<&VideoScript>, result: &VideoResult) -> String {
    let mut panel = String::new();

    match result.outcome() {
        VideoOutcome::Success => {
            panel.push_str("VIDEO GENERATED SUCCESSFULLY\n");
            if let Some(status) = &result.status {
                panel.push_str(&format!("  status: {status}\n"));
            }
            if let Some(elapsed) = result.elapsed_time {
                panel.push_str(&format!("  generation time: {elapsed}s\n"));
            }
            if let Some(model) = &result.model {
                panel.push_str(&format!("  model: {model}\n"));
            }
            if let Some(features) = &result.features {
                if let Some(duration) = &features.duration {
                    panel.push_str(&format!("  duration: {duration}\n"));
                }
                if let Some(aspect_ratio) = &features.aspect_ratio {
                    panel.push_str(&format!("  aspect ratio: {aspect_ratio}\n"));
                }
            }
            if let Some(count) = result.video_count {
                panel.push_str(&format!("  videos generated: {count}\n"));
            }
            if let Some(url) = &result.video_url {
                panel.push_str(&format!("  download: {url}\n"));
            }
        }
        VideoOutcome::Timeout => {
            panel.push_str("VIDEO GENERATION TIMEOUT\n");
            if let Some(message) = &result.message {
                panel.push_str(&format!("  status: {message}\n"));
            }
            if let Some(elapsed) = result.elapsed_time {
                panel.push_str(&format!("  elapsed time: {elapsed}s\n"));
            }
            if let Some(operation) = &result.operation_name {
                panel.push_str(&format!("  operation: {operation}\n"));
            }
            panel.push_str("  the video may still be processing in the background\n");
        }
        VideoOutcome::Failed => {
            panel.push_str("VIDEO GENERATION FAILED\n");
            panel.push_str(&format!("  error: {}\n", result.error_text()));
            panel.push_str(&format!("  error type: {}\n", result.error_type_text()));
            if let Some(operation) = &result.operation_name {
                panel.push_str(&format!("  operation: {operation}\n"));
            }
        }
    }

    if let Some(script) = script {
        panel.push_str("  script used:\n");
        for line in script.text.lines() {
            panel.push_str(&format!("    {line}\n"));
        }
    }

    panel
}

/// Character-boundary-safe truncation with an ellipsis.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let end = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    format!("{}...", &text[..end])
}
