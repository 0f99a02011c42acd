//! Parser for the combined free-text generation response.
//!
//! The `/query` endpoint returns one text blob that may contain any
//! combination of marked sections: two campaign proposals, inline visual
//! concepts, and video generation status. Sections are detected and
//! extracted independently.
//!
//! Extraction is total: a missing marker yields an empty or absent result,
//! never an error. Each campaign sub-field is tried independently, and a
//! block where no sub-field extracts is kept whole as raw fallback content
//! rather than dropped.
//!
//! The markers are emoji-decorated markdown labels emitted by the agent
//! workflow; they are part of the service contract. Bounded extraction
//! ("text up to the next known marker or a blank line") is done by marker
//! scanning because the `regex` crate has no lookaround.

use madcap_proto::{
    CampaignFields, CampaignLabel, CampaignOption, VideoSection, VisualConcept,
};
use regex::Regex;
use std::sync::OnceLock;

const CAMPAIGN_A_MARKER: &str = "🚀 **CAMPAIGN A:";
const CAMPAIGN_B_MARKER: &str = "🚀 **CAMPAIGN B:";

/// Everything extracted from one combined response.
#[derive(Debug, Clone, Default)]
pub struct ParsedResponse {
    pub campaigns: Vec<CampaignOption>,
    pub concepts: Vec<VisualConcept>,
    pub video: Option<VideoSection>,
}

/// Parses the combined response. Section markers are detected by substring
/// search; sections are not mutually exclusive and all present ones are
/// extracted.
pub fn parse_combined_response(content: &str) -> ParsedResponse {
    ParsedResponse {
        campaigns: if content.contains("CAMPAIGN A:") {
            parse_campaigns(content)
        } else {
            Vec::new()
        },
        concepts: if content.contains("VISUAL CONCEPT") {
            parse_inline_concepts(content)
        } else {
            Vec::new()
        },
        video: if content.contains("VIDEO GENERATION") {
            Some(parse_video_section(content))
        } else {
            None
        },
    }
}

/// Takes the text following `label`, cut at the earliest of the given stop
/// markers, trimmed. `None` when the label is absent or the span is empty.
fn section_after(text: &str, label: &str, stops: &[&str]) -> Option<String> {
    let start = text.find(label)? + label.len();
    let tail = &text[start..];

    let mut end = tail.len();
    for stop in stops {
        if let Some(at) = tail.find(stop) {
            end = end.min(at);
        }
    }

    let span = tail[..end].trim();
    if span.is_empty() {
        None
    } else {
        Some(span.to_string())
    }
}

/// Splits the campaign section into the A and B blocks.
///
/// Campaign A runs from its marker to the campaign B marker or a
/// triple-newline boundary, whichever comes first; without a terminator the
/// A block is not recognized. Campaign B runs to the end of the string.
fn parse_campaigns(content: &str) -> Vec<CampaignOption> {
    let mut campaigns = Vec::new();

    if let Some(a_start) = content.find(CAMPAIGN_A_MARKER) {
        let rest = &content[a_start..];
        let after_marker = &rest[CAMPAIGN_A_MARKER.len()..];
        let b_at = after_marker.find(CAMPAIGN_B_MARKER);
        let break_at = after_marker.find("\n\n\n");
        if let Some(end) = match (b_at, break_at) {
            (Some(b), Some(brk)) => Some(b.min(brk)),
            (one, other) => one.or(other),
        } {
            let block = &rest[..CAMPAIGN_A_MARKER.len() + end];
            campaigns.push(parse_campaign_block(CampaignLabel::A, block));
        }
    }

    if let Some(b_start) = content.find(CAMPAIGN_B_MARKER) {
        campaigns.push(parse_campaign_block(CampaignLabel::B, &content[b_start..]));
    }

    campaigns
}

/// Extracts the four labeled sub-fields from one campaign block.
///
/// Each field is an independent extraction; present fields are kept and
/// absent ones stay `None`. The raw block is always retained so rendering
/// can fall back when nothing structured extracted.
fn parse_campaign_block(label: CampaignLabel, block: &str) -> CampaignOption {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    let name_re = NAME_RE.get_or_init(|| {
        Regex::new(r"🚀 \*\*CAMPAIGN [AB]:\s*(.+?)\*\*").expect("campaign name pattern")
    });

    let fields = CampaignFields {
        name: name_re
            .captures(block)
            .map(|c| c[1].trim().to_string())
            .filter(|n| !n.is_empty()),
        big_idea: section_after(block, "💡 **The Big Idea:**", &["🎯", "\n\n"]),
        target_impact: section_after(block, "🎯 **Target Impact:**", &["📈", "\n\n"]),
        why_it_works: section_after(block, "📈 **Why It Works:**", &["⚡", "\n\n"]),
        bottom_line: section_after(block, "⚡ **Bottom Line:**", &["\n\n"]),
    };

    CampaignOption {
        label,
        raw_text: block.to_string(),
        fields,
    }
}

/// Scans for every "concept number, description, inline image" triple.
///
/// The scan is exhaustive over the whole text, so responses carrying more
/// than two embedded concepts still yield all of them.
fn parse_inline_concepts(content: &str) -> Vec<VisualConcept> {
    static CONCEPT_RE: OnceLock<Regex> = OnceLock::new();
    let re = CONCEPT_RE.get_or_init(|| {
        Regex::new(
            r"(?s)🎨 \*\*VISUAL CONCEPT (\d+):\*\*(.*?)🖼️ \*\*Image:\*\* (data:image/[^;\s]+;base64,[A-Za-z0-9+/=]+)",
        )
        .expect("visual concept pattern")
    });

    re.captures_iter(content)
        .map(|caps| VisualConcept {
            index: caps[1].parse().unwrap_or(0),
            style_directive: None,
            caption: caps[2].trim().to_string(),
            image_data: caps[3].to_string(),
        })
        .collect()
}

/// Extracts the video-status fragments: script (two alternate labels, first
/// one wins), operation identifier, status block, and a direct video URL.
fn parse_video_section(content: &str) -> VideoSection {
    static OPERATION_RE: OnceLock<Regex> = OnceLock::new();
    static VIDEO_URL_RE: OnceLock<Regex> = OnceLock::new();

    let operation_re = OPERATION_RE
        .get_or_init(|| Regex::new(r"⚙️ \*\*Operation:\*\* ([^\n]+)").expect("operation pattern"));
    let url_re = VIDEO_URL_RE.get_or_init(|| {
        Regex::new(r"https://storage\.googleapis\.com/[^\s)]+\.mp4").expect("video url pattern")
    });

    VideoSection {
        script: section_after(content, "🎬 **VEO SCRIPT:**", &["🎥", "⚙️"])
            .or_else(|| section_after(content, "📝 **Script Used:**", &["⚙️", "🎥"])),
        operation: operation_re
            .captures(content)
            .map(|c| c[1].trim().to_string()),
        status: section_after(content, "⏱️ **Status:**", &["\n\n"]),
        video_url: url_re.find(content).map(|m| m.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madcap_proto::StatusTone;

    const COMBINED: &str = "Here is your campaign plan.\n\n\
🚀 **CAMPAIGN A: Morning Momentum**\n\
💡 **The Big Idea:** Own the first hour of the day.\n\
🎯 **Target Impact:** Busy professionals aged 25-40.\n\
📈 **Why It Works:** Morning routines drive habit loops.\n\
⚡ **Bottom Line:** Be the ritual, not the product.\n\n\
🚀 **CAMPAIGN B: Night Shift**\n\
💡 **The Big Idea:** Win the wind-down.\n\
🎯 **Target Impact:** Students and creatives.\n\
📈 **Why It Works:** Evenings are uncontested attention.\n\
⚡ **Bottom Line:** Calm is the new loud.\n";

    #[test]
    fn test_round_trip_two_campaigns_no_cross_contamination() {
        let parsed = parse_combined_response(COMBINED);

        assert_eq!(parsed.campaigns.len(), 2);
        let a = &parsed.campaigns[0];
        let b = &parsed.campaigns[1];

        assert_eq!(a.label, CampaignLabel::A);
        assert_eq!(b.label, CampaignLabel::B);
        assert_eq!(a.fields.name.as_deref(), Some("Morning Momentum"));
        assert_eq!(b.fields.name.as_deref(), Some("Night Shift"));
        assert!(a.raw_text.contains("Own the first hour"));
        assert!(!a.raw_text.contains("Night Shift"));
        assert!(b.raw_text.contains("Calm is the new loud"));
        assert!(!b.raw_text.contains("Morning Momentum"));
    }

    #[test]
    fn test_campaign_a_bounded_by_triple_newline() {
        let content = "🚀 **CAMPAIGN A: Solo**\n\
💡 **The Big Idea:** One idea.\n\n\n\
Unrelated trailing analysis text.";
        let parsed = parse_combined_response(content);

        assert_eq!(parsed.campaigns.len(), 1);
        assert!(!parsed.campaigns[0].raw_text.contains("Unrelated"));
        assert_eq!(
            parsed.campaigns[0].fields.big_idea.as_deref(),
            Some("One idea.")
        );
    }

    #[test]
    fn test_campaign_a_without_terminator_is_not_recognized() {
        let content = "🚀 **CAMPAIGN A: Unterminated**\n💡 **The Big Idea:** runs forever";
        let parsed = parse_combined_response(content);
        assert!(parsed.campaigns.is_empty());
    }

    #[test]
    fn test_partial_fields_extracted_rest_absent() {
        let content = "🚀 **CAMPAIGN A: Partial**\n\
💡 **The Big Idea:** Only this field exists.\n\n\
🚀 **CAMPAIGN B: Other**\nFreeform pitch with no labels.\n";
        let parsed = parse_combined_response(content);

        let a = &parsed.campaigns[0];
        assert_eq!(a.fields.big_idea.as_deref(), Some("Only this field exists."));
        assert!(a.fields.target_impact.is_none());
        assert!(a.fields.why_it_works.is_none());
        assert!(a.fields.bottom_line.is_none());
        assert!(a.is_structured());
    }

    #[test]
    fn test_all_fields_missing_falls_back_to_raw_block() {
        let content = "🚀 **CAMPAIGN A: Loose**\nJust a paragraph of prose.\n\n\
🚀 **CAMPAIGN B: Also Loose**\nAnother paragraph.\n";
        let parsed = parse_combined_response(content);

        let a = &parsed.campaigns[0];
        assert!(!a.is_structured());
        assert!(a.fallback_text().contains("Just a paragraph of prose."));
        assert!(!a.fallback_text().contains("**"));
    }

    #[test]
    fn test_multiline_field_kept_until_blank_line() {
        let content = "🚀 **CAMPAIGN A: Multi**\n\
💡 **The Big Idea:** First line\nsecond line of the idea.\n\n\
🎯 **Target Impact:** Everyone.\n\n\
🚀 **CAMPAIGN B: Bare**\nx\n";
        let parsed = parse_combined_response(content);

        assert_eq!(
            parsed.campaigns[0].fields.big_idea.as_deref(),
            Some("First line\nsecond line of the idea.")
        );
    }

    #[test]
    fn test_no_campaign_marker_yields_no_campaigns() {
        let parsed = parse_combined_response("nothing interesting here");
        assert!(parsed.campaigns.is_empty());
        assert!(parsed.concepts.is_empty());
        assert!(parsed.video.is_none());
    }

    #[test]
    fn test_inline_concepts_scanned_exhaustively() {
        let content = "VISUAL CONCEPT previews below.\n\
🎨 **VISUAL CONCEPT 1:** Warm kitchen scene.\n🖼️ **Image:** data:image/png;base64,AAAA\n\
🎨 **VISUAL CONCEPT 2:** Neon rooftop party.\n🖼️ **Image:** data:image/jpeg;base64,BBBB\n";
        let parsed = parse_combined_response(content);

        assert_eq!(parsed.concepts.len(), 2);
        assert_eq!(parsed.concepts[0].index, 1);
        assert_eq!(parsed.concepts[0].caption, "Warm kitchen scene.");
        assert_eq!(parsed.concepts[0].image_data, "data:image/png;base64,AAAA");
        assert_eq!(parsed.concepts[1].index, 2);
        assert!(parsed.concepts[1].style_directive.is_none());
    }

    #[test]
    fn test_video_section_pieces_extracted_independently() {
        let content = "VIDEO GENERATION update:\n\
🎬 **VEO SCRIPT:** Open on a sunrise over the bay.\n\
⚙️ **Operation:** operations/abc-123\n\
⏱️ **Status:** Rendering in progress\n\n\
Video: https://storage.googleapis.com/renders/final.mp4 (direct link)";
        let parsed = parse_combined_response(content);
        let video = parsed.video.unwrap();

        assert_eq!(
            video.script.as_deref(),
            Some("Open on a sunrise over the bay.")
        );
        assert_eq!(video.operation.as_deref(), Some("operations/abc-123"));
        assert_eq!(video.status.as_deref(), Some("Rendering in progress"));
        assert_eq!(
            video.video_url.as_deref(),
            Some("https://storage.googleapis.com/renders/final.mp4")
        );
        assert_eq!(video.status_tone(), Some(StatusTone::InProgress));
    }

    #[test]
    fn test_video_script_used_label_is_fallback() {
        let content = "VIDEO GENERATION\n📝 **Script Used:** The backup script.\n⚙️ **Operation:** op/1\n";
        let parsed = parse_combined_response(content);
        assert_eq!(
            parsed.video.unwrap().script.as_deref(),
            Some("The backup script.")
        );
    }

    #[test]
    fn test_video_failed_status_classified_error() {
        let content = "VIDEO GENERATION\n⏱️ **Status:** Generation FAILED on safety check\n\nmore";
        let parsed = parse_combined_response(content);
        let video = parsed.video.unwrap();
        assert_eq!(video.status_tone(), Some(StatusTone::Error));
    }

    #[test]
    fn test_video_section_empty_when_no_fragments() {
        let content = "VIDEO GENERATION kicked off, details to follow later.";
        let parsed = parse_combined_response(content);
        assert!(parsed.video.unwrap().is_empty());
    }

    #[test]
    fn test_sections_are_not_mutually_exclusive() {
        let content = format!(
            "{COMBINED}\n\
🎨 **VISUAL CONCEPT 1:** Sketch.\n🖼️ **Image:** data:image/png;base64,CCCC\n\n\
VIDEO GENERATION\n⏱️ **Status:** queued\n\n"
        );
        let parsed = parse_combined_response(&content);
        assert_eq!(parsed.campaigns.len(), 2);
        assert_eq!(parsed.concepts.len(), 1);
        assert!(parsed.video.is_some());
    }

    #[test]
    fn test_parser_tolerates_arbitrary_text() {
        for garbage in [
            "",
            "CAMPAIGN A: but no real markers",
            "🚀 **CAMPAIGN B:",
            "VISUAL CONCEPT 🎨 **VISUAL CONCEPT ::** broken",
            "VIDEO GENERATION ⏱️ **Status:**",
        ] {
            let _ = parse_combined_response(garbage);
        }
    }
}
