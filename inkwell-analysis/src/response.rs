//! Reply parsing.
//!
//! The model answers in free-form markdown. Sections are found by their
//! header at the start of a line; numbering and `#`/`*` decoration before the
//! header and `:`/`*` after it are ignored. A section runs until the next
//! header line that follows it in prompt order.

use inkwell_core::{AnalysisResults, ResultSlot};

use crate::request::SECTION_HEADERS;

/// Score header as models often shorten it.
const SHORT_SCORE_LABEL: &str = "Overall Quality Score";

/// One labeled section of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// "Current Stroke Quality"
    StrokeQuality,
    /// "Letter Formation"
    LetterFormation,
    /// "Next Expected Strokes"
    NextStrokes,
    /// "Common Mistakes to Avoid"
    CommonMistakes,
    /// "Overall Quality Score (%)"
    QualityScore,
}

impl Section {
    /// All sections in prompt order.
    pub const ALL: [Self; 5] = [
        Self::StrokeQuality,
        Self::LetterFormation,
        Self::NextStrokes,
        Self::CommonMistakes,
        Self::QualityScore,
    ];

    /// The exact header text.
    #[must_use]
    pub fn header(self) -> &'static str {
        SECTION_HEADERS[self as usize]
    }

    /// Length of the label `line` starts with, if any.
    fn match_label(self, line: &str) -> Option<usize> {
        let header = self.header();
        if starts_with_ignore_case(line, header) {
            return Some(header.len());
        }
        (self == Self::QualityScore && starts_with_ignore_case(line, SHORT_SCORE_LABEL))
            .then_some(SHORT_SCORE_LABEL.len())
    }

    /// Results slot this section feeds, if any.
    #[must_use]
    pub fn result_slot(self) -> Option<ResultSlot> {
        match self {
            Self::StrokeQuality => Some(ResultSlot::StrokeQuality),
            Self::LetterFormation => Some(ResultSlot::LetterFormation),
            Self::NextStrokes => Some(ResultSlot::NextStrokes),
            Self::CommonMistakes => Some(ResultSlot::CommonMistakes),
            Self::QualityScore => None,
        }
    }
}

/// Parsed reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Text of the four feedback sections.
    pub results: AnalysisResults,
    /// Text of the score section.
    pub score_text: Option<String>,
    /// Score parsed from the score section.
    pub quality_score: Option<u8>,
}

impl AnalysisReport {
    /// Whether no section was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.score_text.is_none()
    }
}

fn is_decoration(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '#' | '*' | '_' | '.' | ')' | '-' | ' ' | '\t')
}

fn starts_with_ignore_case(line: &str, header: &str) -> bool {
    line.len() >= header.len()
        && line.is_char_boundary(header.len())
        && line[..header.len()].eq_ignore_ascii_case(header)
}

fn clean_body(body: &str) -> Option<String> {
    let body = body
        .trim_start_matches(|c: char| matches!(c, ':' | '*' | '_' | ' ' | '\t'))
        .trim();
    (!body.is_empty()).then(|| body.to_string())
}

/// Split a reply into its sections.
///
/// Headers are accepted in prompt order only: a header line naming a section
/// at or before the last accepted one is treated as body text.
#[must_use]
pub fn parse_sections(text: &str) -> AnalysisReport {
    // (section, start of header line, start of body)
    let mut marks: Vec<(Section, usize, usize)> = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let stripped = line.trim_start_matches(is_decoration);
        let after = marks.last().map_or(0, |&(last, _, _)| last as usize + 1);
        let Some((section, label_len)) = Section::ALL[after..]
            .iter()
            .find_map(|s| s.match_label(stripped).map(|len| (*s, len)))
        else {
            continue;
        };
        let body_start = line_start + (line.len() - stripped.len()) + label_len;
        marks.push((section, line_start, body_start));
    }

    let mut report = AnalysisReport::default();
    for (i, &(section, _, body_start)) in marks.iter().enumerate() {
        let body_end = marks.get(i + 1).map_or(text.len(), |&(_, next_line, _)| next_line);
        let Some(body) = clean_body(&text[body_start..body_end]) else {
            continue;
        };
        match section.result_slot() {
            Some(slot) => report.results.set(slot, body),
            None => {
                report.quality_score = parse_quality_score(&body);
                report.score_text = Some(body);
            }
        }
    }
    report
}

/// Extract the first integer between 0 and 100 from `text`.
#[must_use]
pub fn parse_quality_score(text: &str) -> Option<u8> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse::<u32>().ok())
        .find(|n| *n <= 100)
        .and_then(|n| u8::try_from(n).ok())
}
