use std::fmt;

/// SRT subtitle text as produced by transcription and translation.
///
/// The pipeline passes documents through untouched; [`SubtitleDocument::cues`]
/// exists only to compare structure between a transcript and a translation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubtitleDocument(String);

/// One timed subtitle entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub index: Option<u32>,
    /// Start time in milliseconds
    pub start: u64,
    /// End time in milliseconds
    pub end: u64,
    pub lines: Vec<String>,
}

impl SubtitleDocument {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parse cue blocks. Blocks without a timing line are skipped.
    pub fn cues(&self) -> Vec<Cue> {
        let normalized = self.0.replace("\r\n", "\n");
        let mut cues = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in normalized.lines().chain(std::iter::once("")) {
            if line.trim().is_empty() {
                if let Some(cue) = parse_block(&block) {
                    cues.push(cue);
                }
                block.clear();
            } else {
                block.push(line);
            }
        }

        cues
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SubtitleDocument {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl Cue {
    pub fn timing_line(&self) -> String {
        format!("{} --> {}", format_srt_time(self.start), format_srt_time(self.end))
    }
}

fn parse_block(block: &[&str]) -> Option<Cue> {
    let timing_pos = block.iter().position(|line| line.contains("-->"))?;
    let (start, end) = parse_timing_line(block[timing_pos])?;

    let index = if timing_pos > 0 {
        block[timing_pos - 1].trim().parse::<u32>().ok()
    } else {
        None
    };

    let lines = block[timing_pos + 1..]
        .iter()
        .map(|line| line.trim_end().to_string())
        .collect();

    Some(Cue {
        index,
        start,
        end,
        lines,
    })
}

fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
    let (start, end) = line.split_once("-->")?;
    // Cue settings may follow the end timestamp
    let end = end.split_whitespace().next()?;
    Some((parse_srt_time(start.trim())?, parse_srt_time(end)?))
}

/// Parse `HH:MM:SS,mmm` (a `.` separator is accepted too) into milliseconds.
pub fn parse_srt_time(value: &str) -> Option<u64> {
    let (clock, millis) = value.split_once([',', '.']).unwrap_or((value, "0"));
    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: u64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    let millis: u64 = millis.trim().parse().ok()?;

    // Out-of-range hours make the cue unparseable rather than wrapping
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes * 60_000 + seconds * 1000)?
        .checked_add(millis)
}

/// Format milliseconds to SRT time format (HH:MM:SS,mmm)
pub fn format_srt_time(total_milliseconds: u64) -> String {
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Compare cue count, ordering and timestamps of two documents.
///
/// Returns a description of the first mismatch, or `None` when the
/// translated document keeps the source structure.
pub fn structural_mismatch(source: &SubtitleDocument, translated: &SubtitleDocument) -> Option<String> {
    let source_cues = source.cues();
    let translated_cues = translated.cues();

    if source_cues.len() != translated_cues.len() {
        return Some(format!(
            "cue count changed from {} to {}",
            source_cues.len(),
            translated_cues.len()
        ));
    }

    source_cues
        .iter()
        .zip(&translated_cues)
        .enumerate()
        .find(|(_, (a, b))| a.start != b.start || a.end != b.end)
        .map(|(position, (a, b))| {
            format!(
                "cue {} timing changed from {} to {}",
                position + 1,
                a.timing_line(),
                b.timing_line()
            )
        })
}
