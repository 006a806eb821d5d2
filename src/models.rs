use serde::{Deserialize, Serialize};
use std::fmt;

pub const TOTAL_HIZB: usize = 60;
pub const SURAH_COUNT: u16 = 114;

/// One of the 60 reading divisions, numbered 1..=60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Hizb(u8);

impl Hizb {
    pub fn new(number: u32) -> Option<Self> {
        if (1..=TOTAL_HIZB as u32).contains(&number) {
            Some(Self(number as u8))
        } else {
            None
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based position in the progress array.
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    pub fn all() -> impl Iterator<Item = Hizb> {
        (1..=TOTAL_HIZB as u8).map(Hizb)
    }
}

impl fmt::Display for Hizb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    done: [bool; TOTAL_HIZB],
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            done: [false; TOTAL_HIZB],
        }
    }
}

impl Progress {
    /// Returns `None` unless exactly 60 entries are given.
    pub fn from_slice(done: &[bool]) -> Option<Self> {
        let done: [bool; TOTAL_HIZB] = done.try_into().ok()?;
        Some(Self { done })
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.done
    }

    pub fn is_done(&self, hizb: Hizb) -> bool {
        self.done[hizb.index()]
    }

    /// Sets the flag and reports whether it changed.
    pub fn set(&mut self, hizb: Hizb, done: bool) -> bool {
        let slot = &mut self.done[hizb.index()];
        let changed = *slot != done;
        *slot = done;
        changed
    }

    pub fn done_count(&self) -> usize {
        self.done.iter().filter(|done| **done).count()
    }
}

/// Inclusive verse range inside one surah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurahRange {
    pub surah: u16,
    pub from: u16,
    pub to: u16,
}

impl SurahRange {
    pub fn contains(&self, ayah: u16) -> bool {
        (self.from..=self.to).contains(&ayah)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ayah {
    pub number_in_surah: u16,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surah {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub english_name: String,
    pub ayahs: Vec<Ayah>,
}

impl Surah {
    pub fn display_name(&self, number: u16) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if !self.english_name.is_empty() {
            self.english_name.clone()
        } else {
            format!("#{number}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingBlock {
    pub surah_number: u16,
    pub surah_name: String,
    pub from: u16,
    pub to: u16,
    pub ayahs: Vec<Ayah>,
}

impl ReadingBlock {
    /// Keeps the verses whose position falls inside `range`. An end past the
    /// surah's last verse just yields fewer verses.
    pub fn from_surah(range: SurahRange, surah: &Surah) -> Self {
        Self {
            surah_number: range.surah,
            surah_name: surah.display_name(range.surah),
            from: range.from,
            to: range.to,
            ayahs: surah
                .ayahs
                .iter()
                .filter(|ayah| range.contains(ayah.number_in_surah))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub hizb: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MappingUnavailable,
    NoMapping,
    InvalidRange,
    FetchFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReaderPane {
    Empty,
    Loading {
        hizb: Hizb,
    },
    Ready {
        hizb: Hizb,
        blocks: Vec<ReadingBlock>,
    },
    Failed {
        hizb: Option<Hizb>,
        kind: FailureKind,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Info,
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Ok,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OpenOutcome {
    pub hizb: Hizb,
    /// False when a newer selection superseded this one before it finished.
    pub committed: bool,
    pub pane: ReaderPane,
}

#[derive(Debug, Serialize)]
pub struct JuzPoint {
    pub juz: u8,
    pub done: u8,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    pub done_count: usize,
    pub remaining: usize,
    pub percent: f64,
    pub next_unread: Option<Hizb>,
    pub juz_completed: usize,
    pub juz: Vec<JuzPoint>,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub done: Vec<bool>,
    pub selected: Option<Hizb>,
    pub summary: ProgressSummary,
}
