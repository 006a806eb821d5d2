//! Hizb mapping documents.
//!
//! Two document shapes are accepted: an object keyed by hizb number
//! (`{"1": {"verse_mapping": {...}}, ...}`) or an array of hizb records
//! (`[{"hizb": 1, "verse_mapping": {...}}, ...]`). Either one is collapsed into
//! a [`HizbMapping`] once, at load time.

use crate::errors::MappingError;
use crate::models::{Hizb, SURAH_COUNT, SurahRange};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const VERSE_MAPPING_FIELD: &str = "verse_mapping";
const HIZB_FIELD: &str = "hizb";

#[derive(Debug, Clone)]
pub enum MappingDocument {
    Keyed(Map<String, Value>),
    Sequence(Vec<Value>),
}

impl TryFrom<Value> for MappingDocument {
    type Error = MappingError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::Keyed(map)),
            Value::Array(items) => Ok(Self::Sequence(items)),
            _ => Err(MappingError::UnrecognizedShape),
        }
    }
}

impl MappingDocument {
    fn record_for(&self, hizb: Hizb) -> Option<&Value> {
        match self {
            Self::Keyed(map) => map.get(&hizb.number().to_string()),
            Self::Sequence(items) => items
                .iter()
                .find(|item| record_hizb(item) == Some(hizb.number()))
                .or_else(|| {
                    items
                        .get(hizb.index())
                        .filter(|item| item.get(HIZB_FIELD).is_none())
                }),
        }
    }
}

/// Why one hizb record could not be turned into ranges.
#[derive(Debug, Clone)]
enum RecordError {
    Empty,
    InvalidSurah { key: String },
    InvalidRange { surah: u16, range: String },
}

impl RecordError {
    fn into_mapping_error(self, hizb: Hizb) -> MappingError {
        let hizb = hizb.number();
        match self {
            Self::Empty => MappingError::NoMapping(hizb),
            Self::InvalidSurah { key } => MappingError::InvalidSurah { hizb, key },
            Self::InvalidRange { surah, range } => MappingError::InvalidRange { hizb, surah, range },
        }
    }
}

/// Canonical hizb → sorted surah ranges, parsed once at load time. A record
/// that fails to parse keeps its error so only that hizb is affected.
#[derive(Debug, Clone, Default)]
pub struct HizbMapping {
    records: BTreeMap<Hizb, Result<Vec<SurahRange>, RecordError>>,
}

impl HizbMapping {
    pub fn from_json(bytes: &[u8]) -> Result<Self, MappingError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_document(&MappingDocument::try_from(value)?)
    }

    pub fn from_document(document: &MappingDocument) -> Result<Self, MappingError> {
        let records: BTreeMap<_, _> = Hizb::all()
            .filter_map(|hizb| {
                let verse_mapping = document
                    .record_for(hizb)?
                    .get(VERSE_MAPPING_FIELD)?
                    .as_object()?;
                Some((hizb, parse_record(verse_mapping)))
            })
            .collect();

        if records.is_empty() {
            return Err(MappingError::UnrecognizedShape);
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Surah ranges for `hizb`, in ascending surah order.
    pub fn resolve(&self, hizb: Hizb) -> Result<Vec<SurahRange>, MappingError> {
        match self.records.get(&hizb) {
            Some(Ok(ranges)) => Ok(ranges.clone()),
            Some(Err(err)) => Err(err.clone().into_mapping_error(hizb)),
            None => Err(MappingError::NoMapping(hizb.number())),
        }
    }
}

fn record_hizb(record: &Value) -> Option<u8> {
    match record.get(HIZB_FIELD)? {
        Value::Number(number) => number.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn parse_record(verse_mapping: &Map<String, Value>) -> Result<Vec<SurahRange>, RecordError> {
    let mut ranges = verse_mapping
        .iter()
        .map(|(key, value)| parse_entry(key, value))
        .collect::<Result<Vec<_>, _>>()?;
    if ranges.is_empty() {
        return Err(RecordError::Empty);
    }

    ranges.sort_by_key(|range| range.surah);
    Ok(ranges)
}

fn parse_entry(key: &str, value: &Value) -> Result<SurahRange, RecordError> {
    let surah = key
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|surah| (1..=SURAH_COUNT).contains(surah))
        .ok_or_else(|| RecordError::InvalidSurah {
            key: key.to_string(),
        })?;

    let bounds = match value {
        Value::String(text) => parse_range(text),
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .filter(|n| *n >= 1)
            .map(|n| (n, n)),
        _ => None,
    };

    let (from, to) = bounds.ok_or_else(|| RecordError::InvalidRange {
        surah,
        range: value.to_string(),
    })?;
    Ok(SurahRange { surah, from, to })
}

/// Parses `"A-B"` (or a lone `"A"`) into inclusive bounds with `1 <= A <= B`.
pub fn parse_range(text: &str) -> Option<(u16, u16)> {
    let (from, to) = match text.split_once('-') {
        Some((from, to)) => (from.trim().parse().ok()?, to.trim().parse().ok()?),
        None => {
            let single = text.trim().parse().ok()?;
            (single, single)
        }
    };
    (from >= 1 && from <= to).then_some((from, to))
}
