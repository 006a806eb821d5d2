use crate::errors::ReadingError;
use crate::mapping::HizbMapping;
use crate::models::{Hizb, ReadingBlock};
use crate::verses::SurahCache;

/// Resolves `hizb` and fetches its surahs one at a time, in ascending surah
/// order. The first failure aborts the rest; no partial list is returned.
pub async fn load_blocks(
    mapping: &HizbMapping,
    verses: &SurahCache,
    hizb: Hizb,
) -> Result<Vec<ReadingBlock>, ReadingError> {
    let ranges = mapping.resolve(hizb)?;

    let mut blocks = Vec::with_capacity(ranges.len());
    for range in ranges {
        let surah = verses.get(range.surah).await?;
        blocks.push(ReadingBlock::from_surah(range, &surah));
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FetchError, MappingError};
    use crate::verses::fake::FakeSource;
    use serde_json::json;
    use std::sync::Arc;

    fn mapping() -> HizbMapping {
        let document = json!({
            "1": { "verse_mapping": { "2": "1-3", "1": "1-7" } },
            "2": { "verse_mapping": { "3": "1-2", "4": "1-2", "5": "1-2" } },
            "3": { "verse_mapping": { "6": "8-40" } }
        });
        HizbMapping::from_json(document.to_string().as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn blocks_follow_surah_order_and_ranges() {
        let source = Arc::new(FakeSource::new(10));
        let cache = SurahCache::new(source.clone());

        let blocks = load_blocks(&mapping(), &cache, Hizb::new(1).unwrap())
            .await
            .unwrap();

        assert_eq!(source.calls(), vec![1, 2]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].surah_number, 1);
        assert_eq!(blocks[0].ayahs.len(), 7);
        assert_eq!(blocks[1].surah_name, "Surah 2");
        assert_eq!(blocks[1].ayahs.len(), 3);
    }

    #[tokio::test]
    async fn every_hizb_opens_in_ascending_surah_order() {
        // Keys like "6" and "100" sort differently as text than as numbers.
        let mut hizbs: Vec<Hizb> = Hizb::all().collect();
        hizbs.reverse();
        let records: Vec<serde_json::Value> = hizbs
            .into_iter()
            .map(|hizb| {
                let n = u16::from(hizb.number());
                json!({
                    "hizb": n,
                    "verse_mapping": {
                        ((n + 54).to_string()): "1-2",
                        (n.to_string()): "3-4",
                        ((n / 2 + 1).to_string()): "5"
                    }
                })
            })
            .collect();
        let mapping =
            HizbMapping::from_json(serde_json::Value::Array(records).to_string().as_bytes())
                .unwrap();
        let cache = SurahCache::new(Arc::new(FakeSource::new(10)));

        for hizb in Hizb::all() {
            let blocks = load_blocks(&mapping, &cache, hizb).await.unwrap();
            assert!(!blocks.is_empty(), "hizb {hizb} has no blocks");
            assert!(
                blocks
                    .windows(2)
                    .all(|pair| pair[0].surah_number < pair[1].surah_number),
                "hizb {hizb} out of order"
            );
            assert!(blocks.iter().all(|block| !block.ayahs.is_empty()));
        }
    }

    #[tokio::test]
    async fn fetch_failure_stops_remaining_surahs() {
        let source = Arc::new(FakeSource::new(10).failing(4));
        let cache = SurahCache::new(source.clone());

        let err = load_blocks(&mapping(), &cache, Hizb::new(2).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReadingError::Fetch(FetchError::Status { surah: 4, .. })
        ));
        assert_eq!(source.calls(), vec![3, 4]);
    }

    #[tokio::test]
    async fn range_past_surah_end_yields_fewer_verses() {
        let cache = SurahCache::new(Arc::new(FakeSource::new(10)));

        let blocks = load_blocks(&mapping(), &cache, Hizb::new(3).unwrap())
            .await
            .unwrap();

        let numbers: Vec<u16> = blocks[0].ayahs.iter().map(|a| a.number_in_surah).collect();
        assert_eq!(numbers, vec![8, 9, 10]);
    }

    #[tokio::test]
    async fn unmapped_hizb_never_touches_the_network() {
        let source = Arc::new(FakeSource::new(10));
        let cache = SurahCache::new(source.clone());

        let err = load_blocks(&mapping(), &cache, Hizb::new(9).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ReadingError::Mapping(MappingError::NoMapping(9))));
        assert!(source.calls().is_empty());
    }
}
