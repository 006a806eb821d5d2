use crate::models::{Hizb, JuzPoint, Progress, ProgressSummary, TOTAL_HIZB};

pub const HIZB_PER_JUZ: usize = 2;

pub fn build_summary(progress: &Progress) -> ProgressSummary {
    let done_count = progress.done_count();
    let percent = (done_count as f64 * 1000.0 / TOTAL_HIZB as f64).round() / 10.0;

    let juz: Vec<JuzPoint> = progress
        .as_slice()
        .chunks(HIZB_PER_JUZ)
        .enumerate()
        .map(|(index, pair)| {
            let done = pair.iter().filter(|done| **done).count();
            JuzPoint {
                juz: index as u8 + 1,
                done: done as u8,
                complete: done == pair.len(),
            }
        })
        .collect();
    let juz_completed = juz.iter().filter(|point| point.complete).count();

    ProgressSummary {
        done_count,
        remaining: TOTAL_HIZB - done_count,
        percent,
        next_unread: Hizb::all().find(|hizb| !progress.is_done(*hizb)),
        juz_completed,
        juz,
    }
}
