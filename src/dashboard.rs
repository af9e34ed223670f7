//! Dashboard summary built on top of the store / 仪表盘概览

use std::cmp::Reverse;

use crate::models::{DashboardSummary, StrengthWeakness};
use crate::store::Store;

/// Number of recent strengths/weaknesses shown / 显示的最近条目数
pub const RECENT_LIMIT: usize = 3;

pub fn summarize(store: &Store) -> DashboardSummary {
    DashboardSummary {
        total_parties: store.party_count(),
        recent_sw: most_recent(store.list_all_strengths_weaknesses(), RECENT_LIMIT),
    }
}

/// Latest `limit` records, newest first / 最新的若干条记录
///
/// Sorting is stable, so records sharing a date keep their input order.
pub fn most_recent(mut items: Vec<StrengthWeakness>, limit: usize) -> Vec<StrengthWeakness> {
    items.sort_by_key(|sw| Reverse(sw.date));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::models::Kind;
    use crate::store::NewStrengthWeakness;
    use chrono::NaiveDate;

    #[test]
    fn test_summary_keeps_three_latest() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::load(&StorageConfig::in_dir(dir.path()));
        let alpha = store.create_party("Alpha", "d", None).unwrap();
        let beta = store.create_party("Beta", "d", None).unwrap();

        let days = [5u32, 1, 20, 12, 3];
        for (i, day) in days.iter().enumerate() {
            let party_id = if i % 2 == 0 { &alpha.id } else { &beta.id };
            store
                .add_strength_weakness(NewStrengthWeakness {
                    party_id: party_id.clone(),
                    kind: Kind::Force,
                    content: format!("item {}", i),
                    date: NaiveDate::from_ymd_opt(2024, 3, *day).unwrap(),
                    source: None,
                    author: None,
                })
                .unwrap()
                .unwrap();
        }

        let summary = summarize(&store);
        assert_eq!(summary.total_parties, 2);
        let dates: Vec<u32> = summary
            .recent_sw
            .iter()
            .map(|sw| chrono::Datelike::day(&sw.date))
            .collect();
        assert_eq!(dates, vec![20, 12, 5]);
    }

    #[test]
    fn test_summary_of_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::load(&StorageConfig::in_dir(dir.path()));
        let summary = summarize(&store);
        assert_eq!(summary.total_parties, 0);
        assert!(summary.recent_sw.is_empty());
    }
}
