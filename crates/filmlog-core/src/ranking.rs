// Watchlist / film grid ordering

use filmlog_config::RankingConfig;
use filmlog_models::{SortDirection, SortKey};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

use crate::metrics::{
    extract_added_timestamp, extract_genre_ids, extract_rating, extract_release_timestamp,
    extract_runtime_minutes,
};

/// Value of the requested metric for one record, None when missing
pub fn sort_metric(record: &Value, key: SortKey) -> Option<f64> {
    let value = match key {
        SortKey::Source => return None,
        SortKey::Added => extract_added_timestamp(record),
        SortKey::Release => extract_release_timestamp(record),
        SortKey::Rating => Some(extract_rating(record)),
        SortKey::Runtime => extract_runtime_minutes(record),
    };
    value.filter(|v| v.is_finite())
}

/// Filter by genre, then order by `key`
///
/// Returns a new sequence; `records` is untouched.
pub fn rank(
    records: &[Value],
    key: SortKey,
    direction: SortDirection,
    genre: Option<u32>,
    settings: &RankingConfig,
) -> Vec<Value> {
    rank_indices(records, key, direction, genre, settings)
        .into_iter()
        .map(|index| records[index].clone())
        .collect()
}

/// Same as [`rank`], but returns positions into `records`
///
/// Records missing the metric keep their relative order at the tail. For
/// date keys, when fewer than `max(min_sample, min_sample_ratio * count)`
/// records carry the date, the filtered source order is returned as-is.
pub fn rank_indices(
    records: &[Value],
    key: SortKey,
    direction: SortDirection,
    genre: Option<u32>,
    settings: &RankingConfig,
) -> Vec<usize> {
    let candidates: Vec<usize> = match genre {
        Some(genre_id) => (0..records.len())
            .filter(|&index| extract_genre_ids(&records[index]).contains(&genre_id))
            .collect(),
        None => (0..records.len()).collect(),
    };

    if key == SortKey::Source {
        return candidates;
    }

    let mut keyed: Vec<(usize, Option<f64>)> = candidates
        .iter()
        .map(|&index| (index, sort_metric(&records[index], key)))
        .collect();

    let present = keyed.iter().filter(|(_, metric)| metric.is_some()).count();
    let required = (settings.min_sample as f64).max(settings.min_sample_ratio * candidates.len() as f64);

    debug!(
        "rank: key={:?}, direction={:?}, genre={:?}, input_count={}, candidate_count={}, with_metric={}",
        key,
        direction,
        genre,
        records.len(),
        candidates.len(),
        present
    );

    if key.is_date_based() && (present as f64) < required {
        debug!(
            "rank: only {} of {} records carry {:?} (need {}), keeping source order",
            present,
            candidates.len(),
            key,
            required
        );
        return candidates;
    }

    keyed.sort_by(|(a_index, a_metric), (b_index, b_metric)| {
        let by_metric = match (a_metric, b_metric) {
            (Some(a), Some(b)) => direction.apply(a.total_cmp(b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_metric.then(a_index.cmp(b_index))
    });

    keyed.into_iter().map(|(index, _)| index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn titles(records: &[Value]) -> Vec<&str> {
        records.iter().map(|r| r["title"].as_str().unwrap()).collect()
    }

    fn settings() -> RankingConfig {
        RankingConfig::default()
    }

    fn unrated_and_rated() -> Vec<Value> {
        vec![
            json!({"title": "A"}),
            json!({"title": "B", "rating": 3}),
            json!({"title": "C", "rating": "n/a"}),
            json!({"title": "D", "rating": 5}),
        ]
    }

    #[test]
    fn test_unrated_records_rank_as_zero_descending() {
        let ranked = rank(&unrated_and_rated(), SortKey::Rating, SortDirection::Descending, None, &settings());
        assert_eq!(titles(&ranked), vec!["D", "B", "A", "C"]);
    }

    #[test]
    fn test_unrated_records_rank_as_zero_ascending() {
        let ranked = rank(&unrated_and_rated(), SortKey::Rating, SortDirection::Ascending, None, &settings());
        assert_eq!(titles(&ranked), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_missing_runtime_stays_at_tail_both_directions() {
        let records = vec![
            json!({"title": "A"}),
            json!({"title": "B", "runtime": "1h 40m"}),
            json!({"title": "C", "runtime": "unknown"}),
            json!({"title": "D", "movie": {"runtime": 90}}),
        ];

        let ascending = rank(&records, SortKey::Runtime, SortDirection::Ascending, None, &settings());
        assert_eq!(titles(&ascending), vec!["D", "B", "A", "C"]);

        let descending = rank(&records, SortKey::Runtime, SortDirection::Descending, None, &settings());
        assert_eq!(titles(&descending), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_ties_broken_by_source_index() {
        let records = vec![
            json!({"title": "A", "rating": 4}),
            json!({"title": "B", "rating": "4/5"}),
            json!({"title": "C", "rating": 5}),
            json!({"title": "D", "rating": "80%"}),
        ];

        let descending = rank(&records, SortKey::Rating, SortDirection::Descending, None, &settings());
        assert_eq!(titles(&descending), vec!["C", "A", "B", "D"]);

        let ascending = rank(&records, SortKey::Rating, SortDirection::Ascending, None, &settings());
        assert_eq!(titles(&ascending), vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn test_sparse_release_dates_keep_source_order() {
        let mut records: Vec<Value> = (0..10)
            .map(|i| json!({"title": format!("M{}", i)}))
            .collect();
        records[7]["release_date"] = json!("1994-09-23");
        records[2]["release_date"] = json!("2001-01-01");

        let ranked = rank_indices(&records, SortKey::Release, SortDirection::Descending, None, &settings());
        assert_eq!(ranked, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_release_dates_sorted_when_enough_present() {
        let dates = ["2001-01-01", "1994-09-23", "2010-07-16", "1999-03-31", "2014-11-07"];
        let mut records: Vec<Value> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| json!({"title": format!("M{}", i), "movie": {"release_date": d}}))
            .collect();
        records.push(json!({"title": "undated"}));

        let ranked = rank(&records, SortKey::Release, SortDirection::Ascending, None, &settings());
        assert_eq!(titles(&ranked), vec!["M1", "M3", "M0", "M2", "M4", "undated"]);
    }

    #[test]
    fn test_date_threshold_scales_with_count() {
        // 30 records need 6 dated ones (20%); 5 is not enough
        let mut records: Vec<Value> = (0..30).map(|i| json!({"title": format!("M{}", i)})).collect();
        for i in 0..5 {
            records[29 - i]["createdAt"] = json!(format!("2024-01-0{}", i + 1));
        }
        let ranked = rank_indices(&records, SortKey::Added, SortDirection::Descending, None, &settings());
        assert_eq!(ranked, (0..30).collect::<Vec<_>>());

        records[0]["createdAt"] = json!("2024-02-01");
        let ranked = rank_indices(&records, SortKey::Added, SortDirection::Descending, None, &settings());
        assert_eq!(ranked[0], 0);
        assert_eq!(ranked[1], 25);
    }

    #[test]
    fn test_sparse_non_date_metric_still_sorts() {
        let records = vec![
            json!({"title": "A"}),
            json!({"title": "B"}),
            json!({"title": "C", "runtime": 100}),
        ];
        let ranked = rank(&records, SortKey::Runtime, SortDirection::Ascending, None, &settings());
        assert_eq!(titles(&ranked), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_genre_filter_applies_before_sorting() {
        let records = vec![
            json!({"title": "Heat", "movie": {"genre_ids": [28, 80]}, "rating": 4}),
            json!({"title": "Amelie", "movie": {"genre_ids": [35, 10749]}, "rating": 5}),
            json!({"title": "Die Hard", "genres": ["Action", "Thriller"], "rating": 5}),
            json!({"title": "Untagged", "rating": 3}),
        ];

        for key in [SortKey::Source, SortKey::Rating, SortKey::Runtime, SortKey::Release] {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let ranked = rank(&records, key, direction, Some(28), &settings());
                let mut names = titles(&ranked);
                names.sort();
                assert_eq!(names, vec!["Die Hard", "Heat"], "key={:?}", key);
            }
        }
    }

    #[test]
    fn test_source_key_and_input_untouched() {
        let records = vec![json!({"title": "B", "rating": 1}), json!({"title": "A", "rating": 5})];
        let snapshot = records.clone();

        let ranked = rank(&records, SortKey::Source, SortDirection::Descending, None, &settings());
        assert_eq!(titles(&ranked), vec!["B", "A"]);
        assert_eq!(records, snapshot);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], SortKey::Rating, SortDirection::Descending, None, &settings()).is_empty());
        assert!(rank(&[], SortKey::Release, SortDirection::Descending, None, &settings()).is_empty());
    }
}
