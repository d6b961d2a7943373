use proptest::prelude::*;
use proptest::test_runner::Config;
use station_rota::schedule::overlap::pack_columns;
use station_rota::schedule::time::{minutes_to_time, time_to_minutes};
use station_rota::schedule::{assign_columns, ColumnRules, GridGeometry, Span};

fn spans() -> impl Strategy<Value = Vec<Span>> {
    prop::collection::vec((0_u16..1380, 1_u16..240), 0..24).prop_map(|raw| {
        raw.into_iter()
            .map(|(start, len)| Span::new(start, (start + len).min(1440)))
            .collect()
    })
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn clock_text_roundtrip(minutes in 0_u16..1440) {
        let text = minutes_to_time(minutes);
        prop_assert_eq!(text.len(), 5);
        prop_assert_eq!(time_to_minutes(&text).expect("parse"), minutes);
    }

    #[test]
    fn later_items_sit_lower(a in 360_u16..1440, b in 360_u16..1440, hour_height in 1_u16..200) {
        let grid = GridGeometry::with_hour_height(hour_height as f32);
        let (lo, hi) = (a.min(b), a.max(b));
        if lo < hi {
            prop_assert!(grid.offset_of(lo) < grid.offset_of(hi));
        }
        let pos = grid.position(lo, hi);
        prop_assert!(pos.height >= 0.0);
    }

    #[test]
    fn items_sharing_a_column_overlap_at_most_the_tolerance(spans in spans(), tolerance in 0_u16..60) {
        let (columns, total) = pack_columns(&spans, tolerance);
        prop_assert_eq!(columns.len(), spans.len());
        for col in 0..total {
            let mut lane: Vec<Span> = spans
                .iter()
                .zip(&columns)
                .filter(|(_, c)| **c == col)
                .map(|(s, _)| *s)
                .collect();
            lane.sort_by_key(|s| s.start);
            for pair in lane.windows(2) {
                prop_assert!(pair[0].end as i32 - pair[1].start as i32 <= tolerance as i32);
            }
        }
    }

    #[test]
    fn slots_stay_within_the_cap(spans in spans(), max_columns in 1_usize..6) {
        let rules = ColumnRules { tolerance_minutes: 30, max_columns };
        let slots = assign_columns(&spans, rules);
        prop_assert_eq!(slots.len(), spans.len());
        for slot in &slots {
            prop_assert!(slot.total_columns <= max_columns);
            prop_assert!(slot.layer_index < slot.total_columns);
            prop_assert_eq!(slot.total_columns, slots[0].total_columns);
        }
    }
}
