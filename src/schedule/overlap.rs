//! Side-by-side column assignment for overlapping items within one day.
//!
//! Items are packed greedily: sorted by start, each goes into the first
//! column whose last item ends no later than the new item's start plus the
//! tolerance. The tolerance lets short overlaps share a lane so the week view
//! stays dense; it is a layout rule, not a conflict check.

/// A time range in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u16,
    pub end: u16,
}

impl Span {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

/// Result of column assignment for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    pub layer_index: usize,
    pub total_columns: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRules {
    pub tolerance_minutes: u16,
    pub max_columns: usize,
}

impl Default for ColumnRules {
    fn default() -> Self {
        Self {
            tolerance_minutes: 30,
            max_columns: 4,
        }
    }
}

/// Raw column index per item (uncapped), in input order, plus the column count.
pub fn pack_columns(spans: &[Span], tolerance_minutes: u16) -> (Vec<usize>, usize) {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    // stable: equal starts keep input order
    order.sort_by_key(|&i| spans[i].start);

    let mut column_ends: Vec<u16> = Vec::new();
    let mut assigned = vec![0; spans.len()];

    for i in order {
        let span = spans[i];
        let limit = span.start as u32 + tolerance_minutes as u32;
        let column = column_ends.iter().position(|&end| end as u32 <= limit);
        let column = match column {
            Some(c) => {
                column_ends[c] = span.end;
                c
            }
            None => {
                column_ends.push(span.end);
                column_ends.len() - 1
            }
        };
        assigned[i] = column;
    }

    (assigned, column_ends.len())
}

/// Column slots for a day's items, in input order. Columns past the visual
/// cap collapse into the last visible lane.
pub fn assign_columns(spans: &[Span], rules: ColumnRules) -> Vec<ColumnSlot> {
    let max = rules.max_columns.max(1);
    let (raw, count) = pack_columns(spans, rules.tolerance_minutes);
    let total_columns = count.min(max);
    raw.into_iter()
        .map(|column| ColumnSlot {
            layer_index: column.min(max - 1),
            total_columns,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(spans: &[(u16, u16)]) -> Vec<ColumnSlot> {
        let spans: Vec<Span> = spans.iter().map(|&(s, e)| Span::new(s, e)).collect();
        assign_columns(&spans, ColumnRules::default())
    }

    #[test]
    fn empty_day_has_no_columns() {
        assert!(slots(&[]).is_empty());
    }

    #[test]
    fn single_item_takes_full_width() {
        let out = slots(&[(360, 1440)]);
        assert_eq!(
            out,
            vec![ColumnSlot {
                layer_index: 0,
                total_columns: 1
            }]
        );
    }

    #[test]
    fn forty_minute_overlap_splits() {
        let out = slots(&[(480, 540), (500, 560)]);
        assert_eq!(out[0].layer_index, 0);
        assert_eq!(out[1].layer_index, 1);
        assert_eq!(out[0].total_columns, 2);
    }

    #[test]
    fn fifteen_minute_overlap_shares_column() {
        let out = slots(&[(480, 540), (525, 570)]);
        assert_eq!(out[0].layer_index, 0);
        assert_eq!(out[1].layer_index, 0);
        assert_eq!(out[1].total_columns, 1);
    }

    #[test]
    fn input_order_does_not_matter_for_slots() {
        let out = slots(&[(500, 560), (480, 540)]);
        assert_eq!(out[1].layer_index, 0);
        assert_eq!(out[0].layer_index, 1);
    }

    #[test]
    fn reuses_first_free_column() {
        // third item fits back into column 0
        let out = slots(&[(480, 600), (490, 600), (600, 660)]);
        assert_eq!(
            out.iter().map(|s| s.layer_index).collect::<Vec<_>>(),
            vec![0, 1, 0]
        );
    }

    #[test]
    fn caps_at_four_lanes() {
        let out = slots(&[
            (480, 600),
            (481, 600),
            (482, 600),
            (483, 600),
            (484, 600),
            (485, 600),
        ]);
        assert!(out.iter().all(|s| s.total_columns == 4));
        assert_eq!(out[4].layer_index, 3);
        assert_eq!(out[5].layer_index, 3);
    }
}
