//! Render-ready stacked bar layout.
//!
//! [`ChartView`] is what a renderer draws: one bar per author (sorted), one
//! stacked [`Series`] per keyword, zero-filled where an author never used
//! the keyword. It knows nothing about terminals or plotting libraries.

use crate::palette::{Colorizer, Rgb, color_for_rank};
use crate::record::NONE_KEYWORD;
use crate::tally::Tally;

pub const CHART_TITLE: &str = "Keyword Frequency per Author (Stacked)";
pub const X_LABEL: &str = "Authors";
pub const Y_LABEL: &str = "Keyword Counts";
pub const LEGEND_TITLE: &str = "Keywords";

/// How keyword segments are ordered from the bottom of each bar upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOrder {
    /// First-seen order.
    #[default]
    Rank,
    /// Keyword name order.
    Alphabetical,
}

impl StackOrder {
    pub fn toggle(self) -> Self {
        match self {
            Self::Rank => Self::Alphabetical,
            Self::Alphabetical => Self::Rank,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rank => "first seen",
            Self::Alphabetical => "a-z",
        }
    }
}

/// One keyword's segment across every author's bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub keyword: String,
    pub rank: usize,
    pub color: Rgb,
    /// `values[i]` belongs to `ChartView::authors[i]`.
    pub values: Vec<u64>,
}

impl Series {
    pub fn is_none_sentinel(&self) -> bool {
        self.keyword == NONE_KEYWORD
    }

    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartView {
    pub authors: Vec<String>,
    /// Bottom of the stack first. The `(none)` sentinel, if present, is last.
    pub series: Vec<Series>,
}

impl ChartView {
    pub fn build(tally: &Tally, colors: &Colorizer, order: StackOrder) -> Self {
        let authors: Vec<String> = tally.authors().map(str::to_string).collect();

        // Tally::ingest_line always assigns first. Keywords counted through
        // `apply` alone get the slots after the assigned ones, in name order.
        let mut next_rank = colors.len();
        let mut series: Vec<Series> = tally
            .keywords()
            .into_iter()
            .map(|keyword| {
                let (rank, color) = match colors.get(keyword) {
                    Some(a) => (a.rank, a.color),
                    None => {
                        let rank = next_rank;
                        next_rank += 1;
                        (rank, color_for_rank(rank))
                    }
                };
                let values = authors.iter().map(|a| tally.count(a, keyword)).collect();
                Series {
                    keyword: keyword.to_string(),
                    rank,
                    color,
                    values,
                }
            })
            .collect();

        match order {
            StackOrder::Rank => series.sort_by(|a, b| {
                (a.is_none_sentinel(), a.rank, &a.keyword).cmp(&(
                    b.is_none_sentinel(),
                    b.rank,
                    &b.keyword,
                ))
            }),
            StackOrder::Alphabetical => series.sort_by(|a, b| {
                (a.is_none_sentinel(), &a.keyword).cmp(&(b.is_none_sentinel(), &b.keyword))
            }),
        }

        Self { authors, series }
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Series in legend order: stack order, or reversed so the top segment
    /// is listed first.
    pub fn legend(&self, top_first: bool) -> Vec<&Series> {
        let mut out: Vec<&Series> = self.series.iter().collect();
        if top_first {
            out.reverse();
        }
        out
    }

    /// Bar height per author.
    pub fn totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.authors.len()];
        for s in &self.series {
            for (t, v) in totals.iter_mut().zip(&s.values) {
                *t += v;
            }
        }
        totals
    }

    pub fn max_total(&self) -> u64 {
        self.totals().into_iter().max().unwrap_or(0)
    }

    /// Stacked segments of one author's bar, bottom first, skipping zeros.
    pub fn stack_for(&self, author_idx: usize) -> Vec<(&Series, u64)> {
        self.series
            .iter()
            .filter_map(|s| {
                let v = s.values.get(author_idx).copied().unwrap_or(0);
                (v > 0).then_some((s, v))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;
    use crate::record::Record;

    fn state(lines: &[&str]) -> (Tally, Colorizer) {
        let mut tally = Tally::new();
        let mut colors = Colorizer::new();
        for line in lines {
            tally.ingest_line(line, &mut colors);
        }
        (tally, colors)
    }

    fn keywords(view: &ChartView) -> Vec<&str> {
        view.series.iter().map(|s| s.keyword.as_str()).collect()
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    #[test]
    fn empty_tally_builds_empty_view() {
        let view = ChartView::build(&Tally::new(), &Colorizer::new(), StackOrder::Rank);
        assert!(view.is_empty());
        assert!(view.series.is_empty());
        assert_eq!(view.max_total(), 0);
    }

    #[test]
    fn authors_are_sorted() {
        let (t, c) = state(&[
            r#"{"author":"zed","keyword_mentioned":"x"}"#,
            r#"{"author":"Amy","keyword_mentioned":"x"}"#,
            r#"{"author":"bob","keyword_mentioned":"x"}"#,
        ]);
        let view = ChartView::build(&t, &c, StackOrder::Rank);
        assert_eq!(view.authors, vec!["Amy", "bob", "zed"]);
    }

    #[test]
    fn series_stack_by_rank_with_none_on_top() {
        let (t, c) = state(&[
            r#"{"author":"A"}"#,
            r#"{"author":"A","keyword_mentioned":"zeta"}"#,
            r#"{"author":"B","keyword_mentioned":"alpha"}"#,
        ]);
        // (none) has rank 0 but still stacks last.
        assert_eq!(c.get(NONE_KEYWORD).unwrap().rank, 0);
        let view = ChartView::build(&t, &c, StackOrder::Rank);
        assert_eq!(keywords(&view), vec!["zeta", "alpha", NONE_KEYWORD]);
    }

    #[test]
    fn alphabetical_order_keeps_none_on_top() {
        let (t, c) = state(&[
            r#"{"author":"A","keyword_mentioned":"zeta"}"#,
            r#"{"author":"A"}"#,
            r#"{"author":"B","keyword_mentioned":"alpha"}"#,
        ]);
        let view = ChartView::build(&t, &c, StackOrder::Alphabetical);
        assert_eq!(keywords(&view), vec!["alpha", "zeta", NONE_KEYWORD]);
    }

    #[test]
    fn missing_pairs_are_zero_filled() {
        let (t, c) = state(&[
            r#"{"author":"A","keyword_mentioned":"x"}"#,
            r#"{"author":"A","keyword_mentioned":"x"}"#,
            r#"{"author":"B"}"#,
        ]);
        let view = ChartView::build(&t, &c, StackOrder::Rank);
        assert_eq!(view.authors, vec!["A", "B"]);
        assert_eq!(view.series[0].keyword, "x");
        assert_eq!(view.series[0].values, vec![2, 0]);
        assert_eq!(view.series[1].keyword, NONE_KEYWORD);
        assert_eq!(view.series[1].values, vec![0, 1]);
        assert_eq!(view.totals(), vec![2, 1]);
        assert_eq!(view.max_total(), 2);
    }

    #[test]
    fn series_carry_assigned_colors() {
        let (t, c) = state(&[
            r#"{"author":"A","keyword_mentioned":"x"}"#,
            r#"{"author":"A","keyword_mentioned":"y"}"#,
        ]);
        let view = ChartView::build(&t, &c, StackOrder::Alphabetical);
        assert_eq!(view.series[0].color, PALETTE[0]);
        assert_eq!(view.series[1].color, PALETTE[1]);
    }

    #[test]
    fn unassigned_keyword_gets_a_fallback_slot() {
        let mut t = Tally::new();
        t.apply(&Record::new("A", "x"));
        let view = ChartView::build(&t, &Colorizer::new(), StackOrder::Rank);
        assert_eq!(view.series[0].rank, 0);
        assert_eq!(view.series[0].color, PALETTE[0]);
    }

    #[test]
    fn unassigned_keywords_get_distinct_slots_after_assigned_ones() {
        let mut colors = Colorizer::new();
        colors.assign("seen");
        let mut t = Tally::new();
        for kw in ["seen", "b", "a", NONE_KEYWORD] {
            t.apply(&Record::new("A", kw));
        }
        let view = ChartView::build(&t, &colors, StackOrder::Rank);

        // Slots after "seen" go out in name order: "(none)", "a", "b".
        let slots: Vec<(&str, usize)> = view
            .series
            .iter()
            .map(|s| (s.keyword.as_str(), s.rank))
            .collect();
        assert_eq!(slots, vec![("seen", 0), ("a", 2), ("b", 3), (NONE_KEYWORD, 1)]);
        assert_eq!(view.series[1].color, PALETTE[2]);
        assert_eq!(view.series[2].color, PALETTE[3]);
    }

    // -----------------------------------------------------------------------
    // Legend / stacks
    // -----------------------------------------------------------------------

    #[test]
    fn legend_matches_stack_order() {
        let (t, c) = state(&[
            r#"{"author":"A"}"#,
            r#"{"author":"A","keyword_mentioned":"a"}"#,
            r#"{"author":"A","keyword_mentioned":"b"}"#,
        ]);
        let view = ChartView::build(&t, &c, StackOrder::Rank);
        let bottom_first: Vec<&str> = view.legend(false).iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(bottom_first, vec!["a", "b", NONE_KEYWORD]);
        let top_first: Vec<&str> = view.legend(true).iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(top_first, vec![NONE_KEYWORD, "b", "a"]);
    }

    #[test]
    fn stack_for_skips_zero_segments() {
        let (t, c) = state(&[
            r#"{"author":"A","keyword_mentioned":"x"}"#,
            r#"{"author":"B","keyword_mentioned":"y"}"#,
            r#"{"author":"B","keyword_mentioned":"y"}"#,
        ]);
        let view = ChartView::build(&t, &c, StackOrder::Rank);
        let b: Vec<(&str, u64)> = view
            .stack_for(1)
            .into_iter()
            .map(|(s, v)| (s.keyword.as_str(), v))
            .collect();
        assert_eq!(b, vec![("y", 2)]);
        assert!(view.stack_for(7).is_empty());
    }

    #[test]
    fn stack_order_toggles() {
        assert_eq!(StackOrder::default(), StackOrder::Rank);
        assert_eq!(StackOrder::Rank.toggle(), StackOrder::Alphabetical);
        assert_eq!(StackOrder::Alphabetical.toggle(), StackOrder::Rank);
    }
}
