//! Stacked bar widget.
//!
//! ```text
//!  7 │ ▇▇▇▇
//!    │ ████  3
//!    │ ████ ████
//!  0 │ ████ ████
//!      Amy  Bob
//! ```
//!
//! Segment boundaries are computed on cumulative counts, so rounding never
//! makes a stack taller than its total.

use mentionwatch_core::{ChartView, Rgb};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const MAX_BAR_WIDTH: u16 = 9;
const GAP: u16 = 1;
const BAR_SYMBOL: &str = "█";

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Width of each bar so that `bars` bars plus gaps fit in `plot_width`,
/// never below 1 or above [`MAX_BAR_WIDTH`].
pub fn bar_width(plot_width: u16, bars: u16) -> u16 {
    if bars == 0 {
        return 0;
    }
    (plot_width.saturating_add(GAP) / bars)
        .saturating_sub(GAP)
        .clamp(1, MAX_BAR_WIDTH)
}

/// Rows covered by `value` out of `max` in a plot `height` rows tall.
fn scale(value: u64, max: u64, height: u16) -> u16 {
    if max == 0 {
        return 0;
    }
    let rows = (u128::from(value) * u128::from(height) + u128::from(max) / 2) / u128::from(max);
    rows.min(u128::from(height)) as u16
}

pub struct StackedBars<'a> {
    view: &'a ChartView,
}

impl<'a> StackedBars<'a> {
    pub fn new(view: &'a ChartView) -> Self {
        Self { view }
    }
}

impl Widget for StackedBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view;
        if view.is_empty() || area.height < 2 || area.width < 3 {
            return;
        }

        let max = view.max_total().max(1);
        let axis_w = (max.to_string().len() as u16 + 1).min(area.width - 1);
        let plot = Rect::new(
            area.x + axis_w,
            area.y,
            area.width - axis_w,
            area.height - 1,
        );
        let label_y = area.bottom() - 1;

        // Y axis: max at the top, 0 at the baseline.
        let axis_style = Style::default().fg(Color::DarkGray);
        let digits = usize::from(axis_w - 1);
        buf.set_string(area.x, plot.y, format!("{max:>digits$}"), axis_style);
        buf.set_string(area.x, plot.bottom() - 1, format!("{:>digits$}", 0), axis_style);

        let n = u16::try_from(view.authors.len()).unwrap_or(u16::MAX);
        let bar_w = bar_width(plot.width, n);
        let totals = view.totals();

        for (i, author) in view.authors.iter().enumerate() {
            let offset = i as u32 * u32::from(bar_w + GAP);
            if offset + u32::from(bar_w) > u32::from(plot.width) {
                break;
            }
            let x = plot.x + offset as u16;

            let mut cum = 0u64;
            for (series, value) in view.stack_for(i) {
                let lo = scale(cum, max, plot.height);
                cum += value;
                let hi = scale(cum, max, plot.height);
                let color = to_color(series.color);
                for row in lo..hi {
                    let y = plot.bottom() - 1 - row;
                    for dx in 0..bar_w {
                        buf[(x + dx, y)].set_symbol(BAR_SYMBOL).set_fg(color);
                    }
                }
            }

            // Total just above the bar, when there is headroom.
            let top = scale(totals[i], max, plot.height);
            let total_label = totals[i].to_string();
            if top < plot.height && total_label.len() <= usize::from(bar_w) {
                buf.set_string(x, plot.bottom() - 1 - top, total_label, axis_style);
            }

            // Clipped to the bar by display width; wide glyphs that would
            // cross into the gap are dropped.
            buf.set_stringn(
                x,
                label_y,
                author,
                usize::from(bar_w),
                Style::default().fg(Color::White),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentionwatch_core::{PALETTE, StackOrder, WatchState};

    fn view_of(lines: &[&str]) -> ChartView {
        let mut state = WatchState::new();
        for line in lines {
            state.ingest_line(line);
        }
        state.view(StackOrder::Rank)
    }

    fn render(view: &ChartView, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        StackedBars::new(view).render(area, &mut buf);
        buf
    }

    #[test]
    fn bar_width_fits_and_clamps() {
        assert_eq!(bar_width(18, 2), 8);
        assert_eq!(bar_width(100, 1), MAX_BAR_WIDTH);
        assert_eq!(bar_width(5, 30), 1);
        assert_eq!(bar_width(10, 0), 0);
    }

    #[test]
    fn scale_rounds_and_caps() {
        assert_eq!(scale(0, 10, 5), 0);
        assert_eq!(scale(10, 10, 5), 5);
        assert_eq!(scale(1, 2, 5), 3);
        assert_eq!(scale(3, 0, 5), 0);
        assert_eq!(scale(u64::MAX, u64::MAX, 40), 40);
    }

    #[test]
    fn stacks_are_drawn_bottom_up_in_series_colors() {
        let view = view_of(&[
            r#"{"author":"A","keyword_mentioned":"x"}"#,
            r#"{"author":"A","keyword_mentioned":"x"}"#,
            r#"{"author":"B"}"#,
        ]);
        let buf = render(&view, 20, 6);

        // A: full height in the first palette color.
        for y in 0..5 {
            assert_eq!(buf[(2, y)].symbol(), BAR_SYMBOL);
            assert_eq!(buf[(2, y)].fg, to_color(PALETTE[0]));
        }
        // B: 1 of 2 → 3 of 5 rows, second palette color.
        for y in 2..5 {
            assert_eq!(buf[(11, y)].symbol(), BAR_SYMBOL);
            assert_eq!(buf[(11, y)].fg, to_color(PALETTE[1]));
        }
        assert_eq!(buf[(11, 1)].symbol(), "1");
        assert_eq!(buf[(12, 1)].symbol(), " ");
        assert_eq!(buf[(11, 0)].symbol(), " ");
    }

    #[test]
    fn axis_and_author_labels() {
        let view = view_of(&[
            r#"{"author":"A","keyword_mentioned":"x"}"#,
            r#"{"author":"A","keyword_mentioned":"x"}"#,
            r#"{"author":"B"}"#,
        ]);
        let buf = render(&view, 20, 6);
        assert_eq!(buf[(0, 0)].symbol(), "2");
        assert_eq!(buf[(0, 4)].symbol(), "0");
        assert_eq!(buf[(2, 5)].symbol(), "A");
        assert_eq!(buf[(11, 5)].symbol(), "B");
    }

    #[test]
    fn none_segment_sits_on_top() {
        let view = view_of(&[
            r#"{"author":"A"}"#,
            r#"{"author":"A","keyword_mentioned":"x"}"#,
        ]);
        let buf = render(&view, 12, 5);
        // max=1 → axis 2 wide, plot 10x4, single bar; x (rank 1) at the
        // bottom two rows, (none) (rank 0) on top.
        let x_color = to_color(PALETTE[1]);
        let none_color = to_color(PALETTE[0]);
        assert_eq!(buf[(2, 3)].fg, x_color);
        assert_eq!(buf[(2, 2)].fg, x_color);
        assert_eq!(buf[(2, 1)].fg, none_color);
        assert_eq!(buf[(2, 0)].fg, none_color);
    }

    #[test]
    fn too_many_authors_are_cut_off_without_panicking() {
        let lines: Vec<String> = (0..30)
            .map(|i| format!(r#"{{"author":"a{i:02}","keyword_mentioned":"x"}}"#))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let view = view_of(&refs);
        let buf = render(&view, 10, 4);
        assert_eq!(buf[(2, 3)].symbol(), "a");
        assert_eq!(buf[(8, 3)].symbol(), "a");
        assert_eq!(buf[(9, 3)].symbol(), " ");
    }

    #[test]
    fn wide_author_labels_stay_inside_their_bar() {
        let view = view_of(&[
            r#"{"author":"a日本","keyword_mentioned":"x"}"#,
            r#"{"author":"b","keyword_mentioned":"x"}"#,
        ]);
        // max=1 → axis 2 wide, plot 7 wide → bars 3 wide at x=2 and x=6.
        let buf = render(&view, 9, 4);
        assert_eq!(buf[(2, 3)].symbol(), "a");
        assert_eq!(buf[(3, 3)].symbol(), "日");
        // "本" needs two more cells; only one is left in the bar.
        assert_eq!(buf[(5, 3)].symbol(), " ");
        assert_eq!(buf[(6, 3)].symbol(), "b");
    }

    #[test]
    fn tiny_or_empty_areas_draw_nothing() {
        let buf = render(&ChartView::default(), 10, 4);
        assert_eq!(buf[(0, 0)].symbol(), " ");
        let view = view_of(&[r#"{"author":"A"}"#]);
        let buf = render(&view, 2, 1);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}
