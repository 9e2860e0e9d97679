use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::filter;
use crate::picker::Picker;

/// Candidate picker widget: query line, match count, ranked results.
pub struct PickerWidget<'a> {
    picker: &'a Picker,
}

impl<'a> PickerWidget<'a> {
    pub fn new(picker: &'a Picker) -> Self {
        Self { picker }
    }

    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(x, y, w, h)
    }
}

impl<'a> Widget for PickerWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 5 || area.width < 20 {
            return;
        }

        let dialog_width = (area.width * 80 / 100).clamp(30, 120);
        let dialog_height = (area.height * 80 / 100).clamp(8, 40);
        let rect = Self::centered_rect(dialog_width, dialog_height, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(format!(" {} ", self.picker.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // Row 0: query input with cursor
        let query = &self.picker.query;
        let cursor_pos = self.picker.cursor_position;

        let (before, cursor_char, after) = match query[cursor_pos..].chars().next() {
            Some(ch) => {
                let end = cursor_pos + ch.len_utf8();
                (&query[..cursor_pos], &query[cursor_pos..end], &query[end..])
            }
            None => (query.as_str(), " ", ""),
        };

        let input_style = Style::default().fg(Color::White);
        let cursor_style = Style::default()
            .bg(Color::White)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD);
        let prompt_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let input_line = Line::from(vec![
            Span::styled("> ", prompt_style),
            Span::styled(before, input_style),
            Span::styled(cursor_char, cursor_style),
            Span::styled(after, input_style),
        ]);
        buf.set_line(inner.x, inner.y, &input_line, inner.width);

        // Row 1: separator + match count
        if inner.height > 1 {
            let count_str = format!(
                "{} of {}",
                self.picker.visible.len(),
                self.picker.total()
            );
            let sep_line = Line::from(Span::styled(
                format!("─── {} ", count_str),
                Style::default().fg(Color::DarkGray),
            ));
            buf.set_line(inner.x, inner.y + 1, &sep_line, inner.width);
        }

        // Row 2+: results, leaving the last row for the hint
        let results_start = 2u16;
        let hint_rows = if inner.height > 3 { 1 } else { 0 };
        let visible_rows = inner.height.saturating_sub(results_start + hint_rows) as usize;

        let selected = self.picker.selected_index;
        let scroll = if selected >= visible_rows {
            selected - visible_rows + 1
        } else {
            0
        };

        let base_style = Style::default().fg(Color::Gray);
        let selected_style = Style::default().fg(Color::White);
        let highlight_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let detail_style = Style::default().fg(Color::DarkGray);

        for (i, candidate) in self
            .picker
            .visible
            .iter()
            .skip(scroll)
            .take(visible_rows)
            .enumerate()
        {
            let row = inner.y + results_start + i as u16;
            let is_selected = i + scroll == selected;

            let mut spans = Vec::new();
            if is_selected {
                spans.push(Span::styled(
                    "▸ ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw("  "));
            }

            let label_style = if is_selected { selected_style } else { base_style };
            let matched: HashSet<usize> = filter::match_indices(
                &candidate.label,
                &self.picker.query,
                self.picker.case_sensitive,
            )
            .into_iter()
            .collect();

            // Group consecutive chars sharing a style into one span
            let mut current_text = String::new();
            let mut current_highlighted = false;
            for (ci, ch) in candidate.label.chars().enumerate() {
                let is_match = matched.contains(&ci);
                if is_match != current_highlighted && !current_text.is_empty() {
                    let style = if current_highlighted {
                        highlight_style
                    } else {
                        label_style
                    };
                    spans.push(Span::styled(std::mem::take(&mut current_text), style));
                }
                current_highlighted = is_match;
                current_text.push(ch);
            }
            if !current_text.is_empty() {
                let style = if current_highlighted {
                    highlight_style
                } else {
                    label_style
                };
                spans.push(Span::styled(current_text, style));
            }

            spans.push(Span::styled(format!("  {}", candidate.detail), detail_style));

            buf.set_line(inner.x, row, &Line::from(spans), inner.width);
        }

        if hint_rows > 0 {
            let hint = "[Enter] Open  [Esc] Close  [↑↓] Navigate";
            let hint_style = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM);
            let hint_line = Line::from(Span::styled(hint, hint_style));
            buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Candidate;
    use std::path::PathBuf;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    fn picker() -> Picker {
        let mut picker = Picker::new("Index Files", false);
        picker.show(vec![
            Candidate::new(
                PathBuf::from("/w/src/components/index.tsx"),
                "components",
                "src/components/index.tsx",
            ),
            Candidate::new(PathBuf::from("/w/src/index.ts"), "src", "src/index.ts"),
        ]);
        picker
    }

    fn render(picker: &Picker, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        PickerWidget::new(picker).render(area, &mut buf);
        buffer_to_string(&buf, area)
    }

    #[test]
    fn test_title_and_count_render() {
        let content = render(&picker(), 80, 24);
        assert!(content.contains("Index Files"));
        assert!(content.contains("2 of 2"));
    }

    #[test]
    fn test_results_show_label_and_detail() {
        let content = render(&picker(), 80, 24);
        assert!(content.contains("components"));
        assert!(content.contains("src/components/index.tsx"));
        assert!(content.contains("src/index.ts"));
    }

    #[test]
    fn test_filtered_count() {
        let mut picker = picker();
        picker.set_query("cmp");
        let content = render(&picker, 80, 24);
        assert!(content.contains("1 of 2"));
        assert!(!content.contains("src/index.ts "));
    }

    #[test]
    fn test_selection_indicator() {
        let mut picker = picker();
        picker.select_next();
        let content = render(&picker, 80, 24);
        assert!(content.contains("▸"));
    }

    #[test]
    fn test_cursor_inside_multibyte_query() {
        let mut picker = picker();
        picker.set_query("äb");
        picker.cursor_home();
        render(&picker, 80, 24);
    }

    #[test]
    fn test_small_area_no_panic() {
        render(&picker(), 10, 3);
        render(&picker(), 20, 5);
    }
}
