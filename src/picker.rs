//! Interactive candidate picker as an explicit state machine.
//!
//! `Idle -> Showing -> Filtering -> Showing -> { Accepted | Dismissed }`
//!
//! The picker owns the full candidate list for its whole session; each query
//! change re-runs [`filter::refine`] over that list without fetching again.

use crate::filter;
use crate::search::Candidate;

/// Where the picker is in its lifecycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PickerPhase {
    #[default]
    Idle,
    Showing,
    /// The query changed and the visible list is stale.
    Filtering,
    Accepted,
    Dismissed,
}

/// How a picker session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Accepted(Candidate),
    Dismissed,
}

/// Picker state: the fetched candidates, the query being typed, and the
/// ranked subset currently on screen.
#[derive(Debug, Clone)]
pub struct Picker {
    pub title: String,
    pub case_sensitive: bool,
    pub query: String,
    /// Byte offset of the cursor in `query`.
    pub cursor_position: usize,
    pub selected_index: usize,
    pub visible: Vec<Candidate>,
    candidates: Vec<Candidate>,
    phase: PickerPhase,
    accepted: Option<Candidate>,
}

impl Picker {
    pub fn new(title: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            title: title.into(),
            case_sensitive,
            query: String::new(),
            cursor_position: 0,
            selected_index: 0,
            visible: Vec::new(),
            candidates: Vec::new(),
            phase: PickerPhase::Idle,
            accepted: None,
        }
    }

    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    /// Number of candidates before filtering.
    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the session has reached `Accepted` or `Dismissed`.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, PickerPhase::Accepted | PickerPhase::Dismissed)
    }

    fn is_open(&self) -> bool {
        matches!(self.phase, PickerPhase::Showing | PickerPhase::Filtering)
    }

    /// `Idle -> Showing`: take the candidate list for this session.
    pub fn show(&mut self, candidates: Vec<Candidate>) {
        if self.phase != PickerPhase::Idle {
            return;
        }
        self.candidates = candidates;
        self.phase = PickerPhase::Filtering;
        self.apply_filter();
    }

    /// Replace the whole query, as when it is given up front.
    pub fn set_query(&mut self, query: impl Into<String>) {
        if self.is_finished() {
            return;
        }
        self.query = query.into();
        self.cursor_position = self.query.len();
        self.query_changed();
    }

    /// `Filtering -> Showing`: recompute the visible list for the query.
    pub fn apply_filter(&mut self) {
        if self.phase != PickerPhase::Filtering {
            return;
        }
        self.visible = filter::refine(&self.candidates, &self.query, self.case_sensitive);
        self.selected_index = 0;
        self.phase = PickerPhase::Showing;
    }

    fn query_changed(&mut self) {
        if self.phase == PickerPhase::Idle {
            return;
        }
        self.phase = PickerPhase::Filtering;
        self.apply_filter();
    }

    /// Insert a character at the current cursor position.
    pub fn input_char(&mut self, c: char) {
        if !self.is_open() {
            return;
        }
        self.query.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
        self.query_changed();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        if !self.is_open() || self.cursor_position == 0 {
            return;
        }
        if let Some(prev) = self.query[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
            self.query.remove(self.cursor_position);
            self.query_changed();
        }
    }

    /// Move cursor left by one character.
    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.query[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn move_cursor_right(&mut self) {
        if let Some(next) = self.query[self.cursor_position..].chars().next() {
            self.cursor_position += next.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.query.len();
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.visible.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.visible.get(self.selected_index)
    }

    /// `Showing -> Accepted` with the selected candidate. No-op while
    /// nothing is visible.
    pub fn accept(&mut self) {
        if !self.is_open() {
            return;
        }
        if let Some(choice) = self.selected().cloned() {
            self.accepted = Some(choice);
            self.phase = PickerPhase::Accepted;
        }
    }

    /// Close without a choice. Valid from any non-terminal phase.
    pub fn dismiss(&mut self) {
        if !self.is_finished() {
            self.phase = PickerPhase::Dismissed;
        }
    }

    /// The final outcome, once the session has ended.
    pub fn outcome(&self) -> Option<PickerOutcome> {
        match self.phase {
            PickerPhase::Accepted => self.accepted.clone().map(PickerOutcome::Accepted),
            PickerPhase::Dismissed => Some(PickerOutcome::Dismissed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn candidate(label: &str) -> Candidate {
        Candidate::new(
            PathBuf::from(format!("/w/{}/index.ts", label)),
            label,
            format!("{}/index.ts", label),
        )
    }

    fn open_picker() -> Picker {
        let mut picker = Picker::new("Index Files", false);
        picker.show(vec![
            candidate("utils"),
            candidate("components"),
            candidate("api"),
        ]);
        picker
    }

    fn visible_labels(picker: &Picker) -> Vec<&str> {
        picker.visible.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn starts_idle() {
        let picker = Picker::new("t", false);
        assert_eq!(picker.phase(), PickerPhase::Idle);
        assert!(picker.outcome().is_none());
    }

    #[test]
    fn show_ranks_candidates() {
        let picker = open_picker();
        assert_eq!(picker.phase(), PickerPhase::Showing);
        assert_eq!(visible_labels(&picker), vec!["api", "components", "utils"]);
        assert_eq!(picker.total(), 3);
    }

    #[test]
    fn typing_filters_and_returns_to_showing() {
        let mut picker = open_picker();
        picker.input_char('u');
        picker.input_char('t');
        assert_eq!(picker.phase(), PickerPhase::Showing);
        assert_eq!(picker.query, "ut");
        assert_eq!(visible_labels(&picker), vec!["utils"]);
    }

    #[test]
    fn backspace_widens_the_list() {
        let mut picker = open_picker();
        picker.set_query("pi");
        assert_eq!(visible_labels(&picker), vec!["api"]);
        picker.delete_char();
        assert_eq!(picker.query, "p");
        assert_eq!(visible_labels(&picker), vec!["api", "components"]);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut picker = open_picker();
        picker.delete_char();
        assert!(picker.query.is_empty());
        assert_eq!(picker.cursor_position, 0);
    }

    #[test]
    fn cursor_movement_respects_bounds() {
        let mut picker = open_picker();
        picker.move_cursor_left();
        assert_eq!(picker.cursor_position, 0);
        picker.input_char('a');
        picker.input_char('é');
        picker.move_cursor_left();
        assert_eq!(picker.cursor_position, 1);
        picker.move_cursor_right();
        assert_eq!(picker.cursor_position, 3);
        picker.move_cursor_right();
        assert_eq!(picker.cursor_position, 3);
        picker.cursor_home();
        assert_eq!(picker.cursor_position, 0);
        picker.cursor_end();
        assert_eq!(picker.cursor_position, 3);
    }

    #[test]
    fn query_change_resets_selection() {
        let mut picker = open_picker();
        picker.select_next();
        picker.select_next();
        assert_eq!(picker.selected_index, 2);
        picker.input_char('i');
        assert_eq!(picker.selected_index, 0);
    }

    #[test]
    fn selection_clamps() {
        let mut picker = open_picker();
        picker.select_previous();
        assert_eq!(picker.selected_index, 0);
        for _ in 0..10 {
            picker.select_next();
        }
        assert_eq!(picker.selected_index, 2);
    }

    #[test]
    fn accept_yields_selected_candidate() {
        let mut picker = open_picker();
        picker.select_next();
        picker.accept();
        assert_eq!(picker.phase(), PickerPhase::Accepted);
        assert_eq!(
            picker.outcome(),
            Some(PickerOutcome::Accepted(candidate("components")))
        );
    }

    #[test]
    fn accept_with_nothing_visible_is_noop() {
        let mut picker = open_picker();
        picker.set_query("zzz");
        assert!(picker.visible.is_empty());
        picker.accept();
        assert_eq!(picker.phase(), PickerPhase::Showing);
    }

    #[test]
    fn dismiss_is_terminal() {
        let mut picker = open_picker();
        picker.dismiss();
        assert_eq!(picker.outcome(), Some(PickerOutcome::Dismissed));
        picker.input_char('x');
        picker.accept();
        assert!(picker.query.is_empty());
        assert_eq!(picker.outcome(), Some(PickerOutcome::Dismissed));
    }

    #[test]
    fn query_set_before_show_applies_on_show() {
        let mut picker = Picker::new("t", false);
        picker.set_query("co");
        assert_eq!(picker.phase(), PickerPhase::Idle);
        picker.show(vec![candidate("api"), candidate("components")]);
        assert_eq!(visible_labels(&picker), vec!["components"]);
    }

    #[test]
    fn case_sensitive_picker() {
        let mut picker = Picker::new("t", true);
        picker.show(vec![candidate("Api"), candidate("api")]);
        picker.set_query("A");
        assert_eq!(visible_labels(&picker), vec!["Api"]);
    }
}
