use ratatui::Frame;

use crate::components::picker::PickerWidget;
use crate::picker::Picker;

/// Render the picker session.
pub fn render(picker: &Picker, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(PickerWidget::new(picker), area);
}
