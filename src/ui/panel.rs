//! Debug panel binding parameter entries to imgui widgets.
//!
//! The panel owns the entries' current values. Drawing routes imgui's
//! "value changed" and "deactivated after edit" signals through
//! [`ParameterPanel::edit`], which enforces ranges and decides from each
//! entry's [`Notify`] mode whether a [`ParamChange`] is reported.

use std::fmt;

use imgui::Condition;

use super::params::{EditPhase, Notify, ParamChange, ParamValue, ParameterEntry, Widget};

pub struct ParameterPanel<K> {
    title: String,
    width: f32,
    entries: Vec<ParameterEntry<K>>,
    visible: bool,
    start_collapsed: bool,
}

impl<K: Copy + PartialEq + fmt::Debug> ParameterPanel<K> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 300.0,
            entries: Vec::new(),
            visible: true,
            start_collapsed: true,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_start_collapsed(&mut self, collapsed: bool) {
        self.start_collapsed = collapsed;
    }

    /// Registers an entry. A second entry with the same key replaces the first.
    pub fn add(&mut self, entry: ParameterEntry<K>) -> &mut Self {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == entry.key) {
            log::warn!("Replacing panel entry {:?}", entry.key);
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
        self
    }

    pub fn entries(&self) -> &[ParameterEntry<K>] {
        &self.entries
    }

    pub fn entry(&self, key: K) -> Option<&ParameterEntry<K>> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn value(&self, key: K) -> Option<&ParamValue> {
        self.entry(key).map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies an edit to the entry for `key`. The value is clamped and
    /// snapped to the widget's range and step; the return value is the change
    /// to report, if the entry's notify mode calls for one at this phase.
    pub fn edit(&mut self, key: K, value: ParamValue, phase: EditPhase) -> Option<ParamChange<K>> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) else {
            log::warn!("Edit for unknown panel entry {:?}", key);
            return None;
        };
        let change = entry.apply(value, phase);
        if let Some(change) = &change {
            log::debug!("{} -> {:?} ({:?})", entry.label, change.value, entry.notify);
        }
        change
    }

    /// Overwrites a value without reporting it, e.g. when the demo changed
    /// the underlying state itself.
    pub fn set_value(&mut self, key: K, value: ParamValue) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            if let Some(value) = entry.widget.constrain(value) {
                entry.committed = value.clone();
                entry.value = value;
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hiding keeps every value; showing again restores the same state.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
        log::debug!("Panel {:?} visible: {}", self.title, self.visible);
    }

    /// Draws the panel and returns the changes to apply, in widget order.
    pub fn draw(&mut self, ui: &imgui::Ui) -> Vec<ParamChange<K>> {
        if !self.visible || self.entries.is_empty() {
            return Vec::new();
        }
        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return Vec::new();
        }

        let mut edits = Vec::new();
        let entries = &self.entries;
        ui.window(&self.title)
            .size([self.width, 0.0], Condition::FirstUseEver)
            .position(
                [display_size[0] - self.width - 15.0, 15.0],
                Condition::FirstUseEver,
            )
            .collapsed(self.start_collapsed, Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                for entry in entries {
                    draw_entry(ui, entry, &mut edits);
                }
            });

        edits
            .into_iter()
            .filter_map(|(key, value, phase)| self.edit(key, value, phase))
            .collect()
    }
}

fn draw_entry<K: Copy>(ui: &imgui::Ui, entry: &ParameterEntry<K>, edits: &mut Vec<(K, ParamValue, EditPhase)>) {
    let key = entry.key;
    let label = entry.label.as_str();
    let mut report = |value: ParamValue, changed: bool, finished: bool| {
        if changed {
            edits.push((key, value.clone(), EditPhase::Changed));
        }
        if finished {
            edits.push((key, value, EditPhase::Finished));
        }
    };

    match (&entry.widget, &entry.value) {
        (Widget::Slider { min, max, step }, ParamValue::Float(current)) => {
            let mut value = *current;
            let format = slider_format(*step);
            let changed = ui
                .slider_config(label, *min, *max)
                .display_format(format.as_str())
                .build(&mut value);
            report(ParamValue::Float(value), changed, ui.is_item_deactivated_after_edit());
        }
        (Widget::IntSlider { min, max, .. }, ParamValue::Int(current)) => {
            let mut value = *current;
            let changed = ui.slider_config(label, *min, *max).build(&mut value);
            report(ParamValue::Int(value), changed, ui.is_item_deactivated_after_edit());
        }
        (Widget::Checkbox, ParamValue::Bool(current)) => {
            let mut value = *current;
            let changed = ui.checkbox(label, &mut value);
            report(ParamValue::Bool(value), changed, changed);
        }
        (Widget::Color, ParamValue::Color(current)) => {
            let mut value = *current;
            let changed = ui.color_edit3(label, &mut value);
            report(ParamValue::Color(value), changed, ui.is_item_deactivated_after_edit());
        }
        (Widget::TextInput, ParamValue::Text(current)) => {
            let mut value = current.clone();
            let entered = ui
                .input_text(label, &mut value)
                .enter_returns_true(true)
                .build();
            let changed = value != *current;
            let finished = entered || ui.is_item_deactivated_after_edit();
            report(ParamValue::Text(value), changed, finished);
        }
        (Widget::Select { options }, ParamValue::Choice(current)) => {
            let mut index = *current;
            let changed = ui.combo_simple_string(label, &mut index, options);
            report(ParamValue::Choice(index), changed, changed);
        }
        (Widget::Button, _) => {
            if ui.button(label) {
                report(ParamValue::Trigger, false, true);
            }
        }
        _ => {}
    }

    if entry.notify == Notify::Commit && ui.is_item_hovered() {
        ui.tooltip_text("applied when the edit finishes");
    }
}

fn slider_format(step: f32) -> String {
    let decimals = if step <= 0.0 {
        3
    } else {
        (-step.log10() - 1e-4).ceil().max(0.0) as usize
    };
    format!("%.{decimals}f")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        Elevation,
        Subdivision,
        Visible,
    }

    fn panel() -> ParameterPanel<Key> {
        let mut panel = ParameterPanel::new("Debug");
        panel
            .add(ParameterEntry::slider(Key::Elevation, "elevation", 0.0, -3.0, 3.0, 0.01))
            .add(ParameterEntry::int_slider(Key::Subdivision, "subdivision", 2, 1, 20).on_commit())
            .add(ParameterEntry::checkbox(Key::Visible, "visible", true));
        panel
    }

    #[test]
    fn test_edit_clamps_to_range() {
        let mut panel = panel();
        let change = panel
            .edit(Key::Elevation, ParamValue::Float(10.0), EditPhase::Changed)
            .unwrap();
        let elevation = change.value.as_f32().unwrap();
        assert!((elevation - 3.0).abs() < 1e-5);
        assert_eq!(panel.value(Key::Elevation), Some(&change.value));
    }

    #[test]
    fn test_commit_entry_ignores_intermediate_values() {
        let mut panel = panel();
        for v in 3..=9 {
            assert!(panel
                .edit(Key::Subdivision, ParamValue::Int(v), EditPhase::Changed)
                .is_none());
        }
        let change = panel
            .edit(Key::Subdivision, ParamValue::Int(9), EditPhase::Finished)
            .unwrap();
        assert_eq!(change.key, Key::Subdivision);
        assert_eq!(change.value, ParamValue::Int(9));
    }

    #[test]
    fn test_hidden_panel_keeps_state() {
        let mut panel = panel();
        panel.edit(Key::Visible, ParamValue::Bool(false), EditPhase::Changed);
        panel.toggle_visible();
        assert!(!panel.is_visible());
        panel.toggle_visible();
        assert!(panel.is_visible());
        assert_eq!(panel.value(Key::Visible), Some(&ParamValue::Bool(false)));
    }

    #[test]
    fn test_duplicate_key_replaces_entry() {
        let mut panel = panel();
        panel.add(ParameterEntry::checkbox(Key::Visible, "shown", false));
        assert_eq!(panel.len(), 3);
        assert_eq!(panel.entry(Key::Visible).unwrap().label, "shown");
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut panel: ParameterPanel<Key> = ParameterPanel::new("Empty");
        assert!(panel
            .edit(Key::Elevation, ParamValue::Float(1.0), EditPhase::Changed)
            .is_none());
    }

    #[test]
    fn test_set_value_does_not_report() {
        let mut panel = panel();
        panel.set_value(Key::Subdivision, ParamValue::Int(5));
        assert!(panel
            .edit(Key::Subdivision, ParamValue::Int(5), EditPhase::Finished)
            .is_none());
    }

    #[test]
    fn test_slider_format_follows_step() {
        assert_eq!(slider_format(0.01), "%.2f");
        assert_eq!(slider_format(0.0001), "%.4f");
        assert_eq!(slider_format(1.0), "%.0f");
    }
}
