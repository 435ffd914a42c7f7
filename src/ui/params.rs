//! Parameter values, widget constraints and change notifications.
//!
//! Every tunable value a demo exposes is a [`ParameterEntry`]: a key from the
//! demo's own parameter enum, the current value, the widget that edits it and
//! when edits are reported ([`Notify`]).

use std::fmt;

/// A value held by a panel entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    /// sRGB components as shown by the color picker.
    Color([f32; 3]),
    Text(String),
    /// Index into the options of a select widget.
    Choice(usize),
    /// Buttons carry no state; pressing one reports a trigger.
    Trigger,
}

impl ParamValue {
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            ParamValue::Float(v) => Some(v),
            ParamValue::Int(v) => Some(v as f32),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            ParamValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ParamValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<[f32; 3]> {
        match *self {
            ParamValue::Color(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<usize> {
        match *self {
            ParamValue::Choice(v) => Some(v),
            _ => None,
        }
    }
}

/// How an entry is edited, with its range and step where that applies.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Slider { min: f32, max: f32, step: f32 },
    IntSlider { min: i32, max: i32, step: i32 },
    Checkbox,
    Color,
    TextInput,
    Select { options: Vec<String> },
    Button,
}

impl Widget {
    /// Clamps to the range and snaps to the step grid anchored at `min`.
    /// Values of the wrong kind for the widget are rejected.
    pub fn constrain(&self, value: ParamValue) -> Option<ParamValue> {
        match (self, value) {
            (Widget::Slider { min, max, step }, ParamValue::Float(v)) => {
                let mut v = v.clamp(*min, *max);
                if *step > 0.0 {
                    v = (min + ((v - min) / step).round() * step).clamp(*min, *max);
                }
                Some(ParamValue::Float(v))
            }
            (Widget::IntSlider { min, max, step }, ParamValue::Int(v)) => {
                let mut v = v.clamp(*min, *max);
                if *step > 1 {
                    let steps = ((v - min) as f32 / *step as f32).round() as i32;
                    v = (min + steps * step).clamp(*min, *max);
                }
                Some(ParamValue::Int(v))
            }
            (Widget::Checkbox, v @ ParamValue::Bool(_)) => Some(v),
            (Widget::Color, ParamValue::Color(c)) => {
                Some(ParamValue::Color(c.map(|x| x.clamp(0.0, 1.0))))
            }
            (Widget::TextInput, v @ ParamValue::Text(_)) => Some(v),
            (Widget::Select { options }, ParamValue::Choice(i)) => {
                (i < options.len()).then_some(ParamValue::Choice(i))
            }
            (Widget::Button, ParamValue::Trigger) => Some(ParamValue::Trigger),
            _ => None,
        }
    }
}

/// When a widget reports edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notify {
    /// Every intermediate value while the user drags or types.
    Live,
    /// Once, when the edit finishes (release, Enter, focus loss).
    Commit,
}

/// Where an edit is in its gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Changed,
    Finished,
}

/// A reported edit, routed to the owning demo.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamChange<K> {
    pub key: K,
    pub value: ParamValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEntry<K> {
    pub key: K,
    pub label: String,
    pub widget: Widget,
    pub notify: Notify,
    pub value: ParamValue,
    /// Last value reported through a commit.
    pub(crate) committed: ParamValue,
}

impl<K: Copy + fmt::Debug> ParameterEntry<K> {
    fn new(key: K, label: impl Into<String>, widget: Widget, value: ParamValue) -> Self {
        let value = widget.constrain(value.clone()).unwrap_or(value);
        Self {
            key,
            label: label.into(),
            widget,
            notify: Notify::Live,
            committed: value.clone(),
            value,
        }
    }

    pub fn slider(key: K, label: impl Into<String>, value: f32, min: f32, max: f32, step: f32) -> Self {
        Self::new(key, label, Widget::Slider { min, max, step }, ParamValue::Float(value))
    }

    pub fn int_slider(key: K, label: impl Into<String>, value: i32, min: i32, max: i32) -> Self {
        Self::new(
            key,
            label,
            Widget::IntSlider { min, max, step: 1 },
            ParamValue::Int(value),
        )
    }

    pub fn checkbox(key: K, label: impl Into<String>, value: bool) -> Self {
        Self::new(key, label, Widget::Checkbox, ParamValue::Bool(value))
    }

    pub fn color(key: K, label: impl Into<String>, srgb: [f32; 3]) -> Self {
        Self::new(key, label, Widget::Color, ParamValue::Color(srgb))
    }

    pub fn text(key: K, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, label, Widget::TextInput, ParamValue::Text(value.into()))
    }

    pub fn select(key: K, label: impl Into<String>, options: &[&str], selected: usize) -> Self {
        Self::new(
            key,
            label,
            Widget::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
            ParamValue::Choice(selected),
        )
    }

    pub fn button(key: K, label: impl Into<String>) -> Self {
        Self::new(key, label, Widget::Button, ParamValue::Trigger)
    }

    /// Report only finished edits.
    pub fn on_commit(mut self) -> Self {
        self.notify = Notify::Commit;
        self
    }

    /// Stores a constrained value and decides whether the edit is reported.
    pub(crate) fn apply(&mut self, value: ParamValue, phase: EditPhase) -> Option<ParamChange<K>> {
        let Some(value) = self.widget.constrain(value) else {
            log::warn!("Rejected {:?} value for {:?}", self.widget, self.key);
            return None;
        };

        if self.widget == Widget::Button {
            return (phase == EditPhase::Finished).then(|| self.change(ParamValue::Trigger));
        }

        let changed = self.value != value;
        self.value = value;
        match (self.notify, phase) {
            (Notify::Live, EditPhase::Changed) if changed => Some(self.change(self.value.clone())),
            (Notify::Live, EditPhase::Finished) if changed => Some(self.change(self.value.clone())),
            (Notify::Commit, EditPhase::Finished) if self.value != self.committed => {
                self.committed = self.value.clone();
                Some(self.change(self.value.clone()))
            }
            _ => None,
        }
    }

    fn change(&self, value: ParamValue) -> ParamChange<K> {
        ParamChange {
            key: self.key,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_clamps_and_snaps() {
        let widget = Widget::Slider {
            min: -3.0,
            max: 3.0,
            step: 0.5,
        };
        assert_eq!(widget.constrain(ParamValue::Float(9.0)), Some(ParamValue::Float(3.0)));
        assert_eq!(widget.constrain(ParamValue::Float(-7.0)), Some(ParamValue::Float(-3.0)));
        assert_eq!(widget.constrain(ParamValue::Float(1.2)), Some(ParamValue::Float(1.0)));
    }

    #[test]
    fn test_int_slider_clamps() {
        let widget = Widget::IntSlider {
            min: 1,
            max: 20,
            step: 1,
        };
        assert_eq!(widget.constrain(ParamValue::Int(0)), Some(ParamValue::Int(1)));
        assert_eq!(widget.constrain(ParamValue::Int(42)), Some(ParamValue::Int(20)));
    }

    #[test]
    fn test_select_rejects_out_of_range() {
        let widget = Widget::Select {
            options: vec!["a".into(), "b".into()],
        };
        assert_eq!(widget.constrain(ParamValue::Choice(5)), None);
        assert_eq!(widget.constrain(ParamValue::Choice(1)), Some(ParamValue::Choice(1)));
    }

    #[test]
    fn test_mismatched_kind_is_rejected() {
        assert_eq!(Widget::Checkbox.constrain(ParamValue::Float(1.0)), None);
    }

    #[test]
    fn test_live_reports_each_change_once() {
        let mut entry = ParameterEntry::slider('e', "elevation", 0.0, -3.0, 3.0, 0.01);
        assert!(entry.apply(ParamValue::Float(1.0), EditPhase::Changed).is_some());
        assert!(entry.apply(ParamValue::Float(1.0), EditPhase::Changed).is_none());
        assert!(entry.apply(ParamValue::Float(1.0), EditPhase::Finished).is_none());
    }

    #[test]
    fn test_commit_waits_for_finish() {
        let mut entry = ParameterEntry::int_slider('s', "subdivision", 2, 1, 20).on_commit();
        assert!(entry.apply(ParamValue::Int(3), EditPhase::Changed).is_none());
        assert!(entry.apply(ParamValue::Int(4), EditPhase::Changed).is_none());
        assert_eq!(entry.value, ParamValue::Int(4));

        let change = entry.apply(ParamValue::Int(4), EditPhase::Finished).unwrap();
        assert_eq!(change.value, ParamValue::Int(4));
        // Finishing again without a new value reports nothing.
        assert!(entry.apply(ParamValue::Int(4), EditPhase::Finished).is_none());
    }

    #[test]
    fn test_button_fires_on_every_press() {
        let mut entry = ParameterEntry::button('b', "spin");
        assert!(entry.apply(ParamValue::Trigger, EditPhase::Finished).is_some());
        assert!(entry.apply(ParamValue::Trigger, EditPhase::Finished).is_some());
        assert!(entry.apply(ParamValue::Trigger, EditPhase::Changed).is_none());
    }
}
