// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property drawers for step component fields.

use egui::Ui;

/// Result of drawing a property - indicates if the value was changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawResult {
    /// Value was not modified
    Unchanged,
    /// Value was modified
    Changed,
    /// Text editing ended
    EditEnded,
}

impl DrawResult {
    /// Whether the value changed
    pub fn is_changed(&self) -> bool {
        matches!(self, DrawResult::Changed | DrawResult::EditEnded)
    }

    /// Combine two results, keeping the change
    pub fn or(self, other: DrawResult) -> DrawResult {
        if self.is_changed() {
            self
        } else {
            other
        }
    }
}

/// Metadata about a property for display purposes
#[derive(Debug, Clone, Default)]
pub struct PropertyMeta {
    /// Display name
    pub name: String,
    /// Tooltip
    pub tooltip: Option<String>,
    /// Whether this property is read-only
    pub read_only: bool,
    /// Minimum value (for numeric types)
    pub min: Option<f64>,
    /// Step size for drag values
    pub step: Option<f64>,
    /// Suffix to display (e.g., "s" for seconds)
    pub suffix: Option<String>,
}

impl PropertyMeta {
    /// Create metadata with a display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the tooltip
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Set a lower bound
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the drag step
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Set the suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Mark as read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Draw a f32 value
pub fn draw_f32(ui: &mut Ui, value: &mut f32, meta: &PropertyMeta) -> DrawResult {
    let mut result = DrawResult::Unchanged;

    ui.horizontal(|ui| {
        ui.label(&meta.name);

        let mut drag = egui::DragValue::new(value).speed(meta.step.unwrap_or(0.1));
        if let Some(min) = meta.min {
            drag = drag.range(min as f32..=f32::MAX);
        }
        if let Some(suffix) = &meta.suffix {
            drag = drag.suffix(suffix.as_str());
        }

        let response = ui.add_enabled(!meta.read_only, drag);
        if response.changed() {
            result = DrawResult::Changed;
        }
        if let Some(tooltip) = &meta.tooltip {
            response.on_hover_text(tooltip);
        }
    });

    result
}

/// Draw an i32 value
pub fn draw_i32(ui: &mut Ui, value: &mut i32, meta: &PropertyMeta) -> DrawResult {
    let mut result = DrawResult::Unchanged;

    ui.horizontal(|ui| {
        ui.label(&meta.name);

        let drag = egui::DragValue::new(value).speed(meta.step.unwrap_or(1.0));
        let response = ui.add_enabled(!meta.read_only, drag);
        if response.changed() {
            result = DrawResult::Changed;
        }
        if let Some(tooltip) = &meta.tooltip {
            response.on_hover_text(tooltip);
        }
    });

    result
}

/// Draw a bool value
pub fn draw_bool(ui: &mut Ui, value: &mut bool, meta: &PropertyMeta) -> DrawResult {
    let mut result = DrawResult::Unchanged;

    ui.horizontal(|ui| {
        let response = ui.add_enabled(!meta.read_only, egui::Checkbox::new(value, &meta.name));
        if response.changed() {
            result = DrawResult::Changed;
        }
        if let Some(tooltip) = &meta.tooltip {
            response.on_hover_text(tooltip);
        }
    });

    result
}

/// Draw a String value
pub fn draw_string(ui: &mut Ui, value: &mut String, meta: &PropertyMeta) -> DrawResult {
    let mut result = DrawResult::Unchanged;

    ui.horizontal(|ui| {
        ui.label(&meta.name);

        let response = ui.add_enabled(
            !meta.read_only,
            egui::TextEdit::singleline(value).desired_width(150.0),
        );
        if response.changed() {
            result = DrawResult::Changed;
        }
        if response.lost_focus() {
            result = DrawResult::EditEnded;
        }
        if let Some(tooltip) = &meta.tooltip {
            response.on_hover_text(tooltip);
        }
    });

    result
}

/// Draw an optional String; an empty field means `None`
pub fn draw_optional_string(ui: &mut Ui, value: &mut Option<String>, meta: &PropertyMeta) -> DrawResult {
    let mut text = value.clone().unwrap_or_default();
    let result = draw_string(ui, &mut text, meta);
    if result.is_changed() {
        *value = if text.is_empty() { None } else { Some(text) };
    }
    result
}

/// Draw an RGBA color
pub fn draw_color4(ui: &mut Ui, value: &mut [f32; 4], meta: &PropertyMeta) -> DrawResult {
    let mut result = DrawResult::Unchanged;

    ui.horizontal(|ui| {
        ui.label(&meta.name);

        let mut color = egui::Color32::from_rgba_unmultiplied(
            (value[0] * 255.0) as u8,
            (value[1] * 255.0) as u8,
            (value[2] * 255.0) as u8,
            (value[3] * 255.0) as u8,
        );

        let response = ui.add_enabled_ui(!meta.read_only, |ui| ui.color_edit_button_srgba(&mut color)).inner;
        if response.changed() {
            value[0] = color.r() as f32 / 255.0;
            value[1] = color.g() as f32 / 255.0;
            value[2] = color.b() as f32 / 255.0;
            value[3] = color.a() as f32 / 255.0;
            result = DrawResult::Changed;
        }
        if let Some(tooltip) = &meta.tooltip {
            response.on_hover_text(tooltip);
        }
    });

    result
}

/// Draw an enum as a dropdown
pub fn draw_enum<T: Clone + PartialEq>(
    ui: &mut Ui,
    value: &mut T,
    variants: &[(T, &str)],
    meta: &PropertyMeta,
) -> DrawResult {
    let mut result = DrawResult::Unchanged;

    ui.horizontal(|ui| {
        ui.label(&meta.name);

        let current_name = variants
            .iter()
            .find(|(v, _)| v == value)
            .map_or("Unknown", |(_, name)| *name);

        ui.add_enabled_ui(!meta.read_only, |ui| {
            egui::ComboBox::from_id_salt(&meta.name)
                .selected_text(current_name)
                .show_ui(ui, |ui| {
                    for (variant, name) in variants {
                        if ui.selectable_label(value == variant, *name).clicked() {
                            *value = variant.clone();
                            result = DrawResult::Changed;
                        }
                    }
                });
        });
    });

    result
}

/// Draw a list of strings with add and remove buttons
pub fn draw_string_list(ui: &mut Ui, items: &mut Vec<String>, meta: &PropertyMeta) -> DrawResult {
    let mut result = DrawResult::Unchanged;
    let mut remove_index: Option<usize> = None;

    egui::CollapsingHeader::new(format!("{} ({})", meta.name, items.len()))
        .id_salt(&meta.name)
        .default_open(true)
        .show(ui, |ui| {
            for (i, item) in items.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(format!("[{i}]"));
                    let response = ui.add_enabled(
                        !meta.read_only,
                        egui::TextEdit::singleline(item).desired_width(120.0),
                    );
                    if response.changed() {
                        result = DrawResult::Changed;
                    }
                    if !meta.read_only && ui.small_button("X").on_hover_text("Remove").clicked() {
                        remove_index = Some(i);
                    }
                });
            }

            if !meta.read_only && ui.button("+ Add").clicked() {
                items.push(String::new());
                result = DrawResult::Changed;
            }
        });

    // Apply deferred removal
    if let Some(i) = remove_index {
        items.remove(i);
        result = DrawResult::Changed;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_meta_builder() {
        let meta = PropertyMeta::new("Seconds")
            .with_tooltip("Time to wait")
            .with_min(0.0)
            .with_step(0.05)
            .with_suffix("s");

        assert_eq!(meta.name, "Seconds");
        assert_eq!(meta.tooltip, Some("Time to wait".to_string()));
        assert_eq!(meta.min, Some(0.0));
        assert_eq!(meta.step, Some(0.05));
        assert_eq!(meta.suffix.as_deref(), Some("s"));
        assert!(!meta.read_only);
        assert!(meta.read_only().read_only);
    }

    #[test]
    fn test_draw_result_or_keeps_change() {
        assert_eq!(DrawResult::Unchanged.or(DrawResult::Changed), DrawResult::Changed);
        assert_eq!(DrawResult::EditEnded.or(DrawResult::Unchanged), DrawResult::EditEnded);
        assert!(!DrawResult::Unchanged.or(DrawResult::Unchanged).is_changed());
    }
}
