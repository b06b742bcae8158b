// SPDX-License-Identifier: MIT OR Apache-2.0
//! UI steps: color, sprite and text changes.

use crate::scene::UiElement;
use crate::step::{StepBehavior, StepContext};

fn ui_mut<'s>(ctx: &'s mut StepContext<'_>, path: &str) -> Option<&'s mut UiElement> {
    let node = ctx.resolve(path)?;
    let ui = ctx.scene.get_mut(node)?.ui.as_mut();
    if ui.is_none() {
        tracing::warn!(path, "Node has no UI element");
    }
    ui
}

/// Changes the color of a UI element
#[derive(Debug, Clone)]
pub struct ColorStep {
    target: String,
    color: [f32; 4],
    prev_color: Option<[f32; 4]>,
}

impl ColorStep {
    /// Create a color step
    pub fn new(target: impl Into<String>, color: [f32; 4]) -> Self {
        Self {
            target: target.into(),
            color,
            prev_color: None,
        }
    }
}

impl StepBehavior for ColorStep {
    fn kind(&self) -> &'static str {
        "Color"
    }

    fn on_start(&mut self, ctx: &mut StepContext<'_>) {
        self.prev_color = ui_mut(ctx, &self.target).map(|ui| ui.color);
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        if let Some(ui) = ui_mut(ctx, &self.target) {
            self.prev_color = Some(ui.color);
            ui.color = self.color;
        }
        ctx.end();
    }

    fn on_restart(&mut self, ctx: &mut StepContext<'_>) {
        let Some(prev) = self.prev_color else {
            return;
        };
        if let Some(ui) = ui_mut(ctx, &self.target) {
            ui.color = prev;
        }
    }
}

/// Changes the sprite of a UI image
#[derive(Debug, Clone)]
pub struct ImageStep {
    target: String,
    sprite: Option<String>,
    prev_sprite: Option<Option<String>>,
}

impl ImageStep {
    /// Create an image step
    pub fn new(target: impl Into<String>, sprite: Option<String>) -> Self {
        Self {
            target: target.into(),
            sprite,
            prev_sprite: None,
        }
    }
}

impl StepBehavior for ImageStep {
    fn kind(&self) -> &'static str {
        "Image"
    }

    fn on_start(&mut self, ctx: &mut StepContext<'_>) {
        self.prev_sprite = ui_mut(ctx, &self.target).map(|ui| ui.sprite.clone());
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        if let Some(ui) = ui_mut(ctx, &self.target) {
            self.prev_sprite = Some(std::mem::replace(&mut ui.sprite, self.sprite.clone()));
        }
        ctx.end();
    }

    fn on_restart(&mut self, ctx: &mut StepContext<'_>) {
        let Some(prev) = self.prev_sprite.clone() else {
            return;
        };
        if let Some(ui) = ui_mut(ctx, &self.target) {
            ui.sprite = prev;
        }
    }
}

/// Replaces or appends to a UI text
#[derive(Debug, Clone)]
pub struct TextStep {
    target: String,
    text: String,
    additive: bool,
    old_text: Option<Option<String>>,
}

impl TextStep {
    /// Create a text step
    pub fn new(target: impl Into<String>, text: impl Into<String>, additive: bool) -> Self {
        Self {
            target: target.into(),
            text: text.into(),
            additive,
            old_text: None,
        }
    }
}

impl StepBehavior for TextStep {
    fn kind(&self) -> &'static str {
        "Text"
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        if let Some(ui) = ui_mut(ctx, &self.target) {
            let next = if self.additive {
                format!("{}{}", ui.text.as_deref().unwrap_or(""), self.text)
            } else {
                self.text.clone()
            };
            self.old_text = Some(ui.text.replace(next));
        }
        ctx.end();
    }

    fn on_restart(&mut self, ctx: &mut StepContext<'_>) {
        let Some(old) = self.old_text.take() else {
            return;
        };
        if let Some(ui) = ui_mut(ctx, &self.target) {
            ui.text = old;
        }
    }
}
