// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chain panel UI.
//!
//! Features:
//! - Playback toolbar (play, end current step, restart, replay)
//! - Step list with the active step highlighted
//! - Jump to a step by clicking it
//!
//! The panel only reads a [`ChainSnapshot`]. Clicks become [`ChainCommand`]s
//! that the owner applies to the chain.

use crate::chain::StepChain;
use crate::error::Result;
use crate::event::ChainSnapshot;
use crate::scene::Scene;
use crate::step::StepId;
use egui::{Color32, RichText};

/// Background of the active step row
pub const ACTIVE_BACKGROUND: Color32 = Color32::YELLOW;
/// Text color of the active step row
pub const ACTIVE_TEXT: Color32 = Color32::BLACK;

/// Action requested from the chain panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainCommand {
    /// Play from the first step
    Play,
    /// End the current step
    EndCurrent,
    /// Rewind to idle
    Restart,
    /// Rewind and play again
    Replay,
    /// Jump to a step
    GoTo(StepId),
}

impl ChainCommand {
    /// Apply the command to a chain
    pub fn apply(self, chain: &mut StepChain, scene: &mut Scene) -> Result<()> {
        match self {
            ChainCommand::Play => chain.play(scene),
            ChainCommand::EndCurrent => match chain.current_step().map(|s| s.id()) {
                Some(id) => chain.end_step(id, scene),
                None => Ok(()),
            },
            ChainCommand::Restart => chain.restart(scene),
            ChainCommand::Replay => chain.replay(scene),
            ChainCommand::GoTo(id) => chain.go_to_step(id, scene),
        }
    }
}

/// Panel showing a chain's steps and playback controls
#[derive(Debug, Default)]
pub struct ChainPanel {
    /// Show destroyed slots in the list
    pub show_destroyed: bool,
    /// Commands collected since the last [`ChainPanel::take_commands`]
    commands: Vec<ChainCommand>,
}

impl ChainPanel {
    /// Create a new chain panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command as if its control was clicked
    pub fn push_command(&mut self, command: ChainCommand) {
        self.commands.push(command);
    }

    /// Take the queued commands, oldest first
    pub fn take_commands(&mut self) -> Vec<ChainCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Apply queued commands to the chain; stops at the first error
    pub fn apply_commands(&mut self, chain: &mut StepChain, scene: &mut Scene) -> Result<()> {
        for command in self.take_commands() {
            command.apply(chain, scene)?;
        }
        Ok(())
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui, snapshot: &ChainSnapshot) {
        self.render_toolbar(ui, snapshot);
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            if snapshot.steps.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No steps in chain");
                });
                return;
            }

            for (index, slot) in snapshot.steps.iter().enumerate() {
                self.render_row(ui, index, slot.as_ref(), snapshot.current_index);
            }
        });
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui, snapshot: &ChainSnapshot) {
        ui.horizontal(|ui| {
            if ui.button("▶").on_hover_text("Play from the first step").clicked() {
                self.commands.push(ChainCommand::Play);
            }
            if ui
                .add_enabled(snapshot.playing, egui::Button::new("⏭"))
                .on_hover_text("End current step")
                .clicked()
            {
                self.commands.push(ChainCommand::EndCurrent);
            }
            if ui.button("⏹").on_hover_text("Restart (rewind to idle)").clicked() {
                self.commands.push(ChainCommand::Restart);
            }
            if ui.button("⟲").on_hover_text("Replay").clicked() {
                self.commands.push(ChainCommand::Replay);
            }

            ui.separator();
            ui.checkbox(&mut self.show_destroyed, "Show destroyed");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let position = match snapshot.current_index {
                    Some(i) => format!("{}/{}", i + 1, snapshot.steps.len()),
                    None => format!("-/{}", snapshot.steps.len()),
                };
                let status = if snapshot.playing { "Playing" } else { "Idle" };
                ui.label(format!("{} | {status} | {position}", snapshot.name));
            });
        });
    }

    fn render_row(
        &mut self,
        ui: &mut egui::Ui,
        index: usize,
        step: Option<&crate::event::StepView>,
        current: Option<usize>,
    ) {
        let Some(step) = step else {
            if self.show_destroyed {
                ui.weak(format!("{index:>3}  <destroyed>"));
            }
            return;
        };

        ui.horizontal(|ui| {
            ui.monospace(format!("{index:>3}"));

            let mut text = RichText::new(format!("{} ({})", step.name, step.kind));
            if step.active {
                text = text
                    .color(ACTIVE_TEXT)
                    .background_color(ACTIVE_BACKGROUND)
                    .strong()
                    .italics();
            } else if !step.enabled {
                text = text.weak();
            }

            let selected = current == Some(index);
            if ui.selectable_label(selected, text).on_hover_text("Go to step").clicked() {
                self.commands.push(ChainCommand::GoTo(step.id));
            }
        });
    }
}
