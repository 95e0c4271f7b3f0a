//! Main application for the arena GUI

use std::sync::Arc;

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, ScrollArea, SidePanel, TopBottomPanel};

use crate::board::{GlobalPos, Mark};
use crate::engine::Difficulty;
use crate::game::{Outcome, PowerUpKind};

use super::board_view::{BoardMarkers, BoardView};
use super::game_state::Session;
use super::theme::*;

/// Main arena application
pub struct HyperspaceApp {
    session: Session,
    labels: Vec<String>,
    board_views: Vec<BoardView>,
    show_debug: bool,
}

impl HyperspaceApp {
    /// `labels` names the boards in registry order
    pub fn new(_cc: &eframe::CreationContext<'_>, session: Session, labels: Vec<String>) -> Self {
        let board_views = (0..session.game.registry().board_count())
            .map(|id| BoardView::new(id as u8))
            .collect();
        Self {
            session,
            labels,
            board_views,
            show_debug: true,
        }
    }

    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game (N)").clicked() {
                        self.session.reset();
                        ui.close_menu();
                    }
                    if ui.button("Undo (U)").clicked() {
                        self.session.undo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "AI Debug (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new("HYPER-SPACE").strong().color(SHOP_ACCENT));
                });
            });
        });
    }

    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(260.0)
            .max_width(300.0)
            .frame(Frame::new().fill(PANEL_BG).inner_margin(8.0))
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(8.0);
                    self.render_status_card(ui);
                    ui.add_space(10.0);
                    self.render_settings_card(ui);
                    ui.add_space(10.0);
                    self.render_shop_card(ui);

                    if self.show_debug {
                        ui.add_space(10.0);
                        self.render_debug_card(ui);
                    }

                    if self.session.game.is_over() {
                        ui.add_space(10.0);
                        self.render_game_over_card(ui);
                    }

                    if let Some(notice) = &self.session.notice {
                        ui.add_space(10.0);
                        Self::render_notice_card(ui, &notice.text);
                    }
                });
            });
    }

    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn mark_color(mark: Mark) -> egui::Color32 {
        match mark {
            Mark::X => X_MARK,
            Mark::O => O_MARK,
            Mark::Empty => TEXT_MUTED,
        }
    }

    /// Credits, score and whose turn it is
    fn render_status_card(&self, ui: &mut egui::Ui) {
        let game = &self.session.game;
        Self::card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new("CREDITS").size(10.0).color(TEXT_MUTED));
                    ui.label(
                        RichText::new(format!("{}", game.wallet()))
                            .size(26.0)
                            .strong()
                            .color(CREDITS),
                    );
                });
                ui.add_space(16.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new("SCORE").size(10.0).color(TEXT_MUTED));
                    ui.label(
                        RichText::new(format!("{}", game.score()))
                            .size(26.0)
                            .strong()
                            .color(TEXT_PRIMARY),
                    );
                });
            });

            ui.add_space(8.0);
            let current = game.current_player();
            ui.horizontal(|ui| {
                ui.label(RichText::new("ACTIVE").size(10.0).color(TEXT_MUTED));
                ui.label(
                    RichText::new(format!("P_{current}"))
                        .size(16.0)
                        .strong()
                        .color(Self::mark_color(current)),
                );
            });

            let (status, color) = if game.is_over() {
                ("CORE OFFLINE".to_string(), TEXT_SECONDARY)
            } else if let Some(progress) = self.session.thinking_progress() {
                (format!("AI COMPUTING {:.0}%", progress * 100.0), STATUS_THINKING)
            } else if let Some(kind) = self.session.armed {
                (
                    format!(
                        "{} TARGETS {}/{}",
                        kind.to_string().to_uppercase(),
                        self.session.targets.len(),
                        kind.targets()
                    ),
                    SHOP_ACCENT,
                )
            } else {
                ("CORE READY".to_string(), STATUS_READY)
            };
            ui.label(RichText::new(status).size(12.0).color(color));
            ui.label(
                RichText::new(format!("Move #{}", game.history().len()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// Difficulty, testing mode and undo
    fn render_settings_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("SETTINGS").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let mut difficulty = self.session.game.difficulty();
            egui::ComboBox::from_label("AI")
                .selected_text(difficulty.label())
                .show_ui(ui, |ui| {
                    for d in Difficulty::ALL {
                        ui.selectable_value(&mut difficulty, d, d.label());
                    }
                });
            if difficulty != self.session.game.difficulty() {
                self.session.game.set_difficulty(difficulty);
            }

            let mut testing = self.session.game.testing_mode();
            if ui.checkbox(&mut testing, "Testing mode (control both sides)").changed() {
                self.session.game.set_testing_mode(testing);
            }

            ui.add_space(6.0);
            let undo_cost = self.session.game.economy().undo_cost;
            if ui.button(format!("Undo  -{undo_cost} cr")).clicked() {
                self.session.undo();
            }
        });
    }

    fn render_shop_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("POWER-UP SHOP").size(10.0).color(SHOP_ACCENT));
            ui.add_space(6.0);

            let costs = self.session.game.economy().costs.clone();
            let wallet = self.session.game.wallet();
            for kind in PowerUpKind::ALL {
                let cost = kind.cost(&costs);
                let armed = self.session.armed == Some(kind);
                ui.horizontal(|ui| {
                    let label = RichText::new(kind.to_string().to_uppercase()).strong().color(
                        if wallet >= cost {
                            TEXT_PRIMARY
                        } else {
                            TEXT_MUTED
                        },
                    );
                    if ui.selectable_label(armed, label).clicked() {
                        if armed {
                            self.session.cancel_power_up();
                        } else {
                            self.session.select_power_up(kind);
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(format!("{cost} cr")).size(11.0).color(CREDITS));
                    });
                });
                ui.label(RichText::new(kind.description()).size(10.0).color(TEXT_SECONDARY));
                ui.add_space(4.0);
            }
        });
    }

    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let Some(result) = &self.session.last_ai_result else {
                ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                return;
            };
            ui.label(
                RichText::new(format!("{} / {:?}", result.difficulty.label(), result.kind))
                    .size(11.0)
                    .strong()
                    .color(STATUS_READY),
            );
            ui.label(
                RichText::new(format!(
                    "Score: {}  {} nodes  {}ms",
                    result.score, result.nodes, result.time_ms
                ))
                .size(10.0)
                .color(TEXT_SECONDARY),
            );
            ui.label(
                RichText::new(format!("-> {}", Self::describe(result.best_move)))
                    .size(12.0)
                    .strong()
                    .color(WIN_HIGHLIGHT),
            );
        });
    }

    fn describe(pos: GlobalPos) -> String {
        format!("B{} L{} ({},{})", pos.board + 1, pos.z + 1, pos.x, pos.y)
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui) {
        let (headline, color) = match self.session.game.outcome() {
            Outcome::Won(mark) => (format!("P_{mark} DOMINATES"), Self::mark_color(mark)),
            _ => ("STALEMATE".to_string(), TEXT_PRIMARY),
        };

        Frame::new()
            .fill(GAME_OVER_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(TEXT_SECONDARY));
                    ui.add_space(6.0);
                    ui.label(RichText::new(headline).size(20.0).strong().color(color));
                    ui.add_space(10.0);
                    if ui.button(RichText::new("REBOOT ARENA").strong()).clicked() {
                        self.session.reset();
                    }
                });
            });
    }

    fn render_notice_card(ui: &mut egui::Ui, text: &str) {
        Frame::new()
            .fill(NOTICE_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(text).size(11.0).strong().color(TEXT_PRIMARY));
            });
    }

    fn render_boards(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(Frame::new().fill(BOARD_BG).inner_margin(8.0))
            .show(ctx, |ui| {
                let blocked = self.session.game.blocked_cells();
                let winning = self.session.game.winning_cells().clone();
                let markers = BoardMarkers {
                    blocked: &blocked,
                    winning: &winning,
                    selected: &self.session.targets,
                    peek: self.session.peeked,
                };
                let interactive = self.session.game.is_human_turn() && !self.session.is_ai_thinking();
                let registry = Arc::clone(self.session.game.registry());

                let mut clicked = None;
                ScrollArea::vertical().show(ui, |ui| {
                    for (id, view) in self.board_views.iter_mut().enumerate() {
                        let (Some(board), Some(topology)) = (
                            self.session.game.occupancy().board(id as u8),
                            registry.topology(id as u8),
                        ) else {
                            continue;
                        };
                        let label = self
                            .labels
                            .get(id)
                            .cloned()
                            .unwrap_or_else(|| format!("BOARD {}", id + 1));
                        ui.label(RichText::new(label).size(13.0).strong().color(TEXT_PRIMARY));
                        if let Some(pos) = view.show(ui, board, topology, &markers, interactive) {
                            clicked = Some(pos);
                        }
                        ui.add_space(12.0);
                    }
                });

                if let Some(pos) = clicked {
                    self.session.click(pos);
                }
            });
    }

    fn handle_input(&mut self, ctx: &Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::D) {
                self.show_debug = !self.show_debug;
            }
            if i.key_pressed(egui::Key::U) {
                self.session.undo();
            }
            if i.key_pressed(egui::Key::N) {
                self.session.reset();
            }
            if i.key_pressed(egui::Key::Escape) {
                self.session.cancel_power_up();
            }
        });
    }
}

impl eframe::App for HyperspaceApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.session.tick();

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_boards(ctx);

        if self.session.is_ai_thinking() || self.session.notice.is_some() {
            ctx.request_repaint();
        }
    }
}
