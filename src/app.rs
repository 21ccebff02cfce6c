//! Main application UI.
//! A thin caller over the flashcard engine: browsing and editing cards, and study sessions.

use eframe::egui;
use flashcard_engine::export::{export_json_to_path, import_json};
use flashcard_engine::{
    CardFilter, CardId, CardStore, Category, Difficulty, Flashcard, NewCard, RateOutcome, Rating,
    SessionRunner, Stats,
};
use log::error;
use std::sync::{Arc, Mutex, MutexGuard};

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Study,
}

/// Card form contents, shared by "create" and "edit"
struct CardForm {
    front: String,
    back: String,
    category: Category,
    difficulty: Difficulty,
    tags: String,
    editing: Option<CardId>,
}

impl Default for CardForm {
    fn default() -> Self {
        Self {
            front: String::new(),
            back: String::new(),
            category: Category::General,
            difficulty: Difficulty::Medium,
            tags: String::new(),
            editing: None,
        }
    }
}

impl CardForm {
    fn from_card(card: &Flashcard) -> Self {
        Self {
            front: card.front.clone(),
            back: card.back.clone(),
            category: card.category,
            difficulty: card.difficulty,
            tags: card.tags.join(", "),
            editing: Some(card.id),
        }
    }

    fn to_new_card(&self) -> NewCard {
        NewCard::new(
            self.front.clone(),
            self.back.clone(),
            self.category.to_string(),
            self.difficulty.to_string(),
        )
        .with_tags(self.tags.split(','))
    }
}

/// Actions collected while drawing, executed afterwards to avoid borrowing conflicts
enum CardAction {
    Edit(CardId),
    Delete(CardId),
}

enum StudyAction {
    Reveal,
    Rate(Rating),
    Previous,
    Next,
    End,
    Back,
}

/// Main application state
pub struct MyApp {
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    store: Arc<Mutex<CardStore>>,
    session_seed: Option<u64>,

    current_screen: AppScreen,
    runner: Option<SessionRunner>,

    filter: CardFilter,
    form: CardForm,

    show_message_dialog: bool,
    message: String,
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Study => self.render_study_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_message_dialog {
            egui::Window::new("Flashcards")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_message_dialog = false;
                    }
                });
        }
    }
}

impl MyApp {
    pub fn new(store: CardStore, session_seed: Option<u64>) -> Self {
        Self {
            show_confirmation_dialog: false,
            allowed_to_close: false,
            store: Arc::new(Mutex::new(store)),
            session_seed,
            current_screen: AppScreen::Main,
            runner: None,
            filter: CardFilter::default(),
            form: CardForm::default(),
            show_message_dialog: false,
            message: String::new(),
        }
    }

    fn lock_store(store: &Arc<Mutex<CardStore>>) -> MutexGuard<'_, CardStore> {
        store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn show_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.show_message_dialog = true;
    }

    /// Renders the main screen: statistics, filters, card form and card list
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        let mut action_card: Option<CardAction> = None;
        let mut action_submit = false;
        let mut action_cancel_edit = false;
        let mut action_study = false;
        let mut action_export = false;
        let mut action_import = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let store = Self::lock_store(&self.store);
            let stats = Stats::compute(store.all());

            ui.heading("Interview Flashcards");
            ui.label(format!(
                "Cards: {}   Reviewed: {} ({:.0}%)   Mastered: {} ({:.0}%)   Avg confidence: {:.1}",
                stats.total_cards,
                stats.reviewed_cards,
                stats.review_coverage() * 100.0,
                stats.mastered_cards,
                stats.mastery_rate() * 100.0,
                stats.average_confidence
            ));
            ui.horizontal_wrapped(|ui| {
                for (category, entry) in &stats.by_category {
                    if entry.total > 0 {
                        ui.label(format!("{}: {}/{}", category, entry.mastered, entry.total));
                    }
                }
            });

            ui.horizontal(|ui| {
                if ui.button("Export Cards").clicked() {
                    action_export = true;
                }
                if ui.button("Import Cards").clicked() {
                    action_import = true;
                }
            });

            ui.separator();

            // Filters
            ui.horizontal(|ui| {
                egui::ComboBox::from_label("Category")
                    .selected_text(self.filter.category.map_or("all", |c| c.as_str()))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.filter.category, None, "all");
                        for category in Category::ALL {
                            ui.selectable_value(
                                &mut self.filter.category,
                                Some(category),
                                category.as_str(),
                            );
                        }
                    });
                egui::ComboBox::from_label("Difficulty")
                    .selected_text(self.filter.difficulty.map_or("all", |d| d.as_str()))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.filter.difficulty, None, "all");
                        for difficulty in Difficulty::ALL {
                            ui.selectable_value(
                                &mut self.filter.difficulty,
                                Some(difficulty),
                                difficulty.as_str(),
                            );
                        }
                    });
            });
            ui.horizontal(|ui| {
                ui.label("Search:");
                ui.text_edit_singleline(&mut self.filter.search);
            });

            let visible = self.filter.apply(store.all());

            if ui
                .add_enabled(
                    !visible.is_empty(),
                    egui::Button::new(format!("Study {} cards", visible.len())),
                )
                .clicked()
            {
                action_study = true;
            }

            ui.separator();

            // Card form
            if self.form.editing.is_some() {
                ui.heading("Edit Card");
            } else {
                ui.heading("New Card");
            }
            ui.horizontal(|ui| {
                ui.label("Question:");
                ui.text_edit_multiline(&mut self.form.front);
            });
            ui.horizontal(|ui| {
                ui.label("Answer:");
                ui.text_edit_multiline(&mut self.form.back);
            });
            ui.horizontal(|ui| {
                egui::ComboBox::from_label("Card category")
                    .selected_text(self.form.category.as_str())
                    .show_ui(ui, |ui| {
                        for category in Category::ALL {
                            ui.selectable_value(&mut self.form.category, category, category.as_str());
                        }
                    });
                egui::ComboBox::from_label("Card difficulty")
                    .selected_text(self.form.difficulty.as_str())
                    .show_ui(ui, |ui| {
                        for difficulty in Difficulty::ALL {
                            ui.selectable_value(
                                &mut self.form.difficulty,
                                difficulty,
                                difficulty.as_str(),
                            );
                        }
                    });
            });
            ui.horizontal(|ui| {
                ui.label("Tags (comma separated):");
                ui.text_edit_singleline(&mut self.form.tags);
            });
            ui.horizontal(|ui| {
                let label = if self.form.editing.is_some() {
                    "Save Changes"
                } else {
                    "Add Card"
                };
                if ui.button(label).clicked() {
                    action_submit = true;
                }
                if self.form.editing.is_some() && ui.button("Cancel").clicked() {
                    action_cancel_edit = true;
                }
            });

            ui.separator();

            ui.heading(format!("Cards ({} of {})", visible.len(), store.len()));

            egui::ScrollArea::vertical()
                .id_source("cards_list")
                .max_height(300.0)
                .show(ui, |ui| {
                    for (i, card) in visible.iter().enumerate() {
                        ui.group(|ui| {
                            ui.label(format!("{}. {}", i + 1, card.front));
                            ui.label(format!("   {}", card.back));
                            let accuracy = card
                                .accuracy()
                                .map_or("n/a".to_string(), |a| format!("{:.0}%", a * 100.0));
                            ui.label(format!(
                                "   {} · {} · confidence: {} · reviews: {} · accuracy: {}",
                                card.category,
                                card.difficulty,
                                card.confidence_label(),
                                card.review_count,
                                accuracy
                            ));
                            if !card.tags.is_empty() {
                                ui.label(format!("   tags: {}", card.tags.join(", ")));
                            }
                            ui.horizontal(|ui| {
                                if ui.button("Edit").clicked() {
                                    action_card = Some(CardAction::Edit(card.id));
                                }
                                if ui.button("Delete").clicked() {
                                    action_card = Some(CardAction::Delete(card.id));
                                }
                            });
                        });
                    }
                });
        });

        // Execute deferred actions
        if action_submit {
            self.submit_form();
        }
        if action_cancel_edit {
            self.form = CardForm::default();
        }
        match action_card {
            Some(CardAction::Edit(id)) => {
                let store = Self::lock_store(&self.store);
                if let Some(card) = store.find(id) {
                    self.form = CardForm::from_card(card);
                }
            }
            Some(CardAction::Delete(id)) => self.delete_card(id),
            None => {}
        }
        if action_study {
            self.start_study_session();
        }
        if action_export {
            self.handle_export();
        }
        if action_import {
            self.handle_import();
        }
    }

    /// Renders the study screen: one card at a time, reveal then rate
    fn render_study_screen(&mut self, ctx: &egui::Context) {
        let mut action: Option<StudyAction> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(runner) = &mut self.runner else {
                action = Some(StudyAction::Back);
                return;
            };
            let store = Self::lock_store(&self.store);

            // cards deleted since the session started are skipped before display
            while !runner.is_completed() && runner.current_card(&store).is_none() {
                if runner.skip_stale(&store).is_err() {
                    break;
                }
            }

            ui.heading("Study Session");
            ui.add(egui::ProgressBar::new(runner.progress()).show_percentage());

            let summary = runner.summary();
            if runner.is_completed() {
                ui.add_space(20.0);
                ui.heading("Session complete!");
                ui.label(format!(
                    "Rated {} of {} cards, {} correct",
                    summary.rated, summary.total, summary.correct
                ));
                if summary.skipped > 0 {
                    ui.label(format!("{} deleted cards were skipped", summary.skipped));
                }
                ui.add_space(20.0);
                if ui.button("Back to Main Screen").clicked() {
                    action = Some(StudyAction::Back);
                }
                return;
            }

            ui.label(format!(
                "Card {} of {}",
                runner.cursor() + 1,
                runner.session().len()
            ));

            let Some(card) = runner.current_card(&store) else {
                return;
            };

            ui.group(|ui| {
                ui.set_min_height(200.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.label(format!("{} · {}", card.category, card.difficulty));
                    ui.heading(&card.front);
                    ui.add_space(20.0);

                    if runner.revealed() {
                        ui.label(&card.back);
                    } else {
                        ui.label("(Click 'Show Answer' to reveal)");
                    }
                    ui.add_space(20.0);
                });
            });

            ui.add_space(20.0);

            if runner.revealed() {
                ui.label("How well did you know it?");
                ui.horizontal(|ui| {
                    for rating in Rating::ALL {
                        if ui
                            .button(format!("{} - {}", rating.value(), rating.label()))
                            .clicked()
                        {
                            action = Some(StudyAction::Rate(rating));
                        }
                    }
                });
            } else if ui.button("Show Answer").clicked() {
                action = Some(StudyAction::Reveal);
            }

            ui.add_space(20.0);

            ui.horizontal(|ui| {
                if ui.button("Previous").clicked() {
                    action = Some(StudyAction::Previous);
                }
                if ui.button("Next").clicked() {
                    action = Some(StudyAction::Next);
                }
                if ui.button("End Session").clicked() {
                    action = Some(StudyAction::End);
                }
            });
        });

        if let Some(action) = action {
            self.handle_study_action(action);
        }
    }

    fn handle_study_action(&mut self, action: StudyAction) {
        if let StudyAction::Back = action {
            self.runner = None;
            self.current_screen = AppScreen::Main;
            return;
        }
        let Some(runner) = &mut self.runner else {
            return;
        };

        let result = match action {
            StudyAction::Reveal => runner.reveal(),
            StudyAction::Rate(rating) => {
                let mut store = Self::lock_store(&self.store);
                runner.rate(&mut store, rating).map(|outcome| {
                    if let RateOutcome::Skipped(stale) = outcome {
                        log::warn!("{}", stale);
                    }
                })
            }
            StudyAction::Previous => runner.previous(),
            StudyAction::Next => runner.next(),
            StudyAction::End => {
                runner.end();
                Ok(())
            }
            StudyAction::Back => Ok(()),
        };

        if let Err(e) = result {
            error!("Study action failed: {}", e);
            self.show_message(format!("Could not save your answer: {}", e));
        }
    }

    /// Starts a study session over the currently visible cards
    fn start_study_session(&mut self) {
        let started = {
            let store = Self::lock_store(&self.store);
            SessionRunner::start(self.filter.apply(store.all()), self.session_seed)
        };
        match started {
            Ok(runner) => {
                self.runner = Some(runner);
                self.current_screen = AppScreen::Study;
            }
            Err(e) => self.show_message(format!("Cannot start a session: {}", e)),
        }
    }

    fn submit_form(&mut self) {
        let input = self.form.to_new_card();
        let result = {
            let mut store = Self::lock_store(&self.store);
            match self.form.editing {
                Some(id) => store.edit(id, input),
                None => store.create(input),
            }
        };
        match result {
            Ok(_) => self.form = CardForm::default(),
            Err(e) => self.show_message(e.to_string()),
        }
    }

    fn delete_card(&mut self, id: CardId) {
        let result = Self::lock_store(&self.store).delete(id);
        match result {
            Ok(_) => {
                if self.form.editing == Some(id) {
                    self.form = CardForm::default();
                }
            }
            Err(e) => self.show_message(format!("Delete failed: {}", e)),
        }
    }

    /// Handles card export to a JSON file
    fn handle_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("flashcards.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        let result = {
            let store = Self::lock_store(&self.store);
            export_json_to_path(store.all(), &path).map(|_| store.len())
        };
        match result {
            Ok(count) => self.show_message(format!("Exported {} cards.", count)),
            Err(e) => self.show_message(format!("Export failed: {}", e)),
        }
    }

    /// Handles card import from a JSON file
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let result = import_json(&path)
            .map_err(|e| e.to_string())
            .and_then(|cards| {
                let total = cards.len();
                Self::lock_store(&self.store)
                    .import(cards)
                    .map(|added| (added, total))
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok((added, total)) => self.show_message(format!(
                "Imported {} of {} cards ({} already present).",
                added,
                total,
                total - added
            )),
            Err(e) => self.show_message(format!(
                "Import failed: {}\n\nThe file should contain a card list exported by this app.",
                e
            )),
        }
    }
}
