//! Main application UI.
//! Handles the catalog browser, the learning screen, spaced-repetition review and settings.
//! All progress changes go through the ledger; the UI only reads its snapshot.

use crate::clock::SimulatedClock;
use crate::export::json::{export_progress_to_path, import_catalog, import_progress};
use crate::ledger::ProgressLedger;
use crate::models::{AnswerChoice, Catalog, ReviewSession, SettingsPatch, Video};
use eframe::egui;
use std::cell::Cell;
use std::rc::Rc;

/// Application screen states
#[derive(Default, Clone, Copy, PartialEq)]
enum AppScreen {
    #[default]
    Home,
    Learning {
        year: u32,
        index: usize,
    },
    Review,
    Settings,
}

/// Answer picked on the learning screen, before and after confirming it.
#[derive(Default)]
struct AnswerDraft {
    selected: Option<AnswerChoice>,
    confirmed: Option<bool>,
}

pub struct StudyApp {
    ledger: ProgressLedger,
    catalog: Catalog,
    clock: Rc<SimulatedClock>,
    /// Set by the ledger subscription, cleared once the UI has caught up.
    state_changed: Rc<Cell<bool>>,

    current_screen: AppScreen,
    draft: AnswerDraft,
    review_session: Option<ReviewSession>,

    show_result_dialog: bool,
    result_message: String,
}

impl eframe::App for StudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state_changed.replace(false) {
            self.apply_theme(ctx);
        }

        match self.current_screen {
            AppScreen::Home => self.render_home_screen(ctx),
            AppScreen::Learning { year, index } => self.render_learning_screen(ctx, year, index),
            AppScreen::Review => self.render_review_screen(ctx),
            AppScreen::Settings => self.render_settings_screen(ctx),
        }

        if self.show_result_dialog {
            egui::Window::new("Import/Export Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl StudyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut ledger: ProgressLedger,
        catalog: Catalog,
        clock: Rc<SimulatedClock>,
    ) -> Self {
        let state_changed = Rc::new(Cell::new(true));
        {
            let state_changed = Rc::clone(&state_changed);
            let ctx = cc.egui_ctx.clone();
            ledger.subscribe(move |_| {
                state_changed.set(true);
                ctx.request_repaint();
            });
        }

        Self {
            ledger,
            catalog,
            clock,
            state_changed,
            current_screen: AppScreen::Home,
            draft: AnswerDraft::default(),
            review_session: None,
            show_result_dialog: false,
            result_message: String::new(),
        }
    }

    fn apply_theme(&self, ctx: &egui::Context) {
        if self.ledger.snapshot().settings.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
    }

    fn open_video(&mut self, year: u32, index: usize) {
        self.current_screen = AppScreen::Learning { year, index };
        self.draft = AnswerDraft::default();
    }

    fn show_message(&mut self, message: String) {
        self.result_message = message;
        self.show_result_dialog = true;
    }

    /// Renders the home screen: today's goal, streak and the catalog by year
    fn render_home_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.ledger.today().format("%Y-%m-%d").to_string());
                if ui.button("Next Day").clicked() {
                    self.clock.advance_day();
                }
                if self.clock.offset_days() > 0 {
                    ui.label(format!("(+{} simulated)", self.clock.offset_days()));
                }
            });
            ui.separator();

            let today = self.ledger.today_progress();
            let fraction = if today.goal == 0 {
                1.0
            } else {
                (today.completed as f32 / today.goal as f32).min(1.0)
            };
            ui.heading("Today");
            ui.add(
                egui::ProgressBar::new(fraction)
                    .text(format!("{} / {} videos", today.completed, today.goal)),
            );
            ui.label(format!(
                "Streak: {} day(s) (best {})",
                self.ledger.streak(),
                self.ledger.longest_streak()
            ));
            ui.label(format!(
                "Completed: {} / {}",
                self.ledger.completed_count(),
                self.catalog.total_videos()
            ));

            let due = self.ledger.due_reviews();
            let weak = self.ledger.wrong_answers().len();
            let mut action_review = false;
            let mut action_settings = false;
            let mut action_random = false;
            ui.horizontal(|ui| {
                if ui.button(format!("Review ({} due)", due.len())).clicked() {
                    action_review = true;
                }
                if ui.button("Random").clicked() {
                    action_random = true;
                }
                ui.label(format!("Weak points: {}", weak));
                if ui.button("Settings").clicked() {
                    action_settings = true;
                }
            });

            ui.horizontal(|ui| {
                if ui.button("Import Catalog").clicked() {
                    self.handle_import_catalog();
                }
                if ui.button("Export Progress").clicked() {
                    self.handle_export_progress();
                }
                if ui.button("Import Progress").clicked() {
                    self.handle_import_progress();
                }
            });

            ui.separator();
            ui.heading(format!("Lessons ({} years)", self.catalog.years.len()));

            // We store actions to execute after UI rendering to avoid borrowing conflicts
            let mut action_open: Option<(u32, usize)> = None;
            let state = self.ledger.snapshot();

            egui::ScrollArea::vertical()
                .id_source("lessons_list")
                .show(ui, |ui| {
                    for year in &self.catalog.years {
                        let done = year
                            .videos
                            .iter()
                            .filter(|v| {
                                state
                                    .video_progress
                                    .get(&v.youtube_id)
                                    .map(|p| p.completed)
                                    .unwrap_or(false)
                            })
                            .count();

                        egui::CollapsingHeader::new(format!(
                            "{} ({} / {})",
                            year.year,
                            done,
                            year.videos.len()
                        ))
                        .id_source(year.year)
                        .show(ui, |ui| {
                            for (i, video) in year.videos.iter().enumerate() {
                                let completed = state
                                    .video_progress
                                    .get(&video.youtube_id)
                                    .map(|p| p.completed)
                                    .unwrap_or(false);
                                let mark = if completed { "✔" } else { " " };
                                let star = if state.favorites.contains(&video.youtube_id) {
                                    " ★"
                                } else {
                                    ""
                                };
                                let label =
                                    format!("{} {}. {}{}", mark, i + 1, video.video_title, star);
                                if ui.selectable_label(false, label).clicked() {
                                    action_open = Some((year.year, i + 1));
                                }
                            }
                        });
                    }
                });

            // Execute deferred actions
            if action_random {
                action_open = self.catalog.random_video(&mut rand::thread_rng());
                if action_open.is_none() {
                    self.show_message("The catalog has no videos yet.".to_string());
                }
            }
            if let Some((year, index)) = action_open {
                self.open_video(year, index);
            }
            if action_review {
                self.start_review_session();
            }
            if action_settings {
                self.current_screen = AppScreen::Settings;
            }
        });
    }

    /// Renders one video with its question
    fn render_learning_screen(&mut self, ctx: &egui::Context, year: u32, index: usize) {
        let Some(video) = self.catalog.video(year, index).cloned() else {
            self.current_screen = AppScreen::Home;
            return;
        };
        let year_len = self
            .catalog
            .year(year)
            .map(|y| y.videos.len())
            .unwrap_or(0);
        let progress = self.ledger.progress_for(&video.youtube_id);
        let is_favorite = self.ledger.is_favorite(&video.youtube_id);

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut action_back = false;
            let mut action_favorite = false;
            let mut action_watched = false;
            let mut action_confirm: Option<(AnswerChoice, bool)> = None;
            let mut action_move: Option<usize> = None;

            ui.horizontal(|ui| {
                if ui.button("⬅ Back").clicked() {
                    action_back = true;
                }
                ui.heading(format!("{} · Question {}", year, index));
                let star = if is_favorite { "★ Favorite" } else { "☆ Favorite" };
                if ui.button(star).clicked() {
                    action_favorite = true;
                }
            });
            ui.separator();

            ui.label(egui::RichText::new(&video.video_title).strong());
            ui.hyperlink_to("Watch on YouTube", video.youtube_link());
            ui.label(format!(
                "Length: {}:{:02} · playback speed {}x",
                video.duration_seconds / 60,
                video.duration_seconds % 60,
                self.ledger.snapshot().settings.playback_speed
            ));

            if progress.completed {
                ui.label("Watched ✔");
            } else if ui.button("Mark as watched").clicked() {
                action_watched = true;
            }

            ui.add_space(20.0);

            if let Some(question) = &video.question {
                ui.group(|ui| {
                    ui.label(&question.question_text);
                    ui.add_space(10.0);

                    let locked = self.draft.confirmed.is_some();
                    for choice in AnswerChoice::ALL {
                        let text = format!("({}) {}", choice, question.options.get(choice));
                        let selected = self.draft.selected == Some(choice);
                        if ui.selectable_label(selected, text).clicked() && !locked {
                            self.draft.selected = Some(choice);
                        }
                    }

                    ui.add_space(10.0);
                    match self.draft.confirmed {
                        None => {
                            let ready = self.draft.selected.is_some();
                            if ui.add_enabled(ready, egui::Button::new("Confirm")).clicked() {
                                if let Some(choice) = self.draft.selected {
                                    action_confirm = Some((choice, question.is_correct(choice)));
                                }
                            }
                            if let Some(previous) = progress.answer_selected {
                                ui.label(format!("Last time you chose ({})", previous));
                            }
                        }
                        Some(true) => {
                            ui.colored_label(egui::Color32::from_rgb(40, 160, 60), "Correct!");
                        }
                        Some(false) => {
                            let key = question
                                .correct_answer
                                .map(|c| c.to_string())
                                .unwrap_or_else(|| "?".to_string());
                            ui.colored_label(
                                egui::Color32::from_rgb(200, 50, 50),
                                format!("Not quite, the answer is ({})", key),
                            );
                        }
                    }
                });
            } else {
                ui.label("This video has no question.");
            }

            ui.add_space(20.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(index > 1, egui::Button::new("◀ Previous")).clicked() {
                    action_move = Some(index - 1);
                }
                ui.label(format!("{} / {}", index, year_len));
                if ui
                    .add_enabled(index < year_len, egui::Button::new("Next ▶"))
                    .clicked()
                {
                    action_move = Some(index + 1);
                }
            });

            // Execute deferred actions
            if action_favorite {
                self.ledger.toggle_favorite(&video.youtube_id);
            }
            if action_watched {
                self.ledger.mark_item_watched(&video.youtube_id);
            }
            if let Some((choice, correct)) = action_confirm {
                self.record_answer(&video, choice, correct);
            }
            if let Some(next) = action_move {
                self.open_video(year, next);
            }
            if action_back {
                self.current_screen = AppScreen::Home;
            }
        });
    }

    /// Answering a question also counts the video as watched
    fn record_answer(&mut self, video: &Video, choice: AnswerChoice, correct: bool) {
        self.ledger.record_answer(&video.youtube_id, choice, correct);
        self.ledger.mark_item_watched(&video.youtube_id);
        self.draft.confirmed = Some(correct);
    }

    /// Renders the review session and the list of wrongly answered questions
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut action_back = false;
            let mut action_grade: Option<u8> = None;
            let mut action_toggle = false;
            let mut action_open: Option<(u32, usize)> = None;

            if ui.button("⬅ Back").clicked() {
                action_back = true;
            }
            ui.heading("Review");

            match &self.review_session {
                Some(session) if !session.is_completed() => {
                    ui.label(session.phase_message());
                    ui.label(format!(
                        "Progress: {} / {} recalled ({} remaining)",
                        session.passed_count(),
                        session.total_count(),
                        session.remaining_count()
                    ));
                    ui.add_space(10.0);

                    if let Some(item) = session.current_item() {
                        let video = self.catalog.find(&item.item_id);
                        ui.group(|ui| {
                            ui.set_min_height(120.0);
                            ui.vertical_centered(|ui| {
                                let title = video
                                    .map(|v| v.video_title.as_str())
                                    .unwrap_or(item.item_id.as_str());
                                ui.heading(title);
                                let question = video.and_then(|v| v.question.as_ref());
                                if let Some(question) = question {
                                    ui.label(&question.question_text);
                                    if session.show_answer {
                                        let key = question
                                            .correct_answer
                                            .map(|c| {
                                                format!("({}) {}", c, question.options.get(c))
                                            })
                                            .unwrap_or_else(|| "no answer key".to_string());
                                        ui.label(format!("Answer: {}", key));
                                    }
                                }
                            });
                        });

                        if !session.show_answer {
                            if ui.button("Show Answer").clicked() {
                                action_toggle = true;
                            }
                        } else {
                            ui.label("Rate your recall:");
                            ui.horizontal(|ui| {
                                for (quality, label) in
                                    [(0, "0 - Blackout"), (1, "1 - Wrong"), (2, "2 - Wrong (familiar)")]
                                {
                                    if ui.button(label).clicked() {
                                        action_grade = Some(quality);
                                    }
                                }
                            });
                            ui.horizontal(|ui| {
                                for (quality, label) in
                                    [(3, "3 - Difficult"), (4, "4 - Correct"), (5, "5 - Perfect")]
                                {
                                    if ui.button(label).clicked() {
                                        action_grade = Some(quality);
                                    }
                                }
                            });
                        }
                    }
                }
                Some(_) => {
                    ui.label("All due lessons reviewed. Come back tomorrow!");
                }
                None => {
                    ui.label("Nothing is due for review today.");
                }
            }

            ui.separator();
            ui.heading("Weak points");
            let wrong = self
                .catalog
                .wrong_answers(&self.ledger.snapshot().video_progress);
            if self.ledger.answered_count() == 0 {
                ui.label("No questions answered yet.");
            } else if wrong.is_empty() {
                ui.label("Every answered question is correct. Keep it up!");
            } else {
                ui.label(format!("{} question(s) answered wrong", wrong.len()));
                egui::ScrollArea::vertical()
                    .id_source("weak_points")
                    .max_height(200.0)
                    .show(ui, |ui| {
                        for item in &wrong {
                            let last = item
                                .answer_selected
                                .map(|c| format!(" · last chose ({})", c))
                                .unwrap_or_default();
                            let label =
                                format!("{} · Question {}{}", item.year, item.index, last);
                            if ui.selectable_label(false, label).clicked() {
                                action_open = Some((item.year, item.index));
                            }
                        }
                    });
            }

            // Execute deferred actions
            if action_toggle {
                if let Some(session) = &mut self.review_session {
                    session.toggle_answer();
                }
            }
            if let Some(quality) = action_grade {
                if let Some(session) = &mut self.review_session {
                    if let Err(e) = session.grade_current(&mut self.ledger, quality) {
                        log::error!("Failed to grade review item: {}", e);
                    }
                    session.next_item();
                }
            }
            if let Some((year, index)) = action_open {
                self.open_video(year, index);
            }
            if action_back {
                self.current_screen = AppScreen::Home;
                self.review_session = None;
            }
        });
    }

    fn render_settings_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("⬅ Back").clicked() {
                self.current_screen = AppScreen::Home;
            }
            ui.heading("Settings");
            ui.separator();

            let settings = self.ledger.snapshot().settings.clone();

            let mut goal = self.ledger.snapshot().daily_goal;
            if ui
                .add(egui::Slider::new(&mut goal, 1..=50).text("videos per day"))
                .changed()
            {
                self.ledger.set_daily_goal(goal);
            }

            let mut dark_mode = settings.dark_mode;
            if ui.checkbox(&mut dark_mode, "Dark mode").changed() {
                self.ledger.update_settings(SettingsPatch {
                    dark_mode: Some(dark_mode),
                    ..Default::default()
                });
            }

            let mut speed = settings.playback_speed;
            if ui
                .add(
                    egui::Slider::new(&mut speed, 0.5..=2.0)
                        .step_by(0.25)
                        .text("playback speed"),
                )
                .changed()
            {
                self.ledger.update_settings(SettingsPatch {
                    playback_speed: Some(speed),
                    ..Default::default()
                });
            }
        });
    }

    /// Starts a review session with the lessons due today
    fn start_review_session(&mut self) {
        let due = self.ledger.due_reviews();
        log::info!("Starting review with {} due item(s)", due.len());
        self.review_session = if due.is_empty() {
            None
        } else {
            Some(ReviewSession::from_due_cards(due))
        };
        self.current_screen = AppScreen::Review;
    }

    fn handle_import_catalog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            match import_catalog(&path) {
                Ok(catalog) => {
                    let message = format!(
                        "Catalog loaded: {} years, {} videos",
                        catalog.years.len(),
                        catalog.total_videos()
                    );
                    self.catalog = catalog;
                    self.show_message(message);
                }
                Err(e) => self.show_message(format!("Import failed: {}", e)),
            }
        }
    }

    fn handle_export_progress(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("progress.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            match export_progress_to_path(self.ledger.snapshot(), &path) {
                Ok(()) => self.show_message("Progress exported successfully!".to_string()),
                Err(e) => self.show_message(format!("Export failed: {}", e)),
            }
        }
    }

    fn handle_import_progress(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            match import_progress(&path) {
                Ok(state) => {
                    let items = state.video_progress.len();
                    self.ledger.replace_state(state);
                    self.review_session = None;
                    self.show_message(format!("Progress restored ({} lessons)", items));
                }
                Err(e) => self.show_message(format!("Import failed: {}", e)),
            }
        }
    }
}
