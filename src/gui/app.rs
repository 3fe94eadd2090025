//! Main GUI application module
//!
//! Contains the GuiApp struct: it owns the headless `TransactionsScreen`,
//! runs its effects as background jobs and feeds the results back each frame.

use crate::{
    api::{ApiError, HttpTransactionsApi},
    config::Config,
    operation_log,
    screen::{perform, Applied, Command, Dispatch, Effect, Event, Outcome, ScreenError, TransactionsScreen},
    session::UserSession,
    types::TransactionId,
    user_settings::UserSettings,
};
use anyhow::{anyhow, Result};
use eframe::{egui, egui::RichText, App, Frame, NativeOptions};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::async_job::{spawn_job, AsyncJob};
use super::notifications::{
    outcome_notification, push_notification, rejection_notification, NotificationEntry,
};
use super::theme::{configure_style, AppTheme};
use super::views::settings::SettingsFormState;
use super::widgets::PullToRefresh;

/// GUI section enum for navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuiSection {
    Transactions,
    Settings,
}

/// An effect running on a background job
struct PendingEffect {
    effect: Effect,
    job: AsyncJob<Event>,
}

pub struct GuiApp {
    pub(crate) config: Config,
    pub(crate) user_settings: UserSettings,
    pub(crate) theme: AppTheme,
    pub(crate) section: GuiSection,
    pub(crate) notifications: VecDeque<NotificationEntry>,
    pub(crate) show_notifications_popup: bool,
    pub(crate) last_seen_notifications: usize,
    // Backend connection, None until configuration is valid
    pub(crate) api: Option<Arc<HttpTransactionsApi>>,
    pub(crate) session: Option<UserSession>,
    pub(crate) setup_error: Option<String>,
    // Screen state and the effects it is waiting on
    pub(crate) screen: TransactionsScreen,
    jobs: Vec<PendingEffect>,
    pub(crate) pull: PullToRefresh,
    mounted: bool,
    last_auto_refresh: Instant,
    pub(crate) settings_form: SettingsFormState,
}

impl GuiApp {
    fn new(config: Config, ctx: &egui::Context) -> Self {
        let theme = AppTheme::default();
        configure_style(ctx, &theme);

        let user_settings = UserSettings::load();
        let mut config = config;
        config.apply_settings(&user_settings);
        let settings_form = SettingsFormState::from_config(&config, &user_settings);

        let mut app = Self {
            config,
            user_settings,
            theme,
            section: GuiSection::Transactions,
            notifications: VecDeque::with_capacity(20),
            show_notifications_popup: false,
            last_seen_notifications: 0,
            api: None,
            session: None,
            setup_error: None,
            screen: TransactionsScreen::new(),
            jobs: Vec::new(),
            pull: PullToRefresh::default(),
            mounted: false,
            last_auto_refresh: Instant::now(),
            settings_form,
        };
        app.connect();
        if app.setup_error.is_some() {
            app.section = GuiSection::Settings;
        }
        app
    }

    /// (Re)build the API client and session from the current configuration.
    ///
    /// A successful connect resets the screen so the list is loaded again.
    pub(crate) fn connect(&mut self) {
        let mut config = self.config.clone();
        let connected = config
            .validate()
            .map_err(|e| e.to_string())
            .and_then(|_| {
                let api = HttpTransactionsApi::from_config(&config).map_err(|e| e.to_string())?;
                let session = UserSession::from_config(&config).map_err(|e| e.to_string())?;
                Ok((api, session))
            });

        match connected {
            Ok((api, session)) => {
                self.abandon_running_refunds();
                tracing::info!(api_url = %config.api_url, user_id = %session.user_id(), "Connected to transactions API");
                self.config = config;
                self.api = Some(Arc::new(api));
                self.session = Some(session);
                self.setup_error = None;
                self.screen = TransactionsScreen::new();
                self.jobs.clear();
                self.mounted = false;
            }
            Err(e) => {
                tracing::warn!("Cannot connect: {}", e);
                self.api = None;
                self.session = None;
                self.setup_error = Some(e);
            }
        }
    }

    /// Send a command to the screen and start whatever work it asks for
    pub(crate) fn dispatch(&mut self, command: Command) {
        match self.screen.dispatch(command) {
            Dispatch::Run(effect) => self.spawn_effect(effect),
            Dispatch::Rejected(e) => {
                tracing::info!("Command {:?} rejected: {}", command, e);
                push_notification(&mut self.notifications, rejection_notification(&e));
            }
        }
    }

    fn spawn_effect(&mut self, effect: Effect) {
        let (api, session) = match (self.api.clone(), self.session.clone()) {
            (Some(api), Some(session)) => (api, session),
            _ => {
                // Settle right away so the screen never waits on work that cannot start
                let event = Event::failed(effect, ApiError::Request("Not connected to a backend".to_string()));
                let applied = self.screen.apply(event);
                self.handle_applied(applied);
                return;
            }
        };
        let job = spawn_job(move || async move { Ok(perform(api.as_ref(), &session, effect).await) });
        self.jobs.push(PendingEffect { effect, job });
    }

    fn poll_jobs(&mut self) {
        let mut finished = Vec::new();
        self.jobs.retain_mut(|pending| match pending.job.poll() {
            Some(Ok(event)) => {
                finished.push(event);
                false
            }
            Some(Err(e)) => {
                finished.push(Event::failed(pending.effect, ApiError::Worker(e.to_string())));
                false
            }
            None => true,
        });

        for event in finished {
            let applied = self.screen.apply(event);
            self.handle_applied(applied);
        }

        // Periodic refresh, if enabled
        let interval = self.user_settings.auto_refresh_secs;
        if interval > 0
            && self.api.is_some()
            && !self.screen.is_loading()
            && self.last_auto_refresh.elapsed().as_secs() >= interval
        {
            self.last_auto_refresh = Instant::now();
            self.dispatch(Command::Load);
        }
    }

    fn handle_applied(&mut self, applied: Applied) {
        self.log_refund_outcome(&applied.outcome);
        if let Some(entry) = outcome_notification(&applied.outcome) {
            push_notification(&mut self.notifications, entry);
        }
        if let Some(effect) = applied.follow_up {
            self.spawn_effect(effect);
        }
    }

    fn log_refund_outcome(&self, outcome: &Outcome) {
        let user_id = self
            .session
            .as_ref()
            .map(|s| s.user_id().to_string())
            .unwrap_or_default();
        let result = match outcome {
            Outcome::Refunded { id } => {
                let amount = self
                    .screen
                    .transactions()
                    .iter()
                    .find(|tx| tx.id == *id)
                    .map(|tx| super::helpers::TransactionRow::from(tx).total_line)
                    .unwrap_or_default();
                operation_log::append_log(
                    "Refund",
                    &user_id,
                    format!("Transaction #{} refunded\n{}\nAPI: {}", id, amount, self.config.api_url),
                )
            }
            Outcome::RefundFailed(ScreenError::Refund { id, source }) => operation_log::append_log(
                "Refund FAILED",
                &user_id,
                format!("Transaction #{}\nError: {}\nAPI: {}", id, source, self.config.api_url),
            ),
            _ => return,
        };
        if let Err(e) = result {
            tracing::warn!("Failed to write operation log: {}", e);
        }
    }

    /// Record refunds whose result will never be seen after a reconnect.
    ///
    /// The server may still apply them, so each one gets an audit entry.
    fn abandon_running_refunds(&mut self) {
        let user_id = self
            .session
            .as_ref()
            .map(|s| s.user_id().to_string())
            .unwrap_or_default();
        for id in running_refunds(&self.jobs) {
            tracing::warn!(transaction_id = id, "Reconnecting while a refund is still in flight");
            if let Err(e) = operation_log::append_log(
                "Refund ABANDONED",
                &user_id,
                abandoned_refund_details(id, &self.config.api_url),
            ) {
                tracing::warn!("Failed to write operation log: {}", e);
            }
            push_notification(
                &mut self.notifications,
                NotificationEntry::error(format!(
                    "[!!] Refund of transaction #{} was still running when the connection changed; check it on the server",
                    id
                )),
            );
        }
    }

    pub(crate) fn has_running_jobs(&self) -> bool {
        self.jobs.iter().any(|p| p.job.is_running())
    }

    fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing_sm);
        ui.horizontal(|ui| {
            ui.label(RichText::new("TxDesk").size(20.0).strong().color(self.theme.primary));
            ui.label(
                RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                    .size(12.0)
                    .color(self.theme.text_secondary),
            );
            ui.separator();
            ui.selectable_value(&mut self.section, GuiSection::Transactions, "Transactions");
            ui.selectable_value(&mut self.section, GuiSection::Settings, "Settings");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let unread = self.notifications.len().saturating_sub(self.last_seen_notifications);
                let label = if unread > 0 {
                    format!("Notifications ({})", unread)
                } else {
                    "Notifications".to_string()
                };
                if ui.button(label).clicked() {
                    self.show_notifications_popup = !self.show_notifications_popup;
                    self.last_seen_notifications = self.notifications.len();
                }
                if let Some(session) = &self.session {
                    ui.label(
                        RichText::new(format!("User {}", session.user_id()))
                            .color(self.theme.text_secondary),
                    );
                }
            });
        });
        ui.add_space(self.theme.spacing_sm);
    }

    fn render_notifications_popup(&mut self, ctx: &egui::Context) {
        let theme = self.theme;
        let notifications = &self.notifications;
        let mut clear = false;
        egui::Window::new("Notifications")
            .open(&mut self.show_notifications_popup)
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                if notifications.is_empty() {
                    ui.label(RichText::new("Nothing yet.").color(theme.text_secondary));
                    return;
                }
                egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                    for entry in notifications.iter().rev() {
                        let color = if entry.is_error { theme.error } else { theme.text_primary };
                        ui.horizontal_wrapped(|ui| {
                            ui.label(RichText::new(entry.time_ago()).small().color(theme.text_secondary));
                            ui.label(RichText::new(&entry.message).color(color));
                        });
                    }
                });
                ui.separator();
                if ui.button("Clear").clicked() {
                    clear = true;
                }
            });
        if clear {
            self.notifications.clear();
            self.last_seen_notifications = 0;
        }
    }
}

/// Transactions whose refund job has not reported back yet
fn running_refunds(jobs: &[PendingEffect]) -> Vec<TransactionId> {
    jobs.iter()
        .filter(|pending| pending.job.is_running())
        .filter_map(|pending| match pending.effect {
            Effect::Refund { id, .. } => Some(id),
            Effect::Fetch { .. } => None,
        })
        .collect()
}

fn abandoned_refund_details(id: TransactionId, api_url: &str) -> String {
    format!("Transaction #{}\nOutcome unknown: connection replaced before the server replied\nAPI: {}", id, api_url)
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_jobs();

        // Initial load once the screen has a backend
        if !self.mounted && self.api.is_some() {
            self.mounted = true;
            self.last_auto_refresh = Instant::now();
            self.dispatch(Command::Load);
        }

        if ctx.input(|i| i.key_pressed(egui::Key::F5)) && self.api.is_some() {
            self.dispatch(Command::Refresh);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.render_top_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.section {
            GuiSection::Transactions => self.view_transactions(ui),
            GuiSection::Settings => self.view_settings(ui),
        });

        if self.show_notifications_popup {
            self.render_notifications_popup(ctx);
        }

        // Keep polling while work is outstanding
        if self.has_running_jobs() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else if self.user_settings.auto_refresh_secs > 0 {
            ctx.request_repaint_after(Duration::from_secs(1));
        }
    }
}

pub fn launch(config: Config) -> Result<()> {
    let app_creator = move |cc: &eframe::CreationContext<'_>| {
        Box::new(GuiApp::new(config.clone(), &cc.egui_ctx)) as Box<dyn App>
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([480.0, 760.0])
        .with_min_inner_size([360.0, 480.0]);

    let native_options = NativeOptions {
        viewport,
        // Enable window state persistence (size, position)
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native("TxDesk - Transactions", native_options, Box::new(app_creator))
        .map_err(|e| anyhow!("Failed to start GUI: {}", e))
}
