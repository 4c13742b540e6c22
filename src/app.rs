//! Application state management for the carbon intensity dashboard
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, and state transitions between views.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{error, info};

use crate::cli::StartupConfig;
use crate::data::{load_dashboard, CachedFetcher, ConnectionConfig, Dashboard};

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching data
    Loading,
    /// Both charts are available
    Dashboard,
    /// The last load failed; holds the error message
    Error(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Most recently loaded tables
    pub dashboard: Option<Dashboard>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating a re-query has been requested
    pub refresh_requested: bool,
    /// Flag indicating the cache should be dropped before the next re-query
    pub force_reload: bool,
    /// Timestamp of last successful load
    pub last_refresh: Option<DateTime<Local>>,
    /// Cache lifetime for each response
    pub ttl_seconds: u64,
    /// Cached API client
    fetcher: CachedFetcher,
}

impl App {
    /// Creates a new App from the startup configuration
    pub fn new(config: &StartupConfig) -> Self {
        let fetcher = CachedFetcher::new(ConnectionConfig::new(config.base_url.clone()));
        Self::with_fetcher(fetcher, config.ttl_seconds)
    }

    /// Creates a new App around an existing fetcher
    pub fn with_fetcher(fetcher: CachedFetcher, ttl_seconds: u64) -> Self {
        Self {
            state: AppState::Loading,
            dashboard: None,
            should_quit: false,
            show_help: false,
            refresh_requested: false,
            force_reload: false,
            last_refresh: None,
            ttl_seconds,
            fetcher,
        }
    }

    /// Number of API responses currently cached
    pub fn cached_entries(&self) -> usize {
        self.fetcher.cached_entries()
    }

    /// Loads both dashboard tables
    ///
    /// Transitions to `Dashboard` on success. On failure the state becomes
    /// `Error` and any previously loaded tables are discarded, so stale charts
    /// are never shown as current.
    pub async fn load_all_data(&mut self) {
        match load_dashboard(&self.fetcher, self.ttl_seconds).await {
            Ok(dashboard) => {
                info!(
                    fuels = dashboard.generation_mix.len(),
                    periods = dashboard.intensity.len(),
                    "dashboard loaded"
                );
                self.dashboard = Some(dashboard);
                self.last_refresh = Some(Local::now());
                self.state = AppState::Dashboard;
            }
            Err(e) => {
                error!(error = %e, "failed to load dashboard");
                self.dashboard = None;
                self.state = AppState::Error(e.to_string());
            }
        }
    }

    /// Runs a pending refresh, if one was requested
    ///
    /// A plain refresh is answered from cache while responses are fresh; a
    /// forced reload empties the cache first.
    pub async fn refresh_if_requested(&mut self) {
        if !self.refresh_requested {
            return;
        }

        if self.force_reload {
            self.fetcher.clear_cache();
            self.force_reload = false;
        }
        self.refresh_requested = false;
        self.load_all_data().await;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `r`: Re-query (served from cache while fresh)
    /// - `R`: Drop the cache and re-query
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Dashboard | AppState::Error(_) => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('R') => {
                    self.refresh_requested = true;
                    self.force_reload = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }
}
