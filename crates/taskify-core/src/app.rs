//! The composition root.
//!
//! A [`Workspace`] owns the store, the application config and the session.
//! The task list, the diary and the focus timer are only handed out while a
//! user is logged in.

use crate::auth::SessionManager;
use crate::diary::Diary;
use crate::error::AuthError;
use crate::storage::{Config, PersistentStore};
use crate::tasks::TaskList;
use crate::timer::{FocusTimer, Notifier, TickSource, TimerSettings};

#[derive(Debug)]
pub struct Workspace {
    config: Config,
    store: PersistentStore,
    session: SessionManager,
}

impl Workspace {
    /// Open the store described by `config` and restore the stored session.
    pub fn open(config: Config) -> Self {
        let store = PersistentStore::open(&config.storage);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: PersistentStore) -> Self {
        let session = SessionManager::restore(store.clone());
        Self {
            config,
            store,
            session,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    /// # Errors
    /// [`AuthError::NotAuthenticated`] when nobody is logged in.
    pub fn tasks(&self) -> Result<TaskList, AuthError> {
        self.session.require()?;
        Ok(TaskList::load(self.store.clone()))
    }

    /// # Errors
    /// [`AuthError::NotAuthenticated`] when nobody is logged in.
    pub fn diary(&self) -> Result<Diary, AuthError> {
        self.session.require()?;
        Ok(Diary::load(self.store.clone()))
    }

    /// Build a focus timer from the stored settings. The sound flag starts
    /// from `notifications.enabled`.
    ///
    /// # Errors
    /// [`AuthError::NotAuthenticated`] when nobody is logged in.
    pub fn focus_timer(
        &self,
        ticker: impl TickSource + 'static,
        notifier: impl Notifier + 'static,
    ) -> Result<FocusTimer, AuthError> {
        self.session.require()?;
        let timer = FocusTimer::new(self.store.clone(), ticker, notifier);
        timer.set_sound_enabled(self.config.notifications.enabled);
        Ok(timer)
    }

    /// Stored timer settings, or the defaults.
    ///
    /// # Errors
    /// [`AuthError::NotAuthenticated`] when nobody is logged in.
    pub fn timer_settings(&self) -> Result<TimerSettings, AuthError> {
        self.session.require()?;
        Ok(TimerSettings::load(&self.store))
    }

    /// Validate and persist new timer settings outside a running timer.
    ///
    /// # Errors
    /// [`AuthError::NotAuthenticated`] when nobody is logged in, or a
    /// validation error for an out-of-range field.
    pub fn save_timer_settings(&self, settings: &TimerSettings) -> Result<(), AuthError> {
        self.session.require()?;
        settings.validate()?;
        settings.save(&self.store);
        tracing::debug!(?settings, "timer settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{ManualTicker, RecordingNotifier};

    fn logged_in() -> Workspace {
        let mut ws = Workspace::with_store(Config::default(), PersistentStore::in_memory());
        ws.session_mut()
            .register("Ada", "ada@example.com", "engine123")
            .unwrap();
        ws
    }

    #[test]
    fn features_need_login() {
        let ws = Workspace::with_store(Config::default(), PersistentStore::in_memory());
        assert!(matches!(ws.tasks(), Err(AuthError::NotAuthenticated)));
        assert!(matches!(ws.diary(), Err(AuthError::NotAuthenticated)));
        assert!(matches!(
            ws.focus_timer(ManualTicker::new(), RecordingNotifier::new()),
            Err(AuthError::NotAuthenticated)
        ));
        assert!(matches!(ws.timer_settings(), Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn features_open_after_login() {
        let ws = logged_in();
        let mut tasks = ws.tasks().unwrap();
        tasks.add("first");
        assert_eq!(ws.tasks().unwrap().items().len(), 1);
        assert!(ws.diary().unwrap().entries().is_empty());
    }

    #[test]
    fn timer_sound_follows_config() {
        let mut config = Config::default();
        config.notifications.enabled = false;
        let mut ws = Workspace::with_store(config, PersistentStore::in_memory());
        ws.session_mut()
            .register("Ada", "ada@example.com", "engine123")
            .unwrap();
        let timer = ws
            .focus_timer(ManualTicker::new(), RecordingNotifier::new())
            .unwrap();
        assert!(!timer.snapshot().sound_enabled);
    }

    #[test]
    fn saved_settings_reach_new_timers() {
        let ws = logged_in();
        let settings = TimerSettings {
            work_duration: 50,
            ..TimerSettings::default()
        };
        ws.save_timer_settings(&settings).unwrap();
        let timer = ws
            .focus_timer(ManualTicker::new(), RecordingNotifier::new())
            .unwrap();
        assert_eq!(timer.state().remaining_secs, 50 * 60);
    }

    #[test]
    fn zero_settings_refused() {
        let ws = logged_in();
        let settings = TimerSettings {
            long_break_interval: 0,
            ..TimerSettings::default()
        };
        assert!(matches!(
            ws.save_timer_settings(&settings),
            Err(AuthError::Validation(_))
        ));
        assert_eq!(ws.timer_settings().unwrap(), TimerSettings::default());
    }
}
