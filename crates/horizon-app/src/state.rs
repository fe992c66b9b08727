// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub status_line: Option<String>,
    pub fault: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::Catalog,
            status_line: None,
            fault: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextScreen,
    PrevScreen,
    ShowScreen(Screen),
    SetStatus(String),
    ClearStatus,
    RaiseFault(String),
    Reload,
    GoHome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(Screen),
    StatusUpdated(String),
    StatusCleared,
    FaultRaised,
    ReloadRequested,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextScreen => self.rotate_screen(1),
            AppCommand::PrevScreen => self.rotate_screen(-1),
            AppCommand::ShowScreen(screen) => self.show(screen),
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
            AppCommand::RaiseFault(detail) => {
                // First fault wins; a fault while drawing the fallback keeps the original.
                if self.fault.is_none() {
                    self.fault = Some(detail);
                }
                vec![AppEvent::FaultRaised]
            }
            AppCommand::Reload => {
                self.fault = None;
                self.status_line = None;
                let mut events = self.show(Screen::Catalog);
                events.push(AppEvent::ReloadRequested);
                events
            }
            AppCommand::GoHome => {
                self.fault = None;
                self.show(Screen::Catalog)
            }
        }
    }

    pub fn has_fault(&self) -> bool {
        self.fault.is_some()
    }

    fn show(&mut self, screen: Screen) -> Vec<AppEvent> {
        if self.screen == screen {
            return Vec::new();
        }
        self.screen = screen;
        vec![AppEvent::ScreenChanged(screen)]
    }

    fn rotate_screen(&mut self, delta: isize) -> Vec<AppEvent> {
        let screens = Screen::ALL;
        let current = screens
            .iter()
            .position(|screen| *screen == self.screen)
            .unwrap_or(0) as isize;
        let len = screens.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.show(screens[next])
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState};
    use crate::Screen;

    #[test]
    fn screen_rotation_wraps() {
        let mut state = AppState {
            screen: Screen::Inquiry,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::NextScreen);
        assert_eq!(state.screen, Screen::Catalog);
        assert_eq!(events, vec![AppEvent::ScreenChanged(Screen::Catalog)]);

        state.dispatch(AppCommand::PrevScreen);
        assert_eq!(state.screen, Screen::Inquiry);
    }

    #[test]
    fn showing_current_screen_is_silent() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::ShowScreen(Screen::Catalog)).is_empty());
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::SetStatus("loading".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("loading"));
        assert_eq!(events, vec![AppEvent::StatusUpdated("loading".to_owned())]);

        state.dispatch(AppCommand::ClearStatus);
        assert_eq!(state.status_line, None);
    }

    #[test]
    fn fault_keeps_first_detail_until_cleared() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::RaiseFault("index out of bounds".to_owned()));
        state.dispatch(AppCommand::RaiseFault("second".to_owned()));
        assert_eq!(state.fault.as_deref(), Some("index out of bounds"));
        assert!(state.has_fault());
    }

    #[test]
    fn reload_clears_fault_and_requests_refetch() {
        let mut state = AppState {
            screen: Screen::Inquiry,
            fault: Some("boom".to_owned()),
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::Reload);
        assert!(!state.has_fault());
        assert_eq!(
            events,
            vec![
                AppEvent::ScreenChanged(Screen::Catalog),
                AppEvent::ReloadRequested,
            ]
        );
    }

    #[test]
    fn go_home_clears_fault_without_reload() {
        let mut state = AppState {
            screen: Screen::Inquiry,
            fault: Some("boom".to_owned()),
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::GoHome);
        assert!(!state.has_fault());
        assert_eq!(state.screen, Screen::Catalog);
        assert_eq!(events, vec![AppEvent::ScreenChanged(Screen::Catalog)]);
    }
}
