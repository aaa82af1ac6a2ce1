use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::apps::{AppLauncher, AppSpec, EmbeddedApp, MountLookup};
use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;

/// What one slide change did, by app id in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideReport {
    pub started: Vec<String>,
    pub resumed: Vec<String>,
    pub paused: Vec<String>,
    /// Apps whose `init` failed; they are retried on the next slide change.
    pub failed: Vec<String>,
}

impl SlideReport {
    pub fn is_empty(&self) -> bool {
        self.started.is_empty()
            && self.resumed.is_empty()
            && self.paused.is_empty()
            && self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppState {
    NotStarted,
    Running,
    Paused,
}

struct AppEntry<A> {
    spec: AppSpec,
    instance: Option<A>,
    paused: bool,
}

impl<A> AppEntry<A> {
    fn state(&self) -> AppState {
        match (&self.instance, self.paused) {
            (None, _) => AppState::NotStarted,
            (Some(_), false) => AppState::Running,
            (Some(_), true) => AppState::Paused,
        }
    }
}

pub struct DeckOrchestrator<L: AppLauncher> {
    launcher: L,
    config: OrchestratorConfig,
    /// Registration order is slide order.
    apps: IndexMap<String, AppEntry<L::App>>,
}

impl<L: AppLauncher> DeckOrchestrator<L> {
    pub fn new(launcher: L, config: OrchestratorConfig) -> Self {
        Self {
            launcher,
            config,
            apps: IndexMap::new(),
        }
    }

    /// Register an app. Ids are unique.
    pub fn register_app(&mut self, spec: AppSpec) -> Result<(), OrchestratorError> {
        if spec.mount_id.trim().is_empty() {
            return Err(OrchestratorError::MissingMount { id: spec.id });
        }
        if self.apps.contains_key(&spec.id) {
            return Err(OrchestratorError::DuplicateApp { id: spec.id });
        }
        log::debug!("registered app '{}' on #{}", spec.id, spec.mount_id);
        self.apps.insert(
            spec.id.clone(),
            AppEntry {
                spec,
                instance: None,
                paused: false,
            },
        );
        Ok(())
    }

    /// Reconcile every app with the slide now on screen.
    ///
    /// Apps whose mount is present are started once and resumed afterwards;
    /// started apps whose mount is gone are paused if they can be.
    pub fn slide_changed<M>(&mut self, mounts: &M) -> SlideReport
    where
        M: MountLookup<Mount = L::Mount>,
    {
        let mut report = SlideReport::default();
        for (id, entry) in self.apps.iter_mut() {
            match mounts.find_mount(&entry.spec.mount_id) {
                Some(mount) => match entry.instance.as_mut() {
                    None => match launch(&mut self.launcher, &entry.spec, &mount) {
                        Ok(app) => {
                            entry.instance = Some(app);
                            entry.paused = false;
                            report.started.push(id.clone());
                        }
                        Err(err) => {
                            log::warn!("{err:#}");
                            report.failed.push(id.clone());
                        }
                    },
                    Some(app) if entry.paused => {
                        if send_pause(id, app, false) {
                            entry.paused = false;
                            report.resumed.push(id.clone());
                        }
                    }
                    Some(_) => {}
                },
                None => match entry.instance.as_mut() {
                    Some(app) if !entry.paused && app.is_pausable() => {
                        if send_pause(id, app, true) {
                            entry.paused = true;
                            report.paused.push(id.clone());
                        }
                    }
                    _ => {}
                },
            }
        }
        report
    }

    pub fn app_state(&self, id: &str) -> Result<AppState, OrchestratorError> {
        self.apps
            .get(id)
            .map(AppEntry::state)
            .ok_or_else(|| OrchestratorError::UnknownApp { id: id.to_string() })
    }

    pub fn app_ids(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn launcher_mut(&mut self) -> &mut L {
        &mut self.launcher
    }
}

fn launch<L: AppLauncher>(launcher: &mut L, spec: &AppSpec, mount: &L::Mount) -> Result<L::App> {
    launcher
        .launch(spec, mount)
        .with_context(|| format!("init of app '{}' failed", spec.id))
}

/// Returns whether the port accepted the message.
fn send_pause<A: EmbeddedApp>(id: &str, app: &mut A, paused: bool) -> bool {
    match app.set_paused(paused) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("pause({paused}) on app '{id}' failed: {err:#}");
            false
        }
    }
}
