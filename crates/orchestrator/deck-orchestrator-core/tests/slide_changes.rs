use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use anyhow::{bail, Result};
use deck_orchestrator::{
    AppLauncher, AppSpec, AppState, DeckOrchestrator, EmbeddedApp, LaserPointer, MountLookup,
    OrchestratorConfig, OrchestratorError, PointerClass, SlideReport,
};
use deck_test_fixtures::{configs, decks};
use serde_json::json;

type PortLog = Rc<RefCell<Vec<(String, bool)>>>;

struct FakeApp {
    id: String,
    pausable: bool,
    port: PortLog,
}

impl EmbeddedApp for FakeApp {
    fn is_pausable(&self) -> bool {
        self.pausable
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.port.borrow_mut().push((self.id.clone(), paused));
        Ok(())
    }
}

#[derive(Default)]
struct FakeLauncher {
    launches: Vec<(String, String)>,
    fail_once: HashSet<String>,
    without_port: HashSet<String>,
    port: PortLog,
}

impl AppLauncher for FakeLauncher {
    type Mount = String;
    type App = FakeApp;

    fn launch(&mut self, spec: &AppSpec, mount: &String) -> Result<FakeApp> {
        if self.fail_once.remove(&spec.id) {
            bail!("mount #{mount} is not ready");
        }
        self.launches.push((spec.id.clone(), mount.clone()));
        Ok(FakeApp {
            id: spec.id.clone(),
            pausable: !self.without_port.contains(&spec.id),
            port: Rc::clone(&self.port),
        })
    }
}

/// Mount ids present on the current slide.
struct Slide(Vec<&'static str>);

impl MountLookup for Slide {
    type Mount = String;

    fn find_mount(&self, mount_id: &str) -> Option<String> {
        self.0
            .iter()
            .find(|m| **m == mount_id)
            .map(|m| format!("node:{m}"))
    }
}

fn caterpillar_deck(launcher: FakeLauncher) -> DeckOrchestrator<FakeLauncher> {
    let mut orch = DeckOrchestrator::new(launcher, OrchestratorConfig::default());
    let specs: Vec<AppSpec> = decks::load("caterpillar").unwrap();
    for spec in specs {
        orch.register_app(spec).unwrap();
    }
    orch
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// it should init once, pause when off-screen, and resume when back
#[test]
fn start_pause_resume_cycle() {
    let launcher = FakeLauncher {
        without_port: HashSet::from(["one-apple".to_string()]),
        ..Default::default()
    };
    let port = Rc::clone(&launcher.port);
    let mut orch = caterpillar_deck(launcher);

    let report = orch.slide_changed(&Slide(vec!["slowCaterpillar"]));
    assert_eq!(report.started, ids(&["slow-caterpillar"]));
    assert_eq!(
        orch.launcher().launches,
        vec![("slow-caterpillar".to_string(), "node:slowCaterpillar".to_string())]
    );

    // Same slide again: nothing to do.
    assert!(orch.slide_changed(&Slide(vec!["slowCaterpillar"])).is_empty());

    let report = orch.slide_changed(&Slide(vec![]));
    assert_eq!(report.paused, ids(&["slow-caterpillar"]));
    assert_eq!(orch.app_state("slow-caterpillar").unwrap(), AppState::Paused);

    let report = orch.slide_changed(&Slide(vec!["slowCaterpillar"]));
    assert_eq!(report.resumed, ids(&["slow-caterpillar"]));
    assert!(report.started.is_empty());
    assert_eq!(orch.launcher().launches.len(), 1);

    assert_eq!(
        *port.borrow(),
        vec![
            ("slow-caterpillar".to_string(), true),
            ("slow-caterpillar".to_string(), false)
        ]
    );
}

/// it should leave apps without a pause port running when they leave the screen
#[test]
fn apps_without_pause_port_are_never_paused() {
    let launcher = FakeLauncher {
        without_port: HashSet::from(["one-apple".to_string()]),
        ..Default::default()
    };
    let port = Rc::clone(&launcher.port);
    let mut orch = caterpillar_deck(launcher);

    orch.slide_changed(&Slide(vec!["elmOneApple"]));
    let report = orch.slide_changed(&Slide(vec!["fastCaterpillar"]));
    assert_eq!(report.started, ids(&["fast-caterpillar"]));
    assert!(report.paused.is_empty());
    assert_eq!(orch.app_state("one-apple").unwrap(), AppState::Running);
    assert!(port.borrow().is_empty());
}

/// it should keep every app that is on screen running, whatever else is missing
#[test]
fn apps_sharing_a_slide_are_not_paused() {
    let mut orch = caterpillar_deck(FakeLauncher::default());
    let report = orch.slide_changed(&Slide(vec!["slowCaterpillar", "fastCaterpillar"]));
    assert_eq!(report.started, ids(&["slow-caterpillar", "fast-caterpillar"]));
    assert!(report.paused.is_empty());
    assert_eq!(orch.app_state("one-apple").unwrap(), AppState::NotStarted);

    let report = orch.slide_changed(&Slide(vec!["elmOneApple"]));
    assert_eq!(
        report,
        SlideReport {
            started: ids(&["one-apple"]),
            paused: ids(&["slow-caterpillar", "fast-caterpillar"]),
            ..Default::default()
        }
    );
}

/// it should log a failed init and retry it on the next slide change
#[test]
fn failed_init_is_retried() {
    let launcher = FakeLauncher {
        fail_once: HashSet::from(["fast-caterpillar".to_string()]),
        ..Default::default()
    };
    let mut orch = caterpillar_deck(launcher);

    let report = orch.slide_changed(&Slide(vec!["fastCaterpillar"]));
    assert_eq!(report.failed, ids(&["fast-caterpillar"]));
    assert_eq!(orch.app_state("fast-caterpillar").unwrap(), AppState::NotStarted);

    let report = orch.slide_changed(&Slide(vec!["fastCaterpillar"]));
    assert_eq!(report.started, ids(&["fast-caterpillar"]));
}

/// it should reject duplicate ids and empty mount ids, and report unknown apps
#[test]
fn registration_errors() {
    let mut orch = caterpillar_deck(FakeLauncher::default());
    let dup = AppSpec::new("one-apple", "elsewhere", json!({}));
    assert_eq!(
        orch.register_app(dup),
        Err(OrchestratorError::DuplicateApp {
            id: "one-apple".into()
        })
    );
    let blank = AppSpec::new("blank", "  ", json!(null));
    assert!(matches!(
        orch.register_app(blank),
        Err(OrchestratorError::MissingMount { .. })
    ));
    assert!(orch.app_state("tea").is_err());
    assert_eq!(
        orch.app_ids().collect::<Vec<_>>(),
        vec!["slow-caterpillar", "fast-caterpillar", "one-apple"]
    );
}

/// it should read the pointer idle time from config
#[test]
fn laser_pointer_uses_configured_idle_time() {
    let cfg: OrchestratorConfig = configs::load("fast-pointer").unwrap();
    let mut laser = LaserPointer::new(&cfg);
    assert_eq!(laser.idle_ms(), 250.0);
    assert_eq!(laser.on_move(10.0), Some(PointerClass::Moving));
    assert_eq!(laser.tick(260.0), Some(PointerClass::Stopped));

    let defaults: OrchestratorConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults.pointer_idle_ms, 1000);
    assert_eq!(defaults.current_slide, "section.current");
    assert_eq!(cfg.current_slide, "section.current");
}
