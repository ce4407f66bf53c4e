//! Scene direction
//!
//! A small state machine for hosts that run more than one mode: scenes
//! register under a name, exactly one is active, and transitions are
//! deferred until the host's next `advance` call. Requesting a transition
//! from inside a frame is allowed; it takes effect on the following
//! `advance`, never mid-frame.

use thiserror::Error;

/// Reserved transition target that shuts the director down.
pub const EXIT_SCENE: &str = "exit";

/// Scene registration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("scene {0:?} is already registered")]
    DuplicateName(String),
    #[error("scene name {0:?} is reserved")]
    ReservedName(String),
}

/// One mode of the host application.
///
/// `on_enter` and `on_leave` bracket the scene's active span; `on_frame`
/// runs once per director advance while active.
pub trait Scene {
    fn on_enter(&mut self) {}
    fn on_leave(&mut self) {}
    fn on_frame(&mut self, dt: f32, ctl: &mut SceneControl);
}

/// Handle a scene uses to request transitions from inside a frame.
///
/// Only the latest request before an `advance` survives.
#[derive(Debug, Default)]
pub struct SceneControl {
    pending: Option<String>,
}

impl SceneControl {
    pub fn request(&mut self, name: &str) {
        self.pending = Some(name.to_owned());
    }

    fn take(&mut self) -> Option<String> {
        self.pending.take()
    }
}

/// Owns the registered scenes and drives the active one.
#[derive(Default)]
pub struct Director {
    entries: Vec<(String, Box<dyn Scene>)>,
    active: Option<usize>,
    ctl: SceneControl,
}

impl Director {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scene under a unique, non-reserved name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        scene: Box<dyn Scene>,
    ) -> Result<(), SceneError> {
        let name = name.into();
        if name == EXIT_SCENE {
            return Err(SceneError::ReservedName(name));
        }
        if self.entries.iter().any(|(n, _)| *n == name) {
            return Err(SceneError::DuplicateName(name));
        }
        self.entries.push((name, scene));
        Ok(())
    }

    /// Queues a transition from outside the frame loop.
    pub fn request(&mut self, name: &str) {
        self.ctl.request(name);
    }

    /// Name of the active scene, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.map(|i| self.entries[i].0.as_str())
    }

    /// Applies at most one pending transition, then frames the active
    /// scene. Returns `true` once the exit transition fires; the director
    /// is spent after that.
    pub fn advance(&mut self, dt: f32) -> bool {
        if let Some(name) = self.ctl.take() {
            if name == EXIT_SCENE {
                if let Some(cur) = self.active.take() {
                    self.entries[cur].1.on_leave();
                }
                log::info!("Director exiting");
                return true;
            }
            match self.entries.iter().position(|(n, _)| *n == name) {
                Some(next) => {
                    if let Some(cur) = self.active {
                        self.entries[cur].1.on_leave();
                    }
                    log::info!("Scene transition: {:?}", name);
                    self.entries[next].1.on_enter();
                    self.active = Some(next);
                }
                None => log::warn!("Ignoring transition to unknown scene {:?}", name),
            }
        }
        if let Some(cur) = self.active {
            self.entries[cur].1.on_frame(dt, &mut self.ctl);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type EventLog = Rc<RefCell<Vec<String>>>;

    /// Records lifecycle events and optionally hops elsewhere on its
    /// first frame.
    struct Probe {
        tag: &'static str,
        log: EventLog,
        hop: Option<&'static str>,
    }

    impl Probe {
        fn boxed(tag: &'static str, log: &EventLog, hop: Option<&'static str>) -> Box<dyn Scene> {
            Box::new(Self { tag, log: Rc::clone(log), hop })
        }
    }

    impl Scene for Probe {
        fn on_enter(&mut self) {
            self.log.borrow_mut().push(format!("{}:enter", self.tag));
        }

        fn on_leave(&mut self) {
            self.log.borrow_mut().push(format!("{}:leave", self.tag));
        }

        fn on_frame(&mut self, _dt: f32, ctl: &mut SceneControl) {
            self.log.borrow_mut().push(format!("{}:frame", self.tag));
            if let Some(hop) = self.hop.take() {
                ctl.request(hop);
            }
        }
    }

    #[test]
    fn test_register_rejects_duplicate_and_reserved() {
        let log = EventLog::default();
        let mut director = Director::new();
        director.register("menu", Probe::boxed("m", &log, None)).unwrap();
        assert_eq!(
            director.register("menu", Probe::boxed("m2", &log, None)),
            Err(SceneError::DuplicateName("menu".into()))
        );
        assert_eq!(
            director.register(EXIT_SCENE, Probe::boxed("x", &log, None)),
            Err(SceneError::ReservedName(EXIT_SCENE.into()))
        );
    }

    #[test]
    fn test_first_transition_enters_and_frames() {
        let log = EventLog::default();
        let mut director = Director::new();
        director.register("a", Probe::boxed("a", &log, None)).unwrap();
        assert_eq!(director.active_name(), None);

        director.request("a");
        assert!(!director.advance(0.1));
        assert_eq!(director.active_name(), Some("a"));
        assert_eq!(*log.borrow(), vec!["a:enter", "a:frame"]);
    }

    #[test]
    fn test_transition_leaves_before_entering() {
        let log = EventLog::default();
        let mut director = Director::new();
        director.register("a", Probe::boxed("a", &log, Some("b"))).unwrap();
        director.register("b", Probe::boxed("b", &log, None)).unwrap();

        director.request("a");
        director.advance(0.1);
        // The hop requested during a's frame lands on the next advance.
        director.advance(0.1);
        assert_eq!(
            *log.borrow(),
            vec!["a:enter", "a:frame", "a:leave", "b:enter", "b:frame"]
        );
        assert_eq!(director.active_name(), Some("b"));
    }

    #[test]
    fn test_unknown_transition_keeps_current_scene() {
        let log = EventLog::default();
        let mut director = Director::new();
        director.register("a", Probe::boxed("a", &log, None)).unwrap();
        director.request("a");
        director.advance(0.1);

        director.request("nowhere");
        assert!(!director.advance(0.1));
        assert_eq!(director.active_name(), Some("a"));
        assert_eq!(*log.borrow(), vec!["a:enter", "a:frame", "a:frame"]);
    }

    #[test]
    fn test_latest_request_wins() {
        let log = EventLog::default();
        let mut director = Director::new();
        director.register("a", Probe::boxed("a", &log, None)).unwrap();
        director.register("b", Probe::boxed("b", &log, None)).unwrap();

        director.request("a");
        director.request("b");
        director.advance(0.1);
        assert_eq!(director.active_name(), Some("b"));
        assert_eq!(*log.borrow(), vec!["b:enter", "b:frame"]);
    }

    #[test]
    fn test_exit_leaves_active_scene_and_terminates() {
        let log = EventLog::default();
        let mut director = Director::new();
        director.register("a", Probe::boxed("a", &log, Some(EXIT_SCENE))).unwrap();

        director.request("a");
        assert!(!director.advance(0.1));
        assert!(director.advance(0.1));
        // Exit runs on_leave and no further frames.
        assert_eq!(*log.borrow(), vec!["a:enter", "a:frame", "a:leave"]);
        assert_eq!(director.active_name(), None);
    }
}
