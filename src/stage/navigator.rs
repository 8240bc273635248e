//! Navigation handle shared by the stage, buttons and scenes.
//!
//! The stage owns the scene table; the navigator only knows the registered
//! names, the current target and whether the loop should keep running.
//! Cloning is cheap and every clone sees the same state, so a button action
//! can capture one at construction time instead of looking up a global.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use log::{debug, info};

use crate::error::{Error, Result};

/// Reserved target that stops the stage instead of naming a scene.
pub const QUIT: &str = "quit";

/// Name of the scene shown at startup and after the last life is lost.
pub const MAIN: &str = "main menu";

#[derive(Debug)]
struct NavState {
    names: HashSet<String>,
    target: String,
    active: bool,
    switches: u64,
}

#[derive(Clone, Debug)]
pub struct Navigator {
    state: Rc<RefCell<NavState>>,
}

impl Navigator {
    /// A running navigator pointing at `initial`. The name is not checked
    /// here; scenes are usually registered afterwards.
    pub fn new(initial: &str) -> Self {
        Navigator {
            state: Rc::new(RefCell::new(NavState {
                names: HashSet::new(),
                target: initial.to_string(),
                active: true,
                switches: 0,
            })),
        }
    }

    pub(crate) fn register(&self, name: &str) {
        self.state.borrow_mut().names.insert(name.to_string());
    }

    #[allow(dead_code)]
    pub fn is_registered(&self, name: &str) -> bool {
        self.state.borrow().names.contains(name)
    }

    /// Switch to `name`, or stop the loop when `name` is [`QUIT`].
    ///
    /// Unknown names fail and leave the current target untouched.
    pub fn request(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if name == QUIT {
            info!("quit requested from {:?}", state.target);
            state.active = false;
            return Ok(());
        }
        if !state.names.contains(name) {
            return Err(Error::UnknownScene(name.to_string()));
        }
        debug!("scene {:?} -> {:?}", state.target, name);
        state.target = name.to_string();
        state.switches += 1;
        Ok(())
    }

    /// A zero-argument action that requests `name` when invoked.
    pub fn link(&self, name: &str) -> impl FnMut() -> Result<()> + 'static {
        let nav = self.clone();
        let name = name.to_string();
        move || nav.request(&name)
    }

    pub fn target(&self) -> String {
        self.state.borrow().target.clone()
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    /// Stop the loop without going through a target request.
    pub fn stop(&self) {
        self.state.borrow_mut().active = false;
    }

    /// Successful scene switches so far (quit excluded).
    pub fn switches(&self) -> u64 {
        self.state.borrow().switches
    }
}
