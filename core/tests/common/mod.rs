//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use task_core::{Navigator, Notifier};

/// Records every notification and navigation in call order.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("notify:").map(str::to_string))
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("navigate:").map(str::to_string))
            .collect()
    }
}

impl Notifier for Recorder {
    fn notify(&self, message: &str) {
        self.events.lock().unwrap().push(format!("notify:{message}"));
    }
}

impl Navigator for Recorder {
    fn navigate(&self, route: &str) {
        self.events.lock().unwrap().push(format!("navigate:{route}"));
    }
}
