//! The effect shell: runs what classification asked for.

use tracing::{info, warn};

use crate::classify::Effect;
use crate::credential::{clear_credential, save_credential, CredentialStore};

/// Shows a message to the user. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Forces the UI to a route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Notifier that only logs. Used when the host has not installed one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!(%message, "user notification");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: &str) {
        info!(%route, "navigation requested");
    }
}

/// Execute `effects` in order.
pub fn apply_effects(
    effects: &[Effect],
    store: &dyn CredentialStore,
    notifier: &dyn Notifier,
    navigator: &dyn Navigator,
) {
    for effect in effects {
        match effect {
            Effect::Notify(message) => notifier.notify(message),
            Effect::ClearCredential => clear_credential(store),
            Effect::Navigate(route) => navigator.navigate(route),
            Effect::PersistCredential(credential) => save_credential(store, credential),
        }
    }
}
