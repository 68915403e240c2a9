//! Process-lifecycle signal coordination.
//!
//! The coordinator is an explicit object rather than ambient global
//! subscription state, so each test can construct an isolated instance.
//! It toggles between armed and disarmed; while armed it routes delivered
//! events to emergency handling (fatal faults force-close the line
//! interface) or graceful-exit handling (everything else).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

/// Channel capacity for lifecycle event fan-out.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// A process-lifecycle event observed by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Normal process exit.
    Exit,
    /// An uncaught fatal condition outside the prompt flow.
    FatalError,
    /// An interrupt signal during an active session.
    Interrupt,
}

/// Default event set subscribed by [`SignalCoordinator::toggle`].
pub const DEFAULT_EVENTS: &[LifecycleEvent] = &[LifecycleEvent::Exit, LifecycleEvent::FatalError];

/// Routes process-lifecycle events while armed.
#[derive(Debug)]
pub struct SignalCoordinator {
    armed: AtomicBool,
    subscribed: std::sync::Mutex<Vec<LifecycleEvent>>,
    events: broadcast::Sender<LifecycleEvent>,
    closed: Arc<AtomicBool>,
}

impl SignalCoordinator {
    /// Create a disarmed coordinator with its own line-closed flag.
    #[must_use]
    pub fn new() -> Self {
        Self::with_closed_flag(Arc::new(AtomicBool::new(false)))
    }

    /// Create a disarmed coordinator sharing the line interface's closed
    /// flag, so emergency handling can force the interface shut.
    #[must_use]
    pub fn with_closed_flag(closed: Arc<AtomicBool>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            armed: AtomicBool::new(false),
            subscribed: std::sync::Mutex::new(Vec::new()),
            events,
            closed,
        }
    }

    /// Check whether the coordinator is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Flip between armed and disarmed.
    ///
    /// When disarmed, subscribes handlers for `events` (or the default set
    /// when `None`) and arms. When already armed, unsubscribes the same
    /// handlers and disarms.
    pub fn toggle(&self, events: Option<&[LifecycleEvent]>) {
        let mut subscribed = self.lock_subscribed();
        if self.is_armed() {
            let dropped = std::mem::take(&mut *subscribed);
            self.armed.store(false, Ordering::SeqCst);
            tracing::debug!(?dropped, "signal coordinator disarmed");
        } else {
            *subscribed = events.unwrap_or(DEFAULT_EVENTS).to_vec();
            self.armed.store(true, Ordering::SeqCst);
            tracing::debug!(events = ?*subscribed, "signal coordinator armed");
        }
    }

    /// Subscribe to events routed by this coordinator.
    ///
    /// The prompt engine listens here for [`LifecycleEvent::Interrupt`].
    #[must_use]
    pub fn listen(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// The shared closed flag, forced on by emergency handling.
    #[must_use]
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    /// Deliver a lifecycle event.
    ///
    /// Disarmed coordinators drop events, as do armed coordinators for
    /// events outside their subscribed set. Fatal faults route to
    /// emergency handling; interrupts are forwarded to listeners;
    /// everything else is a graceful exit, which disarms first to prevent
    /// re-entrant handling.
    pub fn deliver(&self, event: LifecycleEvent) {
        if !self.is_armed() {
            tracing::trace!(?event, "lifecycle event dropped while disarmed");
            return;
        }
        if !self.lock_subscribed().contains(&event) {
            tracing::trace!(?event, "lifecycle event not subscribed");
            return;
        }
        match event {
            LifecycleEvent::FatalError => self.emergency(),
            LifecycleEvent::Interrupt => {
                let _ = self.events.send(event);
            }
            LifecycleEvent::Exit => self.graceful(),
        }
    }

    /// Emergency handling: log at the highest severity and force the line
    /// interface shut. No further input is accepted.
    fn emergency(&self) {
        tracing::error!("fatal fault: closing line interface");
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.events.send(LifecycleEvent::FatalError);
    }

    /// Graceful handling: disarm first, then log the exit notice and let
    /// normal shutdown proceed.
    fn graceful(&self) {
        self.armed.store(false, Ordering::SeqCst);
        self.lock_subscribed().clear();
        tracing::info!("exiting");
        let _ = self.events.send(LifecycleEvent::Exit);
    }

    fn lock_subscribed(&self) -> std::sync::MutexGuard<'_, Vec<LifecycleEvent>> {
        self.subscribed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for SignalCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward OS interrupt signals (SIGINT) to the coordinator.
///
/// Spawned once per process when the first real line interface is
/// initialized. The task runs until signal registration fails or the
/// process exits.
#[cfg(unix)]
pub fn bind_os_signals(coordinator: &Arc<SignalCoordinator>) -> tokio::task::JoinHandle<()> {
    let coordinator = Arc::clone(coordinator);
    tokio::spawn(async move {
        let Ok(mut interrupt) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
        else {
            tracing::error!("failed to register SIGINT handler");
            return;
        };
        while interrupt.recv().await.is_some() {
            coordinator.deliver(LifecycleEvent::Interrupt);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_armed_state() {
        let coordinator = SignalCoordinator::new();
        assert!(!coordinator.is_armed());

        coordinator.toggle(None);
        assert!(coordinator.is_armed());

        coordinator.toggle(None);
        assert!(!coordinator.is_armed());
    }

    #[test]
    fn disarmed_drops_events() {
        let coordinator = SignalCoordinator::new();
        let mut rx = coordinator.listen();
        coordinator.deliver(LifecycleEvent::Interrupt);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn emergency_forces_close() {
        let coordinator = SignalCoordinator::new();
        coordinator.toggle(None);
        assert!(!coordinator.closed_flag().load(Ordering::SeqCst));

        coordinator.deliver(LifecycleEvent::FatalError);
        assert!(coordinator.closed_flag().load(Ordering::SeqCst));
        // Emergency handling does not disarm.
        assert!(coordinator.is_armed());
    }

    #[test]
    fn graceful_exit_disarms_first() {
        let coordinator = SignalCoordinator::new();
        coordinator.toggle(None);
        coordinator.deliver(LifecycleEvent::Exit);
        assert!(!coordinator.is_armed());

        // A second delivery is now a no-op.
        let mut rx = coordinator.listen();
        coordinator.deliver(LifecycleEvent::Exit);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn interrupt_reaches_listeners_while_subscribed() {
        let coordinator = SignalCoordinator::new();
        coordinator.toggle(Some(&[LifecycleEvent::Interrupt]));
        let mut rx = coordinator.listen();

        coordinator.deliver(LifecycleEvent::Interrupt);
        assert_eq!(rx.recv().await.expect("event"), LifecycleEvent::Interrupt);
    }

    #[test]
    fn toggle_with_custom_event_set() {
        let coordinator = SignalCoordinator::new();
        coordinator.toggle(Some(&[LifecycleEvent::Interrupt]));
        assert!(coordinator.is_armed());
    }

    #[test]
    fn unsubscribed_event_is_dropped() {
        let coordinator = SignalCoordinator::new();
        coordinator.toggle(Some(&[LifecycleEvent::Interrupt]));
        let mut rx = coordinator.listen();

        // A fatal fault outside the subscribed set must not trigger
        // emergency handling.
        coordinator.deliver(LifecycleEvent::FatalError);
        assert!(!coordinator.closed_flag().load(Ordering::SeqCst));
        assert!(coordinator.is_armed());
        assert!(rx.try_recv().is_err());

        // The default set has no Interrupt subscription.
        let defaults = SignalCoordinator::new();
        defaults.toggle(None);
        let mut rx = defaults.listen();
        defaults.deliver(LifecycleEvent::Interrupt);
        assert!(rx.try_recv().is_err());
    }
}
