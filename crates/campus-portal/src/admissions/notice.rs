use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// How long a submission notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTone {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub message: String,
    pub tone: NoticeTone,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    view: Option<NoticeView>,
}

/// Transient message that hides itself after a fixed delay.
///
/// The pending hide is owned by the notice: showing a newer message or dropping the
/// notice cancels it, and a hide that races a newer message leaves that message alone.
#[derive(Debug)]
pub struct Notice {
    slot: Arc<Mutex<Slot>>,
    ttl: Duration,
    expiry: Option<JoinHandle<()>>,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Notice {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            ttl,
            expiry: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Shows `message` and schedules its removal. Must be called inside a tokio runtime.
    pub fn show(&mut self, message: impl Into<String>, tone: NoticeTone) {
        self.cancel_expiry();

        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.view = Some(NoticeView {
                message: message.into(),
                tone,
            });
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let ttl = self.ttl;
        self.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut slot = lock(&slot);
            if slot.generation == generation {
                slot.view = None;
            }
        }));
    }

    pub fn dismiss(&mut self) {
        self.cancel_expiry();
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.view = None;
    }

    pub fn current(&self) -> Option<NoticeView> {
        lock(&self.slot).view.clone()
    }

    fn cancel_expiry(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new(NOTICE_TTL)
    }
}

impl Drop for Notice {
    fn drop(&mut self) {
        self.cancel_expiry();
    }
}
