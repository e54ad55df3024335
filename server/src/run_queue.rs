use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;

use crate::SceneServer;

/// An action posted from another thread, run on the simulation thread at the
/// start of the next tick
pub type DeferredAction = Box<dyn FnOnce(&mut SceneServer) + Send>;

/// Errors raised when posting to a [`RunQueue`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunQueueError {
    /// The scene server owning the queue has been dropped
    #[error("Scene server is gone, action dropped")]
    Disconnected,
}

/// A cloneable handle for handing work to the simulation thread
#[derive(Clone)]
pub struct RunQueue {
    sender: Sender<DeferredAction>,
}

impl RunQueue {
    pub fn post<F>(&self, action: F) -> Result<(), RunQueueError>
    where
        F: FnOnce(&mut SceneServer) + Send + 'static,
    {
        self.sender
            .send(Box::new(action))
            .map_err(|_| RunQueueError::Disconnected)
    }
}

pub(crate) struct RunQueueReceiver {
    sender: Sender<DeferredAction>,
    receiver: Receiver<DeferredAction>,
}

impl RunQueueReceiver {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> RunQueue {
        RunQueue {
            sender: self.sender.clone(),
        }
    }

    /// Takes every action queued so far without blocking. Actions posted
    /// after this returns wait for the next drain.
    pub fn drain(&self) -> Vec<DeferredAction> {
        self.receiver.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}
