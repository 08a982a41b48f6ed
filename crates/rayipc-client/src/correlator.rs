//! Single-slot request/response correlation.
//!
//! Responses carry no request id, so at most one synchronous request can be
//! waiting at a time. Each [`Correlator::begin`] takes the slot; a request
//! still in it is failed with [`ClientError::Superseded`]. Generations let a
//! timed-out caller clear the slot without touching a newer request.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rayipc_value::Value;
use tokio::sync::oneshot;
use tracing::trace;

use crate::error::ClientError;

pub(crate) type Reply = Result<Value, ClientError>;

/// Handle returned to the caller that owns the pending slot.
#[derive(Debug)]
pub(crate) struct Ticket {
    pub generation: u64,
    pub reply: oneshot::Receiver<Reply>,
}

#[derive(Debug)]
struct Pending {
    generation: u64,
    tx: oneshot::Sender<Reply>,
}

#[derive(Debug, Default)]
struct Slot {
    next_generation: u64,
    pending: Option<Pending>,
}

#[derive(Debug, Default)]
pub(crate) struct Correlator {
    slot: Mutex<Slot>,
}

impl Correlator {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the slot for a new request.
    pub fn begin(&self) -> Ticket {
        let (tx, reply) = oneshot::channel();
        let mut slot = self.lock();
        let generation = slot.next_generation;
        slot.next_generation = slot.next_generation.wrapping_add(1);

        if let Some(previous) = slot.pending.replace(Pending { generation, tx }) {
            trace!(
                previous = previous.generation,
                generation,
                "pending request superseded"
            );
            let _ = previous.tx.send(Err(ClientError::Superseded));
        }

        Ticket { generation, reply }
    }

    /// Hand a reply to whoever holds the slot. Returns false if nobody did.
    pub fn resolve(&self, reply: Reply) -> bool {
        match self.lock().pending.take() {
            Some(pending) => {
                // The receiver may have given up already; that is not an error.
                let _ = pending.tx.send(reply);
                true
            }
            None => false,
        }
    }

    /// Release the slot if it still belongs to `generation`.
    pub fn cancel(&self, generation: u64) -> bool {
        let mut slot = self.lock();
        if slot.pending.as_ref().map(|p| p.generation) == Some(generation) {
            slot.pending = None;
            true
        } else {
            false
        }
    }

    /// Fail the pending request, if any.
    pub fn fail(&self, err: ClientError) -> bool {
        self.resolve(Err(err))
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending.is_some()
    }
}
