//! Macro dispatch queue.
//!
//! Producers (touch UI, HTTP handlers) never wait for a macro to finish, they
//! push it into a bounded channel and return. A single [`MacroWorker`] drains
//! the channel and plays the macros one after another, so two runs can never
//! interleave their reports.
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use embedded_hal_async::delay::DelayNs;
use heapless::String;
use knomipad_types::macro_kind::MacroKind;

use crate::executor::{MacroError, MacroExecutor};
use crate::hid::HidTransport;
use crate::{DISPATCH_QUEUE_SIZE, MACRO_PAYLOAD_SIZE, RawMutex};

/// A macro waiting for the worker
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchMessage {
    pub kind: MacroKind,
    pub payload: String<MACRO_PAYLOAD_SIZE>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// The queue is full, the macro was dropped
    QueueFull,
    /// The payload doesn't fit in a queue message
    PayloadTooLong,
}

impl core::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DispatchError::QueueFull => f.write_str("macro queue full"),
            DispatchError::PayloadTooLong => f.write_str("macro payload too long"),
        }
    }
}

/// Owner of the macro queue.
///
/// `new` is `const`, so the dispatcher can live in a `static` and hand out
/// `'static` senders:
///
/// ```ignore
/// static DISPATCHER: MacroDispatcher = MacroDispatcher::new();
/// ```
pub struct MacroDispatcher<const N: usize = DISPATCH_QUEUE_SIZE> {
    channel: Channel<RawMutex, DispatchMessage, N>,
}

impl<const N: usize> Default for MacroDispatcher<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MacroDispatcher<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Handle for a producer, any number of them can exist
    pub fn sender(&self) -> MacroSender<'_, N> {
        MacroSender {
            sender: self.channel.sender(),
        }
    }

    /// Create the consumer. Only one worker should run per dispatcher,
    /// otherwise the FIFO order between macros is lost.
    pub fn worker<T: HidTransport, D: DelayNs>(&self, executor: MacroExecutor<T, D>) -> MacroWorker<'_, T, D, N> {
        MacroWorker {
            receiver: self.channel.receiver(),
            executor,
        }
    }

    /// Number of macros waiting in the queue
    pub fn pending(&self) -> usize {
        self.channel.len()
    }
}

/// Producer side of the queue
#[derive(Clone, Copy)]
pub struct MacroSender<'a, const N: usize = DISPATCH_QUEUE_SIZE> {
    sender: Sender<'a, RawMutex, DispatchMessage, N>,
}

impl<const N: usize> MacroSender<'_, N> {
    /// Queue a macro without waiting. A full queue drops the new macro.
    pub fn enqueue(&self, kind: MacroKind, payload: &str) -> Result<(), DispatchError> {
        let payload = String::try_from(payload).map_err(|_| {
            warn!("Macro payload too long ({} bytes), dropped", payload.len());
            DispatchError::PayloadTooLong
        })?;
        match self.sender.try_send(DispatchMessage { kind, payload }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(msg)) => {
                warn!("Macro queue full, {} macro dropped", msg.kind.as_str());
                Err(DispatchError::QueueFull)
            }
        }
    }
}

/// Consumer side of the queue, owns the executor
pub struct MacroWorker<'a, T: HidTransport, D: DelayNs, const N: usize = DISPATCH_QUEUE_SIZE> {
    receiver: Receiver<'a, RawMutex, DispatchMessage, N>,
    executor: MacroExecutor<T, D>,
}

impl<T: HidTransport, D: DelayNs, const N: usize> MacroWorker<'_, T, D, N> {
    pub fn executor(&self) -> &MacroExecutor<T, D> {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut MacroExecutor<T, D> {
        &mut self.executor
    }

    /// Wait for the next macro and play it to the end
    pub async fn process_next(&mut self) -> Result<(), MacroError> {
        let msg = self.receiver.receive().await;
        debug!("Dispatching {} macro", msg.kind.as_str());
        self.executor.run(msg.kind, &msg.payload).await
    }

    /// Worker task body, never returns
    pub async fn run(&mut self) -> ! {
        info!("Macro worker started");
        loop {
            // Failures are logged by the executor, producers only learn whether
            // their macro was queued
            let _ = self.process_next().await;
        }
    }
}
