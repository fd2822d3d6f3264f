//! The image-loader contract
//!
//! Loading is fire-and-forget. The caller hands an [`ImageLoader`] a
//! [`LoadRequest`]; the loader eventually calls [`Completer::complete`],
//! which posts a [`LoadCompletion`] onto a channel the caller drains on its
//! own thread. Nothing is ever applied from inside the loader, so a
//! completion can never re-enter the caller's layout pass.
//!
//! Cancellation is advisory: the caller flips the request's [`CancelToken`]
//! and forgets the ticket. A loader may keep going (a finished fetch can
//! still warm a shared cache), and the caller drops the late completion
//! because its ticket is gone.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use slotmap::new_key_type;

use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::source::ImageSource;

new_key_type! {
    /// Identity of one issued load; stale once removed from its slot map
    pub struct LoadTicket;
}

/// Shared cancellation flag for an in-flight load
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result of a load, delivered back to the requester
#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: LoadTicket,
    pub result: Result<Arc<Bitmap>>,
    /// True when the bitmap came from the fastest in-memory cache tier
    pub from_memory_cache: bool,
}

type SuccessObserver = Box<dyn FnOnce(&Arc<Bitmap>) + Send>;

/// One-shot handle a loader uses to report its result
pub struct Completer {
    ticket: LoadTicket,
    token: CancelToken,
    sender: Sender<LoadCompletion>,
    observers: Vec<SuccessObserver>,
}

impl Completer {
    pub fn new(ticket: LoadTicket, token: CancelToken, sender: Sender<LoadCompletion>) -> Self {
        Self {
            ticket,
            token,
            sender,
            observers: Vec::new(),
        }
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `observer` with the bitmap if the load succeeds
    ///
    /// Observers run even when the request was cancelled; cache tiers use
    /// this to keep results that nobody is waiting for anymore.
    pub fn on_success(mut self, observer: impl FnOnce(&Arc<Bitmap>) + Send + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Deliver the result
    pub fn complete(self, result: Result<Arc<Bitmap>>, from_memory_cache: bool) {
        let Completer {
            ticket,
            sender,
            observers,
            ..
        } = self;

        if let Ok(bitmap) = &result {
            for observer in observers {
                observer(bitmap);
            }
        }

        let completion = LoadCompletion {
            ticket,
            result,
            from_memory_cache,
        };
        if sender.send(completion).is_err() {
            tracing::trace!(?ticket, "load completed after its receiver was dropped");
        }
    }
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("ticket", &self.ticket)
            .field("cancelled", &self.is_cancelled())
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// A request for one bitmap
#[derive(Debug)]
pub struct LoadRequest {
    /// Carousel index the request was issued for (informational)
    pub index: usize,
    pub source: ImageSource,
    pub completer: Completer,
}

impl LoadRequest {
    pub fn is_cancelled(&self) -> bool {
        self.completer.is_cancelled()
    }
}

/// Resolves an [`ImageSource`] to a bitmap asynchronously
///
/// Implementations own their caching and synchronization. They must not
/// block the caller on network or disk for longer than it takes to start
/// the work.
pub trait ImageLoader {
    fn load(&mut self, request: LoadRequest);
}

impl<L: ImageLoader + ?Sized> ImageLoader for Box<L> {
    fn load(&mut self, request: LoadRequest) {
        (**self).load(request)
    }
}

/// Create the channel completions travel on
pub fn completion_channel() -> (Sender<LoadCompletion>, Receiver<LoadCompletion>) {
    mpsc::channel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::sync::Mutex;

    #[test]
    fn test_completer_delivers_and_notifies() {
        let mut tickets: SlotMap<LoadTicket, ()> = SlotMap::with_key();
        let ticket = tickets.insert(());
        let (tx, rx) = completion_channel();

        let seen = Arc::new(Mutex::new(0u32));
        let seen_in_observer = Arc::clone(&seen);
        let completer = Completer::new(ticket, CancelToken::new(), tx).on_success(move |b| {
            *seen_in_observer.lock().unwrap() = b.width();
        });

        let bitmap = Bitmap::from_rgba(vec![0; 4 * 3], 3, 1).unwrap();
        completer.complete(Ok(Arc::new(bitmap)), false);

        let completion = rx.try_recv().unwrap();
        assert_eq!(completion.ticket, ticket);
        assert!(completion.result.is_ok());
        assert_eq!(*seen.lock().unwrap(), 3);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_complete_after_receiver_dropped() {
        let mut tickets: SlotMap<LoadTicket, ()> = SlotMap::with_key();
        let (tx, rx) = completion_channel();
        drop(rx);
        let completer = Completer::new(tickets.insert(()), CancelToken::new(), tx);
        // Must not panic
        completer.complete(Err(crate::ImageError::Cancelled), false);
    }
}
