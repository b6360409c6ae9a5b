use std::fmt::Debug;

use tokio::sync::{mpsc, watch};

use crate::{Actor, ActorDeadError};

/// Object-safe form of [`Message`], so that messages of different types
/// can share one mailbox queue.
pub trait BoxMessage<S>: Send + Debug + 'static {
    /// Handles the boxed message.
    fn handle_box(self: Box<Self>, state: &mut S, handle: &Actor<S>);
}

/// A message an actor with state `S` knows how to handle.
///
/// Handlers run to completion on the actor's task with exclusive access
/// to the state; no other message is handled in between. Long running
/// work must be spawned and report back with another message.
pub trait Message<S>: BoxMessage<S> {
    /// Handles the message.
    fn handle(self, state: &mut S, handle: &Actor<S>);
}

impl<S, M: Message<S>> BoxMessage<S> for M {
    #[inline]
    fn handle_box(self: Box<Self>, state: &mut S, handle: &Actor<S>) {
        (*self).handle(state, handle)
    }
}

impl<S, M: Message<S> + ?Sized> Message<S> for Box<M> {
    #[inline]
    fn handle(self, state: &mut S, handle: &Actor<S>) {
        self.handle_box(state, handle)
    }
}

pub type BoxedMessage<S> = Box<dyn Message<S>>;

pub struct MailboxParts<S> {
    pub mailbox: Mailbox<S>,
    pub msg_rx: mpsc::UnboundedReceiver<BoxedMessage<S>>,
    pub kill_rx: watch::Receiver<bool>,
}

/// Sending half of an actor. Dropping the last one closes the queue and
/// lets the mailbox loop finish.
pub struct Mailbox<S> {
    msg_tx: mpsc::UnboundedSender<BoxedMessage<S>>,
    kill_tx: watch::Sender<bool>,
}

impl<S: Send + 'static> Mailbox<S> {
    #[inline]
    pub fn new() -> MailboxParts<S> {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = watch::channel(false);
        MailboxParts {
            mailbox: Mailbox { msg_tx, kill_tx },
            msg_rx,
            kill_rx,
        }
    }

    /// A mailbox nobody listens to. Posting to it always fails.
    pub fn detached() -> Self {
        let MailboxParts { mailbox, .. } = Self::new();
        mailbox
    }

    #[inline]
    pub fn post(&self, msg: BoxedMessage<S>) -> Result<(), ActorDeadError> {
        self.msg_tx.send(msg).map_err(|_| ActorDeadError)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.msg_tx.is_closed()
    }

    #[inline]
    pub fn kill(&self) {
        self.kill_tx.send_replace(true);
    }
}
