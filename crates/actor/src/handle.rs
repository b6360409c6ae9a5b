use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::Instrument;

use crate::mailbox::{Mailbox, MailboxParts};
use crate::scheduler::run_mailbox;
use crate::{ActorDeadError, Message};

/// Handle to a running actor.
///
/// Handles are cheap to clone. The actor keeps running while at least one
/// handle exists, or until [`Actor::kill`] is called.
pub struct Actor<S> {
    mailbox: Arc<Mailbox<S>>,
}

impl<S: Send + 'static> Actor<S> {
    /// Spawns the mailbox loop for `state` on the current tokio runtime.
    ///
    /// Prefer the wrapper generated by [`crate::define_actor`] over calling
    /// this directly.
    pub fn spawn(state: S, label: &str) -> Self {
        let MailboxParts {
            mailbox,
            msg_rx,
            kill_rx,
        } = Mailbox::new();
        let mailbox = Arc::new(mailbox);
        tokio::spawn(
            run_mailbox(Arc::downgrade(&mailbox), state, msg_rx, kill_rx)
                .instrument(debug_span!("actor", label)),
        );
        Self { mailbox }
    }

    #[inline]
    pub(crate) fn from_mailbox(mailbox: Arc<Mailbox<S>>) -> Self {
        Self { mailbox }
    }

    /// Posts a message without waiting for it to be handled.
    #[inline]
    pub fn send<M: Message<S>>(&self, msg: M) -> Result<(), ActorDeadError> {
        self.mailbox.post(Box::new(msg))
    }

    /// Posts a message carrying a reply channel and waits for the reply.
    ///
    /// Fails if the actor is gone, or if the handler dropped the sender
    /// without replying.
    pub async fn ask<R, M, F>(&self, make_msg: F) -> Result<R, ActorDeadError>
    where
        F: FnOnce(oneshot::Sender<R>) -> M,
        M: Message<S>,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(make_msg(reply_tx))?;
        reply_rx.await.map_err(|_| ActorDeadError)
    }

    /// Returns `false` once the mailbox loop has stopped.
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.mailbox.is_closed()
    }

    /// Asks the actor to stop. Messages already queued may be dropped.
    #[inline]
    pub fn kill(&self) {
        self.mailbox.kill();
    }
}

impl<S> Clone for Actor<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}
