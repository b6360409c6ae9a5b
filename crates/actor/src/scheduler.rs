use std::future::pending;
use std::sync::{Arc, Weak};

use tokio::select;
use tokio::sync::{mpsc, watch};

use crate::mailbox::{BoxedMessage, Mailbox};
use crate::{Actor, Message};

/// Drains the mailbox, handling one message at a time until the actor is
/// killed, or until the last handle is gone and the queue is empty.
pub async fn run_mailbox<S: Send + 'static>(
    mailbox: Weak<Mailbox<S>>,
    mut state: S,
    mut msg_rx: mpsc::UnboundedReceiver<BoxedMessage<S>>,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("mailbox opened");
    let mut handled: u64 = 0;
    loop {
        let msg = select! {
            biased;

            _ = wait_killed(&mut kill_rx) => {
                debug!("stop requested");
                break;
            }
            msg = msg_rx.recv() => {
                let Some(msg) = msg else {
                    break;
                };
                msg
            }
        };
        trace!("handling message: {msg:?}");

        // Holding a strong reference here would keep the actor alive by
        // itself. Messages that were queued before the last handle went
        // away still run, with a handle whose sends are discarded.
        let mailbox = mailbox.upgrade().unwrap_or_else(|| {
            trace!("no handles left, using a detached mailbox");
            Arc::new(Mailbox::detached())
        });
        msg.handle(&mut state, &Actor::from_mailbox(mailbox));
        handled += 1;
    }
    debug!(handled, "mailbox closed");
}

/// Resolves once `kill` was requested. Dropping the sender is not a kill;
/// the queue is drained first in that case.
async fn wait_killed(kill_rx: &mut watch::Receiver<bool>) {
    if kill_rx.wait_for(|killed| *killed).await.is_err() {
        pending::<()>().await;
    }
}
