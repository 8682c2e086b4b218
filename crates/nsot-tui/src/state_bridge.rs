//! State bridge: connects the [`Controller`] and forwards every store
//! snapshot and connection-state change into the TUI action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use nsot_core::{ConnectionState, Controller, Route};

use crate::action::Action;

/// Connect, mount `start`, then forward until cancelled.
pub async fn run_state_bridge(
    controller: Controller,
    start: Route,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut snapshots = controller.store().subscribe();
    let mut conn_state = controller.connection_state();

    let _ = action_tx.send(Action::StateChanged(snapshots.current().clone()));

    if let Err(e) = controller.connect().await {
        warn!(error = %e, "failed to connect to NSoT");
        let _ = action_tx.send(Action::Connection(ConnectionState::Failed(e.to_string())));
        return;
    }
    let _ = action_tx.send(Action::Connection(ConnectionState::Connected));

    // Mount runs on its own task so a slow first page never delays
    // forwarding the loading flags it dispatches.
    let mount_controller = controller.clone();
    tokio::spawn(async move {
        if let Err(e) = mount_controller.navigate(start).await {
            debug!(error = %e, "initial mount failed");
        }
    });

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(state) = snapshots.changed() => {
                let _ = action_tx.send(Action::StateChanged(state));
            }
            Ok(()) = conn_state.changed() => {
                let state = conn_state.borrow_and_update().clone();
                let _ = action_tx.send(Action::Connection(state));
            }
        }
    }

    controller.disconnect().await;
    debug!("state bridge shut down");
}
