use std::{thread::JoinHandle, time::Duration};

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::driver::novation::launchpad::{
    button::ButtonAddress, color::Color, packet::ButtonEvent, Session,
};

#[derive(Debug, Clone, Copy)]
pub enum Command {
    Light { address: ButtonAddress, color: Color },
}

#[derive(Debug, Clone, Copy)]
pub enum Event {
    Button(ButtonEvent),
}

pub fn spawn_thread(
    ct: CancellationToken,
    device: usize,
    client_name: String,
    cmd_rx: flume::Receiver<Command>,
    evt_tx: flume::Sender<Event>,
) -> JoinHandle<anyhow::Result<()>> {
    std::thread::spawn(move || {
        // the transport's delivery thread must not block, so events are
        // dropped rather than waited on when the queue is full
        let mut session = Session::open(device, &client_name, move |evt| {
            if let Err(flume::TrySendError::Full(evt)) = evt_tx.try_send(Event::Button(evt)) {
                warn!("event queue full, dropping {evt:?}");
            }
        })
        .with_context(|| format!("failed to open launchpad {device}"))?;

        debug!("opened launchpad {:?}", session.info().name);

        session.clear().context("failed to clear launchpad")?;

        while !ct.is_cancelled() {
            // idle until we get a new command, but wake up every 20ms to
            // check for cancellation
            match cmd_rx.recv_timeout(Duration::from_millis(20)) {
                Ok(mut cmd) => {
                    // then drain everything that is already queued
                    loop {
                        trace!("executing command {cmd:?}");

                        match cmd {
                            Command::Light { address, color } => session.light(address, color)?,
                        }

                        cmd = match cmd_rx.try_recv() {
                            Ok(cmd) => cmd,
                            Err(_) => break,
                        };
                    }
                }
                Err(flume::RecvTimeoutError::Timeout) => {}
                Err(flume::RecvTimeoutError::Disconnected) => break,
            };
        }

        session.clear().context("failed to clear launchpad")?;

        debug!("exiting controller loop");

        Ok(())
    })
}
