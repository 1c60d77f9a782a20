// crates/viewer/src/actor.rs
//! The shell's event loop.
//!
//! A single task owns the [`ViewerShell`]. Requests arrive over an mpsc
//! channel; every new board is published on a watch channel so any number of
//! readers (HTTP handlers, SSE streams) see the latest snapshot.

use std::sync::Arc;
use std::time::Duration;
use taskmgr_search::Debouncer;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::render::BoardSnapshot;
use crate::shell::ViewerShell;

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Error)]
#[error("viewer shell has stopped")]
pub struct ShellClosed;

#[derive(Debug)]
pub enum ShellCommand {
    /// Raw keystroke text; debounced before it is applied.
    Input(String),
    /// Apply immediately and record in history.
    Submit(String, oneshot::Sender<()>),
    Clear(oneshot::Sender<()>),
    SetFullText(bool, oneshot::Sender<()>),
    /// Unconditional reload; acknowledged once the new board is published.
    Refresh(oneshot::Sender<()>),
    History(oneshot::Sender<Vec<String>>),
}

/// Cloneable handle to a running shell.
#[derive(Debug, Clone)]
pub struct ShellHandle {
    commands: mpsc::Sender<ShellCommand>,
    board: watch::Receiver<Arc<BoardSnapshot>>,
}

impl ShellHandle {
    /// Spawn the event loop. The first board is published after the initial
    /// reload completes.
    pub fn spawn(shell: ViewerShell) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (board_tx, board_rx) = watch::channel(Arc::new(BoardSnapshot::empty()));
        let task = tokio::spawn(run(shell, rx, board_tx));
        (
            Self {
                commands: tx,
                board: board_rx,
            },
            task,
        )
    }

    async fn send(&self, command: ShellCommand) -> Result<(), ShellClosed> {
        self.commands.send(command).await.map_err(|_| ShellClosed)
    }

    pub async fn input(&self, raw: impl Into<String>) -> Result<(), ShellClosed> {
        self.send(ShellCommand::Input(raw.into())).await
    }

    /// Apply a query now, waiting until the filtered board is published.
    pub async fn submit(&self, raw: impl Into<String>) -> Result<(), ShellClosed> {
        let (ack, done) = oneshot::channel();
        self.send(ShellCommand::Submit(raw.into(), ack)).await?;
        done.await.map_err(|_| ShellClosed)
    }

    pub async fn clear(&self) -> Result<(), ShellClosed> {
        let (ack, done) = oneshot::channel();
        self.send(ShellCommand::Clear(ack)).await?;
        done.await.map_err(|_| ShellClosed)
    }

    /// Toggle full-text mode, waiting for any content load to finish.
    pub async fn set_full_text(&self, enabled: bool) -> Result<(), ShellClosed> {
        let (ack, done) = oneshot::channel();
        self.send(ShellCommand::SetFullText(enabled, ack)).await?;
        done.await.map_err(|_| ShellClosed)
    }

    pub async fn refresh(&self) -> Result<(), ShellClosed> {
        let (ack, done) = oneshot::channel();
        self.send(ShellCommand::Refresh(ack)).await?;
        done.await.map_err(|_| ShellClosed)
    }

    pub async fn history(&self) -> Result<Vec<String>, ShellClosed> {
        let (reply, answer) = oneshot::channel();
        self.send(ShellCommand::History(reply)).await?;
        answer.await.map_err(|_| ShellClosed)
    }

    /// Latest published board.
    pub fn board(&self) -> Arc<BoardSnapshot> {
        self.board.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.board.clone()
    }
}

fn ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

fn publish(shell: &mut ViewerShell, board: &watch::Sender<Arc<BoardSnapshot>>) {
    let snapshot = shell.snapshot();
    debug!(revision = snapshot.revision, visible = snapshot.search.visible_count, "Publishing board");
    board.send_replace(Arc::new(snapshot));
}

async fn run(
    mut shell: ViewerShell,
    mut commands: mpsc::Receiver<ShellCommand>,
    board: watch::Sender<Arc<BoardSnapshot>>,
) {
    shell.reload().await;
    publish(&mut shell, &board);

    let mut debouncer = Debouncer::default();
    let mut period = shell.refresh_interval();
    let mut auto_reload = ticker(period);

    loop {
        let current = shell.refresh_interval();
        if current != period {
            period = current;
            auto_reload = ticker(period);
        }
        let deadline = debouncer.deadline();
        let was_active = shell.auto_reload_active();
        let mut ack = None;

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    ShellCommand::Input(raw) => {
                        debouncer.push(raw, Instant::now());
                        continue;
                    }
                    ShellCommand::Submit(raw, done) => {
                        debouncer.cancel();
                        shell.submit(&raw);
                        ack = Some(done);
                    }
                    ShellCommand::Clear(done) => {
                        debouncer.cancel();
                        shell.clear();
                        ack = Some(done);
                    }
                    ShellCommand::SetFullText(enabled, ack) => {
                        shell.set_full_text(enabled).await;
                        publish(&mut shell, &board);
                        let _ = ack.send(());
                        continue;
                    }
                    ShellCommand::Refresh(ack) => {
                        shell.reload().await;
                        publish(&mut shell, &board);
                        let _ = ack.send(());
                        continue;
                    }
                    ShellCommand::History(reply) => {
                        let _ = reply.send(shell.history().to_vec());
                        continue;
                    }
                }
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                match debouncer.take_due(Instant::now()) {
                    Some(raw) => shell.set_query(&raw),
                    None => continue,
                }
            }
            _ = auto_reload.tick(), if was_active => {
                debug!("Auto reload");
                shell.reload().await;
                publish(&mut shell, &board);
                continue;
            }
        }

        // A query change: republish, and restart the reload clock when the
        // filter was just cleared.
        publish(&mut shell, &board);
        if !was_active && shell.auto_reload_active() {
            auto_reload.reset();
        }
        if let Some(done) = ack {
            let _ = done.send(());
        }
    }

    info!("Viewer shell stopped");
}
