use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

use crate::error::RemoteError;
use crate::model::{CodingProblem, ExecutionReport, Question};

/// Response from a worker thread, tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct RemoteReply {
    pub ticket: u64,
    pub payload: ReplyPayload,
}

#[derive(Debug)]
pub enum ReplyPayload {
    Aptitude {
        company: String,
        result: Result<Vec<Question>, RemoteError>,
    },
    Coding {
        topic: String,
        result: Result<Vec<CodingProblem>, RemoteError>,
    },
    Execution(Result<ExecutionReport, RemoteError>),
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
    Remote(RemoteReply),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            if input_tx.send(AppEvent::Key(key)).is_err() {
                                return;
                            }
                        }
                        Ok(Event::Resize(w, h)) => {
                            if input_tx.send(AppEvent::Resize(w, h)).is_err() {
                                return;
                            }
                        }
                        _ => {}
                    }
                } else if input_tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for worker threads to post remote replies on.
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
