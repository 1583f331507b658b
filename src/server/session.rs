use super::types::ErrorResponse;
use crate::{
    Error, Result,
    model::{FeatureRecord, PredictionOutcome, PredictionService},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One inbound frame as seen by the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Text(String),
    Binary(Vec<u8>),
    /// Ping or pong; the transport answers these itself.
    Control,
    /// Close frame or end of stream.
    Closed,
}

/// Bidirectional message transport a session runs over.
#[async_trait]
pub trait FrameChannel: Send {
    async fn next_frame(&mut self) -> Result<Inbound>;

    async fn send_text(&mut self, text: String) -> Result<()>;

    async fn close(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Receiving,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Accepted,
    FrameAnswered,
    PeerDisconnected,
    ChannelFailed,
}

pub struct SessionStateMachine {
    state: SessionState,
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::Open,
        }
    }

    pub fn current_state(&self) -> SessionState {
        self.state
    }

    pub fn transition(&mut self, event: SessionEvent) -> Result<SessionState> {
        let new_state = match (self.state, event) {
            (SessionState::Open, SessionEvent::Accepted) => SessionState::Receiving,
            (SessionState::Receiving, SessionEvent::FrameAnswered) => SessionState::Receiving,
            (SessionState::Receiving, SessionEvent::PeerDisconnected)
            | (SessionState::Receiving, SessionEvent::ChannelFailed) => SessionState::Closing,
            (current, event) => {
                return Err(Error::Session {
                    current: format!("{:?}", current),
                    event: format!("{:?}", event),
                });
            }
        };

        if new_state != self.state {
            debug!(
                "Session state transition: {:?} -> {:?} (event: {:?})",
                self.state, new_state, event
            );
        }

        self.state = new_state;
        Ok(new_state)
    }

    pub fn is_terminal(&self) -> bool {
        self.state == SessionState::Closing
    }
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub predictions: usize,
    pub errors: usize,
}

/// Runs the parse, validate and predict pipeline for one text frame.
pub fn handle_frame(service: &PredictionService, text: &str) -> Result<PredictionOutcome> {
    let record = FeatureRecord::from_json(text)?;
    service.predict(&record)
}

pub struct StreamingSession<C: FrameChannel> {
    id: Uuid,
    channel: C,
    service: Arc<PredictionService>,
    fsm: SessionStateMachine,
    summary: SessionSummary,
}

impl<C: FrameChannel> StreamingSession<C> {
    pub fn new(channel: C, service: Arc<PredictionService>) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
            service,
            fsm: SessionStateMachine::new(),
            summary: SessionSummary::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Serves frames until the peer leaves or the channel breaks.
    ///
    /// Per-frame failures are answered on the channel and never end the
    /// session. Closing is best effort.
    pub async fn run(mut self) -> SessionSummary {
        info!("Streaming session {} opened", self.id);

        if let Err(e) = self.receive_loop().await {
            warn!("Streaming session {} ended with error: {}", self.id, e);
        }

        if let Err(e) = self.channel.close().await {
            debug!("Ignoring close error for session {}: {}", self.id, e);
        }

        info!(
            "Streaming session {} closed after {} predictions and {} errors",
            self.id, self.summary.predictions, self.summary.errors
        );
        self.summary
    }

    async fn receive_loop(&mut self) -> Result<()> {
        self.fsm.transition(SessionEvent::Accepted)?;

        while !self.fsm.is_terminal() {
            let frame = match self.channel.next_frame().await {
                Ok(frame) => frame,
                Err(e) => {
                    self.fsm.transition(SessionEvent::ChannelFailed)?;
                    return Err(e);
                }
            };

            let result = match frame {
                Inbound::Text(text) => handle_frame(&self.service, &text),
                Inbound::Binary(bytes) => Err(Error::parse(format!(
                    "expected a text frame, got {} binary bytes",
                    bytes.len()
                ))),
                Inbound::Control => continue,
                Inbound::Closed => {
                    debug!("Peer closed session {}", self.id);
                    self.fsm.transition(SessionEvent::PeerDisconnected)?;
                    continue;
                }
            };

            let reply = self.reply_for(result)?;
            if let Err(e) = self.channel.send_text(reply).await {
                self.fsm.transition(SessionEvent::ChannelFailed)?;
                return Err(e);
            }
            self.fsm.transition(SessionEvent::FrameAnswered)?;
        }

        Ok(())
    }

    fn reply_for(&mut self, result: Result<PredictionOutcome>) -> Result<String> {
        let reply = match result {
            Ok(outcome) => {
                self.summary.predictions += 1;
                serde_json::to_string(&outcome)?
            }
            Err(e) => {
                self.summary.errors += 1;
                debug!("Session {} frame rejected ({}): {}", self.id, e.kind(), e);
                serde_json::to_string(&ErrorResponse::from(&e))?
            }
        };
        Ok(reply)
    }
}
