use super::session::{FrameChannel, Inbound};
use crate::{Error, Result};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};

#[async_trait]
impl FrameChannel for WebSocket {
    async fn next_frame(&mut self) -> Result<Inbound> {
        match self.recv().await {
            None => Ok(Inbound::Closed),
            Some(Ok(Message::Text(text))) => Ok(Inbound::Text(text)),
            Some(Ok(Message::Binary(bytes))) => Ok(Inbound::Binary(bytes)),
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => Ok(Inbound::Control),
            Some(Ok(Message::Close(_))) => Ok(Inbound::Closed),
            Some(Err(e)) => Err(Error::channel(format!("receive failed: {}", e))),
        }
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        self.send(Message::Text(text))
            .await
            .map_err(|e| Error::channel(format!("send failed: {}", e)))
    }

    // Sink close flushes a pending close reply when the peer started the
    // handshake, and starts one otherwise. A second Close frame is refused.
    async fn close(&mut self) -> Result<()> {
        <WebSocket as futures_util::SinkExt<Message>>::close(self)
            .await
            .map_err(|e| Error::channel(format!("close failed: {}", e)))
    }
}
