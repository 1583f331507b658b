use async_trait::async_trait;
use health_monitor::{
    Error, Result,
    model::{Classifier, FeatureTable},
    server::session::{FrameChannel, Inbound},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::mpsc;

/// Always answers with the same label.
pub struct FixedClassifier(pub i64);

impl Classifier for FixedClassifier {
    fn classify(&self, table: &FeatureTable) -> Result<Vec<i64>> {
        Ok(vec![self.0; table.len()])
    }
}

/// Label 1 when age reaches the threshold, so replies can be traced to inputs.
pub struct AgeThresholdClassifier {
    pub threshold: f64,
}

impl Classifier for AgeThresholdClassifier {
    fn classify(&self, table: &FeatureTable) -> Result<Vec<i64>> {
        Ok(table
            .rows()
            .iter()
            .map(|row| i64::from(row[0] >= self.threshold))
            .collect())
    }
}

/// Fails every call with the configured error.
pub struct FailingClassifier {
    pub message: String,
}

impl FailingClassifier {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Classifier for FailingClassifier {
    fn classify(&self, _table: &FeatureTable) -> Result<Vec<i64>> {
        Err(Error::model(self.message.clone()))
    }
}

/// Returns a fixed label list regardless of the input shape.
pub struct ScriptedClassifier(pub Vec<i64>);

impl Classifier for ScriptedClassifier {
    fn classify(&self, _table: &FeatureTable) -> Result<Vec<i64>> {
        Ok(self.0.clone())
    }
}

/// Records every table it is asked to classify.
#[derive(Default)]
pub struct RecordingClassifier {
    pub tables: Arc<Mutex<Vec<FeatureTable>>>,
}

impl Classifier for RecordingClassifier {
    fn classify(&self, table: &FeatureTable) -> Result<Vec<i64>> {
        self.tables.lock().unwrap().push(table.clone());
        Ok(vec![0; table.len()])
    }
}

/// In-memory frame channel driven by a [`ChannelPeer`].
pub struct MockChannel {
    inbound: mpsc::UnboundedReceiver<Result<Inbound>>,
    outbound: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
    pub fail_send: bool,
    pub fail_close: bool,
}

/// The client side of a [`MockChannel`].
pub struct ChannelPeer {
    pub to_server: mpsc::UnboundedSender<Result<Inbound>>,
    pub from_server: mpsc::UnboundedReceiver<String>,
    pub closed: Arc<AtomicBool>,
}

impl ChannelPeer {
    pub fn send_text(&self, text: impl Into<String>) {
        self.to_server.send(Ok(Inbound::Text(text.into()))).unwrap();
    }

    pub fn send(&self, frame: Result<Inbound>) {
        self.to_server.send(frame).unwrap();
    }

    pub async fn reply(&mut self) -> serde_json::Value {
        let text = self.from_server.recv().await.expect("session sent no reply");
        serde_json::from_str(&text).unwrap()
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub fn mock_channel() -> (MockChannel, ChannelPeer) {
    let (to_server, inbound) = mpsc::unbounded_channel();
    let (outbound, from_server) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));

    (
        MockChannel {
            inbound,
            outbound,
            closed: closed.clone(),
            fail_send: false,
            fail_close: false,
        },
        ChannelPeer {
            to_server,
            from_server,
            closed,
        },
    )
}

#[async_trait]
impl FrameChannel for MockChannel {
    async fn next_frame(&mut self) -> Result<Inbound> {
        // A dropped peer behaves like a connection that went away.
        match self.inbound.recv().await {
            Some(frame) => frame,
            None => Ok(Inbound::Closed),
        }
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.fail_send {
            return Err(Error::channel("send failed: broken pipe"));
        }
        self.outbound
            .send(text)
            .map_err(|_| Error::channel("send failed: peer gone"))
    }

    async fn close(&mut self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(Error::channel("close failed: already closed"));
        }
        Ok(())
    }
}
