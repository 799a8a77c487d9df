//! Change feed over the proxy's server-sent event stream.
//!
//! Connects to `GET {changes_url}` and forwards every `movies-changes` frame
//! whose data decodes as a [`ChangeEvent`]. When the stream ends or fails the
//! feed reconnects after a fixed backoff, until the sink is closed or the
//! subscription is dropped.

use std::time::Duration;

use futures::StreamExt;
use movie_types::{CHANGES_EVENT, ChangeEvent, MOVIES_TABLE};
use reqwest::{Client, header::ACCEPT};
use tokio::{sync::mpsc, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    config::PipelineConfig,
    error::{PipelineError, PipelineResult},
    live::{ChangeFeed, Subscription},
};

pub const DEFAULT_RECONNECT_BACKOFF: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct SseChangeFeed {
    http: Client,
    url: String,
    api_key: Option<String>,
    backoff: Duration,
}

/// Why a single connection ended.
enum StreamEnd {
    Disconnected,
    SinkClosed,
}

impl SseChangeFeed {
    pub fn new(cfg: &PipelineConfig) -> Result<Self, PipelineError> {
        // No total timeout: the response body is open-ended.
        let http = Client::builder().connect_timeout(cfg.timeout).build()?;
        Ok(Self {
            http,
            url: cfg.changes_url.clone(),
            api_key: cfg.api_key.clone(),
            backoff: DEFAULT_RECONNECT_BACKOFF,
        })
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    async fn run(self, sink: mpsc::Sender<ChangeEvent>) {
        loop {
            match self.stream_once(&sink).await {
                Ok(StreamEnd::SinkClosed) => break,
                Ok(StreamEnd::Disconnected) => info!(url = %self.url, "change stream ended"),
                Err(err) => warn!(url = %self.url, error = %err, "change stream failed"),
            }
            if sink.is_closed() {
                break;
            }
            sleep(self.backoff).await;
        }
        debug!("change stream task finished");
    }

    async fn stream_once(&self, sink: &mpsc::Sender<ChangeEvent>) -> Result<StreamEnd, reqwest::Error> {
        let mut req = self.http.get(&self.url).header(ACCEPT, "text/event-stream");
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key).header("apikey", key);
        }

        let resp = req.send().await?.error_for_status()?;
        info!(url = %self.url, "change stream connected");

        let mut body = resp.bytes_stream();
        let mut decoder = SseDecoder::default();

        loop {
            let chunk = tokio::select! {
                next = body.next() => match next {
                    Some(chunk) => chunk?,
                    None => return Ok(StreamEnd::Disconnected),
                },
                () = sink.closed() => return Ok(StreamEnd::SinkClosed),
            };

            for frame in decoder.feed(&chunk) {
                let Some(event) = decode_change(&frame) else {
                    continue;
                };
                if sink.send(event).await.is_err() {
                    return Ok(StreamEnd::SinkClosed);
                }
            }
        }
    }
}

impl ChangeFeed for SseChangeFeed {
    fn subscribe(&self, sink: mpsc::Sender<ChangeEvent>) -> PipelineResult<Subscription> {
        let task = tokio::spawn(self.clone().run(sink));
        Ok(Subscription::new(task))
    }
}

fn decode_change(frame: &SseFrame) -> Option<ChangeEvent> {
    if frame.event.as_deref() != Some(CHANGES_EVENT) {
        return None;
    }
    match serde_json::from_str::<ChangeEvent>(&frame.data) {
        Ok(event) if event.table == MOVIES_TABLE => Some(event),
        Ok(event) => {
            debug!(table = %event.table, "ignoring change for another table");
            None
        }
        Err(err) => {
            warn!(error = %err, "dropping malformed change event");
            None
        }
    }
}

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

/// Incremental `text/event-stream` parser.
///
/// Accepts arbitrary chunk boundaries, `\n` or `\r\n` line endings, comment
/// lines and multi-line data.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Consumes a chunk and returns the frames it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(frame) = self.line(&String::from_utf8_lossy(&line)) {
                frames.push(frame);
            }
        }
        frames
    }

    fn line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            if self.data.is_empty() {
                self.event = None;
                return None;
            }
            return Some(SseFrame {
                event: self.event.take(),
                data: std::mem::take(&mut self.data).join("\n"),
            });
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use api::core::app_state::AppState;
    use axum::{Router, http::header::CONTENT_TYPE, routing::get};
    use movie_types::{ChangeKind, Movie};
    use tokio::{net::TcpListener, time::timeout};

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn dark_knight(rating: f64) -> Movie {
        let mut m = Movie::new(2, "The Dark Knight");
        m.rating = rating;
        m
    }

    #[test]
    fn decoder_handles_split_chunks_and_comments() {
        let mut dec = SseDecoder::default();

        assert!(dec.feed(b": keep-alive\n\nevent: movies-ch").is_empty());
        let frames = dec.feed(b"anges\r\ndata: {\"a\":\r\ndata: 1}\r\n\r\n");

        assert_eq!(
            frames,
            vec![SseFrame {
                event: Some(CHANGES_EVENT.into()),
                data: "{\"a\":\n1}".into(),
            }]
        );
    }

    #[test]
    fn decoder_resets_event_name_between_frames() {
        let mut dec = SseDecoder::default();
        let frames = dec.feed(b"event: a\ndata: 1\n\ndata: 2\n\n");

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event.as_deref(), Some("a"));
        assert_eq!(frames[1].event, None);
        assert_eq!(frames[1].data, "2");
    }

    #[test]
    fn only_well_formed_movie_changes_are_forwarded() {
        let good = serde_json::to_string(&ChangeEvent::new(ChangeKind::Update, dark_knight(9.1))).unwrap();

        let frame = |event: Option<&str>, data: &str| SseFrame {
            event: event.map(str::to_string),
            data: data.to_string(),
        };

        assert!(decode_change(&frame(Some(CHANGES_EVENT), &good)).is_some());
        assert!(decode_change(&frame(None, &good)).is_none());
        assert!(decode_change(&frame(Some(CHANGES_EVENT), "{\"eventType\":\"UPDATE\"}")).is_none());
        assert!(decode_change(&frame(Some(CHANGES_EVENT), "not json")).is_none());
    }

    #[tokio::test]
    async fn reconnects_after_stream_ends() {
        let event = serde_json::to_string(&ChangeEvent::new(ChangeKind::Insert, dark_knight(9.0))).unwrap();
        let body = format!(
            ": hi\n\nevent: other\ndata: x\n\nevent: {CHANGES_EVENT}\ndata: {event}\n\n"
        );
        let app = Router::new().route(
            "/movies/changes",
            get(move || {
                let body = body.clone();
                async move { ([(CONTENT_TYPE, "text/event-stream")], body) }
            }),
        );
        let base = serve(app).await;

        let feed = SseChangeFeed::new(&PipelineConfig::new(&base))
            .unwrap()
            .with_backoff(Duration::from_millis(10));
        let (tx, mut rx) = mpsc::channel(8);
        let _sub = feed.subscribe(tx).unwrap();

        for _ in 0..2 {
            let got = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
            assert_eq!(got.new.id, 2);
        }
    }

    #[tokio::test]
    async fn receives_upserts_from_the_movie_table() {
        let state = Arc::new(AppState::new(None, vec!["*".into()]));
        let base = serve(api::router(state.clone())).await;

        let feed = SseChangeFeed::new(&PipelineConfig::new(&base)).unwrap();
        let (tx, mut rx) = mpsc::channel(8);
        let sub = feed.subscribe(tx).unwrap();

        // The stream may not be attached yet; keep writing until a frame arrives.
        let received = timeout(Duration::from_secs(5), async {
            loop {
                state.movies.upsert(dark_knight(9.1)).await;
                if let Ok(Some(event)) = timeout(Duration::from_millis(100), rx.recv()).await {
                    return event;
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(received.new.id, 2);
        assert_eq!(received.new.rating, 9.1);
        sub.unsubscribe();
    }
}
