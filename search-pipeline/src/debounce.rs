//! Debounce primitive.
//!
//! A value pushed into [`Debouncer`] is emitted on the output channel only
//! after no newer value arrived for the full delay. Every push restarts the
//! timer and replaces the pending value, so intermediate values never leave.
//! Dropping (or [`Debouncer::cancel`]ing) the debouncer discards whatever is
//! still pending.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep},
};

/// Settled values buffered between the debouncer and its consumer.
const OUTPUT_BUFFER: usize = 8;

pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the timer task on the current runtime.
    ///
    /// Returns the debouncer and the receiver of settled values.
    pub fn new(delay: Duration) -> (Self, mpsc::Receiver<T>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output, output_rx) = mpsc::channel(OUTPUT_BUFFER);
        let task = tokio::spawn(run(delay, input_rx, output));
        (Self { input, task }, output_rx)
    }

    /// Feeds a new input value and restarts the delay.
    ///
    /// Returns `false` if the debouncer has already been torn down.
    pub fn push(&self, value: T) -> bool {
        self.input.send(value).is_ok()
    }

    /// Stops the timer; a pending value is never emitted.
    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(delay: Duration, mut input: mpsc::UnboundedReceiver<T>, output: mpsc::Sender<T>) {
    let mut pending: Option<T> = None;
    let timer = sleep(delay);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            next = input.recv() => match next {
                Some(value) => {
                    pending = Some(value);
                    timer.as_mut().reset(Instant::now() + delay);
                }
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    if output.send(value).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}
