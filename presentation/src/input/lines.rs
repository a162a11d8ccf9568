//! Line reader shared by the turn prompt and the confirmation prompt.
//!
//! A dedicated thread owns the blocking reader and forwards lines over a
//! channel. Dropping a pending `next_line` (e.g. when a decision times out)
//! loses nothing: the next line goes to whoever asks next.

use std::io::BufRead;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

pub struct LineSource {
    receiver: Mutex<mpsc::Receiver<String>>,
}

impl LineSource {
    /// Lines from standard input
    pub fn stdin() -> Self {
        Self::from_reader(std::io::BufReader::new(std::io::stdin()))
    }

    /// Lines from any blocking reader, trailing newline stripped.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than ending input.
    pub fn from_reader<R: BufRead + Send + 'static>(mut reader: R) -> Self {
        let (sender, receiver) = mpsc::channel(16);
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        warn!(error = %e, "Failed to read input");
                        break;
                    }
                }
                if sender.blocking_send(decode_line(&buf)).is_err() {
                    break;
                }
            }
            debug!("Input closed");
        });
        Self {
            receiver: Mutex::new(receiver),
        }
    }

    /// Next line, or `None` at end of input
    pub async fn next_line(&self) -> Option<String> {
        self.receiver.lock().await.recv().await
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
