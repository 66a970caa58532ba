//! Stub server helpers shared by the network tests

#![allow(dead_code)]

use std::fmt;
use std::io::Write;
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver, Sender};
use kvdb::protocol::{read_command, write_response};
use kvdb::{ClientConfig, Command};
use tracing::field::{Field, Visit};
use tracing::{Event as TraceEvent, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// How long a test waits for the stub server to report something
pub const WAIT: Duration = Duration::from_secs(5);

/// What the stub server observed
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Accepted(usize),
    Command(Command),
    Closed(usize),
}

/// A loopback server that hands each accepted connection to a handler
pub struct StubServer {
    pub addr: String,
    events: Receiver<Event>,
    accepts: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    /// Accept `connections` connections one after another
    pub fn start<F>(connections: usize, handler: F) -> Self
    where
        F: Fn(usize, TcpStream, &Sender<Event>) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (tx, rx) = unbounded();
        let accepts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&accepts);

        let handle = thread::spawn(move || {
            for index in 0..connections {
                let (stream, _) = match listener.accept() {
                    Ok(accepted) => accepted,
                    Err(_) => return,
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(Event::Accepted(index));
                handler(index, stream, &tx);
                let _ = tx.send(Event::Closed(index));
            }
        });

        Self {
            addr,
            events: rx,
            accepts,
            handle: Some(handle),
        }
    }

    /// Next event, failing the test if none arrives in time
    pub fn next_event(&self) -> Event {
        self.events
            .recv_timeout(WAIT)
            .expect("stub server reported nothing")
    }

    /// Next command the server read, skipping connection events
    pub fn next_command(&self) -> Command {
        loop {
            if let Event::Command(command) = self.next_event() {
                return command;
            }
        }
    }

    /// Connections accepted so far
    pub fn accepts(&self) -> usize {
        self.accepts.load(Ordering::SeqCst)
    }

    /// Wait for the server thread to finish all its connections
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

/// Config with timeouts so a broken test fails instead of hanging
pub fn test_config(addr: &str) -> ClientConfig {
    ClientConfig::builder()
        .addr(addr)
        .read_timeout_ms(5000)
        .write_timeout_ms(5000)
        .build()
}

/// An address nothing is listening on
pub fn dead_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}

/// Read one command and report it
pub fn read_one(stream: &mut TcpStream, events: &Sender<Event>) -> Option<Command> {
    let command = read_command(stream).ok()?;
    let _ = events.send(Event::Command(command.clone()));
    Some(command)
}

/// Serve requests until `exit` or disconnect, answering with `reply`
pub fn serve_with<R>(mut stream: TcpStream, events: &Sender<Event>, reply: R)
where
    R: Fn(&Command) -> Vec<u8>,
{
    while let Some(command) = read_one(&mut stream, events) {
        if command == Command::Exit {
            break;
        }
        if write_response(&mut stream, &reply(&command)).is_err() {
            break;
        }
    }
}

/// Answer every `get` with `hello` and every `set` with `OK`
pub fn serve_hello(_index: usize, stream: TcpStream, events: &Sender<Event>) {
    serve_with(stream, events, |command| match command {
        Command::Get { .. } => b"hello".to_vec(),
        _ => b"OK".to_vec(),
    });
}

/// Read one request, write `raw` bytes verbatim, then close
pub fn reply_raw(raw: Vec<u8>) -> impl Fn(usize, TcpStream, &Sender<Event>) + Send + 'static {
    move |_index: usize, mut stream: TcpStream, events: &Sender<Event>| {
        if read_one(&mut stream, events).is_some() {
            let _ = stream.write_all(&raw);
            let _ = stream.flush();
        }
        let _ = stream.shutdown(Shutdown::Write);
    }
}

/// A response frame header declaring `len` bytes
pub fn length_prefix(len: i64) -> Vec<u8> {
    len.to_le_bytes().to_vec()
}

// =============================================================================
// Log Capture
// =============================================================================

/// Counts warn-level log lines whose message starts with a prefix
#[derive(Clone)]
pub struct WarnCounter {
    prefix: &'static str,
    count: Arc<AtomicUsize>,
}

impl WarnCounter {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Run `f` with this counter installed as the thread's subscriber
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &TraceEvent<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if visitor.0.starts_with(self.prefix) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
