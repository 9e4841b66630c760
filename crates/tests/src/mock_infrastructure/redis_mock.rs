//! Mock Redis Server for Testing
//!
//! Speaks just enough RESP2 for `RedisCache`: `PING`, `GET` and `SET`, with every other
//! command acknowledged with `+OK`. Data commands can be switched to stall or to fail after the
//! client has connected.

use std::{collections::HashMap, io, net::SocketAddr, sync::Arc};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::{broadcast, RwLock},
    task::JoinHandle,
};

/// How the server answers `GET` and `SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataCommandMode {
    /// Serve from the in-memory store.
    #[default]
    Healthy,
    /// Never answer.
    Stall,
    /// Answer with a `-ERR` reply.
    Error,
}

type Store = Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>;
type CommandLog = Arc<RwLock<Vec<Vec<String>>>>;

/// A mock Redis server bound to a random local port.
pub struct MockRedisServer {
    addr: SocketAddr,
    store: Store,
    commands: CommandLog,
    mode: Arc<RwLock<DataCommandMode>>,
    server_handle: JoinHandle<()>,
    shutdown_tx: broadcast::Sender<()>,
}

impl MockRedisServer {
    /// Starts the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot bind to a local port.
    pub async fn new() -> Result<Self, io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let store = Store::default();
        let commands = CommandLog::default();
        let mode = Arc::new(RwLock::new(DataCommandMode::Healthy));
        let (shutdown_tx, _) = broadcast::channel(1);

        let server_handle = Self::spawn_server(
            listener,
            store.clone(),
            commands.clone(),
            mode.clone(),
            shutdown_tx.subscribe(),
        );

        Ok(Self { addr, store, commands, mode, server_handle, shutdown_tx })
    }

    fn spawn_server(
        listener: TcpListener,
        store: Store,
        commands: CommandLog,
        mode: Arc<RwLock<DataCommandMode>>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        if let Ok((stream, _)) = result {
                            tokio::spawn(Self::handle_connection(
                                stream,
                                store.clone(),
                                commands.clone(),
                                mode.clone(),
                            ));
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        })
    }

    async fn handle_connection(
        stream: TcpStream,
        store: Store,
        commands: CommandLog,
        mode: Arc<RwLock<DataCommandMode>>,
    ) {
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        while let Ok(Some(args)) = read_command(&mut reader).await {
            let Some(name) = args.first().map(|n| String::from_utf8_lossy(n).to_ascii_uppercase())
            else {
                return;
            };
            commands
                .write()
                .await
                .push(args.iter().map(|a| String::from_utf8_lossy(a).into_owned()).collect());

            let is_data_command = matches!(name.as_str(), "GET" | "SET");
            let current_mode = *mode.read().await;
            let reply = match (name.as_str(), current_mode) {
                (_, DataCommandMode::Stall) if is_data_command => {
                    std::future::pending::<()>().await;
                    return;
                }
                (_, DataCommandMode::Error) if is_data_command => {
                    b"-ERR injected failure\r\n".to_vec()
                }
                ("PING", _) => b"+PONG\r\n".to_vec(),
                ("GET", _) => match args.get(1) {
                    Some(key) => bulk_reply(store.read().await.get(key)),
                    None => b"-ERR wrong number of arguments for 'get' command\r\n".to_vec(),
                },
                ("SET", _) => match (args.get(1), args.get(2)) {
                    (Some(key), Some(value)) => {
                        store.write().await.insert(key.clone(), value.clone());
                        b"+OK\r\n".to_vec()
                    }
                    _ => b"-ERR wrong number of arguments for 'set' command\r\n".to_vec(),
                },
                _ => b"+OK\r\n".to_vec(),
            };

            if write_half.write_all(&reply).await.is_err() {
                return;
            }
        }
    }

    /// Returns a `redis://` URL for this server.
    #[must_use]
    pub fn url(&self) -> String {
        format!("redis://{}/0", self.addr)
    }

    /// Changes how subsequent `GET`/`SET` commands are answered.
    pub async fn set_mode(&self, mode: DataCommandMode) {
        *self.mode.write().await = mode;
    }

    /// Returns the raw stored value for `key`.
    pub async fn stored(&self, key: &str) -> Option<Vec<u8>> {
        self.store.read().await.get(key.as_bytes()).cloned()
    }

    /// Returns every received command whose name matches `name` (case-insensitive).
    pub async fn received(&self, name: &str) -> Vec<Vec<String>> {
        self.commands
            .read()
            .await
            .iter()
            .filter(|args| args.first().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .cloned()
            .collect()
    }

    /// Shuts down the server.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        self.server_handle.abort();
    }
}

impl Drop for MockRedisServer {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

fn bulk_reply(value: Option<&Vec<u8>>) -> Vec<u8> {
    match value {
        Some(value) => {
            let mut reply = format!("${}\r\n", value.len()).into_bytes();
            reply.extend_from_slice(value);
            reply.extend_from_slice(b"\r\n");
            reply
        }
        None => b"$-1\r\n".to_vec(),
    }
}

/// Reads one RESP array of bulk strings. `Ok(None)` means the client hung up.
async fn read_command<R>(reader: &mut R) -> io::Result<Option<Vec<Vec<u8>>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line).await? == 0 {
        return Ok(None);
    }
    let count = parse_header(&line, b'*')?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_until(b'\n', &mut line).await?;
        let len = parse_header(&line, b'$')?;

        let mut arg = vec![0; len + 2];
        reader.read_exact(&mut arg).await?;
        arg.truncate(len);
        args.push(arg);
    }
    Ok(Some(args))
}

fn parse_header(line: &[u8], prefix: u8) -> io::Result<usize> {
    let invalid = || io::Error::new(io::ErrorKind::InvalidData, "malformed RESP header");
    let body = line
        .strip_prefix(&[prefix])
        .and_then(|rest| rest.strip_suffix(b"\r\n"))
        .ok_or_else(invalid)?;
    std::str::from_utf8(body).ok().and_then(|s| s.parse().ok()).ok_or_else(invalid)
}
