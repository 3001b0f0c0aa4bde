//! Command bridge: exposes the application-layer operations to a front end.
//!
//! Every command function here takes the shared [`AppState`] and delegates to
//! the use cases.  The presentation layer (the command-line front end in
//! `main.rs`, or any windowed front end) is the only consumer of this module;
//! it must NOT be imported by the application or domain layers.
//!
//! # Commands
//!
//! | Command            | What the operator did                          |
//! |--------------------|------------------------------------------------|
//! | `list_targets`     | opened the send panel                          |
//! | `update_target`    | edited host / port / address / argument rows   |
//! | `add_argument`     | pressed "add argument" on a target             |
//! | `edit_argument`    | changed one argument's type or text            |
//! | `remove_argument`  | pressed "remove" on an argument row            |
//! | `send_target`      | pressed a target's send button                 |
//! | `send_history`     | looked at the send history                     |
//! | `send_history_text`| the history panel repainted                    |
//! | `start_receiving`  | pressed "start" with a port                    |
//! | `stop_receiving`   | pressed "stop"                                 |
//! | `clear_log`        | pressed "clear"                                |
//! | `filtered_log`     | typed a filter pattern                         |
//! | `receiver_status`  | the status line repainted                      |
//!
//! # Data Transfer Objects (DTOs)
//!
//! Commands return plain serialisable structs (`TargetDto`,
//! `ReceivedMessageDto`, `ReceiverStatusDto`) rather than the internal types,
//! so a front end can render them without knowing the domain model.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`, so every
//! response has the same shape: `{ success, data, error }`.  Errors are
//! rendered to their display text; the front end shows them as-is.

use std::sync::Arc;

use osc_core::{ArgKind, OscArgument, ReceivedMessage};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::application::{
    receive_messages::{InboundSource, Listener, ListenerState, SharedMessageLog},
    send_history::SendHistory,
    send_message::{OscTransport, SendMessageUseCase, SendTarget},
};
use crate::infrastructure::{
    network::{udp_listener::UdpInboundSource, udp_sender::UdpOscTransport},
    storage::config::AppConfig,
};

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between commands.
///
/// Wrapped in `Arc<>` by the constructors.  The mutable parts sit behind async
/// Tokio mutexes so concurrent commands serialise instead of racing.  The
/// message log has its own lock because the listener's pump thread writes to
/// it outside any command.
pub struct AppState {
    /// Editable copies of the configured send targets, in configuration order.
    pub targets: Mutex<Vec<SendTarget>>,
    /// The last 50 successful sends.
    pub history: Mutex<SendHistory>,
    /// The inbound listener and its lifecycle.
    pub listener: Mutex<Listener>,
    /// The received-message log the listener feeds.
    pub log: SharedMessageLog,
    /// Port pre-filled in the receive form.
    pub default_port: u16,
    sender: SendMessageUseCase,
}

impl AppState {
    /// Builds state from `config` using the real UDP adapters.
    pub fn new(config: &AppConfig) -> Arc<Self> {
        Self::with_adapters(
            config,
            Arc::new(UdpOscTransport::new()),
            Arc::new(UdpInboundSource::new()),
        )
    }

    /// Builds state from `config` with the given transport and inbound source.
    pub fn with_adapters(
        config: &AppConfig,
        transport: Arc<dyn OscTransport>,
        source: Arc<dyn InboundSource>,
    ) -> Arc<Self> {
        let log = SharedMessageLog::new(config.receiver.max_log_entries);
        Arc::new(Self {
            targets: Mutex::new(config.send_targets()),
            history: Mutex::new(SendHistory::new()),
            listener: Mutex::new(Listener::new(source, log.clone())),
            log,
            default_port: config.receiver.default_port,
            sender: SendMessageUseCase::new(transport),
        })
    }
}

// ── Data Transfer Objects (Presentation layer) ────────────────────────────────

/// One argument row as the form shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDto {
    /// `int`, `float`, `string` or `bool`.
    pub kind: String,
    pub value: String,
    pub description: Option<String>,
}

impl From<&OscArgument> for ArgumentDto {
    fn from(arg: &OscArgument) -> Self {
        Self {
            kind: arg.kind.to_string(),
            value: arg.raw_text.clone(),
            description: arg.description.clone(),
        }
    }
}

impl TryFrom<&ArgumentDto> for OscArgument {
    type Error = osc_core::UnknownKind;

    fn try_from(dto: &ArgumentDto) -> Result<Self, Self::Error> {
        let kind: ArgKind = dto.kind.parse()?;
        Ok(Self {
            kind,
            raw_text: dto.value.clone(),
            description: dto.description.clone(),
        })
    }
}

/// One send target as the form shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDto {
    pub name: String,
    pub host: String,
    /// Port text exactly as entered; validated at send time.
    pub port: String,
    pub address: String,
    pub arguments: Vec<ArgumentDto>,
}

impl From<&SendTarget> for TargetDto {
    fn from(t: &SendTarget) -> Self {
        Self {
            name: t.name.clone(),
            host: t.host.clone(),
            port: t.port.clone(),
            address: t.address.clone(),
            arguments: t.arguments.iter().map(ArgumentDto::from).collect(),
        }
    }
}

/// One row of the received-message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedMessageDto {
    pub timestamp: String,
    pub address: String,
    pub values: String,
}

impl From<&ReceivedMessage> for ReceivedMessageDto {
    fn from(m: &ReceivedMessage) -> Self {
        Self {
            timestamp: m.timestamp.clone(),
            address: m.address.clone(),
            values: m.values.clone(),
        }
    }
}

/// Listener status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverStatusDto {
    pub receiving: bool,
    /// The bound port while receiving.
    pub port: Option<u16>,
    /// Messages currently held in the log.
    pub received_count: usize,
    pub max_entries: usize,
}

/// Unified response wrapper used by every command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Send commands ─────────────────────────────────────────────────────────────

/// Returns every send target in configuration order.
pub async fn list_targets(state: Arc<AppState>) -> CommandResult<Vec<TargetDto>> {
    let targets = state.targets.lock().await;
    CommandResult::ok(targets.iter().map(TargetDto::from).collect())
}

/// Replaces the editable fields of the target called `dto.name`.
///
/// Field text is stored as entered; nothing is validated until send time
/// except argument kinds, which must name one of the four supported kinds.
pub async fn update_target(state: Arc<AppState>, dto: TargetDto) -> CommandResult<()> {
    let arguments = match dto
        .arguments
        .iter()
        .map(OscArgument::try_from)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(args) => args,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let mut targets = state.targets.lock().await;
    let Some(target) = targets.iter_mut().find(|t| t.name == dto.name) else {
        return CommandResult::err(unknown_target(&dto.name));
    };
    target.host = dto.host;
    target.port = dto.port;
    target.address = dto.address;
    target.arguments = arguments;
    CommandResult::ok(())
}

/// Appends an `int` / `"0"` argument row and returns its index.
pub async fn add_argument(state: Arc<AppState>, target: &str) -> CommandResult<usize> {
    let mut targets = state.targets.lock().await;
    match targets.iter_mut().find(|t| t.name == target) {
        Some(t) => CommandResult::ok(t.add_argument()),
        None => CommandResult::err(unknown_target(target)),
    }
}

/// Changes the kind and text of one argument row.
pub async fn edit_argument(
    state: Arc<AppState>,
    target: &str,
    index: usize,
    kind: &str,
    value: &str,
) -> CommandResult<()> {
    let kind: ArgKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => return CommandResult::err(format!("{e}")),
    };

    let mut targets = state.targets.lock().await;
    let Some(t) = targets.iter_mut().find(|t| t.name == target) else {
        return CommandResult::err(unknown_target(target));
    };
    match t.arguments.get_mut(index) {
        Some(arg) => {
            arg.kind = kind;
            arg.raw_text = value.to_string();
            CommandResult::ok(())
        }
        None => CommandResult::err(format!("target {target:?} has no argument {index}")),
    }
}

/// Removes one argument row.
pub async fn remove_argument(
    state: Arc<AppState>,
    target: &str,
    index: usize,
) -> CommandResult<()> {
    let mut targets = state.targets.lock().await;
    let Some(t) = targets.iter_mut().find(|t| t.name == target) else {
        return CommandResult::err(unknown_target(target));
    };
    match t.remove_argument(index) {
        Some(_) => CommandResult::ok(()),
        None => CommandResult::err(format!("target {target:?} has no argument {index}")),
    }
}

/// Sends the target called `name` once and records it in the history.
///
/// Returns the new history line on success.  On failure nothing is recorded.
/// Name resolution and the datagram write block, so they run on Tokio's
/// blocking pool rather than on the calling worker.
pub async fn send_target(state: Arc<AppState>, name: &str) -> CommandResult<String> {
    // Snapshot the target so the lock is not held across the network call.
    let target = {
        let targets = state.targets.lock().await;
        match targets.iter().find(|t| t.name == name) {
            Some(t) => t.clone(),
            None => return CommandResult::err(unknown_target(name)),
        }
    };

    let worker = Arc::clone(&state);
    let sent = match tokio::task::spawn_blocking(move || worker.sender.send(&target)).await {
        Ok(sent) => sent,
        Err(e) => return CommandResult::err(format!("send task failed: {e}")),
    };

    match sent {
        Ok(result) => {
            let line = result.history_line();
            state.history.lock().await.record(&result);
            CommandResult::ok(line)
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Returns the send history, newest first.
pub async fn send_history(state: Arc<AppState>) -> CommandResult<Vec<String>> {
    CommandResult::ok(state.history.lock().await.lines())
}

/// Returns the history as one block of text, newest line first.
///
/// While nothing has been sent this is the placeholder
/// `"Send history will be displayed here"`.
pub async fn send_history_text(state: Arc<AppState>) -> CommandResult<String> {
    CommandResult::ok(state.history.lock().await.as_text())
}

// ── Receive commands ──────────────────────────────────────────────────────────

/// Starts receiving on `port` (operator text).
///
/// `on_message` runs on the listener's pump thread after each message has been
/// logged; a front end uses it to schedule a repaint.  While already receiving
/// this does nothing and reports the current status.
pub async fn start_receiving<F>(
    state: Arc<AppState>,
    port: &str,
    on_message: F,
) -> CommandResult<ReceiverStatusDto>
where
    F: FnMut(&ReceivedMessage) + Send + 'static,
{
    let mut listener = state.listener.lock().await;
    match listener.start(port, on_message) {
        Ok(_) => CommandResult::ok(status_of(&listener, &state.log)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Stops receiving.  A no-op while stopped.
pub async fn stop_receiving(state: Arc<AppState>) -> CommandResult<ReceiverStatusDto> {
    let mut listener = state.listener.lock().await;
    listener.stop();
    CommandResult::ok(status_of(&listener, &state.log))
}

/// Empties the received-message log.
pub async fn clear_log(state: Arc<AppState>) -> CommandResult<()> {
    state.log.clear();
    CommandResult::ok(())
}

/// Returns the logged messages whose address passes `pattern`, newest first.
pub async fn filtered_log(
    state: Arc<AppState>,
    pattern: &str,
) -> CommandResult<Vec<ReceivedMessageDto>> {
    let view = state.log.filtered_view(pattern);
    CommandResult::ok(view.iter().map(ReceivedMessageDto::from).collect())
}

/// Returns the listener state and received count.
pub async fn receiver_status(state: Arc<AppState>) -> CommandResult<ReceiverStatusDto> {
    let listener = state.listener.lock().await;
    CommandResult::ok(status_of(&listener, &state.log))
}

fn status_of(listener: &Listener, log: &SharedMessageLog) -> ReceiverStatusDto {
    ReceiverStatusDto {
        receiving: listener.state() == ListenerState::Receiving,
        port: listener.local_addr().map(|a| a.port()),
        received_count: log.len(),
        max_entries: log.max_entries(),
    }
}

fn unknown_target(name: &str) -> String {
    format!("no send target named {name:?}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
