//! WebSocket Connection
//!
//! This demo drives a connection lifecycle described in JSON.
//!
//! Key concepts:
//! - Declarative configuration parsed with serde
//! - Named actions and guards supplied through the builder
//! - Asynchronous actions awaited through the dispatch result
//! - Transition notifications and tracing output
//!
//! Run with: RUST_LOG=hsmkit=debug cargo run --example websocket

use hsmkit::core::{ActionOutput, Event};
use hsmkit::{MachineBuilder, Notification, Topic};
use serde_json::{json, Value};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "id": "websocket",
    "initial": "disconnected",
    "states": {
        "disconnected": {
            "entry": ["notifyDisconnected"],
            "on": { "CONNECT": "connecting" }
        },
        "connecting": {
            "entry": ["connectWebSocket"],
            "on": {
                "CONNECT_SUCCESS": "connected",
                "CONNECT_FAILURE": [
                    { "target": "connecting", "cond": "canRetry", "actions": ["countRetry"] },
                    { "target": "disconnected" }
                ]
            }
        },
        "connected": {
            "initial": "idle",
            "on": { "DISCONNECT": "disconnecting", "ERROR": "disconnected" },
            "states": {
                "idle": { "on": { "SEND": "sending" } },
                "sending": { "entry": ["send"], "on": { "SENT": "idle" } }
            }
        },
        "disconnecting": {
            "entry": ["disconnectWebSocket"],
            "on": { "DISCONNECT_SUCCESS": "disconnected" }
        }
    }
}"#;

#[derive(Debug, Default)]
struct Connection {
    retries: u32,
    sent: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    println!("=== WebSocket Connection ===\n");

    let mut machine = MachineBuilder::new()
        .json(CONFIG)?
        .action("notifyDisconnected", |_: &mut Connection, _: &Event| {
            println!("  socket closed")
        })
        .action("connectWebSocket", |_: &mut Connection, _: &Event| {
            ActionOutput::pending(async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                json!("handshake complete")
            })
        })
        .action("countRetry", |conn: &mut Connection, _: &Event| {
            conn.retries += 1;
            i64::from(conn.retries)
        })
        .action("send", |conn: &mut Connection, event: &Event| {
            conn.sent += 1;
            event.data.clone()
        })
        .action("disconnectWebSocket", |_: &mut Connection, _: &Event| {
            ActionOutput::pending(async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Value::Null
            })
        })
        .guard("canRetry", |conn: &Connection, _: &Event| conn.retries < 2)
        .build()?;

    machine.on(Topic::Transition, |notification| {
        if let Notification::Transition { next, prev } = notification {
            println!("  {} -> {next}", prev.unwrap_or("(stopped)"));
        }
    });

    println!("Starting:");
    machine.start();

    println!("\nConnecting, first attempt fails:");
    let result = machine.dispatch("CONNECT", Value::Null)?;
    println!("  handshake: {:?}", result.wait("connectWebSocket").await);
    machine.dispatch("CONNECT_FAILURE", Value::Null)?;

    println!("\nSecond attempt succeeds:");
    machine.dispatch("CONNECT_SUCCESS", Value::Null)?;

    println!("\nSending a message:");
    let result = machine.dispatch("SEND", json!({ "text": "hello" }))?;
    println!("  sent payload: {:?}", result.wait("send").await);
    machine.dispatch("SENT", Value::Null)?;

    println!("\nDisconnecting:");
    let result = machine.dispatch("DISCONNECT", Value::Null)?;
    result.wait_all().await;
    machine.dispatch("DISCONNECT_SUCCESS", Value::Null)?;

    println!("\nFinal state: {}", machine.state()?.name());
    println!("Context: {:?}", machine.context());
    println!("Visited: {}", machine.history().path().join(" -> "));

    Ok(())
}
