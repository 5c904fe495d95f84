//! MQTT bus client
//!
//! Wraps an `rumqttc` client. The event loop runs on its own task: it keeps
//! the connected flag current and, on any connection error, waits and polls
//! again, which makes `rumqttc` reconnect.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{
    AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS, TlsConfiguration,
    Transport,
};

use crate::config::MqttConfig;
use crate::observability::Logger;

use super::client::BusClient;
use super::errors::{PublishError, PublishResult};

/// Outgoing request queue capacity
const REQUEST_CAPACITY: usize = 64;

/// Pause between reconnection attempts
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// MQTT implementation of [`BusClient`]
#[derive(Debug)]
pub struct MqttBus {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
    client_id: String,
}

impl MqttBus {
    /// Build the client and spawn its event loop on the current tokio runtime.
    pub fn start(config: &MqttConfig) -> PublishResult<Arc<Self>> {
        let (bus, eventloop) = Self::new(config)?;
        let bus = Arc::new(bus);

        Logger::info(
            "MQTT_CONNECTING",
            &[
                ("host", &config.host),
                ("port", &config.port.to_string()),
                ("client_id", &bus.client_id),
            ],
        );

        tokio::spawn(drive(eventloop, Arc::clone(&bus.connected)));
        Ok(bus)
    }

    /// Build the client without polling it.
    pub fn new(config: &MqttConfig) -> PublishResult<(Self, EventLoop)> {
        let options = mqtt_options(config)?;
        let client_id = options.client_id();
        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);

        Ok((
            Self {
                client,
                connected: Arc::new(AtomicBool::new(false)),
                client_id,
            },
            eventloop,
        ))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl BusClient for MqttBus {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn publish_retained(&self, topic: &str, payload: Vec<u8>) -> PublishResult<()> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, true, payload)
            .map_err(|e| PublishError::Rejected {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Translate the `mqtt` config section into client options.
pub fn mqtt_options(config: &MqttConfig) -> PublishResult<MqttOptions> {
    let mut options = MqttOptions::new(config.resolved_client_id(), &config.host, config.port);
    options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

    if let Some(login) = &config.login {
        options.set_credentials(&login.username, &login.password);
    }

    if let Some(tls) = &config.tls_config {
        let ca = read_pem(&tls.ca_certs)?;
        let client_auth = match (&tls.certfile, &tls.keyfile) {
            (Some(cert), Some(key)) => Some((read_pem(cert)?, read_pem(key)?)),
            _ => None,
        };
        options.set_transport(Transport::tls_with_config(TlsConfiguration::Simple {
            ca,
            alpn: None,
            client_auth,
        }));
    }

    Ok(options)
}

fn read_pem(path: &Path) -> PublishResult<Vec<u8>> {
    fs::read(path).map_err(|e| PublishError::Setup(format!("{}: {}", path.display(), e)))
}

async fn drive(mut eventloop: EventLoop, connected: Arc<AtomicBool>) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    connected.store(true, Ordering::SeqCst);
                    Logger::info("MQTT_CONNECTED", &[]);
                } else {
                    connected.store(false, Ordering::SeqCst);
                    Logger::error("MQTT_CONNECT_REFUSED", &[("code", &format!("{:?}", ack.code))]);
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                connected.store(false, Ordering::SeqCst);
                Logger::warn("MQTT_DISCONNECTED", &[]);
            }
            Ok(_) => {}
            Err(e) => {
                let was_connected = connected.swap(false, Ordering::SeqCst);
                let reason = e.to_string();
                if was_connected {
                    Logger::warn("MQTT_DISCONNECTED", &[("reason", &reason)]);
                } else {
                    Logger::debug("MQTT_CONNECT_RETRY", &[("reason", &reason)]);
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}
