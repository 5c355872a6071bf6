//! WebSocket push channel.
//!
//! Clients subscribe to aggregation scopes and receive full snapshots
//! whenever the broadcast dispatcher pushes one. Every update is an
//! idempotent full-scope snapshot, never a delta.

#![allow(missing_docs)]

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use collate_core::{ConstituencyResults, PresidentialResults, RegionResults};
use collate_db::entities::constituency::Region;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::middleware::AppState;
use crate::registry::ScopeKey;

/// Client-to-server message.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "body")]
pub enum ClientMessage {
    /// Subscribe to national presidential updates.
    #[serde(rename = "subscribe:presidential")]
    SubscribePresidential,
    /// Subscribe to one constituency's parliamentary updates.
    #[serde(rename = "subscribe:constituency", rename_all = "camelCase")]
    SubscribeConstituency { constituency_id: String },
    /// Subscribe to one region's rollup updates.
    #[serde(rename = "subscribe:region")]
    SubscribeRegion { region: Region },
    /// Unsubscribe from presidential updates.
    #[serde(rename = "unsubscribe:presidential")]
    UnsubscribePresidential,
    /// Unsubscribe from a constituency.
    #[serde(rename = "unsubscribe:constituency", rename_all = "camelCase")]
    UnsubscribeConstituency { constituency_id: String },
    /// Unsubscribe from a region.
    #[serde(rename = "unsubscribe:region")]
    UnsubscribeRegion { region: Region },
}

/// Server-to-client message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "body")]
pub enum ServerMessage {
    /// Subscription acknowledged.
    #[serde(rename = "subscribed")]
    Subscribed { channel: String },
    /// Fresh presidential snapshot.
    #[serde(rename = "presidential:update")]
    PresidentialUpdate(PresidentialResults),
    /// Fresh constituency snapshot.
    #[serde(rename = "constituency:update")]
    ConstituencyUpdate(Box<ConstituencyResults>),
    /// Fresh region snapshot.
    #[serde(rename = "region:update")]
    RegionUpdate(RegionResults),
}

/// WebSocket handler for the push channel.
pub async fn streaming_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    info!("New streaming connection");

    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let conn_id = state.registry.register(tx);

    info!(connection = conn_id, "Streaming connection established");

    loop {
        tokio::select! {
            // Client messages: subscribe/unsubscribe requests.
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                if let Some(ack) = handle_client_message(client_msg, conn_id, &state) {
                                    let json = serde_json::to_string(&ack).unwrap_or_default();
                                    if sender.send(Message::Text(json.into())).await.is_err() {
                                        break;
                                    }
                                }
                            }
                            Err(e) => {
                                warn!(connection = conn_id, "Failed to parse client message: {}", e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(connection = conn_id, "Client closed connection");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!(connection = conn_id, "WebSocket error: {}", e);
                        break;
                    }
                }
            }

            // Snapshots pushed by the broadcast dispatcher.
            Some(update) = rx.recv() => {
                let json = serde_json::to_string(&update).unwrap_or_default();
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.registry.remove(conn_id);
    info!(connection = conn_id, "Streaming connection closed");
}

/// Apply a client message to the registry, returning an ack when one is due.
fn handle_client_message(
    msg: ClientMessage,
    conn_id: u64,
    state: &AppState,
) -> Option<ServerMessage> {
    let (scope, subscribe) = match msg {
        ClientMessage::SubscribePresidential => (ScopeKey::Presidential, true),
        ClientMessage::SubscribeConstituency { constituency_id } => {
            (ScopeKey::Constituency(constituency_id), true)
        }
        ClientMessage::SubscribeRegion { region } => (ScopeKey::Region(region), true),
        ClientMessage::UnsubscribePresidential => (ScopeKey::Presidential, false),
        ClientMessage::UnsubscribeConstituency { constituency_id } => {
            (ScopeKey::Constituency(constituency_id), false)
        }
        ClientMessage::UnsubscribeRegion { region } => (ScopeKey::Region(region), false),
    };

    if subscribe {
        state.registry.subscribe(conn_id, scope.clone());
        Some(ServerMessage::Subscribed {
            channel: scope.to_string(),
        })
    } else {
        state.registry.unsubscribe(conn_id, &scope);
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subscribe_presidential() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"subscribe:presidential"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::SubscribePresidential));
    }

    #[test]
    fn test_parse_subscribe_constituency() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"subscribe:constituency","body":{"constituencyId":"abc123"}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::SubscribeConstituency { constituency_id } => {
                assert_eq!(constituency_id, "abc123");
            }
            other => panic!("Unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_subscribe_region() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"subscribe:region","body":{"region":"UPPER_EAST"}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::SubscribeRegion { region } => {
                assert_eq!(region, Region::UpperEast);
            }
            other => panic!("Unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_region_fails() {
        let result = serde_json::from_str::<ClientMessage>(
            r#"{"type":"subscribe:region","body":{"region":"ATLANTIS"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_subscribed_ack() {
        let ack = ServerMessage::Subscribed {
            channel: "constituency:abc".to_string(),
        };
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["type"], "subscribed");
        assert_eq!(json["body"]["channel"], "constituency:abc");
    }

    #[test]
    fn test_update_message_tags_match_wire_protocol() {
        use chrono::Utc;
        use collate_core::NationalStats;

        let update = ServerMessage::PresidentialUpdate(PresidentialResults {
            candidates: Vec::new(),
            total_votes: 0,
            leading_candidate: None,
            national_stats: NationalStats {
                total_votes: 0,
                valid_votes: 0,
                rejected_votes: 0,
                registered_voters: 0,
                turnout: 0.0,
                reporting_stations: 0,
                total_stations: 0,
            },
            last_updated: Utc::now(),
        });

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "presidential:update");
        assert_eq!(json["body"]["totalVotes"], 0);
        assert!(json["body"]["nationalStats"]["reportingStations"].is_number());
    }
}
