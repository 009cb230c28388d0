//! Tests for webhook payload extraction and the verification handshake

use helpdesk_dialog::{webhook, replies, VerifyParams, WebhookPayload};

fn payload(value: serde_json::Value) -> WebhookPayload {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_extracts_text_message_from_cloud_api_envelope() {
    let payload = payload(serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "1",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "messages": [{
                        "from": "5599000000001",
                        "id": "wamid.1",
                        "type": "text",
                        "text": { "body": "Oi, bom dia" }
                    }]
                }
            }]
        }]
    }));

    let message = webhook::extract(payload).unwrap();
    assert_eq!(message.user_id, "5599000000001");
    assert_eq!(message.raw_text, "Oi, bom dia");
    assert!(!message.group_context);
}

#[test]
fn test_status_only_delivery_yields_no_message() {
    let payload = payload(serde_json::json!({
        "entry": [{
            "changes": [{
                "value": { "statuses": [{ "status": "delivered" }] }
            }]
        }]
    }));
    assert!(webhook::extract(payload).is_none());

    let empty = payload_empty();
    assert!(webhook::extract(empty).is_none());
}

fn payload_empty() -> WebhookPayload {
    serde_json::from_value(serde_json::json!({})).unwrap()
}

#[test]
fn test_non_text_message_has_empty_text() {
    let payload = payload(serde_json::json!({
        "entry": [{
            "changes": [{
                "value": {
                    "messages": [{
                        "from": "5599000000001",
                        "type": "image",
                        "image": { "id": "media-1" }
                    }]
                }
            }]
        }]
    }));

    let message = webhook::extract(payload).unwrap();
    assert_eq!(message.raw_text, "");
}

#[test]
fn test_group_jid_flags_group_context() {
    let payload = payload(serde_json::json!({
        "entry": [{
            "changes": [{
                "value": {
                    "messages": [{
                        "from": "123456789@g.us",
                        "type": "text",
                        "text": { "body": "mensagem no grupo" }
                    }]
                }
            }]
        }]
    }));

    let message = webhook::extract(payload).unwrap();
    assert!(message.group_context);
}

#[test]
fn test_verification_handshake() {
    let params: VerifyParams = serde_json::from_value(serde_json::json!({
        "hub.mode": "subscribe",
        "hub.verify_token": "secret-123",
        "hub.challenge": "challenge-456"
    }))
    .unwrap();

    assert_eq!(params.check(Some("secret-123")), Some("challenge-456"));
    assert_eq!(params.check(Some("other")), None);
    // Unconfigured token never verifies
    assert_eq!(params.check(None), None);
}

#[test]
fn test_handshake_requires_subscribe_mode() {
    let params: VerifyParams = serde_json::from_value(serde_json::json!({
        "hub.mode": "unsubscribe",
        "hub.verify_token": "secret-123",
        "hub.challenge": "challenge-456"
    }))
    .unwrap();

    assert_eq!(params.check(Some("secret-123")), None);
}

#[test]
fn test_extracted_empty_text_maps_to_notice() {
    // Non-text payloads ride through the state machine as the text-only path
    let normalized = helpdesk_dialog::normalize("");
    let intent = helpdesk_dialog::classify(&normalized);
    let transition =
        helpdesk_dialog::advance(None, "5599000000001", intent, "", &normalized).unwrap();
    assert_eq!(
        transition.reply.as_deref(),
        Some(replies::TEXT_ONLY_NOTICE)
    );
}
