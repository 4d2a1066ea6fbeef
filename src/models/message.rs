// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Inbound WhatsApp bot message.

use serde::Deserialize;
use validator::Validate;

/// Message payload posted by the WhatsApp bot platform.
///
/// Only `text`, `waId` and `senderName` drive processing. The remaining
/// fields are part of the platform's webhook shape and are accepted as-is.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppMessage {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
    #[validate(length(min = 1, message = "waId must not be empty"))]
    pub wa_id: String,
    #[serde(default)]
    pub sender_name: String,

    pub id: Option<String>,
    pub created: Option<String>,
    pub whatsapp_message_id: Option<String>,
    pub conversation_id: Option<String>,
    pub ticket_id: Option<String>,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub data: Option<serde_json::Value>,
    pub source_id: Option<String>,
    pub source_url: Option<String>,
    pub timestamp: Option<String>,
    pub owner: Option<bool>,
    pub event_type: Option<String>,
    pub status_string: Option<String>,
    pub avatar_url: Option<String>,
    pub assigned_id: Option<String>,
    pub operator_name: Option<String>,
    pub operator_email: Option<String>,
    pub message_contact: Option<serde_json::Value>,
    pub list_reply: Option<serde_json::Value>,
    pub interactive_button_reply: Option<serde_json::Value>,
    pub button_reply: Option<serde_json::Value>,
    pub reply_context_id: Option<String>,
    pub source_type: Option<i64>,
    pub frequently_forwarded: Option<bool>,
    pub forwarded: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_bot_payload_deserializes() {
        let raw = serde_json::json!({
            "id": "6512",
            "created": "2026-01-01T00:00:00Z",
            "whatsappMessageId": "wamid.HB",
            "conversationId": "c1",
            "ticketId": "t1",
            "text": "check this out https://youtube.com/watch?v=abc123",
            "type": "text",
            "data": null,
            "timestamp": "1767225600",
            "owner": false,
            "eventType": "message",
            "statusString": "SENT",
            "waId": "+1234567890",
            "senderName": "Asha",
            "sourceType": 0,
            "forwarded": false
        });

        let msg: WhatsAppMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(msg.wa_id, "+1234567890");
        assert_eq!(msg.sender_name, "Asha");
        assert_eq!(msg.message_type.as_deref(), Some("text"));
        assert_eq!(msg.source_type, Some(0));
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn test_empty_wa_id_fails_validation() {
        let msg: WhatsAppMessage =
            serde_json::from_value(serde_json::json!({"text": "hi", "waId": ""})).unwrap();
        assert!(msg.validate().is_err());
    }
}
