use serde_json::json;
use voice_rtc_rs::protocol::{ClientEvent, Modality, ServerEvent};
use voice_rtc_rs::Error;

#[test]
fn response_create_wire_shape() {
    let event = ClientEvent::response_create("Say hello.");
    let value = serde_json::to_value(&event).expect("serialize response.create");
    assert_eq!(
        value,
        json!({
            "type": "response.create",
            "response": {
                "modalities": ["text", "audio"],
                "instructions": "Say hello."
            }
        })
    );
}

#[test]
fn response_create_requests_both_modalities() {
    let ClientEvent::ResponseCreate { response } = ClientEvent::response_create("x") else {
        panic!("wrong variant");
    };
    assert_eq!(response.modalities, vec![Modality::Text, Modality::Audio]);
}

#[test]
fn text_message_wire_shape() {
    let event = ClientEvent::text_message("hi", "2025-03-09T12:00:00Z");
    let value = serde_json::to_value(&event).expect("serialize text.message");
    assert_eq!(
        value,
        json!({
            "type": "text.message",
            "content": "hi",
            "timestamp": "2025-03-09T12:00:00Z"
        })
    );
}

#[test]
fn response_done_transcript_extraction() {
    let payload = json!({
        "type": "response.done",
        "response": {
            "output": [
                { "content": [ { "transcript": "hello" } ] }
            ]
        }
    })
    .to_string();

    let event = ServerEvent::parse(&payload).expect("parse response.done");
    match event {
        ServerEvent::ResponseDone { response } => {
            let response = response.expect("response body present");
            assert_eq!(response.first_transcript(), Some("hello"));
        }
        _ => panic!("wrong variant"),
    }
}

#[test]
fn response_done_missing_structure_is_empty() {
    for payload in [
        json!({ "type": "response.done" }),
        json!({ "type": "response.done", "response": {} }),
        json!({ "type": "response.done", "response": { "output": [] } }),
        json!({ "type": "response.done", "response": { "output": [ { "content": [] } ] } }),
        json!({ "type": "response.done", "response": { "output": [ { "content": [ {} ] } ] } }),
    ] {
        let event = ServerEvent::parse(&payload.to_string()).expect("parse lenient response.done");
        match event {
            ServerEvent::ResponseDone { response } => {
                let transcript = response.as_ref().and_then(|r| r.first_transcript());
                assert_eq!(transcript, None, "payload: {payload}");
            }
            _ => panic!("wrong variant"),
        }
    }
}

#[test]
fn inbound_text_message_parses() {
    let payload = json!({ "type": "text.message", "content": "hey there" }).to_string();
    let event = ServerEvent::parse(&payload).expect("parse text.message");
    match event {
        ServerEvent::TextMessage { content } => assert_eq!(content, "hey there"),
        _ => panic!("wrong variant"),
    }
}

#[test]
fn unrecognized_tags_are_tolerated() {
    let payload = json!({ "type": "session.created", "session": { "id": "s_1" } }).to_string();
    let event = ServerEvent::parse(&payload).expect("parse unknown tag");
    assert!(matches!(event, ServerEvent::Unknown));
}

#[test]
fn malformed_payload_is_a_malformed_event_error() {
    let err = ServerEvent::parse("{not json").unwrap_err();
    assert!(matches!(err, Error::MalformedEvent(_)));

    let err = ServerEvent::parse("42").unwrap_err();
    assert!(matches!(err, Error::MalformedEvent(_)));
}
