// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format tests: length-prefix framing and JSON encoding.

use super::*;
use crate::request::CacheValueWire;
use crate::{Request, Response};
use pinokio_core::{AppId, CacheKind, TunnelProvider};

#[test]
fn encode_returns_json_without_length_prefix() {
    let response = Response::Ok;
    let encoded = encode(&response).expect("encode failed");

    // encode() returns raw JSON, no length prefix
    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(json_str.starts_with('{'), "should be JSON object: {}", json_str);
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original).await.expect("write failed");

    // write_message adds 4-byte length prefix
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.expect("read failed");

    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.expect("write failed");

    // First 4 bytes are the length prefix
    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;

    // Length should match the data size
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_message_on_empty_stream_reports_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_message(&mut cursor).await.expect_err("empty stream should not decode");
    assert!(matches!(err, ProtocolError::Closed));
}

#[tokio::test]
async fn oversized_length_prefix_is_rejected_before_allocating() {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(&(MAX_FRAME_BYTES + 1).to_be_bytes());

    let mut cursor = std::io::Cursor::new(buffer);
    let err = read_message(&mut cursor).await.expect_err("oversized frame should be rejected");
    assert!(matches!(err, ProtocolError::FrameTooLarge(_)));
}

#[tokio::test]
async fn request_response_roundtrip_over_framed_stream() {
    let request = Request::AppsInstall {
        app_id: AppId::new("app-stable-diffusion"),
        inputs: serde_json::json!({"accept_license": true}),
    };

    let mut buffer = Vec::new();
    write_message(&mut buffer, &encode(&request).expect("encode failed")).await.expect("write failed");

    let mut cursor = std::io::Cursor::new(buffer);
    let decoded: Request = read_request(&mut cursor).await.expect("read_request failed");

    match decoded {
        Request::AppsInstall { app_id, inputs } => {
            assert_eq!(app_id.as_str(), "app-stable-diffusion");
            assert_eq!(inputs["accept_license"], serde_json::json!(true));
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[tokio::test]
async fn tunnels_open_request_preserves_optional_fields() {
    let request = Request::TunnelsOpen {
        app_id: AppId::new("demo-app"),
        local_port: 7860,
        provider: TunnelProvider::Ngrok,
        auth_token: None,
        subdomain: Some("my-app".to_string()),
        custom_command: None,
    };

    let mut buffer = Vec::new();
    write_message(&mut buffer, &encode(&request).expect("encode failed")).await.expect("write failed");

    let mut cursor = std::io::Cursor::new(buffer);
    let decoded: Request = read_request(&mut cursor).await.expect("read_request failed");

    match decoded {
        Request::TunnelsOpen { local_port, subdomain, auth_token, .. } => {
            assert_eq!(local_port, 7860);
            assert_eq!(subdomain.as_deref(), Some("my-app"));
            assert!(auth_token.is_none());
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[tokio::test]
async fn cache_value_wire_blob_survives_roundtrip() {
    let response = Response::CacheValue {
        value: Some(CacheValueWire::Blob(vec![0, 1, 2, 255])),
    };

    let mut buffer = Vec::new();
    write_response(&mut buffer, &response).await.expect("write failed");

    let mut cursor = std::io::Cursor::new(buffer);
    let body = read_message(&mut cursor).await.expect("read failed");
    let decoded: Response = decode(&body).expect("decode failed");

    match decoded {
        Response::CacheValue { value: Some(CacheValueWire::Blob(bytes)) } => {
            assert_eq!(bytes, vec![0, 1, 2, 255]);
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn cache_get_request_carries_kind() {
    let request = Request::CacheGet {
        key: pinokio_core::CacheKey::new("app-stable-diffusion/model.safetensors"),
        kind: CacheKind::ModelBlob,
    };
    let encoded = encode(&request).expect("encode failed");
    let decoded: Request = decode(&encoded).expect("decode failed");

    match decoded {
        Request::CacheGet { key, kind } => {
            assert_eq!(key.as_str(), "app-stable-diffusion/model.safetensors");
            assert_eq!(kind, CacheKind::ModelBlob);
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[tokio::test]
async fn write_request_read_response_roundtrip_over_framed_stream() {
    let request = Request::AppsList;
    let mut buffer = Vec::new();
    write_request(&mut buffer, &request).await.expect("write_request failed");

    let mut cursor = std::io::Cursor::new(buffer);
    let decoded: Request = read_request(&mut cursor).await.expect("read_request failed");
    assert!(matches!(decoded, Request::AppsList));

    let response = Response::Apps { apps: Vec::new() };
    let mut buffer = Vec::new();
    write_response(&mut buffer, &response).await.expect("write_response failed");

    let mut cursor = std::io::Cursor::new(buffer);
    let decoded: Response = read_response(&mut cursor).await.expect("read_response failed");
    match decoded {
        Response::Apps { apps } => assert!(apps.is_empty()),
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn error_response_round_trips_exit_code_relevant_fields() {
    let err = pinokio_core::Error::not_found("app not installed").with_code("app_not_installed");
    let response = Response::from_error(&err);
    let encoded = encode(&response).expect("encode failed");
    let decoded: Response = decode(&encoded).expect("decode failed");

    match decoded {
        Response::Error { kind, code, .. } => {
            assert_eq!(kind.exit_code(), 3);
            assert_eq!(code.as_deref(), Some("app_not_installed"));
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}
