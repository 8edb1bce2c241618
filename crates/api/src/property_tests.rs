// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests: arbitrary requests survive an encode/decode round trip
//! unchanged, regardless of app id content.

use crate::{encode, decode, Request};
use pinokio_core::AppId;
use proptest::prelude::*;

proptest! {
    #[test]
    fn apps_analyze_roundtrips_for_any_app_id(id in "[a-z][a-z0-9_-]{0,63}") {
        let request = Request::AppsAnalyze { app_id: AppId::new(id.clone()) };
        let encoded = encode(&request).expect("encode failed");
        let decoded: Request = decode(&encoded).expect("decode failed");

        match decoded {
            Request::AppsAnalyze { app_id } => prop_assert_eq!(app_id.as_str(), id.as_str()),
            other => prop_assert!(false, "unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn processes_stop_grace_periods_roundtrip(grace_s in proptest::option::of(0u64..86_400), force_after_s in proptest::option::of(0u64..86_400)) {
        let request = Request::ProcessesStop {
            process_id: pinokio_core::ProcessId::new("proc-abc123"),
            grace_s,
            force_after_s,
        };
        let encoded = encode(&request).expect("encode failed");
        let decoded: Request = decode(&encoded).expect("decode failed");

        match decoded {
            Request::ProcessesStop { grace_s: g, force_after_s: f, .. } => {
                prop_assert_eq!(g, grace_s);
                prop_assert_eq!(f, force_after_s);
            }
            other => prop_assert!(false, "unexpected variant: {:?}", other),
        }
    }
}
