//! The hint call path: marshal arguments, call the engine, decode the reply.
//!
//! Stateless. Lifecycle checks happen in [`EngineSession`](crate::EngineSession)
//! before anything here runs.

use crate::buffer::NativeBuffer;
use crate::engine::NativeEngine;
use crate::error::{DecodeError, EngineError, EngineResult};
use lib_types::{HintResult, Value};
use std::ffi::{c_int, CStr, CString};

/// Convert a position identifier into the NUL-terminated form the engine takes.
pub(crate) fn marshal_position(position_id: &str) -> EngineResult<CString> {
    CString::new(position_id).map_err(|e| {
        EngineError::invalid_parameter(
            "position_id",
            format!("contains a NUL byte at offset {}", e.nul_position()),
        )
    })
}

/// Convert a depth into the engine's integer type. Values are never clamped.
pub(crate) fn marshal_depth(depth: u32) -> EngineResult<c_int> {
    c_int::try_from(depth).map_err(|_| {
        EngineError::invalid_parameter("depth", format!("{depth} exceeds {}", c_int::MAX))
    })
}

/// Run one hint call and decode the result.
///
/// Every non-null buffer from the engine is released exactly once, after
/// its contents are copied, whatever the decode outcome.
pub(crate) fn request_hint<E>(engine: &E, position_id: &CStr, depth: c_int) -> HintResult
where
    E: NativeEngine + ?Sized,
{
    let raw = engine.hint(position_id, depth);

    // SAFETY: `raw` came straight from `hint` and is owned by nobody else
    let Some(buffer) = (unsafe { NativeBuffer::from_raw(engine, raw) }) else {
        tracing::debug!(depth, "Engine returned no buffer");
        return HintResult::NoResult;
    };

    let bytes = buffer.len();
    match buffer.into_text().and_then(|text| decode(&text)) {
        Ok(value) => {
            tracing::debug!(depth, bytes, "Hint decoded");
            HintResult::Decoded(value)
        }
        Err(e) => {
            tracing::warn!(depth, bytes, error = %e, "Discarding undecodable engine response");
            HintResult::NoResult
        }
    }
}

fn decode(text: &str) -> Result<Value, DecodeError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeEngine};
    use serde_json::json;

    fn position(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_marshal_rejects_interior_nul() {
        let err = marshal_position("4HPw\0ATDgc").unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { ref name, .. } if name == "position_id"));
        assert!(err.to_string().contains("offset 4"));
    }

    #[test]
    fn test_marshal_depth_passes_through() {
        assert_eq!(marshal_depth(0).unwrap(), 0);
        assert_eq!(marshal_depth(7).unwrap(), 7);
        assert!(marshal_depth(u32::MAX).is_err());
    }

    #[test]
    fn test_decoded_response() {
        let engine = FakeEngine::returning(r#"{"action": "roll", "data": {"cd": 0, "equity": [0.1, 0.2, 1.0, 0.1]}}"#);
        let result = request_hint(&engine, &position("XGID=aa--BBBB----dE---d-e----B-:0:0:1:00:0:0:0:0:10"), 2);

        assert_eq!(
            result.as_value().and_then(|v| v.get("action")),
            Some(&json!("roll"))
        );
        assert_eq!(engine.free_count(), 1);
        assert_eq!(engine.live_buffers(), 0);
    }

    #[test]
    fn test_arguments_reach_engine_unchanged() {
        let engine = FakeEngine::returning("{}");
        request_hint(&engine, &position("4HPwATDgc/ABMA"), 3);

        assert_eq!(
            engine.calls()[0],
            Call::Hint {
                position_id: "4HPwATDgc/ABMA".to_string(),
                depth: 3
            }
        );
    }

    #[test]
    fn test_null_response_is_no_result_without_free() {
        let engine = FakeEngine::with_responder(|_, _| None);
        let result = request_hint(&engine, &position("4HPwATDgc/ABMA"), 1);

        assert!(result.is_no_result());
        assert_eq!(engine.hint_count(), 1);
        assert_eq!(engine.free_count(), 0);
    }

    #[test]
    fn test_truncated_json_is_no_result_and_freed_once() {
        let engine = FakeEngine::returning(r#"{"action": "play", "data": [{"move": "24/1"#);
        let result = request_hint(&engine, &position("4HPwATDgc/ABMA"), 2);

        assert_eq!(result, HintResult::NoResult);
        assert_eq!(engine.free_count(), 1);
        assert_eq!(engine.live_buffers(), 0);
        assert!(engine.bad_frees().is_empty());
    }

    #[test]
    fn test_free_happens_after_copy() {
        // The fake poisons freed buffers; decoding a poisoned copy would fail.
        let engine = FakeEngine::returning(r#"{"error": -1}"#);
        let result = request_hint(&engine, &position("bad"), 0);

        assert_eq!(result, HintResult::Decoded(json!({"error": -1})));
        let calls = engine.calls();
        assert!(matches!(calls[0], Call::Hint { .. }));
        assert!(matches!(calls[1], Call::Free { .. }));
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_empty_response_is_no_result() {
        let engine = FakeEngine::returning("");
        assert!(request_hint(&engine, &position("x"), 0).is_no_result());
        assert_eq!(engine.free_count(), 1);
    }
}
