use crate::options::MeasurementRequest;
use crate::result::ResultEnvelope;
use serde::{Deserialize, Serialize};

/// Control-channel message envelope. Wire names (e.g.
/// `probe:measurement:request`) contain colons, so each variant carries an
/// explicit `rename` rather than relying on the derived snake_case tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlEnvelope {
    #[serde(rename = "probe:measurement:request")]
    MeasurementRequest(MeasurementRequest),

    #[serde(rename = "probe:measurement:progress")]
    MeasurementProgress {
        measurement_id: String,
        test_id: String,
        overwrite: bool,
        result: ResultEnvelope,
    },

    #[serde(rename = "probe:measurement:result")]
    MeasurementResult {
        measurement_id: String,
        test_id: String,
        result: ResultEnvelope,
    },

    #[serde(rename = "probe:status:ready")]
    StatusReady,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MeasurementOptions;

    #[test]
    fn request_roundtrips_through_the_wire_tag() {
        let env = ControlEnvelope::MeasurementRequest(MeasurementRequest {
            measurement_id: "m1".into(),
            test_id: "t1".into(),
            measurement: MeasurementOptions {
                kind: "ping".into(),
                target: "example.com".into(),
                in_progress_updates: false,
                fields: serde_json::Map::new(),
            },
        });
        let json = serde_json::to_string(&env).unwrap();
        assert!(json.contains("\"type\":\"probe:measurement:request\""));
        let back: ControlEnvelope = serde_json::from_str(&json).unwrap();
        match back {
            ControlEnvelope::MeasurementRequest(req) => assert_eq!(req.measurement_id, "m1"),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn status_ready_has_no_payload_fields() {
        let json = serde_json::to_string(&ControlEnvelope::StatusReady).unwrap();
        assert_eq!(json, r#"{"type":"probe:status:ready"}"#);
    }
}
