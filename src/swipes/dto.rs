use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Swipe payload. Both fields stay optional at the parsing layer so the
/// handler can say precisely which one was missing; `swiped_right` is raw
/// JSON because only a genuine boolean may pass.
#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    #[serde(default)]
    pub car_id: Option<i64>,
    #[serde(default)]
    pub swiped_right: Option<Value>,
}

pub const MISSING_BOTH: &str = "Invalid car ID and swiped_right provided";
pub const MISSING_CAR_ID: &str = "Invalid car ID provided";
pub const MISSING_DECISION: &str = "Invalid swiped_right provided";

impl SwipeRequest {
    /// Resolve the payload into (car id, decision) or the exact complaint.
    /// A non-boolean decision counts as absent.
    pub fn resolve(&self) -> Result<(i64, bool), &'static str> {
        let decision = match self.swiped_right {
            Some(Value::Bool(b)) => Some(b),
            _ => None,
        };
        match (self.car_id, decision) {
            (Some(car_id), Some(swiped_right)) => Ok((car_id, swiped_right)),
            (None, None) => Err(MISSING_BOTH),
            (None, Some(_)) => Err(MISSING_CAR_ID),
            (Some(_), None) => Err(MISSING_DECISION),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub status: &'static str,
    pub car_id: i64,
    pub swiped_right: bool,
}

/// Client-side signal that the deck ran out. Pure acknowledgment.
#[derive(Debug, Deserialize)]
pub struct DepletedRequest {
    #[serde(default)]
    pub is_empty: Option<Value>,
}

impl DepletedRequest {
    pub fn is_empty(&self) -> Option<bool> {
        match self.is_empty {
            Some(Value::Bool(b)) => Some(b),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DepletedResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<(i64, bool), &'static str> {
        serde_json::from_str::<SwipeRequest>(body).unwrap().resolve()
    }

    #[test]
    fn resolves_a_complete_swipe() {
        assert_eq!(parse(r#"{"car_id": 3, "swiped_right": true}"#), Ok((3, true)));
        assert_eq!(
            parse(r#"{"car_id": 7, "swiped_right": false}"#),
            Ok((7, false))
        );
    }

    #[test]
    fn each_missing_field_gets_its_own_message() {
        assert_eq!(parse(r#"{}"#), Err(MISSING_BOTH));
        assert_eq!(parse(r#"{"swiped_right": true}"#), Err(MISSING_CAR_ID));
        assert_eq!(parse(r#"{"car_id": 3}"#), Err(MISSING_DECISION));
    }

    #[test]
    fn non_boolean_decision_counts_as_absent() {
        assert_eq!(
            parse(r#"{"car_id": 3, "swiped_right": "true"}"#),
            Err(MISSING_DECISION)
        );
        assert_eq!(
            parse(r#"{"car_id": 3, "swiped_right": 1}"#),
            Err(MISSING_DECISION)
        );
        assert_eq!(
            parse(r#"{"car_id": 3, "swiped_right": null}"#),
            Err(MISSING_DECISION)
        );
    }

    #[test]
    fn depleted_flag_is_strictly_boolean() {
        let parse = |body: &str| {
            serde_json::from_str::<DepletedRequest>(body)
                .unwrap()
                .is_empty()
        };
        assert_eq!(parse(r#"{"is_empty": true}"#), Some(true));
        assert_eq!(parse(r#"{"is_empty": false}"#), Some(false));
        assert_eq!(parse(r#"{"is_empty": "yes"}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }
}
