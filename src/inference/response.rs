use serde::Serialize;
use serde_json::Value;

use crate::error::{DiagnoseError, Result};

/// The ordered array returned by the prediction service.
///
/// Element 0 is the top prediction identifier (a string or a number). Any
/// further elements are kept untouched for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionResponse {
    values: Vec<Value>,
}

impl PredictionResponse {
    /// Validates a decoded JSON body.
    pub fn from_value(value: Value) -> Result<Self> {
        let values = match value {
            Value::Array(values) => values,
            other => {
                return Err(DiagnoseError::InvalidResponse(format!(
                    "expected a JSON array, got {}",
                    json_kind(&other)
                )))
            }
        };
        match values.first() {
            None => Err(DiagnoseError::InvalidResponse("response array is empty".into())),
            Some(Value::String(_)) | Some(Value::Number(_)) => Ok(PredictionResponse { values }),
            Some(other) => Err(DiagnoseError::InvalidResponse(format!(
                "element 0 must be a string or number, got {}",
                json_kind(other)
            ))),
        }
    }

    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DiagnoseError::InvalidResponse(format!("malformed JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn top(&self) -> &Value {
        &self.values[0]
    }

    /// Element 0 rendered for use in a route: strings verbatim, numbers in
    /// their JSON form.
    pub fn top_id(&self) -> String {
        match self.top() {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Everything after element 0, opaque.
    pub fn extras(&self) -> &[Value] {
        &self.values[1..]
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_string_and_number_ids() {
        let r = PredictionResponse::from_value(json!(["3", "Blast", 0.91])).unwrap();
        assert_eq!(r.top_id(), "3");
        assert_eq!(r.extras(), &[json!("Blast"), json!(0.91)]);

        let r = PredictionResponse::from_value(json!([7])).unwrap();
        assert_eq!(r.top_id(), "7");
        assert!(r.extras().is_empty());
    }

    #[test]
    fn rejects_non_arrays_and_empty() {
        for bad in [json!({"label": 3}), json!("3"), json!(null), json!([])] {
            let err = PredictionResponse::from_value(bad).unwrap_err();
            assert!(matches!(err, DiagnoseError::InvalidResponse(_)));
        }
    }

    #[test]
    fn rejects_unroutable_first_element() {
        for bad in [json!([null]), json!([true]), json!([[1]]), json!([{"id": 1}])] {
            assert!(PredictionResponse::from_value(bad).is_err());
        }
    }

    #[test]
    fn malformed_body_is_invalid_response() {
        let err = PredictionResponse::from_slice(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, DiagnoseError::InvalidResponse(_)));
    }

    #[test]
    fn round_trips_to_same_json() {
        let body = json!(["8", "Normal", 0.5, {"extra": true}]);
        let r = PredictionResponse::from_value(body.clone()).unwrap();
        assert_eq!(serde_json::to_value(&r).unwrap(), body);
    }
}
