use serde::{Deserialize, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};

use daily_pulse_data::models::number_value;

/// Query parameters identifying the user
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    /// Owner of the records
    pub user_id: Option<String>,
}

/// Write whole numbers as JSON integers (`350`, not `350.0`)
pub fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    number_value(*value).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Wrapper {
        #[serde(serialize_with = "serialize_number")]
        value: f64,
    }

    #[test]
    fn test_serialize_number() {
        assert_eq!(serde_json::to_value(Wrapper { value: 350.0 }).unwrap(), json!({ "value": 350 }));
        assert_eq!(serde_json::to_value(Wrapper { value: 7.5 }).unwrap(), json!({ "value": 7.5 }));
    }
}
