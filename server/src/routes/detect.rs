//! Plant health endpoints
//!
//! `/health-detect/` classifies a reading against the species' reference
//! vectors. `/health-predict/` runs the learned health model instead.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use botaniq::species::SpeciesRef;
use botaniq::stress::{plant_status, SensorReading, SPECIES_NOT_RECOGNIZED};

use crate::error::{parse_json, ApiError};
use crate::state::SharedState;

/// Sensor payload as sent by the mobile app
///
/// Numbers may arrive as JSON numbers or as numeric strings.
#[derive(Debug, Deserialize)]
pub struct HealthRequest {
    #[serde(rename = "Species")]
    pub species: SpeciesRef,

    #[serde(rename = "Soil_Moisture", deserialize_with = "number")]
    pub soil_moisture: f64,

    #[serde(rename = "Ambient_Temperature", deserialize_with = "number")]
    pub ambient_temperature: f64,

    #[serde(rename = "Soil_Temperature", default, deserialize_with = "optional_number")]
    pub soil_temperature: Option<f64>,

    #[serde(rename = "Humidity", deserialize_with = "number")]
    pub humidity: f64,

    #[serde(rename = "Light_Intensity", deserialize_with = "number")]
    pub light_intensity: f64,
}

impl HealthRequest {
    pub fn reading(&self) -> SensorReading {
        SensorReading {
            soil_moisture: self.soil_moisture,
            ambient_temp: self.ambient_temperature,
            soil_temp: self.soil_temperature,
            humidity: self.humidity,
            light_intensity: self.light_intensity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDetectResponse {
    #[serde(rename = "Predicted_Health_Status")]
    pub predicted_health_status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthPredictResponse {
    #[serde(rename = "Predicted_Health_Status")]
    pub predicted_health_status: String,
    pub confidence: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

fn to_finite<E: serde::de::Error>(raw: RawNumber) -> Result<f64, E> {
    let value = match raw {
        RawNumber::Number(v) => v,
        RawNumber::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("expected a number, got {:?}", s)))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(E::custom("sensor values must be finite numbers"))
    }
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    to_finite(RawNumber::deserialize(deserializer)?)
}

fn optional_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<RawNumber>::deserialize(deserializer)?
        .map(to_finite)
        .transpose()
}

/// POST /health-detect/ - Nearest reference vector for the species' group
pub async fn health_detect(
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<HealthDetectResponse>, ApiError> {
    let request: HealthRequest = parse_json(body)?;

    let status = match request.species.resolve() {
        Some(species) => plant_status(species, &request.reading()),
        None => SPECIES_NOT_RECOGNIZED.to_string(),
    };

    info!("health-detect: {} -> {}", request.species, status);

    Ok(Json(HealthDetectResponse {
        predicted_health_status: status,
    }))
}

/// POST /health-predict/ - Learned health model over all five readings
pub async fn health_predict(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<HealthPredictResponse>, ApiError> {
    let request: HealthRequest = parse_json(body)?;

    if state.health_predictor.is_none() {
        return Err(ApiError::ModelUnavailable("health"));
    }

    let reading = request.reading();
    let result = tokio::task::spawn_blocking(move || {
        state
            .health_predictor
            .as_ref()
            .ok_or(ApiError::ModelUnavailable("health"))?
            .predict_reading(&reading)
            .map_err(ApiError::from)
    })
    .await??;

    info!(
        "health-predict: {} -> {} ({:.1}%)",
        request.species,
        result.class_name,
        result.confidence * 100.0
    );

    Ok(Json(HealthPredictResponse {
        predicted_health_status: result.class_name,
        confidence: result.confidence,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_and_numeric_strings() {
        let request: HealthRequest = serde_json::from_str(
            r#"{"Species": "Orchid", "Soil_Moisture": "36.5", "Ambient_Temperature": 22,
                "Humidity": 43, "Light_Intensity": " 870 "}"#,
        )
        .unwrap();

        assert_eq!(request.soil_moisture, 36.5);
        assert_eq!(request.light_intensity, 870.0);
        assert_eq!(request.soil_temperature, None);
    }

    #[test]
    fn test_optional_soil_temperature() {
        let request: HealthRequest = serde_json::from_str(
            r#"{"Species": 3, "Soil_Moisture": 1, "Ambient_Temperature": 2,
                "Soil_Temperature": "19.5", "Humidity": 3, "Light_Intensity": 4}"#,
        )
        .unwrap();

        assert_eq!(request.species, SpeciesRef::Index(3));
        assert_eq!(request.reading().soil_temp, Some(19.5));
    }

    #[test]
    fn test_rejects_non_numeric_and_non_finite() {
        let bad = [
            r#"{"Species": "Orchid", "Soil_Moisture": "wet", "Ambient_Temperature": 2, "Humidity": 3, "Light_Intensity": 4}"#,
            r#"{"Species": "Orchid", "Soil_Moisture": "NaN", "Ambient_Temperature": 2, "Humidity": 3, "Light_Intensity": 4}"#,
            r#"{"Species": "Orchid", "Ambient_Temperature": 2, "Humidity": 3, "Light_Intensity": 4}"#,
        ];
        for body in bad {
            assert!(serde_json::from_str::<HealthRequest>(body).is_err(), "{}", body);
        }
    }
}
