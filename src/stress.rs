//! Plant Stress Classifier
//!
//! Nearest-centroid classification of a sensor reading against hand-authored
//! reference vectors. Each species group has one reference vector per
//! condition; the reading is assigned the condition whose vector is closest in
//! Euclidean distance.

use serde::{Deserialize, Serialize};

use crate::species::{group_of, SpeciesGroup};

/// Status reported when the species is not in the species table
pub const SPECIES_NOT_RECOGNIZED: &str = "Species not recognized";

/// Health condition of a plant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "High Stress")]
    HighStress,
    #[serde(rename = "Moderate Stress")]
    ModerateStress,
}

impl Condition {
    /// Conditions in evaluation order; on equal distance the earlier one wins
    pub const ALL: [Condition; 3] = [
        Condition::Healthy,
        Condition::HighStress,
        Condition::ModerateStress,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Condition::Healthy => "Healthy",
            Condition::HighStress => "High Stress",
            Condition::ModerateStress => "Moderate Stress",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Representative sensor values for one (group, condition) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceVector {
    pub soil_moisture: f64,
    pub ambient_temp: f64,
    pub soil_temp: f64,
    pub humidity: f64,
    pub light_intensity: f64,
}

impl ReferenceVector {
    const fn new(
        soil_moisture: f64,
        ambient_temp: f64,
        soil_temp: f64,
        humidity: f64,
        light_intensity: f64,
    ) -> Self {
        Self {
            soil_moisture,
            ambient_temp,
            soil_temp,
            humidity,
            light_intensity,
        }
    }

    /// Values in feature order: moisture, ambient temp, soil temp, humidity, light
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.soil_moisture,
            self.ambient_temp,
            self.soil_temp,
            self.humidity,
            self.light_intensity,
        ]
    }
}

// General houseplants
const ORNAMENTAL: [ReferenceVector; 3] = [
    ReferenceVector::new(36.66, 22.80, 20.15, 42.96, 872.32),
    ReferenceVector::new(19.16, 22.81, 20.03, 61.28, 268.73),
    ReferenceVector::new(24.68, 19.16, 17.51, 63.83, 760.43),
];

const FERNS: [ReferenceVector; 3] = [
    ReferenceVector::new(35.00, 23.00, 19.50, 45.00, 800.00),
    ReferenceVector::new(18.00, 22.00, 18.00, 60.00, 250.00),
    ReferenceVector::new(25.00, 20.00, 17.00, 65.00, 700.00),
];

const SUCCULENTS: [ReferenceVector; 3] = [
    ReferenceVector::new(40.00, 25.00, 21.00, 40.00, 900.00),
    ReferenceVector::new(22.00, 21.00, 19.00, 55.00, 300.00),
    ReferenceVector::new(28.00, 20.00, 18.00, 60.00, 800.00),
];

const PALMS: [ReferenceVector; 3] = [
    ReferenceVector::new(38.00, 24.00, 20.00, 43.00, 850.00),
    ReferenceVector::new(20.00, 23.00, 19.00, 62.00, 280.00),
    ReferenceVector::new(26.00, 21.00, 18.00, 64.00, 780.00),
];

/// Reference vectors for a group, paired with their conditions in [`Condition::ALL`] order
pub fn reference_vectors(group: SpeciesGroup) -> [(Condition, ReferenceVector); 3] {
    let table = match group {
        SpeciesGroup::Ferns => &FERNS,
        SpeciesGroup::Succulents => &SUCCULENTS,
        SpeciesGroup::Palms => &PALMS,
        SpeciesGroup::Ornamental => &ORNAMENTAL,
    };

    [
        (Condition::ALL[0], table[0]),
        (Condition::ALL[1], table[1]),
        (Condition::ALL[2], table[2]),
    ]
}

/// A sensor reading supplied by a caller
///
/// Soil temperature is optional; when it is absent the comparison uses the
/// remaining four features only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub soil_moisture: f64,
    pub ambient_temp: f64,
    pub soil_temp: Option<f64>,
    pub humidity: f64,
    pub light_intensity: f64,
}

impl SensorReading {
    /// A four-feature reading without soil temperature
    pub fn new(soil_moisture: f64, ambient_temp: f64, humidity: f64, light_intensity: f64) -> Self {
        Self {
            soil_moisture,
            ambient_temp,
            soil_temp: None,
            humidity,
            light_intensity,
        }
    }

    pub fn with_soil_temp(mut self, soil_temp: f64) -> Self {
        self.soil_temp = Some(soil_temp);
        self
    }

    /// Whether every supplied value is a finite number
    pub fn is_finite(&self) -> bool {
        [
            self.soil_moisture,
            self.ambient_temp,
            self.humidity,
            self.light_intensity,
        ]
        .iter()
        .chain(self.soil_temp.iter())
        .all(|v| v.is_finite())
    }

    /// Build matching feature vectors for the reading and a reference
    ///
    /// Both vectors contain the same features in the same order.
    pub fn aligned(&self, reference: &ReferenceVector) -> (Vec<f64>, Vec<f64>) {
        match self.soil_temp {
            Some(soil_temp) => (
                vec![
                    self.soil_moisture,
                    self.ambient_temp,
                    soil_temp,
                    self.humidity,
                    self.light_intensity,
                ],
                reference.as_array().to_vec(),
            ),
            None => (
                vec![
                    self.soil_moisture,
                    self.ambient_temp,
                    self.humidity,
                    self.light_intensity,
                ],
                vec![
                    reference.soil_moisture,
                    reference.ambient_temp,
                    reference.humidity,
                    reference.light_intensity,
                ],
            ),
        }
    }
}

/// Euclidean distance between two vectors
///
/// Coordinates are paired positionally; extra coordinates of the longer vector
/// are ignored.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Pick the reference closest to the reading
///
/// Returns the winning condition and its distance, or `None` if no distance
/// compares below infinity (no candidates, or NaN inputs).
pub fn nearest_condition(
    reading: &SensorReading,
    references: &[(Condition, ReferenceVector)],
) -> Option<(Condition, f64)> {
    nearest_by(references, |reference| {
        let (sample, target) = reading.aligned(reference);
        euclidean_distance(&sample, &target)
    })
}

fn nearest_by<F>(
    references: &[(Condition, ReferenceVector)],
    distance_to: F,
) -> Option<(Condition, f64)>
where
    F: Fn(&ReferenceVector) -> f64,
{
    let mut best: Option<(Condition, f64)> = None;
    let mut best_distance = f64::INFINITY;

    for (condition, reference) in references {
        let distance = distance_to(reference);
        tracing::trace!("distance to {}: {:.4}", condition, distance);

        // Strict comparison keeps the first of equally distant conditions
        if distance < best_distance {
            best_distance = distance;
            best = Some((*condition, distance));
        }
    }

    best
}

/// Distances from a reading to every condition of a species' group
///
/// Returns `None` when the species is not recognized.
pub fn condition_distances(species: &str, reading: &SensorReading) -> Option<Vec<(Condition, f64)>> {
    let group = group_of(species)?;

    Some(
        reference_vectors(group)
            .iter()
            .map(|(condition, reference)| {
                let (sample, target) = reading.aligned(reference);
                (*condition, euclidean_distance(&sample, &target))
            })
            .collect(),
    )
}

/// Classify a raw feature vector for the given species
///
/// Features are paired with [`ReferenceVector::as_array`] position by
/// position. A four-feature `[moisture, ambient temp, humidity, light]` vector
/// therefore meets the reference's soil temperature in its third slot and
/// never reaches its light value.
///
/// Returns `None` when the species is not in the species table.
pub fn get_plant_stress_condition(species: &str, features: &[f64]) -> Option<Condition> {
    let group = group_of(species)?;
    nearest_by(&reference_vectors(group), |reference| {
        euclidean_distance(features, &reference.as_array())
    })
    .map(|(condition, _)| condition)
}

/// Classify a reading for the given species, matching features by name
///
/// Returns `None` when the species is not in the species table.
pub fn classify_reading(species: &str, reading: &SensorReading) -> Option<Condition> {
    let group = group_of(species)?;
    nearest_condition(reading, &reference_vectors(group)).map(|(condition, _)| condition)
}

/// Classify a reading and render the result as the status string clients receive
pub fn plant_status(species: &str, reading: &SensorReading) -> String {
    match classify_reading(species, reading) {
        Some(condition) => condition.name().to_string(),
        None => SPECIES_NOT_RECOGNIZED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SPECIES;

    fn full_reading(v: &ReferenceVector) -> SensorReading {
        SensorReading::new(v.soil_moisture, v.ambient_temp, v.humidity, v.light_intensity)
            .with_soil_temp(v.soil_temp)
    }

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
        // Extra coordinates are ignored
        assert_eq!(euclidean_distance(&[0.0, 0.0, 100.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&[], &[1.0]), 0.0);
    }

    #[test]
    fn test_reference_vector_classifies_as_itself() {
        for group in SpeciesGroup::ALL {
            let species = crate::species::species_in(group)[0];
            for (condition, reference) in reference_vectors(group) {
                assert_eq!(
                    classify_reading(species, &full_reading(&reference)),
                    Some(condition),
                    "{} / {}",
                    group,
                    condition
                );
            }
        }
    }

    #[test]
    fn test_four_feature_reading() {
        // Low moisture and dim light: high stress for a general houseplant
        let reading = SensorReading::new(19.0, 22.0, 61.0, 270.0);
        assert_eq!(
            classify_reading("Peace Lily", &reading),
            Some(Condition::HighStress)
        );

        // Bright and moist succulent
        let reading = SensorReading::new(39.0, 25.0, 41.0, 890.0);
        assert_eq!(classify_reading("Aloe Vera", &reading), Some(Condition::Healthy));

        // Cool and humid palm
        let reading = SensorReading::new(26.0, 21.0, 64.0, 775.0);
        assert_eq!(
            classify_reading("Parlor Palm (Chamaedorea elegans)", &reading),
            Some(Condition::ModerateStress)
        );
    }

    #[test]
    fn test_positional_features_differ_from_aligned_reading() {
        // Humidity lands on the soil temperature slot and light on humidity
        let features = [19.0, 22.0, 61.0, 270.0];
        assert_eq!(
            get_plant_stress_condition("Peace Lily", &features),
            Some(Condition::ModerateStress)
        );

        let reading = SensorReading::new(19.0, 22.0, 61.0, 270.0);
        assert_eq!(classify_reading("Peace Lily", &reading), Some(Condition::HighStress));
    }

    #[test]
    fn test_positional_five_features_match_full_reading() {
        for (condition, reference) in reference_vectors(SpeciesGroup::Succulents) {
            assert_eq!(
                get_plant_stress_condition("Aloe Vera", &reference.as_array()),
                Some(condition)
            );
        }
    }

    #[test]
    fn test_aligned_skips_missing_soil_temp() {
        let reference = FERNS[0];
        let (sample, target) = SensorReading::new(1.0, 2.0, 3.0, 4.0).aligned(&reference);
        assert_eq!(sample, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(target, vec![35.0, 23.0, 45.0, 800.0]);

        let (sample, target) = SensorReading::new(1.0, 2.0, 3.0, 4.0)
            .with_soil_temp(9.0)
            .aligned(&reference);
        assert_eq!(sample, vec![1.0, 2.0, 9.0, 3.0, 4.0]);
        assert_eq!(target.len(), 5);
    }

    #[test]
    fn test_tie_keeps_first_condition() {
        let same = ORNAMENTAL[0];
        let references = [
            (Condition::Healthy, same),
            (Condition::HighStress, same),
            (Condition::ModerateStress, ORNAMENTAL[2]),
        ];
        let (condition, distance) = nearest_condition(&full_reading(&same), &references).unwrap();
        assert_eq!(condition, Condition::Healthy);
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_nan_reading_has_no_nearest() {
        let reading = SensorReading::new(f64::NAN, 20.0, 50.0, 500.0);
        assert!(!reading.is_finite());
        assert_eq!(nearest_condition(&reading, &reference_vectors(SpeciesGroup::Palms)), None);
        assert_eq!(nearest_condition(&SensorReading::new(1.0, 1.0, 1.0, 1.0), &[]), None);
    }

    #[test]
    fn test_unknown_species() {
        let reading = SensorReading::new(30.0, 22.0, 50.0, 600.0);
        assert_eq!(classify_reading("Dandelion", &reading), None);
        assert_eq!(get_plant_stress_condition("Dandelion", &[30.0, 22.0, 50.0, 600.0]), None);
        assert_eq!(plant_status("Dandelion", &reading), SPECIES_NOT_RECOGNIZED);
        assert!(condition_distances("Dandelion", &reading).is_none());
    }

    #[test]
    fn test_plant_status_names() {
        let reading = full_reading(&ORNAMENTAL[2]);
        assert_eq!(plant_status("Orchid", &reading), "Moderate Stress");
    }

    #[test]
    fn test_condition_distances_cover_all_conditions() {
        let reading = SensorReading::new(30.0, 22.0, 50.0, 600.0);
        for species in SPECIES {
            let distances = condition_distances(species, &reading).unwrap();
            let conditions: Vec<Condition> = distances.iter().map(|(c, _)| *c).collect();
            assert_eq!(conditions, Condition::ALL.to_vec());
            assert!(distances.iter().all(|(_, d)| *d > 0.0));
        }
    }

    #[test]
    fn test_condition_serde_names() {
        assert_eq!(
            serde_json::to_string(&Condition::HighStress).unwrap(),
            "\"High Stress\""
        );
    }
}
