//! Species Table
//!
//! The houseplant species the service knows about, and the group each one
//! belongs to. Groups select which set of condition reference vectors is used
//! by the stress classifier.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Number of supported species
pub const NUM_SPECIES: usize = 47;

/// Canonical species names, in the order clients index them
pub const SPECIES: [&str; NUM_SPECIES] = [
    "African Violet (Saintpaulia ionantha)",      // 0
    "Aloe Vera",                                  // 1
    "Anthurium (Anthurium andraeanum)",           // 2
    "Areca Palm (Dypsis lutescens)",              // 3
    "Asparagus Fern (Asparagus setaceus)",        // 4
    "Begonia (Begonia spp.)",                     // 5
    "Bird of Paradise (Strelitzia reginae)",      // 6
    "Birds Nest Fern (Asplenium nidus)",          // 7
    "Boston Fern (Nephrolepis exaltata)",         // 8
    "Calathea",                                   // 9
    "Cast Iron Plant (Aspidistra elatior)",       // 10
    "Chinese Money Plant (Pilea peperomioides)",  // 11
    "Chinese Evergreen (Aglaonema)",              // 12
    "Christmas Cactus (Schlumbergera bridgesii)", // 13
    "Chrysanthemum",                              // 14
    "Ctenanthe",                                  // 15
    "Daffodils (Narcissus spp.)",                 // 16
    "Dracaena",                                   // 17
    "Dumb Cane (Dieffenbachia spp.)",             // 18
    "Elephant Ear (Alocasia spp.)",               // 19
    "English Ivy (Hedera helix)",                 // 20
    "Hyacinth (Hyacinthus orientalis)",           // 21
    "Iron Cross Begonia (Begonia masoniana)",     // 22
    "Jade Plant (Crassula ovata)",                // 23
    "Kalanchoe",                                  // 24
    "Lilium (Hemerocallis)",                      // 25
    "Lily of the Valley (Convallaria majalis)",   // 26
    "Money Tree (Pachira aquatica)",              // 27
    "Monstera Deliciosa (Monstera deliciosa)",    // 28
    "Orchid",                                     // 29
    "Parlor Palm (Chamaedorea elegans)",          // 30
    "Peace Lily",                                 // 31
    "Poinsettia (Euphorbia pulcherrima)",         // 32
    "Polka Dot Plant (Hypoestes phyllostachya)",  // 33
    "Ponytail Palm (Beaucarnea recurvata)",       // 34
    "Pothos (Ivy Arum)",                          // 35
    "Prayer Plant (Maranta leuconeura)",          // 36
    "Rattlesnake Plant (Calathea lancifolia)",    // 37
    "Rubber Plant (Ficus elastica)",              // 38
    "Sago Palm (Cycas revoluta)",                 // 39
    "Schefflera",                                 // 40
    "Snake Plant (Sansevieria)",                  // 41
    "Tradescantia",                               // 42
    "Tulip",                                      // 43
    "Venus Flytrap",                              // 44
    "Yucca",                                      // 45
    "ZZ Plant (Zamioculcas zamiifolia)",          // 46
];

const FERNS: [&str; 3] = [
    "Asparagus Fern (Asparagus setaceus)",
    "Birds Nest Fern (Asplenium nidus)",
    "Boston Fern (Nephrolepis exaltata)",
];

const SUCCULENTS: [&str; 6] = [
    "Aloe Vera",
    "Christmas Cactus (Schlumbergera bridgesii)",
    "Jade Plant (Crassula ovata)",
    "Kalanchoe",
    "Snake Plant (Sansevieria)",
    "ZZ Plant (Zamioculcas zamiifolia)",
];

const PALMS: [&str; 4] = [
    "Areca Palm (Dypsis lutescens)",
    "Parlor Palm (Chamaedorea elegans)",
    "Ponytail Palm (Beaucarnea recurvata)",
    "Sago Palm (Cycas revoluta)",
];

/// Care group a species belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesGroup {
    Ferns,
    Succulents,
    Palms,
    /// General houseplants: every listed species outside the other groups
    Ornamental,
}

impl SpeciesGroup {
    pub const ALL: [SpeciesGroup; 4] = [
        SpeciesGroup::Ferns,
        SpeciesGroup::Succulents,
        SpeciesGroup::Palms,
        SpeciesGroup::Ornamental,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpeciesGroup::Ferns => "ferns",
            SpeciesGroup::Succulents => "succulents",
            SpeciesGroup::Palms => "palms",
            SpeciesGroup::Ornamental => "ornamental",
        }
    }
}

impl std::fmt::Display for SpeciesGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the group of a species by its exact name
///
/// Returns `None` for names that are not in [`SPECIES`].
pub fn group_of(species: &str) -> Option<SpeciesGroup> {
    if !SPECIES.contains(&species) {
        return None;
    }

    let group = if FERNS.contains(&species) {
        SpeciesGroup::Ferns
    } else if SUCCULENTS.contains(&species) {
        SpeciesGroup::Succulents
    } else if PALMS.contains(&species) {
        SpeciesGroup::Palms
    } else {
        SpeciesGroup::Ornamental
    };

    Some(group)
}

/// All species belonging to a group, in table order
pub fn species_in(group: SpeciesGroup) -> Vec<&'static str> {
    SPECIES
        .iter()
        .copied()
        .filter(|name| group_of(name) == Some(group))
        .collect()
}

/// A caller's reference to a species: either its name or its index in [`SPECIES`]
///
/// Deserializes from a string, an integer, or a float with no fractional part
/// (`29.0`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpeciesRef {
    Index(i64),
    Name(String),
}

impl SpeciesRef {
    /// Resolve to the canonical species name, if the reference names a known species
    ///
    /// A name that is not in the table but parses as an integer (`"29"`) is
    /// treated as an index.
    pub fn resolve(&self) -> Option<&'static str> {
        match self {
            SpeciesRef::Index(idx) => usize::try_from(*idx)
                .ok()
                .and_then(|i| SPECIES.get(i).copied()),
            SpeciesRef::Name(name) => SPECIES
                .iter()
                .copied()
                .find(|s| *s == name.as_str())
                .or_else(|| {
                    name.trim()
                        .parse::<i64>()
                        .ok()
                        .and_then(|idx| SpeciesRef::Index(idx).resolve())
                }),
        }
    }
}

impl<'de> Deserialize<'de> for SpeciesRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SpeciesRefVisitor)
    }
}

struct SpeciesRefVisitor;

impl<'de> Visitor<'de> for SpeciesRefVisitor {
    type Value = SpeciesRef;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a species name or a whole-number species index")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<SpeciesRef, E> {
        Ok(SpeciesRef::Index(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SpeciesRef, E> {
        i64::try_from(v)
            .map(SpeciesRef::Index)
            .map_err(|_| E::custom(format!("species index {} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<SpeciesRef, E> {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            Ok(SpeciesRef::Index(v as i64))
        } else {
            Err(E::custom(format!("species index must be a whole number, got {}", v)))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<SpeciesRef, E> {
        Ok(SpeciesRef::Name(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<SpeciesRef, E> {
        Ok(SpeciesRef::Name(v))
    }
}

impl From<&str> for SpeciesRef {
    fn from(name: &str) -> Self {
        SpeciesRef::Name(name.to_string())
    }
}

impl std::fmt::Display for SpeciesRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeciesRef::Index(idx) => write!(f, "#{}", idx),
            SpeciesRef::Name(name) => f.write_str(name),
        }
    }
}

impl std::str::FromStr for SpeciesRef {
    type Err = std::convert::Infallible;

    /// Plain integers are treated as indices, anything else as a name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(idx) => SpeciesRef::Index(idx),
            Err(_) => SpeciesRef::Name(s.to_string()),
        })
    }
}
