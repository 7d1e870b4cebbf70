//! The ordered list of algorithms offered to callers.

use json::{JsonValue, object};

use crate::{
    dithering::{
        DitheringType, error_diffusion::ErrorDiffusionType, halftone::HalftoneType,
        threshold::ThresholdType,
    },
    error::{DitherError, Result},
    params::Attribute,
};
use crate::dithering::DitheringType::{ErrorDiffusion as Ed, Halftone as Ht, Ordered as Od};

/// A registered algorithm: its display name and what runs behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub name: &'static str,
    pub kind: DitheringType,
}

impl Strategy {
    const fn new(name: &'static str, kind: DitheringType) -> Self {
        Self { name, kind }
    }

    pub fn attributes(&self) -> &'static [Attribute] {
        self.kind.attributes()
    }

    pub fn to_json(&self) -> JsonValue {
        let attributes: Vec<JsonValue> =
            self.attributes().iter().map(Attribute::to_json).collect();
        object! {
            name: self.name,
            attributes: attributes,
        }
    }
}

/// Display order is part of the contract.
static STRATEGIES: [Strategy; 21] = [
    Strategy::new("Atkinson", Ed(ErrorDiffusionType::Atkinson)),
    Strategy::new("Floyd-Steinberg", Ed(ErrorDiffusionType::FloydSteinberg)),
    Strategy::new("AM Halftoning", Ht(HalftoneType::AmplitudeModulated)),
    Strategy::new("FM Halftoning", Ht(HalftoneType::FrequencyModulated)),
    Strategy::new("Dot Diffusion", Ed(ErrorDiffusionType::DotDiffusion)),
    Strategy::new("Checkerboard", Od(ThresholdType::Checkerboard)),
    Strategy::new("Additive Noise", Ht(HalftoneType::AdditiveNoise)),
    Strategy::new("White Noise", Ht(HalftoneType::WhiteNoise)),
    Strategy::new("Jarvis-Judice-Ninke", Ed(ErrorDiffusionType::JarvisJudiceNinke)),
    Strategy::new("Bayer Matrix", Od(ThresholdType::Bayer)),
    Strategy::new("Clustered Dot Ordered", Od(ThresholdType::ClusteredDot)),
    Strategy::new("Stucki", Ed(ErrorDiffusionType::Stucki)),
    Strategy::new("Sierra-3", Ed(ErrorDiffusionType::Sierra3)),
    Strategy::new("Sierra-2", Ed(ErrorDiffusionType::Sierra2)),
    Strategy::new("Sierra Lite", Ed(ErrorDiffusionType::SierraLite)),
    Strategy::new("Gradient-based", Ed(ErrorDiffusionType::GradientBased)),
    Strategy::new("Dispersed Dot Ordered", Od(ThresholdType::DispersedDot)),
    Strategy::new("Void-and-Cluster", Od(ThresholdType::VoidAndCluster)),
    Strategy::new("Stochastic Screening", Ht(HalftoneType::StochasticScreening)),
    Strategy::new("Electrostatic Halftoning", Ht(HalftoneType::Electrostatic)),
    Strategy::new("Lattice-Boltzmann", Ht(HalftoneType::LatticeBoltzmann)),
];

pub fn strategies() -> &'static [Strategy] {
    &STRATEGIES
}

/// Find a strategy by its exact display name.
pub fn lookup(name: &str) -> Result<&'static Strategy> {
    STRATEGIES
        .iter()
        .find(|strategy| strategy.name == name)
        .ok_or_else(|| DitherError::UnknownAlgorithm(name.to_string()))
}

/// Names and schemas in display order.
pub fn list_algorithms() -> Vec<(&'static str, &'static [Attribute])> {
    STRATEGIES
        .iter()
        .map(|strategy| (strategy.name, strategy.attributes()))
        .collect()
}

/// The whole registry as a JSON array, for front ends building their forms.
pub fn algorithms_json() -> JsonValue {
    JsonValue::Array(STRATEGIES.iter().map(Strategy::to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_lookup() {
        let strategy = lookup("Sierra Lite").unwrap();
        assert_eq!(strategy.kind, Ed(ErrorDiffusionType::SierraLite));
        assert!(matches!(
            lookup("sierra lite"),
            Err(DitherError::UnknownAlgorithm(name)) if name == "sierra lite"
        ));
    }

    #[test]
    fn test_names_are_unique() {
        assert!(STRATEGIES.iter().map(|s| s.name).all_unique());
        assert!(STRATEGIES.iter().map(|s| s.kind).all_unique());
    }

    #[test]
    fn test_attribute_names_unique_per_schema() {
        for strategy in strategies() {
            assert!(
                strategy.attributes().iter().map(|a| a.name).all_unique(),
                "{}",
                strategy.name
            );
        }
    }

    #[test]
    fn test_algorithms_json() {
        let json = algorithms_json();
        assert_eq!(json.len(), 21);
        assert_eq!(json[0]["name"], "Atkinson");
        assert_eq!(json[20]["name"], "Lattice-Boltzmann");
        assert_eq!(json[5]["attributes"][0]["name"], "scale");
    }
}
