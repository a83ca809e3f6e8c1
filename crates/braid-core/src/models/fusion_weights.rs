use serde::{Deserialize, Serialize};

use super::Channel;

/// Per-channel fusion weights in `[0, 1]`, supplied by the intent classifier.
///
/// Weights need not sum to 1; fusion normalizes them. A weight of exactly 0
/// means the channel is not executed at all. EntityExpansion has no weight of
/// its own: it is derived from the GraphLocal weight (see [`FusionWeights::weight_for`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub multi_vector: f64,
    pub graph_local: f64,
    pub graph_global: f64,
}

impl FusionWeights {
    pub const fn new(multi_vector: f64, graph_local: f64, graph_global: f64) -> Self {
        Self {
            multi_vector,
            graph_local,
            graph_global,
        }
    }

    /// Resolved weight for a channel. EntityExpansion is `expansion_factor * graph_local`.
    pub fn weight_for(&self, channel: Channel, expansion_factor: f64) -> f64 {
        match channel {
            Channel::MultiVector => self.multi_vector,
            Channel::GraphLocal => self.graph_local,
            Channel::GraphGlobal => self.graph_global,
            Channel::EntityExpansion => self.graph_local * expansion_factor,
        }
    }

    pub fn is_all_zero(&self) -> bool {
        self.multi_vector == 0.0 && self.graph_local == 0.0 && self.graph_global == 0.0
    }

    /// Check every weight is finite and within `[0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        for (name, w) in self.named() {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(format!("{name} weight {w} outside [0, 1]"));
            }
        }
        Ok(())
    }

    /// Clamp into `[0, 1]`, mapping non-finite values to 0.
    pub fn sanitized(&self) -> Self {
        let clamp = |w: f64| if w.is_finite() { w.clamp(0.0, 1.0) } else { 0.0 };
        Self::new(
            clamp(self.multi_vector),
            clamp(self.graph_local),
            clamp(self.graph_global),
        )
    }

    fn named(&self) -> [(&'static str, f64); 3] {
        [
            ("multi_vector", self.multi_vector),
            ("graph_local", self.graph_local),
            ("graph_global", self.graph_global),
        ]
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_expansion_derives_from_graph_local() {
        let w = FusionWeights::new(0.6, 0.4, 0.2);
        assert_eq!(w.weight_for(Channel::EntityExpansion, 0.5), 0.2);
        assert_eq!(w.weight_for(Channel::GraphGlobal, 0.5), 0.2);
        assert_eq!(w.weight_for(Channel::MultiVector, 0.5), 0.6);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(FusionWeights::new(1.2, 0.0, 0.0).validate().is_err());
        assert!(FusionWeights::new(-0.1, 0.0, 0.0).validate().is_err());
        assert!(FusionWeights::new(f64::NAN, 0.0, 0.0).validate().is_err());
        assert!(FusionWeights::new(0.7, 0.3, 0.0).validate().is_ok());
    }

    #[test]
    fn sanitized_clamps() {
        let w = FusionWeights::new(1.5, -2.0, f64::INFINITY).sanitized();
        assert_eq!(w, FusionWeights::new(1.0, 0.0, 0.0));
        assert!(FusionWeights::new(0.0, 0.0, 0.0).is_all_zero());
    }
}
