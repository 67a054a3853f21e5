//! Query parameters for a mood-targeted track recommendation request.
//!
//! Only the query is built here; fetching, auth and token refresh belong to
//! the music-service client.

use serde::Serialize;

use crate::mood::RegulationTarget;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_SEED_GENRES: [&str; 5] = ["pop", "rock", "electronic", "hip-hop", "indie"];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    pub limit: u32,
    pub seed_genres: Vec<String>,
    /// 0..1 scale.
    pub target_valence: f64,
    /// 0..1 scale.
    pub target_energy: f64,
}

impl RecommendationQuery {
    /// Rescales a [-1, 1] regulation target onto the 0..1 scale recommendation
    /// APIs expect, clamping anything that falls outside.
    pub fn for_target(target: &RegulationTarget) -> Self {
        let (valence, energy) = target.to_unit_scale();
        Self {
            limit: DEFAULT_LIMIT,
            seed_genres: DEFAULT_SEED_GENRES.iter().map(|g| g.to_string()).collect(),
            target_valence: valence.clamp(0.0, 1.0),
            target_energy: energy.clamp(0.0, 1.0),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Key/value pairs ready for URL encoding; targets use two decimals.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("seed_genres", self.seed_genres.join(",")),
            ("target_valence", format!("{:.2}", self.target_valence)),
            ("target_energy", format!("{:.2}", self.target_energy)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::regulation_target;

    #[test]
    fn angry_target_becomes_calm_query() {
        let query = RecommendationQuery::for_target(&regulation_target("angry"));
        assert_eq!(
            query.query_pairs(),
            vec![
                ("limit", "10".to_string()),
                ("seed_genres", "pop,rock,electronic,hip-hop,indie".to_string()),
                ("target_valence", "0.75".to_string()),
                ("target_energy", "0.10".to_string()),
            ]
        );
    }

    #[test]
    fn out_of_range_targets_are_clamped() {
        let query = RecommendationQuery::for_target(&RegulationTarget::new(2.0, -3.0)).with_limit(3);
        assert_eq!(query.target_valence, 1.0);
        assert_eq!(query.target_energy, 0.0);
        assert_eq!(query.limit, 3);
    }
}
