//! Current generation mix reshaping
//!
//! Turns the `/generation` payload into a flat table of fuel shares.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fetcher::ApiError;

/// One fuel's share of current generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelShare {
    /// Fuel type (e.g. "wind", "gas")
    pub fuel: String,
    /// Percentage of total generation
    pub perc: f64,
}

/// Generation mix table with columns `fuel` and `perc`, in response order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct GenerationMix {
    rows: Vec<FuelShare>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: GenerationData,
}

#[derive(Debug, Deserialize)]
struct GenerationData {
    generationmix: Vec<FuelShare>,
}

impl GenerationMix {
    pub fn new(rows: Vec<FuelShare>) -> Self {
        Self { rows }
    }

    /// Reshape a `{"data": {"generationmix": [...]}}` document
    ///
    /// # Returns
    /// * `Ok(GenerationMix)` - One row per fuel
    /// * `Err(ApiError::Parse)` - If the document does not have that shape
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        let response = GenerationResponse::deserialize(value)?;
        Ok(Self::new(response.data.generationmix))
    }

    pub fn rows(&self) -> &[FuelShare] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all percentages (close to 100 for a well-formed response)
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|row| row.perc).sum()
    }

    /// Largest single share, if any
    pub fn max_share(&self) -> Option<&FuelShare> {
        self.rows.iter().max_by(|a, b| a.perc.total_cmp(&b.perc))
    }
}
