//! Recommendation orchestration — agronomic prompt assembly and delegation
//!
//! Composes the operator's location/soil/crop selection into a fixed prompt
//! template, delegates to the inference client under a fixed persona, and
//! hands the generated text back unmodified. Identical queries re-invoke the
//! remote service every time; there is no response cache.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::clients::InferenceClient;
use crate::error::Error;
use crate::types::{Recommendation, UserQuery};

/// System persona sent with every recommendation and chat request.
pub const AGRONOMY_PERSONA: &str = "You are an expert in precision agriculture.";

/// Render the fixed recommendation prompt. All three field values appear
/// verbatim in the output.
pub fn build_prompt(query: &UserQuery) -> String {
    format!(
        "Based on the given conditions:\n\
         - Location: {}\n\
         - Soil Type: {}\n\
         - Crop Type: {}\n\
         \n\
         Suggest the best irrigation practices, fertilizers, and water management.",
        query.location, query.soil_type, query.crop_type
    )
}

/// Orchestrates query -> prompt -> inference -> recommendation.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    inference: InferenceClient,
}

impl RecommendationOrchestrator {
    pub const fn new(inference: InferenceClient) -> Self {
        Self { inference }
    }

    /// Generate an irrigation recommendation for the given query.
    pub async fn recommend(
        &self,
        query: &UserQuery,
        cancel: &CancellationToken,
    ) -> Result<Recommendation, Error> {
        let prompt = build_prompt(query);
        info!(
            location = %query.location,
            soil = %query.soil_type,
            crop = %query.crop_type,
            "Requesting irrigation recommendation"
        );

        let text = self
            .inference
            .get_completion(AGRONOMY_PERSONA, &prompt, cancel)
            .await?;

        Ok(Recommendation {
            text,
            generated_at: Utc::now(),
        })
    }

    /// Free-form chat under the same agronomy persona.
    pub async fn chat(&self, message: &str, cancel: &CancellationToken) -> Result<String, Error> {
        self.inference
            .get_completion(AGRONOMY_PERSONA, message, cancel)
            .await
    }
}
