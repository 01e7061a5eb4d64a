//! Bakecost MCP Server Implementation
//!
//! Implements the MCP server with all costing tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::snapshot::Snapshot;
use crate::tools::costing;
use crate::tools::status::StatusTracker;

/// Bakecost MCP Service
#[derive(Clone)]
pub struct BakecostService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    /// Replaced wholesale by reload_snapshot
    snapshot: Arc<RwLock<Snapshot>>,
    tool_router: ToolRouter<BakecostService>,
}

impl BakecostService {
    pub fn new(snapshot_path: PathBuf, snapshot: Snapshot) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(snapshot_path))),
            snapshot: Arc::new(RwLock::new(snapshot)),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Response Structs
// ============================================================================

#[derive(Debug, Serialize)]
struct ReloadSnapshotResponse {
    success: bool,
    snapshot_path: String,
    ingredient_count: usize,
    recipe_count: usize,
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitsParams {
    /// Quantity to convert (must be >= 0)
    pub quantity: f64,
    /// Source unit, e.g. "g", "cup", "lb", "each"
    pub from: String,
    /// Target unit
    pub to: String,
    /// Density in g/ml, required when converting between mass and volume
    pub density_g_per_ml: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientCostParams {
    /// Ingredient ID
    pub ingredient_id: String,
    /// Quantity used
    pub quantity: f64,
    /// Unit of the quantity
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeCostParams {
    /// Recipe ID
    pub recipe_id: String,
    /// Fail on the first line that cannot be costed instead of reporting warnings (default false)
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeAllergensParams {
    /// Recipe ID
    pub recipe_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckSubRecipeParams {
    /// Recipe that would consume the sub-recipe
    pub recipe_id: String,
    /// Recipe to be linked as a sub-recipe
    pub sub_recipe_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AffectedRecipesParams {
    /// Ingredient ID
    pub ingredient_id: String,
}

#[tool_router]
impl BakecostService {
    // --- Status ---

    #[tool(description = "Get the current status of the costing service including build info, snapshot counts, and process information")]
    async fn costing_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let snapshot = self.snapshot.read().await;
        let status = tracker.get_status(&snapshot);
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Reload the ingredient and recipe snapshot from disk, replacing the one in memory")]
    async fn reload_snapshot(&self) -> Result<CallToolResult, McpError> {
        let mut tracker = self.status_tracker.lock().await;
        let path = tracker.snapshot_path().clone();

        let fresh = Snapshot::load(&path).map_err(|e| {
            McpError::internal_error(format!("Failed to reload snapshot: {}", e), None)
        })?;
        let result = ReloadSnapshotResponse {
            success: true,
            snapshot_path: path.display().to_string(),
            ingredient_count: fresh.ingredient_count(),
            recipe_count: fresh.recipe_count(),
        };

        *self.snapshot.write().await = fresh;
        tracker.mark_reloaded();

        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Conversion ---

    #[tool(description = "Convert a quantity between units. Mass and volume convert into each other only when density_g_per_ml is given; count units (each, slices) never convert to mass or volume.")]
    fn convert_units(&self, Parameters(p): Parameters<ConvertUnitsParams>) -> Result<CallToolResult, McpError> {
        let result = costing::convert_units(p.quantity, &p.from, &p.to, p.density_g_per_ml)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Costing ---

    #[tool(description = "Cost of a quantity of one ingredient, priced from its pack size and pack price")]
    async fn ingredient_cost(&self, Parameters(p): Parameters<IngredientCostParams>) -> Result<CallToolResult, McpError> {
        let snapshot = self.snapshot.read().await;
        let result = costing::ingredient_cost(&snapshot, &p.ingredient_id, p.quantity, &p.unit)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Full cost breakdown of a recipe including nested sub-recipes. Lines that cannot be costed are reported as warnings and the total is marked incomplete, unless strict=true.")]
    async fn recipe_cost(&self, Parameters(p): Parameters<RecipeCostParams>) -> Result<CallToolResult, McpError> {
        let snapshot = self.snapshot.read().await;
        let result = costing::recipe_cost(&snapshot, &p.recipe_id, p.strict)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Sorted, de-duplicated allergens of a recipe, its ingredients and all nested sub-recipes")]
    async fn recipe_allergens(&self, Parameters(p): Parameters<RecipeAllergensParams>) -> Result<CallToolResult, McpError> {
        let snapshot = self.snapshot.read().await;
        let result = costing::recipe_allergens(&snapshot, &p.recipe_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Recipe graph ---

    #[tool(description = "Check whether linking sub_recipe_id into recipe_id would create a cycle. Use before adding a sub-recipe.")]
    async fn check_sub_recipe(&self, Parameters(p): Parameters<CheckSubRecipeParams>) -> Result<CallToolResult, McpError> {
        let snapshot = self.snapshot.read().await;
        let result = costing::check_sub_recipe(&snapshot, &p.recipe_id, &p.sub_recipe_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List every recipe whose cost depends on an ingredient, sub-recipes before the recipes that use them")]
    async fn affected_recipes(&self, Parameters(p): Parameters<AffectedRecipesParams>) -> Result<CallToolResult, McpError> {
        let snapshot = self.snapshot.read().await;
        let result = costing::affected_recipes(&snapshot, &p.ingredient_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for BakecostService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bakecost".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Bakery Costing Engine".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Bakecost - ingredient and recipe costing for a bakery. \
                 Status: costing_status, reload_snapshot. \
                 Units: convert_units (mass/volume need density_g_per_ml to cross). \
                 Costing: ingredient_cost, recipe_cost (strict=true to fail on any bad line). \
                 Allergens: recipe_allergens. \
                 Recipe graph: check_sub_recipe before linking, affected_recipes after a price change."
                    .into(),
            ),
        }
    }
}
