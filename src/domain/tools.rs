//! Interactive tools exposed via Model Context Protocol
//!
//! Provides `get_current_weather` and `get_weather_forecast` by delegating
//! to the configured `WeatherProvider` implementation.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::weather::{
    build_weather_query, group_forecast_days, render_forecast, WeatherArguments, WeatherReport,
};
use crate::mcp::rpc::{json_rpc_error, json_rpc_result};
use crate::AppState;

#[macros::mcp_tool(
    name = "get_current_weather",
    description = "Get current weather conditions for a location"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCurrentWeatherTool {
    /// City name, optionally with country code (e.g. "London" or "London,UK")
    pub location: String,
    /// Unit system: metric (default), imperial, or kelvin
    pub units: Option<String>,
}

#[macros::mcp_tool(
    name = "get_weather_forecast",
    description = "Get a 5-day weather forecast for a location"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetWeatherForecastTool {
    /// City name, optionally with country code (e.g. "London" or "London,UK")
    pub location: String,
    /// Unit system: metric (default), imperial, or kelvin
    pub units: Option<String>,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![GetCurrentWeatherTool::tool(), GetWeatherForecastTool::tool()]
}

fn tool_text_result(id: Option<Value>, text: String) -> Value {
    json_rpc_result(
        id,
        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(text, None, None))],
            is_error: None,
            meta: None,
            structured_content: None,
        })
        .expect("tool result serialization"),
    )
}

// Tool failures are business outcomes: they ride in an isError result,
// never in a JSON-RPC error envelope.
fn tool_error_result(id: Option<Value>, message: &str) -> Value {
    json_rpc_result(
        id,
        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(
                message.to_string(),
                None,
                None,
            ))],
            is_error: Some(true),
            meta: None,
            structured_content: None,
        })
        .expect("tool error result serialization"),
    )
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match tool_call.name.as_str() {
        "get_current_weather" => {
            let arguments: WeatherArguments =
                match serde_json::from_value(json!(tool_call.arguments.unwrap_or_default())) {
                    Ok(value) => value,
                    Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
                };

            let query = match build_weather_query(arguments) {
                Ok(query) => query,
                Err(err) => return tool_error_result(id, err.tool_message()),
            };

            match state
                .weather
                .current_conditions(&query.location, query.units)
                .await
            {
                Ok(conditions) => {
                    let report = WeatherReport::from_conditions(conditions, query.units);
                    tool_text_result(id, report.render())
                }
                Err(err) => tool_error_result(id, err.tool_message()),
            }
        }
        "get_weather_forecast" => {
            let arguments: WeatherArguments =
                match serde_json::from_value(json!(tool_call.arguments.unwrap_or_default())) {
                    Ok(value) => value,
                    Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
                };

            let query = match build_weather_query(arguments) {
                Ok(query) => query,
                Err(err) => return tool_error_result(id, err.tool_message()),
            };

            match state
                .weather
                .five_day_forecast(&query.location, query.units)
                .await
            {
                Ok(forecast) => {
                    let days = group_forecast_days(&forecast.list);
                    tool_text_result(id, render_forecast(&forecast.city.name, &days, query.units))
                }
                Err(err) => tool_error_result(id, err.tool_message()),
            }
        }
        _ => tool_error_result(id, &format!("Unknown tool: {}", tool_call.name)),
    }
}
