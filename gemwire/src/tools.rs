//! Toy tools the demo declares to the model and runs locally

use gemwire_llm::types::ToolCallResponse;
use gemwire_llm::{ToolCall, ToolDefinition};
use serde::Deserialize;
use serde_json::json;

/// Declarations sent with every request
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            "get_weather",
            "Get the current weather for a location",
            json!({
                "type": "object",
                "properties": {
                    "location": {"type": "string", "description": "City name, e.g. Tokyo"}
                },
                "required": ["location"]
            }),
        ),
        ToolDefinition::function(
            "calculator",
            "Perform a basic arithmetic operation",
            json!({
                "type": "object",
                "properties": {
                    "operation": {"type": "string", "enum": ["add", "subtract", "multiply", "divide"]},
                    "a": {"type": "number"},
                    "b": {"type": "number"}
                },
                "required": ["operation", "a", "b"]
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
}

#[derive(Debug, Deserialize)]
struct CalculatorArgs {
    operation: String,
    a: f64,
    b: f64,
}

/// Run one tool call and wrap its output for the follow-up request
///
/// Failures are reported back to the model as an `error` object instead of
/// aborting the exchange.
pub fn execute(call: &ToolCall) -> ToolCallResponse {
    let name = call.function.name.as_str();
    let output = match name {
        "get_weather" => serde_json::from_str::<WeatherArgs>(&call.function.arguments)
            .map(|args| weather(&args.location))
            .map_err(|e| e.to_string()),
        "calculator" => serde_json::from_str::<CalculatorArgs>(&call.function.arguments)
            .map_err(|e| e.to_string())
            .and_then(|args| calculate(&args)),
        other => Err(format!("unknown tool `{other}`")),
    };

    let content = output.unwrap_or_else(|error| json!({ "error": error })).to_string();
    ToolCallResponse::new(name, content)
}

fn weather(location: &str) -> serde_json::Value {
    json!({
        "location": location,
        "temperature": 22,
        "unit": "celsius",
        "condition": "sunny"
    })
}

fn calculate(args: &CalculatorArgs) -> Result<serde_json::Value, String> {
    let result = match args.operation.as_str() {
        "add" => args.a + args.b,
        "subtract" => args.a - args.b,
        "multiply" => args.a * args.b,
        "divide" if args.b.abs() < f64::EPSILON => return Err("division by zero".to_owned()),
        "divide" => args.a / args.b,
        other => return Err(format!("unsupported operation `{other}`")),
    };

    Ok(json!({ "result": result }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(call: &ToolCall) -> serde_json::Value {
        serde_json::from_str(&execute(call).content).unwrap()
    }

    #[test]
    fn both_tools_are_declared() {
        let names: Vec<_> = definitions().into_iter().map(|t| t.function.name).collect();
        assert_eq!(names, ["get_weather", "calculator"]);
    }

    #[test]
    fn weather_echoes_location() {
        let call = ToolCall::new("call_0", "get_weather", r#"{"location":"Tokyo"}"#);
        let response = execute(&call);
        assert_eq!(response.name, "get_weather");
        assert_eq!(output(&call)["location"], "Tokyo");
    }

    #[test]
    fn calculator_multiplies() {
        let call = ToolCall::new("call_1", "calculator", r#"{"operation":"multiply","a":25,"b":17}"#);
        assert_eq!(output(&call)["result"], 425.0);
    }

    #[test]
    fn division_by_zero_is_reported_to_the_model() {
        let call = ToolCall::new("call_0", "calculator", r#"{"operation":"divide","a":1,"b":0}"#);
        assert_eq!(output(&call)["error"], "division by zero");
    }

    #[test]
    fn unknown_tool_is_reported_to_the_model() {
        let call = ToolCall::new("call_0", "search", "{}");
        assert!(output(&call)["error"].as_str().unwrap().contains("search"));
    }

    #[test]
    fn bad_arguments_are_reported_to_the_model() {
        let call = ToolCall::new("call_0", "get_weather", r#"{"city":"Tokyo"}"#);
        assert!(output(&call)["error"].as_str().unwrap().contains("location"));
    }
}
