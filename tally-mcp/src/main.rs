//! Tally MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio. Logs go to stderr.
//!
//! Tools:
//! - one per registry function (convert_units, bmi, emi, epf, ...)
//! - currency_convert: Convert with live rates through a sequenced session
//! - catalog: List calculator sections or search them
//! - open_route: Resolve a page href to its calculator
//! - help: Get documentation for a function

mod config;

use config::ServerConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use tally::Tally;
use tally_core::Value;
use tally_currency::{conversion_value, normalize_code, CurrencySession, RateSource};
use tally_plugin::{args::extract_number, FunctionMeta};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "tally";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: -32602, message: message.into(), data: None }
    }
}

fn parse_error_response(details: &str) -> McpResponse {
    McpResponse {
        jsonrpc: "2.0".to_string(),
        id: None,
        result: None,
        error: Some(McpError { code: -32700, message: format!("Parse error: {}", details), data: None }),
    }
}

/// Calculator engine plus the live currency session
struct Server {
    tally: Tally,
    source: Box<dyn RateSource>,
    session: Option<CurrencySession>,
}

impl Server {
    fn new(tally: Tally, source: Box<dyn RateSource>) -> Self {
        Server { tally, source, session: None }
    }

    fn from_config(config: &ServerConfig) -> Self {
        Self::new(Tally::with_standard_library().with_decimals(config.decimals), config.rate_source())
    }

    async fn handle_request(&mut self, request: &McpRequest) -> McpResponse {
        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => handle_initialize(&request.params),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => Ok(self.tools_list()),
            "tools/call" => self.handle_tool_call(&request.params).await,

            _ => Err(McpError {
                code: -32601,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };

        match result {
            Ok(r) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id.clone(),
                result: Some(r),
                error: None,
            },
            Err(e) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id.clone(),
                result: None,
                error: Some(e),
            },
        }
    }

    fn tools_list(&self) -> JsonValue {
        let mut tools: Vec<JsonValue> = self.tally.registry().metas().iter().map(function_tool).collect();
        tools.extend(builtin_tools());
        json!({ "tools": tools })
    }

    async fn handle_tool_call(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let args = params.get("arguments").cloned().unwrap_or(json!({}));
        if !args.is_object() {
            return Err(McpError::invalid_params("Tool arguments must be an object"));
        }
        debug!(tool = name, "tool call");

        match name {
            "currency_convert" => Ok(self.tool_currency_convert(&args).await),
            "catalog" => Ok(self.tool_catalog(&args)),
            "open_route" => self.tool_open_route(&args),
            "help" => Ok(self.tool_help(&args)),
            _ if self.tally.registry().get_function(name).is_some() => Ok(self.tool_function(name, &args)),
            _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
        }
    }

    fn tool_function(&self, name: &str, args: &JsonValue) -> JsonValue {
        let named: HashMap<String, Value> = args.as_object()
            .map(|obj| obj.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect())
            .unwrap_or_default();
        tool_result(&self.tally.call_named(name, &named))
    }

    async fn tool_currency_convert(&mut self, args: &JsonValue) -> JsonValue {
        let result = self.currency_convert(args).await;
        tool_result(&result)
    }

    async fn currency_convert(&mut self, args: &JsonValue) -> Value {
        let amount = match extract_number(&arg_value(args, "amount"), "currency_convert", "amount") {
            Ok(a) => a,
            Err(e) => return Value::Error(e),
        };
        let from = args.get("from").and_then(|v| v.as_str()).unwrap_or("USD");
        let to = args.get("to").and_then(|v| v.as_str()).unwrap_or("EUR");
        let force = args.get("refresh").and_then(|v| v.as_bool()).unwrap_or(false);

        // Both codes are checked before the session changes
        let (from, to) = match normalize_code(from).and_then(|f| normalize_code(to).map(|t| (f, t))) {
            Ok(codes) => codes,
            Err(e) => return Value::Error(e.into()),
        };

        let mut session = match self.session.take() {
            Some(mut s) => match s.set_from(&from).and_then(|_| s.set_to(&to)) {
                Ok(()) => s,
                Err(e) => {
                    self.session = Some(s);
                    return Value::Error(e.into());
                }
            },
            None => match CurrencySession::new(&from, &to) {
                Ok((s, _initial)) => s,
                Err(e) => return Value::Error(e.into()),
            },
        };

        if force {
            session.refresh_ticket();
        }
        if force || !session.is_ready() {
            let outcome = session.refresh(self.source.as_ref()).await;
            info!(source = self.source.name(), base = session.from(), ?outcome, "rate refresh");
        }

        let value = match session.convert(amount) {
            Ok(c) => {
                let mut value = conversion_value(&c);
                if let (Value::Object(map), Some(snapshot)) = (&mut value, session.snapshot()) {
                    map.insert("fetched_at".to_string(), Value::Text(snapshot.fetched_at.to_rfc3339()));
                    map.insert("source".to_string(), Value::from(self.source.name()));
                }
                value
            }
            Err(e) => Value::Error(e.into()),
        };
        self.session = Some(session);
        value
    }

    fn tool_catalog(&self, args: &JsonValue) -> JsonValue {
        let query = args.get("query").and_then(|v| v.as_str());
        tool_result(&self.tally.catalog(query))
    }

    fn tool_open_route(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let href = args.get("href")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing href argument"))?;
        Ok(tool_result(&self.tally.open_route(href)))
    }

    fn tool_help(&self, args: &JsonValue) -> JsonValue {
        let name = args.get("name").and_then(|v| v.as_str());
        let help = self.tally.help(name);
        json!({
            "content": [{ "type": "text", "text": format_help(&help) }],
            "data": help.to_json(),
            "isError": help.is_error()
        })
    }
}

fn arg_value(args: &JsonValue, key: &str) -> Value {
    args.get(key).map(Value::from_json).unwrap_or(Value::Null)
}

/// Wrap a calculator result as tool output; errors become `isError` results
fn tool_result(value: &Value) -> JsonValue {
    let text = match value {
        Value::Error(e) => e.to_string(),
        Value::Text(s) => s.clone(),
        other => serde_json::to_string_pretty(&other.to_json()).unwrap_or_else(|_| other.to_string()),
    };
    json!({
        "content": [{ "type": "text", "text": text }],
        "data": value.to_json(),
        "isError": value.is_error()
    })
}

fn json_type(typ: &str) -> &'static str {
    match typ {
        "Number" => "number",
        "Text" => "string",
        "Bool" => "boolean",
        "Object" => "object",
        "List" => "array",
        _ => "string",
    }
}

/// Tool descriptor for a registry function; the schema mirrors its ArgMeta
fn function_tool(meta: &FunctionMeta) -> JsonValue {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for arg in meta.args {
        let mut prop = json!({ "type": json_type(arg.typ), "description": arg.description });
        if let Some(default) = arg.default {
            prop["default"] = JsonValue::String(default.to_string());
        }
        properties.insert(arg.name.to_string(), prop);
        if !arg.optional {
            required.push(arg.name);
        }
    }
    json!({
        "name": meta.name,
        "description": format!("{} Usage: {}", meta.description, meta.usage),
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required
        }
    })
}

fn builtin_tools() -> Vec<JsonValue> {
    vec![
        json!({
            "name": "currency_convert",
            "description": "Convert an amount between currencies using live exchange rates. Rates are cached per source currency.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "amount": { "type": "number", "description": "Amount to convert" },
                    "from": { "type": "string", "description": "Source currency code (default USD)" },
                    "to": { "type": "string", "description": "Target currency code (default EUR)" },
                    "refresh": { "type": "boolean", "description": "Refetch rates even if cached" }
                },
                "required": ["amount"]
            }
        }),
        json!({
            "name": "catalog",
            "description": "List the calculator sections, or search them by title, description or section.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search text. Omit to list every section." }
                }
            }
        }),
        json!({
            "name": "open_route",
            "description": "Resolve a page href such as /bmi or /units?type=torque to the functions behind it.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "href": { "type": "string", "description": "Page href" }
                },
                "required": ["href"]
            }
        }),
        json!({
            "name": "help",
            "description": "Get documentation for a function, or general help.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Function name. Omit for general help." }
                }
            }
        }),
    ]
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if let Some(Value::Object(cats)) = map.get("functions") {
                let mut names: Vec<_> = cats.keys().collect();
                names.sort();
                for cat in names {
                    out.push_str(&format!("**{}**: {}\n", cat, cats[cat]));
                }
            }
            out
        }
        Value::Error(e) => format!("Error: {}", e.message),
        other => other.to_string(),
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Everyday calculators: units, BMI, EMI, EPF, currency and timestamps"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Tally exposes unit conversion and everyday calculators as tools. Use 'help' to explore functions and 'catalog' to browse them by section."
    }))
}

async fn write_response(stdout: &mut io::Stdout, response: &McpResponse) -> std::io::Result<()> {
    let body = serde_json::to_string(response)
        .unwrap_or_else(|e| format!(r#"{{"jsonrpc":"2.0","error":{{"code":-32603,"message":"{}"}}}}"#, e));
    stdout.write_all(body.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = ServerConfig::from_env();
    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, ?config, "Tally MCP server started");

    let mut server = Server::from_config(&config);
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("client disconnected (EOF)");
                break;
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "error parsing request");
                if let Err(e) = write_response(&mut stdout, &parse_error_response(&e.to_string())).await {
                    error!(error = %e, "error writing response");
                    break;
                }
                continue;
            }
        };

        debug!(method = %request.method, "processing");
        let response = server.handle_request(&request).await;

        // Notifications (no id) should NOT receive a response
        if request.id.is_none() {
            debug!(method = %request.method, "notification processed");
            continue;
        }

        if let Err(e) = write_response(&mut stdout, &response).await {
            error!(error = %e, "error writing response");
            break;
        }
    }

    info!("server shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_currency::StaticRateSource;

    fn server() -> Server {
        Server::new(Tally::with_standard_library(), Box::new(StaticRateSource::reference()))
    }

    fn request(method: &str, params: JsonValue) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    async fn call_tool(server: &mut Server, name: &str, arguments: JsonValue) -> JsonValue {
        let response = server.handle_request(&request("tools/call", json!({ "name": name, "arguments": arguments }))).await;
        assert!(response.error.is_none(), "protocol error: {:?}", response.error);
        response.result.unwrap()
    }

    #[tokio::test]
    async fn test_initialize_echoes_protocol() {
        let mut s = server();
        let response = s.handle_request(&request("initialize", json!({
            "protocolVersion": "2025-03-26",
            "clientInfo": { "name": "test" }
        }))).await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "tally");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let mut s = server();
        let response = s.handle_request(&request("resources/list", json!({}))).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn test_parse_error_response() {
        let response = parse_error_response("eof");
        assert!(response.id.is_none());
        assert_eq!(response.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_tools_list_covers_registry_and_builtins() {
        let mut s = server();
        let result = s.handle_request(&request("tools/list", json!({}))).await.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        for expected in ["convert_units", "bmi", "emi", "epf", "epoch_to_datetime", "currency_convert", "catalog", "open_route", "help"] {
            assert!(names.contains(&expected), "missing tool {}", expected);
        }

        let bmi = tools.iter().find(|t| t["name"] == "bmi").unwrap();
        assert_eq!(bmi["inputSchema"]["properties"]["height"]["type"], "number");
        assert_eq!(bmi["inputSchema"]["required"], json!(["height", "weight"]));
    }

    #[tokio::test]
    async fn test_registry_tool_call() {
        let mut s = server();
        let result = call_tool(&mut s, "convert_units", json!({
            "value": 1, "category": "length", "from_unit": "km", "to_unit": "m"
        })).await;
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"], json!(1000.0));
    }

    #[tokio::test]
    async fn test_tool_failure_is_error_result() {
        let mut s = server();
        let result = call_tool(&mut s, "convert_units", json!({
            "value": 1, "category": "length", "from_unit": "km", "to_unit": "kg"
        })).await;
        assert_eq!(result["isError"], true);
        assert_eq!(result["data"]["_error"]["code"], "INVALID_UNIT");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let mut s = server();
        let response = s.handle_request(&request("tools/call", json!({ "name": "nope" }))).await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_currency_convert_live_session() {
        let mut s = server();
        let result = call_tool(&mut s, "currency_convert", json!({ "amount": 100, "from": "usd", "to": "EUR" })).await;
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"]["result_display"], "85.00");
        assert_eq!(result["data"]["source"], "reference");

        // Same base reuses the snapshot; a new base refetches
        let result = call_tool(&mut s, "currency_convert", json!({ "amount": 10, "from": "USD", "to": "INR" })).await;
        assert_eq!(result["data"]["result_display"], "745.00");
        let result = call_tool(&mut s, "currency_convert", json!({ "amount": 1, "from": "EUR", "to": "USD" })).await;
        assert_eq!(result["data"]["rate_display"], "1.1800");
    }

    #[tokio::test]
    async fn test_currency_convert_errors() {
        let mut s = server();
        let result = call_tool(&mut s, "currency_convert", json!({ "amount": 1, "from": "USD", "to": "XYZ" })).await;
        assert_eq!(result["isError"], true);
        assert_eq!(result["data"]["_error"]["code"], "RATE_UNAVAILABLE");

        let result = call_tool(&mut s, "currency_convert", json!({ "amount": "lots" })).await;
        assert_eq!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_bad_target_leaves_session_untouched() {
        let mut s = server();
        call_tool(&mut s, "currency_convert", json!({ "amount": 1, "from": "USD", "to": "EUR" })).await;

        let result = call_tool(&mut s, "currency_convert", json!({ "amount": 1, "from": "GBP", "to": "euro" })).await;
        assert_eq!(result["isError"], true);

        let session = s.session.as_ref().unwrap();
        assert_eq!(session.from(), "USD");
        assert_eq!(session.to(), "EUR");
        assert!(session.pending().is_none());
        assert!(session.is_ready());
    }

    #[tokio::test]
    async fn test_catalog_and_open_route() {
        let mut s = server();
        let result = call_tool(&mut s, "catalog", json!({ "query": "pension" })).await;
        assert_eq!(result["data"][0]["href"], "/epf");

        let result = call_tool(&mut s, "open_route", json!({ "href": "/units?type=torque" })).await;
        assert_eq!(result["data"]["category"], "torque");
        let result = call_tool(&mut s, "open_route", json!({ "href": "/missing" })).await;
        assert_eq!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_help_tool() {
        let mut s = server();
        let result = call_tool(&mut s, "help", json!({ "name": "emi" })).await;
        assert!(result["content"][0]["text"].as_str().unwrap().starts_with("# emi"));
        let result = call_tool(&mut s, "help", json!({})).await;
        assert_eq!(result["isError"], false);
    }
}
