//! `GET /openapi.json` and the `GET /docs` viewer.

use serde_json::{json, Map, Value};

use super::config::{ApiInfo, ServiceKind};

/// OpenAPI 3.1 description of the service's routes.
pub fn openapi(service: ServiceKind, info: &ApiInfo) -> Value {
    let mut api_info = json!({ "title": info.title, "version": info.version });
    if let Some(description) = &info.description {
        api_info["description"] = json!(description);
    }

    let mut paths = Map::new();
    match service {
        ServiceKind::Analysis => {
            paths.insert(
                "/analyze".to_string(),
                post_operation(
                    "Analyze Equation",
                    "AnalysisRequest",
                    "Solve an equation for x, or differentiate, integrate and sample an expression.",
                ),
            );
        }
        ServiceKind::Toolkit => {
            for (path, summary, description) in [
                ("/solve", "Solve Expression", "Simplify an expression."),
                ("/derivative", "Compute Derivative", "Differentiate with respect to the only symbol."),
                ("/integrate", "Compute Integral", "Integrate with respect to the only symbol."),
                ("/latex", "Convert To Latex", "Render an expression as LaTeX."),
            ] {
                paths.insert(
                    path.to_string(),
                    post_operation(summary, "ExpressionRequest", description),
                );
            }
            paths.insert(
                "/".to_string(),
                json!({
                    "get": {
                        "summary": "Read Root",
                        "responses": { "200": { "description": "Service is running" } }
                    }
                }),
            );
        }
    }

    json!({
        "openapi": "3.1.0",
        "info": api_info,
        "paths": paths,
        "components": { "schemas": schemas(service) },
    })
}

fn post_operation(summary: &str, request: &str, description: &str) -> Value {
    json!({
        "post": {
            "summary": summary,
            "description": description,
            "requestBody": {
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{request}") }
                    }
                }
            },
            "responses": {
                "200": {
                    "description": "Result, or an object with a single `error` field",
                    "content": { "application/json": { "schema": {} } }
                },
                "422": { "description": "Validation Error" }
            }
        }
    })
}

fn schemas(service: ServiceKind) -> Value {
    let field = match service {
        ServiceKind::Analysis => "equation",
        ServiceKind::Toolkit => "expression",
    };
    let name = match service {
        ServiceKind::Analysis => "AnalysisRequest",
        ServiceKind::Toolkit => "ExpressionRequest",
    };
    json!({
        name: {
            "title": name,
            "type": "object",
            "required": [field],
            "properties": { field: { "title": field, "type": "string" } }
        }
    })
}

/// HTML page that renders `/openapi.json` with Swagger UI.
pub fn docs_page(info: &ApiInfo) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
<title>{title} - Swagger UI</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>
SwaggerUIBundle({{ url: "/openapi.json", dom_id: "#swagger-ui" }});
</script>
</body>
</html>
"##,
        title = info.title
    )
}
