//! Default ordering for `openapi.yaml` documents.
//!
//! The key orders follow the field tables of the OpenAPI specification
//! (<https://swagger.io/specification/>). Every listed object is first sorted
//! alphabetically and then has its specification fields pulled to the front,
//! so vendor extensions and unknown keys end up sorted after them.

use super::ordering::{simple_ordering, string_ordering};
use super::rule::Rule;

const OPERATIONS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Returns the opinionated OpenAPI rule catalog.
pub fn default_openapi_rules() -> Vec<Rule> {
    let sort = string_ordering;
    let operation = simple_ordering([
        "tags",
        "summary",
        "description",
        "externalDocs",
        "operationId",
        "parameters",
        "requestBody",
        "responses",
        "callbacks",
        "deprecated",
        "security",
        "servers",
    ]);
    let media_type = simple_ordering(["schema", "example", "examples", "encoding"]);
    let schema = simple_ordering([
        "title",
        "type",
        "format",
        "required",
        "oneOf",
        "anyOf",
        "allOf",
        "properties",
        "additionalProperties",
    ]);

    let mut rules = vec![
        Rule::new(
            "$",
            vec![
                sort(),
                simple_ordering([
                    "openapi",
                    "info",
                    "jsonSchemaDialect",
                    "servers",
                    "paths",
                    "webhooks",
                    "components",
                    "security",
                    "tags",
                    "externalDocs",
                ]),
            ],
        ),
        Rule::new(
            "$.info",
            vec![
                sort(),
                simple_ordering([
                    "title",
                    "summary",
                    "description",
                    "termsOfService",
                    "contact",
                    "license",
                    "version",
                ]),
            ],
        ),
        Rule::new(
            "$.info.contact",
            vec![sort(), simple_ordering(["name", "url", "email"])],
        ),
        Rule::new(
            "$.info.license",
            vec![sort(), simple_ordering(["name", "identifier", "url"])],
        ),
        Rule::new(
            "$.servers[*]",
            vec![sort(), simple_ordering(["url", "description", "variables"])],
        ),
        Rule::new("$.servers[*].variables", vec![sort()]),
        Rule::new(
            "$.servers[*].variables[*]",
            vec![sort(), simple_ordering(["enum", "default", "description"])],
        ),
        Rule::new(
            "$.components",
            vec![
                sort(),
                simple_ordering([
                    "schemas",
                    "responses",
                    "parameters",
                    "examples",
                    "requestBodies",
                    "headers",
                    "securitySchemes",
                    "links",
                    "callbacks",
                    "pathItems",
                ]),
            ],
        ),
        Rule::new("$.paths", vec![sort()]),
        Rule::new(
            "$.paths[*]",
            vec![
                sort(),
                simple_ordering([
                    "$ref",
                    "summary",
                    "description",
                    "get",
                    "put",
                    "post",
                    "delete",
                    "options",
                    "head",
                    "patch",
                    "trace",
                    "servers",
                    "parameters",
                ]),
            ],
        ),
    ];

    rules.extend(OPERATIONS.iter().map(|method| {
        Rule::new(
            format!("$.paths[*].{}", method),
            vec![sort(), operation.clone()],
        )
    }));

    rules.extend([
        Rule::new(
            "$.paths[*][*].externalDocs",
            vec![sort(), simple_ordering(["description", "url"])],
        ),
        Rule::new(
            "$.paths[*][*].parameters[*]",
            vec![
                sort(),
                simple_ordering([
                    "$ref",
                    "name",
                    "in",
                    "description",
                    "required",
                    "deprecated",
                    "allowEmptyValue",
                    "style",
                    "explode",
                    "allowReserved",
                    "schema",
                ]),
            ],
        ),
        Rule::new(
            "$.paths[*][*].requestBody",
            vec![sort(), simple_ordering(["description", "content", "required"])],
        ),
        Rule::new("$.paths[*][*].requestBody.content", vec![sort()]),
        Rule::new(
            "$.paths[*][*].requestBody.content[*]",
            vec![sort(), media_type.clone()],
        ),
        Rule::new("$.paths[*][*].responses", vec![sort()]),
        Rule::new(
            "$.paths[*][*].responses[*]",
            vec![
                sort(),
                simple_ordering(["description", "headers", "content", "links"]),
            ],
        ),
        Rule::new(
            "$.paths[*][*].responses[*].content",
            vec![sort(), media_type],
        ),
        Rule::new(".schema", vec![sort(), schema.clone()]),
        Rule::new("$.components.schemas[*]", vec![sort(), schema]),
        Rule::new(".schema.properties", vec![sort()]),
        Rule::new(".schemas[*].properties", vec![sort()]),
    ]);

    rules
}
