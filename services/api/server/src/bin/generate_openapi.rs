#!/usr/bin/env cargo
use iaq_api::openapi::IaqV1ApiDoc;

fn main() {
    let openapi = IaqV1ApiDoc::openapi();
    let json = serde_json::to_string_pretty(&openapi)
        .expect("Failed to serialize OpenAPI spec to JSON");

    println!("{}", json);
}
