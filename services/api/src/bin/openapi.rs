//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3 document of the quiz API to disk, by default
//! `openapi.json` in the working directory. Pass a path to write elsewhere.

use api_lib::web::rest::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let spec_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, spec_json)?;
    println!("OpenAPI specification generated at {}", path.display());
    Ok(())
}
