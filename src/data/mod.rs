//! Read-only catalogs and plan loading
//!
//! The data layer supplies two lookups consumed by the editor: brand name to
//! category (for color coding) and fixture block name to fixture type (for
//! filtering). Both are fetched once at startup and treated as immutable for
//! the session. The plan file itself is a json document of fixtures and
//! architectural objects for each floor.

pub mod assets;

use std::collections::HashMap;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::errors::{MaquetteContext, MaquetteResult};
use crate::editing::entity::{Fixture, PlanModel};
use crate::geometry::{PlanPoint, PlanRotation};

/// Immutable brand and block lookups for one session.
#[derive(Resource, Debug, Default, Deserialize)]
pub struct Catalog {
    /// Brand name -> category, drives fixture color coding.
    pub brand_categories: HashMap<String, String>,
    /// Fixture block name -> fixture type, drives filtering.
    pub block_types: HashMap<String, String>,
}

impl Catalog {
    pub fn load(path: &Path) -> MaquetteResult<Catalog> {
        let raw = std::fs::read_to_string(path).with_file_context("read", path)?;
        let catalog = serde_json::from_str(&raw).with_file_context("parse", path)?;
        Ok(catalog)
    }

    pub fn category_of(&self, brand: &str) -> Option<&str> {
        self.brand_categories.get(brand).map(String::as_str)
    }

    pub fn type_of(&self, block: &str) -> Option<&str> {
        self.block_types.get(block).map(String::as_str)
    }
}

/// One fixture record as persisted upstream.
#[derive(Debug, Deserialize)]
pub struct FixtureRecord {
    pub floor: u32,
    pub block: String,
    pub seq: u32,
    pub position: PlanPoint,
    #[serde(default)]
    pub rotation: PlanRotation,
    pub brand: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub model_url: Option<String>,
}

fn default_count() -> u32 {
    1
}

/// The persisted plan document.
#[derive(Debug, Default, Deserialize)]
pub struct PlanDocument {
    #[serde(default)]
    pub fixtures: Vec<FixtureRecord>,
}

/// Load a plan file into a fresh model. Records with broken geometry are
/// skipped with a warning rather than failing the whole load.
pub fn load_plan(path: &Path) -> MaquetteResult<PlanModel> {
    let raw = std::fs::read_to_string(path).with_file_context("read", path)?;
    let document: PlanDocument =
        serde_json::from_str(&raw).with_file_context("parse", path)?;

    let mut model = PlanModel::new();
    for record in document.fixtures {
        if ![record.position.x, record.position.y, record.position.z]
            .iter()
            .all(|v| v.is_finite())
        {
            warn!(
                "skipping fixture {}/{} with non-finite position",
                record.block, record.seq
            );
            continue;
        }
        let mut fixture = Fixture::new(
            record.floor,
            record.block,
            record.seq,
            record.position,
            record.brand,
        );
        fixture.rotation = record.rotation;
        fixture.count = record.count.max(1);
        fixture.model_url = record.model_url;
        fixture.rebase();
        model.insert_fixture(fixture);
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookups() {
        let catalog: Catalog = serde_json::from_str(
            r#"{
                "brand_categories": {"acme": "apparel"},
                "block_types": {"shelf-a": "shelving"}
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.category_of("acme"), Some("apparel"));
        assert_eq!(catalog.category_of("unknown"), None);
        assert_eq!(catalog.type_of("shelf-a"), Some("shelving"));
    }

    #[test]
    fn plan_document_parses_and_defaults() {
        let document: PlanDocument = serde_json::from_str(
            r#"{
                "fixtures": [
                    {
                        "floor": 0,
                        "block": "shelf",
                        "seq": 0,
                        "position": {"x": 1.0, "y": 2.0, "z": 0.0},
                        "brand": "acme"
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(document.fixtures.len(), 1);
        assert_eq!(document.fixtures[0].count, 1);
        assert!(document.fixtures[0].model_url.is_none());
    }
}
