/// Data layer: API responses, the soil model, and its tabular views.
///
/// Architecture:
/// ```text
///  parse/cpt JSON      classify/* JSON
///        │                   │
///        ▼                   ▼
///   ┌──────────────────────────────┐
///   │ response  │ serde mirrors of the two bodies
///   └──────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate + merge → SoilProperties
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ SoilProperties │  CptTable, LayerTable, Location
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  table    │  Arrow RecordBatch → pretty / CSV / Parquet
///   └──────────┘
/// ```

pub mod loader;
pub mod location;
pub mod model;
pub mod response;
pub mod table;
