//! Card system: definitions, keywords, instances and the catalog.
//!
//! ## Key Types
//!
//! - `Card`: Static card data from the external catalog
//! - `KeywordSet`: Per-instance keyword abilities
//! - `CardInstance`: A copy of a card in a deck or hand
//! - `MinionInstance` / `WeaponInstance`: Cards in play
//! - `CardCatalog`: Ordered definition lookup and deck dealing
//! - `CatalogSource`: Where a room gets its catalog from

pub mod definition;
pub mod keywords;
pub mod instance;
pub mod registry;
pub mod source;

pub use definition::{Card, CardId, CardType, Rarity};
pub use keywords::{Keyword, KeywordSet};
pub use instance::{CardInstance, MinionInstance, WeaponInstance};
pub use registry::CardCatalog;
pub use source::{CatalogError, CatalogSource, JsonFileCatalog, StaticCatalog};
