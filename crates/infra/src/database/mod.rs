//! Database implementations

mod codec;
pub mod date_instance_repository;
pub mod event_repository;
pub mod manager;
pub mod map_polygon_repository;
pub mod taxonomy_repository;

pub use date_instance_repository::SqliteDateInstanceRepository;
pub use event_repository::SqliteEventRepository;
pub use manager::DbManager;
pub use map_polygon_repository::SqliteMapPolygonRepository;
pub use taxonomy_repository::SqliteTaxonomyRepository;
