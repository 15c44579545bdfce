//! # Wiss Core
//!
//! Business logic for the events and map listings - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for event, date-instance, taxonomy and map
//!   storage
//! - The recurrence rule and the materialised date-instance store
//! - Event lifecycle (save, then recompute instances), filtering and
//!   listing
//! - Pagination and polygon map resolution
//!
//! ## Architecture Principles
//! - Only depends on `wiss-domain`
//! - No database or HTTP code
//! - All storage goes through the port traits

pub mod events;
pub mod maps;
pub mod pagination;

pub use events::filter::{EventFilter, EventFilterEngine};
pub use events::instances::DateInstanceStore;
pub use events::lifecycle::EventLifecycle;
pub use events::listing::{EventListing, EventListingService, QueryParams};
pub use events::ports::{DateInstanceRepository, EventRepository, TaxonomyRepository};
pub use events::recurrence::{dates_for, expand_rules, generate_dates};
pub use maps::ports::MapPolygonRepository;
pub use maps::service::PolygonMapService;
pub use pagination::{paginate, Page};
