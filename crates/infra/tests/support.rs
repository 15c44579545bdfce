#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;
use wiss_core::{
    DateInstanceStore, EventFilterEngine, EventLifecycle, EventListingService, PolygonMapService,
};
use wiss_domain::{EventArea, EventsCategory, Locale};
use wiss_infra::database::{
    DbManager, SqliteDateInstanceRepository, SqliteEventRepository, SqliteMapPolygonRepository,
    SqliteTaxonomyRepository,
};

/// Temporary migrated database that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the full schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("wiss-test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    pub fn count(&self, sql: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection available");
        conn.query_row(sql, &[], |row| row.get(0)).expect("count query")
    }

    pub fn events(&self) -> Arc<SqliteEventRepository> {
        Arc::new(SqliteEventRepository::new(self.manager.clone()))
    }

    pub fn instances(&self) -> Arc<SqliteDateInstanceRepository> {
        Arc::new(SqliteDateInstanceRepository::new(self.manager.clone()))
    }

    pub fn taxonomy(&self) -> SqliteTaxonomyRepository {
        SqliteTaxonomyRepository::new(self.manager.clone())
    }

    pub fn polygons(&self) -> SqliteMapPolygonRepository {
        SqliteMapPolygonRepository::new(self.manager.clone())
    }

    pub fn store(&self) -> DateInstanceStore {
        DateInstanceStore::new(self.instances())
    }

    pub fn lifecycle(&self) -> EventLifecycle {
        EventLifecycle::new(self.events(), self.store())
    }

    pub fn engine(&self) -> EventFilterEngine {
        EventFilterEngine::new(self.events(), self.store())
    }

    pub fn listing(&self) -> EventListingService {
        EventListingService::new(self.engine(), Arc::new(self.taxonomy()))
    }

    pub fn polygon_maps(&self) -> PolygonMapService {
        PolygonMapService::new(Arc::new(self.polygons()))
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// English and Welsh locales with one shared category and area group.
pub struct Seed {
    pub en: Locale,
    pub cy: Locale,
    pub music: EventsCategory,
    pub sport: EventsCategory,
    pub cardiff_en: EventArea,
    pub cardiff_cy: EventArea,
    pub swansea_en: EventArea,
}

pub fn seed(db: &TestDatabase) -> Seed {
    let taxonomy = db.taxonomy();
    let en = taxonomy.create_locale("en").expect("en locale");
    let cy = taxonomy.create_locale("cy").expect("cy locale");

    let music = taxonomy.create_category(Some("Music"), None, en.id).expect("category");
    let sport = taxonomy.create_category(Some("Sport"), None, en.id).expect("category");

    let cardiff_en = taxonomy.create_area("Cardiff", None, None, en.id).expect("area");
    let cardiff_cy = taxonomy
        .create_area("Caerdydd", None, Some(cardiff_en.translation_key), cy.id)
        .expect("translated area");
    let swansea_en = taxonomy.create_area("Swansea", None, None, en.id).expect("area");

    Seed { en, cy, music, sport, cardiff_en, cardiff_cy, swansea_en }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
