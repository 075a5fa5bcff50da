//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Enriched foods keyed by FDC ID
    pub const GLOBAL_FOODS: &str = "globalFoods";
    /// Singleton site settings document
    pub const SITE_SETTINGS: &str = "siteSettings";
    /// Admin allow-list keyed by Firebase uid
    pub const ADMINS: &str = "admins";
    pub const FOOD_LOGS: &str = "foodLogs";
    /// Food embeddings for nearest-neighbour search, keyed by FDC ID
    pub const FOOD_EMBEDDINGS: &str = "foodEmbeddings";
}

/// Document ID of the site settings singleton.
pub const SITE_SETTINGS_DOC_ID: &str = "global";
