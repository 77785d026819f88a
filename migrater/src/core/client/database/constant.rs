/// Collection name for applied migration records
///
/// Holds one document per migration whose `up` action has succeeded and which
/// has not been rolled back since.
pub const MIGRATIONS_COLLECTION: &str = "migrations";

/// Name of the unique index guarding against a migration being recorded twice
pub const IDENTIFIER_INDEX: &str = "identifier_unique";

/// MongoDB server error code for a duplicate key on a unique index
pub const DUPLICATE_KEY_ERROR_CODE: i32 = 11000;
