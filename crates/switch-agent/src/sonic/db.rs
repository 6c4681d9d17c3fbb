//! Logical database selectors of the SONiC control-plane store.

/// Application database.
pub const APPL_DB: &str = "APPL_DB";
/// Configuration database.
pub const CONFIG_DB: &str = "CONFIG_DB";
/// State database.
pub const STATE_DB: &str = "STATE_DB";

/// Selector returned for names outside the table.
pub const INVALID_DB: i64 = -1;

/// Numeric selector of a logical database, or [`INVALID_DB`].
#[must_use]
pub fn db_index(name: &str) -> i64 {
    match name {
        "APPL_DB" => 0,
        "ASIC_DB" => 1,
        "COUNTERS_DB" => 2,
        "LOGLEVEL_DB" => 3,
        "CONFIG_DB" => 4,
        "PFC_WD_DB" | "FLEX_COUNTER_DB" => 5,
        "STATE_DB" => 6,
        "SNMP_OVERLAY_DB" => 7,
        "RESTAPI_DB" => 8,
        "GB_ASIC_DB" => 9,
        "GB_COUNTERS_DB" => 10,
        "GB_FLEX_COUNTER_DB" => 11,
        "APPL_STATE_DB" => 14,
        _ => INVALID_DB,
    }
}
