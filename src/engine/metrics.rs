use prometheus::{register_int_counter, register_int_gauge, IntCounter, IntGauge};

lazy_static::lazy_static! {
    pub static ref WATCHED_PATHS: IntGauge = register_int_gauge!(
        "litereplica_watched_paths",
        "Number of database paths being watched"
    ).unwrap();

    pub static ref OPEN_DATABASES: IntGauge = register_int_gauge!(
        "litereplica_open_databases",
        "Number of watched databases currently open"
    ).unwrap();

    pub static ref READINESS_ATTEMPTS: IntCounter = register_int_counter!(
        "litereplica_readiness_attempts_total",
        "Checks for the database file made while waiting to start replication"
    ).unwrap();
}
