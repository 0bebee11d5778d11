//! Default values for configuration fields.

pub(super) fn default_name() -> String {
    "glossa".to_string()
}

pub(super) fn default_data_dir() -> String {
    "~/.glossa".to_string()
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_db_path() -> String {
    "~/.glossa/data/glossa.db".to_string()
}

pub(super) fn default_max_connections() -> u32 {
    4
}

pub(super) fn default_cache_capacity() -> usize {
    1024
}

pub(super) fn default_cache_ttl() -> u64 {
    300
}

pub(super) fn default_max_export_size() -> usize {
    100_000
}

pub(super) fn default_export_cache_ttl() -> u64 {
    300
}
