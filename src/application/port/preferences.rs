// SPDX-License-Identifier: MPL-2.0
//! Preference store port definition.
//!
//! A process-wide string-keyed store of scalars. Missing keys read as `None`
//! and callers supply their own defaults; there is no schema migration.
//! Writes are fire-and-forget: stores log their own I/O failures.

/// Port for key-value preference storage.
pub trait PreferenceStore: Send + Sync {
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn put_bool(&self, key: &str, value: bool);

    fn get_i64(&self, key: &str) -> Option<i64>;
    fn put_i64(&self, key: &str, value: i64);

    fn get_f64(&self, key: &str) -> Option<f64>;
    fn put_f64(&self, key: &str, value: f64);

    fn get_string(&self, key: &str) -> Option<String>;
    fn put_string(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    /// Returns every stored key.
    fn keys(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn PreferenceStore) {}
}
