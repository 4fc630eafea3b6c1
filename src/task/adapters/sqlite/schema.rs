//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    task (id) {
        /// Store-assigned identifier; `AUTOINCREMENT` keeps ids unique forever.
        id -> BigInt,
        /// Non-empty title.
        title -> Text,
        /// Optional description.
        description -> Nullable<Text>,
        /// Completion flag.
        completed -> Bool,
        /// Creation timestamp (UTC).
        created_at -> Timestamp,
        /// Last update timestamp (UTC).
        updated_at -> Timestamp,
    }
}
