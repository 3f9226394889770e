//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users and their running point totals.
    users (id) {
        id -> Uuid,
        /// Unique, 3 to 32 characters.
        username -> Varchar,
        /// Unique contact address.
        email -> Varchar,
        /// Non-negative; changed only by the completion ledger.
        total_points -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Habits owned by users.
    habits (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        description -> Text,
        points_per_completion -> Int4,
        reward_description -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per recorded habit completion.
    completions (id) {
        id -> Uuid,
        habit_id -> Uuid,
        user_id -> Uuid,
        completion_date -> Timestamptz,
        /// Snapshot of the habit's points when the completion was recorded.
        points_earned -> Int4,
    }
}

diesel::table! {
    /// Badge catalogue.
    badges (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        points_threshold -> Int4,
    }
}

diesel::table! {
    /// Badge awards keyed by (user, badge).
    user_badges (user_id, badge_id) {
        user_id -> Uuid,
        badge_id -> Uuid,
        awarded_date -> Timestamptz,
    }
}

diesel::joinable!(habits -> users (user_id));
diesel::joinable!(user_badges -> badges (badge_id));
diesel::joinable!(user_badges -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(badges, completions, habits, user_badges, users);
