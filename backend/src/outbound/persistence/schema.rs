//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// UUID v4 primary key.
        id -> Uuid,
        /// Unique login name (max 150 characters).
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Course catalogue.
    courses (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Course name (max 100 characters).
        name -> Varchar,
        /// Teacher name (max 100 characters).
        teacher -> Varchar,
        /// Free-text description, empty when unset.
        description -> Text,
        /// Non-negative seat capacity.
        capacity -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Student/course links, unique per `(student_id, course_id)`.
    enrollments (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Enrolled account; cascades on account deletion.
        student_id -> Uuid,
        /// Course; cascades on course deletion.
        course_id -> Int8,
        /// Enrollment timestamp.
        enrolled_at -> Timestamptz,
    }
}

diesel::joinable!(enrollments -> courses (course_id));
diesel::joinable!(enrollments -> users (student_id));

diesel::allow_tables_to_appear_in_same_query!(users, courses, enrollments);
