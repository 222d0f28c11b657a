use uuid::Uuid;

/// Entity kind used for single-course keys.
pub const COURSE_KIND: &str = "course";

/// List tag for the full course catalog snapshot.
///
/// Kept distinct from [`COURSE_KIND`] so a list key can never collide with an
/// entity key.
pub const COURSE_LIST_TAG: &str = "course-list";

/// Returns the cache key for a single entity, `"<kind>:<id>"`.
///
/// # Panics
///
/// Panics if `kind` or `id` is empty. Both come from code, never from user
/// input, so an empty value is a programming error.
pub fn entity_key(kind: &str, id: &str) -> String {
    assert!(!kind.is_empty(), "cache entity kind must not be empty");
    assert!(!id.is_empty(), "cache entity id must not be empty");
    format!("{}:{}", kind, id)
}

/// Returns the cache key for a list snapshot, `"<tag>:all"`.
///
/// # Panics
///
/// Panics if `tag` is empty.
pub fn list_key(tag: &str) -> String {
    assert!(!tag.is_empty(), "cache list tag must not be empty");
    format!("{}:all", tag)
}

/// Returns the cache key for a course.
pub fn course_key(course_id: Uuid) -> String {
    entity_key(COURSE_KIND, &course_id.to_string())
}

/// Returns the cache key for the course catalog snapshot.
pub fn course_list_key() -> String {
    list_key(COURSE_LIST_TAG)
}
