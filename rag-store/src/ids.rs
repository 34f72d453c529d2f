use uuid::Uuid;

/// Deterministic UUIDv5 from an arbitrary string id.
///
/// Rebuilding an index from the same artifacts yields the same point ids,
/// so upserts overwrite instead of duplicating.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}
