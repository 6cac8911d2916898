//! Host record boundary.

/// The host entity a media field is attached to.
///
/// The media core only ever reads from a record: its primary key feeds the
/// default upload-directory discriminator, named field values substitute
/// `{field}` placeholders in directory templates, and the short type name
/// becomes the leading (lower-snake-cased) directory segment.
pub trait Record {
    /// The stored primary key, if the record has been persisted.
    fn primary_key(&self) -> Option<String>;

    /// The current value of a named field, if present.
    fn field_value(&self, name: &str) -> Option<String>;

    /// The short type name of the record, e.g. `UserProfile`.
    fn type_name(&self) -> &str;
}
