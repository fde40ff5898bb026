use serde::{Deserialize, Serialize};

pub use primer_store::Tutorial;

/// Request body for creating or fully updating a tutorial.
///
/// `published` defaults to false when the client omits it; a client-sent `id`
/// is ignored (ids are owned by the store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorialPayload {
    /// Title of the tutorial
    pub title: String,
    /// Longer free-form description
    pub description: String,
    /// Whether the tutorial is visible in the published listing
    #[serde(default)]
    pub published: bool,
}
