use serde::{Deserialize, Serialize};

/// A searchable record. `text` is the payload scored by every pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	pub id: String,
	pub text: String,
}
impl Document {
	pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
		Self { id: id.into(), text: text.into() }
	}

	pub fn has_text(&self) -> bool {
		!self.text.trim().is_empty()
	}
}
